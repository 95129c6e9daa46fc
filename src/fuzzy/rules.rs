//! Rule Evaluation and Mamdani Aggregation
//!
//! Rules are declarative data. `RuleEngine::new` resolves every
//! (variable, label) reference to indices once, so inference itself
//! cannot fail and allocates only the output vectors.
//!
//! AND = min, OR = max. Each rule clips its consequent at its firing
//! strength; clipped sets are merged by point-wise max. Both operators
//! are commutative and associative, so rule order never changes the
//! aggregated set.

use super::membership::LinguisticVariable;
use super::system::FuzzySystem;
use crate::error::{Result, ScreeningError};
use serde::{Deserialize, Serialize};

// ============================================================================
// Rule data
// ============================================================================

/// Boolean expression over membership lookups
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Antecedent {
    Is { variable: String, label: String },
    And(Vec<Antecedent>),
    Or(Vec<Antecedent>),
}

impl Antecedent {
    pub fn is(variable: impl Into<String>, label: impl Into<String>) -> Self {
        Antecedent::Is {
            variable: variable.into(),
            label: label.into(),
        }
    }

    pub fn and(self, other: Antecedent) -> Self {
        match self {
            Antecedent::And(mut terms) => {
                terms.push(other);
                Antecedent::And(terms)
            }
            first => Antecedent::And(vec![first, other]),
        }
    }

    pub fn or(self, other: Antecedent) -> Self {
        match self {
            Antecedent::Or(mut terms) => {
                terms.push(other);
                Antecedent::Or(terms)
            }
            first => Antecedent::Or(vec![first, other]),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Consequent {
    pub variable: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    #[serde(rename = "if")]
    pub antecedent: Antecedent,
    #[serde(rename = "then")]
    pub consequent: Consequent,
}

impl Rule {
    pub fn new(antecedent: Antecedent, variable: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            antecedent,
            consequent: Consequent {
                variable: variable.into(),
                label: label.into(),
            },
        }
    }
}

// ============================================================================
// Compiled form
// ============================================================================

#[derive(Debug, Clone)]
enum CompiledAntecedent {
    Is { input: usize, term: usize },
    And(Vec<CompiledAntecedent>),
    Or(Vec<CompiledAntecedent>),
}

impl CompiledAntecedent {
    fn compile(antecedent: &Antecedent, inputs: &[LinguisticVariable]) -> Result<Self> {
        match antecedent {
            Antecedent::Is { variable, label } => {
                let input = inputs
                    .iter()
                    .position(|v| &v.name == variable)
                    .ok_or_else(|| {
                        ScreeningError::InvalidFuzzySystem(format!("unknown input variable '{}'", variable))
                    })?;
                let term = inputs[input].term_index(label).ok_or_else(|| {
                    ScreeningError::InvalidFuzzySystem(format!(
                        "unknown label '{}' for variable '{}'",
                        label, variable
                    ))
                })?;
                Ok(CompiledAntecedent::Is { input, term })
            }
            Antecedent::And(terms) | Antecedent::Or(terms) => {
                if terms.is_empty() {
                    return Err(ScreeningError::InvalidFuzzySystem(
                        "AND/OR with no operands".to_string(),
                    ));
                }
                let compiled = terms
                    .iter()
                    .map(|t| Self::compile(t, inputs))
                    .collect::<Result<Vec<_>>>()?;
                Ok(match antecedent {
                    Antecedent::And(_) => CompiledAntecedent::And(compiled),
                    _ => CompiledAntecedent::Or(compiled),
                })
            }
        }
    }

    fn strength(&self, degrees: &[Vec<f64>]) -> f64 {
        match self {
            CompiledAntecedent::Is { input, term } => degrees[*input][*term],
            CompiledAntecedent::And(terms) => terms
                .iter()
                .map(|t| t.strength(degrees))
                .fold(1.0, f64::min),
            CompiledAntecedent::Or(terms) => terms
                .iter()
                .map(|t| t.strength(degrees))
                .fold(0.0, f64::max),
        }
    }
}

#[derive(Debug, Clone)]
struct CompiledRule {
    antecedent: CompiledAntecedent,
    output_term: usize,
}

// ============================================================================
// Aggregated output
// ============================================================================

/// Point-wise max of all clipped consequents over the sampled output universe
#[derive(Debug, Clone, PartialEq)]
pub struct AggregatedOutputSet {
    samples: Vec<f64>,
    membership: Vec<f64>,
    firing: Vec<f64>,
    activation: Vec<(String, f64)>,
}

impl AggregatedOutputSet {
    /// Sample points x_i of the output universe
    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    /// Aggregated μ(x_i), same length as `samples`
    pub fn membership(&self) -> &[f64] {
        &self.membership
    }

    /// Firing strength per rule, in rule-definition order
    pub fn firing_strengths(&self) -> &[f64] {
        &self.firing
    }

    /// Strongest activation per output label, in label order
    pub fn activation(&self) -> &[(String, f64)] {
        &self.activation
    }

    /// True when no rule fired at all
    pub fn is_empty(&self) -> bool {
        self.membership.iter().all(|&mu| mu == 0.0)
    }
}

// ============================================================================
// Engine
// ============================================================================

/// Immutable, thread-safe inference engine over a validated fuzzy system
#[derive(Debug, Clone)]
pub struct RuleEngine {
    system: FuzzySystem,
    rules: Vec<CompiledRule>,
    samples: Vec<f64>,
    /// μ of each output term at each sample, precomputed
    output_curves: Vec<Vec<f64>>,
}

impl RuleEngine {
    pub fn new(system: FuzzySystem) -> Result<Self> {
        system.validate()?;

        let rules = system
            .rules
            .iter()
            .map(|rule| {
                if rule.consequent.variable != system.output.name {
                    return Err(ScreeningError::InvalidFuzzySystem(format!(
                        "rule targets unknown output variable '{}'",
                        rule.consequent.variable
                    )));
                }
                let output_term = system.output.term_index(&rule.consequent.label).ok_or_else(|| {
                    ScreeningError::InvalidFuzzySystem(format!(
                        "unknown output label '{}'",
                        rule.consequent.label
                    ))
                })?;
                Ok(CompiledRule {
                    antecedent: CompiledAntecedent::compile(&rule.antecedent, &system.inputs)?,
                    output_term,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let samples = sample_universe(system.output.universe_min(), system.output.universe_max(), system.resolution);
        let output_curves = system
            .output
            .terms
            .iter()
            .map(|t| samples.iter().map(|&x| t.function.degree(x)).collect())
            .collect();

        Ok(Self {
            system,
            rules,
            samples,
            output_curves,
        })
    }

    pub fn system(&self) -> &FuzzySystem {
        &self.system
    }

    /// Evaluate every rule for crisp inputs given in `system.inputs` order.
    ///
    /// A missing input counts as belonging to no term. Inputs are used as
    /// given; clamping into the universe is the caller's job.
    pub fn infer(&self, inputs: &[f64]) -> AggregatedOutputSet {
        let degrees: Vec<Vec<f64>> = self
            .system
            .inputs
            .iter()
            .enumerate()
            .map(|(idx, var)| {
                let x = inputs.get(idx).copied().unwrap_or(f64::NAN);
                var.terms.iter().map(|t| t.function.degree(x)).collect()
            })
            .collect();

        let firing: Vec<f64> = self
            .rules
            .iter()
            .map(|rule| rule.antecedent.strength(&degrees))
            .collect();

        // Accumulate per output term first, then across terms
        let mut term_activation = vec![0.0_f64; self.output_curves.len()];
        for (rule, &strength) in self.rules.iter().zip(&firing) {
            term_activation[rule.output_term] = term_activation[rule.output_term].max(strength);
        }

        let membership = (0..self.samples.len())
            .map(|i| {
                self.output_curves
                    .iter()
                    .zip(&term_activation)
                    .map(|(curve, &level)| curve[i].min(level))
                    .fold(0.0, f64::max)
            })
            .collect();

        let activation = self
            .system
            .output
            .terms
            .iter()
            .zip(term_activation)
            .map(|(t, level)| (t.label.clone(), level))
            .collect();

        AggregatedOutputSet {
            samples: self.samples.clone(),
            membership,
            firing,
            activation,
        }
    }
}

/// Points `min, min + step, ...` up to `max`, always ending exactly at `max`.
/// A step that does not divide the span leaves a shorter last interval.
pub fn sample_universe(min: f64, max: f64, step: f64) -> Vec<f64> {
    let span = max - min;
    let n = (span / step + 1e-9).floor() as usize;
    let mut xs: Vec<f64> = (0..=n).map(|i| min + i as f64 * step).collect();

    match xs.last_mut() {
        Some(last) if (max - *last).abs() <= step * 1e-9 => *last = max,
        _ => xs.push(max),
    }
    xs
}
