//! Fuzzy System Definition
//!
//! Everything an inference run needs, as plain data: input variables,
//! the output variable, the rule base and the output discretization.
//! Can be deserialized from JSON to swap rule sets without code changes.

use super::defuzzify::DefuzzMethod;
use super::membership::LinguisticVariable;
use super::rules::Rule;
use crate::error::{Result, ScreeningError};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

fn default_resolution() -> f64 {
    1.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuzzySystem {
    pub inputs: Vec<LinguisticVariable>,
    pub output: LinguisticVariable,
    pub rules: Vec<Rule>,
    /// Sampling step of the output universe
    #[serde(default = "default_resolution")]
    pub resolution: f64,
    #[serde(default)]
    pub defuzzification: DefuzzMethod,
}

impl FuzzySystem {
    /// Load a system from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read fuzzy system file: {:?}", path))
            .map_err(|e| ScreeningError::Config(format!("{:#}", e)))?;
        Self::from_json_str(&contents)
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let system: FuzzySystem = serde_json::from_str(json)
            .map_err(|e| ScreeningError::InvalidFuzzySystem(format!("Failed to parse JSON: {}", e)))?;
        system.validate()?;
        Ok(system)
    }

    pub fn to_json_string(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| ScreeningError::Config(e.to_string()))
    }

    /// Structural checks. Rule references are resolved by `RuleEngine::new`.
    pub fn validate(&self) -> Result<()> {
        if self.inputs.is_empty() {
            return Err(ScreeningError::InvalidFuzzySystem("no input variables".to_string()));
        }
        for (idx, var) in self.inputs.iter().enumerate() {
            var.validate()?;
            if self.inputs[..idx].iter().any(|v| v.name == var.name) {
                return Err(ScreeningError::InvalidFuzzySystem(format!(
                    "duplicate input variable '{}'",
                    var.name
                )));
            }
        }
        self.output.validate()?;

        if self.rules.is_empty() {
            return Err(ScreeningError::InvalidFuzzySystem("empty rule base".to_string()));
        }

        let span = self.output.universe_max() - self.output.universe_min();
        if !(self.resolution.is_finite() && self.resolution > 0.0 && self.resolution <= span) {
            return Err(ScreeningError::InvalidFuzzySystem(format!(
                "resolution {} must be in (0, {}]",
                self.resolution, span
            )));
        }
        Ok(())
    }
}
