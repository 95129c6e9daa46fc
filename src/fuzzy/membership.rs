//! Membership Functions and Linguistic Variables
//!
//! Piecewise-linear shapes only. A degenerate edge (a == b, or c == d)
//! is a vertical step: the degree is already 1 at the breakpoint.

use crate::error::{Result, ScreeningError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MembershipFunction {
    /// Peak at b, support [a, c]
    Triangular(f64, f64, f64),
    /// Plateau on [b, c], support [a, d]
    Trapezoidal(f64, f64, f64, f64),
}

impl MembershipFunction {
    /// Degree of membership of `x`, always in [0, 1].
    /// NaN inputs belong to no set.
    pub fn degree(&self, x: f64) -> f64 {
        if x.is_nan() {
            return 0.0;
        }
        match *self {
            MembershipFunction::Triangular(a, b, c) => {
                if x < a || x > c {
                    0.0
                } else if x == b {
                    1.0
                } else if x < b {
                    (x - a) / (b - a)
                } else {
                    (c - x) / (c - b)
                }
            }
            MembershipFunction::Trapezoidal(a, b, c, d) => {
                if x < a || x > d {
                    0.0
                } else if x >= b && x <= c {
                    1.0
                } else if x < b {
                    (x - a) / (b - a)
                } else {
                    (d - x) / (d - c)
                }
            }
        }
    }

    pub fn breakpoints(&self) -> Vec<f64> {
        match *self {
            MembershipFunction::Triangular(a, b, c) => vec![a, b, c],
            MembershipFunction::Trapezoidal(a, b, c, d) => vec![a, b, c, d],
        }
    }

    /// Closed interval outside which the degree is 0
    pub fn support(&self) -> (f64, f64) {
        match *self {
            MembershipFunction::Triangular(a, _, c) => (a, c),
            MembershipFunction::Trapezoidal(a, _, _, d) => (a, d),
        }
    }

    /// Breakpoints must be finite and non-decreasing
    pub fn validate(&self) -> Result<()> {
        let points = self.breakpoints();
        if points.iter().any(|p| !p.is_finite()) {
            return Err(ScreeningError::InvalidFuzzySystem(format!(
                "non-finite breakpoint in {:?}",
                self
            )));
        }
        if points.windows(2).any(|w| w[0] > w[1]) {
            return Err(ScreeningError::InvalidFuzzySystem(format!(
                "breakpoints must be non-decreasing: {:?}",
                self
            )));
        }
        Ok(())
    }
}

/// A labeled membership function within a variable
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Term {
    pub label: String,
    pub function: MembershipFunction,
}

/// Named axis with labeled terms over one universe of discourse
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinguisticVariable {
    pub name: String,
    pub universe: (f64, f64),
    pub terms: Vec<Term>,
}

impl LinguisticVariable {
    pub fn new(name: impl Into<String>, min: f64, max: f64) -> Self {
        Self {
            name: name.into(),
            universe: (min, max),
            terms: Vec::new(),
        }
    }

    /// Builder-style term registration
    pub fn term(mut self, label: impl Into<String>, function: MembershipFunction) -> Self {
        self.terms.push(Term {
            label: label.into(),
            function,
        });
        self
    }

    pub fn universe_min(&self) -> f64 {
        self.universe.0
    }

    pub fn universe_max(&self) -> f64 {
        self.universe.1
    }

    pub fn term_index(&self, label: &str) -> Option<usize> {
        self.terms.iter().position(|t| t.label == label)
    }

    /// Degree of `x` in the named term; `None` if the label is unknown
    pub fn degree(&self, label: &str, x: f64) -> Option<f64> {
        self.terms
            .iter()
            .find(|t| t.label == label)
            .map(|t| t.function.degree(x))
    }

    /// Degrees of `x` in every term, in declaration order
    pub fn fuzzify(&self, x: f64) -> Vec<(&str, f64)> {
        self.terms
            .iter()
            .map(|t| (t.label.as_str(), t.function.degree(x)))
            .collect()
    }

    /// Clamp a crisp value into the universe. NaN stays NaN and belongs to no term.
    pub fn clamp(&self, x: f64) -> f64 {
        x.clamp(self.universe.0, self.universe.1)
    }

    pub fn validate(&self) -> Result<()> {
        let (min, max) = self.universe;
        if !(min.is_finite() && max.is_finite() && min < max) {
            return Err(ScreeningError::InvalidFuzzySystem(format!(
                "variable '{}' has invalid universe [{}, {}]",
                self.name, min, max
            )));
        }
        if self.terms.is_empty() {
            return Err(ScreeningError::InvalidFuzzySystem(format!(
                "variable '{}' has no terms",
                self.name
            )));
        }
        for (idx, term) in self.terms.iter().enumerate() {
            term.function.validate()?;
            if self.terms[..idx].iter().any(|t| t.label == term.label) {
                return Err(ScreeningError::InvalidFuzzySystem(format!(
                    "duplicate label '{}' in variable '{}'",
                    term.label, self.name
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use MembershipFunction::*;

    #[test]
    fn test_triangular_reference_points() {
        let short = Triangular(-3.1, -2.5, -1.9);
        assert_eq!(short.degree(-2.5), 1.0);
        assert_eq!(short.degree(-3.1), 0.0);
        assert_eq!(short.degree(-1.9), 0.0);
        assert_eq!(short.degree(-5.0), 0.0);
        assert_eq!(short.degree(0.0), 0.0);
        assert_abs_diff_eq!(short.degree(-2.8), 0.5, epsilon = 1e-9);
        assert_abs_diff_eq!(short.degree(-2.2), 0.5, epsilon = 1e-9);
    }

    #[test]
    fn test_triangular_vertical_edges() {
        let left = Triangular(0.0, 0.0, 45.0);
        assert_eq!(left.degree(0.0), 1.0);
        assert_eq!(left.degree(-0.001), 0.0);
        assert_abs_diff_eq!(left.degree(22.5), 0.5, epsilon = 1e-12);

        let right = Triangular(75.0, 100.0, 100.0);
        assert_eq!(right.degree(100.0), 1.0);
        assert_eq!(right.degree(100.5), 0.0);
    }

    #[test]
    fn test_trapezoidal_plateau_and_ramps() {
        let normal = Trapezoidal(-2.1, -1.0, 3.0, 5.0);
        assert_eq!(normal.degree(0.0), 1.0);
        assert_eq!(normal.degree(-1.0), 1.0);
        assert_eq!(normal.degree(3.0), 1.0);
        assert_eq!(normal.degree(5.0), 0.0);
        assert_abs_diff_eq!(normal.degree(4.0), 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(normal.degree(-1.55), 0.5, epsilon = 1e-9);

        let very_short = Trapezoidal(-5.0, -5.0, -3.1, -2.9);
        assert_eq!(very_short.degree(-5.0), 1.0);
        assert_eq!(very_short.degree(-6.0), 0.0);
        assert_abs_diff_eq!(very_short.degree(-3.0), 0.5, epsilon = 1e-9);

        let excess = Trapezoidal(1.9, 2.1, 5.0, 5.0);
        assert_eq!(excess.degree(5.0), 1.0);
    }

    #[test]
    fn test_bounded_and_continuous() {
        let shapes = [
            Triangular(-3.1, -2.5, -1.9),
            Trapezoidal(-2.1, 0.0, 1.9, 2.1),
            Triangular(40.0, 60.0, 80.0),
        ];
        for shape in shapes {
            let mut prev = shape.degree(-10.0);
            for i in 0..=20_000 {
                let x = -10.0 + i as f64 * 0.005;
                let d = shape.degree(x);
                assert!((0.0..=1.0).contains(&d));
                // Max slope of these shapes is below 5 per unit
                assert!((d - prev).abs() <= 0.005 * 5.0 + 1e-9);
                prev = d;
            }
        }
    }

    #[test]
    fn test_nan_belongs_nowhere() {
        assert_eq!(Triangular(-1.0, 0.0, 1.0).degree(f64::NAN), 0.0);
        assert_eq!(Trapezoidal(-1.0, 0.0, 1.0, 2.0).degree(f64::NAN), 0.0);
    }

    #[test]
    fn test_validate_breakpoints() {
        assert!(Triangular(-1.0, 0.0, 1.0).validate().is_ok());
        assert!(Triangular(1.0, 0.0, 1.0).validate().is_err());
        assert!(Trapezoidal(0.0, 1.0, 0.5, 2.0).validate().is_err());
        assert!(Triangular(0.0, f64::NAN, 1.0).validate().is_err());
    }

    #[test]
    fn test_variable_labels_unique() {
        let var = LinguisticVariable::new("x", -5.0, 5.0)
            .term("low", Triangular(-5.0, -5.0, 0.0))
            .term("low", Triangular(0.0, 5.0, 5.0));
        assert!(var.validate().is_err());
    }

    #[test]
    fn test_variable_fuzzify_and_clamp() {
        let var = LinguisticVariable::new("x", -5.0, 5.0)
            .term("low", Triangular(-5.0, -5.0, 0.0))
            .term("high", Triangular(0.0, 5.0, 5.0));
        assert!(var.validate().is_ok());

        let degrees = var.fuzzify(-2.5);
        assert_eq!(degrees[0].0, "low");
        assert_abs_diff_eq!(degrees[0].1, 0.5, epsilon = 1e-12);
        assert_eq!(degrees[1].1, 0.0);

        assert_eq!(var.degree("missing", 0.0), None);
        assert_eq!(var.clamp(9.0), 5.0);
        assert_eq!(var.clamp(-7.3), -5.0);
        assert_eq!(var.clamp(1.25), 1.25);
        assert!(var.clamp(f64::NAN).is_nan());
    }
}
