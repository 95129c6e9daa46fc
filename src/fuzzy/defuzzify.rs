//! Defuzzification
//!
//! Reduces an aggregated output set to one crisp value.
//!
//! - `Centroid`: sample-weighted mean, Σ x·μ / Σ μ
//! - `AreaCentroid`: centroid of the piecewise-linear area under μ,
//!   computed segment by segment (rectangles and trapezoids)
//!
//! When the aggregated set is zero everywhere there is no centroid. The
//! defuzzifier then returns `DEGENERATE_FALLBACK_SCORE` instead of
//! dividing by zero. Callers that need to tell the two apart use
//! `try_defuzzify`.

use super::rules::AggregatedOutputSet;
use serde::{Deserialize, Serialize};

/// Crisp score reported when no rule fired
pub const DEGENERATE_FALLBACK_SCORE: f64 = 0.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefuzzMethod {
    #[default]
    Centroid,
    AreaCentroid,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Defuzzifier {
    method: DefuzzMethod,
}

impl Defuzzifier {
    pub fn new(method: DefuzzMethod) -> Self {
        Self { method }
    }

    /// Crisp score, or the fallback when the set is empty
    pub fn defuzzify(&self, set: &AggregatedOutputSet) -> f64 {
        self.try_defuzzify(set).unwrap_or(DEGENERATE_FALLBACK_SCORE)
    }

    /// `None` when the aggregated set has zero total membership
    pub fn try_defuzzify(&self, set: &AggregatedOutputSet) -> Option<f64> {
        match self.method {
            DefuzzMethod::Centroid => centroid(set.samples(), set.membership()),
            DefuzzMethod::AreaCentroid => area_centroid(set.samples(), set.membership()),
        }
    }
}

/// Σ x_i·μ_i / Σ μ_i over the samples
pub fn centroid(xs: &[f64], mu: &[f64]) -> Option<f64> {
    let (moment, total) = xs
        .iter()
        .zip(mu)
        .fold((0.0, 0.0), |(moment, total), (&x, &m)| (moment + x * m, total + m));

    if total > 0.0 {
        Some(moment / total)
    } else {
        None
    }
}

/// Centroid of the polygon under the linearly interpolated membership curve
pub fn area_centroid(xs: &[f64], mu: &[f64]) -> Option<f64> {
    let mut moment_area = 0.0;
    let mut total_area = 0.0;

    for (x, m) in xs.windows(2).zip(mu.windows(2)) {
        let (x1, x2) = (x[0], x[1]);
        let (y1, y2) = (m[0], m[1]);
        let width = x2 - x1;
        if width == 0.0 || (y1 == 0.0 && y2 == 0.0) {
            continue;
        }

        let area = 0.5 * width * (y1 + y2);
        // Trapezoid centroid measured from x1
        let moment = x1 + width * (y1 + 2.0 * y2) / (3.0 * (y1 + y2));

        moment_area += moment * area;
        total_area += area;
    }

    if total_area > 0.0 {
        Some(moment_area / total_area)
    } else {
        None
    }
}
