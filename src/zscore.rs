//! Z-Score Calculation (LMS method)
//!
//! ```text
//! z = ((x / M)^L - 1) / (L * S)     L != 0
//! z = ln(x / M) / S                 L == 0 (Box-Cox limit)
//! ```
//!
//! Unknown ages resolve to a neutral z of 0: a missing row reads as a
//! median child, not an error. Callers that need to tell the difference
//! check `ZScoreCalculator::lookup`.

use crate::reference::{resolve_age_index, Gender, GrowthReferenceTable, LmsParams, Metric};

/// |L| below this is treated as the logarithmic limit
pub const L_EPSILON: f64 = 1e-12;

/// Score returned when the table has no row for the requested age
pub const UNKNOWN_AGE_Z: f64 = 0.0;

/// LMS transform of one measurement
pub fn lms_z_score(measurement: f64, lms: LmsParams) -> f64 {
    let LmsParams { l, m, s } = lms;
    if l.abs() < L_EPSILON {
        (measurement / m).ln() / s
    } else {
        ((measurement / m).powf(l) - 1.0) / (l * s)
    }
}

/// Applies the LMS transform against a shared reference table
#[derive(Debug, Clone, Copy)]
pub struct ZScoreCalculator<'a> {
    table: &'a GrowthReferenceTable,
}

impl<'a> ZScoreCalculator<'a> {
    pub fn new(table: &'a GrowthReferenceTable) -> Self {
        Self { table }
    }

    /// Z-score of `measurement` for the exact integer age.
    ///
    /// Returns `UNKNOWN_AGE_Z` when `age_months` is fractional, out of range
    /// or absent from the table. Output is not clamped.
    pub fn z_score(&self, gender: Gender, metric: Metric, age_months: f64, measurement: f64) -> f64 {
        match self.lookup(gender, metric, age_months) {
            Some(lms) => lms_z_score(measurement, lms),
            None => {
                tracing::debug!(
                    "No {} row for {} at {} months, using z = {}",
                    metric,
                    gender,
                    age_months,
                    UNKNOWN_AGE_Z
                );
                UNKNOWN_AGE_Z
            }
        }
    }

    /// LMS row used for this age, if any
    pub fn lookup(&self, gender: Gender, metric: Metric, age_months: f64) -> Option<LmsParams> {
        let age = resolve_age_index(age_months)?;
        self.table.lookup(gender, metric, age)
    }
}
