//! WHO Growth Reference Tables
//!
//! LMS parameters per (gender, metric), indexed by integer age in months.
//! Tables are loaded once at startup and shared read-only afterwards.
//!
//! - `loader`: CSV loading with Polars (WHO semicolon / decimal-comma dialect)

pub mod loader;

use crate::error::{Result, ScreeningError};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub use loader::{CsvDialect, TableSources};

/// Oldest age covered by the 0-to-5-years reference tables
pub const MAX_AGE_MONTHS: u32 = 60;

/// Number of rows every reference series must carry (ages 0..=60)
pub const ROWS_PER_SERIES: usize = MAX_AGE_MONTHS as usize + 1;

// ============================================================================
// Keys
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub const ALL: [Gender; 2] = [Gender::Male, Gender::Female];

    /// WHO file-name infix ("boys" / "girls")
    pub fn who_group(&self) -> &'static str {
        match self {
            Gender::Male => "boys",
            Gender::Female => "girls",
        }
    }
}

impl FromStr for Gender {
    type Err = ScreeningError;

    /// Accepts English and Indonesian spellings plus their one-letter forms.
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "male" | "m" | "boy" | "laki-laki" | "l" => Ok(Gender::Male),
            "female" | "f" | "girl" | "perempuan" | "p" => Ok(Gender::Female),
            other => Err(ScreeningError::InvalidInput(format!(
                "unrecognised gender '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gender::Male => write!(f, "male"),
            Gender::Female => write!(f, "female"),
        }
    }
}

/// Anthropometric indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    /// Length/height-for-age (lhfa)
    HeightForAge,
    /// Weight-for-age (wfa)
    WeightForAge,
}

impl Metric {
    pub const ALL: [Metric; 2] = [Metric::HeightForAge, Metric::WeightForAge];

    /// WHO file-name prefix
    pub fn who_prefix(&self) -> &'static str {
        match self {
            Metric::HeightForAge => "lhfa",
            Metric::WeightForAge => "wfa",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Metric::HeightForAge => write!(f, "height-for-age"),
            Metric::WeightForAge => write!(f, "weight-for-age"),
        }
    }
}

// ============================================================================
// Rows
// ============================================================================

/// Box-Cox power (L), median (M) and coefficient of variation (S)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LmsParams {
    pub l: f64,
    pub m: f64,
    pub s: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GrowthReferenceRow {
    pub age_months: u32,
    pub lms: LmsParams,
}

impl GrowthReferenceRow {
    pub fn new(age_months: u32, l: f64, m: f64, s: f64) -> Self {
        Self {
            age_months,
            lms: LmsParams { l, m, s },
        }
    }
}

/// Resolve a month value to a table index.
///
/// Only integral values inside [0, 60] have a row. Fractional months
/// (e.g. 27.6 from 2.3 years) never match, the same way an equality
/// lookup on the age column would behave.
pub fn resolve_age_index(age_months: f64) -> Option<u32> {
    if !age_months.is_finite() || age_months < 0.0 || age_months.fract() != 0.0 {
        return None;
    }
    if age_months > MAX_AGE_MONTHS as f64 {
        return None;
    }
    Some(age_months as u32)
}

// ============================================================================
// Series and table
// ============================================================================

/// Rows for one (gender, metric), ordered by age, one per month 0..=60
#[derive(Debug, Clone)]
pub struct ReferenceSeries {
    rows: Vec<GrowthReferenceRow>,
}

impl ReferenceSeries {
    /// Validate and order rows.
    ///
    /// # Errors
    /// `DataUnavailable` when an age repeats, falls outside [0, 60], is
    /// missing, or when M/S are not strictly positive.
    pub fn new(name: &str, mut rows: Vec<GrowthReferenceRow>) -> Result<Self> {
        let invalid = |reason: String| ScreeningError::DataUnavailable {
            source_name: name.to_string(),
            reason,
        };

        rows.sort_by_key(|r| r.age_months);

        for pair in rows.windows(2) {
            if pair[0].age_months == pair[1].age_months {
                return Err(invalid(format!("duplicate row for age {}", pair[0].age_months)));
            }
        }

        for row in &rows {
            let LmsParams { l, m, s } = row.lms;
            if row.age_months > MAX_AGE_MONTHS {
                return Err(invalid(format!("age {} outside 0..={}", row.age_months, MAX_AGE_MONTHS)));
            }
            if !l.is_finite() || !(m.is_finite() && m > 0.0) || !(s.is_finite() && s > 0.0) {
                return Err(invalid(format!(
                    "invalid LMS at age {}: L={} M={} S={}",
                    row.age_months, l, m, s
                )));
            }
        }

        if rows.len() != ROWS_PER_SERIES {
            return Err(invalid(format!(
                "expected {} rows (ages 0..={}), found {}",
                ROWS_PER_SERIES,
                MAX_AGE_MONTHS,
                rows.len()
            )));
        }

        Ok(Self { rows })
    }

    pub fn rows(&self) -> &[GrowthReferenceRow] {
        &self.rows
    }

    pub fn get(&self, age_months: u32) -> Option<LmsParams> {
        self.rows
            .binary_search_by_key(&age_months, |r| r.age_months)
            .ok()
            .map(|idx| self.rows[idx].lms)
    }
}

/// All four reference series, keyed by (gender, metric)
#[derive(Debug, Clone)]
pub struct GrowthReferenceTable {
    series: FxHashMap<(Gender, Metric), ReferenceSeries>,
}

impl GrowthReferenceTable {
    /// Assemble a table from pre-validated series.
    ///
    /// # Errors
    /// `DataUnavailable` if any of the four (gender, metric) series is absent.
    pub fn from_series<I>(series: I) -> Result<Self>
    where
        I: IntoIterator<Item = ((Gender, Metric), ReferenceSeries)>,
    {
        let series: FxHashMap<_, _> = series.into_iter().collect();

        for gender in Gender::ALL {
            for metric in Metric::ALL {
                if !series.contains_key(&(gender, metric)) {
                    return Err(ScreeningError::DataUnavailable {
                        source_name: format!("{}_{}", metric.who_prefix(), gender.who_group()),
                        reason: "series missing from reference table".to_string(),
                    });
                }
            }
        }

        Ok(Self { series })
    }

    /// Load all four series from disk. Fails fast on the first unusable source.
    pub fn load(sources: &TableSources) -> Result<Self> {
        loader::load_table(sources)
    }

    /// Exact-age lookup; `None` when the table has no row for that age
    pub fn lookup(&self, gender: Gender, metric: Metric, age_months: u32) -> Option<LmsParams> {
        self.series.get(&(gender, metric))?.get(age_months)
    }

    pub fn series(&self, gender: Gender, metric: Metric) -> Option<&ReferenceSeries> {
        self.series.get(&(gender, metric))
    }
}
