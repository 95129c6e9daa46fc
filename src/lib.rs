//! Growth Screening Engine
//!
//! Screens child growth measurements for stunting risk: WHO LMS z-scores
//! feed a Mamdani fuzzy rule base whose centroid is mapped to a risk
//! category with fixed advice.
//!
//! - `reference/`: WHO LMS tables, loaded once with Polars
//! - `zscore`: LMS transform with the neutral unknown-age policy
//! - `fuzzy/`: membership functions, rule engine, defuzzification
//! - `classify`: score bands and advice
//! - `screening`: the composed, thread-safe engine
//! - `intake` / `config`: collaborator-facing validation and settings

pub mod classify;
pub mod config;
pub mod error;
pub mod fuzzy;
pub mod intake;
pub mod reference;
pub mod screening;
pub mod zscore;

// Re-export commonly used types
pub use classify::{Category, Classification, Classifier, Thresholds};
pub use config::EngineConfig;
pub use error::ScreeningError;
pub use fuzzy::{AggregatedOutputSet, Defuzzifier, FuzzySystem, LinguisticVariable, MembershipFunction, RuleEngine};
pub use intake::{Age, AgeUnit, Measurement, ScreeningRequest};
pub use reference::{Gender, GrowthReferenceRow, GrowthReferenceTable, LmsParams, Metric};
pub use screening::{InferenceResult, ScoreSource, Screener};
pub use zscore::ZScoreCalculator;
