//! Mamdani Fuzzy Inference
//!
//! - `membership`: membership functions and linguistic variables
//! - `rules`: rule data, compiled rule engine, aggregation
//! - `defuzzify`: centroid reduction with a defined empty-set fallback
//! - `system`: declarative system definition (JSON loadable)
//! - `stunting`: the reference height/weight rule base

pub mod defuzzify;
pub mod membership;
pub mod rules;
pub mod stunting;
pub mod system;

pub use defuzzify::{DefuzzMethod, Defuzzifier, DEGENERATE_FALLBACK_SCORE};
pub use membership::{LinguisticVariable, MembershipFunction, Term};
pub use rules::{AggregatedOutputSet, Antecedent, Consequent, Rule, RuleEngine};
pub use system::FuzzySystem;
