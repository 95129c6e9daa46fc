//! Error types for the screening engine
//!
//! Only table loading and configuration can fail. Everything on the
//! per-call path recovers locally (unknown age, degenerate inference).

use thiserror::Error;

/// Errors surfaced at the crate boundary
#[derive(Debug, Error)]
pub enum ScreeningError {
    /// A required reference table could not be located or parsed.
    /// Fatal: the engine is never constructed without all four tables.
    #[error("reference data unavailable ({source_name}): {reason}")]
    DataUnavailable { source_name: String, reason: String },

    /// Input rejected before it reaches the engine (age range, measurements)
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Fuzzy system definition is inconsistent (bad breakpoints, unknown labels)
    #[error("invalid fuzzy system: {0}")]
    InvalidFuzzySystem(String),

    #[error("configuration error: {0}")]
    Config(String),
}

impl ScreeningError {
    /// Wrap an anyhow chain as `DataUnavailable`, keeping every context layer
    pub(crate) fn data_unavailable(source_name: impl Into<String>, err: anyhow::Error) -> Self {
        ScreeningError::DataUnavailable {
            source_name: source_name.into(),
            reason: format!("{:#}", err),
        }
    }
}

pub type Result<T, E = ScreeningError> = std::result::Result<T, E>;
