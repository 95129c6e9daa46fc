//! Engine Configuration
//!
//! JSON-loadable settings for table locations, the CSV dialect, an
//! optional replacement rule base and the classifier bands. Every field
//! has a default, so a partial file is enough.

use crate::classify::Thresholds;
use crate::error::{Result, ScreeningError};
use crate::fuzzy::{stunting, FuzzySystem};
use crate::reference::TableSources;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub tables: TableSources,
    /// JSON fuzzy system replacing the built-in rule base
    pub fuzzy_system: Option<PathBuf>,
    pub thresholds: Thresholds,
}

impl EngineConfig {
    /// Load configuration from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))
            .map_err(|e| ScreeningError::Config(format!("{:#}", e)))?;

        let config: EngineConfig = serde_json::from_str(&contents)
            .map_err(|e| ScreeningError::Config(format!("Failed to parse config JSON {:?}: {}", path, e)))?;

        config.thresholds.validate()?;
        Ok(config)
    }

    pub fn with_data_dir(mut self, data_dir: impl Into<PathBuf>) -> Self {
        self.tables.data_dir = data_dir.into();
        self
    }

    /// Configured rule base, or the reference one
    pub fn resolve_fuzzy_system(&self) -> Result<FuzzySystem> {
        match &self.fuzzy_system {
            Some(path) => {
                tracing::info!("Loading fuzzy system: {:?}", path);
                FuzzySystem::load(path)
            }
            None => Ok(stunting::reference_system()),
        }
    }
}
