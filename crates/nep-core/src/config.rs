//! NEP configuration
//!
//! All tunables of the pipeline in one TOML document:
//!
//! ```toml
//! [normalizer]
//! min_samples = 5
//! min_std_dev = 1e-9
//!
//! [aggregation]
//! method = "clipped_rms"
//! clip = 3.0
//!
//! [mapping]
//! bound = 1.0
//!
//! [[mapping.rule]]
//! modality = "text"
//! feature = "slang-rate"
//! axis = "a"
//! weight = 0.15
//! ```
//!
//! Every section is optional and falls back to its default.

use crate::differential::{Aggregation, EngineConfig};
use crate::error::{Result, ResultExt};
use crate::jastv::MappingTable;
use crate::normalizer::NormalizerConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NepConfig {
    pub normalizer: NormalizerConfig,
    pub aggregation: Aggregation,
    pub mapping: MappingTable,
}

impl NepConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_normalizer(mut self, normalizer: NormalizerConfig) -> Self {
        self.normalizer = normalizer;
        self
    }

    pub fn with_aggregation(mut self, aggregation: Aggregation) -> Self {
        self.aggregation = aggregation;
        self
    }

    pub fn with_mapping(mut self, mapping: MappingTable) -> Self {
        self.mapping = mapping;
        self
    }

    /// Engine part of the configuration
    pub fn engine(&self) -> EngineConfig {
        EngineConfig {
            normalizer: self.normalizer,
            aggregation: self.aggregation,
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.engine().validate()?;
        self.mapping.validate()
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Reading config {}", path.display()))?;
        Self::from_toml_str(&content).with_context(|| format!("Parsing config {}", path.display()))
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| crate::error::NepError::Config(e.to_string()))
    }
}
