//! Historical statistics consulted by the normalizer
//!
//! The store is a read-only collaborator: the core asks it for
//! `(mean, std_dev, sample_count)` per feature and never writes back.
//! How the numbers are persisted is the owner's business.

use crate::error::{NepError, Result, ResultExt};
use crate::types::FeatureKey;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

/// Historical statistics for one feature
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureStats {
    pub mean: f64,
    pub std_dev: f64,
    pub sample_count: u64,
}

impl FeatureStats {
    pub fn new(mean: f64, std_dev: f64, sample_count: u64) -> Self {
        Self {
            mean,
            std_dev,
            sample_count,
        }
    }
}

/// Read-only source of per-feature historical statistics
pub trait BaselineStore: Send + Sync {
    /// Statistics on record for a feature, or `None` if it has no history
    fn historical_stats(&self, key: &FeatureKey) -> Option<FeatureStats>;
}

impl<S: BaselineStore + ?Sized> BaselineStore for &S {
    fn historical_stats(&self, key: &FeatureKey) -> Option<FeatureStats> {
        (**self).historical_stats(key)
    }
}

impl<S: BaselineStore + ?Sized> BaselineStore for Arc<S> {
    fn historical_stats(&self, key: &FeatureKey) -> Option<FeatureStats> {
        (**self).historical_stats(key)
    }
}

/// In-memory statistics table
///
/// Serializes as a JSON object keyed by `modality:name`:
///
/// ```json
/// { "text:vocabulary-diversity": { "mean": 0.4, "std_dev": 0.1, "sample_count": 50 } }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatsTable {
    entries: BTreeMap<FeatureKey, FeatureStats>,
}

impl StatsTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record statistics for a feature, replacing any previous entry
    pub fn insert(&mut self, key: FeatureKey, stats: FeatureStats) {
        self.entries.insert(key, stats);
    }

    /// Builder-style variant of [`StatsTable::insert`]
    pub fn with(mut self, key: FeatureKey, stats: FeatureStats) -> Self {
        self.insert(key, stats);
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&FeatureKey, &FeatureStats)> {
        self.entries.iter()
    }

    /// Parse a table from JSON
    pub fn from_json_str(content: &str) -> Result<Self> {
        let table: Self = serde_json::from_str(content)?;
        table.validate()?;
        Ok(table)
    }

    /// Load a table from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Reading stats table {}", path.display()))?;
        Self::from_json_str(&content)
            .with_context(|| format!("Parsing stats table {}", path.display()))
    }

    /// Serialize to pretty JSON
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    fn validate(&self) -> Result<()> {
        for (key, stats) in &self.entries {
            if !stats.mean.is_finite() || !stats.std_dev.is_finite() || stats.std_dev < 0.0 {
                return Err(NepError::Config(format!(
                    "stats for {} must have a finite mean and a finite, non-negative std_dev",
                    key
                )));
            }
        }
        Ok(())
    }
}

impl BaselineStore for StatsTable {
    fn historical_stats(&self, key: &FeatureKey) -> Option<FeatureStats> {
        self.entries.get(key).copied()
    }
}

impl FromIterator<(FeatureKey, FeatureStats)> for StatsTable {
    fn from_iter<I: IntoIterator<Item = (FeatureKey, FeatureStats)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
