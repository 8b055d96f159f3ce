//! Deviation vector and coverage diagnostics

use super::aggregate::Aggregation;
use crate::normalizer::FallbackReason;
use crate::types::FeatureKey;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Why a feature present in one profile was left out of the comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    OnlyInBase,
    OnlyInCurrent,
}

/// A feature excluded from the deviation map
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedFeature {
    pub key: FeatureKey,
    pub reason: SkipReason,
}

/// A compared feature whose normalization fell back to 0.0
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnnormalizedFeature {
    pub key: FeatureKey,
    pub reason: FallbackReason,
}

/// Diagnostics of one `compute` call
///
/// Nothing is dropped silently: every feature of either profile is either
/// in the deviation map or listed in `skipped`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Coverage {
    pub compared: usize,
    pub skipped: Vec<SkippedFeature>,
    pub unnormalized: Vec<UnnormalizedFeature>,
}

impl Coverage {
    /// True when every compared feature was normalized and none were skipped
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty() && self.unnormalized.is_empty()
    }

    pub fn is_unnormalized(&self, key: &FeatureKey) -> bool {
        self.unnormalized.iter().any(|u| &u.key == key)
    }

    pub fn skip_reason(&self, key: &FeatureKey) -> Option<SkipReason> {
        self.skipped.iter().find(|s| &s.key == key).map(|s| s.reason)
    }
}

/// Per-feature signed deviations plus the aggregate ΔA
///
/// Produced only by [`crate::differential::DifferentialEngine::compute`];
/// read-only afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviationVector {
    entries: BTreeMap<FeatureKey, f64>,
    delta_a: f64,
    coverage: Coverage,
}

impl DeviationVector {
    pub(crate) fn new(entries: BTreeMap<FeatureKey, f64>, delta_a: f64, coverage: Coverage) -> Self {
        Self {
            entries,
            delta_a,
            coverage,
        }
    }

    /// Build a vector from precomputed entries, aggregating ΔA with `aggregation`
    ///
    /// Coverage is empty; use this for replaying stored deviations.
    pub fn from_entries<I>(entries: I, aggregation: &Aggregation) -> Self
    where
        I: IntoIterator<Item = (FeatureKey, f64)>,
    {
        let entries: BTreeMap<FeatureKey, f64> = entries.into_iter().collect();
        let delta_a = aggregation.aggregate(entries.values().copied());
        let coverage = Coverage {
            compared: entries.len(),
            ..Coverage::default()
        };
        Self::new(entries, delta_a, coverage)
    }

    /// Aggregate affective deviation ΔA (non-negative)
    pub fn delta_a(&self) -> f64 {
        self.delta_a
    }

    pub fn get(&self, key: &FeatureKey) -> Option<f64> {
        self.entries.get(key).copied()
    }

    /// Entries in canonical key order
    pub fn iter(&self) -> impl Iterator<Item = (&FeatureKey, f64)> {
        self.entries.iter().map(|(k, v)| (k, *v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn coverage(&self) -> &Coverage {
        &self.coverage
    }
}
