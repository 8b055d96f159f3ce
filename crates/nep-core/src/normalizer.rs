//! Z-score normalization against historical statistics
//!
//! Every feature is rescaled independently onto `(value - mean) / std_dev`.
//! When the history is too thin to trust, the normalizer does not divide:
//! it returns a [`Normalized::Fallback`] that contributes 0.0 and tells the
//! caller why.

use crate::baseline::FeatureStats;
use crate::error::{NepError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Thresholds that decide when history is sufficient
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizerConfig {
    /// Minimum number of historical samples backing the statistics
    pub min_samples: u64,

    /// Standard deviations at or below this value are treated as degenerate
    pub min_std_dev: f64,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            min_samples: 5,
            min_std_dev: 1e-9,
        }
    }
}

impl NormalizerConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.min_std_dev.is_finite() || self.min_std_dev < 0.0 {
            return Err(NepError::Config(format!(
                "normalizer.min_std_dev must be finite and >= 0, got {}",
                self.min_std_dev
            )));
        }
        Ok(())
    }
}

/// Why a feature could not be normalized
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackReason {
    /// The baseline store has no statistics for the feature
    NoHistory,
    /// Fewer samples than `min_samples`
    InsufficientSamples,
    /// Standard deviation at or below `min_std_dev`, or not finite
    DegenerateStdDev,
}

impl fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FallbackReason::NoHistory => "no history",
            FallbackReason::InsufficientSamples => "insufficient samples",
            FallbackReason::DegenerateStdDev => "degenerate std-dev",
        };
        f.write_str(s)
    }
}

/// Outcome of normalizing one value
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Normalized {
    Score(f64),
    Fallback(FallbackReason),
}

impl Normalized {
    /// Numeric contribution; fallbacks contribute 0.0
    pub fn value(self) -> f64 {
        match self {
            Normalized::Score(z) => z,
            Normalized::Fallback(_) => 0.0,
        }
    }

    pub fn fallback(self) -> Option<FallbackReason> {
        match self {
            Normalized::Score(_) => None,
            Normalized::Fallback(reason) => Some(reason),
        }
    }
}

/// Per-feature z-score normalizer
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Normalizer {
    config: NormalizerConfig,
}

impl Normalizer {
    pub fn new(config: NormalizerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &NormalizerConfig {
        &self.config
    }

    /// Decide whether statistics are usable, without touching a value
    pub fn check(&self, stats: Option<&FeatureStats>) -> std::result::Result<FeatureStats, FallbackReason> {
        let stats = stats.ok_or(FallbackReason::NoHistory)?;
        if stats.sample_count < self.config.min_samples {
            return Err(FallbackReason::InsufficientSamples);
        }
        // Inclusive: a std-dev exactly at the threshold falls back.
        if !stats.std_dev.is_finite() || stats.std_dev <= self.config.min_std_dev {
            return Err(FallbackReason::DegenerateStdDev);
        }
        if !stats.mean.is_finite() {
            return Err(FallbackReason::NoHistory);
        }
        Ok(*stats)
    }

    /// Z-score of `value` under `stats`
    pub fn normalize(&self, value: f64, stats: Option<&FeatureStats>) -> Normalized {
        match self.check(stats) {
            Ok(stats) => Normalized::Score((value - stats.mean) / stats.std_dev),
            Err(reason) => Normalized::Fallback(reason),
        }
    }
}
