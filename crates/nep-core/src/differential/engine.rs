//! Differential Engine - Base vs Current deviation
//!
//! # Algorithm
//!
//! 1. Intersect the `(modality, feature)` pairs of both profiles' active
//!    modalities. One-sided features go to [`Coverage::skipped`].
//! 2. For each common feature, normalize both values under the same
//!    historical statistics and record `z_current - z_base`. Features on
//!    different native scales therefore contribute comparably.
//! 3. Aggregate the normalized entries into ΔA with the configured
//!    [`Aggregation`]. Fallback entries are recorded as 0.0 and listed in
//!    [`Coverage::unnormalized`] but do not dilute ΔA.
//! 4. An empty intersection is `InsufficientOverlap`.

use super::aggregate::Aggregation;
use super::deviation::{Coverage, DeviationVector, SkipReason, SkippedFeature, UnnormalizedFeature};
use crate::baseline::BaselineStore;
use crate::error::{NepError, Result};
use crate::normalizer::{Normalizer, NormalizerConfig};
use crate::profile::{AbstractProfile, FeatureVector};
use crate::types::{FeatureKey, Modality};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Configuration for deviation computation
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub normalizer: NormalizerConfig,
    pub aggregation: Aggregation,
}

impl EngineConfig {
    pub fn validate(&self) -> Result<()> {
        self.normalizer.validate()?;
        self.aggregation.validate()
    }
}

/// Computes deviation vectors against a read-only baseline store
///
/// The engine holds no mutable state; one instance can serve concurrent
/// calls when the store is `Sync`.
///
/// # Examples
///
/// ```
/// use nep_core::baseline::{FeatureStats, StatsTable};
/// use nep_core::differential::DifferentialEngine;
/// use nep_core::profile::{AbstractProfile, FeatureVector};
/// use nep_core::types::{FeatureKey, Modality};
///
/// let key = FeatureKey::new(Modality::Text, "lexical_diversity");
/// let stats = StatsTable::new().with(key.clone(), FeatureStats::new(0.40, 0.10, 50));
/// let engine = DifferentialEngine::new(stats);
///
/// let profile = |v: f64| {
///     let vector = FeatureVector::from_pairs([("lexical_diversity", v)]).unwrap();
///     AbstractProfile::from_vectors([(Modality::Text, vector)]).unwrap()
/// };
///
/// let deviation = engine.compute(&profile(0.40), &profile(0.85)).unwrap();
/// assert!((deviation.get(&key).unwrap() - 4.5).abs() < 1e-9);
/// assert!(deviation.delta_a() > 0.0);
/// ```
#[derive(Debug, Clone)]
pub struct DifferentialEngine<S> {
    store: S,
    normalizer: Normalizer,
    aggregation: Aggregation,
}

impl<S: BaselineStore> DifferentialEngine<S> {
    /// Create an engine with default configuration
    pub fn new(store: S) -> Self {
        Self::with_config(store, EngineConfig::default())
    }

    /// Create with custom configuration
    pub fn with_config(store: S, config: EngineConfig) -> Self {
        Self {
            store,
            normalizer: Normalizer::new(config.normalizer),
            aggregation: config.aggregation,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn aggregation(&self) -> &Aggregation {
        &self.aggregation
    }

    /// Compute the deviation of `current` from `base`
    ///
    /// # Errors
    ///
    /// - `InvalidProfile` if either profile has no active modalities
    /// - `InsufficientOverlap` if no `(modality, feature)` pair is shared
    pub fn compute(&self, base: &AbstractProfile, current: &AbstractProfile) -> Result<DeviationVector> {
        base.validate()?;
        current.validate()?;

        let mut entries = BTreeMap::new();
        let mut normalized = Vec::new();
        let mut coverage = Coverage::default();

        for modality in Modality::ALL {
            match (active(base, modality), active(current, modality)) {
                (Some(b), Some(c)) => {
                    self.compare_modality(modality, b, c, &mut entries, &mut normalized, &mut coverage)
                }
                (Some(b), None) => skip_all(modality, b, SkipReason::OnlyInBase, &mut coverage),
                (None, Some(c)) => skip_all(modality, c, SkipReason::OnlyInCurrent, &mut coverage),
                (None, None) => {}
            }
        }

        if entries.is_empty() {
            return Err(NepError::InsufficientOverlap {
                base: base.modalities().collect(),
                current: current.modalities().collect(),
            });
        }

        coverage.compared = entries.len();
        let delta_a = saturate(self.aggregation.aggregate(normalized));

        tracing::debug!(
            compared = coverage.compared,
            skipped = coverage.skipped.len(),
            unnormalized = coverage.unnormalized.len(),
            delta_a,
            "deviation computed"
        );

        Ok(DeviationVector::new(entries, delta_a, coverage))
    }

    fn compare_modality(
        &self,
        modality: Modality,
        base: &FeatureVector,
        current: &FeatureVector,
        entries: &mut BTreeMap<FeatureKey, f64>,
        normalized: &mut Vec<f64>,
        coverage: &mut Coverage,
    ) {
        for (name, b) in base.iter() {
            let key = FeatureKey::new(modality, name);
            let Some(c) = current.get(name) else {
                tracing::debug!(feature = %key, "feature only in base");
                coverage.skipped.push(SkippedFeature {
                    key,
                    reason: SkipReason::OnlyInBase,
                });
                continue;
            };

            let stats = self.store.historical_stats(&key);
            match self.normalizer.check(stats.as_ref()) {
                Err(reason) => {
                    tracing::debug!(feature = %key, %reason, "normalization fallback");
                    coverage.unnormalized.push(UnnormalizedFeature {
                        key: key.clone(),
                        reason,
                    });
                    entries.insert(key, 0.0);
                }
                Ok(stats) => {
                    // z(c) - z(b) taken as one quotient: both z-scores may
                    // overflow to the same infinity, their difference cannot
                    let d = saturate((c - b) / stats.std_dev);
                    normalized.push(d);
                    entries.insert(key, d);
                }
            }
        }

        for name in current.names().filter(|n| !base.contains(n)) {
            let key = FeatureKey::new(modality, name);
            tracing::debug!(feature = %key, "feature only in current");
            coverage.skipped.push(SkippedFeature {
                key,
                reason: SkipReason::OnlyInCurrent,
            });
        }
    }
}

/// Pin overflowed values to the largest finite magnitude
fn saturate(x: f64) -> f64 {
    if x.is_nan() {
        0.0
    } else {
        x.clamp(f64::MIN, f64::MAX)
    }
}

fn active(profile: &AbstractProfile, modality: Modality) -> Option<&FeatureVector> {
    if profile.is_active(modality) {
        profile.vector(modality)
    } else {
        None
    }
}

fn skip_all(modality: Modality, vector: &FeatureVector, reason: SkipReason, coverage: &mut Coverage) {
    for name in vector.names() {
        coverage.skipped.push(SkippedFeature {
            key: FeatureKey::new(modality, name),
            reason,
        });
    }
}
