//! Building statistics tables from a history of profiles
//!
//! Uses Welford's online update so a long history never has to be held in
//! memory and the variance stays numerically stable.

use super::store::{FeatureStats, StatsTable};
use crate::profile::AbstractProfile;
use crate::types::FeatureKey;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, Default)]
struct Running {
    count: u64,
    mean: f64,
    m2: f64,
}

impl Running {
    fn push(&mut self, value: f64) {
        self.count += 1;
        let delta = value - self.mean;
        self.mean += delta / self.count as f64;
        self.m2 += delta * (value - self.mean);
    }

    /// Sample standard deviation (n - 1); zero below two samples
    fn std_dev(&self) -> f64 {
        if self.count < 2 {
            0.0
        } else {
            (self.m2 / (self.count - 1) as f64).sqrt()
        }
    }
}

/// Online accumulator of per-feature statistics
///
/// # Examples
///
/// ```
/// use nep_core::baseline::{BaselineStore, StatsAccumulator};
/// use nep_core::profile::{AbstractProfile, FeatureVector};
/// use nep_core::types::{FeatureKey, Modality};
///
/// let mut acc = StatsAccumulator::new();
/// for value in [0.3, 0.4, 0.5] {
///     let vector = FeatureVector::from_pairs([("vocabulary-diversity", value)]).unwrap();
///     acc.observe(&AbstractProfile::from_vectors([(Modality::Text, vector)]).unwrap());
/// }
///
/// let table = acc.finish();
/// let stats = table
///     .historical_stats(&FeatureKey::new(Modality::Text, "vocabulary-diversity"))
///     .unwrap();
/// assert_eq!(stats.sample_count, 3);
/// assert!((stats.mean - 0.4).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Default)]
pub struct StatsAccumulator {
    running: BTreeMap<FeatureKey, Running>,
}

impl StatsAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one observation of a single feature
    pub fn push(&mut self, key: FeatureKey, value: f64) {
        if value.is_finite() {
            self.running.entry(key).or_default().push(value);
        }
    }

    /// Add every feature of a profile's active modalities
    pub fn observe(&mut self, profile: &AbstractProfile) {
        for (modality, vector) in profile.active_vectors() {
            for (name, value) in vector.iter() {
                self.push(FeatureKey::new(modality, name), value);
            }
        }
    }

    /// Number of distinct features seen so far
    pub fn feature_count(&self) -> usize {
        self.running.len()
    }

    /// Freeze the accumulated statistics into a table
    pub fn finish(&self) -> StatsTable {
        self.running
            .iter()
            .map(|(key, r)| (key.clone(), FeatureStats::new(r.mean, r.std_dev(), r.count)))
            .collect()
    }
}

impl<'a> Extend<&'a AbstractProfile> for StatsAccumulator {
    fn extend<I: IntoIterator<Item = &'a AbstractProfile>>(&mut self, iter: I) {
        for profile in iter {
            self.observe(profile);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::baseline::BaselineStore;
    use crate::types::Modality;

    fn key() -> FeatureKey {
        FeatureKey::new(Modality::Audio, "intensity.mean_db")
    }

    #[test]
    fn test_sample_std_dev() {
        let mut acc = StatsAccumulator::new();
        for value in [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0] {
            acc.push(key(), value);
        }
        let stats = acc.finish().historical_stats(&key()).unwrap();

        assert_eq!(stats.sample_count, 8);
        assert!((stats.mean - 5.0).abs() < 1e-12);
        // population sd is 2.0, sample sd is sqrt(32/7)
        assert!((stats.std_dev - (32.0_f64 / 7.0).sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_single_sample_has_zero_spread() {
        let mut acc = StatsAccumulator::new();
        acc.push(key(), 60.0);
        let stats = acc.finish().historical_stats(&key()).unwrap();
        assert_eq!(stats.std_dev, 0.0);
        assert_eq!(stats.sample_count, 1);
    }

    #[test]
    fn test_non_finite_ignored() {
        let mut acc = StatsAccumulator::new();
        acc.push(key(), f64::NAN);
        assert_eq!(acc.feature_count(), 0);
    }

    #[test]
    fn test_inactive_modalities_not_observed() {
        let profile = AbstractProfile::from_vectors([(
            Modality::Text,
            crate::profile::FeatureVector::from_pairs([("a", 1.0)]).unwrap(),
        )])
        .unwrap()
        .padded();

        let mut acc = StatsAccumulator::new();
        acc.extend([&profile, &profile]);

        let table = acc.finish();
        assert_eq!(table.len(), 1);
        assert_eq!(
            table
                .historical_stats(&FeatureKey::new(Modality::Text, "a"))
                .unwrap()
                .sample_count,
            2
        );
    }
}
