//! Abstract profiles: per-modality feature snapshots
//!
//! The same type carries the habitual baseline ("Base Abstract") and the
//! momentary observation ("Current Abstract"), which keeps the overlap logic
//! of the differential engine symmetric.

use super::vector::FeatureVector;
use crate::error::{NepError, Result};
use crate::types::{FeatureKey, Modality, Timestamp};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// A snapshot of per-modality feature measurements at a point in time
///
/// # Invariants
///
/// - At least one active modality (checked by [`AbstractProfile::validate`])
/// - Every active modality has a feature vector (possibly empty)
///
/// Inactive modalities may still carry an empty vector after
/// [`AbstractProfile::padded`], so the profile has a fixed shape.
///
/// # Examples
///
/// ```
/// use nep_core::profile::{AbstractProfile, FeatureVector};
/// use nep_core::types::Modality;
///
/// let profile = AbstractProfile::builder()
///     .modality(
///         Modality::Text,
///         FeatureVector::from_pairs([("vocabulary-diversity", 0.4)]).unwrap(),
///     )
///     .build()
///     .unwrap();
///
/// assert!(profile.is_active(Modality::Text));
/// assert!(!profile.is_active(Modality::Audio));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "ProfileRepr")]
pub struct AbstractProfile {
    created_at: Timestamp,
    modalities: BTreeSet<Modality>,
    features: BTreeMap<Modality, FeatureVector>,
}

/// Wire form; `modalities` and `created_at` may be omitted by hand-written files
#[derive(Deserialize)]
struct ProfileRepr {
    #[serde(default = "crate::types::now")]
    created_at: Timestamp,
    #[serde(default)]
    modalities: Option<BTreeSet<Modality>>,
    #[serde(default)]
    features: BTreeMap<Modality, FeatureVector>,
}

impl From<ProfileRepr> for AbstractProfile {
    fn from(repr: ProfileRepr) -> Self {
        let mut features = repr.features;
        let modalities = repr
            .modalities
            .unwrap_or_else(|| features.keys().copied().collect());
        for modality in &modalities {
            features.entry(*modality).or_default();
        }
        Self {
            created_at: repr.created_at,
            modalities,
            features,
        }
    }
}

impl AbstractProfile {
    /// Build a profile from `(modality, vector)` pairs, stamped now
    ///
    /// # Errors
    ///
    /// Returns `InvalidProfile` if a modality appears twice or none are given.
    pub fn from_vectors<I>(vectors: I) -> Result<Self>
    where
        I: IntoIterator<Item = (Modality, FeatureVector)>,
    {
        vectors
            .into_iter()
            .fold(Self::builder(), |builder, (m, v)| builder.modality(m, v))
            .build()
    }

    pub fn builder() -> AbstractProfileBuilder {
        AbstractProfileBuilder::default()
    }

    /// Check structural validity
    pub fn validate(&self) -> Result<()> {
        if self.modalities.is_empty() {
            return Err(NepError::InvalidProfile(
                "profile has no active modalities".to_string(),
            ));
        }
        Ok(())
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    /// Active modalities in canonical order
    pub fn modalities(&self) -> impl Iterator<Item = Modality> + '_ {
        self.modalities.iter().copied()
    }

    pub fn is_active(&self, modality: Modality) -> bool {
        self.modalities.contains(&modality)
    }

    /// Feature vector for a modality, if the profile carries one
    pub fn vector(&self, modality: Modality) -> Option<&FeatureVector> {
        self.features.get(&modality)
    }

    /// Vectors of the active modalities in canonical order
    pub fn active_vectors(&self) -> impl Iterator<Item = (Modality, &FeatureVector)> + '_ {
        self.modalities
            .iter()
            .filter_map(|m| self.features.get(m).map(|v| (*m, v)))
    }

    /// Value of one feature on an active modality
    pub fn get(&self, key: &FeatureKey) -> Option<f64> {
        if !self.is_active(key.modality) {
            return None;
        }
        self.features.get(&key.modality)?.get(&key.name)
    }

    /// Every feature key on the active modalities, in canonical order
    pub fn feature_keys(&self) -> impl Iterator<Item = FeatureKey> + '_ {
        self.active_vectors()
            .flat_map(|(m, v)| v.names().map(move |name| FeatureKey::new(m, name)))
    }

    /// Copy of this profile with an explicit vector for every modality
    ///
    /// Absent modalities get an empty vector; the active set is unchanged.
    pub fn padded(&self) -> Self {
        let mut padded = self.clone();
        for modality in Modality::ALL {
            padded.features.entry(modality).or_default();
        }
        padded
    }
}

/// Builder for constructing profiles fluently
#[derive(Debug, Default)]
pub struct AbstractProfileBuilder {
    created_at: Option<Timestamp>,
    vectors: Vec<(Modality, FeatureVector)>,
}

impl AbstractProfileBuilder {
    /// Set the creation timestamp (defaults to now)
    pub fn created_at(mut self, at: Timestamp) -> Self {
        self.created_at = Some(at);
        self
    }

    /// Add an active modality with its feature vector
    pub fn modality(mut self, modality: Modality, vector: FeatureVector) -> Self {
        self.vectors.push((modality, vector));
        self
    }

    /// Build the profile
    ///
    /// # Errors
    ///
    /// Returns `InvalidProfile` on duplicate modalities or an empty profile.
    pub fn build(self) -> Result<AbstractProfile> {
        let mut modalities = BTreeSet::new();
        let mut features = BTreeMap::new();

        for (modality, vector) in self.vectors {
            if !modalities.insert(modality) {
                return Err(NepError::InvalidProfile(format!(
                    "modality {} supplied more than once",
                    modality
                )));
            }
            features.insert(modality, vector);
        }

        let profile = AbstractProfile {
            created_at: self.created_at.unwrap_or_else(crate::types::now),
            modalities,
            features,
        };

        // Validate before returning
        profile.validate()?;

        Ok(profile)
    }
}
