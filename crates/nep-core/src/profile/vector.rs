//! Feature vectors produced by external analyzers

use crate::error::{NepError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Named, ordered mapping from feature-name to a finite scalar
///
/// A name that is absent means "not computed", which is different from a
/// measured zero. Values are always finite: NaN and infinities are rejected
/// at the boundary so nothing downstream has to guard against them.
///
/// # Examples
///
/// ```
/// use nep_core::profile::FeatureVector;
///
/// let vector = FeatureVector::from_pairs([
///     ("vocabulary-diversity", 0.42),
///     ("slang-rate", 0.05),
/// ]).unwrap();
///
/// assert_eq!(vector.get("slang-rate"), Some(0.05));
/// assert_eq!(vector.get("emoji-rate"), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<String, f64>", into = "BTreeMap<String, f64>")]
pub struct FeatureVector {
    values: BTreeMap<String, f64>,
}

impl FeatureVector {
    /// Create an empty vector
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a vector from `(name, value)` pairs
    pub fn from_pairs<I, K>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, f64)>,
        K: Into<String>,
    {
        let mut vector = Self::new();
        for (name, value) in pairs {
            vector.insert(name, value)?;
        }
        Ok(vector)
    }

    /// Insert or replace a feature value
    ///
    /// # Errors
    ///
    /// Returns `NonFiniteFeature` for NaN or infinite values.
    pub fn insert(&mut self, name: impl Into<String>, value: f64) -> Result<()> {
        let name = name.into();
        if !value.is_finite() {
            return Err(NepError::NonFiniteFeature { key: name, value });
        }
        self.values.insert(name, value);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Feature names in sorted order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// `(name, value)` pairs in sorted order
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl TryFrom<BTreeMap<String, f64>> for FeatureVector {
    type Error = NepError;

    fn try_from(values: BTreeMap<String, f64>) -> Result<Self> {
        Self::from_pairs(values)
    }
}

impl From<FeatureVector> for BTreeMap<String, f64> {
    fn from(vector: FeatureVector) -> Self {
        vector.values
    }
}
