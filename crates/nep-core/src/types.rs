//! Core types for NEP
//!
//! This module defines the fundamental types used across NEP:
//! - Modalities and feature keys
//! - Timestamps
//! - Hashes

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Input channel a feature vector was measured on
///
/// The derived ordering (text < audio < video) is the canonical order used
/// whenever modalities are iterated or serialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Modality {
    Text,
    Audio,
    /// Reserved for a future micro-expression analyzer
    Video,
}

impl Modality {
    /// Every modality, in canonical order
    pub const ALL: [Modality; 3] = [Modality::Text, Modality::Audio, Modality::Video];

    pub fn as_str(self) -> &'static str {
        match self {
            Modality::Text => "text",
            Modality::Audio => "audio",
            Modality::Video => "video",
        }
    }
}

impl fmt::Display for Modality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Modality {
    type Err = crate::error::NepError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(Modality::Text),
            "audio" => Ok(Modality::Audio),
            "video" => Ok(Modality::Video),
            other => Err(crate::error::NepError::Config(format!(
                "unknown modality '{}'",
                other
            ))),
        }
    }
}

/// A feature identified by the modality it belongs to and its name
///
/// Names are unique within a modality only, so the pair is the unit of
/// comparison between profiles. Renders as `modality:name`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FeatureKey {
    pub modality: Modality,
    pub name: String,
}

impl FeatureKey {
    pub fn new(modality: Modality, name: impl Into<String>) -> Self {
        Self {
            modality,
            name: name.into(),
        }
    }
}

impl fmt::Display for FeatureKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.modality, self.name)
    }
}

impl FromStr for FeatureKey {
    type Err = crate::error::NepError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (modality, name) = s.split_once(':').ok_or_else(|| {
            crate::error::NepError::Config(format!("feature key '{}' is not modality:name", s))
        })?;
        if name.is_empty() {
            return Err(crate::error::NepError::Config(format!(
                "feature key '{}' has an empty name",
                s
            )));
        }
        Ok(Self::new(modality.parse()?, name))
    }
}

// Keys serialize as their string form so they can be JSON object keys.
impl Serialize for FeatureKey {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for FeatureKey {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Timestamp type alias
pub type Timestamp = DateTime<Utc>;

/// Create a timestamp for the current moment
pub fn now() -> Timestamp {
    Utc::now()
}

/// Blake3 hash wrapper
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Blake3Hash([u8; 32]);

impl Blake3Hash {
    pub fn new(bytes: [u8; 32]) -> Self { Self(bytes) }
    pub fn of(data: &[u8]) -> Self { blake3::hash(data).into() }
    pub fn to_hex(&self) -> String { hex::encode(self.0) }
    pub fn from_hex(s: &str) -> Result<Self, hex::FromHexError> {
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(s, &mut bytes)?;
        Ok(Self(bytes))
    }
}

impl From<blake3::Hash> for Blake3Hash {
    fn from(hash: blake3::Hash) -> Self {
        Self(*hash.as_bytes())
    }
}

impl fmt::Display for Blake3Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}
