//! Error types for NEP Core
//!
//! This module defines all error types used throughout the NEP core engine.
//! We use `thiserror` for ergonomic error definitions with automatic Display/Error implementations.
//!
//! A normalization fallback is deliberately absent here: it is a recorded,
//! non-fatal condition and lives in [`crate::differential::Coverage`].

use crate::types::Modality;
use thiserror::Error;

/// Result type alias for NEP operations
pub type Result<T> = std::result::Result<T, NepError>;

/// Main error type for NEP operations
#[derive(Error, Debug)]
pub enum NepError {
    /// Base and Current share no comparable (modality, feature) pair
    #[error("Insufficient overlap: base modalities {base:?} and current modalities {current:?} share no features")]
    InsufficientOverlap {
        base: Vec<Modality>,
        current: Vec<Modality>,
    },

    /// Token assembly errors
    #[error("Assembly error: {0}")]
    Assembly(#[from] AssemblyError),

    /// Structurally invalid profile
    #[error("Invalid profile: {0}")]
    InvalidProfile(String),

    /// A feature value that is NaN or infinite
    #[error("Feature {key} has non-finite value {value}")]
    NonFiniteFeature { key: String, value: f64 },

    /// An external analyzer reported a failure
    #[error("{modality} analyzer failed: {reason}")]
    AnalyzerFailed { modality: Modality, reason: String },

    /// Raw input of a kind the analyzer cannot handle
    #[error("{modality} analyzer does not accept {input} input")]
    UnsupportedInput {
        modality: Modality,
        input: &'static str,
    },

    /// Invalid configuration value
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing errors
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        source: Box<NepError>,
    },
}

/// Errors raised while packaging an EToken
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AssemblyError {
    #[error("base profile has no active modalities")]
    EmptyBase,

    #[error("current profile has no active modalities")]
    EmptyCurrent,
}

impl NepError {
    /// Add context to an error
    pub fn context(self, context: impl Into<String>) -> Self {
        Self::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Walk through context wrappers to the underlying error
    pub fn root(&self) -> &NepError {
        match self {
            Self::WithContext { source, .. } => source.root(),
            other => other,
        }
    }
}

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to a Result
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add lazy context to a Result
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E: Into<NepError>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.into().context(context))
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| e.into().context(f()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_context() {
        let err = NepError::from(AssemblyError::EmptyBase);
        let err = err.context("Failed to assemble token");

        assert!(err.to_string().contains("Failed to assemble token"));
        assert!(err.to_string().contains("base profile has no active modalities"));
    }

    #[test]
    fn test_result_ext() {
        let result: Result<()> = Err(NepError::Config("clip must be positive".into()));
        let result = result.context("Loading config");

        let err = result.unwrap_err();
        assert!(err.to_string().contains("Loading config"));
        assert!(matches!(err.root(), NepError::Config(_)));
    }

    #[test]
    fn test_overlap_message_names_modalities() {
        let err = NepError::InsufficientOverlap {
            base: vec![Modality::Audio],
            current: vec![Modality::Text],
        };
        let msg = err.to_string();
        assert!(msg.contains("Audio"));
        assert!(msg.contains("Text"));
    }
}
