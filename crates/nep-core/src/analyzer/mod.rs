//! Analyzer boundary
//!
//! Feature extraction lives outside the core. Each analyzer (text, audio,
//! a future video analyzer) is a variant of the single [`Analyzer`]
//! capability; the core depends only on the trait and never inspects raw
//! input itself.

pub mod command;
pub mod report;

pub use command::CommandAnalyzer;
pub use report::{flatten_report, ReportAnalyzer};

use crate::error::Result;
use crate::profile::FeatureVector;
use crate::types::Modality;
use std::path::PathBuf;

/// Raw input handed to an analyzer
#[derive(Debug, Clone, PartialEq)]
pub enum RawInput {
    /// Text to analyze
    Text(String),
    /// A media or report file on disk
    File(PathBuf),
    /// A report the analyzer already produced
    Report(serde_json::Value),
}

impl RawInput {
    pub fn kind(&self) -> &'static str {
        match self {
            RawInput::Text(_) => "text",
            RawInput::File(_) => "file",
            RawInput::Report(_) => "report",
        }
    }
}

/// Extracts a feature vector for one modality from raw input
pub trait Analyzer: Send + Sync {
    /// Modality this analyzer measures
    fn modality(&self) -> Modality;

    /// Produce a completed feature vector
    fn extract(&self, raw: &RawInput) -> Result<FeatureVector>;
}
