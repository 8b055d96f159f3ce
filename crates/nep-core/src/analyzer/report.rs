//! Flattening analyzer JSON reports into feature vectors
//!
//! External analyzers report nested JSON such as
//!
//! ```json
//! { "pitch": { "mean_f0_hz": 182.4, "stdev_f0_hz": null },
//!   "timbre": { "spectral_centroid_vectors": [12.1, -3.4] },
//!   "accent": "HEURISTIC_REQUIRED" }
//! ```
//!
//! which flattens to `pitch.mean_f0_hz`, `timbre.spectral_centroid_vectors[0]`
//! and `timbre.spectral_centroid_vectors[1]`. Nulls, strings and booleans are
//! "not computed" and produce no feature.

use super::{Analyzer, RawInput};
use crate::error::{NepError, Result, ResultExt};
use crate::profile::FeatureVector;
use crate::types::Modality;
use serde_json::Value;

/// Flatten a report into a feature vector
///
/// # Errors
///
/// - `AnalyzerFailed` if the report is one of the failure shapes analyzers
///   emit: `{"error": ...}` or `{"status": "failed", "reason": ...}`
/// - `AnalyzerFailed` if the report is not a JSON object
pub fn flatten_report(modality: Modality, report: &Value) -> Result<FeatureVector> {
    let Value::Object(map) = report else {
        return Err(NepError::AnalyzerFailed {
            modality,
            reason: "report is not a JSON object".to_string(),
        });
    };

    if let Some(error) = map.get("error") {
        return Err(NepError::AnalyzerFailed {
            modality,
            reason: describe(error),
        });
    }
    if map.get("status").and_then(Value::as_str) == Some("failed") {
        return Err(NepError::AnalyzerFailed {
            modality,
            reason: map.get("reason").map(describe).unwrap_or_else(|| "unknown".into()),
        });
    }

    let mut vector = FeatureVector::new();
    for (name, value) in map {
        flatten_into(name.clone(), value, &mut vector)?;
    }
    Ok(vector)
}

fn flatten_into(path: String, value: &Value, out: &mut FeatureVector) -> Result<()> {
    match value {
        Value::Number(n) => {
            if let Some(v) = n.as_f64() {
                out.insert(path, v)?;
            }
        }
        Value::Object(map) => {
            for (name, inner) in map {
                flatten_into(format!("{}.{}", path, name), inner, out)?;
            }
        }
        Value::Array(items) => {
            for (i, inner) in items.iter().enumerate() {
                flatten_into(format!("{}[{}]", path, i), inner, out)?;
            }
        }
        Value::Null | Value::Bool(_) | Value::String(_) => {}
    }
    Ok(())
}

fn describe(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Adapter for analyzers whose output is already a JSON report
///
/// Accepts `RawInput::Report` directly or `RawInput::File` pointing at a
/// saved report.
#[derive(Debug, Clone, Copy)]
pub struct ReportAnalyzer {
    modality: Modality,
}

impl ReportAnalyzer {
    pub fn new(modality: Modality) -> Self {
        Self { modality }
    }
}

impl Analyzer for ReportAnalyzer {
    fn modality(&self) -> Modality {
        self.modality
    }

    fn extract(&self, raw: &RawInput) -> Result<FeatureVector> {
        match raw {
            RawInput::Report(report) => flatten_report(self.modality, report),
            RawInput::File(path) => {
                let content = std::fs::read_to_string(path)
                    .with_context(|| format!("Reading {} report {}", self.modality, path.display()))?;
                let report: Value = serde_json::from_str(&content)?;
                flatten_report(self.modality, &report)
            }
            RawInput::Text(_) => Err(NepError::UnsupportedInput {
                modality: self.modality,
                input: raw.kind(),
            }),
        }
    }
}
