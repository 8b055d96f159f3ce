//! Canonical serialization of the emotion header
//!
//! The header is a versioned contract with downstream consumers. Version 1:
//!
//! ```text
//! [DELTA_A v1 {"delta_a":3.000000,"jastv":[0.900000,0.000000,0.000000,0.000000]}]
//! ```
//!
//! Keys appear in that order, every number has exactly six decimals, and
//! negative zero is written as `0.000000`. Identical inputs therefore give
//! byte-identical headers.

use crate::error::{NepError, Result};
use crate::jastv::JastvProjection;
use serde::Deserialize;
use std::fmt::Write;

/// Current emotion-schema version
pub const EMOTION_SCHEMA_VERSION: u32 = 1;

const PREFIX: &str = "[DELTA_A v";
const DECIMALS: i32 = 6;

/// The structured content of an emotion header
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EmotionHeader {
    pub version: u32,
    pub delta_a: f64,
    pub jastv: [f64; 4],
}

#[derive(Deserialize)]
struct HeaderBody {
    delta_a: f64,
    jastv: [f64; 4],
}

impl EmotionHeader {
    pub fn new(delta_a: f64, projection: &JastvProjection) -> Self {
        Self {
            version: EMOTION_SCHEMA_VERSION,
            delta_a,
            jastv: projection.as_array(),
        }
    }

    /// Render the canonical header text
    pub fn render(&self) -> String {
        let mut out = String::with_capacity(96);
        let _ = write!(
            out,
            "{}{} {{\"delta_a\":{},\"jastv\":[",
            PREFIX,
            self.version,
            number(self.delta_a)
        );
        for (i, v) in self.jastv.iter().enumerate() {
            if i > 0 {
                out.push(',');
            }
            out.push_str(&number(*v));
        }
        out.push_str("]}]");
        out
    }

    /// Split an emotion schema into its header and the logical content
    ///
    /// # Errors
    ///
    /// Returns `Config` if the text does not start with a well-formed header.
    pub fn parse(emotion_schema: &str) -> Result<(Self, &str)> {
        let malformed = || NepError::Config("malformed emotion schema header".to_string());

        let rest = emotion_schema.strip_prefix(PREFIX).ok_or_else(malformed)?;
        let (version, rest) = rest.split_once(' ').ok_or_else(malformed)?;
        let version: u32 = version.parse().map_err(|_| malformed())?;
        if version != EMOTION_SCHEMA_VERSION {
            return Err(NepError::Config(format!(
                "unsupported emotion schema version {}",
                version
            )));
        }

        let end = rest.find("]}]").ok_or_else(malformed)?;
        let body: HeaderBody = serde_json::from_str(&rest[..end + 2])?;
        let tail = &rest[end + 3..];
        let logical = tail.strip_prefix(' ').unwrap_or(tail);

        Ok((
            Self {
                version,
                delta_a: body.delta_a,
                jastv: body.jastv,
            },
            logical,
        ))
    }
}

/// Fixed-precision number with negative zero folded away
fn number(value: f64) -> String {
    let scale = 10f64.powi(DECIMALS);
    let scaled = (value * scale).round() / scale;
    // values too large to rescale are already integral at this precision
    let rounded = if scaled.is_finite() { scaled } else { value };
    let canonical = if rounded == 0.0 { 0.0 } else { rounded };
    format!("{:.*}", DECIMALS as usize, canonical)
}
