//! The EToken value object

use super::assembler::ETokenAssembler;
use super::schema::EmotionHeader;
use crate::differential::DeviationVector;
use crate::error::{NepError, Result};
use crate::jastv::JastvProjection;
use crate::profile::AbstractProfile;
use crate::types::Blake3Hash;
use serde::{Deserialize, Serialize};

/// Immutable packaged output for the downstream decision model
///
/// Four contract fields (`logical_schema`, `emotion_schema`,
/// `base_abstract`, `current_abstract`) plus the deviation and projection
/// the emotion header was rendered from. Fields are private: a token is
/// never mutated after assembly.
///
/// Both abstracts are padded, so every modality is present as a (possibly
/// empty) feature vector regardless of which modalities were active.
///
/// Deserialization re-checks what assembly guarantees: both abstracts have
/// an active modality and `emotion_schema` is exactly the schema rendered
/// from the stored deviation, projection and logical content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ETokenRepr")]
pub struct EToken {
    logical_schema: String,
    emotion_schema: String,
    base_abstract: AbstractProfile,
    current_abstract: AbstractProfile,
    deviation: DeviationVector,
    projection: JastvProjection,
}

impl EToken {
    pub(crate) fn new(
        logical_schema: String,
        emotion_schema: String,
        base_abstract: AbstractProfile,
        current_abstract: AbstractProfile,
        deviation: DeviationVector,
        projection: JastvProjection,
    ) -> Self {
        Self {
            logical_schema,
            emotion_schema,
            base_abstract,
            current_abstract,
            deviation,
            projection,
        }
    }

    /// Logical content as supplied by the caller
    pub fn logical_schema(&self) -> &str {
        &self.logical_schema
    }

    /// Canonical header followed by the logical content
    pub fn emotion_schema(&self) -> &str {
        &self.emotion_schema
    }

    pub fn base_abstract(&self) -> &AbstractProfile {
        &self.base_abstract
    }

    pub fn current_abstract(&self) -> &AbstractProfile {
        &self.current_abstract
    }

    pub fn deviation(&self) -> &DeviationVector {
        &self.deviation
    }

    pub fn projection(&self) -> &JastvProjection {
        &self.projection
    }

    /// Aggregate ΔA carried by the token
    pub fn delta_a(&self) -> f64 {
        self.deviation.delta_a()
    }

    /// BLAKE3 hash of the emotion schema, for audit and replay comparison
    pub fn fingerprint(&self) -> Blake3Hash {
        Blake3Hash::of(self.emotion_schema.as_bytes())
    }
}

#[derive(Deserialize)]
struct ETokenRepr {
    logical_schema: String,
    emotion_schema: String,
    base_abstract: AbstractProfile,
    current_abstract: AbstractProfile,
    deviation: DeviationVector,
    projection: JastvProjection,
}

impl TryFrom<ETokenRepr> for EToken {
    type Error = NepError;

    fn try_from(repr: ETokenRepr) -> Result<Self> {
        ETokenAssembler::check_profiles(&repr.base_abstract, &repr.current_abstract)?;

        let header = EmotionHeader::new(repr.deviation.delta_a(), &repr.projection);
        if ETokenAssembler::emotion_schema(&repr.logical_schema, &header) != repr.emotion_schema {
            return Err(NepError::InvalidProfile(
                "emotion_schema does not match the token's deviation and projection".to_string(),
            ));
        }

        Ok(Self::new(
            repr.logical_schema,
            repr.emotion_schema,
            repr.base_abstract,
            repr.current_abstract,
            repr.deviation,
            repr.projection,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::baseline::{FeatureStats, StatsTable};
    use crate::profile::FeatureVector;
    use crate::tokenizer::Tokenizer;
    use crate::types::{FeatureKey, Modality};
    use serde_json::{json, Value};

    fn token_json() -> Value {
        let key = FeatureKey::new(Modality::Text, "slang-rate");
        let stats = StatsTable::new().with(key, FeatureStats::new(0.1, 0.05, 20));
        let profile = |v: f64| {
            AbstractProfile::from_vectors([(
                Modality::Text,
                FeatureVector::from_pairs([("slang-rate", v)]).unwrap(),
            )])
            .unwrap()
        };
        let token = Tokenizer::new(stats)
            .tokenize_profiles("where is my parcel", &profile(0.1), profile(0.3))
            .unwrap();
        serde_json::to_value(&token).unwrap()
    }

    #[test]
    fn test_round_trip_keeps_fingerprint() {
        let value = token_json();
        let token: EToken = serde_json::from_value(value.clone()).unwrap();
        assert_eq!(serde_json::to_value(&token).unwrap(), value);
    }

    #[test]
    fn test_edited_schema_rejected() {
        let mut value = token_json();
        value["emotion_schema"] = json!("[DELTA_A v1 {\"delta_a\":0.000000,\"jastv\":[0.000000,0.000000,0.000000,0.000000]}] where is my parcel");
        assert!(serde_json::from_value::<EToken>(value).is_err());
    }

    #[test]
    fn test_out_of_band_projection_rejected() {
        let mut value = token_json();
        value["projection"] = json!([5.0, 0.0, 0.0, 0.0]);
        assert!(serde_json::from_value::<EToken>(value).is_err());
    }

    #[test]
    fn test_empty_abstract_rejected() {
        let mut value = token_json();
        value["current_abstract"]["modalities"] = json!([]);
        assert!(serde_json::from_value::<EToken>(value).is_err());
    }
}
