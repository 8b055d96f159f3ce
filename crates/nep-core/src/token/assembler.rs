//! ETokenAssembler - all-or-nothing packaging of an EToken

use super::etoken::EToken;
use super::schema::EmotionHeader;
use crate::differential::DeviationVector;
use crate::error::{AssemblyError, Result};
use crate::jastv::JastvProjection;
use crate::profile::AbstractProfile;

/// Packages logical content, deviation and projection into an [`EToken`]
#[derive(Debug, Clone, Copy, Default)]
pub struct ETokenAssembler;

impl ETokenAssembler {
    pub fn new() -> Self {
        Self
    }

    /// Build the emotion schema for a logical schema and header
    pub fn emotion_schema(logical_schema: &str, header: &EmotionHeader) -> String {
        let rendered = header.render();
        if logical_schema.is_empty() {
            rendered
        } else {
            format!("{} {}", rendered, logical_schema)
        }
    }

    /// Structural precondition of assembly: both profiles have an active modality
    pub fn check_profiles(base: &AbstractProfile, current: &AbstractProfile) -> Result<()> {
        if base.validate().is_err() {
            return Err(AssemblyError::EmptyBase.into());
        }
        if current.validate().is_err() {
            return Err(AssemblyError::EmptyCurrent.into());
        }
        Ok(())
    }

    /// Assemble a token
    ///
    /// # Errors
    ///
    /// Returns `AssemblyError` if either profile has no active modalities.
    /// Nothing else can fail, and no partial token is ever produced.
    pub fn assemble(
        &self,
        logical_schema: impl Into<String>,
        deviation: DeviationVector,
        projection: JastvProjection,
        base: AbstractProfile,
        current: AbstractProfile,
    ) -> Result<EToken> {
        Self::check_profiles(&base, &current)?;

        let logical_schema = logical_schema.into();
        let header = EmotionHeader::new(deviation.delta_a(), &projection);
        let emotion_schema = Self::emotion_schema(&logical_schema, &header);

        tracing::info!(
            delta_a = deviation.delta_a(),
            compared = deviation.coverage().compared,
            "etoken assembled"
        );

        Ok(EToken::new(
            logical_schema,
            emotion_schema,
            base.padded(),
            current.padded(),
            deviation,
            projection,
        ))
    }
}
