//! Tokenization entry point
//!
//! Ties the pipeline together: analyzer outputs become the Current profile,
//! which the engine compares against the Base, the mapper projects, and the
//! assembler packages.
//!
//! ```
//! use nep_core::baseline::{FeatureStats, StatsTable};
//! use nep_core::profile::{AbstractProfile, FeatureVector};
//! use nep_core::tokenizer::{ModalityInput, Tokenizer};
//! use nep_core::types::{FeatureKey, Modality};
//!
//! let stats = StatsTable::new().with(
//!     FeatureKey::new(Modality::Text, "lexical_diversity"),
//!     FeatureStats::new(0.40, 0.10, 50),
//! );
//! let base = AbstractProfile::from_vectors([(
//!     Modality::Text,
//!     FeatureVector::from_pairs([("lexical_diversity", 0.40)]).unwrap(),
//! )])
//! .unwrap();
//!
//! let tokenizer = Tokenizer::new(stats);
//! let token = tokenizer
//!     .tokenize(
//!         "user asks to cancel the order",
//!         vec![ModalityInput::Features(
//!             Modality::Text,
//!             FeatureVector::from_pairs([("lexical_diversity", 0.85)]).unwrap(),
//!         )],
//!         &base,
//!     )
//!     .unwrap();
//!
//! assert!(token.delta_a() > 0.0);
//! assert!(token.emotion_schema().ends_with("user asks to cancel the order"));
//! ```

use crate::analyzer::{Analyzer, RawInput};
use crate::baseline::BaselineStore;
use crate::config::NepConfig;
use crate::differential::DifferentialEngine;
use crate::error::{AssemblyError, Result, ResultExt};
use crate::jastv::JastvMapper;
use crate::profile::{AbstractProfile, FeatureVector};
use crate::token::{EToken, ETokenAssembler};
use crate::types::Modality;
use std::fmt;

/// One modality of the current observation
pub enum ModalityInput<'a> {
    /// An already completed feature vector
    Features(Modality, FeatureVector),
    /// Raw input to run through an analyzer
    Raw(&'a dyn Analyzer, RawInput),
}

impl ModalityInput<'_> {
    pub fn modality(&self) -> Modality {
        match self {
            ModalityInput::Features(modality, _) => *modality,
            ModalityInput::Raw(analyzer, _) => analyzer.modality(),
        }
    }

    fn into_vector(self) -> Result<(Modality, FeatureVector)> {
        match self {
            ModalityInput::Features(modality, vector) => Ok((modality, vector)),
            ModalityInput::Raw(analyzer, raw) => {
                let modality = analyzer.modality();
                let vector = analyzer
                    .extract(&raw)
                    .with_context(|| format!("Extracting {} features", modality))?;
                Ok((modality, vector))
            }
        }
    }
}

impl fmt::Debug for ModalityInput<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModalityInput::Features(modality, vector) => f
                .debug_tuple("Features")
                .field(modality)
                .field(vector)
                .finish(),
            ModalityInput::Raw(analyzer, raw) => f
                .debug_tuple("Raw")
                .field(&analyzer.modality())
                .field(raw)
                .finish(),
        }
    }
}

/// Full NEP pipeline over a baseline store
#[derive(Debug, Clone)]
pub struct Tokenizer<S> {
    engine: DifferentialEngine<S>,
    mapper: JastvMapper,
    assembler: ETokenAssembler,
}

impl<S: BaselineStore> Tokenizer<S> {
    pub fn new(store: S) -> Self {
        Self::with_config(store, NepConfig::default())
    }

    /// Create with custom configuration
    pub fn with_config(store: S, config: NepConfig) -> Self {
        Self {
            engine: DifferentialEngine::with_config(store, config.engine()),
            mapper: JastvMapper::new(config.mapping),
            assembler: ETokenAssembler::new(),
        }
    }

    pub fn engine(&self) -> &DifferentialEngine<S> {
        &self.engine
    }

    pub fn mapper(&self) -> &JastvMapper {
        &self.mapper
    }

    /// Build the Current profile from `inputs` and tokenize it against `base`
    ///
    /// # Errors
    ///
    /// - `Assembly(EmptyBase)` if `base` has no active modality
    /// - `Assembly(EmptyCurrent)` if `inputs` is empty
    /// - `InvalidProfile` if `inputs` names a modality twice
    /// - `AnalyzerFailed` / `UnsupportedInput` from a raw input's analyzer
    /// - `InsufficientOverlap` if the profiles share no feature
    pub fn tokenize(
        &self,
        logical_content: &str,
        inputs: Vec<ModalityInput<'_>>,
        base: &AbstractProfile,
    ) -> Result<EToken> {
        if base.validate().is_err() {
            return Err(AssemblyError::EmptyBase.into());
        }
        if inputs.is_empty() {
            return Err(AssemblyError::EmptyCurrent.into());
        }

        let mut builder = AbstractProfile::builder();
        for input in inputs {
            let (modality, vector) = input.into_vector()?;
            builder = builder.modality(modality, vector);
        }
        let current = builder.build()?;

        self.tokenize_profiles(logical_content, base, current)
    }

    /// Tokenize an already built Current profile
    ///
    /// A profile without an active modality is an `AssemblyError`, checked
    /// before any deviation is computed.
    pub fn tokenize_profiles(
        &self,
        logical_content: &str,
        base: &AbstractProfile,
        current: AbstractProfile,
    ) -> Result<EToken> {
        ETokenAssembler::check_profiles(base, &current)?;
        let deviation = self.engine.compute(base, &current)?;
        let projection = self.mapper.project(&deviation);
        self.assembler
            .assemble(logical_content, deviation, projection, base.clone(), current)
    }
}
