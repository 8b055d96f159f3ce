//! NEP Core - Affective deviation tokens from multimodal feature profiles
//!
//! NEP Core compares a momentary multimodal observation against a personal
//! baseline and packages the divergence, together with the logical content of
//! the turn, into an immutable token a downstream policy can consume.
//!
//! # Architecture
//!
//! The pipeline has four stages:
//!
//! 1. **Normalizer** (`normalizer`): z-scores against historical statistics,
//!    with a recorded fallback when history is missing or degenerate
//! 2. **Differential Engine** (`differential`): per-feature deviation vector and
//!    the scalar ΔA
//! 3. **JAST-V Mapper** (`jastv`): projection onto four bounded bipolar axes
//! 4. **Token Assembly** (`token`): the all-or-nothing `EToken`
//!
//! Feature extraction stays outside the core, behind the `Analyzer` trait
//! (`analyzer`); historical statistics come from a `BaselineStore`
//! (`baseline`).
//!
//! # Quick Start
//!
//! ```
//! use nep_core::baseline::{FeatureStats, StatsTable};
//! use nep_core::differential::DifferentialEngine;
//! use nep_core::jastv::JastvMapper;
//! use nep_core::profile::{AbstractProfile, FeatureVector};
//! use nep_core::token::ETokenAssembler;
//! use nep_core::types::{FeatureKey, Modality};
//!
//! let key = FeatureKey::new(Modality::Text, "lexical_diversity");
//! let stats = StatsTable::new().with(key.clone(), FeatureStats::new(0.40, 0.10, 50));
//!
//! let profile = |value| {
//!     AbstractProfile::from_vectors([(
//!         Modality::Text,
//!         FeatureVector::from_pairs([("lexical_diversity", value)]).unwrap(),
//!     )])
//!     .unwrap()
//! };
//! let (base, current) = (profile(0.40), profile(0.85));
//!
//! let deviation = DifferentialEngine::new(stats).compute(&base, &current).unwrap();
//! let projection = JastvMapper::default().project(&deviation);
//! let token = ETokenAssembler::new()
//!     .assemble("cancel my order", deviation, projection, base, current)
//!     .unwrap();
//!
//! println!("{}", token.emotion_schema());
//! assert!(token.delta_a() > 0.0);
//! ```
//!
//! # Design Principles
//!
//! 1. **Pure and synchronous**: no global state, same inputs give a
//!    byte-identical token
//! 2. **Absent is not zero**: a missing feature is skipped and recorded, never
//!    compared against zero
//! 3. **Bounded output**: ΔA is finite and every JAST-V axis stays in bounds

#![deny(unsafe_code)]
#![warn(rust_2018_idioms, missing_debug_implementations, clippy::all)]

pub mod analyzer;
pub mod baseline;
pub mod config;
pub mod differential;
pub mod error;
pub mod jastv;
pub mod normalizer;
pub mod profile;
pub mod token;
pub mod tokenizer;
pub mod types;

// Re-export commonly used types for convenience
pub use analyzer::{Analyzer, RawInput};
pub use baseline::{BaselineStore, FeatureStats, StatsTable};
pub use config::NepConfig;
pub use differential::{Coverage, DeviationVector, DifferentialEngine};
pub use error::{AssemblyError, NepError, Result};
pub use jastv::{JastvAxis, JastvMapper, JastvProjection, MappingTable};
pub use normalizer::Normalizer;
pub use profile::{AbstractProfile, FeatureVector};
pub use token::{EToken, ETokenAssembler};
pub use tokenizer::{ModalityInput, Tokenizer};
pub use types::{Blake3Hash, FeatureKey, Modality, Timestamp};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
