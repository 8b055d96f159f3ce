//! Differential Engine - quantifying Affective Deviation (ΔA)
//!
//! # Architecture
//!
//! ```text
//! Base AbstractProfile ----+
//!                          |
//!                          v
//!        +-----------------------------------+
//!        |  DifferentialEngine::compute()    |
//!        |   overlap -> Normalizer -> ΔA     |<--- BaselineStore (read-only)
//!        +-----------------------------------+
//!                          ^          |
//!                          |          v
//! Current AbstractProfile -+   DeviationVector { entries, ΔA, coverage }
//! ```
//!
//! ## Deviation entries
//!
//! For each `(modality, feature)` pair present in both profiles the entry is
//! the signed difference of the two z-scores under the same baseline
//! statistics.
//!
//! ## ΔA
//!
//! A single non-negative scalar. Both [`Aggregation`] variants are monotone
//! in each feature's absolute deviation and cap the influence of a single
//! outlier feature.

pub mod aggregate;
pub mod deviation;
pub mod engine;

pub use aggregate::Aggregation;
pub use deviation::{Coverage, DeviationVector, SkipReason, SkippedFeature, UnnormalizedFeature};
pub use engine::{DifferentialEngine, EngineConfig};
