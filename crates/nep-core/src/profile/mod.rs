//! Profile data model
//!
//! Analyzers produce one [`FeatureVector`] per modality; callers combine them
//! into an [`AbstractProfile`]. Two profiles flow into the differential
//! engine: the Base (habitual) and the Current (momentary).

pub mod abstract_profile;
pub mod vector;

pub use abstract_profile::{AbstractProfile, AbstractProfileBuilder};
pub use vector::FeatureVector;
