//! JAST-V projection
//!
//! Maps an unbounded, per-feature [`crate::differential::DeviationVector`]
//! onto a fixed 4-dimensional bipolar affective space. The routing of
//! features to axes is configuration ([`MappingTable`]), never hardcoded in
//! the mapper.

pub mod mapping;
pub mod projection;

pub use mapping::{JastvMapper, MappingRule, MappingTable};
pub use projection::{JastvAxis, JastvProjection};
