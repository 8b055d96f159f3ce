//! Baseline statistics boundary
//!
//! The normalizer needs per-feature `(mean, std_dev, sample_count)` under the
//! applicable baseline. [`BaselineStore`] is that boundary; [`StatsTable`] is
//! an in-memory implementation and [`StatsAccumulator`] builds one from a
//! history of profiles.

pub mod accumulator;
pub mod store;

pub use accumulator::StatsAccumulator;
pub use store::{BaselineStore, FeatureStats, StatsTable};
