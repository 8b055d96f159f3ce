//! Aggregation of per-feature deviations into ΔA
//!
//! Every variant is non-negative, monotone non-decreasing in each `|d_i|`
//! when the others are held fixed, and bounds the influence of any single
//! feature.

use crate::error::{NepError, Result};
use serde::{Deserialize, Serialize};

/// ΔA aggregation formula
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum Aggregation {
    /// Root mean square of `min(|d_i|, clip)`
    ClippedRms { clip: f64 },

    /// Mean of `|d_i|` after dropping the `floor(n * trim)` largest values
    TrimmedMean { trim: f64 },
}

impl Default for Aggregation {
    fn default() -> Self {
        Aggregation::ClippedRms { clip: 3.0 }
    }
}

impl Aggregation {
    pub fn validate(&self) -> Result<()> {
        match *self {
            Aggregation::ClippedRms { clip } if !(clip.is_finite() && clip > 0.0) => {
                Err(NepError::Config(format!(
                    "aggregation.clip must be finite and > 0, got {}",
                    clip
                )))
            }
            Aggregation::TrimmedMean { trim } if !(0.0..0.5).contains(&trim) => {
                Err(NepError::Config(format!(
                    "aggregation.trim must be in [0, 0.5), got {}",
                    trim
                )))
            }
            _ => Ok(()),
        }
    }

    /// Aggregate deviations; an empty input aggregates to 0.0
    ///
    /// Total over every parameter value, including ones `validate` rejects:
    /// a negative clip acts as its magnitude, a NaN clip as no clip, and a
    /// trim outside `[0, 0.5)` always keeps at least the smallest value.
    pub fn aggregate<I>(&self, deviations: I) -> f64
    where
        I: IntoIterator<Item = f64>,
    {
        let mut magnitudes: Vec<f64> = deviations.into_iter().map(f64::abs).collect();
        if magnitudes.is_empty() {
            return 0.0;
        }

        match *self {
            Aggregation::ClippedRms { clip } => {
                let clip = if clip.is_nan() { f64::INFINITY } else { clip.abs() };
                let n = magnitudes.len() as f64;
                let sum_sq: f64 = magnitudes
                    .iter()
                    .map(|m| {
                        let c = m.min(clip);
                        c * c
                    })
                    .sum();
                (sum_sq / n).sqrt()
            }
            Aggregation::TrimmedMean { trim } => {
                magnitudes.sort_by(|a, b| a.total_cmp(b));
                // `as usize` saturates: negative and NaN trims drop nothing
                let drop = ((magnitudes.len() as f64 * trim).floor() as usize)
                    .min(magnitudes.len() - 1);
                let kept = &magnitudes[..magnitudes.len() - drop];
                kept.iter().sum::<f64>() / kept.len() as f64
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_is_zero() {
        assert_eq!(Aggregation::default().aggregate(Vec::new()), 0.0);
        assert_eq!(Aggregation::TrimmedMean { trim: 0.2 }.aggregate(Vec::new()), 0.0);
    }

    #[test]
    fn test_sign_does_not_matter() {
        let agg = Aggregation::default();
        assert_eq!(agg.aggregate([1.0, -2.0]), agg.aggregate([-1.0, 2.0]));
    }

    #[test]
    fn test_clipped_rms_bounds_outlier() {
        let agg = Aggregation::ClippedRms { clip: 3.0 };
        let calm = agg.aggregate([0.5, 0.5, 0.5, 1000.0]);
        let wild = agg.aggregate([0.5, 0.5, 0.5, 1e12]);

        assert_eq!(calm, wild);
        assert!(calm <= 3.0);
    }

    #[test]
    fn test_trimmed_mean_drops_largest() {
        let agg = Aggregation::TrimmedMean { trim: 0.25 };
        // drops one of four: the 100.0
        let value = agg.aggregate([1.0, 2.0, 3.0, 100.0]);
        assert!((value - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_single_feature_example() {
        let value = Aggregation::default().aggregate([4.5]);
        assert!((value - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_out_of_range_trim_keeps_smallest() {
        let values = [1.0, 2.0, 3.0, 100.0];

        let over = Aggregation::TrimmedMean { trim: 2.0 }.aggregate(values);
        assert_eq!(over, 1.0);
        let negative = Aggregation::TrimmedMean { trim: -1.0 }.aggregate(values);
        assert!((negative - 26.5).abs() < 1e-12);
        let nan = Aggregation::TrimmedMean { trim: f64::NAN }.aggregate(values);
        assert!((nan - 26.5).abs() < 1e-12);
        assert_eq!(Aggregation::TrimmedMean { trim: 2.0 }.aggregate([7.0]), 7.0);
    }

    #[test]
    fn test_out_of_range_clip() {
        let negative = Aggregation::ClippedRms { clip: -3.0 }.aggregate([4.5]);
        assert!((negative - 3.0).abs() < 1e-12);
        let nan = Aggregation::ClippedRms { clip: f64::NAN }.aggregate([4.5]);
        assert!((nan - 4.5).abs() < 1e-12);
    }

    #[test]
    fn test_validation() {
        assert!(Aggregation::ClippedRms { clip: 0.0 }.validate().is_err());
        assert!(Aggregation::TrimmedMean { trim: 0.5 }.validate().is_err());
        assert!(Aggregation::TrimmedMean { trim: 0.0 }.validate().is_ok());
    }

    #[test]
    fn test_serde_tagged() {
        let agg: Aggregation =
            toml::from_str("method = \"trimmed_mean\"\ntrim = 0.1").unwrap();
        assert_eq!(agg, Aggregation::TrimmedMean { trim: 0.1 });
    }
}
