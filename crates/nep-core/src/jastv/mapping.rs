//! Mapping tables and the JAST-V mapper
//!
//! A [`MappingTable`] is configuration: a list of weighted routing rules from
//! features to axes plus the bipolar bound. It can be loaded from TOML:
//!
//! ```toml
//! bound = 1.0
//!
//! [[rule]]
//! modality = "text"
//! feature = "vocabulary-diversity"
//! axis = "j"
//! weight = 0.2
//!
//! [[rule]]
//! modality = "audio"
//! feature = "timbre.*"
//! axis = "s"
//! weight = 0.05
//! ```

use super::projection::{JastvAxis, JastvProjection};
use crate::differential::DeviationVector;
use crate::error::{NepError, Result, ResultExt};
use crate::types::{FeatureKey, Modality};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Routes deviation of matching features onto one axis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MappingRule {
    /// Restrict to one modality; `None` matches any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modality: Option<Modality>,

    /// Exact feature name, `prefix*`, or `*`
    pub feature: String,

    pub axis: JastvAxis,

    /// Axis units contributed per unit of deviation
    pub weight: f64,
}

impl MappingRule {
    pub fn new(modality: Modality, feature: impl Into<String>, axis: JastvAxis, weight: f64) -> Self {
        Self {
            modality: Some(modality),
            feature: feature.into(),
            axis,
            weight,
        }
    }

    pub fn matches(&self, key: &FeatureKey) -> bool {
        if self.modality.is_some_and(|m| m != key.modality) {
            return false;
        }
        match self.feature.strip_suffix('*') {
            Some(prefix) => key.name.starts_with(prefix),
            None => key.name == self.feature,
        }
    }
}

/// Weighted routing of features onto the four JAST-V axes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MappingTable {
    /// Axes are clamped to `[-bound, bound]`
    pub bound: f64,

    #[serde(rename = "rule")]
    pub rules: Vec<MappingRule>,
}

impl Default for MappingTable {
    /// Lexical features onto J/A, acoustic features onto S/T
    ///
    /// Feature names follow the reports of the stylometric text analyzer and
    /// the acoustic analyzer (flattened with `.` for nested sections).
    fn default() -> Self {
        use JastvAxis::*;
        use Modality::{Audio, Text};

        let rules = vec![
            MappingRule::new(Text, "vocabulary-diversity", J, 0.20),
            MappingRule::new(Text, "lexical_diversity", J, 0.20),
            MappingRule::new(Text, "capitalization-ratio", J, 0.15),
            MappingRule::new(Text, "emoji-rate", J, 0.15),
            MappingRule::new(Text, "punctuation-frequency.*", J, 0.05),
            MappingRule::new(Text, "salutation-rate", J, -0.10),
            MappingRule::new(Text, "slang-rate", A, 0.15),
            MappingRule::new(Text, "typos-rate", A, 0.20),
            MappingRule::new(Text, "abbreviation-rate", A, 0.10),
            MappingRule::new(Text, "Contraction-rate", A, 0.10),
            MappingRule::new(Text, "Idiom-preferences", A, 0.05),
            MappingRule::new(Text, "stop-words-rate", A, -0.10),
            MappingRule::new(Audio, "pitch.mean_f0_hz", S, 0.20),
            MappingRule::new(Audio, "pitch.stdev_f0_hz", S, 0.15),
            MappingRule::new(Audio, "intensity.mean_db", S, 0.15),
            MappingRule::new(Audio, "intensity.max_db", S, 0.10),
            MappingRule::new(Audio, "idiosyncrasies.jitter_local_pct", T, 0.20),
            MappingRule::new(Audio, "idiosyncrasies.shimmer_local_pct", T, 0.20),
            MappingRule::new(Audio, "rhythm.syllabic_rate_proxy", T, 0.15),
        ];

        Self { bound: 1.0, rules }
    }
}

impl MappingTable {
    /// A table with no rules: every projection is neutral
    pub fn empty(bound: f64) -> Self {
        Self {
            bound,
            rules: Vec::new(),
        }
    }

    pub fn with_rule(mut self, rule: MappingRule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.bound.is_finite() && self.bound > 0.0) {
            return Err(NepError::Config(format!(
                "mapping.bound must be finite and > 0, got {}",
                self.bound
            )));
        }
        for rule in &self.rules {
            if rule.feature.is_empty() {
                return Err(NepError::Config("mapping rule with empty feature".into()));
            }
            if !rule.weight.is_finite() {
                return Err(NepError::Config(format!(
                    "mapping rule for '{}' has non-finite weight",
                    rule.feature
                )));
            }
        }
        Ok(())
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let table: Self = toml::from_str(content)?;
        table.validate()?;
        Ok(table)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Reading mapping table {}", path.display()))?;
        Self::from_toml_str(&content)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| NepError::Config(e.to_string()))
    }
}

/// Projects deviation vectors onto the JAST-V axes
///
/// Each axis is the weighted sum of the deviations routed to it, pinned to
/// `[-bound, bound]` by a saturating clamp. An axis no feature was routed
/// to stays neutral, so partial-modality input still yields four axes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JastvMapper {
    table: MappingTable,
}

impl JastvMapper {
    pub fn new(table: MappingTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &MappingTable {
        &self.table
    }

    /// Project a deviation vector
    ///
    /// The table is not required to be validated: a negative bound acts as
    /// its magnitude and a NaN bound pins every axis to neutral.
    pub fn project(&self, deviation: &DeviationVector) -> JastvProjection {
        let bound = if self.table.bound.is_nan() {
            0.0
        } else {
            self.table.bound.abs()
        };
        let mut sums = [0.0_f64; 4];

        for (key, d) in deviation.iter() {
            for rule in self.table.rules.iter().filter(|r| r.matches(key)) {
                sums[rule.axis.index()] += rule.weight * d;
            }
        }

        let axes = sums.map(|raw| {
            if raw.is_nan() {
                0.0
            } else {
                raw.clamp(-bound, bound)
            }
        });

        tracing::debug!(?axes, "jast-v projection");
        JastvProjection::from_axes(axes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::differential::Aggregation;

    fn deviation(entries: &[(Modality, &str, f64)]) -> DeviationVector {
        DeviationVector::from_entries(
            entries
                .iter()
                .map(|(m, n, d)| (FeatureKey::new(*m, *n), *d)),
            &Aggregation::default(),
        )
    }

    #[test]
    fn test_rule_matching() {
        let exact = MappingRule::new(Modality::Text, "slang-rate", JastvAxis::A, 1.0);
        assert!(exact.matches(&FeatureKey::new(Modality::Text, "slang-rate")));
        assert!(!exact.matches(&FeatureKey::new(Modality::Audio, "slang-rate")));
        assert!(!exact.matches(&FeatureKey::new(Modality::Text, "slang-rate-2")));

        let prefix = MappingRule {
            modality: None,
            feature: "timbre.*".into(),
            axis: JastvAxis::S,
            weight: 1.0,
        };
        assert!(prefix.matches(&FeatureKey::new(
            Modality::Audio,
            "timbre.spectral_centroid_vectors[3]"
        )));
    }

    #[test]
    fn test_saturating_clamp() {
        let mapper = JastvMapper::new(
            MappingTable::empty(1.0)
                .with_rule(MappingRule::new(Modality::Text, "a", JastvAxis::J, 1.0))
                .with_rule(MappingRule::new(Modality::Text, "b", JastvAxis::A, 1.0)),
        );

        let projection = mapper.project(&deviation(&[
            (Modality::Text, "a", 7.5),
            (Modality::Text, "b", -1e300),
        ]));

        assert_eq!(projection.get(JastvAxis::J), 1.0);
        assert_eq!(projection.get(JastvAxis::A), -1.0);
    }

    #[test]
    fn test_overflow_to_infinity_still_pins() {
        let mapper = JastvMapper::new(
            MappingTable::empty(2.0)
                .with_rule(MappingRule::new(Modality::Text, "a", JastvAxis::T, 1e300))
                .with_rule(MappingRule::new(Modality::Text, "b", JastvAxis::T, 1e300)),
        );
        let projection = mapper.project(&deviation(&[
            (Modality::Text, "a", 1e300),
            (Modality::Text, "b", 1e300),
        ]));
        assert_eq!(projection.get(JastvAxis::T), 2.0);
    }

    #[test]
    fn test_missing_audio_leaves_acoustic_axes_neutral() {
        let mapper = JastvMapper::default();
        let projection = mapper.project(&deviation(&[
            (Modality::Text, "vocabulary-diversity", 2.0),
            (Modality::Text, "typos-rate", 1.0),
        ]));

        assert!((projection.get(JastvAxis::J) - 0.4).abs() < 1e-12);
        assert!((projection.get(JastvAxis::A) - 0.2).abs() < 1e-12);
        assert_eq!(projection.get(JastvAxis::S), 0.0);
        assert_eq!(projection.get(JastvAxis::T), 0.0);
    }

    #[test]
    fn test_zero_deviation_is_neutral() {
        let projection = JastvMapper::default().project(&deviation(&[
            (Modality::Text, "vocabulary-diversity", 0.0),
            (Modality::Audio, "pitch.mean_f0_hz", 0.0),
        ]));
        assert!(projection.is_neutral());
    }

    #[test]
    fn test_toml_round_trip() {
        let table = MappingTable::default();
        let text = table.to_toml_string().unwrap();
        let back = MappingTable::from_toml_str(&text).unwrap();
        assert_eq!(back, table);
    }

    #[test]
    fn test_toml_custom_table() {
        let table = MappingTable::from_toml_str(
            r#"
            bound = 0.5

            [[rule]]
            feature = "*"
            axis = "j"
            weight = 1.0
            "#,
        )
        .unwrap();

        assert_eq!(table.rules.len(), 1);
        let projection = JastvMapper::new(table).project(&deviation(&[
            (Modality::Audio, "anything", 3.0),
        ]));
        assert_eq!(projection.get(JastvAxis::J), 0.5);
    }

    #[test]
    fn test_unvalidated_bound_still_projects() {
        let dev = deviation(&[(Modality::Text, "slang-rate", 10.0)]);
        let rule = MappingRule::new(Modality::Text, "slang-rate", JastvAxis::A, 1.0);

        let negative = JastvMapper::new(MappingTable::empty(-1.0).with_rule(rule.clone()));
        assert_eq!(negative.project(&dev).get(JastvAxis::A), 1.0);

        let nan = JastvMapper::new(MappingTable::empty(f64::NAN).with_rule(rule));
        assert!(nan.project(&dev).is_neutral());
    }

    #[test]
    fn test_invalid_bound_rejected() {
        assert!(MappingTable::from_toml_str("bound = 0.0").is_err());
        assert!(MappingTable::from_toml_str("bound = -1.0").is_err());
    }
}
