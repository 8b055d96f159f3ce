//! End-to-end tests over the public API
//!
//! Profiles, statistics and analyzer reports are loaded from disk the way the
//! CLI does it, then run through the full pipeline.

use nep_core::analyzer::{RawInput, ReportAnalyzer};
use nep_core::baseline::{FeatureStats, StatsAccumulator, StatsTable};
use nep_core::differential::SkipReason;
use nep_core::error::NepError;
use nep_core::jastv::JastvAxis;
use nep_core::profile::{AbstractProfile, FeatureVector};
use nep_core::token::EmotionHeader;
use nep_core::tokenizer::{ModalityInput, Tokenizer};
use nep_core::types::{FeatureKey, Modality};
use nep_core::NepConfig;
use std::path::Path;

fn write(dir: &Path, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).expect("write fixture");
    path
}

fn load_profile(path: &Path) -> AbstractProfile {
    let content = std::fs::read_to_string(path).unwrap();
    serde_json::from_str(&content).unwrap()
}

/// E2E test: single text feature 0.40 -> 0.85 against (0.40, 0.10, 50)
#[test]
fn e2e_lexical_diversity_example() {
    let dir = tempfile::tempdir().unwrap();
    let base_path = write(
        dir.path(),
        "base.json",
        r#"{"created_at": "2026-01-05T10:00:00Z", "features": {"text": {"lexical_diversity": 0.40}}}"#,
    );
    let stats_path = write(
        dir.path(),
        "stats.json",
        r#"{"text:lexical_diversity": {"mean": 0.40, "std_dev": 0.10, "sample_count": 50}}"#,
    );

    let base = load_profile(&base_path);
    let stats = StatsTable::from_file(&stats_path).unwrap();
    let tokenizer = Tokenizer::new(stats);

    let token = tokenizer
        .tokenize(
            "I need to change my flight",
            vec![ModalityInput::Features(
                Modality::Text,
                FeatureVector::from_pairs([("lexical_diversity", 0.85)]).unwrap(),
            )],
            &base,
        )
        .unwrap();

    let key = FeatureKey::new(Modality::Text, "lexical_diversity");
    assert!((token.deviation().get(&key).unwrap() - 4.5).abs() < 1e-9);
    assert!(token.delta_a() > 0.0);
    assert!(token.emotion_schema().contains("I need to change my flight"));

    let (header, rest) = EmotionHeader::parse(token.emotion_schema()).unwrap();
    assert!(header.delta_a > 0.0);
    assert_eq!(rest.trim_start(), "I need to change my flight");
    assert_eq!(token.projection().get(JastvAxis::S), 0.0);
}

/// E2E test: text-only base, audio-only current
#[test]
fn e2e_disjoint_modalities_fail() {
    let text = AbstractProfile::from_vectors([(
        Modality::Text,
        FeatureVector::from_pairs([("slang-rate", 0.2)]).unwrap(),
    )])
    .unwrap();
    let audio = AbstractProfile::from_vectors([(
        Modality::Audio,
        FeatureVector::from_pairs([("pitch.mean_f0_hz", 200.0)]).unwrap(),
    )])
    .unwrap();

    let err = Tokenizer::new(StatsTable::new())
        .tokenize_profiles("x", &text, audio)
        .unwrap_err();

    match err {
        NepError::InsufficientOverlap { base, current } => {
            assert_eq!(base, vec![Modality::Text]);
            assert_eq!(current, vec![Modality::Audio]);
        }
        other => panic!("unexpected error: {other}"),
    }
}

/// E2E test: audio report on disk, multimodal base, stats built from history
#[test]
fn e2e_audio_report_with_history() {
    let dir = tempfile::tempdir().unwrap();

    let history: Vec<AbstractProfile> = (0..8)
        .map(|i| {
            AbstractProfile::builder()
                .modality(
                    Modality::Text,
                    FeatureVector::from_pairs([("lexical_diversity", 0.4 + 0.01 * i as f64)])
                        .unwrap(),
                )
                .modality(
                    Modality::Audio,
                    FeatureVector::from_pairs([
                        ("pitch.mean_f0_hz", 175.0 + i as f64),
                        ("intensity.mean_db", 60.0 + 0.5 * i as f64),
                    ])
                    .unwrap(),
                )
                .build()
                .unwrap()
        })
        .collect();

    let mut accumulator = StatsAccumulator::new();
    accumulator.extend(&history);
    let stats = accumulator.finish();
    assert_eq!(stats.len(), 3);

    let report = write(
        dir.path(),
        "audio.json",
        r#"{
            "pitch": {"mean_f0_hz": 240.0, "stdev_f0_hz": null},
            "intensity": {"mean_db": 75.0},
            "accent": "HEURISTIC_REQUIRED"
        }"#,
    );
    let analyzer = ReportAnalyzer::new(Modality::Audio);

    let token = Tokenizer::with_config(stats, NepConfig::default())
        .tokenize(
            "turn the music down",
            vec![ModalityInput::Raw(&analyzer, RawInput::File(report))],
            &history[3],
        )
        .unwrap();

    let coverage = token.deviation().coverage();
    assert_eq!(coverage.compared, 2);
    assert_eq!(
        coverage.skip_reason(&FeatureKey::new(Modality::Text, "lexical_diversity")),
        Some(SkipReason::OnlyInBase)
    );
    assert!(token.projection().get(JastvAxis::S) > 0.0);
    assert_eq!(token.projection().get(JastvAxis::J), 0.0);
    assert!(token.projection().iter().all(|(_, v)| v.abs() <= 1.0));
}

/// E2E test: a feature without history is compared but not normalized
#[test]
fn e2e_missing_history_falls_back() {
    let stats = StatsTable::new().with(
        FeatureKey::new(Modality::Text, "known"),
        FeatureStats::new(1.0, 0.5, 40),
    );
    let profile = |known: f64, unknown: f64| {
        AbstractProfile::from_vectors([(
            Modality::Text,
            FeatureVector::from_pairs([("known", known), ("unknown", unknown)]).unwrap(),
        )])
        .unwrap()
    };

    let token = Tokenizer::new(stats)
        .tokenize_profiles("", &profile(1.0, 3.0), profile(2.0, 300.0))
        .unwrap();

    let unknown = FeatureKey::new(Modality::Text, "unknown");
    assert!(token.deviation().coverage().is_unnormalized(&unknown));
    assert_eq!(token.deviation().get(&unknown), Some(0.0));
    // Only `known` (d = 2.0) contributes to ΔA
    assert!((token.delta_a() - 2.0).abs() < 1e-12);
    assert_eq!(token.emotion_schema(), EmotionHeader::new(token.delta_a(), token.projection()).render());
}
