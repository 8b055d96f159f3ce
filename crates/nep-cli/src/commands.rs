//! Subcommand implementations
//!
//! Each command returns its stdout payload so it can be exercised without a
//! terminal.

use anyhow::{anyhow, Context};
use nep_core::analyzer::{RawInput, ReportAnalyzer};
use nep_core::baseline::{StatsAccumulator, StatsTable};
use nep_core::profile::{AbstractProfile, FeatureVector};
use nep_core::tokenizer::{ModalityInput, Tokenizer};
use nep_core::types::Modality;
use nep_core::NepConfig;
use std::path::{Path, PathBuf};

/// Inputs of `nep tokenize`
#[derive(Debug, Default)]
pub struct TokenizeArgs {
    pub base: PathBuf,
    pub stats: PathBuf,
    pub text: Option<PathBuf>,
    pub audio: Option<PathBuf>,
    pub reports: Vec<(Modality, PathBuf)>,
    pub content: String,
    pub config: Option<PathBuf>,
    pub pretty: bool,
}

/// Parse a `--report <modality>=<path>` argument
pub fn parse_report(arg: &str) -> Result<(Modality, PathBuf), String> {
    let (modality, path) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected <modality>=<path>, got '{}'", arg))?;
    let modality: Modality = modality.parse().map_err(|e| format!("{}", e))?;
    if path.is_empty() {
        return Err(format!("missing report path for {}", modality));
    }
    Ok((modality, PathBuf::from(path)))
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path, what: &str) -> anyhow::Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading {} {}", what, path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("parsing {} {}", what, path.display()))
}

pub fn tokenize(args: &TokenizeArgs) -> anyhow::Result<String> {
    let config = match &args.config {
        Some(path) => NepConfig::from_file(path)?,
        None => NepConfig::default(),
    };
    let base: AbstractProfile = read_json(&args.base, "base profile")?;
    let stats = StatsTable::from_file(&args.stats)?;

    let analyzers: Vec<(ReportAnalyzer, PathBuf)> = args
        .reports
        .iter()
        .map(|(modality, path)| (ReportAnalyzer::new(*modality), path.clone()))
        .collect();

    let mut inputs = Vec::new();
    if let Some(path) = &args.text {
        let vector: FeatureVector = read_json(path, "text features")?;
        inputs.push(ModalityInput::Features(Modality::Text, vector));
    }
    if let Some(path) = &args.audio {
        let vector: FeatureVector = read_json(path, "audio features")?;
        inputs.push(ModalityInput::Features(Modality::Audio, vector));
    }
    for (analyzer, path) in &analyzers {
        inputs.push(ModalityInput::Raw(analyzer, RawInput::File(path.clone())));
    }

    if inputs.is_empty() {
        return Err(anyhow!("no current observation: pass --text, --audio or --report"));
    }

    tracing::debug!(inputs = inputs.len(), base = %args.base.display(), "tokenizing");
    let token = Tokenizer::with_config(stats, config).tokenize(&args.content, inputs, &base)?;

    let json = if args.pretty {
        serde_json::to_string_pretty(&token)?
    } else {
        serde_json::to_string(&token)?
    };
    Ok(json)
}

/// Build a statistics table from historical profiles
pub fn stats(profiles: &[PathBuf], out: Option<&Path>) -> anyhow::Result<String> {
    if profiles.is_empty() {
        return Err(anyhow!("at least one profile is required"));
    }

    let mut accumulator = StatsAccumulator::new();
    for path in profiles {
        let profile: AbstractProfile = read_json(path, "profile")?;
        accumulator.observe(&profile);
    }
    let table = accumulator.finish();
    tracing::info!(profiles = profiles.len(), features = table.len(), "statistics built");

    let json = table.to_json_string()?;
    match out {
        Some(path) => {
            std::fs::write(path, &json).with_context(|| format!("writing {}", path.display()))?;
            Ok(format!("Wrote {} feature statistics to {}", table.len(), path.display()))
        }
        None => Ok(json),
    }
}

/// Print a configuration as TOML (the default one when `path` is None)
pub fn config(path: Option<&Path>) -> anyhow::Result<String> {
    let config = match path {
        Some(path) => NepConfig::from_file(path)?,
        None => NepConfig::default(),
    };
    Ok(config.to_toml_string()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_parse_report() {
        let (modality, path) = parse_report("audio=out/report.json").unwrap();
        assert_eq!(modality, Modality::Audio);
        assert_eq!(path, PathBuf::from("out/report.json"));

        assert!(parse_report("audio").is_err());
        assert!(parse_report("smell=x.json").is_err());
        assert!(parse_report("text=").is_err());
    }

    #[test]
    fn test_tokenize_text_features() {
        let dir = tempfile::tempdir().unwrap();
        let args = TokenizeArgs {
            base: write(dir.path(), "base.json", r#"{"features": {"text": {"lexical_diversity": 0.40}}}"#),
            stats: write(
                dir.path(),
                "stats.json",
                r#"{"text:lexical_diversity": {"mean": 0.40, "std_dev": 0.10, "sample_count": 50}}"#,
            ),
            text: Some(write(dir.path(), "text.json", r#"{"lexical_diversity": 0.85}"#)),
            content: "hello there".into(),
            ..TokenizeArgs::default()
        };

        let output = tokenize(&args).unwrap();
        let token: serde_json::Value = serde_json::from_str(&output).unwrap();
        let schema = token["emotion_schema"].as_str().unwrap();
        assert!(schema.starts_with("[DELTA_A v1 "));
        assert!(schema.ends_with("hello there"));
    }

    #[test]
    fn test_tokenize_with_report() {
        let dir = tempfile::tempdir().unwrap();
        let args = TokenizeArgs {
            base: write(dir.path(), "base.json", r#"{"features": {"audio": {"pitch.mean_f0_hz": 180.0}}}"#),
            stats: write(
                dir.path(),
                "stats.json",
                r#"{"audio:pitch.mean_f0_hz": {"mean": 180.0, "std_dev": 20.0, "sample_count": 12}}"#,
            ),
            reports: vec![(
                Modality::Audio,
                write(dir.path(), "audio.json", r#"{"pitch": {"mean_f0_hz": 230.0}}"#),
            )],
            pretty: true,
            ..TokenizeArgs::default()
        };

        let output = tokenize(&args).unwrap();
        assert!(output.contains('\n'));
        let token: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert!(token["deviation"]["delta_a"].as_f64().unwrap() > 0.0);
    }

    #[test]
    fn test_tokenize_requires_observation() {
        let dir = tempfile::tempdir().unwrap();
        let args = TokenizeArgs {
            base: write(dir.path(), "base.json", r#"{"features": {"text": {"a": 1.0}}}"#),
            stats: write(dir.path(), "stats.json", "{}"),
            ..TokenizeArgs::default()
        };
        assert!(tokenize(&args).is_err());
    }

    #[test]
    fn test_stats_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let profiles: Vec<PathBuf> = [1.0, 2.0, 3.0]
            .iter()
            .enumerate()
            .map(|(i, v)| {
                write(
                    dir.path(),
                    &format!("p{}.json", i),
                    &format!(r#"{{"features": {{"text": {{"slang-rate": {}}}}}}}"#, v),
                )
            })
            .collect();
        let out = dir.path().join("stats.json");

        let message = stats(&profiles, Some(&out)).unwrap();
        assert!(message.contains("1 feature statistics"));

        let table = StatsTable::from_file(&out).unwrap();
        let (_, s) = table.iter().next().unwrap();
        assert_eq!(s.mean, 2.0);
        assert_eq!(s.sample_count, 3);
    }

    #[test]
    fn test_default_config_parses_back() {
        let text = config(None).unwrap();
        assert_eq!(NepConfig::from_toml_str(&text).unwrap(), NepConfig::default());
    }
}
