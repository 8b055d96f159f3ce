//! NEP command line
//!
//! # Usage
//! ```bash
//! nep tokenize --base base.json --stats stats.json --text text.json --content "..."
//! nep tokenize --base base.json --stats stats.json --report audio=audio_report.json
//! nep stats history/*.json --out stats.json
//! nep config > nep.toml
//! ```
//!
//! Tokens and tables go to stdout; logs go to stderr.

use clap::{Parser, Subcommand};
use nep_core::types::Modality;
use std::path::PathBuf;

mod commands;

/// NEP - affective deviation tokens from multimodal feature profiles
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Tokenize a current observation against a base profile
    Tokenize {
        /// Base profile (JSON)
        #[arg(long, value_name = "FILE")]
        base: PathBuf,

        /// Historical feature statistics (JSON)
        #[arg(long, value_name = "FILE")]
        stats: PathBuf,

        /// Completed text feature vector (JSON object of name -> number)
        #[arg(long, value_name = "FILE")]
        text: Option<PathBuf>,

        /// Completed audio feature vector (JSON object of name -> number)
        #[arg(long, value_name = "FILE")]
        audio: Option<PathBuf>,

        /// Analyzer report for a modality, e.g. audio=report.json
        #[arg(long, value_name = "MODALITY=FILE", value_parser = commands::parse_report)]
        report: Vec<(Modality, PathBuf)>,

        /// Logical content of the turn
        #[arg(long, default_value = "")]
        content: String,

        /// Configuration file (TOML)
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Pretty-print the token
        #[arg(long)]
        pretty: bool,
    },

    /// Build feature statistics from historical profiles
    Stats {
        /// Profiles (JSON)
        #[arg(required = true)]
        profiles: Vec<PathBuf>,

        /// Write the table here instead of stdout
        #[arg(short, long, value_name = "FILE")]
        out: Option<PathBuf>,
    },

    /// Print the configuration as TOML (defaults unless a file is given)
    Config {
        /// Configuration file to validate and print
        #[arg(value_name = "FILE")]
        path: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    if cli.verbose {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_max_level(tracing::Level::DEBUG)
            .with_target(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_target(false)
            .init();
    }

    let output = match cli.command {
        Commands::Tokenize {
            base,
            stats,
            text,
            audio,
            report,
            content,
            config,
            pretty,
        } => commands::tokenize(&commands::TokenizeArgs {
            base,
            stats,
            text,
            audio,
            reports: report,
            content,
            config,
            pretty,
        })?,
        Commands::Stats { profiles, out } => commands::stats(&profiles, out.as_deref())?,
        Commands::Config { path } => commands::config(path.as_deref())?,
    };

    println!("{}", output);
    Ok(())
}
