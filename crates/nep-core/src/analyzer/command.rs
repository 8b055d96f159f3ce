//! External analyzer processes
//!
//! Runs an analyzer program that prints a JSON report on stdout. Text input
//! is written to the program's stdin; file input is appended as the last
//! argument. Anything printed before the first `{` (an interactive prompt,
//! for instance) is ignored.

use super::report::flatten_report;
use super::{Analyzer, RawInput};
use crate::error::{NepError, Result};
use crate::profile::FeatureVector;
use crate::types::Modality;
use std::ffi::OsString;
use std::io::{ErrorKind, Write};
use std::path::Path;
use std::process::{Command, Stdio};
use std::thread;

/// Analyzer backed by an external program
#[derive(Debug, Clone)]
pub struct CommandAnalyzer {
    modality: Modality,
    program: OsString,
    args: Vec<OsString>,
}

impl CommandAnalyzer {
    pub fn new(modality: Modality, program: impl Into<OsString>) -> Self {
        Self {
            modality,
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Append a fixed argument (before any input path)
    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    fn failed(&self, reason: impl Into<String>) -> NepError {
        NepError::AnalyzerFailed {
            modality: self.modality,
            reason: reason.into(),
        }
    }

    fn run(&self, stdin_text: Option<&str>, path: Option<&Path>) -> Result<String> {
        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .stdin(if stdin_text.is_some() { Stdio::piped() } else { Stdio::null() })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(path) = path {
            command.arg(path);
        }

        tracing::debug!(program = ?self.program, modality = %self.modality, "spawning analyzer");
        let mut child = command
            .spawn()
            .map_err(|e| self.failed(format!("cannot start {:?}: {}", self.program, e)))?;

        // stdin is fed from its own thread while stdout is drained here, so an
        // analyzer that prints before reading cannot fill both pipes
        let writer = match (stdin_text, child.stdin.take()) {
            (Some(text), Some(mut stdin)) => {
                let text = text.to_owned();
                Some(thread::spawn(move || {
                    stdin
                        .write_all(text.as_bytes())
                        .and_then(|_| stdin.write_all(b"\n"))
                }))
            }
            _ => None,
        };

        let output = child.wait_with_output()?;
        if let Some(writer) = writer {
            let written = writer
                .join()
                .map_err(|_| self.failed("stdin writer panicked"))?;
            // an analyzer may exit without reading its input
            if let Err(e) = written {
                if e.kind() != ErrorKind::BrokenPipe {
                    return Err(e.into());
                }
            }
        }
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            tracing::warn!(modality = %self.modality, status = %output.status, "analyzer exited with failure");
            return Err(self.failed(format!("{}: {}", output.status, stderr.trim())));
        }

        String::from_utf8(output.stdout).map_err(|_| self.failed("stdout is not UTF-8"))
    }
}

impl Analyzer for CommandAnalyzer {
    fn modality(&self) -> Modality {
        self.modality
    }

    fn extract(&self, raw: &RawInput) -> Result<FeatureVector> {
        let stdout = match raw {
            RawInput::Report(report) => return flatten_report(self.modality, report),
            RawInput::Text(text) => self.run(Some(text.as_str()), None)?,
            RawInput::File(path) => self.run(None, Some(path.as_path()))?,
        };
        let start = stdout
            .find('{')
            .ok_or_else(|| self.failed("no JSON report on stdout"))?;
        let report: serde_json::Value = serde_json::from_str(stdout[start..].trim_end())
            .map_err(|e| self.failed(format!("invalid report: {}", e)))?;

        flatten_report(self.modality, &report).map_err(|e| {
            tracing::warn!(modality = %self.modality, error = %e, "analyzer reported failure");
            e
        })
    }
}
