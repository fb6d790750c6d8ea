//! Table detection: the seam to the external detection library.
//!
//! Finding tables on a PDF page (ruling-line analysis, whitespace
//! clustering) is not done here. A [`TableDetector`] receives a document,
//! a page selection and one strategy, and returns raw candidates. The
//! pipeline calls it once per configured strategy and treats any error as
//! "this strategy found nothing".
//!
//! [`CommandDetector`] is the production implementation: it runs an
//! external program speaking a small command-line contract (camelot-style
//! flavors and tuning flags in, a JSON array of candidates out). Library
//! callers and tests can plug in their own implementation through
//! [`crate::config::ExtractionConfigBuilder::detector`].
//!
//! Detectors are blocking; the pipeline runs them on
//! `tokio::task::spawn_blocking`.

use crate::config::{DetectionStrategy, PageSelection};
use crate::error::DetectorError;
use crate::table::RawCandidate;
use serde::Deserialize;
use std::ffi::OsString;
use std::path::PathBuf;
use std::process::Command;
use tracing::debug;

/// One detection call: a document, the pages to scan, and the strategy.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectionRequest {
    pub path: PathBuf,
    pub pages: PageSelection,
    pub strategy: DetectionStrategy,
}

/// External table detector.
///
/// Implementations must be `Send + Sync`; one instance serves every
/// document of a batch.
pub trait TableDetector: Send + Sync {
    /// Short identifier recorded as each table's `source` (e.g. `camelot`).
    fn name(&self) -> &str;

    /// Detect tables for one request. Candidates are returned in the order
    /// the detector found them.
    fn detect(&self, request: &DetectionRequest) -> Result<Vec<RawCandidate>, DetectorError>;
}

/// Runs an external program implementing the detector contract.
///
/// The program is invoked as
///
/// ```text
/// <program> [extra args] --flavor <lattice|stream> --pages <all|1,3|2-5>
///           (--line-scale N | --edge-tol N) <pdf>
/// ```
///
/// and must print a JSON array on stdout:
///
/// ```json
/// [{"page": 1, "accuracy": 97.2, "flavor": "lattice", "cells": [["a", "b"], ["c", null]]}]
/// ```
///
/// `accuracy` may be a fraction or a percentage (camelot reports
/// percentages); values above 1 are divided by 100.
#[derive(Debug, Clone)]
pub struct CommandDetector {
    program: String,
    name: String,
    extra_args: Vec<String>,
}

impl CommandDetector {
    /// Detector running `program`, recorded as source `camelot`.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            name: "camelot".to_string(),
            extra_args: Vec::new(),
        }
    }

    /// Override the source name recorded on each table.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Arguments placed before the generated flags (e.g. a script path
    /// when `program` is an interpreter).
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extra_args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Command-line arguments for one request.
    pub fn build_args(&self, request: &DetectionRequest) -> Vec<OsString> {
        let mut args: Vec<OsString> = self.extra_args.iter().map(OsString::from).collect();
        args.push("--flavor".into());
        args.push(request.strategy.name().into());
        args.push("--pages".into());
        args.push(request.pages.to_detector_arg().into());
        match request.strategy {
            DetectionStrategy::Lattice { line_scale } => {
                args.push("--line-scale".into());
                args.push(line_scale.to_string().into());
            }
            DetectionStrategy::Stream { edge_tol } => {
                args.push("--edge-tol".into());
                args.push(edge_tol.to_string().into());
            }
        }
        args.push(request.path.clone().into_os_string());
        args
    }
}

impl TableDetector for CommandDetector {
    fn name(&self) -> &str {
        &self.name
    }

    fn detect(&self, request: &DetectionRequest) -> Result<Vec<RawCandidate>, DetectorError> {
        let args = self.build_args(request);
        debug!("Running {} {:?}", self.program, args);

        let output = Command::new(&self.program)
            .args(&args)
            .output()
            .map_err(|source| DetectorError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(DetectorError::ExitStatus {
                program: self.program.clone(),
                status: output.status.to_string(),
                stderr: stderr.trim().to_string(),
            });
        }

        parse_output(&output.stdout, &request.strategy)
    }
}

/// Candidate as printed by a detector program.
#[derive(Debug, Deserialize)]
struct WireCandidate {
    page: usize,
    #[serde(default)]
    accuracy: Option<f64>,
    #[serde(default)]
    flavor: Option<String>,
    cells: Vec<Vec<Option<String>>>,
}

/// Parse a detector program's stdout into raw candidates.
///
/// Empty output means no tables. Candidates without a `flavor` inherit the
/// requested strategy's name.
pub fn parse_output(
    stdout: &[u8],
    strategy: &DetectionStrategy,
) -> Result<Vec<RawCandidate>, DetectorError> {
    let text = String::from_utf8_lossy(stdout);
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }

    let wire: Vec<WireCandidate> =
        serde_json::from_str(&text).map_err(|e| DetectorError::InvalidOutput(e.to_string()))?;

    Ok(wire
        .into_iter()
        .map(|w| RawCandidate {
            cells: w.cells,
            page: w.page,
            accuracy: w.accuracy.map(scale_accuracy),
            flavor: w.flavor.unwrap_or_else(|| strategy.name().to_string()),
        })
        .collect())
}

/// Map a percentage accuracy onto [0, 1]; fractions pass through.
fn scale_accuracy(accuracy: f64) -> f64 {
    if accuracy > 1.0 {
        accuracy / 100.0
    } else {
        accuracy
    }
}
