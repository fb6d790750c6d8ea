//! Error types for the edgequake-tables library.
//!
//! Failures are split by how far they reach:
//!
//! * [`TableExtractError`]: **Fatal for one document.** The document cannot
//!   be processed at all (missing file, not a PDF, report not writable).
//!   Returned as `Err(TableExtractError)` from the `extract*` functions. The
//!   batch driver records it and moves on to the next document.
//!
//! * [`StrategyError`]: **Non-fatal.** One detection strategy failed but the
//!   others may still produce tables. Stored inside
//!   [`crate::output::DocumentReport`] so callers can inspect partial success.
//!
//! * [`NormalizeError`]: **Non-fatal.** One raw candidate was malformed and
//!   was dropped before reaching the quality filter.
//!
//! * [`DetectorError`]: what a [`crate::pipeline::detect::TableDetector`]
//!   reports; the pipeline wraps it into a [`StrategyError`].

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the edgequake-tables library.
#[derive(Debug, Error)]
pub enum TableExtractError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("PDF file not found: '{path}'\nCheck the path exists and is readable.")]
    DocumentNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The file exists and was read, but is not a PDF.
    #[error("File is not a valid PDF: '{path}'\nFirst bytes: {magic:?}")]
    NotAPdf { path: PathBuf, magic: [u8; 4] },

    // ── Detector errors ───────────────────────────────────────────────────
    /// No table detector could be resolved from config or environment.
    #[error("No table detector configured.\n{hint}")]
    DetectorNotConfigured { hint: String },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create or write the output report.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A TOML configuration file could not be read or parsed.
    #[error("Config file '{path}': {detail}")]
    ConfigFile { path: PathBuf, detail: String },

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A non-fatal failure of a single detection strategy.
///
/// The strategy contributes zero candidates; the remaining strategies
/// still run.
#[derive(Debug, Clone, Error, serde::Serialize, serde::Deserialize)]
pub enum StrategyError {
    /// The detector reported an error for this strategy.
    #[error("Strategy '{strategy}': detector failed: {detail}")]
    DetectorFailed { strategy: String, detail: String },

    /// The blocking detector task panicked or was cancelled.
    #[error("Strategy '{strategy}': detector task aborted: {detail}")]
    Aborted { strategy: String, detail: String },
}

impl StrategyError {
    /// Name of the strategy that failed.
    pub fn strategy(&self) -> &str {
        match self {
            StrategyError::DetectorFailed { strategy, .. } => strategy,
            StrategyError::Aborted { strategy, .. } => strategy,
        }
    }
}

/// A raw candidate that could not be turned into a table record.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NormalizeError {
    /// Pages are 1-indexed; the detector reported page 0.
    #[error("candidate reports page 0 (pages are 1-indexed)")]
    ZeroPage,

    /// Accuracy must be a finite, non-negative number.
    #[error("candidate reports invalid accuracy {0}")]
    InvalidAccuracy(f64),

    /// The grid has no rows or no columns.
    #[error("candidate grid is empty")]
    Empty,

    /// The cleaned grid is not rectangular.
    #[error("row {row} has {found} cells, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },
}

/// Errors a table detector can report for one request.
#[derive(Debug, Error)]
pub enum DetectorError {
    /// The detector program could not be started.
    #[error("failed to run '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The detector program exited unsuccessfully.
    #[error("'{program}' exited with status {status}: {stderr}")]
    ExitStatus {
        program: String,
        status: String,
        stderr: String,
    },

    /// The detector output could not be parsed.
    #[error("invalid detector output: {0}")]
    InvalidOutput(String),

    /// The detector does not support the requested strategy.
    #[error("unsupported strategy '{0}'")]
    UnsupportedStrategy(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_not_found_display() {
        let e = TableExtractError::DocumentNotFound {
            path: PathBuf::from("/tmp/missing.pdf"),
        };
        assert!(e.to_string().contains("missing.pdf"));
    }

    #[test]
    fn strategy_error_names_strategy() {
        let e = StrategyError::DetectorFailed {
            strategy: "lattice".into(),
            detail: "ghostscript not found".into(),
        };
        assert_eq!(e.strategy(), "lattice");
        assert!(e.to_string().contains("ghostscript"));
    }

    #[test]
    fn ragged_display() {
        let e = NormalizeError::Ragged {
            row: 2,
            expected: 3,
            found: 1,
        };
        assert_eq!(e.to_string(), "row 2 has 1 cells, expected 3");
    }

    #[test]
    fn output_write_failed_keeps_source() {
        use std::error::Error as _;
        let e = TableExtractError::OutputWriteFailed {
            path: PathBuf::from("out/report.md"),
            source: std::io::Error::new(std::io::ErrorKind::Other, "disk full"),
        };
        assert!(e.source().is_some());
        assert!(e.to_string().contains("disk full"));
    }
}
