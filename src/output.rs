//! Output types: per-document reports and batch summaries.

use crate::error::{StrategyError, TableExtractError};
use crate::pipeline::quality::Rejection;
use crate::table::TableRecord;
use chrono::{DateTime, Local};
use serde::Serialize;
use std::path::PathBuf;

/// Facts about the source document, supplied to the renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentMetadata {
    /// File stem, used as the report title and file name.
    pub name: String,
    pub path: PathBuf,
    pub byte_size: u64,
    pub extracted_at: DateTime<Local>,
    /// Page selection in detector syntax (`all`, `1-5`, ...).
    pub pages: String,
    /// Strategies attempted, in order.
    pub strategies: Vec<String>,
    /// Detector source name.
    pub detector: String,
}

/// Counters describing what happened to every candidate of a document.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExtractionStats {
    pub strategies_run: usize,
    pub strategies_failed: usize,
    /// Raw candidates returned by all strategies.
    pub candidates_detected: usize,
    /// Candidates dropped as malformed.
    pub candidates_malformed: usize,
    /// Candidates with fewer than two rows after cleanup.
    pub candidates_empty: usize,
    pub rejected_too_small: usize,
    pub rejected_low_confidence: usize,
    pub rejected_sparse: usize,
    pub rejected_no_data: usize,
    pub duplicates_removed: usize,
    /// Tables in the final report.
    pub tables_kept: usize,
    pub duration_ms: u64,
}

impl ExtractionStats {
    /// Count one quality-filter rejection.
    pub fn record_rejection(&mut self, rejection: &Rejection) {
        match rejection {
            Rejection::TooSmall { .. } => self.rejected_too_small += 1,
            Rejection::LowConfidence { .. } => self.rejected_low_confidence += 1,
            Rejection::Sparse { .. } => self.rejected_sparse += 1,
            Rejection::NoDataRows => self.rejected_no_data += 1,
        }
    }

    /// Total quality-filter rejections.
    pub fn rejected_total(&self) -> usize {
        self.rejected_too_small
            + self.rejected_low_confidence
            + self.rejected_sparse
            + self.rejected_no_data
    }
}

/// The result of extracting one document: accepted, unique tables in
/// first-seen order, plus metadata and statistics.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentReport {
    pub metadata: DocumentMetadata,
    pub tables: Vec<TableRecord>,
    pub stats: ExtractionStats,
    /// Strategies that failed; their candidates are missing from `tables`.
    pub strategy_errors: Vec<StrategyError>,
}

/// Where a document's report was written.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WrittenReport {
    /// `None` when no table survived and empty reports are disabled.
    pub markdown_path: Option<PathBuf>,
    pub json_path: Option<PathBuf>,
    pub stats: ExtractionStats,
}

/// Outcome of one document in a batch.
#[derive(Debug)]
pub struct DocumentOutcome {
    pub path: PathBuf,
    pub result: Result<WrittenReport, TableExtractError>,
}

/// Outcomes of a batch, in input order.
#[derive(Debug, Default)]
pub struct BatchSummary {
    pub outcomes: Vec<DocumentOutcome>,
}

impl BatchSummary {
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }

    /// Tables written across all successful documents.
    pub fn tables_total(&self) -> usize {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().ok())
            .map(|w| w.stats.tables_kept)
            .sum()
    }

    /// Failed documents with their errors.
    pub fn failures(&self) -> impl Iterator<Item = (&PathBuf, &TableExtractError)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().err().map(|e| (&o.path, e)))
    }
}
