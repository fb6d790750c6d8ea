//! # edgequake-tables
//!
//! Extract tables from PDF documents into clean Markdown reports.
//!
//! ## Why this crate?
//!
//! Table detectors such as camelot find plenty of "tables" that are not:
//! page headers split into two cells, captions, mostly blank layout grids,
//! and the same table reported once per detection flavor. This crate sits
//! behind the detector and turns its raw output into something a person
//! wants to read: grids are tidied, weak candidates are filtered out,
//! re-detections are removed, and what remains is rendered as GFM pipe
//! tables in one report per document.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF
//!  │
//!  ├─ 1. Input      validate path (exists, readable, %PDF) or expand a directory
//!  ├─ 2. Detect     external detector, once per strategy (spawn_blocking)
//!  ├─ 3. Normalize  drop empty rows/columns, pad ragged rows, derive confidence
//!  ├─ 4. Filter     size, confidence, density and data-row rules
//!  ├─ 5. Dedup      SHA-256 of the cell grid, first occurrence wins
//!  └─ 6. Output     <stem>_extracted.md (+ optional JSON), written atomically
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use edgequake_tables::{extract_to_file, DetectionStrategy, ExtractionConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ExtractionConfig::builder()
//!         .detector_command("camelot-json")
//!         .strategies(vec![DetectionStrategy::lattice(), DetectionStrategy::stream()])
//!         .output_dir("reports")
//!         .build()?;
//!     let written = extract_to_file("survey.pdf", &config).await?;
//!     eprintln!("{} tables -> {:?}", written.stats.tables_kept, written.markdown_path);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdf2tables` binary (clap + anyhow + indicatif + tracing-subscriber) |
//!
//! Disable `cli` when using only the library to avoid pulling in CLI-only deps:
//! ```toml
//! edgequake-tables = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod extract;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod table;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{
    ConfidencePolicy, ConfigFile, DetectionStrategy, ExtractionConfig, ExtractionConfigBuilder,
    PageSelection, QualityThresholds,
};
pub use error::{DetectorError, NormalizeError, StrategyError, TableExtractError};
pub use extract::{
    extract_batch, extract_document, extract_sync, extract_to_file, resolve_detector,
    write_report,
};
pub use output::{
    BatchSummary, DocumentMetadata, DocumentOutcome, DocumentReport, ExtractionStats,
    WrittenReport,
};
pub use pipeline::detect::{CommandDetector, DetectionRequest, TableDetector};
pub use pipeline::markdown::{render_report, render_table};
pub use progress::{ExtractionProgressCallback, NoopProgressCallback, ProgressCallback};
pub use table::{RawCandidate, TableMetadata, TableRecord};
