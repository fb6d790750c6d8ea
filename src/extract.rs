//! Extraction entry points: one document, one report file, or a batch.
//!
//! ## Flow for one document
//!
//! ```text
//! resolve_document ─▶ for each strategy: detector.detect (spawn_blocking)
//!                  ─▶ normalize ─▶ quality filter ─▶ deduplicate ─▶ DocumentReport
//! ```
//!
//! A failing strategy is recorded in [`DocumentReport::strategy_errors`] and
//! the remaining strategies still run. A malformed candidate is dropped and
//! counted. Only problems with the document itself (missing, not a PDF,
//! report not writable, no detector) end processing of that document, and
//! [`extract_batch`] carries on with the next one.

use crate::config::ExtractionConfig;
use crate::error::{StrategyError, TableExtractError};
use crate::output::{
    BatchSummary, DocumentMetadata, DocumentOutcome, DocumentReport, ExtractionStats,
    WrittenReport,
};
use crate::pipeline::detect::{CommandDetector, DetectionRequest, TableDetector};
use crate::pipeline::normalize::Normalizer;
use crate::pipeline::quality::QualityFilter;
use crate::pipeline::{dedup, input, markdown};
use crate::table::{RawCandidate, TableRecord};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Environment variable naming the detector program when none is configured.
pub const DETECTOR_ENV: &str = "EDGEQUAKE_TABLES_DETECTOR";

/// Extract the tables of one PDF.
///
/// # Returns
/// `Ok(DocumentReport)` whenever the document itself could be processed,
/// even if some strategies failed (check `report.strategy_errors`) or no
/// table survived filtering.
///
/// # Errors
/// Returns `Err(TableExtractError)` only for fatal errors:
/// - File not found / permission denied
/// - Not a PDF
/// - No detector configured
pub async fn extract_document(
    path: impl AsRef<Path>,
    config: &ExtractionConfig,
) -> Result<DocumentReport, TableExtractError> {
    let started = Instant::now();
    let path = path.as_ref();
    info!("Extracting tables: {}", path.display());

    // ── Step 1: Validate input ───────────────────────────────────────────
    let document = input::resolve_document(path)?;

    // ── Step 2: Resolve detector ─────────────────────────────────────────
    let detector = resolve_detector(config)?;

    // ── Step 3: Run every strategy ───────────────────────────────────────
    let mut stats = ExtractionStats::default();
    let (candidates, strategy_errors) =
        run_strategies(&detector, &document.path, config, &mut stats).await;

    // ── Step 4: Normalise and filter ─────────────────────────────────────
    let accepted = normalize_and_filter(candidates, detector.name(), config, &mut stats);

    // ── Step 5: De-duplicate ─────────────────────────────────────────────
    let before = accepted.len();
    let tables = dedup::deduplicate(accepted);
    stats.duplicates_removed = before - tables.len();
    stats.tables_kept = tables.len();
    stats.duration_ms = started.elapsed().as_millis() as u64;

    info!(
        "{}: {} candidates, {} rejected, {} duplicates, {} tables kept ({}ms)",
        document.stem,
        stats.candidates_detected,
        stats.rejected_total(),
        stats.duplicates_removed,
        stats.tables_kept,
        stats.duration_ms
    );

    let metadata = DocumentMetadata {
        name: document.stem,
        path: document.path,
        byte_size: document.byte_size,
        extracted_at: chrono::Local::now(),
        pages: config.pages.to_detector_arg(),
        strategies: config.strategies.iter().map(|s| s.to_string()).collect(),
        detector: detector.name().to_string(),
    };

    Ok(DocumentReport {
        metadata,
        tables,
        stats,
        strategy_errors,
    })
}

/// Extract one PDF and write its report(s) into the configured output directory.
///
/// The Markdown report goes to `<output_dir>/<stem><suffix>.md`, and with
/// `write_json` a JSON report goes next to it. The files are written all or
/// nothing: each is staged in a temp file in its destination directory, and
/// only when every file is staged are they renamed into place. A failure
/// leaves no new report behind.
///
/// When no table survives and `write_empty_reports` is off, nothing is
/// written, the returned paths are `None`, and a report left by an earlier
/// run of the same document is removed so it cannot be mistaken for this
/// run's result.
pub async fn extract_to_file(
    path: impl AsRef<Path>,
    config: &ExtractionConfig,
) -> Result<WrittenReport, TableExtractError> {
    let report = extract_document(path, config).await?;
    write_report(&report, config).await
}

/// Write an already-built report according to the output settings.
pub async fn write_report(
    report: &DocumentReport,
    config: &ExtractionConfig,
) -> Result<WrittenReport, TableExtractError> {
    let stem = &report.metadata.name;
    let markdown_path = config.markdown_path(stem);
    let json_path = config.json_path(stem);

    if report.tables.is_empty() && !config.write_empty_reports {
        info!("{}: no tables passed filtering, no report written", stem);
        run_blocking(move || remove_stale(&[markdown_path, json_path])).await?;
        return Ok(WrittenReport {
            markdown_path: None,
            json_path: None,
            stats: report.stats.clone(),
        });
    }

    let mut files = vec![(markdown_path.clone(), markdown::render_report(report))];
    if config.write_json {
        let json = serde_json::to_string_pretty(report)
            .map_err(|e| TableExtractError::Internal(format!("serialise report: {e}")))?;
        files.push((json_path.clone(), json));
    }

    run_blocking(move || persist_all(&files)).await?;
    info!("Wrote {}", markdown_path.display());

    Ok(WrittenReport {
        markdown_path: Some(markdown_path),
        json_path: config.write_json.then_some(json_path),
        stats: report.stats.clone(),
    })
}

/// Process every document named by `inputs`, one after another.
///
/// Directories expand to their `*.pdf` files. A document that fails is
/// recorded in the summary and does not stop the batch.
pub async fn extract_batch(inputs: &[PathBuf], config: &ExtractionConfig) -> BatchSummary {
    let documents = input::discover_documents(inputs);
    let total = documents.len();
    info!("Processing {} document(s)", total);

    if let Some(ref cb) = config.progress_callback {
        cb.on_batch_start(total);
    }

    let mut summary = BatchSummary::default();
    for (i, path) in documents.into_iter().enumerate() {
        let index = i + 1;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        if let Some(ref cb) = config.progress_callback {
            cb.on_document_start(index, total, &name);
        }

        let result = extract_to_file(&path, config).await;

        match &result {
            Ok(written) => {
                if let Some(ref cb) = config.progress_callback {
                    cb.on_document_complete(index, total, written.stats.tables_kept);
                }
            }
            Err(e) => {
                warn!("Skipping {}: {}", path.display(), e);
                if let Some(ref cb) = config.progress_callback {
                    cb.on_document_error(index, total, &e.to_string());
                }
            }
        }

        summary.outcomes.push(DocumentOutcome { path, result });
    }

    info!(
        "Batch complete: {}/{} documents, {} tables",
        summary.succeeded(),
        total,
        summary.tables_total()
    );

    if let Some(ref cb) = config.progress_callback {
        cb.on_batch_complete(total, summary.succeeded());
    }

    summary
}

/// Synchronous wrapper around [`extract_document`].
///
/// Creates a temporary tokio runtime internally.
pub fn extract_sync(
    path: impl AsRef<Path>,
    config: &ExtractionConfig,
) -> Result<DocumentReport, TableExtractError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| TableExtractError::Internal(format!("Failed to create tokio runtime: {}", e)))?
        .block_on(extract_document(path, config))
}

// ── Internal helpers ─────────────────────────────────────────────────────

/// Resolve the table detector, from most-specific to least-specific.
///
/// 1. **Pre-built detector** (`config.detector`), used as-is. This is how
///    library callers and tests plug in their own implementation.
/// 2. **Detector command** (`config.detector_command`), run as a
///    [`CommandDetector`] named after `config.detector_name` when set.
/// 3. **Environment** (`EDGEQUAKE_TABLES_DETECTOR`), same as 2.
pub fn resolve_detector(
    config: &ExtractionConfig,
) -> Result<Arc<dyn TableDetector>, TableExtractError> {
    if let Some(ref detector) = config.detector {
        return Ok(Arc::clone(detector));
    }

    let command = config
        .detector_command
        .clone()
        .filter(|c| !c.trim().is_empty())
        .or_else(|| std::env::var(DETECTOR_ENV).ok());

    if let Some(mut detector) = command.as_deref().and_then(command_detector) {
        if let Some(ref name) = config.detector_name {
            detector = detector.with_name(name.clone());
        }
        return Ok(Arc::new(detector));
    }

    Err(TableExtractError::DetectorNotConfigured {
        hint: format!(
            "Pass --detector <program>, set detector in the config file, or export {DETECTOR_ENV}.\n\
            The program must accept --flavor/--pages and print a JSON array of tables."
        ),
    })
}

/// Build a [`CommandDetector`] from a command line such as
/// `python3 tools/camelot_json.py`. Blank input yields `None`.
fn command_detector(command: &str) -> Option<CommandDetector> {
    let mut parts = command.split_whitespace();
    let program = parts.next()?;
    Some(CommandDetector::new(program).with_args(parts))
}

/// Run each configured strategy in order, pooling candidates.
async fn run_strategies(
    detector: &Arc<dyn TableDetector>,
    path: &Path,
    config: &ExtractionConfig,
    stats: &mut ExtractionStats,
) -> (Vec<RawCandidate>, Vec<StrategyError>) {
    let mut candidates = Vec::new();
    let mut errors = Vec::new();

    for strategy in &config.strategies {
        stats.strategies_run += 1;
        let request = DetectionRequest {
            path: path.to_path_buf(),
            pages: config.pages.clone(),
            strategy: *strategy,
        };

        // Detectors block (usually on a child process): keep them off the
        // async executor threads.
        let detector = Arc::clone(detector);
        let joined = tokio::task::spawn_blocking(move || detector.detect(&request)).await;

        let outcome = match joined {
            Ok(Ok(found)) => Ok(found),
            Ok(Err(e)) => Err(StrategyError::DetectorFailed {
                strategy: strategy.name().to_string(),
                detail: e.to_string(),
            }),
            Err(e) => Err(StrategyError::Aborted {
                strategy: strategy.name().to_string(),
                detail: e.to_string(),
            }),
        };

        match outcome {
            Ok(found) => {
                debug!("Strategy {} returned {} candidates", strategy, found.len());
                if let Some(ref cb) = config.progress_callback {
                    cb.on_strategy_complete(strategy.name(), found.len(), None);
                }
                stats.candidates_detected += found.len();
                candidates.extend(found);
            }
            Err(e) => {
                warn!("{}", e);
                if let Some(ref cb) = config.progress_callback {
                    cb.on_strategy_complete(strategy.name(), 0, Some(&e.to_string()));
                }
                stats.strategies_failed += 1;
                errors.push(e);
            }
        }
    }

    (candidates, errors)
}

/// Normalise every candidate and keep those the quality filter accepts,
/// in detection order.
fn normalize_and_filter(
    candidates: Vec<RawCandidate>,
    source: &str,
    config: &ExtractionConfig,
    stats: &mut ExtractionStats,
) -> Vec<TableRecord> {
    let normalizer = Normalizer::from_config(source, config);
    let filter = QualityFilter::new(config.quality);
    let mut accepted = Vec::new();

    for candidate in candidates {
        let page = candidate.page;
        let record = match normalizer.normalize(candidate) {
            Ok(Some(record)) => record,
            Ok(None) => {
                debug!("Dropping empty candidate on page {}", page);
                stats.candidates_empty += 1;
                continue;
            }
            Err(e) => {
                warn!("Dropping malformed candidate on page {}: {}", page, e);
                stats.candidates_malformed += 1;
                continue;
            }
        };

        match filter.evaluate(&record) {
            Ok(()) => accepted.push(record),
            Err(rejection) => {
                debug!(
                    "Rejected table on page {} ({}x{}): {}",
                    record.page(),
                    record.num_rows(),
                    record.num_cols(),
                    rejection
                );
                stats.record_rejection(&rejection);
            }
        }
    }

    accepted
}

/// Run a blocking file operation off the async executor threads.
async fn run_blocking<F>(op: F) -> Result<(), TableExtractError>
where
    F: FnOnce() -> Result<(), TableExtractError> + Send + 'static,
{
    tokio::task::spawn_blocking(op)
        .await
        .map_err(|e| TableExtractError::Internal(format!("write task failed: {e}")))?
}

/// Write every `(path, contents)` pair, all or nothing.
///
/// All files are staged first (temp file in the destination directory), so
/// a full disk or unwritable directory fails before anything is renamed.
/// If a rename fails, files already renamed into place are removed again.
fn persist_all(files: &[(PathBuf, String)]) -> Result<(), TableExtractError> {
    let mut staged = Vec::with_capacity(files.len());
    for (path, contents) in files {
        let tmp = stage(path, contents.as_bytes()).map_err(|e| write_failed(path, e))?;
        staged.push((tmp, path));
    }

    let mut persisted: Vec<&PathBuf> = Vec::with_capacity(staged.len());
    for (tmp, path) in staged {
        if let Err(e) = tmp.persist(path) {
            for done in persisted {
                if let Err(cleanup) = std::fs::remove_file(done) {
                    warn!("Could not remove {}: {}", done.display(), cleanup);
                }
            }
            return Err(write_failed(path, e.error));
        }
        persisted.push(path);
    }
    Ok(())
}

fn write_failed(path: &Path, source: std::io::Error) -> TableExtractError {
    TableExtractError::OutputWriteFailed {
        path: path.to_path_buf(),
        source,
    }
}

/// Write `contents` to a synced temp file next to `path`.
fn stage(path: &Path, contents: &[u8]) -> std::io::Result<tempfile::NamedTempFile> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;

    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(contents)?;
    tmp.as_file().sync_all()?;
    Ok(tmp)
}

/// Remove reports left by an earlier run. Missing files are fine.
fn remove_stale(paths: &[PathBuf]) -> Result<(), TableExtractError> {
    for path in paths {
        match std::fs::remove_file(path) {
            Ok(()) => info!("Removed stale report {}", path.display()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(write_failed(path, e)),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn command_detector_splits_program_and_args() {
        let d = command_detector("python3 tools/camelot_json.py --quiet").unwrap();
        assert_eq!(d.program(), "python3");
        assert_eq!(d.name(), "camelot");

        assert!(command_detector("   ").is_none());
    }

    #[test]
    fn configured_command_wins_over_environment() {
        let config = ExtractionConfig::builder()
            .detector_command("camelot-json")
            .build()
            .unwrap();
        let detector = resolve_detector(&config).unwrap();
        assert_eq!(detector.name(), "camelot");
    }

    #[test]
    fn detector_name_overrides_recorded_source() {
        let config = ExtractionConfig::builder()
            .detector_command("tabula-json --lattice")
            .detector_name("tabula")
            .build()
            .unwrap();
        let detector = resolve_detector(&config).unwrap();
        assert_eq!(detector.name(), "tabula");
    }

    fn files(entries: &[(&Path, &str)]) -> Vec<(PathBuf, String)> {
        entries
            .iter()
            .map(|(p, c)| (p.to_path_buf(), c.to_string()))
            .collect()
    }

    #[test]
    fn persist_creates_parent_and_overwrites() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("nested/out/report.md");

        persist_all(&files(&[(&target, "first")])).unwrap();
        persist_all(&files(&[(&target, "second")])).unwrap();

        assert_eq!(std::fs::read_to_string(&target).unwrap(), "second");
        let leftovers = std::fs::read_dir(target.parent().unwrap()).unwrap().count();
        assert_eq!(leftovers, 1, "temp files must not be left behind");
    }

    #[test]
    fn persist_reports_target_path_on_failure() {
        let dir = TempDir::new().unwrap();
        // A regular file where a directory is expected.
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, b"x").unwrap();
        let target = blocker.join("report.md");

        let err = persist_all(&files(&[(&target, "content")])).unwrap_err();
        match err {
            TableExtractError::OutputWriteFailed { path, .. } => assert_eq!(path, target),
            other => panic!("expected OutputWriteFailed, got {other:?}"),
        }
    }

    #[test]
    fn persist_is_all_or_nothing() {
        let dir = TempDir::new().unwrap();
        let md = dir.path().join("doc_extracted.md");
        let json = dir.path().join("doc_extracted.json");
        // A non-empty directory cannot be replaced by a file.
        std::fs::create_dir_all(json.join("occupied")).unwrap();

        let err = persist_all(&files(&[(&md, "# doc"), (&json, "{}")])).unwrap_err();
        assert!(matches!(err, TableExtractError::OutputWriteFailed { ref path, .. } if *path == json));
        assert!(!md.exists(), "first file must be rolled back");

        let names: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["doc_extracted.json"]);
    }

    #[test]
    fn remove_stale_ignores_missing_files() {
        let dir = TempDir::new().unwrap();
        let present = dir.path().join("old_extracted.md");
        std::fs::write(&present, "old").unwrap();
        let absent = dir.path().join("old_extracted.json");

        remove_stale(&[present.clone(), absent]).unwrap();
        assert!(!present.exists());
    }
}
