//! CLI binary for edgequake-tables.
//!
//! A thin shim over the library crate that maps CLI flags (layered over an
//! optional TOML config file) to `ExtractionConfig` and prints results.

use anyhow::{Context, Result};
use clap::Parser;
use edgequake_tables::pipeline::input::discover_documents;
use edgequake_tables::{
    extract_batch, extract_document, render_report, ConfidencePolicy, ConfigFile,
    DetectionStrategy, ExtractionConfig, ExtractionProgressCallback, PageSelection,
    ProgressCallback,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn yellow(s: &str) -> String {
    format!("\x1b[33m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: one bar over the documents of the batch,
/// with a log line per document and per failed strategy.
struct CliProgressCallback {
    bar: ProgressBar,
    /// Name of the document currently being processed.
    current: std::sync::Mutex<String>,
    tables: AtomicUsize,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new(0); // length set in on_batch_start
        let style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>3}/{len} docs  \
             ⏱ {elapsed_precise}  {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);

        bar.set_style(style);
        bar.set_prefix("Extracting");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self {
            bar,
            current: std::sync::Mutex::new(String::new()),
            tables: AtomicUsize::new(0),
        })
    }

    fn current_name(&self) -> String {
        self.current
            .lock()
            .map(|name| name.clone())
            .unwrap_or_default()
    }
}

impl ExtractionProgressCallback for CliProgressCallback {
    fn on_batch_start(&self, total_documents: usize) {
        self.bar.set_length(total_documents as u64);
        self.bar.println(format!(
            "{} {}",
            cyan("◆"),
            bold(&format!("Extracting tables from {total_documents} document(s)…"))
        ));
    }

    fn on_document_start(&self, _index: usize, _total: usize, name: &str) {
        if let Ok(mut current) = self.current.lock() {
            *current = name.to_string();
        }
        self.bar.set_message(name.to_string());
    }

    fn on_strategy_complete(&self, strategy: &str, _candidates: usize, error: Option<&str>) {
        if let Some(error) = error {
            self.bar.println(format!(
                "    {} {} {}",
                yellow("⚠"),
                strategy,
                dim(&truncate(error, 80))
            ));
        }
    }

    fn on_document_complete(&self, index: usize, total: usize, tables: usize) {
        self.tables.fetch_add(tables, Ordering::SeqCst);
        self.bar.println(format!(
            "  {} {:>3}/{:<3}  {}  {}",
            green("✓"),
            index,
            total,
            self.current_name(),
            dim(&format!("{tables} tables")),
        ));
        self.bar.inc(1);
    }

    fn on_document_error(&self, index: usize, total: usize, error: &str) {
        self.bar.println(format!(
            "  {} {:>3}/{:<3}  {}  {}",
            red("✗"),
            index,
            total,
            self.current_name(),
            red(&truncate(error, 80)),
        ));
        self.bar.inc(1);
    }

    fn on_batch_complete(&self, total_documents: usize, success_count: usize) {
        let failed = total_documents.saturating_sub(success_count);
        let tables = self.tables.load(Ordering::SeqCst);
        self.bar.finish_and_clear();

        if failed == 0 {
            eprintln!(
                "{} {} document(s) processed, {} tables extracted",
                green("✔"),
                bold(&success_count.to_string()),
                bold(&tables.to_string())
            );
        } else {
            eprintln!(
                "{} {}/{} document(s) processed, {} tables extracted  ({} failed)",
                if failed == total_documents {
                    red("✘")
                } else {
                    cyan("⚠")
                },
                bold(&success_count.to_string()),
                total_documents,
                bold(&tables.to_string()),
                red(&failed.to_string()),
            );
        }
    }
}

/// Shorten a message to `max` characters, on a char boundary.
fn truncate(msg: &str, max: usize) -> String {
    let first_line = msg.lines().next().unwrap_or_default();
    if first_line.chars().count() > max {
        let cut: String = first_line.chars().take(max - 1).collect();
        format!("{cut}\u{2026}")
    } else {
        first_line.to_string()
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Extract tables from one document into ./output/report_extracted.md
  pdf2tables --detector camelot-json report.pdf

  # Every PDF in a directory, both flavors, JSON sidecar
  pdf2tables --strategies lattice,stream --json papers/

  # Only pages 2-4, stricter filtering, print instead of writing files
  pdf2tables --pages 2-4 --min-rows 4 --min-density 0.6 --stdout report.pdf

  # Thresholds from a config file, one flag overridden
  pdf2tables --config tables.toml --output-dir reports report.pdf

DETECTOR CONTRACT:
  The detector program is called once per strategy as
    <program> --flavor <lattice|stream> --pages <all|1,3|2-5>
              (--line-scale N | --edge-tol N) <pdf>
  and must print a JSON array on stdout:
    [{"page": 1, "accuracy": 93.4, "flavor": "stream", "cells": [["a", "b"]]}]
  A command line with arguments ("python3 camelot_json.py") is accepted.

CONFIG FILE (TOML):
  detector = "camelot-json"
  pages = "all"
  confidence_policy = "floor"

  [[strategies]]
  flavor = "lattice"
  line_scale = 40

  [quality]
  min_rows = 3
  min_density = 0.4

  [output]
  dir = "reports"
  json = true

ENVIRONMENT VARIABLES:
  EDGEQUAKE_TABLES_DETECTOR  Detector program when --detector is not given
  RUST_LOG                   Override log filter (e.g. edgequake_tables=debug)
"#;

/// Extract tables from PDF documents into Markdown reports.
#[derive(Parser, Debug)]
#[command(
    name = "pdf2tables",
    version,
    about = "Extract tables from PDF documents into Markdown reports",
    long_about = "Run an external table detector over PDF documents, keep the tables that look \
like real data, remove duplicates found by several strategies, and write one Markdown report \
per document.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// PDF files or directories containing PDF files.
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// TOML config file; command-line flags override its values.
    #[arg(long, env = "PDF2TABLES_CONFIG")]
    config: Option<PathBuf>,

    /// Detector program (optionally with leading arguments).
    #[arg(long, env = "PDF2TABLES_DETECTOR")]
    detector: Option<String>,

    /// Source name recorded on each table (default: camelot).
    #[arg(long, env = "PDF2TABLES_DETECTOR_NAME")]
    detector_name: Option<String>,

    /// Detection strategies in order: lattice, stream.
    #[arg(long, env = "PDF2TABLES_STRATEGIES", value_delimiter = ',')]
    strategies: Vec<String>,

    /// Lattice line scale.
    #[arg(long, env = "PDF2TABLES_LINE_SCALE")]
    line_scale: Option<u32>,

    /// Stream edge tolerance.
    #[arg(long, env = "PDF2TABLES_EDGE_TOL")]
    edge_tol: Option<u32>,

    /// Page selection: all, 5, 3-15, or 1,3,5,7.
    #[arg(long, env = "PDF2TABLES_PAGES")]
    pages: Option<String>,

    /// Minimum rows, header included.
    #[arg(long, env = "PDF2TABLES_MIN_ROWS")]
    min_rows: Option<usize>,

    /// Minimum columns.
    #[arg(long, env = "PDF2TABLES_MIN_COLS")]
    min_cols: Option<usize>,

    /// Minimum confidence (0.0–1.0).
    #[arg(long, env = "PDF2TABLES_MIN_CONFIDENCE")]
    min_confidence: Option<f64>,

    /// Minimum fraction of non-empty cells (0.0–1.0).
    #[arg(long, env = "PDF2TABLES_MIN_DENSITY")]
    min_density: Option<f64>,

    /// Minimum non-empty cells in at least one body row.
    #[arg(long, env = "PDF2TABLES_MIN_DATA_ROW_CELLS")]
    min_data_row_cells: Option<usize>,

    /// How detector accuracy becomes confidence: floor or reported.
    #[arg(long, env = "PDF2TABLES_CONFIDENCE_POLICY")]
    confidence_policy: Option<String>,

    /// Confidence given to tables without (or, under `floor`, below) an accuracy.
    #[arg(long, env = "PDF2TABLES_CONFIDENCE_FLOOR")]
    confidence_floor: Option<f64>,

    /// Directory for the reports.
    #[arg(short, long, env = "PDF2TABLES_OUTPUT_DIR")]
    output_dir: Option<PathBuf>,

    /// Appended to the document name to name the report.
    #[arg(long, env = "PDF2TABLES_SUFFIX")]
    suffix: Option<String>,

    /// Also write a JSON report next to each Markdown report.
    #[arg(long, env = "PDF2TABLES_JSON")]
    json: bool,

    /// Write a report even when no table passed filtering.
    #[arg(long, env = "PDF2TABLES_WRITE_EMPTY")]
    write_empty: bool,

    /// Print each report to stdout instead of writing files.
    #[arg(long)]
    stdout: bool,

    /// Disable progress bar.
    #[arg(long, env = "PDF2TABLES_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "PDF2TABLES_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "PDF2TABLES_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // Suppress INFO-level library logs when the progress bar is active;
    // the bar provides all the feedback that matters to the user.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.stdout;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Build config ─────────────────────────────────────────────────────
    let progress_cb: Option<ProgressCallback> = if show_progress {
        let cb = CliProgressCallback::new();
        Some(cb as Arc<dyn ExtractionProgressCallback>)
    } else {
        None
    };

    let config = build_config(&cli, progress_cb)?;

    // ── Stdout mode ──────────────────────────────────────────────────────
    if cli.stdout {
        return print_reports(&cli, &config).await;
    }

    // ── Run batch ────────────────────────────────────────────────────────
    let summary = extract_batch(&cli.inputs, &config).await;

    if summary.outcomes.is_empty() {
        anyhow::bail!("No PDF documents found in the given inputs");
    }

    if !cli.quiet && !show_progress {
        for outcome in &summary.outcomes {
            match &outcome.result {
                Ok(written) => match written.markdown_path {
                    Some(ref md) => eprintln!(
                        "{}  {} tables  →  {}",
                        green("✔"),
                        written.stats.tables_kept,
                        bold(&md.display().to_string())
                    ),
                    None => eprintln!(
                        "{}  {}  {}",
                        cyan("–"),
                        outcome.path.display(),
                        dim("no tables passed filtering")
                    ),
                },
                Err(e) => eprintln!("{}  {}: {}", red("✘"), outcome.path.display(), e),
            }
        }
        eprintln!(
            "Processed {}/{} documents, {} tables",
            summary.succeeded(),
            summary.outcomes.len(),
            summary.tables_total()
        );
    }

    if summary.succeeded() == 0 {
        std::process::exit(1);
    }

    Ok(())
}

/// `--stdout`: render each document's report and print it.
async fn print_reports(cli: &Cli, config: &ExtractionConfig) -> Result<()> {
    let documents = discover_documents(&cli.inputs);
    if documents.is_empty() {
        anyhow::bail!("No PDF documents found in the given inputs");
    }

    let stdout = io::stdout();
    let mut succeeded = 0usize;

    for path in &documents {
        match extract_document(path, config).await {
            Ok(report) => {
                succeeded += 1;
                let mut handle = stdout.lock();
                handle
                    .write_all(render_report(&report).as_bytes())
                    .context("Failed to write to stdout")?;
                if documents.len() > 1 {
                    handle.write_all(b"\n").context("Failed to write to stdout")?;
                }
            }
            Err(e) => eprintln!("{}  {}: {}", red("✘"), path.display(), e),
        }
    }

    if succeeded == 0 {
        std::process::exit(1);
    }
    Ok(())
}

/// Map CLI args to `ExtractionConfig`: defaults, then config file, then flags.
fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<ExtractionConfig> {
    let mut builder = ExtractionConfig::builder();

    if let Some(ref path) = cli.config {
        let file = ConfigFile::load(path).context("Failed to load config file")?;
        builder = file.apply(builder).context("Invalid config file")?;
    }

    if let Some(ref detector) = cli.detector {
        builder = builder.detector_command(detector.clone());
    }
    if let Some(ref name) = cli.detector_name {
        builder = builder.detector_name(name.clone());
    }
    if !cli.strategies.is_empty() {
        let strategies = cli
            .strategies
            .iter()
            .map(|s| s.parse::<DetectionStrategy>())
            .collect::<Result<Vec<_>, _>>()
            .context("Invalid --strategies")?;
        builder = builder.strategies(strategies);
    }
    if let Some(scale) = cli.line_scale {
        builder = builder.line_scale(scale);
    }
    if let Some(tol) = cli.edge_tol {
        builder = builder.edge_tol(tol);
    }
    if let Some(ref pages) = cli.pages {
        let pages: PageSelection = pages.parse().context("Invalid --pages")?;
        builder = builder.pages(pages);
    }
    if let Some(n) = cli.min_rows {
        builder = builder.min_rows(n);
    }
    if let Some(n) = cli.min_cols {
        builder = builder.min_cols(n);
    }
    if let Some(c) = cli.min_confidence {
        builder = builder.min_confidence(c);
    }
    if let Some(d) = cli.min_density {
        builder = builder.min_density(d);
    }
    if let Some(n) = cli.min_data_row_cells {
        builder = builder.min_data_row_cells(n);
    }
    if let Some(ref policy) = cli.confidence_policy {
        let policy: ConfidencePolicy = policy.parse().context("Invalid --confidence-policy")?;
        builder = builder.confidence_policy(policy);
    }
    if let Some(floor) = cli.confidence_floor {
        builder = builder.confidence_floor(floor);
    }
    if let Some(ref dir) = cli.output_dir {
        builder = builder.output_dir(dir.clone());
    }
    if let Some(ref suffix) = cli.suffix {
        builder = builder.output_suffix(suffix.clone());
    }
    if cli.json {
        builder = builder.write_json(true);
    }
    if cli.write_empty {
        builder = builder.write_empty_reports(true);
    }
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}
