//! Configuration types for table extraction.
//!
//! All extraction behaviour is controlled through [`ExtractionConfig`], built
//! via its [`ExtractionConfigBuilder`]. The same knobs can be loaded from a
//! TOML file through [`ConfigFile`] and overlaid on a builder, so thresholds
//! can be tuned per document corpus without recompiling.

use crate::error::TableExtractError;
use crate::pipeline::detect::TableDetector;
use crate::progress::ProgressCallback;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

/// Configuration for a table-extraction run.
///
/// Built via [`ExtractionConfig::builder()`] or using
/// [`ExtractionConfig::default()`].
///
/// # Example
/// ```rust
/// use edgequake_tables::{DetectionStrategy, ExtractionConfig};
///
/// let config = ExtractionConfig::builder()
///     .strategies(vec![DetectionStrategy::lattice(), DetectionStrategy::stream()])
///     .min_rows(4)
///     .min_density(0.5)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct ExtractionConfig {
    /// Detection strategies to try, in order. Default: `[stream]`.
    ///
    /// Every strategy runs against the whole page selection; their surviving
    /// tables are pooled before de-duplication, so running both flavors costs
    /// time but never produces the same table twice.
    pub strategies: Vec<DetectionStrategy>,

    /// Pages handed to the detector. Default: all pages.
    pub pages: PageSelection,

    /// Quality-filter thresholds.
    pub quality: QualityThresholds,

    /// How reported accuracy becomes record confidence. Default: [`ConfidencePolicy::Floor`].
    pub confidence_policy: ConfidencePolicy,

    /// Confidence assigned when accuracy is absent (and, under
    /// [`ConfidencePolicy::Floor`], when it is below this value). Default: 0.5.
    pub confidence_floor: f64,

    /// Directory the reports are written to. Default: `output`.
    pub output_dir: PathBuf,

    /// Appended to the document stem to name the report. Default: `_extracted`.
    pub output_suffix: String,

    /// Also write a JSON report next to the Markdown one. Default: false.
    pub write_json: bool,

    /// Write a report even when no table survived filtering. Default: false.
    /// When false, reports left by an earlier run for that document are
    /// removed.
    pub write_empty_reports: bool,

    /// Program implementing the detector command-line contract.
    /// If None along with `detector`, `EDGEQUAKE_TABLES_DETECTOR` is consulted.
    pub detector_command: Option<String>,

    /// Source name recorded on tables found by a command detector.
    /// Default: None (`camelot`). Ignored when `detector` is set.
    pub detector_name: Option<String>,

    /// Pre-constructed detector. Takes precedence over `detector_command`.
    pub detector: Option<Arc<dyn TableDetector>>,

    /// Progress events for each document and strategy.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            strategies: vec![DetectionStrategy::stream()],
            pages: PageSelection::default(),
            quality: QualityThresholds::default(),
            confidence_policy: ConfidencePolicy::default(),
            confidence_floor: 0.5,
            output_dir: PathBuf::from("output"),
            output_suffix: "_extracted".to_string(),
            write_json: false,
            write_empty_reports: false,
            detector_command: None,
            detector_name: None,
            detector: None,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for ExtractionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtractionConfig")
            .field("strategies", &self.strategies)
            .field("pages", &self.pages)
            .field("quality", &self.quality)
            .field("confidence_policy", &self.confidence_policy)
            .field("confidence_floor", &self.confidence_floor)
            .field("output_dir", &self.output_dir)
            .field("output_suffix", &self.output_suffix)
            .field("write_json", &self.write_json)
            .field("write_empty_reports", &self.write_empty_reports)
            .field("detector_command", &self.detector_command)
            .field("detector_name", &self.detector_name)
            .field("detector", &self.detector.as_ref().map(|d| d.name().to_string()))
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn ExtractionProgressCallback>"),
            )
            .finish()
    }
}

impl ExtractionConfig {
    /// Create a new builder for `ExtractionConfig`.
    pub fn builder() -> ExtractionConfigBuilder {
        ExtractionConfigBuilder {
            config: Self::default(),
        }
    }

    /// Path of the Markdown report for a document with the given stem.
    pub fn markdown_path(&self, stem: &str) -> PathBuf {
        self.output_dir
            .join(format!("{}{}.md", stem, self.output_suffix))
    }

    /// Path of the JSON report for a document with the given stem.
    pub fn json_path(&self, stem: &str) -> PathBuf {
        self.output_dir
            .join(format!("{}{}.json", stem, self.output_suffix))
    }
}

/// Builder for [`ExtractionConfig`].
#[derive(Debug)]
pub struct ExtractionConfigBuilder {
    config: ExtractionConfig,
}

impl ExtractionConfigBuilder {
    pub fn strategies(mut self, strategies: Vec<DetectionStrategy>) -> Self {
        self.config.strategies = strategies;
        self
    }

    /// Set the line scale of every lattice strategy.
    pub fn line_scale(mut self, scale: u32) -> Self {
        for s in &mut self.config.strategies {
            if let DetectionStrategy::Lattice { line_scale } = s {
                *line_scale = scale;
            }
        }
        self
    }

    /// Set the edge tolerance of every stream strategy.
    pub fn edge_tol(mut self, tol: u32) -> Self {
        for s in &mut self.config.strategies {
            if let DetectionStrategy::Stream { edge_tol } = s {
                *edge_tol = tol;
            }
        }
        self
    }

    pub fn pages(mut self, selection: PageSelection) -> Self {
        self.config.pages = selection;
        self
    }

    pub fn quality(mut self, thresholds: QualityThresholds) -> Self {
        self.config.quality = thresholds;
        self
    }

    pub fn min_rows(mut self, n: usize) -> Self {
        self.config.quality.min_rows = n;
        self
    }

    pub fn min_cols(mut self, n: usize) -> Self {
        self.config.quality.min_cols = n;
        self
    }

    pub fn min_confidence(mut self, c: f64) -> Self {
        self.config.quality.min_confidence = c;
        self
    }

    pub fn min_density(mut self, d: f64) -> Self {
        self.config.quality.min_density = d;
        self
    }

    pub fn min_data_row_cells(mut self, n: usize) -> Self {
        self.config.quality.min_data_row_cells = n;
        self
    }

    pub fn confidence_policy(mut self, policy: ConfidencePolicy) -> Self {
        self.config.confidence_policy = policy;
        self
    }

    pub fn confidence_floor(mut self, floor: f64) -> Self {
        self.config.confidence_floor = floor;
        self
    }

    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.output_dir = dir.into();
        self
    }

    pub fn output_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.config.output_suffix = suffix.into();
        self
    }

    pub fn write_json(mut self, v: bool) -> Self {
        self.config.write_json = v;
        self
    }

    pub fn write_empty_reports(mut self, v: bool) -> Self {
        self.config.write_empty_reports = v;
        self
    }

    pub fn detector_command(mut self, program: impl Into<String>) -> Self {
        self.config.detector_command = Some(program.into());
        self
    }

    pub fn detector_name(mut self, name: impl Into<String>) -> Self {
        self.config.detector_name = Some(name.into());
        self
    }

    pub fn detector(mut self, detector: Arc<dyn TableDetector>) -> Self {
        self.config.detector = Some(detector);
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ExtractionConfig, TableExtractError> {
        let c = &self.config;
        if c.strategies.is_empty() {
            return Err(TableExtractError::InvalidConfig(
                "At least one detection strategy is required".into(),
            ));
        }
        c.quality.validate()?;
        if !(0.0..=1.0).contains(&c.confidence_floor) {
            return Err(TableExtractError::InvalidConfig(format!(
                "Confidence floor must be 0.0–1.0, got {}",
                c.confidence_floor
            )));
        }
        c.pages.validate()?;
        if c.output_suffix.contains(['/', '\\']) {
            return Err(TableExtractError::InvalidConfig(format!(
                "Output suffix must not contain path separators, got '{}'",
                c.output_suffix
            )));
        }
        Ok(self.config)
    }
}

// ── Quality thresholds ───────────────────────────────────────────────────

/// Thresholds applied by [`crate::pipeline::quality::QualityFilter`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct QualityThresholds {
    /// Minimum rows, header included. Default: 3.
    pub min_rows: usize,
    /// Minimum columns. Default: 2.
    pub min_cols: usize,
    /// Minimum record confidence in [0, 1]. Default: 0.5.
    pub min_confidence: f64,
    /// Minimum fraction of non-empty cells over the whole grid. Default: 0.4.
    pub min_density: f64,
    /// A body row must have this many non-empty cells to count as data. Default: 2.
    pub min_data_row_cells: usize,
}

impl Default for QualityThresholds {
    fn default() -> Self {
        Self {
            min_rows: 3,
            min_cols: 2,
            min_confidence: 0.5,
            min_density: 0.4,
            min_data_row_cells: 2,
        }
    }
}

impl QualityThresholds {
    fn validate(&self) -> Result<(), TableExtractError> {
        if !(0.0..=1.0).contains(&self.min_confidence) {
            return Err(TableExtractError::InvalidConfig(format!(
                "Minimum confidence must be 0.0–1.0, got {}",
                self.min_confidence
            )));
        }
        if !(0.0..=1.0).contains(&self.min_density) {
            return Err(TableExtractError::InvalidConfig(format!(
                "Minimum density must be 0.0–1.0, got {}",
                self.min_density
            )));
        }
        Ok(())
    }
}

// ── Enums ────────────────────────────────────────────────────────────────

/// A table-detection flavor with its tuning parameters.
///
/// | Flavor | Finds tables by | Tuning |
/// |--------|-----------------|--------|
/// | lattice | ruling lines drawn on the page | `line_scale`: larger detects shorter lines |
/// | stream  | whitespace gaps between text columns | `edge_tol`: how far text edges may drift |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "flavor", rename_all = "lowercase")]
pub enum DetectionStrategy {
    Lattice {
        #[serde(default = "default_line_scale")]
        line_scale: u32,
    },
    Stream {
        #[serde(default = "default_edge_tol")]
        edge_tol: u32,
    },
}

fn default_line_scale() -> u32 {
    40
}

fn default_edge_tol() -> u32 {
    500
}

impl DetectionStrategy {
    /// Lattice flavor with the default line scale (40).
    pub fn lattice() -> Self {
        DetectionStrategy::Lattice {
            line_scale: default_line_scale(),
        }
    }

    /// Stream flavor with the default edge tolerance (500).
    pub fn stream() -> Self {
        DetectionStrategy::Stream {
            edge_tol: default_edge_tol(),
        }
    }

    /// Flavor name as the detector expects it.
    pub fn name(&self) -> &'static str {
        match self {
            DetectionStrategy::Lattice { .. } => "lattice",
            DetectionStrategy::Stream { .. } => "stream",
        }
    }
}

impl fmt::Display for DetectionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DetectionStrategy::Lattice { line_scale } => write!(f, "lattice(line_scale={line_scale})"),
            DetectionStrategy::Stream { edge_tol } => write!(f, "stream(edge_tol={edge_tol})"),
        }
    }
}

impl FromStr for DetectionStrategy {
    type Err = TableExtractError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "lattice" => Ok(Self::lattice()),
            "stream" => Ok(Self::stream()),
            other => Err(TableExtractError::InvalidConfig(format!(
                "Unknown detection strategy '{other}' (expected lattice or stream)"
            ))),
        }
    }
}

/// How detector accuracy is turned into record confidence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidencePolicy {
    /// Raise any accuracy below the floor (or absent) to the floor. (default)
    ///
    /// Under this policy the quality filter's confidence rule can only fire
    /// when `min_confidence` is set above the floor.
    #[default]
    Floor,
    /// Use reported accuracy as-is; the floor only replaces absent accuracy.
    Reported,
}

impl FromStr for ConfidencePolicy {
    type Err = TableExtractError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "floor" => Ok(ConfidencePolicy::Floor),
            "reported" => Ok(ConfidencePolicy::Reported),
            other => Err(TableExtractError::InvalidConfig(format!(
                "Unknown confidence policy '{other}' (expected floor or reported)"
            ))),
        }
    }
}

/// Specifies which pages of the PDF the detector should scan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PageSelection {
    /// Scan all pages (default).
    #[default]
    All,
    /// Scan a single page (1-indexed).
    Single(usize),
    /// Scan a contiguous range of pages (1-indexed, inclusive).
    Range(usize, usize),
    /// Scan specific pages (1-indexed).
    Set(Vec<usize>),
}

impl PageSelection {
    /// Render the selection in the detector's page syntax: `all`, `5`,
    /// `3-15`, or `1,3,5` (sorted, deduplicated).
    pub fn to_detector_arg(&self) -> String {
        match self {
            PageSelection::All => "all".to_string(),
            PageSelection::Single(p) => p.to_string(),
            PageSelection::Range(start, end) => format!("{start}-{end}"),
            PageSelection::Set(pages) => {
                let mut pages = pages.clone();
                pages.sort_unstable();
                pages.dedup();
                pages
                    .iter()
                    .map(|p| p.to_string())
                    .collect::<Vec<_>>()
                    .join(",")
            }
        }
    }

    fn validate(&self) -> Result<(), TableExtractError> {
        let bad = |msg: String| -> Result<(), TableExtractError> {
            Err(TableExtractError::InvalidConfig(msg))
        };
        match self {
            PageSelection::All => Ok(()),
            PageSelection::Single(0) => bad("Pages are 1-indexed, minimum is 1 (got 0)".into()),
            PageSelection::Single(_) => Ok(()),
            PageSelection::Range(start, end) if *start == 0 || start > end => {
                bad(format!("Invalid page range '{start}-{end}'"))
            }
            PageSelection::Range(..) => Ok(()),
            PageSelection::Set(pages) if pages.is_empty() => bad("Empty page set".into()),
            PageSelection::Set(pages) if pages.contains(&0) => {
                bad("Pages are 1-indexed, minimum is 1 (got 0)".into())
            }
            PageSelection::Set(_) => Ok(()),
        }
    }
}

impl fmt::Display for PageSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_detector_arg())
    }
}

impl FromStr for PageSelection {
    type Err = TableExtractError;

    /// Parse `all`, `5`, `3-15`, or `1,3,5,7`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();
        let invalid = |detail: String| TableExtractError::InvalidConfig(detail);
        let parse_page = |p: &str| {
            p.trim()
                .parse::<usize>()
                .map_err(|_| invalid(format!("Invalid page number: '{}'", p.trim())))
        };

        let selection = if s == "all" {
            PageSelection::All
        } else if let Some((start, end)) = s.split_once('-') {
            PageSelection::Range(parse_page(start)?, parse_page(end)?)
        } else if s.contains(',') {
            PageSelection::Set(s.split(',').map(parse_page).collect::<Result<Vec<_>, _>>()?)
        } else {
            PageSelection::Single(parse_page(&s)?)
        };

        selection.validate()?;
        Ok(selection)
    }
}

// ── TOML config file ─────────────────────────────────────────────────────

/// On-disk configuration. Every field is optional; present fields override
/// the builder's current values.
///
/// ```toml
/// detector = "camelot-json"
/// detector_name = "camelot"
/// pages = "1-10"
/// confidence_policy = "reported"
///
/// [[strategies]]
/// flavor = "lattice"
/// line_scale = 60
///
/// [[strategies]]
/// flavor = "stream"
///
/// [quality]
/// min_rows = 4
/// min_density = 0.5
///
/// [output]
/// dir = "reports"
/// json = true
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    pub detector: Option<String>,
    pub detector_name: Option<String>,
    pub pages: Option<String>,
    pub strategies: Option<Vec<DetectionStrategy>>,
    pub quality: Option<QualityThresholds>,
    pub confidence_policy: Option<ConfidencePolicy>,
    pub confidence_floor: Option<f64>,
    pub output: Option<OutputSection>,
}

/// `[output]` table of a [`ConfigFile`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputSection {
    pub dir: Option<PathBuf>,
    pub suffix: Option<String>,
    pub json: Option<bool>,
    pub write_empty: Option<bool>,
}

impl ConfigFile {
    /// Read and parse a TOML config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TableExtractError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| TableExtractError::ConfigFile {
            path: path.to_path_buf(),
            detail: e.to_string(),
        })?;
        toml::from_str(&content).map_err(|e| TableExtractError::ConfigFile {
            path: path.to_path_buf(),
            detail: e.to_string(),
        })
    }

    /// Overlay the fields present in this file onto `builder`.
    pub fn apply(
        &self,
        mut builder: ExtractionConfigBuilder,
    ) -> Result<ExtractionConfigBuilder, TableExtractError> {
        if let Some(ref program) = self.detector {
            builder = builder.detector_command(program.clone());
        }
        if let Some(ref name) = self.detector_name {
            builder = builder.detector_name(name.clone());
        }
        if let Some(ref pages) = self.pages {
            builder = builder.pages(pages.parse()?);
        }
        if let Some(ref strategies) = self.strategies {
            builder = builder.strategies(strategies.clone());
        }
        if let Some(quality) = self.quality {
            builder = builder.quality(quality);
        }
        if let Some(policy) = self.confidence_policy {
            builder = builder.confidence_policy(policy);
        }
        if let Some(floor) = self.confidence_floor {
            builder = builder.confidence_floor(floor);
        }
        if let Some(ref out) = self.output {
            if let Some(ref dir) = out.dir {
                builder = builder.output_dir(dir.clone());
            }
            if let Some(ref suffix) = out.suffix {
                builder = builder.output_suffix(suffix.clone());
            }
            if let Some(json) = out.json {
                builder = builder.write_json(json);
            }
            if let Some(write_empty) = out.write_empty {
                builder = builder.write_empty_reports(write_empty);
            }
        }
        Ok(builder)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let c = ExtractionConfig::default();
        assert_eq!(c.strategies, vec![DetectionStrategy::Stream { edge_tol: 500 }]);
        assert_eq!(c.quality.min_rows, 3);
        assert_eq!(c.quality.min_cols, 2);
        assert_eq!(c.quality.min_confidence, 0.5);
        assert_eq!(c.quality.min_density, 0.4);
        assert_eq!(c.confidence_floor, 0.5);
        assert_eq!(c.confidence_policy, ConfidencePolicy::Floor);
    }

    #[test]
    fn builder_tunes_matching_flavors_only() {
        let c = ExtractionConfig::builder()
            .strategies(vec![DetectionStrategy::lattice(), DetectionStrategy::stream()])
            .line_scale(80)
            .edge_tol(100)
            .build()
            .unwrap();
        assert_eq!(
            c.strategies,
            vec![
                DetectionStrategy::Lattice { line_scale: 80 },
                DetectionStrategy::Stream { edge_tol: 100 }
            ]
        );
    }

    #[test]
    fn builder_rejects_bad_values() {
        assert!(ExtractionConfig::builder().strategies(vec![]).build().is_err());
        assert!(ExtractionConfig::builder().min_density(1.5).build().is_err());
        assert!(ExtractionConfig::builder().min_confidence(-0.1).build().is_err());
        assert!(ExtractionConfig::builder().confidence_floor(2.0).build().is_err());
        assert!(ExtractionConfig::builder().output_suffix("a/b").build().is_err());
        assert!(ExtractionConfig::builder()
            .pages(PageSelection::Range(5, 2))
            .build()
            .is_err());
    }

    #[test]
    fn report_paths_use_stem_and_suffix() {
        let c = ExtractionConfig::builder().output_dir("reports").build().unwrap();
        assert_eq!(
            c.markdown_path("survey"),
            PathBuf::from("reports/survey_extracted.md")
        );
        assert_eq!(
            c.json_path("survey"),
            PathBuf::from("reports/survey_extracted.json")
        );
    }

    #[test]
    fn page_selection_parse_and_render() {
        assert_eq!("all".parse::<PageSelection>().unwrap(), PageSelection::All);
        assert_eq!("5".parse::<PageSelection>().unwrap(), PageSelection::Single(5));
        assert_eq!(
            "3-15".parse::<PageSelection>().unwrap(),
            PageSelection::Range(3, 15)
        );
        assert_eq!(
            "1, 3,5".parse::<PageSelection>().unwrap(),
            PageSelection::Set(vec![1, 3, 5])
        );
        assert!("0".parse::<PageSelection>().is_err());
        assert!("9-2".parse::<PageSelection>().is_err());
        assert!("x".parse::<PageSelection>().is_err());

        assert_eq!(PageSelection::Set(vec![5, 1, 5]).to_detector_arg(), "1,5");
        assert_eq!(PageSelection::Range(2, 4).to_detector_arg(), "2-4");
        assert_eq!(PageSelection::All.to_string(), "all");
    }

    #[test]
    fn strategy_parse() {
        assert_eq!(
            "Lattice".parse::<DetectionStrategy>().unwrap(),
            DetectionStrategy::lattice()
        );
        assert!("hybrid".parse::<DetectionStrategy>().is_err());
        assert_eq!(
            DetectionStrategy::lattice().to_string(),
            "lattice(line_scale=40)"
        );
    }

    #[test]
    fn config_file_overlays_builder() {
        let file: ConfigFile = toml::from_str(
            r#"
            detector = "camelot-json"
            detector_name = "tabula"
            pages = "2-4"
            confidence_policy = "reported"

            [[strategies]]
            flavor = "lattice"
            line_scale = 60

            [[strategies]]
            flavor = "stream"

            [quality]
            min_rows = 4

            [output]
            dir = "reports"
            json = true
            "#,
        )
        .unwrap();

        let c = file.apply(ExtractionConfig::builder()).unwrap().build().unwrap();
        assert_eq!(c.detector_command.as_deref(), Some("camelot-json"));
        assert_eq!(c.detector_name.as_deref(), Some("tabula"));
        assert_eq!(c.pages, PageSelection::Range(2, 4));
        assert_eq!(c.confidence_policy, ConfidencePolicy::Reported);
        assert_eq!(
            c.strategies,
            vec![
                DetectionStrategy::Lattice { line_scale: 60 },
                DetectionStrategy::Stream { edge_tol: 500 }
            ]
        );
        assert_eq!(c.quality.min_rows, 4);
        // untouched thresholds keep their defaults
        assert_eq!(c.quality.min_cols, 2);
        assert_eq!(c.output_dir, PathBuf::from("reports"));
        assert!(c.write_json);
    }

    #[test]
    fn config_file_rejects_unknown_keys() {
        let parsed: Result<ConfigFile, _> = toml::from_str("min_rowz = 3");
        assert!(parsed.is_err());
    }

    #[test]
    fn config_file_load_reports_path() {
        let err = ConfigFile::load("/definitely/missing/config.toml").unwrap_err();
        assert!(err.to_string().contains("config.toml"));
    }
}
