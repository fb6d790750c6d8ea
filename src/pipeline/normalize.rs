//! Candidate normalisation: raw detector grid → [`TableRecord`].
//!
//! Detector grids are noisy. Stream detection in particular pads tables with
//! blank spacer rows and phantom columns, and rows can come back shorter
//! than their neighbours. All cleanup happens here, before the record is
//! built, because records are immutable afterwards.
//!
//! ## Rules
//!
//! 1. Missing cells (short rows, `null`) become empty strings.
//! 2. Every cell is trimmed; a cell is empty when nothing is left.
//! 3. Rows with no non-empty cell are dropped.
//! 4. Columns with no non-empty cell in any row are dropped.
//! 5. Header cells have internal whitespace collapsed to single spaces.
//! 6. Fewer than two rows left → no record.

use crate::config::{ConfidencePolicy, ExtractionConfig};
use crate::error::NormalizeError;
use crate::table::{RawCandidate, TableRecord};
use once_cell::sync::Lazy;
use regex::Regex;

static RE_WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Collapse every whitespace run (including newlines) to one space and trim.
pub fn collapse_whitespace(text: &str) -> String {
    RE_WHITESPACE.replace_all(text.trim(), " ").into_owned()
}

/// Turns raw candidates from one detector into table records.
#[derive(Debug, Clone)]
pub struct Normalizer {
    source: String,
    policy: ConfidencePolicy,
    floor: f64,
}

impl Normalizer {
    pub fn new(source: impl Into<String>, policy: ConfidencePolicy, floor: f64) -> Self {
        Self {
            source: source.into(),
            policy,
            floor,
        }
    }

    /// Normaliser for `source` using the config's confidence settings.
    pub fn from_config(source: impl Into<String>, config: &ExtractionConfig) -> Self {
        Self::new(source, config.confidence_policy, config.confidence_floor)
    }

    /// Normalise one candidate.
    ///
    /// Returns `Ok(None)` when fewer than two rows survive cleanup, and an
    /// error when the candidate itself is malformed.
    pub fn normalize(&self, raw: RawCandidate) -> Result<Option<TableRecord>, NormalizeError> {
        if raw.page == 0 {
            return Err(NormalizeError::ZeroPage);
        }
        let confidence = self.confidence(raw.accuracy)?;

        let mut data = clean_grid(raw.cells);
        if data.len() < 2 {
            return Ok(None);
        }
        for cell in &mut data[0] {
            *cell = collapse_whitespace(cell);
        }

        let method = format!("{}_{}", self.source, raw.flavor);
        TableRecord::new(
            self.source.clone(),
            raw.page,
            method,
            data,
            confidence,
            raw.flavor,
            raw.accuracy,
        )
        .map(Some)
    }

    /// Record confidence for a reported accuracy under this policy.
    pub fn confidence(&self, accuracy: Option<f64>) -> Result<f64, NormalizeError> {
        match accuracy {
            None => Ok(self.floor),
            Some(a) if !a.is_finite() || a < 0.0 => Err(NormalizeError::InvalidAccuracy(a)),
            Some(a) => Ok(match self.policy {
                ConfidencePolicy::Floor => a.max(self.floor).min(1.0),
                ConfidencePolicy::Reported => a.min(1.0),
            }),
        }
    }
}

/// Pad, trim, and strip empty rows and columns from a raw grid.
///
/// The result is rectangular: every row has the same number of cells.
pub fn clean_grid(cells: Vec<Vec<Option<String>>>) -> Vec<Vec<String>> {
    let width = cells.iter().map(Vec::len).max().unwrap_or(0);

    let rows: Vec<Vec<String>> = cells
        .into_iter()
        .map(|row| {
            let mut row: Vec<String> = row
                .into_iter()
                .map(|c| c.map(|s| s.trim().to_string()).unwrap_or_default())
                .collect();
            row.resize(width, String::new());
            row
        })
        .filter(|row| row.iter().any(|c| !c.is_empty()))
        .collect();

    let keep: Vec<usize> = (0..width)
        .filter(|&col| rows.iter().any(|row| !row[col].is_empty()))
        .collect();

    rows.into_iter()
        .map(|row| keep.iter().map(|&col| row[col].clone()).collect::<Vec<_>>())
        .filter(|row| row.iter().any(|c| !c.is_empty()))
        .collect()
}
