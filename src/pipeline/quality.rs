//! Quality filter: decide whether a normalised table is worth reporting.
//!
//! Detectors happily report page headers, two-cell captions, and mostly
//! blank layout grids as "tables". The filter rejects them with four rules,
//! evaluated in order and short-circuiting on the first failure:
//!
//! 1. Size: at least `min_rows` rows (header included) and `min_cols` columns.
//! 2. Confidence: at least `min_confidence`.
//! 3. Density: non-empty cells over total cells is at least `min_density`.
//! 4. Real data: some body row has at least `min_data_row_cells` non-empty cells.

use crate::config::QualityThresholds;
use crate::table::TableRecord;
use serde::Serialize;
use std::fmt;

/// Why a table was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum Rejection {
    TooSmall { rows: usize, cols: usize },
    LowConfidence { confidence: f64 },
    Sparse { density: f64 },
    NoDataRows,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::TooSmall { rows, cols } => write!(f, "too small ({rows}x{cols})"),
            Rejection::LowConfidence { confidence } => {
                write!(f, "low confidence ({confidence:.2})")
            }
            Rejection::Sparse { density } => write!(f, "sparse ({:.0}% filled)", density * 100.0),
            Rejection::NoDataRows => f.write_str("no data rows"),
        }
    }
}

/// Accept/reject decisions for table records. Pure and deterministic.
#[derive(Debug, Clone, Copy, Default)]
pub struct QualityFilter {
    thresholds: QualityThresholds,
}

impl QualityFilter {
    pub fn new(thresholds: QualityThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &QualityThresholds {
        &self.thresholds
    }

    /// `true` if the record passes every rule.
    pub fn accept(&self, record: &TableRecord) -> bool {
        self.evaluate(record).is_ok()
    }

    /// Apply the rules in order, reporting the first one that fails.
    pub fn evaluate(&self, record: &TableRecord) -> Result<(), Rejection> {
        let t = &self.thresholds;

        if record.num_rows() < t.min_rows || record.num_cols() < t.min_cols {
            return Err(Rejection::TooSmall {
                rows: record.num_rows(),
                cols: record.num_cols(),
            });
        }

        if record.confidence() < t.min_confidence {
            return Err(Rejection::LowConfidence {
                confidence: record.confidence(),
            });
        }

        let density = cell_density(record.data());
        if density < t.min_density {
            return Err(Rejection::Sparse { density });
        }

        let has_data_row = record
            .body()
            .iter()
            .any(|row| non_empty_cells(row) >= t.min_data_row_cells);
        if !has_data_row {
            return Err(Rejection::NoDataRows);
        }

        Ok(())
    }
}

fn non_empty_cells(row: &[String]) -> usize {
    row.iter().filter(|c| !c.trim().is_empty()).count()
}

/// Fraction of non-empty cells across the whole grid, header included.
/// An empty grid has density 0.
pub fn cell_density(data: &[Vec<String>]) -> f64 {
    let total: usize = data.iter().map(Vec::len).sum();
    if total == 0 {
        return 0.0;
    }
    let filled: usize = data.iter().map(|row| non_empty_cells(row)).sum();
    filled as f64 / total as f64
}
