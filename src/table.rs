//! Table types flowing through the pipeline.
//!
//! A [`RawCandidate`] is whatever the external detector hands back: a grid
//! that may be ragged, may contain missing cells, and carries the detector's
//! own accuracy estimate. The normaliser turns it into a [`TableRecord`],
//! whose constructor guarantees a rectangular, non-empty grid. Records are
//! never mutated after construction; every later stage either keeps or drops
//! them.

use crate::error::NormalizeError;
use serde::{Deserialize, Serialize};

/// One table as reported by the external detector, before any cleanup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawCandidate {
    /// Rows of cells. Rows may differ in length; `None` marks a missing cell.
    pub cells: Vec<Vec<Option<String>>>,
    /// 1-indexed page the table was found on.
    pub page: usize,
    /// Detector accuracy estimate in [0, 1], if it reported one.
    #[serde(default)]
    pub accuracy: Option<f64>,
    /// Strategy (flavor) that produced the candidate.
    pub flavor: String,
}

impl RawCandidate {
    /// Build a candidate from fully populated rows.
    pub fn from_rows<R, C>(rows: R, page: usize, accuracy: Option<f64>, flavor: &str) -> Self
    where
        R: IntoIterator<Item = C>,
        C: IntoIterator,
        C::Item: Into<String>,
    {
        Self {
            cells: rows
                .into_iter()
                .map(|row| row.into_iter().map(|c| Some(c.into())).collect())
                .collect(),
            page,
            accuracy,
            flavor: flavor.to_string(),
        }
    }
}

/// Dimensions and detector details kept alongside a record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableMetadata {
    pub num_rows: usize,
    pub num_cols: usize,
    /// Strategy that detected the table.
    pub flavor: String,
    /// Accuracy exactly as the detector reported it (before the floor).
    pub accuracy: Option<f64>,
}

/// A canonical, validated table. Row 0 is the header.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableRecord {
    source: String,
    page: usize,
    method: String,
    data: Vec<Vec<String>>,
    confidence: f64,
    metadata: TableMetadata,
}

impl TableRecord {
    /// Construct a record, enforcing the grid invariants.
    ///
    /// `data` must have at least one row and every row must have the same
    /// length as the first. `confidence` is clamped into [0, 1].
    pub fn new(
        source: impl Into<String>,
        page: usize,
        method: impl Into<String>,
        data: Vec<Vec<String>>,
        confidence: f64,
        flavor: impl Into<String>,
        accuracy: Option<f64>,
    ) -> Result<Self, NormalizeError> {
        if page == 0 {
            return Err(NormalizeError::ZeroPage);
        }
        if !confidence.is_finite() {
            return Err(NormalizeError::InvalidAccuracy(confidence));
        }
        let num_cols = data.first().map(Vec::len).ok_or(NormalizeError::Empty)?;
        if num_cols == 0 {
            return Err(NormalizeError::Empty);
        }
        if let Some((row, r)) = data.iter().enumerate().find(|(_, r)| r.len() != num_cols) {
            return Err(NormalizeError::Ragged {
                row,
                expected: num_cols,
                found: r.len(),
            });
        }

        Ok(Self {
            source: source.into(),
            page,
            method: method.into(),
            metadata: TableMetadata {
                num_rows: data.len(),
                num_cols,
                flavor: flavor.into(),
                accuracy,
            },
            data,
            confidence: confidence.clamp(0.0, 1.0),
        })
    }

    /// Detector that produced the table (e.g. `camelot`).
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn page(&self) -> usize {
        self.page
    }

    /// Detector + strategy label, e.g. `camelot_stream`.
    pub fn method(&self) -> &str {
        &self.method
    }

    /// The full grid, header first.
    pub fn data(&self) -> &[Vec<String>] {
        &self.data
    }

    pub fn header(&self) -> &[String] {
        &self.data[0]
    }

    /// Rows after the header.
    pub fn body(&self) -> &[Vec<String>] {
        &self.data[1..]
    }

    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    pub fn metadata(&self) -> &TableMetadata {
        &self.metadata
    }

    pub fn num_rows(&self) -> usize {
        self.metadata.num_rows
    }

    pub fn num_cols(&self) -> usize {
        self.metadata.num_cols
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(rows: &[&[&str]]) -> Vec<Vec<String>> {
        rows.iter()
            .map(|r| r.iter().map(|c| c.to_string()).collect())
            .collect()
    }

    #[test]
    fn record_derives_dimensions() {
        let rec = TableRecord::new(
            "camelot",
            2,
            "camelot_stream",
            grid(&[&["Name", "Age"], &["Ann", "30"], &["Bo", "25"]]),
            0.9,
            "stream",
            Some(0.9),
        )
        .unwrap();
        assert_eq!(rec.num_rows(), 3);
        assert_eq!(rec.num_cols(), 2);
        assert_eq!(rec.header(), &["Name".to_string(), "Age".to_string()]);
        assert_eq!(rec.body().len(), 2);
    }

    #[test]
    fn record_rejects_ragged_grid() {
        let err = TableRecord::new(
            "camelot",
            1,
            "camelot_stream",
            grid(&[&["a", "b"], &["c"]]),
            0.9,
            "stream",
            None,
        )
        .unwrap_err();
        assert_eq!(
            err,
            NormalizeError::Ragged {
                row: 1,
                expected: 2,
                found: 1
            }
        );
    }

    #[test]
    fn record_rejects_empty_and_zero_page() {
        assert_eq!(
            TableRecord::new("c", 1, "m", vec![], 0.9, "stream", None).unwrap_err(),
            NormalizeError::Empty
        );
        assert_eq!(
            TableRecord::new("c", 0, "m", grid(&[&["a"]]), 0.9, "stream", None).unwrap_err(),
            NormalizeError::ZeroPage
        );
    }

    #[test]
    fn confidence_is_clamped() {
        let rec = TableRecord::new("c", 1, "m", grid(&[&["a"]]), 1.7, "stream", None).unwrap();
        assert_eq!(rec.confidence(), 1.0);
    }

    #[test]
    fn raw_candidate_deserialises_null_cells() {
        let raw: RawCandidate = serde_json::from_str(
            r#"{"page": 3, "flavor": "lattice", "cells": [["a", null], ["b"]]}"#,
        )
        .unwrap();
        assert_eq!(raw.page, 3);
        assert_eq!(raw.accuracy, None);
        assert_eq!(raw.cells[0][1], None);
        assert_eq!(raw.cells[1].len(), 1);
    }
}
