//! De-duplication by content fingerprint.
//!
//! Running several strategies over the same pages finds the same table more
//! than once, and repeated page furniture (a legend printed on every page)
//! shows up as identical tables on different pages. Both are treated as
//! re-detections: a table is a duplicate when its cell grid is identical to
//! one already kept, regardless of page, strategy, or confidence. The first
//! occurrence wins.
//!
//! The fingerprint is SHA-256 over the JSON encoding of the grid. JSON keeps
//! row and cell boundaries unambiguous (`[["a,b"]]` and `[["a","b"]]` encode
//! differently) and excludes every piece of metadata.

use crate::table::TableRecord;
use sha2::{Digest, Sha256};
use std::collections::HashSet;
use std::fmt;
use tracing::debug;

/// Content digest of a table grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint([u8; 32]);

impl Fingerprint {
    /// Fingerprint the grid of `record`.
    pub fn of(record: &TableRecord) -> Self {
        Self::of_grid(record.data())
    }

    /// Fingerprint a raw grid (row and column order significant).
    pub fn of_grid(data: &[Vec<String>]) -> Self {
        let mut hasher = Sha256::new();
        // Vec<Vec<String>> serialisation cannot fail.
        let canonical = serde_json::to_vec(data).unwrap_or_default();
        hasher.update(&canonical);
        Self(hasher.finalize().into())
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for b in &self.0 {
            write!(f, "{b:02x}")?;
        }
        Ok(())
    }
}

/// Incremental duplicate tracker for one document.
#[derive(Debug, Default)]
pub struct Deduplicator {
    seen: HashSet<Fingerprint>,
}

impl Deduplicator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` the first time a grid is seen, `false` afterwards.
    pub fn admit(&mut self, record: &TableRecord) -> bool {
        self.seen.insert(Fingerprint::of(record))
    }

    /// Number of distinct grids seen so far.
    pub fn distinct(&self) -> usize {
        self.seen.len()
    }
}

/// Keep the first record of each distinct grid, preserving order.
pub fn deduplicate(records: Vec<TableRecord>) -> Vec<TableRecord> {
    let mut dedup = Deduplicator::new();
    records
        .into_iter()
        .filter(|record| {
            let unique = dedup.admit(record);
            if unique {
                debug!(
                    "Keeping unique table: page {}, {}x{}",
                    record.page(),
                    record.num_rows(),
                    record.num_cols()
                );
            } else {
                debug!(
                    "Removing duplicate table: page {}, {}x{}",
                    record.page(),
                    record.num_rows(),
                    record.num_cols()
                );
            }
            unique
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(page: usize, method: &str, rows: &[&[&str]]) -> TableRecord {
        let data = rows
            .iter()
            .map(|r| r.iter().map(|c| c.to_string()).collect())
            .collect();
        TableRecord::new("camelot", page, method, data, 0.9, "stream", None).unwrap()
    }

    #[test]
    fn keeps_first_of_cross_page_duplicates() {
        let a = record(1, "camelot_stream", &[&["x", "y"], &["1", "2"]]);
        let b = record(2, "camelot_stream", &[&["p", "q"], &["3", "4"]]);
        let a2 = record(5, "camelot_lattice", &[&["x", "y"], &["1", "2"]]);

        let out = deduplicate(vec![a.clone(), b.clone(), a2]);
        assert_eq!(out, vec![a, b]);
        assert_eq!(out[0].page(), 1);
    }

    #[test]
    fn idempotent() {
        let input = vec![
            record(1, "m", &[&["a", "b"]]),
            record(1, "m", &[&["a", "b"]]),
            record(2, "m", &[&["c", "d"]]),
            record(3, "m", &[&["a", "b"]]),
        ];
        let once = deduplicate(input);
        let twice = deduplicate(once.clone());
        assert_eq!(once, twice);
        assert_eq!(once.len(), 2);
    }

    #[test]
    fn cell_boundaries_matter() {
        let joined = Fingerprint::of_grid(&[vec!["a,b".to_string()]]);
        let split = Fingerprint::of_grid(&[vec!["a".to_string(), "b".to_string()]]);
        assert_ne!(joined, split);

        let one_row = Fingerprint::of_grid(&[vec!["a".to_string(), "b".to_string()]]);
        let two_rows = Fingerprint::of_grid(&[vec!["a".to_string()], vec!["b".to_string()]]);
        assert_ne!(one_row, two_rows);
    }

    #[test]
    fn metadata_is_ignored() {
        let a = record(1, "camelot_stream", &[&["a", "b"]]);
        let b = record(9, "camelot_lattice", &[&["a", "b"]]);
        assert_eq!(Fingerprint::of(&a), Fingerprint::of(&b));
    }

    #[test]
    fn fingerprint_is_sha256_hex() {
        let fp = Fingerprint::of_grid(&[]);
        // sha256("[]")
        assert_eq!(
            fp.to_string(),
            "4f53cda18c2baa0c0354bb5f9a3ecbe5ed12ab4d8e11ba873c2f11161202b945"
        );
    }

    #[test]
    fn deduplicator_counts_distinct() {
        let mut d = Deduplicator::new();
        let a = record(1, "m", &[&["a"]]);
        assert!(d.admit(&a));
        assert!(!d.admit(&a));
        assert_eq!(d.distinct(), 1);
    }

    #[test]
    fn empty_input() {
        assert!(deduplicate(Vec::new()).is_empty());
    }
}
