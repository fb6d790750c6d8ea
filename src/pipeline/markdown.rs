//! Markdown rendering of accepted tables and the per-document report.
//!
//! Both functions are pure: everything they print comes from the report
//! passed in, including the timestamp and file size, so identical input
//! always renders identically.
//!
//! Cell text is made safe for GFM pipe tables before emission: whitespace
//! runs (newlines included) collapse to one space, invisible Unicode is
//! removed, `\` is doubled, and `|` is escaped as `\|` so cell content can
//! never add or split a column and keeps any literal backslash.

use crate::output::DocumentReport;
use crate::pipeline::normalize::collapse_whitespace;
use crate::table::TableRecord;
use std::fmt::Write as _;

const DELIMITER: char = '|';
const SEPARATOR_TOKEN: &str = "---";

/// Render one table as a GFM pipe table: header, separator, one line per
/// body row. No trailing newline.
pub fn render_table(record: &TableRecord) -> String {
    let mut lines = Vec::with_capacity(record.num_rows() + 1);
    lines.push(render_row(record.header()));
    lines.push(render_row(&vec![SEPARATOR_TOKEN; record.num_cols()]));
    lines.extend(record.body().iter().map(|row| render_row(row)));
    lines.join("\n")
}

fn render_row<S: AsRef<str>>(cells: &[S]) -> String {
    let cells: Vec<String> = cells.iter().map(|c| escape_cell(c.as_ref())).collect();
    format!("{DELIMITER} {} {DELIMITER}", cells.join(" | "))
}

/// Make cell text safe for a single pipe-table line.
pub fn escape_cell(text: &str) -> String {
    let text = remove_invisible_chars(text);
    collapse_whitespace(&text)
        .replace('\\', "\\\\")
        .replace(DELIMITER, "\\|")
}

fn remove_invisible_chars(input: &str) -> String {
    input.replace(
        [
            '\u{200B}', '\u{FEFF}', '\u{00AD}', '\u{200C}', '\u{200D}', '\u{2060}',
        ],
        "",
    )
}

/// Render the complete report for one document.
///
/// Layout: title, document facts, extraction summary, optional strategy
/// failures, then one `### Table N (Page P)` section per table in report
/// order.
pub fn render_report(report: &DocumentReport) -> String {
    let meta = &report.metadata;
    let stats = &report.stats;
    let mut md = String::with_capacity(1024);

    // `write!` into a String cannot fail.
    let _ = writeln!(md, "# {}\n", meta.name);
    let _ = writeln!(md, "**Extraction Date:** {}  ", meta.extracted_at.to_rfc3339());
    let _ = writeln!(md, "**File Size:** {} bytes  ", group_thousands(meta.byte_size));
    let _ = writeln!(md, "**Pages Processed:** {}  ", meta.pages);
    let _ = writeln!(md, "**Extractors Used:** {}\n", meta.detector);

    md.push_str("## Extraction Summary\n\n");
    let _ = writeln!(md, "- **Total Tables:** {}", report.tables.len());
    let _ = writeln!(md, "- **Strategies:** {}", meta.strategies.join(", "));
    let _ = writeln!(md, "- **Candidates Detected:** {}", stats.candidates_detected);
    let _ = writeln!(md, "- **Rejected by Quality Filter:** {}", stats.rejected_total());
    let _ = writeln!(md, "- **Duplicates Removed:** {}", stats.duplicates_removed);
    let _ = writeln!(md, "- **Processing Time:** {} ms\n", stats.duration_ms);

    if !report.strategy_errors.is_empty() {
        md.push_str("## Strategy Failures\n\n");
        for err in &report.strategy_errors {
            let _ = writeln!(md, "- {}", collapse_whitespace(&err.to_string()));
        }
        md.push('\n');
    }

    md.push_str("## Extracted Tables\n\n");
    if report.tables.is_empty() {
        md.push_str("_No tables passed quality filtering._\n");
    }

    for (i, table) in report.tables.iter().enumerate() {
        let _ = writeln!(md, "### Table {} (Page {})\n", i + 1, table.page());
        let _ = writeln!(md, "**Extraction Method:** {}  ", table.method());
        let _ = writeln!(md, "**Confidence Score:** {:.2}%  ", table.confidence() * 100.0);
        let _ = writeln!(
            md,
            "**Dimensions:** {} rows × {} columns\n",
            table.num_rows(),
            table.num_cols()
        );
        md.push_str(&render_table(table));
        md.push_str("\n\n---\n\n");
    }

    ensure_final_newline(&md)
}

/// `1234567` → `1,234,567`.
fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

fn ensure_final_newline(input: &str) -> String {
    let trimmed = input.trim_end();
    if trimmed.is_empty() {
        String::from("\n")
    } else {
        format!("{}\n", trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StrategyError;
    use crate::output::{DocumentMetadata, ExtractionStats};
    use chrono::TimeZone;
    use std::path::PathBuf;

    fn record(page: usize, rows: &[&[&str]], confidence: f64) -> TableRecord {
        let data = rows
            .iter()
            .map(|r| r.iter().map(|c| c.to_string()).collect())
            .collect();
        TableRecord::new("camelot", page, "camelot_stream", data, confidence, "stream", None)
            .unwrap()
    }

    fn report(tables: Vec<TableRecord>) -> DocumentReport {
        DocumentReport {
            metadata: DocumentMetadata {
                name: "survey".into(),
                path: PathBuf::from("in/survey.pdf"),
                byte_size: 1_234_567,
                extracted_at: chrono::Local.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap(),
                pages: "all".into(),
                strategies: vec!["stream".into(), "lattice".into()],
                detector: "camelot".into(),
            },
            stats: ExtractionStats {
                candidates_detected: 5,
                rejected_too_small: 2,
                duplicates_removed: 1,
                tables_kept: tables.len(),
                duration_ms: 42,
                ..Default::default()
            },
            tables,
            strategy_errors: Vec::new(),
        }
    }

    #[test]
    fn renders_name_age_table() {
        let rec = record(1, &[&["Name", "Age"], &["Ann", "30"], &["Bo", "25"]], 0.9);
        let md = render_table(&rec);
        let lines: Vec<&str> = md.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "| Name | Age |");
        assert_eq!(lines[1], "| --- | --- |");
        assert_eq!(lines[2], "| Ann | 30 |");
        assert_eq!(lines[3], "| Bo | 25 |");

        let segments: Vec<&str> = lines[1]
            .trim_matches('|')
            .split('|')
            .collect();
        assert_eq!(segments.len(), 2);
    }

    #[test]
    fn pipes_in_cells_are_escaped() {
        let rec = record(1, &[&["a|b", "c"], &["x || y", "z"]], 0.9);
        let md = render_table(&rec);
        assert_eq!(md.lines().next(), Some("| a\\|b | c |"));
        assert!(md.contains("| x \\|\\| y | z |"));
        // every line still has exactly 3 unescaped delimiters
        for line in md.lines() {
            let unescaped = line
                .char_indices()
                .filter(|&(i, c)| c == '|' && (i == 0 || &line[i - 1..i] != "\\"))
                .count();
            assert_eq!(unescaped, 3, "line: {line}");
        }
    }

    #[test]
    fn backslashes_survive_escaping() {
        assert_eq!(escape_cell("C:\\|x"), "C:\\\\\\|x");
        assert_eq!(escape_cell("a\\b"), "a\\\\b");

        let rec = record(1, &[&["path", "n"], &["C:\\|x", "1"]], 0.9);
        let md = render_table(&rec);
        assert_eq!(md.lines().nth(2), Some("| C:\\\\\\|x | 1 |"));
    }

    #[test]
    fn multiline_cells_collapse() {
        let rec = record(1, &[&["h1", "h2"], &["line one\nline   two", "\u{200B}ok"]], 0.9);
        let md = render_table(&rec);
        assert!(md.contains("| line one line two | ok |"));
        assert_eq!(md.lines().count(), 3);
    }

    #[test]
    fn report_sections() {
        let tables = vec![
            record(2, &[&["Name", "Age"], &["Ann", "30"], &["Bo", "25"]], 0.9),
            record(7, &[&["K", "V"], &["a", "1"], &["b", "2"]], 0.5),
        ];
        let md = render_report(&report(tables));

        assert!(md.starts_with("# survey\n"));
        assert!(md.contains("**File Size:** 1,234,567 bytes"));
        assert!(md.contains("**Extraction Date:** 2024-03-01T09:30:00"));
        assert!(md.contains("- **Total Tables:** 2"));
        assert!(md.contains("- **Strategies:** stream, lattice"));
        assert!(md.contains("- **Rejected by Quality Filter:** 2"));
        assert!(md.contains("- **Duplicates Removed:** 1"));
        assert!(md.contains("### Table 1 (Page 2)"));
        assert!(md.contains("### Table 2 (Page 7)"));
        assert!(md.contains("**Confidence Score:** 90.00%"));
        assert!(md.contains("**Confidence Score:** 50.00%"));
        assert!(md.contains("**Dimensions:** 3 rows × 2 columns"));
        assert!(md.find("### Table 1").unwrap() < md.find("### Table 2").unwrap());
        assert!(md.ends_with("---\n"));
        assert!(!md.contains("Strategy Failures"));
    }

    #[test]
    fn report_lists_strategy_failures_and_empty_state() {
        let mut r = report(Vec::new());
        r.strategy_errors.push(StrategyError::DetectorFailed {
            strategy: "lattice".into(),
            detail: "ghostscript\nnot found".into(),
        });
        let md = render_report(&r);
        assert!(md.contains("## Strategy Failures"));
        assert!(md.contains("- Strategy 'lattice': detector failed: ghostscript not found"));
        assert!(md.contains("_No tables passed quality filtering._"));
        assert!(md.ends_with('\n'));
    }

    #[test]
    fn rendering_is_deterministic() {
        let r = report(vec![record(1, &[&["a", "b"], &["1", "2"], &["3", "4"]], 0.8)]);
        assert_eq!(render_report(&r), render_report(&r));
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1000), "1,000");
        assert_eq!(group_thousands(1_234_567), "1,234,567");
    }

    #[test]
    fn test_ensure_final_newline() {
        assert_eq!(ensure_final_newline("hello"), "hello\n");
        assert_eq!(ensure_final_newline("hello\n\n\n"), "hello\n");
        assert_eq!(ensure_final_newline(""), "\n");
    }
}
