//! Input resolution: turn user-supplied paths into validated PDF documents.
//!
//! Directories expand to the `*.pdf` files they contain (sorted, not
//! recursive). Each document is validated before the detector sees it: it
//! must exist, be readable, and start with the `%PDF` magic bytes, so the
//! caller gets a meaningful error instead of a detector crash.

use crate::error::TableExtractError;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// A document that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedDocument {
    pub path: PathBuf,
    /// File name without extension; names the report.
    pub stem: String,
    /// Size of the file in bytes.
    pub byte_size: u64,
}

/// Check whether a path has a `.pdf` extension (case-insensitive).
pub fn is_pdf_path(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
}

/// Expand the given inputs into an ordered list of document paths.
///
/// Files are kept as given, even when missing, so they surface later as a
/// per-document [`TableExtractError::DocumentNotFound`]. Directories are
/// replaced by their `*.pdf` entries in name order; an unreadable directory
/// is logged and skipped.
pub fn discover_documents(inputs: &[PathBuf]) -> Vec<PathBuf> {
    let mut documents = Vec::new();

    for input in inputs {
        if !input.is_dir() {
            documents.push(input.clone());
            continue;
        }

        match std::fs::read_dir(input) {
            Ok(entries) => {
                let mut found: Vec<PathBuf> = entries
                    .filter_map(|e| e.ok())
                    .map(|e| e.path())
                    .filter(|p| p.is_file() && is_pdf_path(p))
                    .collect();
                found.sort();
                debug!("Found {} PDF files in {}", found.len(), input.display());
                documents.extend(found);
            }
            Err(e) => warn!("Cannot read directory {}: {}", input.display(), e),
        }
    }

    documents
}

/// Validate a single document path.
pub fn resolve_document(path: &Path) -> Result<ResolvedDocument, TableExtractError> {
    if !path.exists() {
        return Err(TableExtractError::DocumentNotFound {
            path: path.to_path_buf(),
        });
    }

    let mut file = match std::fs::File::open(path) {
        Ok(f) => f,
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            return Err(TableExtractError::PermissionDenied {
                path: path.to_path_buf(),
            });
        }
        Err(_) => {
            return Err(TableExtractError::DocumentNotFound {
                path: path.to_path_buf(),
            });
        }
    };

    // Verify PDF magic bytes. A short file or a directory fails the read and
    // is rejected the same way.
    let mut magic = [0u8; 4];
    if file.read_exact(&mut magic).is_err() || &magic != b"%PDF" {
        return Err(TableExtractError::NotAPdf {
            path: path.to_path_buf(),
            magic,
        });
    }

    let byte_size = file
        .metadata()
        .map(|m| m.len())
        .map_err(|e| TableExtractError::Internal(format!("stat {}: {}", path.display(), e)))?;

    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document".to_string());

    debug!("Resolved PDF: {} ({} bytes)", path.display(), byte_size);
    Ok(ResolvedDocument {
        path: path.to_path_buf(),
        stem,
        byte_size,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
        let p = dir.join(name);
        std::fs::write(&p, bytes).unwrap();
        p
    }

    #[test]
    fn test_is_pdf_path() {
        assert!(is_pdf_path(Path::new("a/report.pdf")));
        assert!(is_pdf_path(Path::new("REPORT.PDF")));
        assert!(!is_pdf_path(Path::new("report.md")));
        assert!(!is_pdf_path(Path::new("pdf")));
    }

    #[test]
    fn test_discover_expands_directories_sorted() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "b.pdf", b"%PDF-1.7");
        write(dir.path(), "a.pdf", b"%PDF-1.7");
        write(dir.path(), "notes.txt", b"hello");

        let missing = PathBuf::from("/definitely/not/here.pdf");
        let docs = discover_documents(&[dir.path().to_path_buf(), missing.clone()]);

        assert_eq!(
            docs,
            vec![dir.path().join("a.pdf"), dir.path().join("b.pdf"), missing]
        );
    }

    #[test]
    fn test_resolve_valid_pdf() {
        let dir = TempDir::new().unwrap();
        let p = write(dir.path(), "survey.pdf", b"%PDF-1.4\n...");
        let doc = resolve_document(&p).unwrap();
        assert_eq!(doc.stem, "survey");
        assert_eq!(doc.byte_size, 12);
    }

    #[test]
    fn test_resolve_missing() {
        let err = resolve_document(Path::new("/definitely/not/here.pdf")).unwrap_err();
        assert!(matches!(err, TableExtractError::DocumentNotFound { .. }));
    }

    #[test]
    fn test_resolve_not_a_pdf() {
        let dir = TempDir::new().unwrap();
        let p = write(dir.path(), "fake.pdf", b"PK\x03\x04zip");
        let err = resolve_document(&p).unwrap_err();
        assert!(matches!(err, TableExtractError::NotAPdf { magic, .. } if &magic == b"PK\x03\x04"));
    }

    #[test]
    fn test_resolve_short_file_is_not_a_pdf() {
        let dir = TempDir::new().unwrap();
        let p = write(dir.path(), "stub.pdf", b"%P");
        let err = resolve_document(&p).unwrap_err();
        assert!(matches!(err, TableExtractError::NotAPdf { ref path, .. } if *path == p));

        let empty = write(dir.path(), "empty.pdf", b"");
        let err = resolve_document(&empty).unwrap_err();
        assert!(matches!(err, TableExtractError::NotAPdf { .. }));
    }

    #[test]
    fn test_resolve_directory_is_not_a_pdf() {
        let dir = TempDir::new().unwrap();
        let sub = dir.path().join("scans.pdf");
        std::fs::create_dir(&sub).unwrap();
        let err = resolve_document(&sub).unwrap_err();
        assert!(matches!(err, TableExtractError::NotAPdf { .. }));
    }
}
