//! Progress-callback trait for per-document extraction events.
//!
//! Inject an [`Arc<dyn ExtractionProgressCallback>`] via
//! [`crate::config::ExtractionConfigBuilder::progress_callback`] to receive
//! events as the batch driver works through documents and strategies. The
//! CLI uses this to drive its progress bar; library callers can forward the
//! events anywhere without the library knowing how they are displayed.
//!
//! # Example
//!
//! ```rust
//! use edgequake_tables::{ExtractionConfig, ExtractionProgressCallback};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct TableCounter {
//!     tables: AtomicUsize,
//! }
//!
//! impl ExtractionProgressCallback for TableCounter {
//!     fn on_document_complete(&self, _index: usize, _total: usize, tables: usize) {
//!         self.tables.fetch_add(tables, Ordering::SeqCst);
//!     }
//! }
//!
//! let counter = Arc::new(TableCounter { tables: AtomicUsize::new(0) });
//!
//! let config = ExtractionConfig::builder()
//!     .progress_callback(counter as Arc<dyn ExtractionProgressCallback>)
//!     .build()
//!     .unwrap();
//! ```

use std::sync::Arc;

/// Called by the extraction pipeline as it processes each document.
///
/// All methods have default no-op implementations so callers only override
/// what they care about. Indices are 1-based.
pub trait ExtractionProgressCallback: Send + Sync {
    /// Called once before the first document.
    fn on_batch_start(&self, total_documents: usize) {
        let _ = total_documents;
    }

    /// Called before any strategy runs on a document.
    fn on_document_start(&self, index: usize, total: usize, name: &str) {
        let _ = (index, total, name);
    }

    /// Called after each detection strategy, whether or not it succeeded.
    ///
    /// # Arguments
    /// * `strategy`  : flavor name
    /// * `candidates`: raw candidates returned (0 on failure)
    /// * `error`     : failure description, if the strategy failed
    fn on_strategy_complete(&self, strategy: &str, candidates: usize, error: Option<&str>) {
        let _ = (strategy, candidates, error);
    }

    /// Called when a document's report is complete.
    ///
    /// # Arguments
    /// * `tables`: accepted, unique tables in the report
    fn on_document_complete(&self, index: usize, total: usize, tables: usize) {
        let _ = (index, total, tables);
    }

    /// Called when a document fails fatally (missing, unreadable, write failure).
    fn on_document_error(&self, index: usize, total: usize, error: &str) {
        let _ = (index, total, error);
    }

    /// Called once after every document has been attempted.
    fn on_batch_complete(&self, total_documents: usize, success_count: usize) {
        let _ = (total_documents, success_count);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl ExtractionProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::ExtractionConfig`].
pub type ProgressCallback = Arc<dyn ExtractionProgressCallback>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct TrackingCallback {
        documents: AtomicUsize,
        strategy_failures: AtomicUsize,
        tables: AtomicUsize,
        errors: AtomicUsize,
    }

    impl ExtractionProgressCallback for TrackingCallback {
        fn on_document_start(&self, _index: usize, _total: usize, _name: &str) {
            self.documents.fetch_add(1, Ordering::SeqCst);
        }

        fn on_strategy_complete(&self, _strategy: &str, _candidates: usize, error: Option<&str>) {
            if error.is_some() {
                self.strategy_failures.fetch_add(1, Ordering::SeqCst);
            }
        }

        fn on_document_complete(&self, _index: usize, _total: usize, tables: usize) {
            self.tables.fetch_add(tables, Ordering::SeqCst);
        }

        fn on_document_error(&self, _index: usize, _total: usize, _error: &str) {
            self.errors.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn noop_callback_does_not_panic() {
        let cb = NoopProgressCallback;
        cb.on_batch_start(2);
        cb.on_document_start(1, 2, "a");
        cb.on_strategy_complete("stream", 3, None);
        cb.on_document_complete(1, 2, 1);
        cb.on_document_error(2, 2, "missing");
        cb.on_batch_complete(2, 1);
    }

    #[test]
    fn tracking_callback_receives_events() {
        let tracker = TrackingCallback::default();

        tracker.on_document_start(1, 2, "survey");
        tracker.on_strategy_complete("lattice", 0, Some("no ruling lines"));
        tracker.on_strategy_complete("stream", 4, None);
        tracker.on_document_complete(1, 2, 3);
        tracker.on_document_start(2, 2, "missing");
        tracker.on_document_error(2, 2, "not found");

        assert_eq!(tracker.documents.load(Ordering::SeqCst), 2);
        assert_eq!(tracker.strategy_failures.load(Ordering::SeqCst), 1);
        assert_eq!(tracker.tables.load(Ordering::SeqCst), 3);
        assert_eq!(tracker.errors.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn arc_dyn_callback_works() {
        let cb: ProgressCallback = Arc::new(NoopProgressCallback);
        cb.on_batch_start(10);
        cb.on_document_complete(1, 10, 0);
    }
}
