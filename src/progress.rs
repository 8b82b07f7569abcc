//! Progress-callback trait for per-page extraction events.
//!
//! Inject an [`Arc<dyn ExtractionProgressCallback>`] via
//! [`crate::config::ExtractConfigBuilder::progress_callback`] to receive
//! real-time events as each page image is persisted.
//!
//! # Why callbacks instead of channels?
//!
//! The callback approach is the least-invasive integration point: callers can
//! forward events to a Tokio broadcast channel, a WebSocket, a database record,
//! or a terminal progress bar — without the library knowing anything about how
//! the host application communicates. The trait is `Send + Sync` so it works
//! correctly even though page encoding happens on blocking worker threads.

use std::sync::Arc;

/// Called by the extraction pipeline as it persists each page.
///
/// Implementations must be `Send + Sync`. All methods have default no-op
/// implementations so callers only override what they care about.
///
/// Files are written strictly in page order, so `on_page_start` and
/// `on_page_saved` arrive in increasing `page_num` order.
pub trait ExtractionProgressCallback: Send + Sync {
    /// Called once before any page is persisted.
    ///
    /// # Arguments
    /// * `total_pages` — number of pages that will be written
    fn on_extraction_start(&self, total_pages: usize) {
        let _ = total_pages;
    }

    /// Called just before a page image is written to disk.
    ///
    /// # Arguments
    /// * `page_num`    — 1-indexed page number
    /// * `total_pages` — total pages being extracted
    fn on_page_start(&self, page_num: usize, total_pages: usize) {
        let _ = (page_num, total_pages);
    }

    /// Called when a page image has been written.
    ///
    /// # Arguments
    /// * `page_num`    — 1-indexed page number
    /// * `total_pages` — total pages being extracted
    /// * `file_name`   — name of the written file
    /// * `bytes`       — encoded size on disk
    fn on_page_saved(&self, page_num: usize, total_pages: usize, file_name: String, bytes: u64) {
        let _ = (page_num, total_pages, file_name, bytes);
    }

    /// Called once after the last page has been written.
    ///
    /// Not called when the run aborts on an error.
    ///
    /// # Arguments
    /// * `total_pages`   — total pages that were selected
    /// * `written_count` — pages actually written
    fn on_extraction_complete(&self, total_pages: usize, written_count: usize) {
        let _ = (total_pages, written_count);
    }
}

/// A no-op implementation for callers that don't need progress events.
///
/// This is the default when no callback is configured.
pub struct NoopProgressCallback;

impl ExtractionProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::ExtractConfig`].
pub type ProgressCallback = Arc<dyn ExtractionProgressCallback>;
