//! Result types returned by the extraction entry points.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One page image persisted to disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageFile {
    /// 1-based page number in the source document.
    pub page_num: usize,
    /// Full path of the written PNG.
    pub path: PathBuf,
    /// Pixel width of the rendered page.
    pub width: u32,
    /// Pixel height of the rendered page.
    pub height: u32,
    /// Encoded size on disk in bytes.
    pub bytes: u64,
}

/// Document metadata extracted without rendering any page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub title: Option<String>,
    pub author: Option<String>,
    pub subject: Option<String>,
    pub creator: Option<String>,
    pub producer: Option<String>,
    pub creation_date: Option<String>,
    pub modification_date: Option<String>,
    pub page_count: usize,
    pub pdf_version: String,
    pub is_encrypted: bool,
}

/// Counters and timings for one extraction run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionStats {
    /// Pages in the source document.
    pub total_pages: usize,
    /// Page images written to the output directory.
    pub written_pages: usize,
    /// Document pages excluded by the page selection.
    pub skipped_pages: usize,
    /// Wall-clock duration of the whole run in milliseconds.
    pub total_duration_ms: u64,
    /// Time spent rasterising pages in milliseconds.
    pub render_duration_ms: u64,
    /// Time spent encoding and writing PNGs in milliseconds.
    pub persist_duration_ms: u64,
}

/// Complete result of an extraction run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionOutput {
    /// Written page images, in page order.
    pub files: Vec<PageFile>,
    /// Metadata of the source document.
    pub metadata: DocumentMetadata,
    /// Counters and timings.
    pub stats: ExtractionStats,
}
