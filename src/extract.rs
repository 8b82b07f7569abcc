//! Eager (full-document) extraction entry points.
//!
//! ## Why eager vs. streaming?
//!
//! This module provides the simpler API: wait for all pages, then return.
//! Every selected page is rendered into memory before the first file is
//! written, which is fine for catalogue-sized documents. Use
//! [`crate::stream::extract_stream`] instead when you want per-page results
//! progressively.
//!
//! ## Ordering and failure semantics
//!
//! PNG encoding runs on up to `concurrency` blocking threads, but results
//! are consumed in page order (`buffered`, not `buffer_unordered`), so files
//! land on disk strictly in increasing page order. The first failed write
//! aborts the run: earlier files remain, later pages are never attempted.

use crate::config::ExtractConfig;
use crate::error::ExtractError;
use crate::output::{DocumentMetadata, ExtractionOutput, ExtractionStats, PageFile};
use crate::pipeline::{input, persist, render};
use futures::stream::{self, StreamExt};
use std::io::Write;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

/// Extract every selected page of a PDF as a PNG file in `output_dir`.
///
/// This is the primary entry point for the library.
///
/// # Arguments
/// * `input_str`  — Local file path or HTTP/HTTPS URL to a PDF
/// * `output_dir` — Destination directory, created (with parents) if absent
/// * `config`     — Extraction configuration
///
/// # Returns
/// `Ok(ExtractionOutput)` with one [`PageFile`] per written image, in page
/// order. A 0-page document yields an empty file list and is not an error.
///
/// # Errors
/// * Source problems (missing file, not a PDF, corrupt, wrong password) fail
///   before anything is written — see [`ExtractError::is_source_error`].
/// * Output problems (directory uncreatable, disk full) abort the run and
///   leave already-written files in place.
pub async fn extract(
    input_str: impl AsRef<str>,
    output_dir: impl AsRef<Path>,
    config: &ExtractConfig,
) -> Result<ExtractionOutput, ExtractError> {
    let total_start = Instant::now();
    let input_str = input_str.as_ref();
    let output_dir = output_dir.as_ref();
    info!(
        "Starting extraction: {} → {}",
        input_str,
        output_dir.display()
    );

    // ── Step 1: Resolve input ────────────────────────────────────────────
    // Source validation comes first so that a bad input never creates the
    // output directory as a side effect.
    let resolved = input::resolve_input(input_str, config.download_timeout_secs).await?;
    let pdf_path = resolved.path().to_path_buf();

    // ── Step 2: Extract metadata ─────────────────────────────────────────
    let metadata = render::extract_metadata(&pdf_path, config.password.as_deref()).await?;
    let total_pages = metadata.page_count;
    info!("PDF has {} pages", total_pages);

    if total_pages == 0 {
        // Valid but empty document: count 0, no files, no error.
        return Ok(empty_output(metadata, total_start));
    }

    // ── Step 3: Compute page indices ─────────────────────────────────────
    let page_indices = config.pages.to_indices(total_pages);
    if page_indices.is_empty() {
        return Err(ExtractError::PageOutOfRange {
            page: 0,
            total: total_pages,
        });
    }
    debug!("Selected {} pages for extraction", page_indices.len());
    let selected = page_indices.len();

    // ── Step 4: Ensure the output directory exists ───────────────────────
    tokio::fs::create_dir_all(output_dir)
        .await
        .map_err(|e| ExtractError::OutputDirCreateFailed {
            path: output_dir.to_path_buf(),
            source: e,
        })?;

    if let Some(ref cb) = config.progress_callback {
        cb.on_extraction_start(selected);
    }

    // ── Step 5: Rasterise pages ──────────────────────────────────────────
    let render_start = Instant::now();
    let rendered = render::render_pages(&pdf_path, config, &page_indices).await?;
    let render_duration_ms = render_start.elapsed().as_millis() as u64;
    info!(
        "Rendered {} pages in {}ms",
        rendered.len(),
        render_duration_ms
    );

    // ── Step 6: Encode and persist, in page order ────────────────────────
    let persist_start = Instant::now();
    let files = persist_pages(rendered, output_dir, config, selected).await?;
    let persist_duration_ms = persist_start.elapsed().as_millis() as u64;

    if let Some(ref cb) = config.progress_callback {
        cb.on_extraction_complete(selected, files.len());
    }

    let stats = ExtractionStats {
        total_pages,
        written_pages: files.len(),
        skipped_pages: total_pages - selected,
        total_duration_ms: total_start.elapsed().as_millis() as u64,
        render_duration_ms,
        persist_duration_ms,
    };

    info!(
        "Extraction complete: {}/{} pages, {}ms total",
        stats.written_pages, total_pages, stats.total_duration_ms
    );

    Ok(ExtractionOutput {
        files,
        metadata,
        stats,
    })
}

/// Synchronous wrapper around [`extract`].
///
/// Creates a temporary tokio runtime internally.
pub fn extract_sync(
    input_str: impl AsRef<str>,
    output_dir: impl AsRef<Path>,
    config: &ExtractConfig,
) -> Result<ExtractionOutput, ExtractError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| ExtractError::Internal(format!("Failed to create tokio runtime: {}", e)))?
        .block_on(extract(input_str, output_dir, config))
}

/// Extract PDF metadata without rendering or writing anything.
pub async fn inspect(input_str: impl AsRef<str>) -> Result<DocumentMetadata, ExtractError> {
    let resolved = input::resolve_input(input_str.as_ref(), 120).await?;
    let pdf_path = resolved.path().to_path_buf();
    render::extract_metadata(&pdf_path, None).await
}

/// Extract pages from PDF bytes in memory.
///
/// This avoids the need for the caller to create a temporary file.
/// Internally the library writes `bytes` to a managed [`tempfile`] and cleans
/// it up automatically on return or panic.
///
/// # Example
/// ```rust,no_run
/// use pdf2pages::{extract_from_bytes, ExtractConfig};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let bytes: Vec<u8> = std::fs::read("catalogo.pdf")?;
/// let config = ExtractConfig::default();
/// let output = extract_from_bytes(&bytes, "public/images/catalog", &config).await?;
/// println!("{} pages extracted", output.files.len());
/// # Ok(())
/// # }
/// ```
pub async fn extract_from_bytes(
    bytes: &[u8],
    output_dir: impl AsRef<Path>,
    config: &ExtractConfig,
) -> Result<ExtractionOutput, ExtractError> {
    let mut tmp = tempfile::NamedTempFile::new()
        .map_err(|e| ExtractError::Internal(format!("tempfile: {e}")))?;
    tmp.write_all(bytes)
        .map_err(|e| ExtractError::Internal(format!("tempfile write: {e}")))?;
    let path = tmp.path().to_string_lossy().to_string();
    // `tmp` is dropped (and the file deleted) when `extract` returns
    extract(&path, output_dir, config).await
}

// ── Internal helpers ─────────────────────────────────────────────────────

/// Encode rendered pages on bounded blocking workers and write each file in
/// page order.
///
/// `buffered` (not `buffer_unordered`) keeps arrival order equal to page
/// order, so a write failure stops the run at a well-defined page and
/// everything before it is already on disk.
async fn persist_pages(
    rendered: Vec<(usize, image::DynamicImage)>,
    output_dir: &Path,
    config: &ExtractConfig,
    selected: usize,
) -> Result<Vec<PageFile>, ExtractError> {
    let mut encoded = stream::iter(rendered.into_iter().map(|(idx, img)| {
        tokio::task::spawn_blocking(move || {
            let width = img.width();
            let height = img.height();
            let result = persist::encode_page(&img);
            (idx, width, height, result)
        })
    }))
    .buffered(config.concurrency);

    let mut files = Vec::with_capacity(selected);

    while let Some(joined) = encoded.next().await {
        let (idx, width, height, png) = joined
            .map_err(|e| ExtractError::Internal(format!("Encode task panicked: {}", e)))?;
        let png = png.map_err(|e| ExtractError::EncodeFailed {
            page: idx + 1,
            detail: e.to_string(),
        })?;

        let page_num = idx + 1;
        let file_name = persist::page_filename(&config.prefix, page_num, config.pad_width);
        let path = output_dir.join(&file_name);

        if let Some(ref cb) = config.progress_callback {
            cb.on_page_start(page_num, selected);
        }

        tokio::fs::write(&path, &png)
            .await
            .map_err(|e| ExtractError::PageWriteFailed {
                path: path.clone(),
                source: e,
            })?;

        debug!("Saved {} ({} bytes)", path.display(), png.len());
        if let Some(ref cb) = config.progress_callback {
            cb.on_page_saved(page_num, selected, file_name, png.len() as u64);
        }

        files.push(PageFile {
            page_num,
            path,
            width,
            height,
            bytes: png.len() as u64,
        });
    }

    Ok(files)
}

fn empty_output(metadata: DocumentMetadata, total_start: Instant) -> ExtractionOutput {
    ExtractionOutput {
        files: Vec::new(),
        metadata,
        stats: ExtractionStats {
            total_pages: 0,
            written_pages: 0,
            skipped_pages: 0,
            total_duration_ms: total_start.elapsed().as_millis() as u64,
            render_duration_ms: 0,
            persist_duration_ms: 0,
        },
    }
}
