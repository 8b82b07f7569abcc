//! Streaming extraction API: emit page files as they are written.
//!
//! ## Why stream?
//!
//! Large catalogues take a while. A streams-based API lets callers display
//! partial results immediately, wire up progress bars, or hand each written
//! file to a downstream step without waiting for the whole document. Each
//! page's pixel buffer is released as soon as its PNG is on disk, so peak
//! memory during the persist phase stays bounded by the encode window.
//!
//! Unlike the eager [`crate::extract::extract`] which returns only after all
//! pages are written, [`extract_stream`] yields one [`PageFile`] per
//! persisted page. Files are always written — and therefore yielded — in
//! page order; the file set on disk is identical to the eager API's.

use crate::config::ExtractConfig;
use crate::error::ExtractError;
use crate::output::PageFile;
use crate::pipeline::{input, persist, render};
use futures::stream::{self, StreamExt};
use std::path::{Path, PathBuf};
use std::pin::Pin;
use tokio_stream::Stream;
use tracing::{debug, info};

/// A boxed stream of written page files.
pub type PageFileStream = Pin<Box<dyn Stream<Item = Result<PageFile, ExtractError>> + Send>>;

/// Extract pages to `output_dir`, streaming each [`PageFile`] as it lands.
///
/// Setup (input resolution, metadata, rendering, output-directory creation)
/// happens before the stream is returned; a fatal setup problem surfaces as
/// `Err(ExtractError)` here. A write failure mid-stream is yielded as the
/// final `Err` item and terminates the stream — files written before it
/// remain on disk, later pages are not attempted.
pub async fn extract_stream(
    input_str: impl AsRef<str>,
    output_dir: impl AsRef<Path>,
    config: &ExtractConfig,
) -> Result<PageFileStream, ExtractError> {
    let input_str = input_str.as_ref();
    let output_dir = output_dir.as_ref().to_path_buf();
    info!(
        "Starting streaming extraction: {} → {}",
        input_str,
        output_dir.display()
    );

    // ── Resolve input ────────────────────────────────────────────────────
    let resolved = input::resolve_input(input_str, config.download_timeout_secs).await?;
    let pdf_path = resolved.path().to_path_buf();

    // ── Extract metadata for page count ──────────────────────────────────
    let metadata = render::extract_metadata(&pdf_path, config.password.as_deref()).await?;
    let total_pages = metadata.page_count;

    if total_pages == 0 {
        let empty: PageFileStream = Box::pin(stream::empty());
        return Ok(empty);
    }

    // ── Compute page indices ─────────────────────────────────────────────
    let page_indices = config.pages.to_indices(total_pages);
    if page_indices.is_empty() {
        return Err(ExtractError::PageOutOfRange {
            page: 0,
            total: total_pages,
        });
    }
    let selected = page_indices.len();

    // ── Ensure the output directory exists ───────────────────────────────
    tokio::fs::create_dir_all(&output_dir)
        .await
        .map_err(|e| ExtractError::OutputDirCreateFailed {
            path: output_dir.clone(),
            source: e,
        })?;

    if let Some(ref cb) = config.progress_callback {
        cb.on_extraction_start(selected);
    }

    // ── Render all pages ─────────────────────────────────────────────────
    let rendered = render::render_pages(&pdf_path, config, &page_indices).await?;

    // ── Build the stream ─────────────────────────────────────────────────
    // Bounded-parallel encode; `buffered` keeps page order so each item can
    // be written (and yielded) as soon as it is the next page in line.
    let encoded = stream::iter(rendered.into_iter().map(|(idx, img)| {
        tokio::task::spawn_blocking(move || {
            let width = img.width();
            let height = img.height();
            let result = persist::encode_page(&img);
            (idx, width, height, result)
        })
    }))
    .buffered(config.concurrency)
    .boxed();

    let ctx = StreamCtx {
        output_dir,
        config: config.clone(),
        selected,
        written: 0,
    };

    let s = stream::try_unfold((encoded, ctx), |(mut encoded, mut ctx)| async move {
        match encoded.next().await {
            None => {
                if let Some(ref cb) = ctx.config.progress_callback {
                    cb.on_extraction_complete(ctx.selected, ctx.written);
                }
                Ok(None)
            }
            Some(joined) => {
                let page_file = write_one(joined, &ctx).await?;
                ctx.written += 1;
                Ok(Some((page_file, (encoded, ctx))))
            }
        }
    });

    Ok(Box::pin(s))
}

/// State threaded through the unfolded stream.
struct StreamCtx {
    output_dir: PathBuf,
    config: ExtractConfig,
    selected: usize,
    written: usize,
}

type EncodedPage = (usize, u32, u32, Result<Vec<u8>, image::ImageError>);

/// Write one encoded page into the output directory.
async fn write_one(
    joined: Result<EncodedPage, tokio::task::JoinError>,
    ctx: &StreamCtx,
) -> Result<PageFile, ExtractError> {
    let (idx, width, height, png) =
        joined.map_err(|e| ExtractError::Internal(format!("Encode task panicked: {}", e)))?;
    let png = png.map_err(|e| ExtractError::EncodeFailed {
        page: idx + 1,
        detail: e.to_string(),
    })?;

    let page_num = idx + 1;
    let file_name = persist::page_filename(&ctx.config.prefix, page_num, ctx.config.pad_width);
    let path = ctx.output_dir.join(&file_name);

    if let Some(ref cb) = ctx.config.progress_callback {
        cb.on_page_start(page_num, ctx.selected);
    }

    tokio::fs::write(&path, &png)
        .await
        .map_err(|e| ExtractError::PageWriteFailed {
            path: path.clone(),
            source: e,
        })?;

    debug!("Saved {} ({} bytes)", path.display(), png.len());
    if let Some(ref cb) = ctx.config.progress_callback {
        cb.on_page_saved(page_num, ctx.selected, file_name, png.len() as u64);
    }

    Ok(PageFile {
        page_num,
        path,
        width,
        height,
        bytes: png.len() as u64,
    })
}
