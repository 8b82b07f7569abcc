//! # pdf2pages
//!
//! Extract every page of a PDF document as a PNG image.
//!
//! ## Why this crate?
//!
//! Cataloguing workflows often start from a supplier's PDF catalogue: each
//! page holds several product photos that a human (or a separate tool) will
//! crop out later. The missing first step is mechanical — rasterise every
//! page at a known DPI and drop the images into a directory with names that
//! sort in page order. This crate does exactly that and nothing more: no
//! OCR, no detection, no content-aware cropping.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF
//!  │
//!  ├─ 1. Input    resolve local file or download from URL
//!  ├─ 2. Render   rasterise pages via pdfium (CPU-bound, spawn_blocking)
//!  ├─ 3. Persist  lossless PNG per page, written in page order
//!  └─ 4. Output   catalogo_pagina_001.png … catalogo_pagina_NNN.png + stats
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pdf2pages::{extract, ExtractConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ExtractConfig::default(); // 150 DPI, catalogo_pagina_ prefix
//!     let output = extract("catalogo2026.pdf", "public/images/catalog", &config).await?;
//!     println!("{} pages extracted", output.files.len());
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdf2pages` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Disable `cli` when using only the library to avoid pulling in CLI-only deps:
//! ```toml
//! pdf2pages = { version = "0.3", default-features = false }
//! ```
//!
//! ## PDFium
//!
//! Rendering is delegated to the PDFium shared library, located at startup
//! via `PDFIUM_LIB_PATH`, the executable's directory, or the system library
//! path. The library is never downloaded or installed at runtime; a missing
//! library is a startup error with remediation instructions (see
//! [`ExtractError::PdfiumBindingFailed`]).

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod extract;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod stream;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ExtractConfig, ExtractConfigBuilder, PageSelection, DEFAULT_PAD_WIDTH, DEFAULT_PREFIX};
pub use error::ExtractError;
pub use extract::{extract, extract_from_bytes, extract_sync, inspect};
pub use output::{DocumentMetadata, ExtractionOutput, ExtractionStats, PageFile};
pub use pipeline::persist::page_filename;
pub use pipeline::render::verify_renderer;
pub use progress::{ExtractionProgressCallback, NoopProgressCallback, ProgressCallback};
pub use stream::{extract_stream, PageFileStream};
