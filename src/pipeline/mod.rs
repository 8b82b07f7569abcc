//! Pipeline stages for PDF-to-PNG page extraction.
//!
//! Each submodule implements exactly one transformation step.
//! Keeping stages separate makes each independently testable and lets us
//! swap implementations (e.g. switch rendering backend) without touching
//! other stages.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ render ──▶ persist
//! (URL/path)  (pdfium)  (PNG files)
//! ```
//!
//! 1. [`input`]   — canonicalise the user-supplied path or URL to a local file
//! 2. [`render`]  — rasterise selected pages; runs in `spawn_blocking` because
//!    pdfium is not async-safe
//! 3. [`persist`] — PNG-encode each `DynamicImage` and name the output file

pub mod input;
pub mod persist;
pub mod render;
