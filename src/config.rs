//! Configuration types for PDF page extraction.
//!
//! All extraction behaviour is controlled through [`ExtractConfig`], built
//! via its [`ExtractConfigBuilder`]. Keeping every knob in one struct makes
//! it trivial to share configs across threads, serialise them for logging,
//! and diff two runs to understand why their outputs differ.
//!
//! # Design choice: builder over constructor
//! A ten-field constructor is unreadable and breaks on every new field.
//! The builder pattern lets callers set only what they care about and rely
//! on well-documented defaults for the rest.

use crate::error::ExtractError;
use crate::progress::ProgressCallback;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default filename prefix for extracted page images.
pub const DEFAULT_PREFIX: &str = "catalogo_pagina_";

/// Default zero-padding width for the page index in filenames.
pub const DEFAULT_PAD_WIDTH: usize = 3;

/// Configuration for a PDF page extraction.
///
/// Built via [`ExtractConfig::builder()`] or using
/// [`ExtractConfig::default()`].
///
/// # Example
/// ```rust
/// use pdf2pages::ExtractConfig;
///
/// let config = ExtractConfig::builder()
///     .dpi(150)
///     .concurrency(4)
///     .prefix("catalogo_pagina_")
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct ExtractConfig {
    /// Rendering DPI used when rasterising each PDF page. Must be ≥ 1. Default: 150.
    ///
    /// 150 DPI keeps text legible for manual cropping while file sizes stay
    /// modest. There is no enforced upper bound: very high values on large
    /// pages produce correspondingly large pixel buffers, and the full set of
    /// rendered pages is held in memory before the first file is written, so
    /// the caller is responsible for sane values.
    pub dpi: u32,

    /// Filename prefix for every output image. Default: `"catalogo_pagina_"`.
    ///
    /// Must be a bare filename fragment — no path separators. The full name
    /// is `{prefix}{page:0pad$}.png`.
    pub prefix: String,

    /// Zero-padding width for the 1-based page index. Default: 3.
    ///
    /// Filenames sort lexicographically in page order for documents up to
    /// 10^pad − 1 pages; widen this before extracting anything longer.
    pub pad_width: usize,

    /// Page selection. Default: all pages.
    pub pages: PageSelection,

    /// Number of pages PNG-encoded concurrently. Default: 4.
    ///
    /// Encoding is CPU-bound and runs on blocking worker threads. This is an
    /// internal throughput knob only: files are always written in page order
    /// and a write failure stops the run at the same page regardless of the
    /// value here.
    pub concurrency: usize,

    /// PDF user password for encrypted documents.
    pub password: Option<String>,

    /// Download timeout for URL inputs in seconds. Default: 120.
    pub download_timeout_secs: u64,

    /// Progress callback invoked per saved page. Default: none.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            dpi: 150,
            prefix: DEFAULT_PREFIX.to_string(),
            pad_width: DEFAULT_PAD_WIDTH,
            pages: PageSelection::default(),
            concurrency: 4,
            password: None,
            download_timeout_secs: 120,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for ExtractConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtractConfig")
            .field("dpi", &self.dpi)
            .field("prefix", &self.prefix)
            .field("pad_width", &self.pad_width)
            .field("pages", &self.pages)
            .field("concurrency", &self.concurrency)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("download_timeout_secs", &self.download_timeout_secs)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn callback>"),
            )
            .finish()
    }
}

impl ExtractConfig {
    /// Create a new builder for `ExtractConfig`.
    pub fn builder() -> ExtractConfigBuilder {
        ExtractConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ExtractConfig`].
pub struct ExtractConfigBuilder {
    config: ExtractConfig,
}

impl ExtractConfigBuilder {
    pub fn dpi(mut self, dpi: u32) -> Self {
        self.config.dpi = dpi;
        self
    }

    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.prefix = prefix.into();
        self
    }

    pub fn pad_width(mut self, width: usize) -> Self {
        self.config.pad_width = width;
        self
    }

    pub fn pages(mut self, selection: PageSelection) -> Self {
        self.config.pages = selection;
        self
    }

    pub fn concurrency(mut self, n: usize) -> Self {
        self.config.concurrency = n.max(1);
        self
    }

    pub fn password(mut self, pwd: impl Into<String>) -> Self {
        self.config.password = Some(pwd.into());
        self
    }

    pub fn download_timeout_secs(mut self, secs: u64) -> Self {
        self.config.download_timeout_secs = secs;
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ExtractConfig, ExtractError> {
        let c = &self.config;
        if c.dpi == 0 {
            return Err(ExtractError::InvalidConfig("DPI must be ≥ 1".into()));
        }
        if c.concurrency == 0 {
            return Err(ExtractError::InvalidConfig(
                "Concurrency must be ≥ 1".into(),
            ));
        }
        if c.pad_width == 0 {
            return Err(ExtractError::InvalidConfig(
                "Padding width must be ≥ 1".into(),
            ));
        }
        if c.prefix.contains('/') || c.prefix.contains('\\') {
            return Err(ExtractError::InvalidConfig(format!(
                "Prefix must not contain path separators, got '{}'",
                c.prefix
            )));
        }
        Ok(self.config)
    }
}

// ── Enums ────────────────────────────────────────────────────────────────

/// Specifies which pages of the PDF to extract.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub enum PageSelection {
    /// Extract all pages (default).
    #[default]
    All,
    /// Extract a single page (1-indexed).
    Single(usize),
    /// Extract a contiguous range of pages (1-indexed, inclusive).
    Range(usize, usize),
    /// Extract specific pages (1-indexed, deduplicated).
    Set(Vec<usize>),
}

impl PageSelection {
    /// Expand the selection into a sorted, deduplicated list of 0-indexed page numbers.
    pub fn to_indices(&self, total_pages: usize) -> Vec<usize> {
        let mut indices: Vec<usize> = match self {
            PageSelection::All => (0..total_pages).collect(),
            PageSelection::Single(p) => {
                if *p >= 1 && *p <= total_pages {
                    vec![p - 1]
                } else {
                    vec![]
                }
            }
            PageSelection::Range(start, end) => {
                let s = (*start).max(1) - 1;
                let e = (*end).min(total_pages);
                (s..e).collect()
            }
            PageSelection::Set(pages) => pages
                .iter()
                .filter(|&&p| p >= 1 && p <= total_pages)
                .map(|p| p - 1)
                .collect(),
        };
        indices.sort_unstable();
        indices.dedup();
        indices
    }
}
