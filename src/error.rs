//! Error types for the pdf2pages library.
//!
//! One fatal error enum covers the whole run: a page that cannot be rendered
//! or written aborts the extraction. Files already persisted before the
//! failure remain on disk — re-running overwrites the same filenames, so a
//! rollback would only destroy useful partial output.
//!
//! Variants fall into two families mirrored by [`ExtractError::is_source_error`]
//! and [`ExtractError::is_output_error`]: problems reading/parsing the source
//! document (which guarantee zero files were written) and problems creating
//! or writing into the output directory (which may leave partial output).

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the pdf2pages library.
#[derive(Debug, Error)]
pub enum ExtractError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("PDF file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The input string is not a valid file path or URL.
    #[error("Invalid input '{input}': not a file path or a valid HTTP/HTTPS URL")]
    InvalidInput { input: String },

    /// HTTP URL was syntactically valid but download failed.
    #[error("Failed to download '{url}': {reason}\nCheck your internet connection.")]
    DownloadFailed { url: String, reason: String },

    /// Download exceeded the configured timeout.
    #[error("Download timed out after {secs}s for '{url}'\nIncrease --download-timeout.")]
    DownloadTimeout { url: String, secs: u64 },

    /// The file exists and was read, but is not a PDF.
    #[error("File is not a valid PDF: '{path}'\nFirst bytes: {magic:?}")]
    NotAPdf { path: PathBuf, magic: [u8; 4] },

    // ── PDF errors ────────────────────────────────────────────────────────
    /// PDF header/trailer/xref is corrupt and cannot be parsed.
    #[error("PDF '{path}' is corrupt: {detail}\nTry repairing with: qpdf --decrypt input.pdf output.pdf")]
    CorruptPdf { path: PathBuf, detail: String },

    /// PDF requires a password but none was provided.
    #[error("PDF '{path}' is encrypted and requires a password.\nProvide it with --password <PASSWORD>.")]
    PasswordRequired { path: PathBuf },

    /// A password was provided but it is wrong.
    #[error("Wrong password for PDF '{path}'")]
    WrongPassword { path: PathBuf },

    /// Selected page numbers exceed the actual page count.
    #[error("Page {page} is out of range (document has {total} pages)")]
    PageOutOfRange { page: usize, total: usize },

    /// pdfium-render returned an error for a specific page.
    #[error("Rasterisation failed for page {page}: {detail}")]
    RenderFailed { page: usize, detail: String },

    // ── Output errors ─────────────────────────────────────────────────────
    /// The output directory (or an ancestor) could not be created.
    #[error("Failed to create output directory '{path}': {source}")]
    OutputDirCreateFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// PNG encoding of a rendered page failed.
    #[error("PNG encoding failed for page {page}: {detail}")]
    EncodeFailed { page: usize, detail: String },

    /// A page image could not be written to disk (disk full, permissions).
    ///
    /// Pages written before this one remain on disk; pages after it were
    /// not attempted.
    #[error("Failed to write page image '{path}': {source}")]
    PageWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Pdfium binding errors ─────────────────────────────────────────────
    /// Could not bind to a pdfium library.
    #[error(
        "Failed to bind to pdfium library: {0}\n\n\
pdf2pages needs the PDFium shared library (libpdfium) at startup.\n\
To fix this:\n\
  • Set PDFIUM_LIB_PATH=/path/to/libpdfium to use an existing copy.\n\
  • Place libpdfium.so / libpdfium.dylib / pdfium.dll next to the executable.\n\
  • Install a prebuilt binary from https://github.com/bblanchon/pdfium-binaries\n\
    into a system library directory.\n"
    )]
    PdfiumBindingFailed(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ExtractError {
    /// True for failures reading or parsing the source document.
    ///
    /// When this returns true the extraction wrote zero files: source
    /// validation and rendering both complete before the first write.
    pub fn is_source_error(&self) -> bool {
        matches!(
            self,
            ExtractError::FileNotFound { .. }
                | ExtractError::PermissionDenied { .. }
                | ExtractError::InvalidInput { .. }
                | ExtractError::DownloadFailed { .. }
                | ExtractError::DownloadTimeout { .. }
                | ExtractError::NotAPdf { .. }
                | ExtractError::CorruptPdf { .. }
                | ExtractError::PasswordRequired { .. }
                | ExtractError::WrongPassword { .. }
                | ExtractError::PageOutOfRange { .. }
                | ExtractError::RenderFailed { .. }
        )
    }

    /// True for failures creating the output directory or writing a page.
    ///
    /// Pages persisted before the failure remain on disk.
    pub fn is_output_error(&self) -> bool {
        matches!(
            self,
            ExtractError::OutputDirCreateFailed { .. }
                | ExtractError::EncodeFailed { .. }
                | ExtractError::PageWriteFailed { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_not_found_display() {
        let e = ExtractError::FileNotFound {
            path: PathBuf::from("/tmp/missing.pdf"),
        };
        let msg = e.to_string();
        assert!(msg.contains("/tmp/missing.pdf"), "got: {msg}");
        assert!(e.is_source_error());
        assert!(!e.is_output_error());
    }

    #[test]
    fn page_write_failed_display() {
        let e = ExtractError::PageWriteFailed {
            path: PathBuf::from("/out/catalogo_pagina_007.png"),
            source: std::io::Error::other("disk full"),
        };
        let msg = e.to_string();
        assert!(msg.contains("catalogo_pagina_007.png"), "got: {msg}");
        assert!(e.is_output_error());
        assert!(!e.is_source_error());
    }

    #[test]
    fn render_failed_display() {
        let e = ExtractError::RenderFailed {
            page: 3,
            detail: "bitmap allocation failed".into(),
        };
        assert!(e.to_string().contains("page 3"));
        assert!(e.is_source_error());
    }

    #[test]
    fn binding_failure_mentions_remediation() {
        let e = ExtractError::PdfiumBindingFailed("library not found".into());
        let msg = e.to_string();
        assert!(msg.contains("PDFIUM_LIB_PATH"));
        assert!(msg.contains("pdfium-binaries"));
    }

    #[test]
    fn config_error_is_neither_family() {
        let e = ExtractError::InvalidConfig("DPI must be >= 1".into());
        assert!(!e.is_source_error());
        assert!(!e.is_output_error());
    }
}
