//! Page persistence: filename convention and lossless PNG encoding.
//!
//! ## Why PNG?
//!
//! The extracted pages feed a manual cropping workflow, so every pixel the
//! renderer produced must survive. PNG is lossless; JPEG artefacts around
//! rendered text would bleed into every crop taken from the page. Encoding
//! uses the `image` crate's best-compression setting — the file-size
//! optimisation happens inside the lossless codec, never by resampling.
//!
//! ## Filename convention
//!
//! `{prefix}{page:0pad$}.png`, 1-based page numbers, default prefix
//! `catalogo_pagina_` and pad 3: page 7 → `catalogo_pagina_007.png`.
//! Zero-padding keeps lexicographic order equal to page order for any
//! document up to 10^pad − 1 pages.

use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::DynamicImage;
use std::io::Cursor;
use tracing::debug;

/// Build the output filename for a 1-based page number.
pub fn page_filename(prefix: &str, page_num: usize, pad_width: usize) -> String {
    format!("{prefix}{page_num:0pad_width$}.png")
}

/// Encode a rendered page as a losslessly compressed PNG.
pub fn encode_page(img: &DynamicImage) -> Result<Vec<u8>, image::ImageError> {
    let mut buf = Vec::new();
    let encoder = PngEncoder::new_with_quality(
        Cursor::new(&mut buf),
        CompressionType::Best,
        FilterType::Adaptive,
    );
    img.write_with_encoder(encoder)?;

    debug!(
        "Encoded {}x{} page → {} bytes PNG",
        img.width(),
        img.height(),
        buf.len()
    );

    Ok(buf)
}
