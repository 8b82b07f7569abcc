//! End-to-end integration tests for pdf2pages.
//!
//! The extraction tests render through the real PDFium library, so they are
//! gated behind the `E2E_ENABLED` environment variable and skip cleanly when
//! it is not set (e.g. CI hosts without libpdfium).
//!
//! Run with:
//!   E2E_ENABLED=1 cargo test --test e2e -- --nocapture
//!
//! Test PDFs are generated in-process: `minimal_pdf(n)` builds a small but
//! fully valid n-page document (correct xref offsets), so no fixtures need
//! to be downloaded.

use pdf2pages::{
    extract, extract_stream, inspect, page_filename, ExtractConfig, PageSelection,
};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

// ── Test helpers ─────────────────────────────────────────────────────────────

/// Skip this test unless E2E_ENABLED is set (rendering needs libpdfium).
macro_rules! e2e_skip_unless_enabled {
    () => {
        if std::env::var("E2E_ENABLED").is_err() {
            println!("SKIP — set E2E_ENABLED=1 (requires libpdfium) to run e2e tests");
            return;
        }
    };
}

/// Build a valid n-page PDF in memory: catalog, page tree, and n empty
/// pages with a 200×100 pt MediaBox, plus a correct xref table.
fn minimal_pdf(page_count: usize) -> Vec<u8> {
    let mut objects: Vec<String> = Vec::new();
    let kids: Vec<String> = (0..page_count).map(|i| format!("{} 0 R", 3 + i)).collect();
    objects.push("<< /Type /Catalog /Pages 2 0 R >>".to_string());
    objects.push(format!(
        "<< /Type /Pages /Kids [{}] /Count {} >>",
        kids.join(" "),
        page_count
    ));
    for _ in 0..page_count {
        objects.push("<< /Type /Page /Parent 2 0 R /MediaBox [0 0 200 100] >>".to_string());
    }

    let mut buf: Vec<u8> = Vec::new();
    buf.extend_from_slice(b"%PDF-1.4\n");
    let mut offsets = Vec::with_capacity(objects.len());
    for (i, body) in objects.iter().enumerate() {
        offsets.push(buf.len());
        buf.extend_from_slice(format!("{} 0 obj\n{}\nendobj\n", i + 1, body).as_bytes());
    }
    let xref_offset = buf.len();
    buf.extend_from_slice(format!("xref\n0 {}\n", objects.len() + 1).as_bytes());
    buf.extend_from_slice(b"0000000000 65535 f \n");
    for off in &offsets {
        buf.extend_from_slice(format!("{:010} 00000 n \n", off).as_bytes());
    }
    buf.extend_from_slice(
        format!(
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
            objects.len() + 1,
            xref_offset
        )
        .as_bytes(),
    );
    buf
}

/// Write an n-page PDF into `dir` and return its path.
fn write_test_pdf(dir: &Path, page_count: usize) -> PathBuf {
    let path = dir.join(format!("test_{page_count}p.pdf"));
    std::fs::write(&path, minimal_pdf(page_count)).expect("write test PDF");
    path
}

/// Collect the sorted file names in a directory.
fn dir_file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .expect("read output dir")
        .map(|e| e.expect("dir entry").file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

// ── Input-stage tests (no rendering, always run) ─────────────────────────────

#[tokio::test]
async fn missing_source_fails_with_zero_files() {
    let out = TempDir::new().expect("tempdir");
    let out_dir = out.path().join("pages");

    let config = ExtractConfig::default();
    let err = extract("/definitely/not/a/real/file.pdf", &out_dir, &config)
        .await
        .expect_err("extract must fail for a missing source");

    assert!(err.is_source_error(), "got: {err}");
    // Fail-fast: the output directory must not even have been created.
    assert!(!out_dir.exists(), "no output may exist for a bad source");
}

#[tokio::test]
async fn non_pdf_source_rejected_before_any_output() {
    let dir = TempDir::new().expect("tempdir");
    let bogus = dir.path().join("not_a_pdf.pdf");
    std::fs::write(&bogus, b"just some text, no PDF header").expect("write");
    let out_dir = dir.path().join("pages");

    let config = ExtractConfig::default();
    let err = extract(bogus.to_str().unwrap(), &out_dir, &config)
        .await
        .expect_err("extract must reject a non-PDF file");

    assert!(err.is_source_error(), "got: {err}");
    assert!(!out_dir.exists());
}

#[tokio::test]
async fn inspect_nonexistent_fails() {
    let result = inspect("/definitely/not/a/real/file.pdf").await;
    assert!(
        result.is_err(),
        "inspect() should return Err for nonexistent file"
    );
}

// ── Naming and selection unit tests (always run) ─────────────────────────────

#[test]
fn default_filename_convention_pads_to_three_digits() {
    assert_eq!(page_filename("catalogo_pagina_", 7, 3), "catalogo_pagina_007.png");
}

#[test]
fn page_selection_out_of_range_is_empty() {
    assert_eq!(
        PageSelection::Single(100).to_indices(4),
        Vec::<usize>::new()
    );
}

#[test]
fn page_selection_range_clipping() {
    let indices = PageSelection::Range(3, 10).to_indices(4);
    assert_eq!(indices, vec![2, 3]);
}

// ── Extraction tests (need libpdfium) ────────────────────────────────────────

#[tokio::test]
async fn three_page_pdf_produces_three_sorted_files() {
    e2e_skip_unless_enabled!();

    let dir = TempDir::new().expect("tempdir");
    let pdf = write_test_pdf(dir.path(), 3);
    let out_dir = dir.path().join("pages");

    let config = ExtractConfig::default();
    let output = extract(pdf.to_str().unwrap(), &out_dir, &config)
        .await
        .expect("extraction should succeed");

    assert_eq!(output.files.len(), 3, "3-page PDF → 3 files");
    assert_eq!(output.stats.written_pages, 3);
    assert_eq!(output.stats.total_pages, 3);
    assert_eq!(output.stats.skipped_pages, 0);

    assert_eq!(
        dir_file_names(&out_dir),
        vec![
            "catalogo_pagina_001.png",
            "catalogo_pagina_002.png",
            "catalogo_pagina_003.png",
        ]
    );

    // Every file must be a decodable PNG and match the reported dimensions.
    for file in &output.files {
        let img = image::open(&file.path).expect("valid PNG on disk");
        assert_eq!(img.width(), file.width);
        assert_eq!(img.height(), file.height);
        assert_eq!(
            std::fs::metadata(&file.path).expect("stat").len(),
            file.bytes
        );
    }

    // files are reported in page order
    let nums: Vec<usize> = output.files.iter().map(|f| f.page_num).collect();
    assert_eq!(nums, vec![1, 2, 3]);
}

#[tokio::test]
async fn rerun_overwrites_to_identical_output() {
    e2e_skip_unless_enabled!();

    let dir = TempDir::new().expect("tempdir");
    let pdf = write_test_pdf(dir.path(), 2);
    let out_dir = dir.path().join("pages");

    let config = ExtractConfig::default();
    extract(pdf.to_str().unwrap(), &out_dir, &config)
        .await
        .expect("first run");
    let first: Vec<Vec<u8>> = dir_file_names(&out_dir)
        .iter()
        .map(|n| std::fs::read(out_dir.join(n)).expect("read"))
        .collect();

    extract(pdf.to_str().unwrap(), &out_dir, &config)
        .await
        .expect("second run");
    let second: Vec<Vec<u8>> = dir_file_names(&out_dir)
        .iter()
        .map(|n| std::fs::read(out_dir.join(n)).expect("read"))
        .collect();

    assert_eq!(first, second, "re-run must be byte-for-byte identical");
}

#[tokio::test]
async fn higher_dpi_never_shrinks_output_images() {
    e2e_skip_unless_enabled!();

    let dir = TempDir::new().expect("tempdir");
    let pdf = write_test_pdf(dir.path(), 1);

    let low_dir = dir.path().join("low");
    let high_dir = dir.path().join("high");

    let low = extract(
        pdf.to_str().unwrap(),
        &low_dir,
        &ExtractConfig::builder().dpi(72).build().unwrap(),
    )
    .await
    .expect("72 DPI run");
    let high = extract(
        pdf.to_str().unwrap(),
        &high_dir,
        &ExtractConfig::builder().dpi(144).build().unwrap(),
    )
    .await
    .expect("144 DPI run");

    assert!(high.files[0].width >= low.files[0].width);
    assert!(high.files[0].height >= low.files[0].height);
    // 144 = 2 × 72, so dimensions should roughly double.
    assert!(
        high.files[0].width >= low.files[0].width * 2 - 2,
        "expected ~2x width, got {} vs {}",
        high.files[0].width,
        low.files[0].width
    );
}

#[tokio::test]
async fn page_selection_writes_only_selected_indices() {
    e2e_skip_unless_enabled!();

    let dir = TempDir::new().expect("tempdir");
    let pdf = write_test_pdf(dir.path(), 5);
    let out_dir = dir.path().join("pages");

    let config = ExtractConfig::builder()
        .pages(PageSelection::Range(2, 3))
        .build()
        .unwrap();
    let output = extract(pdf.to_str().unwrap(), &out_dir, &config)
        .await
        .expect("extraction should succeed");

    assert_eq!(output.stats.written_pages, 2);
    assert_eq!(output.stats.skipped_pages, 3);
    // Filenames keep the source page number, not a renumbered sequence.
    assert_eq!(
        dir_file_names(&out_dir),
        vec!["catalogo_pagina_002.png", "catalogo_pagina_003.png"]
    );
}

#[tokio::test]
async fn custom_prefix_and_padding() {
    e2e_skip_unless_enabled!();

    let dir = TempDir::new().expect("tempdir");
    let pdf = write_test_pdf(dir.path(), 1);
    let out_dir = dir.path().join("pages");

    let config = ExtractConfig::builder()
        .prefix("page_")
        .pad_width(5)
        .build()
        .unwrap();
    extract(pdf.to_str().unwrap(), &out_dir, &config)
        .await
        .expect("extraction should succeed");

    assert_eq!(dir_file_names(&out_dir), vec!["page_00001.png"]);
}

#[tokio::test]
async fn streaming_produces_same_files_as_eager() {
    e2e_skip_unless_enabled!();
    use futures::StreamExt;

    let dir = TempDir::new().expect("tempdir");
    let pdf = write_test_pdf(dir.path(), 3);
    let eager_dir = dir.path().join("eager");
    let stream_dir = dir.path().join("stream");

    let config = ExtractConfig::default();
    let eager = extract(pdf.to_str().unwrap(), &eager_dir, &config)
        .await
        .expect("eager run");

    let mut s = extract_stream(pdf.to_str().unwrap(), &stream_dir, &config)
        .await
        .expect("stream creation");

    let mut streamed = Vec::new();
    while let Some(item) = s.next().await {
        streamed.push(item.expect("streamed page"));
    }

    assert_eq!(streamed.len(), eager.files.len());
    // Streaming yields in page order with the same names and content.
    for (sf, ef) in streamed.iter().zip(eager.files.iter()) {
        assert_eq!(sf.page_num, ef.page_num);
        assert_eq!(
            sf.path.file_name().unwrap(),
            ef.path.file_name().unwrap()
        );
        let a = std::fs::read(&sf.path).expect("read streamed file");
        let b = std::fs::read(&ef.path).expect("read eager file");
        assert_eq!(a, b, "page {} differs between APIs", sf.page_num);
    }
}

#[tokio::test]
async fn inspect_reports_page_count_without_writing() {
    e2e_skip_unless_enabled!();

    let dir = TempDir::new().expect("tempdir");
    let pdf = write_test_pdf(dir.path(), 5);

    let meta = inspect(pdf.to_str().unwrap())
        .await
        .expect("inspect() should succeed");

    assert_eq!(meta.page_count, 5);
    assert!(!meta.pdf_version.is_empty());
    // inspect must not create anything next to the PDF
    assert_eq!(
        dir_file_names(dir.path()),
        vec!["test_5p.pdf".to_string()]
    );
}

#[tokio::test]
async fn uncreatable_output_directory_is_an_output_error() {
    e2e_skip_unless_enabled!();

    let dir = TempDir::new().expect("tempdir");
    let pdf = write_test_pdf(dir.path(), 1);

    // A regular file where a directory ancestor is needed makes
    // create_dir_all fail deterministically.
    let blocker = dir.path().join("blocker");
    std::fs::write(&blocker, b"x").expect("write blocker");
    let out_dir = blocker.join("pages");

    let config = ExtractConfig::default();
    let err = extract(pdf.to_str().unwrap(), &out_dir, &config)
        .await
        .expect_err("extract must fail when the output dir cannot be created");

    assert!(err.is_output_error(), "got: {err}");
}

#[tokio::test]
async fn progress_callback_sees_every_page_in_order() {
    e2e_skip_unless_enabled!();
    use pdf2pages::ExtractionProgressCallback;
    use std::sync::{Arc, Mutex};

    struct Recorder {
        saved: Arc<Mutex<Vec<usize>>>,
        totals: Arc<Mutex<Vec<usize>>>,
    }

    impl ExtractionProgressCallback for Recorder {
        fn on_extraction_start(&self, total_pages: usize) {
            self.totals.lock().unwrap().push(total_pages);
        }
        fn on_page_saved(
            &self,
            page_num: usize,
            _total_pages: usize,
            _file_name: String,
            _bytes: u64,
        ) {
            self.saved.lock().unwrap().push(page_num);
        }
        fn on_extraction_complete(&self, _total_pages: usize, written_count: usize) {
            self.totals.lock().unwrap().push(written_count);
        }
    }

    let saved = Arc::new(Mutex::new(Vec::new()));
    let totals = Arc::new(Mutex::new(Vec::new()));
    let recorder = Arc::new(Recorder {
        saved: Arc::clone(&saved),
        totals: Arc::clone(&totals),
    });

    let dir = TempDir::new().expect("tempdir");
    let pdf = write_test_pdf(dir.path(), 4);
    let out_dir = dir.path().join("pages");

    let config = ExtractConfig::builder()
        .progress_callback(recorder as Arc<dyn ExtractionProgressCallback>)
        .build()
        .unwrap();

    extract(pdf.to_str().unwrap(), &out_dir, &config)
        .await
        .expect("extraction should succeed");

    assert_eq!(*saved.lock().unwrap(), vec![1, 2, 3, 4]);
    assert_eq!(*totals.lock().unwrap(), vec![4, 4]);
}
