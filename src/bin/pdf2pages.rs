//! CLI binary for pdf2pages.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `ExtractConfig` and prints results.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use pdf2pages::{
    extract, inspect, verify_renderer, ExtractConfig, ExtractionProgressCallback, PageSelection,
    ProgressCallback,
};
use std::collections::HashMap;
use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: renders a live progress bar and a per-page log
/// line using [indicatif]. Pages are persisted in order, so lines appear in
/// page order too.
struct CliProgressCallback {
    /// The single progress bar anchored at the bottom of the terminal.
    bar: ProgressBar,
    /// Per-page wall-clock start times for elapsed reporting.
    start_times: Mutex<HashMap<usize, Instant>>,
}

impl CliProgressCallback {
    /// Create a callback whose progress-bar length is set dynamically
    /// by `on_extraction_start` (called before any pages are written).
    fn new_dynamic() -> Arc<Self> {
        let bar = ProgressBar::new(0); // length set in on_extraction_start

        // Initial style: spinner only (no counter until we know the total).
        let spinner_style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);

        bar.set_style(spinner_style);
        bar.set_prefix("Preparing");
        bar.set_message("Opening PDF…");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self {
            bar,
            start_times: Mutex::new(HashMap::new()),
        })
    }

    /// Switch to the full progress-bar style once we know `total`.
    fn activate_bar(&self, total: usize) {
        let progress_style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>3}/{len} pages  \
             ⏱ {elapsed_precise}  ETA {eta_precise}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);

        self.bar.set_length(total as u64);
        self.bar.set_style(progress_style);
        self.bar.set_prefix("Extracting");
        self.bar.reset_eta();
    }
}

impl ExtractionProgressCallback for CliProgressCallback {
    fn on_extraction_start(&self, total_pages: usize) {
        // Switch from spinner-only style to full progress bar now that we
        // know the actual page count.
        self.activate_bar(total_pages);
        self.bar.println(format!(
            "{} {}",
            cyan("◆"),
            bold(&format!("Extracting {total_pages} pages…"))
        ));
    }

    fn on_page_start(&self, page_num: usize, _total: usize) {
        self.start_times
            .lock()
            .unwrap()
            .insert(page_num, Instant::now());
        self.bar.set_message(format!("page {page_num}"));
    }

    fn on_page_saved(&self, page_num: usize, total: usize, file_name: String, bytes: u64) {
        let elapsed_ms = self
            .start_times
            .lock()
            .unwrap()
            .remove(&page_num)
            .map(|t| t.elapsed().as_millis())
            .unwrap_or(0);

        self.bar.println(format!(
            "  {} Page {:>3}/{:<3}  {}  {}  {}",
            green("✓"),
            page_num,
            total,
            file_name,
            dim(&format!("{:>7.1} KiB", bytes as f64 / 1024.0)),
            dim(&format!("{:.1}s", elapsed_ms as f64 / 1000.0)),
        ));
        self.bar.inc(1);
    }

    fn on_extraction_complete(&self, total_pages: usize, written_count: usize) {
        self.bar.finish_and_clear();

        if written_count == total_pages {
            eprintln!(
                "{} {} pages extracted",
                green("✔"),
                bold(&written_count.to_string())
            );
        } else {
            eprintln!(
                "{} {}/{} pages extracted",
                cyan("⚠"),
                bold(&written_count.to_string()),
                total_pages,
            );
        }
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Extract every page at the default 150 DPI
  pdf2pages catalogo2026.pdf public/images/catalog

  # Higher resolution for small print
  pdf2pages --dpi 300 catalogo2026.pdf out/

  # Custom filename prefix and padding
  pdf2pages --prefix page_ --pad 4 manual.pdf out/

  # Specific pages only
  pdf2pages --pages 3-15 catalogo2026.pdf out/

  # Extract from a URL
  pdf2pages https://example.com/catalogo2026.pdf out/

  # Inspect PDF metadata (no output directory needed)
  pdf2pages --inspect-only catalogo2026.pdf

  # Machine-readable result
  pdf2pages --json catalogo2026.pdf out/ > result.json

OUTPUT:
  One PNG per page, written in page order:
    out/catalogo_pagina_001.png
    out/catalogo_pagina_002.png
    ...
  Filenames sort lexicographically in page order for documents up to
  10^pad - 1 pages (999 with the default padding of 3). Re-running against
  the same directory silently overwrites files with the same index.

ENVIRONMENT VARIABLES:
  PDF2PAGES_DPI               Rendering DPI (default 150)
  PDF2PAGES_PREFIX            Filename prefix (default catalogo_pagina_)
  PDF2PAGES_PAGES             Page selection (default all)
  PDF2PAGES_CONCURRENCY       Parallel PNG encoders (default 4)
  PDFIUM_LIB_PATH             Path to an existing libpdfium

SETUP:
  pdf2pages needs the PDFium shared library at startup and never downloads
  it itself. Either install a prebuilt binary from
  https://github.com/bblanchon/pdfium-binaries into a system library
  directory, place it next to the pdf2pages executable, or point
  PDFIUM_LIB_PATH at an existing copy.
"#;

/// Extract every page of a PDF as a PNG image.
#[derive(Parser, Debug)]
#[command(
    name = "pdf2pages",
    version,
    about = "Extract every page of a PDF as a PNG image",
    long_about = "Extract each page of a PDF document (local file or URL) as a losslessly \
compressed PNG image in an output directory, named with a zero-padded page index so the \
files sort in page order. Intended as the first step of a manual cropping/cataloguing \
workflow.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Local PDF file path or HTTP/HTTPS URL.
    input: String,

    /// Directory to write page images into (created if absent).
    #[arg(required_unless_present = "inspect_only")]
    output_dir: Option<PathBuf>,

    /// Rendering DPI (≥ 1, no upper bound).
    #[arg(long, env = "PDF2PAGES_DPI", default_value_t = 150,
          value_parser = clap::value_parser!(u32).range(1..))]
    dpi: u32,

    /// Filename prefix for the page images.
    #[arg(long, env = "PDF2PAGES_PREFIX", default_value = pdf2pages::DEFAULT_PREFIX)]
    prefix: String,

    /// Zero-padding width for the page index.
    #[arg(long, env = "PDF2PAGES_PAD", default_value_t = 3,
          value_parser = clap::value_parser!(usize))]
    pad: usize,

    /// Page selection: all, 5, 3-15, or 1,3,5,7.
    #[arg(long, env = "PDF2PAGES_PAGES", default_value = "all")]
    pages: String,

    /// Number of pages PNG-encoded concurrently.
    #[arg(short, long, env = "PDF2PAGES_CONCURRENCY", default_value_t = 4)]
    concurrency: usize,

    /// PDF user password for encrypted documents.
    #[arg(long, env = "PDF2PAGES_PASSWORD")]
    password: Option<String>,

    /// Output structured JSON (files, metadata, stats) instead of text.
    #[arg(long, env = "PDF2PAGES_JSON")]
    json: bool,

    /// Disable progress bar.
    #[arg(long, env = "PDF2PAGES_NO_PROGRESS")]
    no_progress: bool,

    /// Print PDF metadata only, no extraction.
    #[arg(long)]
    inspect_only: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "PDF2PAGES_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "PDF2PAGES_QUIET")]
    quiet: bool,

    /// HTTP download timeout in seconds.
    #[arg(long, env = "PDF2PAGES_DOWNLOAD_TIMEOUT", default_value_t = 120)]
    download_timeout: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // Suppress INFO-level library logs when the progress bar is active;
    // the bar provides all the feedback that matters to the user.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Ensure the PDF renderer is available ─────────────────────────────
    // Fail fast before touching the input or the output directory. The
    // error message carries the remediation steps; nothing is downloaded
    // or installed here.
    verify_renderer().await?;

    // ── Inspect-only mode ────────────────────────────────────────────────
    if cli.inspect_only {
        let meta = inspect(&cli.input).await.context("Failed to inspect PDF")?;

        if cli.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&meta).context("Failed to serialise metadata")?
            );
        } else {
            println!("File:         {}", cli.input);
            if let Some(ref t) = meta.title {
                println!("Title:        {}", t);
            }
            if let Some(ref a) = meta.author {
                println!("Author:       {}", a);
            }
            if let Some(ref s) = meta.subject {
                println!("Subject:      {}", s);
            }
            println!("Pages:        {}", meta.page_count);
            println!("PDF Version:  {}", meta.pdf_version);
            if let Some(ref p) = meta.producer {
                println!("Producer:     {}", p);
            }
            if let Some(ref c) = meta.creator {
                println!("Creator:      {}", c);
            }
        }
        return Ok(());
    }

    let output_dir = cli
        .output_dir
        .clone()
        .expect("clap enforces output_dir unless --inspect-only");

    // ── Build config ─────────────────────────────────────────────────────
    let progress_cb: Option<ProgressCallback> = if show_progress {
        let cb = CliProgressCallback::new_dynamic();
        Some(cb as Arc<dyn ExtractionProgressCallback>)
    } else {
        None
    };

    let config = build_config(&cli, progress_cb)?;

    // ── Run extraction ───────────────────────────────────────────────────
    let output = extract(&cli.input, &output_dir, &config)
        .await
        .context("Extraction failed")?;

    if cli.json {
        let json = serde_json::to_string_pretty(&output).context("Failed to serialise output")?;
        println!("{json}");
    }

    // An empty result leaves nothing to crop; exit non-zero so the operator
    // looks at the source document instead of an empty directory.
    if output.files.is_empty() {
        if !cli.quiet {
            eprintln!("{} No pages extracted from {}", red("✘"), cli.input);
        }
        std::process::exit(1);
    }

    if !cli.quiet && !cli.json {
        eprintln!(
            "{}  {} images  {}ms  →  {}",
            green("✔"),
            output.stats.written_pages,
            output.stats.total_duration_ms,
            bold(&output_dir.display().to_string()),
        );
        eprintln!(
            "   {} render  /  {} encode+write",
            dim(&format!("{}ms", output.stats.render_duration_ms)),
            dim(&format!("{}ms", output.stats.persist_duration_ms)),
        );
    }

    Ok(())
}

/// Map CLI args to `ExtractConfig`.
fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<ExtractConfig> {
    let pages = parse_pages(&cli.pages)?;

    let mut builder = ExtractConfig::builder()
        .dpi(cli.dpi)
        .prefix(cli.prefix.clone())
        .pad_width(cli.pad)
        .pages(pages)
        .concurrency(cli.concurrency)
        .download_timeout_secs(cli.download_timeout);

    if let Some(ref pwd) = cli.password {
        builder = builder.password(pwd.clone());
    }
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}

/// Parse `--pages` string into `PageSelection`.
fn parse_pages(s: &str) -> Result<PageSelection> {
    let s = s.trim().to_lowercase();

    if s == "all" {
        return Ok(PageSelection::All);
    }

    // Range: "3-15"
    if let Some((start, end)) = s.split_once('-') {
        let start: usize = start
            .trim()
            .parse()
            .context("Invalid start page in range")?;
        let end: usize = end.trim().parse().context("Invalid end page in range")?;

        if start < 1 {
            anyhow::bail!("Pages are 1-indexed, minimum is 1 (got {})", start);
        }
        if start > end {
            anyhow::bail!(
                "Invalid page range '{}-{}': start must be <= end",
                start,
                end
            );
        }

        return Ok(PageSelection::Range(start, end));
    }

    // Set: "1,3,5,7"
    if s.contains(',') {
        let pages: Vec<usize> = s
            .split(',')
            .map(|p| {
                p.trim()
                    .parse::<usize>()
                    .context(format!("Invalid page number: '{}'", p.trim()))
            })
            .collect::<Result<Vec<_>>>()?;

        for &p in &pages {
            if p < 1 {
                anyhow::bail!("Pages are 1-indexed, minimum is 1 (got {})", p);
            }
        }

        return Ok(PageSelection::Set(pages));
    }

    // Single page: "5"
    let page: usize = s.parse().context("Invalid page number")?;
    if page < 1 {
        anyhow::bail!("Pages are 1-indexed, minimum is 1 (got {})", page);
    }

    Ok(PageSelection::Single(page))
}
