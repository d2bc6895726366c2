//! CLI binary for doc-wordcloud.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `CloudConfig`, prints the word table and writes the export.

use anyhow::{Context, Result};
use clap::Parser;
use doc_wordcloud::{
    CloudConfig, CloudResponse, ExportFormat, PipelineProgressCallback, ProgressCallback, Rgb,
    Stage, WordCloudSession,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
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

/// Terminal progress callback: a spinner showing the running stage, plus one
/// log line per finished stage.
struct CliProgressCallback {
    bar: ProgressBar,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);
        bar.set_style(style);
        bar.set_prefix("Preparing");
        bar.enable_steady_tick(Duration::from_millis(80));
        Arc::new(Self { bar })
    }

    fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl PipelineProgressCallback for CliProgressCallback {
    fn on_stage_start(&self, stage: Stage) {
        self.bar.set_prefix(stage.label());
        self.bar.set_message("…");
    }

    fn on_stage_complete(&self, stage: Stage, detail: &str) {
        self.bar.println(format!(
            "  {} {:<20} {}",
            green("✓"),
            stage.label(),
            dim(detail)
        ));
    }

    fn on_stage_error(&self, stage: Stage, error: &str) {
        // first line only; the full message is printed once the run ends
        let first = error.lines().next().unwrap_or(error);
        self.bar
            .println(format!("  {} {:<20} {}", red("✗"), stage.label(), red(first)));
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Cloud of a text file, saved as wordcloud.png
  wordcloud speech.txt

  # Vector output at print resolution
  wordcloud --format svg --dpi 300 report.pdf

  # Drop extra words, write to a custom path
  wordcloud --extra-stopwords said,mr,mrs novel.docx -o novel-cloud.png

  # Keep every word (standard stopword list off)
  wordcloud --no-stopwords lyrics.txt

  # Word table only, top 25 rows
  wordcloud --no-export --top 25 minutes.docx

  # HTML download link instead of a file
  wordcloud --link --format pdf notes.txt > link.html

  # Everything as JSON
  wordcloud --json --no-export paper.pdf > cloud.json

SUPPORTED INPUT:
  .txt   UTF-8 plain text
  .pdf   text layer of every page (scanned images carry no text)
  .docx  body paragraphs of a Word document

EXPORT FORMATS:
  png, jpg   bitmap, 10×6 in canvas at --dpi
  svg        bitmap at --dpi embedded in an SVG, width/height scaled by --dpi
  pdf        canvas-sized page, embedded bitmap at --dpi

FONTS:
  The bundled font covers Latin text. Pass --font with a TTF/OTF file
  for other scripts (Cyrillic, Greek, CJK, ...).

ENVIRONMENT VARIABLES:
  PDFIUM_LIB_PATH    Path to libpdfium (file or directory)
  PDFIUM_CACHE_DIR   Extra directory searched for libpdfium
  RUST_LOG           Log filter, e.g. doc_wordcloud=debug
  WORDCLOUD_*        Fallback for every flag, e.g. WORDCLOUD_FORMAT=svg
"#;

/// Generate a word cloud from a text, PDF or Word document.
#[derive(Parser, Debug)]
#[command(
    name = "wordcloud",
    version,
    about = "Generate a word cloud from a .txt, .pdf or .docx document",
    long_about = "Extract the text of a plain-text, PDF or Word document, remove common \
English stopwords, count the remaining words and lay them out as a word cloud. \
The cloud can be exported as PNG, JPG, SVG or PDF.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Document to read (.txt, .pdf or .docx).
    input: PathBuf,

    /// Keep the standard English stopwords (only --extra-stopwords are removed).
    #[arg(long, env = "WORDCLOUD_NO_STOPWORDS")]
    no_stopwords: bool,

    /// Extra words to remove, comma-separated (case-insensitive).
    #[arg(long, env = "WORDCLOUD_EXTRA_STOPWORDS", value_delimiter = ',')]
    extra_stopwords: Vec<String>,

    /// Export format.
    #[arg(long, env = "WORDCLOUD_FORMAT", value_enum, default_value = "png")]
    format: FormatArg,

    /// Export resolution in DPI (50–300).
    #[arg(long, env = "WORDCLOUD_DPI", default_value_t = 100,
          value_parser = clap::value_parser!(u32).range(50..=300))]
    dpi: u32,

    /// Write the export here instead of ./wordcloud.<format>.
    #[arg(short, long, env = "WORDCLOUD_OUTPUT")]
    output: Option<PathBuf>,

    /// Skip the export step.
    #[arg(long, env = "WORDCLOUD_NO_EXPORT")]
    no_export: bool,

    /// Print an HTML download link (base64 data URI) instead of writing a file.
    #[arg(long, env = "WORDCLOUD_LINK", conflicts_with = "output")]
    link: bool,

    /// Print the word table in order of first occurrence.
    #[arg(long, env = "WORDCLOUD_TABLE")]
    table: bool,

    /// Print only the N most frequent rows of the word table.
    #[arg(long, env = "WORDCLOUD_TOP")]
    top: Option<usize>,

    /// Print the whole response as JSON.
    #[arg(long, env = "WORDCLOUD_JSON")]
    json: bool,

    /// Most words drawn on the canvas.
    #[arg(long, env = "WORDCLOUD_MAX_WORDS", default_value_t = 200)]
    max_words: usize,

    /// Canvas width in points (1/72 in).
    #[arg(long, env = "WORDCLOUD_WIDTH", default_value_t = 720.0)]
    width: f32,

    /// Canvas height in points (1/72 in).
    #[arg(long, env = "WORDCLOUD_HEIGHT", default_value_t = 432.0)]
    height: f32,

    /// Background colour: #rrggbb, #rgb, black or white.
    #[arg(long, env = "WORDCLOUD_BACKGROUND", default_value = "black")]
    background: Rgb,

    /// TrueType/OpenType font used to draw the words.
    #[arg(long, env = "WORDCLOUD_FONT")]
    font: Option<PathBuf>,

    /// Layout seed; the same seed and input give the same picture.
    #[arg(long, env = "WORDCLOUD_SEED", default_value_t = 0)]
    seed: u64,

    /// Disable the progress spinner.
    #[arg(long, env = "WORDCLOUD_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "WORDCLOUD_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors and requested results.
    #[arg(short, long, env = "WORDCLOUD_QUIET")]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum FormatArg {
    Png,
    #[value(alias = "jpeg")]
    Jpg,
    Svg,
    Pdf,
}

impl From<FormatArg> for ExportFormat {
    fn from(v: FormatArg) -> Self {
        match v {
            FormatArg::Png => ExportFormat::Png,
            FormatArg::Jpg => ExportFormat::Jpg,
            FormatArg::Svg => ExportFormat::Svg,
            FormatArg::Pdf => ExportFormat::Pdf,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The spinner gives all the feedback that matters, so INFO logs are
    // suppressed while it is shown.
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

    // ── Build config ─────────────────────────────────────────────────────
    let progress = show_progress.then(CliProgressCallback::new);
    let config = build_config(
        &cli,
        progress.clone().map(|cb| cb as ProgressCallback),
    )?;
    let session = WordCloudSession::new(config);

    // ── Run request ──────────────────────────────────────────────────────
    let result = session
        .handle_path(&cli.input)
        .with_context(|| format!("Failed to build a word cloud from {}", cli.input.display()));
    let response = match result {
        Ok(r) => r,
        Err(e) => {
            if let Some(cb) = &progress {
                cb.finish();
            }
            return Err(e);
        }
    };

    // ── Export ───────────────────────────────────────────────────────────
    let exported = match (&response.image, cli.no_export) {
        (Some(image), false) if cli.link => Some(Export::Link(
            session
                .export(image)
                .map(|f| f.download_link())
                .context("Export failed"),
        )),
        (Some(image), false) => {
            let path = cli
                .output
                .clone()
                .unwrap_or_else(|| PathBuf::from(session.config().export_format.file_name()));
            Some(Export::File(
                session
                    .export_to_file(image, &path)
                    .map(|f| (path, f.bytes.len()))
                    .context("Export failed"),
            ))
        }
        _ => None,
    };
    if let Some(cb) = &progress {
        cb.finish();
    }

    // ── Report ───────────────────────────────────────────────────────────
    if cli.json {
        let json =
            serde_json::to_string_pretty(&response).context("Failed to serialise response")?;
        println!("{json}");
    } else {
        if !cli.quiet {
            print_details(&response);
        }
        if cli.table || cli.top.is_some() {
            print_table(&response, cli.top).context("Failed to write to stdout")?;
        }
    }

    match exported {
        Some(Export::Link(link)) => println!("{}", link?),
        Some(Export::File(written)) => {
            let (path, size) = written?;
            if !cli.quiet {
                eprintln!(
                    "{}  {} words  →  {}  {}",
                    green("✔"),
                    response.stats.cloud_words,
                    bold(&path.display().to_string()),
                    dim(&format!("{size} bytes")),
                );
            }
        }
        None => {}
    }

    if let Some(msg) = &response.render_error {
        anyhow::bail!("{msg}");
    }
    Ok(())
}

enum Export {
    Link(Result<String>),
    File(Result<(PathBuf, usize)>),
}

/// Map CLI args to `CloudConfig`.
fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<CloudConfig> {
    let mut builder = CloudConfig::builder()
        .use_standard_stopwords(!cli.no_stopwords)
        .extra_stopwords(cli.extra_stopwords.iter().map(String::as_str))
        .export_format(cli.format.into())
        .dpi(cli.dpi)
        .canvas_size(cli.width, cli.height)
        .background(cli.background)
        .max_words(cli.max_words)
        .seed(cli.seed);

    if let Some(font) = &cli.font {
        builder = builder.font_path(font.clone());
    }
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}

fn print_details(response: &CloudResponse) {
    let d = &response.details;
    let file_type = if d.file_type.is_empty() {
        "unknown type"
    } else {
        d.file_type.as_str()
    };
    eprintln!(
        "{} {}  {}  {}",
        cyan("◆"),
        bold(&d.file_name),
        dim(file_type),
        dim(&format!("{} bytes", d.file_size)),
    );
    eprintln!(
        "   {} tokens, {} kept after stopwords, {} distinct",
        response.stats.total_tokens, response.stats.kept_tokens, response.stats.distinct_words
    );
    if let Some(err) = &response.render_error {
        eprintln!("{} {}", red("✘"), red(err));
    }
}

fn print_table(response: &CloudResponse, top: Option<usize>) -> io::Result<()> {
    let rows: Vec<(String, usize)> = match top {
        Some(n) => response.top_words(n),
        None => response
            .word_counts
            .rows()
            .iter()
            .map(|r| (r.word.clone(), r.count))
            .collect(),
    };
    let width = rows
        .iter()
        .map(|(w, _)| w.chars().count())
        .max()
        .unwrap_or(4)
        .max(4);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    writeln!(out, "{:<width$}  {:>5}", "word", "count")?;
    for (word, count) in rows {
        writeln!(out, "{word:<width$}  {count:>5}")?;
    }
    Ok(())
}
