//! textdrop - Pick text files, preview them, and save them as `.txt` downloads.
//!
//! Usage:
//!   textdrop [FILES]...            Launch interactive TUI
//!   textdrop convert FILES...      Write arquivo_<name>.txt for each text file
//!   textdrop preview FILE          Print the preview of one file
//!   textdrop --help                Show help

mod logging;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use color_eyre::eyre::{Context, Result, bail};
use itertools::Itertools;
use serde::Serialize;

use textdrop_core::{BatchNotice, BlobStore, Locale, format_kib};
use textdrop_export::{ConflictResolution, SaveOutcome, save_all};
use textdrop_ingest::{BatchReport, Importer, select_paths};
use textdrop_tui::{TuiConfig, UserSettings};

use crate::logging::LogTarget;

#[derive(Parser)]
#[command(
    name = "textdrop",
    version,
    about = "Preview text files and export them as .txt downloads",
    long_about = "textdrop loads text files, shows the first lines of each one, and \
                  saves a copy named arquivo_<name>.txt.\n\n\
                  Launch the interactive TUI by running `textdrop [FILES]...`, or use \
                  subcommands for scripted conversions."
)]
struct Cli {
    /// Files to load on startup
    files: Vec<PathBuf>,

    /// Directory downloads are saved to
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Language of labels and notices (pt or en)
    #[arg(long, global = true)]
    lang: Option<Locale>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Convert text files into arquivo_<name>.txt downloads
    Convert {
        /// Files to convert
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Output directory (defaults to the settings value or ".")
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,

        /// Number of preview lines to report per file
        #[arg(long)]
        lines: Option<usize>,

        /// What to do when a download already exists (skip, overwrite, rename)
        #[arg(long)]
        on_conflict: Option<ConflictResolution>,
    },

    /// Print the preview of a text file
    Preview {
        /// File to preview
        file: PathBuf,

        /// Number of lines to show
        #[arg(long)]
        lines: Option<usize>,

        /// Print the whole content instead of the preview
        #[arg(long)]
        full: bool,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    let mut settings = UserSettings::load();
    if let Some(lang) = cli.lang {
        settings.locale = lang;
    }

    match cli.command {
        Some(Command::Convert {
            files,
            output,
            format,
            lines,
            on_conflict,
        }) => {
            logging::init(LogTarget::Stderr)?;
            if let Some(output) = output {
                settings.output_dir = Some(output);
            }
            if let Some(lines) = lines {
                settings.preview_lines = lines;
            }
            if let Some(resolution) = on_conflict {
                settings.conflict = resolution;
            }
            run_convert(&files, &settings, format)?;
        }
        Some(Command::Preview { file, lines, full }) => {
            logging::init(LogTarget::Stderr)?;
            if let Some(lines) = lines {
                settings.preview_lines = lines;
            }
            run_preview(&file, &settings, full)?;
        }
        None => {
            // Launch TUI
            let log_path = logging::init(LogTarget::File)?;
            tracing::info!(log = ?log_path, files = cli.files.len(), "starting tui");
            if let Some(output) = cli.output {
                settings.output_dir = Some(output);
            }
            textdrop_tui::run(TuiConfig {
                files: cli.files,
                settings,
                persist_settings: true,
            })?;
        }
    }

    Ok(())
}

/// Per-file result of a conversion.
#[derive(Debug, Serialize)]
struct ConvertedFile {
    name: String,
    size: u64,
    lines: usize,
    truncated: bool,
    download: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<PathBuf>,
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// A selected file that did not produce a download.
#[derive(Debug, Serialize)]
struct SkippedFile {
    name: String,
    reason: String,
}

/// Summary printed by `convert`.
#[derive(Debug, Serialize)]
struct ConvertSummary {
    selected: usize,
    accepted: usize,
    converted: Vec<ConvertedFile>,
    ignored: Vec<SkippedFile>,
    unreadable: Vec<SkippedFile>,
    notice: BatchNotice,
    message: String,
    output_dir: PathBuf,
    elapsed_ms: u128,
}

/// Decode a batch on a fresh runtime.
fn import_batch(
    files: &[PathBuf],
    settings: &UserSettings,
) -> Result<(tokio::runtime::Runtime, BlobStore, BatchReport)> {
    let config = settings.import_config().context("Invalid settings")?;
    let batch = select_paths(files, &config).context("Invalid selection")?;

    let rt = tokio::runtime::Runtime::new()?;
    let store = BlobStore::new();
    let importer = Importer::new(config, store.clone());
    let report = rt.block_on(importer.import(batch));
    Ok((rt, store, report))
}

/// Convert files and save their downloads.
fn run_convert(files: &[PathBuf], settings: &UserSettings, format: OutputFormat) -> Result<()> {
    let (rt, store, report) = import_batch(files, settings)?;
    let decoded_bytes = report.decoded_bytes();
    let output_dir = settings.output_dir();
    let outcomes = rt.block_on(save_all(
        &report.views,
        &store,
        &output_dir,
        settings.conflict,
    ));

    let converted = report
        .views
        .iter()
        .zip(outcomes)
        .map(|(view, (_, outcome))| {
            let (path, status, error) = match outcome {
                Ok(SaveOutcome::Saved { path, .. }) => (Some(path), "saved", None),
                Ok(SaveOutcome::Skipped { path }) => (Some(path), "skipped", None),
                Err(err) => (None, "failed", Some(err.to_string())),
            };
            ConvertedFile {
                name: view.name.to_string(),
                size: view.size,
                lines: view.preview.split('\n').count(),
                truncated: view.is_truncated(),
                download: view.download_name.clone(),
                path,
                status,
                error,
            }
        })
        .collect();

    let summary = ConvertSummary {
        selected: report.selected,
        accepted: report.accepted(),
        converted,
        ignored: report
            .rejected
            .iter()
            .map(|file| SkippedFile {
                name: file.name.to_string(),
                reason: format!("type {} is not text", file.mime),
            })
            .collect(),
        unreadable: report
            .failed
            .iter()
            .map(|err| SkippedFile {
                name: err.name().to_string(),
                reason: err.to_string(),
            })
            .collect(),
        message: report.notice.message(settings.locale),
        notice: report.notice,
        output_dir,
        elapsed_ms: report.elapsed.as_millis(),
    };

    match format {
        OutputFormat::Text => print_convert_summary(&summary, decoded_bytes),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
    }

    Ok(())
}

fn print_convert_summary(summary: &ConvertSummary, decoded_bytes: u64) {
    println!();
    println!("{}", "─".repeat(60));
    println!(" {}", summary.output_dir.display());
    println!("{}", "─".repeat(60));
    println!();

    for file in &summary.converted {
        let size = format_kib(file.size);
        match (&file.path, &file.error) {
            (Some(path), _) if file.status == "saved" => {
                println!(" {} - {size} -> {}", file.name, display_relative(path));
            }
            (Some(path), _) => {
                println!(" {} - {size} (exists, skipped) {}", file.name, display_relative(path));
            }
            (None, error) => {
                println!(
                    " {} - {size} failed: {}",
                    file.name,
                    error.as_deref().unwrap_or("unknown error")
                );
            }
        }
    }

    if !summary.ignored.is_empty() {
        println!();
        println!(
            " Ignored: {}",
            summary.ignored.iter().map(|f| f.name.as_str()).join(", ")
        );
    }

    println!();
    println!(
        " {} of {} files converted ({}) in {}ms",
        summary
            .converted
            .iter()
            .filter(|f| f.status == "saved")
            .count(),
        summary.selected,
        format_size(decoded_bytes),
        summary.elapsed_ms
    );

    if !summary.message.is_empty() {
        println!(" {}", summary.message);
    }
}

/// Print the preview (or full content) of one file.
fn run_preview(file: &Path, settings: &UserSettings, full: bool) -> Result<()> {
    let (_rt, _store, report) = import_batch(&[file.to_path_buf()], settings)?;

    if let Some(err) = report.failed.first() {
        bail!("{err}");
    }
    let Some(view) = report.views.first() else {
        bail!("{}", report.notice.message(settings.locale));
    };

    let labels = settings.locale.labels();
    eprintln!("{} - {}", view.name, view.display_size());
    if full {
        println!("{}", view.content);
    } else {
        println!("{}", view.preview);
        let hidden = hidden_lines(&view.content, &view.preview);
        if hidden > 0 {
            eprintln!("… {hidden} more lines ({} with --full)", labels.show_more);
        }
    }
    eprintln!("{}: {}", labels.download, view.download_name);

    Ok(())
}

/// Lines of `content` not shown by `preview`, ignoring a trailing newline.
fn hidden_lines(content: &str, preview: &str) -> usize {
    content.lines().count().saturating_sub(preview.lines().count())
}

fn display_relative(path: &Path) -> String {
    path.strip_prefix(".")
        .unwrap_or(path)
        .display()
        .to_string()
}

/// Format a byte size in human-readable form.
fn format_size(bytes: u64) -> String {
    humansize::format_size(bytes, humansize::BINARY)
}
