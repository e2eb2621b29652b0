//! # flatext CLI
//!
//! Command-line front end for flatext: hand it a file and it prints the
//! file's text as one flat string.
//!
//! ## Commands
//!
//! - `flatext extract <FILE>` - Extract text from a file (`-` reads stdin)
//! - `flatext formats` - List recognized file extensions
//! - `flatext config show|init|path` - Inspect configuration
//!
//! ## Examples
//!
//! ```bash
//! # Extract a Word document
//! flatext extract letter.docx
//!
//! # Pipe a spreadsheet through stdin
//! cat book.xlsx | flatext extract - --name book.xlsx
//!
//! # Get JSON output
//! flatext extract deck.pptx --format json
//! ```
//!
//! Exit status is 0 on success, 2 when no file was given or its type is not
//! supported, and 1 for any other failure.
//!
//! Image text needs Tesseract: build with `--features ocr`. Without it, image
//! files are recognized but fail with a processing error, and `formats` says
//! so.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use flatext_core::{ExtractError, FormatKind, Upload};
use flatext_extract::{ExtractorRegistry, ocr_enabled};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::str::FromStr;
use tokio::io::AsyncReadExt;
use tracing::{Level, debug, info};
use tracing_subscriber::FmtSubscriber;

mod config;

use config::{Config, LimitsConfig};

#[derive(Parser)]
#[command(name = "flatext")]
#[command(about = "Extract plain text from documents, images and data files")]
#[command(version)]
struct Cli {
    /// Path to config file (default: ~/.config/flatext/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format (text, json)
    #[arg(short, long, global = true, default_value = "text")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract text from a file
    Extract {
        /// File to extract; `-` reads stdin
        file: Option<PathBuf>,

        /// Filename used to pick the format (default: FILE's name)
        #[arg(short, long)]
        name: Option<String>,
    },

    /// List recognized file extensions
    Formats,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show current configuration
    Show,
    /// Print sample configuration file
    Init,
    /// Show config file path
    Path,
}

/// Output structure for a successful extraction.
#[derive(Serialize)]
struct ExtractOutput<'a> {
    filename: &'a str,
    kind: FormatKind,
    text: &'a str,
}

/// Output structure for a failed extraction.
#[derive(Serialize)]
struct ErrorOutput {
    error: String,
    kind: &'static str,
}

/// Output structure for one recognized format.
#[derive(Serialize)]
struct FormatOutput {
    kind: FormatKind,
    extensions: &'static [&'static str],
    #[serde(skip_serializing_if = "Option::is_none")]
    note: Option<&'static str>,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let config = if let Some(ref path) = cli.config {
        Config::load_from(Some(path.clone()))
            .context(format!("Failed to load config from {}", path.display()))?
    } else {
        Config::load().context("Failed to load config")?
    };

    // Setup logging; stdout is reserved for extracted text
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::from_str(&config.logging.level).unwrap_or(Level::INFO)
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;

    match cli.command {
        Commands::Extract { file, name } => {
            let registry = ExtractorRegistry::with_defaults(&config.extract_config());
            let upload = match file {
                Some(path) => Some(read_upload(&path, name, &config.limits).await?),
                None => None,
            };

            let filename = upload
                .as_ref()
                .map(|upload| upload.filename.clone())
                .unwrap_or_default();
            let result = match upload {
                Some(upload) => {
                    info!("Extracting {} ({} bytes)", upload.filename, upload.len());
                    registry
                        .extract_async(upload.content, upload.filename)
                        .await
                }
                None => registry.extract_upload(None),
            };

            return render_extraction(&filename, result, cli.format);
        }

        Commands::Formats => {
            let registry = ExtractorRegistry::with_defaults(&config.extract_config());
            match cli.format {
                OutputFormat::Json => {
                    let formats: Vec<FormatOutput> = registry
                        .kinds()
                        .into_iter()
                        .map(|kind| FormatOutput {
                            kind,
                            extensions: kind.extensions(),
                            note: format_note(kind, ocr_enabled()),
                        })
                        .collect();
                    println!("{}", serde_json::to_string_pretty(&formats)?);
                }
                OutputFormat::Text => {
                    for kind in registry.kinds() {
                        let extensions: Vec<String> =
                            kind.extensions().iter().map(|ext| format!(".{ext}")).collect();
                        match format_note(kind, ocr_enabled()) {
                            Some(note) => {
                                println!("{:<12} {} ({note})", kind.name(), extensions.join(", "));
                            }
                            None => println!("{:<12} {}", kind.name(), extensions.join(", ")),
                        }
                    }
                }
            }
        }

        Commands::Config { action } => match action {
            ConfigAction::Show => match cli.format {
                OutputFormat::Json => {
                    println!(
                        "{}",
                        serde_json::to_string_pretty(&config)
                            .context("Failed to serialize config")?
                    );
                }
                OutputFormat::Text => {
                    println!(
                        "{}",
                        toml::to_string_pretty(&config).context("Failed to serialize config")?
                    );
                }
            },
            ConfigAction::Init => {
                println!("{}", Config::sample_toml());
            }
            ConfigAction::Path => {
                if let Some(path) = Config::config_path() {
                    println!("{}", path.display());
                } else {
                    println!("Could not determine config directory");
                }
            }
        },
    }

    Ok(ExitCode::SUCCESS)
}

/// Read a file (or stdin for `-`) into an upload, enforcing the size limit.
async fn read_upload(path: &Path, name: Option<String>, limits: &LimitsConfig) -> Result<Upload> {
    let content = if path == Path::new("-") {
        let mut content = Vec::new();
        tokio::io::stdin()
            .read_to_end(&mut content)
            .await
            .context("Failed to read stdin")?;
        content
    } else {
        let metadata = tokio::fs::metadata(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        check_size(metadata.len(), limits)?;
        tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?
    };
    check_size(u64::try_from(content.len()).unwrap_or(u64::MAX), limits)?;

    let filename = dispatch_name(path, name)?;
    debug!("Read {} bytes for {}", content.len(), filename);
    Ok(Upload::new(content, filename))
}

fn check_size(size: u64, limits: &LimitsConfig) -> Result<()> {
    if limits.exceeds(size) {
        anyhow::bail!(
            "File is {} bytes, over the {} byte limit (limits.max_file_size)",
            size,
            limits.max_file_size
        );
    }
    Ok(())
}

/// The filename the extractor dispatches on: `--name`, else the path's file name.
fn dispatch_name(path: &Path, name: Option<String>) -> Result<String> {
    if let Some(name) = name {
        return Ok(name);
    }
    if path == Path::new("-") {
        anyhow::bail!("--name is required when reading from stdin");
    }
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .with_context(|| format!("{} has no file name", path.display()))
}

/// Caveat shown next to a format in `formats` output.
fn format_note(kind: FormatKind, ocr: bool) -> Option<&'static str> {
    (kind == FormatKind::Image && !ocr).then_some("needs a build with `--features ocr`")
}

/// Exit status for an extraction failure.
fn exit_status(err: &ExtractError) -> u8 {
    if err.is_client_error() { 2 } else { 1 }
}

fn render_extraction(
    filename: &str,
    result: Result<String, ExtractError>,
    format: OutputFormat,
) -> Result<ExitCode> {
    match (result, format) {
        (Ok(text), OutputFormat::Text) => {
            println!("{text}");
            Ok(ExitCode::SUCCESS)
        }
        (Ok(text), OutputFormat::Json) => {
            let output = ExtractOutput {
                filename,
                kind: FormatKind::from_filename(filename),
                text: &text,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
            Ok(ExitCode::SUCCESS)
        }
        (Err(err), OutputFormat::Text) => {
            eprintln!("Error: {err}");
            Ok(ExitCode::from(exit_status(&err)))
        }
        (Err(err), OutputFormat::Json) => {
            let output = ErrorOutput {
                error: err.to_string(),
                kind: err.kind(),
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
            Ok(ExitCode::from(exit_status(&err)))
        }
    }
}
