//! file-chewer command line
//!
//! ```bash
//! # Which extractor would handle this file?
//! file-chewer classify report.bin --media-type application/pdf
//!
//! # Extracted text with OCR outcome
//! file-chewer extract scan.pdf
//!
//! # Chunks ready for embedding
//! file-chewer chunk notes.docx --chunk-size 256 --overlap 2
//! ```
//!
//! Output is JSON on stdout; logs go to stderr (`RUST_LOG` overrides the
//! default `file_chewer=info`).

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use file_chewer::{ChewerConfig, ChunkManager, ExtractionOrchestrator, IngestPipeline, SourceDocument};

#[derive(Parser)]
#[command(name = "file-chewer")]
#[command(about = "Extract and chunk text from documents for RAG ingestion")]
#[command(version)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Disable the PDF OCR fallback
    #[arg(long, global = true)]
    no_ocr: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Report the format a file would be routed to
    Classify {
        file: PathBuf,

        /// Declared media type, checked before the extension
        #[arg(short, long)]
        media_type: Option<String>,
    },

    /// Extract normalized text
    Extract {
        file: PathBuf,

        #[arg(short, long)]
        media_type: Option<String>,
    },

    /// Extract and split into overlapping chunks
    Chunk {
        file: PathBuf,

        #[arg(short, long)]
        media_type: Option<String>,

        /// Size budget in characters
        #[arg(long)]
        chunk_size: Option<usize>,

        /// Sentences carried into the next chunk
        #[arg(long)]
        overlap: Option<usize>,
    },
}

#[derive(Serialize)]
struct ClassifyOutput<'a> {
    filename: &'a str,
    media_type: Option<&'a str>,
    format: file_chewer::FormatKind,
    supported: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "file_chewer=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let mut config = load_config(cli.config.as_deref())?;
    if cli.no_ocr {
        config.ocr.enabled = false;
    }

    match cli.command {
        Commands::Classify { file, media_type } => {
            let orchestrator = ExtractionOrchestrator::from_config(&config);
            let filename = file_name(&file);
            let format = orchestrator.classify(&filename, media_type.as_deref());
            print_json(&ClassifyOutput {
                filename: &filename,
                media_type: media_type.as_deref(),
                format,
                supported: format.is_supported(),
            })?;
        }
        Commands::Extract { file, media_type } => {
            let source = read_source(&file, media_type)?;
            let extraction = ExtractionOrchestrator::from_config(&config)
                .extract(&source)
                .with_context(|| format!("Failed to extract {}", file.display()))?;
            print_json(&extraction)?;
        }
        Commands::Chunk {
            file,
            media_type,
            chunk_size,
            overlap,
        } => {
            if let Some(size) = chunk_size {
                config.chunking.chunk_size = size;
            }
            if let Some(overlap) = overlap {
                config.chunking.overlap = overlap;
            }
            config.validate()?;

            let source = read_source(&file, media_type)?;
            let pipeline = IngestPipeline::new(
                std::sync::Arc::new(ExtractionOrchestrator::from_config(&config)),
                ChunkManager::from_config(&config.chunking),
            );
            let document = pipeline
                .ingest(&source)
                .with_context(|| format!("Failed to chunk {}", file.display()))?;
            print_json(&document)?;
        }
    }

    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<ChewerConfig> {
    let config = match path {
        Some(path) => ChewerConfig::from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => ChewerConfig::default(),
    };
    let config = config.apply_env()?;
    tracing::debug!(
        chunk_size = config.chunking.chunk_size,
        overlap = config.chunking.overlap,
        ocr = config.ocr.enabled,
        "Configuration loaded"
    );
    Ok(config)
}

fn read_source(path: &Path, media_type: Option<String>) -> Result<SourceDocument> {
    let source = SourceDocument::from_path(path)?;
    Ok(match media_type {
        Some(media_type) => source.with_media_type(media_type),
        None => source,
    })
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
