//! pagectl - command-line access to site pages
//!
//! # Commands
//! - `pagectl get <key>` - Print a page's block sequence
//! - `pagectl push <key> <file>` - Replace a page with a JSON block array and save it
//! - `pagectl render <key> --width <px>` - Render a page to HTML (or JSON with `--json`)
//! - `pagectl validate <file>` - Check a JSON block array
//! - `pagectl upload <file>` - Upload a video or audio file and print its URL
//! - `pagectl blocks` - List the block catalog

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

use page_blocks::core::{PageValidationResult, PageValidator};
use page_blocks::render::html;
use page_blocks::store::{
    ContentApi, FileBackup, HttpContentApi, MediaFile, MemoryContentApi, PageStore, Uploader,
};
use page_blocks::{Block, BlockCatalog, ClientConfig, PageBuilder, PageKey, Renderer, SaveStatus};

/// Site page content tool
#[derive(Parser)]
#[command(name = "pagectl")]
#[command(author, version, about = "Inspect, render and publish block-based site pages")]
struct Cli {
    /// Content API base URL (overrides PAGES_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Work against an empty in-memory store instead of the content API
    #[arg(long, global = true)]
    offline: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print a page's block sequence as JSON
    Get {
        /// Page key (home, prices, media, ...)
        key: String,
    },

    /// Replace a page with the blocks in a JSON file and save it
    Push {
        key: String,

        /// JSON array of blocks
        file: PathBuf,
    },

    /// Render a page
    Render {
        key: String,

        /// Container width in pixels
        #[arg(short, long, default_value = "970")]
        width: f64,

        /// Print the render tree as JSON instead of HTML
        #[arg(long)]
        json: bool,
    },

    /// Validate a JSON array of blocks
    Validate { file: PathBuf },

    /// Upload a video or audio file
    Upload { file: PathBuf },

    /// List insertable block kinds
    Blocks,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,page_blocks=debug")),
        )
        .init();

    let cli = Cli::parse();
    let mut config = ClientConfig::from_env();
    if let Some(url) = cli.api_url.clone() {
        config = config.with_api_url(url);
    }

    if cli.offline {
        info!("offline mode, using in-memory store");
        run(cli.command, MemoryContentApi::new(), &config).await
    } else {
        let api = HttpContentApi::new(&config).context("Failed to build HTTP client")?;
        info!(api = %api.base_url(), "using content API");
        run(cli.command, api, &config).await
    }
}

async fn run<A>(command: Commands, api: A, config: &ClientConfig) -> Result<()>
where
    A: ContentApi + Uploader + 'static,
{
    match command {
        Commands::Get { key } => {
            let loaded = PageStore::new(api).load(&PageKey::from(key.as_str())).await;
            info!(source = ?loaded.source, "page loaded");
            println!("{}", serde_json::to_string_pretty(&loaded.blocks)?);
        }

        Commands::Push { key, file } => {
            let blocks = read_blocks(&file).await?;
            print_report(&PageValidator::validate(&blocks));

            let mut builder = PageBuilder::new(api);
            if let Some(path) = &config.backup_path {
                builder = builder.with_backup(FileBackup::new(path.clone()));
            }
            builder.select(PageKey::from(key.as_str())).await;
            builder.replace_blocks(blocks);

            if let Err(e) = builder.save().await {
                if let SaveStatus::Failed { detail } = builder.status() {
                    eprintln!("{}", detail);
                }
                return Err(e).context("Save failed");
            }
            println!("{} ({} blocks)", builder.status().label(), builder.blocks().len());
        }

        Commands::Render { key, width, json } => {
            let loaded = PageStore::new(api).load(&PageKey::from(key.as_str())).await;
            let page = Renderer::render(&loaded.blocks, width);
            if json {
                println!("{}", serde_json::to_string_pretty(&page)?);
            } else {
                println!("{}", html::to_html(&page));
            }
        }

        Commands::Validate { file } => {
            let blocks = read_blocks(&file).await?;
            let report = PageValidator::validate(&blocks);
            print_report(&report);
            if !report.valid {
                bail!("{} has {} error(s)", file.display(), report.errors.len());
            }
            println!("OK ({} blocks)", blocks.len());
        }

        Commands::Upload { file } => {
            let bytes = tokio::fs::read(&file)
                .await
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let file_name = file
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "upload".to_string());
            let content_type = MediaFile::guess_content_type(&file_name);
            let url = api
                .upload(MediaFile::new(file_name, content_type, bytes))
                .await
                .context("Upload failed")?;
            println!("{}", url);
        }

        Commands::Blocks => {
            for entry in BlockCatalog::standard().entries() {
                println!("{:<12} {:<11} {}", entry.block_type, entry.name, entry.description);
            }
        }
    }

    Ok(())
}

async fn read_blocks(path: &Path) -> Result<Vec<Block>> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    Block::parse_sequence(&raw).with_context(|| format!("{} is not a block array", path.display()))
}

fn print_report(report: &PageValidationResult) {
    for issue in &report.errors {
        eprintln!("error: {}", describe(issue.block_index, &issue.message));
    }
    for issue in &report.warnings {
        eprintln!("warning: {}", describe(issue.block_index, &issue.message));
    }
}

fn describe(index: Option<usize>, message: &str) -> String {
    match index {
        Some(i) => format!("block {}: {}", i, message),
        None => message.to_string(),
    }
}
