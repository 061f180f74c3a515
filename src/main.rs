//! Board export CLI
//!
//! Packs a saved board page, its structured data export and every asset it
//! references into `{output}/{slug}.zip`.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use kodegen_tools_board_export::{ExportConfig, export_board};

#[derive(Debug, Parser)]
#[command(name = "kodegen-board-export")]
#[command(about = "Export a board page as a self-contained static archive", long_about = None)]
struct Cli {
    /// Saved board page
    #[arg(long)]
    html: PathBuf,

    /// Location the page was served from; its last path segment is the board slug
    #[arg(long)]
    url: String,

    /// Directory receiving the archive
    #[arg(long, default_value = ".")]
    output: PathBuf,

    /// Per-request timeout for stylesheets and assets
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Largest accepted asset, in MiB
    #[arg(long)]
    max_asset_mb: Option<usize>,

    #[arg(long)]
    user_agent: Option<String>,

    /// Print the export report as JSON
    #[arg(long)]
    json: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let cli = Cli::parse();

    let mut builder = ExportConfig::builder().output_dir(&cli.output);
    if let Some(secs) = cli.timeout_secs {
        builder = builder.asset_timeout(Duration::from_secs(secs));
    }
    if let Some(mb) = cli.max_asset_mb {
        builder = builder.max_asset_size(megabytes(mb)?);
    }
    if let Some(user_agent) = cli.user_agent {
        builder = builder.user_agent(user_agent);
    }
    let config = builder.build()?;
    let effective = serde_json::to_string(&config)?;
    tracing::debug!(config = %effective, "Effective configuration");

    let html = tokio::fs::read_to_string(&cli.html)
        .await
        .with_context(|| format!("Failed to read {}", cli.html.display()))?;

    let report = export_board(&config, &html, &cli.url).await?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{report}");
    }
    Ok(())
}

fn megabytes(mb: usize) -> Result<usize> {
    mb.checked_mul(1024 * 1024)
        .with_context(|| format!("--max-asset-mb {mb} is too large"))
}
