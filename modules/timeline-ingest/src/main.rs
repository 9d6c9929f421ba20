use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use timeline_common::{load_layout, Event, SourceLayout};
use timeline_ingest::{run as run_pipeline, verify_references, RecordIngester, SheetSource, StoryIndex};

#[derive(Parser)]
#[command(name = "timeline-ingest")]
#[command(about = "Build timeline data artifacts from the campaign spreadsheet")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the sheet and write events, filters and chart layout
    Ingest {
        /// Spreadsheet identifier substituted into the source URL
        #[arg(long, env = "SPREADSHEET_ID")]
        spreadsheet_id: String,

        /// Directory the three JSON artifacts are written to
        #[arg(long, default_value = "src/data")]
        out: PathBuf,

        /// TOML file overriding the source URL template and column headers
        #[arg(long)]
        layout: Option<PathBuf>,

        /// Story index to check against the ingested ids before writing
        #[arg(long)]
        stories: Option<PathBuf>,
    },

    /// Check story references against an existing events artifact
    Verify {
        #[arg(long)]
        events: PathBuf,

        #[arg(long)]
        stories: PathBuf,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();

    if let Err(e) = init_tracing() {
        eprintln!("Error: {:#}", e);
        return ExitCode::from(1);
    }

    if let Err(e) = run().await {
        eprintln!("Error: {:#}", e);
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

fn init_tracing() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("timeline=info".parse()?))
        .init();
    Ok(())
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Ingest {
            spreadsheet_id,
            out,
            layout,
            stories,
        } => cmd_ingest(&spreadsheet_id, &out, layout.as_deref(), stories.as_deref()).await,
        Commands::Verify { events, stories } => cmd_verify(&events, &stories),
    }
}

async fn cmd_ingest(
    spreadsheet_id: &str,
    out: &Path,
    layout: Option<&Path>,
    stories: Option<&Path>,
) -> Result<()> {
    let layout = match layout {
        Some(path) => load_layout(path)?,
        None => SourceLayout::default(),
    };

    let ingester = RecordIngester::new(layout)?;
    let source = SheetSource::new(ingester.layout().source_url(spreadsheet_id));

    info!("Timeline ingest starting...");
    let artifacts = run_pipeline(&ingester, &source).await?;

    if let Some(path) = stories {
        let stories = read_json::<Vec<StoryIndex>>(path)?;
        verify_references(&artifacts.events, &stories)?;
    }

    let written = artifacts.write_all(out)?;
    info!(files = written.len(), out = %out.display(), "Timeline ingest complete");
    Ok(())
}

fn cmd_verify(events: &Path, stories: &Path) -> Result<()> {
    let events = read_json::<Vec<Event>>(events)?;
    let stories = read_json::<Vec<StoryIndex>>(stories)?;
    verify_references(&events, &stories)?;
    Ok(())
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
}
