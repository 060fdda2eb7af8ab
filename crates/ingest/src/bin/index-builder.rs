//! index-builder: offline vector index build from the recipe corpus.
//!
//! Reads the CSV corpus, chunks it, embeds every chunk through the
//! configured backend, and writes the snapshot the query service loads at
//! startup. Always a full rebuild; the previous index is replaced.

use std::path::PathBuf;

use clap::Parser;
use ladle_core::Config;
use ladle_ingest::embedding::create_embedder;
use ladle_ingest::indexer::build_index;
use tracing::info;

// ── CLI ─────────────────────────────────────────────────────────────

/// Build the recipe vector index from a CSV corpus.
#[derive(Parser, Debug)]
#[command(name = "index-builder", version, about)]
struct Cli {
    /// Path to the recipe corpus CSV (overrides CORPUS_PATH).
    #[arg(long)]
    corpus: Option<PathBuf>,

    /// Output directory for the persisted index (overrides INDEX_DIR).
    #[arg(long)]
    index_dir: Option<PathBuf>,
}

// ── main ────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    ladle_core::config::load_dotenv();
    let cli = Cli::parse();

    let mut config = Config::from_env();
    if let Some(corpus) = cli.corpus {
        config.data.corpus_path = corpus;
    }
    if let Some(index_dir) = cli.index_dir {
        config.data.index_dir = index_dir;
    }
    config.log_summary();

    let embedder = create_embedder(&config)?;
    let report = build_index(&config, embedder).await?;

    info!(
        records = report.records,
        chunks = report.chunks,
        dims = report.dimensions,
        "index build finished"
    );
    Ok(())
}
