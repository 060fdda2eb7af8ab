//! HTTP facade over the recipe pipeline: retrieval, advice, health, stats.

pub mod api;
pub mod retriever;
pub mod router;
pub mod state;

use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};

use ladle_core::config::Config;
use ladle_index::persist;
use ladle_ingest::create_embedder;
use ladle_llm::RecipeAdvisor;

use crate::retriever::Retriever;
use crate::state::AppState;

/// Load the persisted index and wire up every pipeline stage.
///
/// Fails when no index exists, when the index dimensions disagree with
/// the configured embedding width, or when the LLM provider is missing
/// its API key.
pub fn build_state(config: &Config) -> anyhow::Result<AppState> {
    let (index, manifest) =
        persist::load(&config.data.index_dir).context("loading vector index")?;

    if manifest.dimensions != config.embedding.dimensions {
        anyhow::bail!(
            "index was built with {} dimensions but EMBEDDING_DIMENSIONS is {}; \
             rebuild the index or fix the config",
            manifest.dimensions,
            config.embedding.dimensions
        );
    }
    if manifest.model != config.embedding.model {
        warn!(
            "index was built with embedding model '{}' but '{}' is configured; \
             retrieval quality may degrade",
            manifest.model, config.embedding.model
        );
    }

    let embedder = create_embedder(config)?;
    let advisor = RecipeAdvisor::from_config(&config.llm, &config.ollama)?;
    let retriever = Retriever::new(
        embedder,
        index,
        config.retrieval.top_k,
        config.retrieval.query_cache_size,
    );

    info!(
        chunks = manifest.chunk_count,
        dims = manifest.dimensions,
        model = %manifest.model,
        "index loaded"
    );

    Ok(AppState {
        retriever,
        advisor,
        manifest,
    })
}

/// Bind and serve until shutdown.
pub async fn serve(config: Config) -> anyhow::Result<()> {
    config.log_summary();

    let state = Arc::new(build_state(&config)?);
    let app = router::build_router(state, &config.server);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Server listening on http://localhost:{}", config.server.port);

    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::path::Path;

    use chrono::Utc;
    use ladle_core::record::Chunk;
    use ladle_index::{IndexManifest, VectorIndex};

    fn save_small_index(dir: &Path, dims: usize) {
        let mut index = VectorIndex::new(dims);
        index
            .add(
                vec![0.1; dims],
                Chunk {
                    text: "Tomato soup".to_string(),
                    source_id: "recipes.csv".to_string(),
                    row_index: Some(0),
                    start_offset: 0,
                },
            )
            .unwrap();
        let manifest = IndexManifest {
            dimensions: dims,
            model: "test-model".to_string(),
            device: "cpu".to_string(),
            chunk_size: 1000,
            overlap: 200,
            separator: "\n\n".to_string(),
            chunk_count: 1,
            created_at: Utc::now(),
        };
        persist::save(dir, &index, &manifest).unwrap();
    }

    #[test]
    fn startup_requires_an_index() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::for_profile("");
        config.data.index_dir = dir.path().join("missing");

        let err = build_state(&config).unwrap_err();
        let msg = format!("{err:#}");
        assert!(msg.contains("run index-builder first"), "got: {msg}");
    }

    #[test]
    fn startup_rejects_dimension_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        save_small_index(dir.path(), 3);
        let mut config = Config::for_profile("");
        config.data.index_dir = dir.path().to_path_buf();
        config.embedding.dimensions = 384;

        let err = build_state(&config).unwrap_err();
        assert!(err.to_string().contains("EMBEDDING_DIMENSIONS"), "got: {err}");
    }
}
