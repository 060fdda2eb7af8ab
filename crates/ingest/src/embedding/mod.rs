pub mod batcher;
pub mod ollama;
pub mod openai;
pub mod tei;
pub mod traits;

pub use batcher::EmbeddingBatcher;
pub use ollama::OllamaEmbedder;
pub use openai::OpenAiEmbedder;
pub use tei::TeiEmbedder;
pub use traits::{Embedder, EmbeddingError};

use std::sync::Arc;

use ladle_core::Config;
use tracing::warn;

/// Build the configured embedding backend. The index builder and the query
/// service both go through here so the two sides agree on the model.
pub fn create_embedder(config: &Config) -> Result<Arc<dyn Embedder>, EmbeddingError> {
    let emb = &config.embedding;

    match emb.device.as_str() {
        "cpu" | "gpu" => {}
        other => warn!("unknown EMBEDDING_DEVICE '{other}', the backend decides placement"),
    }

    match emb.provider.as_str() {
        "tei" => Ok(Arc::new(TeiEmbedder::new(
            emb.base_url.clone(),
            emb.dimensions,
        ))),
        "openai" => {
            let api_key = emb.api_key.clone().ok_or_else(|| {
                EmbeddingError::NotConfigured(
                    "EMBEDDING_API_KEY is required for the openai provider".to_string(),
                )
            })?;
            Ok(Arc::new(OpenAiEmbedder::new(
                api_key,
                emb.model.clone(),
                emb.base_url.clone(),
                emb.dimensions,
            )))
        }
        "ollama" => Ok(Arc::new(OllamaEmbedder::new(
            config.ollama.url.clone(),
            config.ollama.embedding_model.clone(),
            emb.dimensions,
        ))),
        other => Err(EmbeddingError::NotConfigured(format!(
            "unknown embedding provider '{other}' (expected tei, openai, or ollama)"
        ))),
    }
}
