use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

use super::traits::{Embedder, EmbeddingError};

/// Backend for a text-embeddings-inference style server, the usual way to
/// serve sentence-transformer models (all-MiniLM and friends) over HTTP.
pub struct TeiEmbedder {
    client: Client,
    base_url: String,
    dimensions: usize,
}

impl TeiEmbedder {
    pub fn new(base_url: Option<String>, dimensions: usize) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(120))
                .build()
                .unwrap_or_else(|_| Client::new()),
            base_url: base_url.unwrap_or_else(|| "http://localhost:8080".to_string()),
            dimensions,
        }
    }
}

#[derive(Serialize)]
struct TeiEmbedRequest {
    inputs: Vec<String>,
    // Chunks can exceed the model's sequence length; let the server cut
    // rather than reject the batch.
    truncate: bool,
}

#[async_trait]
impl Embedder for TeiEmbedder {
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let request = TeiEmbedRequest {
            inputs: texts.iter().map(|t| t.to_string()).collect(),
            truncate: true,
        };

        let response = self
            .client
            .post(format!("{}/embed", self.base_url))
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(EmbeddingError::Api(format!("{status}: {body}")));
        }

        // The /embed endpoint answers with a bare array of vectors.
        let embeddings: Vec<Vec<f32>> = response.json().await?;

        if embeddings.len() != texts.len() {
            return Err(EmbeddingError::Api(format!(
                "expected {} embeddings, got {}",
                texts.len(),
                embeddings.len()
            )));
        }
        if let Some(first) = embeddings.first() {
            if first.len() != self.dimensions {
                return Err(EmbeddingError::DimensionMismatch {
                    expected: self.dimensions,
                    actual: first.len(),
                });
            }
        }

        Ok(embeddings)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}
