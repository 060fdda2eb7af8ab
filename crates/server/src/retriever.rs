use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::num::NonZeroUsize;
use std::sync::Arc;

use lru::LruCache;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::debug;

use ladle_index::{IndexError, SearchHit, VectorIndex};
use ladle_ingest::{Embedder, EmbeddingError};

#[derive(Debug, Error)]
pub enum RetrieveError {
    #[error(transparent)]
    Embedding(#[from] EmbeddingError),

    #[error(transparent)]
    Index(#[from] IndexError),
}

// ── Query-embedding cache ─────────────────────────────────────

/// LRU cache mapping query-text hash to embedding vector.
struct QueryCache {
    entries: LruCache<u64, Vec<f32>>,
    hits: u64,
    misses: u64,
}

impl QueryCache {
    fn new(capacity: usize) -> Self {
        Self {
            entries: LruCache::new(NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN)),
            hits: 0,
            misses: 0,
        }
    }

    fn key(text: &str) -> u64 {
        let mut hasher = DefaultHasher::new();
        text.hash(&mut hasher);
        hasher.finish()
    }

    fn get(&mut self, text: &str) -> Option<Vec<f32>> {
        if let Some(vec) = self.entries.get(&Self::key(text)) {
            self.hits += 1;
            Some(vec.clone())
        } else {
            self.misses += 1;
            None
        }
    }

    fn put(&mut self, text: &str, embedding: Vec<f32>) {
        self.entries.put(Self::key(text), embedding);
    }
}

/// Counter snapshot for the stats endpoint.
#[derive(Debug, Clone, Copy)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
}

impl CacheStats {
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

// ── Retriever ─────────────────────────────────────────────────

/// Embeds a query and scans the vector index for its nearest chunks.
/// Repeated questions reuse the cached embedding instead of calling
/// the backend again.
pub struct Retriever {
    embedder: Arc<dyn Embedder>,
    index: VectorIndex,
    top_k: usize,
    cache: Mutex<QueryCache>,
}

impl Retriever {
    pub fn new(
        embedder: Arc<dyn Embedder>,
        index: VectorIndex,
        top_k: usize,
        cache_size: usize,
    ) -> Self {
        Self {
            embedder,
            index,
            top_k,
            cache: Mutex::new(QueryCache::new(cache_size)),
        }
    }

    pub fn top_k(&self) -> usize {
        self.top_k
    }

    /// Nearest chunks for a query, nearest first.
    pub async fn retrieve(&self, query: &str) -> Result<Vec<SearchHit>, RetrieveError> {
        let cached = self.cache.lock().await.get(query);
        let embedding = match cached {
            Some(vec) => {
                debug!("query embedding served from cache");
                vec
            }
            None => {
                let vec = self.embedder.embed_one(query).await?;
                self.cache.lock().await.put(query, vec.clone());
                vec
            }
        };
        Ok(self.index.search(&embedding, self.top_k)?)
    }

    pub async fn cache_stats(&self) -> CacheStats {
        let cache = self.cache.lock().await;
        CacheStats {
            hits: cache.hits,
            misses: cache.misses,
        }
    }
}
