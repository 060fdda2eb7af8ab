//! Index build orchestration: corpus to chunks to embeddings to a persisted
//! vector index. Offline counterpart of the query service; any stage failing
//! aborts the build with nothing written.

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use ladle_core::Config;
use ladle_index::{persist, IndexError, IndexManifest, VectorIndex};
use thiserror::Error;
use tracing::info;

use crate::chunker::{self, ChunkConfig, ChunkConfigError};
use crate::corpus::{CorpusError, CsvImporter};
use crate::embedding::{Embedder, EmbeddingBatcher, EmbeddingError};

#[derive(Debug, Error)]
pub enum BuildError {
    #[error(transparent)]
    Corpus(#[from] CorpusError),

    #[error(transparent)]
    ChunkConfig(#[from] ChunkConfigError),

    #[error("embedding failed: {0}")]
    Embedding(#[from] EmbeddingError),

    #[error("index error: {0}")]
    Index(#[from] IndexError),

    #[error("corpus produced no chunks from {records} records")]
    NoChunks { records: usize },
}

/// What a finished build produced.
#[derive(Debug)]
pub struct BuildReport {
    pub records: usize,
    pub chunks: usize,
    pub dimensions: usize,
    pub elapsed_secs: f64,
}

/// Build the vector index from the configured corpus and persist it to the
/// configured index directory, replacing whatever was there.
pub async fn build_index(
    config: &Config,
    embedder: Arc<dyn Embedder>,
) -> Result<BuildReport, BuildError> {
    let started = Instant::now();

    let chunk_config = ChunkConfig::from(&config.chunking);
    chunk_config.validate()?;

    let records = CsvImporter::import(&config.data.corpus_path)?;
    let chunks = chunker::chunk_records(&records, &chunk_config);
    if chunks.is_empty() {
        return Err(BuildError::NoChunks {
            records: records.len(),
        });
    }
    info!(
        "Chunked {} records into {} chunks",
        records.len(),
        chunks.len()
    );

    let dimensions = embedder.dimensions();
    let mut embeddings: Vec<Option<Vec<f32>>> = vec![None; chunks.len()];
    let mut batcher = EmbeddingBatcher::new(embedder, config.embedding.batch_size);
    let mut embedded = 0usize;

    for (position, chunk) in chunks.iter().enumerate() {
        if let Some(done) = batcher.add(position, chunk.text.clone()).await? {
            embedded += place(&mut embeddings, done);
            info!("Embedded {}/{} chunks", embedded, chunks.len());
        }
    }
    let remainder = batcher.flush().await?;
    if !remainder.is_empty() {
        embedded += place(&mut embeddings, remainder);
        info!("Embedded {}/{} chunks", embedded, chunks.len());
    }

    let mut index = VectorIndex::new(dimensions);
    for (chunk, embedding) in chunks.iter().zip(embeddings) {
        let embedding = embedding
            .ok_or_else(|| EmbeddingError::Api("chunk skipped by the batcher".to_string()))?;
        index.add(embedding, chunk.clone())?;
    }

    let manifest = IndexManifest {
        dimensions,
        model: config.embedding.model.clone(),
        device: config.embedding.device.clone(),
        chunk_size: chunk_config.chunk_size,
        overlap: chunk_config.overlap,
        separator: chunk_config.separator.clone(),
        chunk_count: index.len(),
        created_at: Utc::now(),
    };
    persist::save(&config.data.index_dir, &index, &manifest)?;

    let report = BuildReport {
        records: records.len(),
        chunks: index.len(),
        dimensions,
        elapsed_secs: started.elapsed().as_secs_f64(),
    };
    info!(
        "Index built: {} chunks ({} dims) in {:.1}s -> {}",
        report.chunks,
        report.dimensions,
        report.elapsed_secs,
        config.data.index_dir.display()
    );
    Ok(report)
}

fn place(embeddings: &mut [Option<Vec<f32>>], done: Vec<(usize, Vec<f32>)>) -> usize {
    let count = done.len();
    for (position, embedding) in done {
        embeddings[position] = Some(embedding);
    }
    count
}
