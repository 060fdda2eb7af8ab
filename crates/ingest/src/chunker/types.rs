//! Chunker configuration.

use ladle_core::config::ChunkingConfig;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChunkConfigError {
    #[error("chunk_size must be greater than zero")]
    ZeroChunkSize,

    #[error("overlap ({overlap}) must be smaller than chunk_size ({chunk_size})")]
    OverlapTooLarge { overlap: usize, chunk_size: usize },
}

/// Configuration for the character chunker.
#[derive(Debug, Clone)]
pub struct ChunkConfig {
    /// Maximum characters per chunk (default: 1000).
    pub chunk_size: usize,
    /// Characters shared between adjacent chunks of one record (default: 200).
    pub overlap: usize,
    /// Preferred split boundary (default: blank line).
    pub separator: String,
}

impl ChunkConfig {
    /// Reject parameter combinations the splitter cannot make progress with.
    pub fn validate(&self) -> Result<(), ChunkConfigError> {
        if self.chunk_size == 0 {
            return Err(ChunkConfigError::ZeroChunkSize);
        }
        if self.overlap >= self.chunk_size {
            return Err(ChunkConfigError::OverlapTooLarge {
                overlap: self.overlap,
                chunk_size: self.chunk_size,
            });
        }
        Ok(())
    }
}

impl Default for ChunkConfig {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            overlap: 200,
            separator: "\n\n".to_string(),
        }
    }
}

impl From<&ChunkingConfig> for ChunkConfig {
    fn from(cfg: &ChunkingConfig) -> Self {
        Self {
            chunk_size: cfg.chunk_size,
            overlap: cfg.overlap,
            separator: cfg.separator.clone(),
        }
    }
}
