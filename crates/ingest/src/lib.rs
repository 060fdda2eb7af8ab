//! Offline side of the recipe pipeline: corpus import, chunking, embedding
//! backends, and index builds. The query service reuses the embedding
//! backends at request time.

pub mod chunker;
pub mod corpus;
pub mod embedding;
pub mod indexer;

pub use corpus::{CorpusError, CsvImporter};
pub use embedding::{create_embedder, Embedder, EmbeddingBatcher, EmbeddingError};
pub use indexer::{build_index, BuildError, BuildReport};
