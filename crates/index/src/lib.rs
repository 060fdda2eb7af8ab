//! Flat vector index with on-disk snapshots.
//!
//! Stores (embedding, chunk) pairs in insertion order and answers top-k
//! nearest-neighbor queries by exact cosine-distance scan. Exact search keeps
//! retrieval deterministic: equal distances resolve to insertion order.

pub mod error;
pub mod persist;
pub mod store;

pub use error::IndexError;
pub use persist::IndexManifest;
pub use store::{SearchHit, VectorIndex};
