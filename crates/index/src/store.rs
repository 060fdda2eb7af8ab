use ladle_core::Chunk;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::IndexError;

/// One stored row: an embedding and the chunk it encodes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct IndexEntry {
    pub embedding: Vec<f32>,
    pub chunk: Chunk,
}

/// A retrieval match: the matched chunk and its distance from the query.
#[derive(Debug, Clone)]
pub struct SearchHit {
    pub chunk: Chunk,
    pub distance: f32,
}

/// In-memory vector index over recipe chunks.
///
/// Entries are kept in insertion order and scanned exhaustively at query
/// time (cosine distance). At corpus scale this stays well under a
/// millisecond per query and keeps ranking fully deterministic.
#[derive(Debug)]
pub struct VectorIndex {
    dimensions: usize,
    entries: Vec<IndexEntry>,
}

impl VectorIndex {
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions,
            entries: Vec::new(),
        }
    }

    pub(crate) fn from_entries(dimensions: usize, entries: Vec<IndexEntry>) -> Self {
        Self {
            dimensions,
            entries,
        }
    }

    pub(crate) fn entries(&self) -> &[IndexEntry] {
        &self.entries
    }

    /// Append an (embedding, chunk) pair. Insertion order is the tie-break
    /// order for equidistant search results.
    pub fn add(&mut self, embedding: Vec<f32>, chunk: Chunk) -> Result<(), IndexError> {
        if embedding.len() != self.dimensions {
            return Err(IndexError::DimensionMismatch {
                expected: self.dimensions,
                actual: embedding.len(),
            });
        }
        self.entries.push(IndexEntry { embedding, chunk });
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// Top-k nearest chunks by ascending cosine distance; ties resolve to
    /// insertion order. An empty index yields an empty result, not an error.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<SearchHit>, IndexError> {
        if query.len() != self.dimensions {
            return Err(IndexError::DimensionMismatch {
                expected: self.dimensions,
                actual: query.len(),
            });
        }
        if k == 0 || self.entries.is_empty() {
            return Ok(Vec::new());
        }

        let mut scored: Vec<(usize, f32)> = self
            .entries
            .par_iter()
            .enumerate()
            .map(|(position, entry)| (position, cosine_distance(query, &entry.embedding)))
            .collect();

        // total_cmp gives a total order, so unstable sort stays deterministic.
        scored.sort_unstable_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)));
        scored.truncate(k);

        Ok(scored
            .into_iter()
            .map(|(position, distance)| SearchHit {
                chunk: self.entries[position].chunk.clone(),
                distance,
            })
            .collect())
    }
}

/// 1 - cosine similarity. Zero-norm vectors compare as maximally distant.
fn cosine_distance(a: &[f32], b: &[f32]) -> f32 {
    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;
    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom == 0.0 {
        return 1.0;
    }
    1.0 - dot / denom
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(text: &str, row: usize) -> Chunk {
        Chunk {
            text: text.to_string(),
            source_id: "recipes.csv".to_string(),
            row_index: Some(row),
            start_offset: 0,
        }
    }

    fn sample_index() -> VectorIndex {
        let mut index = VectorIndex::new(2);
        index.add(vec![1.0, 0.0], chunk("tomato soup", 0)).unwrap();
        index.add(vec![0.0, 1.0], chunk("chocolate cake", 1)).unwrap();
        index.add(vec![0.8, 0.2], chunk("tomato pasta", 2)).unwrap();
        index
    }

    #[test]
    fn search_orders_by_ascending_distance() {
        let index = sample_index();
        let hits = index.search(&[1.0, 0.0], 3).unwrap();
        assert_eq!(hits.len(), 3);
        assert_eq!(hits[0].chunk.text, "tomato soup");
        assert_eq!(hits[1].chunk.text, "tomato pasta");
        assert_eq!(hits[2].chunk.text, "chocolate cake");
        assert!(hits[0].distance <= hits[1].distance);
        assert!(hits[1].distance <= hits[2].distance);
    }

    #[test]
    fn search_caps_results_at_k() {
        let index = sample_index();
        assert_eq!(index.search(&[1.0, 0.0], 2).unwrap().len(), 2);
        assert_eq!(index.search(&[1.0, 0.0], 10).unwrap().len(), 3);
        assert!(index.search(&[1.0, 0.0], 0).unwrap().is_empty());
    }

    #[test]
    fn equidistant_hits_keep_insertion_order() {
        let mut index = VectorIndex::new(2);
        index.add(vec![0.0, 1.0], chunk("first in", 0)).unwrap();
        index.add(vec![0.0, 1.0], chunk("second in", 1)).unwrap();
        index.add(vec![0.0, 1.0], chunk("third in", 2)).unwrap();

        let hits = index.search(&[1.0, 0.0], 3).unwrap();
        assert_eq!(hits[0].chunk.text, "first in");
        assert_eq!(hits[1].chunk.text, "second in");
        assert_eq!(hits[2].chunk.text, "third in");
    }

    #[test]
    fn repeated_search_is_deterministic() {
        let index = sample_index();
        let first: Vec<String> = index
            .search(&[0.5, 0.5], 3)
            .unwrap()
            .into_iter()
            .map(|h| h.chunk.text)
            .collect();
        let second: Vec<String> = index
            .search(&[0.5, 0.5], 3)
            .unwrap()
            .into_iter()
            .map(|h| h.chunk.text)
            .collect();
        assert_eq!(first, second);
    }

    #[test]
    fn empty_index_returns_no_hits() {
        let index = VectorIndex::new(4);
        assert!(index.search(&[0.0; 4], 4).unwrap().is_empty());
    }

    #[test]
    fn add_rejects_wrong_dimensions() {
        let mut index = VectorIndex::new(3);
        let err = index.add(vec![1.0, 2.0], chunk("short", 0)).unwrap_err();
        assert!(matches!(
            err,
            IndexError::DimensionMismatch {
                expected: 3,
                actual: 2
            }
        ));
    }

    #[test]
    fn search_rejects_wrong_query_dimensions() {
        let index = sample_index();
        let err = index.search(&[1.0, 0.0, 0.0], 2).unwrap_err();
        assert!(matches!(err, IndexError::DimensionMismatch { .. }));
    }

    #[test]
    fn cosine_distance_basics() {
        assert!(cosine_distance(&[1.0, 0.0], &[1.0, 0.0]).abs() < 1e-6);
        assert!((cosine_distance(&[1.0, 0.0], &[0.0, 1.0]) - 1.0).abs() < 1e-6);
        assert_eq!(cosine_distance(&[0.0, 0.0], &[1.0, 0.0]), 1.0);
    }
}
