use serde::{Deserialize, Serialize};

/// One corpus row (one recipe), immutable once loaded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawRecord {
    /// Identifier of the corpus the row came from (file name).
    pub source_id: String,
    /// 0-based data-row position within the corpus file.
    pub row_index: Option<usize>,
    /// Full text of the row. The first line carries the recipe title.
    pub text: String,
}

/// A contiguous text span cut from a RawRecord, the atomic retrieval unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    pub text: String,
    /// Back-reference to the source record, not ownership.
    pub source_id: String,
    pub row_index: Option<usize>,
    /// Character offset of `text` within the source record's text.
    pub start_offset: usize,
}

impl Chunk {
    /// First line of the chunk, used for source attribution previews.
    pub fn title_line(&self) -> &str {
        self.text.lines().next().unwrap_or("")
    }
}
