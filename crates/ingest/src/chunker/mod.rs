//! Recipe text chunking.
//!
//! Splits raw corpus records into bounded, overlapping character windows.
//! Cuts land just past the configured separator (blank line by default)
//! where possible, so chunks keep whole paragraphs together.

mod splitter;
mod types;

pub use splitter::{chunk_record, chunk_records};
pub use types::{ChunkConfig, ChunkConfigError};

#[cfg(test)]
mod tests;
