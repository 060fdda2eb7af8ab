//! On-disk snapshot format: `entries.json` plus a `manifest.json` that is
//! written last. A directory without a manifest is treated as no index at
//! all, so interrupted builds never get served.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::IndexError;
use crate::store::{IndexEntry, VectorIndex};

const ENTRIES_FILE: &str = "entries.json";
const MANIFEST_FILE: &str = "manifest.json";

/// Build metadata stored alongside the entries. The serving side checks it
/// against its own configuration before answering queries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexManifest {
    pub dimensions: usize,
    pub model: String,
    pub device: String,
    pub chunk_size: usize,
    pub overlap: usize,
    pub separator: String,
    pub chunk_count: usize,
    pub created_at: DateTime<Utc>,
}

/// Write the index snapshot into `dir`, creating it if needed. The manifest
/// goes last so readers never see a manifest for half-written entries.
pub fn save(dir: &Path, index: &VectorIndex, manifest: &IndexManifest) -> Result<(), IndexError> {
    fs::create_dir_all(dir)?;

    let entries_file = File::create(dir.join(ENTRIES_FILE))?;
    serde_json::to_writer(BufWriter::new(entries_file), index.entries())?;

    let manifest_file = File::create(dir.join(MANIFEST_FILE))?;
    serde_json::to_writer_pretty(BufWriter::new(manifest_file), manifest)?;
    Ok(())
}

/// Load a snapshot from `dir`, validating entry count and dimensions
/// against the manifest.
pub fn load(dir: &Path) -> Result<(VectorIndex, IndexManifest), IndexError> {
    let manifest_path = dir.join(MANIFEST_FILE);
    if !manifest_path.exists() {
        return Err(IndexError::NotFound {
            path: dir.to_path_buf(),
        });
    }

    let manifest: IndexManifest = serde_json::from_reader(BufReader::new(File::open(
        &manifest_path,
    )?))
    .map_err(|e| IndexError::Corrupt(format!("manifest.json: {e}")))?;

    let entries_path = dir.join(ENTRIES_FILE);
    if !entries_path.exists() {
        return Err(IndexError::Corrupt("entries.json is missing".to_string()));
    }
    let entries: Vec<IndexEntry> =
        serde_json::from_reader(BufReader::new(File::open(&entries_path)?))
            .map_err(|e| IndexError::Corrupt(format!("entries.json: {e}")))?;

    if entries.len() != manifest.chunk_count {
        return Err(IndexError::Corrupt(format!(
            "manifest says {} chunks but entries file holds {}",
            manifest.chunk_count,
            entries.len()
        )));
    }
    if let Some((row, entry)) = entries
        .iter()
        .enumerate()
        .find(|(_, e)| e.embedding.len() != manifest.dimensions)
    {
        return Err(IndexError::Corrupt(format!(
            "entry {row} has {} dimensions, manifest says {}",
            entry.embedding.len(),
            manifest.dimensions
        )));
    }

    Ok((
        VectorIndex::from_entries(manifest.dimensions, entries),
        manifest,
    ))
}
