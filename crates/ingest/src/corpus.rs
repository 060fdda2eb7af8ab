//! CSV corpus import.
//!
//! Each data row becomes one [`RawRecord`] whose text carries the recipe
//! title on the first line, followed by the remaining columns as labeled
//! paragraphs. Downstream chunking and source formatting both lean on that
//! layout.

use std::path::{Path, PathBuf};

use ladle_core::RawRecord;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("corpus not found at {}", path.display())]
    NotFound { path: PathBuf },

    #[error("corpus at {} has no data rows", path.display())]
    Empty { path: PathBuf },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub struct CsvImporter;

impl CsvImporter {
    pub fn import(path: &Path) -> Result<Vec<RawRecord>, CorpusError> {
        if !path.exists() {
            return Err(CorpusError::NotFound {
                path: path.to_path_buf(),
            });
        }
        let source_id = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        let mut reader = csv::Reader::from_path(path)?;
        let headers = reader.headers()?.clone();
        let title_col = detect_title_column(&headers);

        let mut records = Vec::new();
        for (row_index, row) in reader.records().enumerate() {
            let row = row?;
            let mut parts: Vec<String> = Vec::new();

            if let Some(col) = title_col {
                if let Some(title) = clean_cell(row.get(col)) {
                    parts.push(title);
                }
            }
            for (col, header) in headers.iter().enumerate() {
                if Some(col) == title_col {
                    continue;
                }
                if let Some(value) = clean_cell(row.get(col)) {
                    parts.push(format!("{header}: {value}"));
                }
            }

            records.push(RawRecord {
                source_id: source_id.clone(),
                row_index: Some(row_index),
                text: parts.join("\n\n"),
            });
        }

        if records.is_empty() {
            return Err(CorpusError::Empty {
                path: path.to_path_buf(),
            });
        }

        info!("Imported {} records from {}", records.len(), path.display());
        Ok(records)
    }
}

/// Column holding the recipe title: conventional header names first, else
/// the first column.
fn detect_title_column(headers: &csv::StringRecord) -> Option<usize> {
    const CANDIDATES: [&str; 4] = ["title", "name", "recipe_name", "recipe"];
    for candidate in CANDIDATES {
        if let Some(idx) = headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(candidate))
        {
            return Some(idx);
        }
    }
    if headers.is_empty() {
        None
    } else {
        Some(0)
    }
}

fn clean_cell(cell: Option<&str>) -> Option<String> {
    let val = cell?.trim();
    if val.is_empty() || val == "None" || val == "null" || val == "undefined" {
        return None;
    }
    Some(val.to_string())
}
