//! Character-window splitting with separator-aware cut points.

use ladle_core::{Chunk, RawRecord};

use super::types::ChunkConfig;

/// Split every record, keeping corpus order.
pub fn chunk_records(records: &[RawRecord], config: &ChunkConfig) -> Vec<Chunk> {
    records
        .iter()
        .flat_map(|record| chunk_record(record, config))
        .collect()
}

/// Split one record into overlapping character windows.
///
/// Each window holds at most `chunk_size` characters. A window that does not
/// reach the end of the text is cut after the last separator inside it, when
/// that leaves more than `overlap` characters behind the cut; otherwise it is
/// cut at the window edge. The next window starts `overlap` characters before
/// the cut. Sizes and offsets count characters, not bytes.
pub fn chunk_record(record: &RawRecord, config: &ChunkConfig) -> Vec<Chunk> {
    if record.text.trim().is_empty() {
        return Vec::new();
    }

    let chars: Vec<char> = record.text.chars().collect();
    let sep: Vec<char> = config.separator.chars().collect();
    let n = chars.len();

    let mut chunks = Vec::new();
    let mut start = 0usize;

    while start < n {
        let window_end = (start + config.chunk_size).min(n);

        if window_end == n {
            if let Some(chunk) = trimmed_chunk(record, &chars, start, n) {
                chunks.push(chunk);
            }
            break;
        }

        let cut =
            separator_cut(&chars, &sep, start, window_end, config.overlap).unwrap_or(window_end);
        if let Some(chunk) = trimmed_chunk(record, &chars, start, cut) {
            chunks.push(chunk);
        }

        // Step back by the overlap, but always move forward.
        start = cut.saturating_sub(config.overlap).max(start + 1);
    }

    chunks
}

/// Cut position just past the last separator in `start..window_end`, provided
/// the cut lands more than `overlap` characters into the window (a cut any
/// earlier would stall the sliding window).
fn separator_cut(
    chars: &[char],
    sep: &[char],
    start: usize,
    window_end: usize,
    overlap: usize,
) -> Option<usize> {
    if sep.is_empty() || window_end < start + sep.len() {
        return None;
    }
    let mut q = window_end - sep.len();
    while q > start {
        if chars[q..q + sep.len()] == *sep {
            let cut = q + sep.len();
            return (cut > start + overlap).then_some(cut);
        }
        q -= 1;
    }
    None
}

/// Build a chunk for `chars[start..end]`, trimming whitespace off both sides
/// and shifting the recorded offset past anything trimmed at the front.
/// Spans that trim away to nothing produce no chunk.
fn trimmed_chunk(record: &RawRecord, chars: &[char], start: usize, end: usize) -> Option<Chunk> {
    let mut lead = start;
    while lead < end && chars[lead].is_whitespace() {
        lead += 1;
    }
    let mut tail = end;
    while tail > lead && chars[tail - 1].is_whitespace() {
        tail -= 1;
    }
    if lead == tail {
        return None;
    }
    Some(Chunk {
        text: chars[lead..tail].iter().collect(),
        source_id: record.source_id.clone(),
        row_index: record.row_index,
        start_offset: lead,
    })
}
