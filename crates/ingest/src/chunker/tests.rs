//! Tests for the chunker.

use ladle_core::{Chunk, RawRecord};

use super::splitter::{chunk_record, chunk_records};
use super::types::{ChunkConfig, ChunkConfigError};

fn record(text: &str) -> RawRecord {
    RawRecord {
        source_id: "recipes.csv".to_string(),
        row_index: Some(0),
        text: text.to_string(),
    }
}

fn config(chunk_size: usize, overlap: usize) -> ChunkConfig {
    ChunkConfig {
        chunk_size,
        overlap,
        separator: "\n\n".to_string(),
    }
}

fn para(letter: char, len: usize) -> String {
    std::iter::repeat(letter).take(len).collect()
}

/// Every chunk's text must equal the source slice at its recorded offset.
fn assert_offsets(rec: &RawRecord, chunks: &[Chunk]) {
    let chars: Vec<char> = rec.text.chars().collect();
    for chunk in chunks {
        let len = chunk.text.chars().count();
        let span: String = chars[chunk.start_offset..chunk.start_offset + len]
            .iter()
            .collect();
        assert_eq!(span, chunk.text, "offset {} drifted", chunk.start_offset);
    }
}

// ── Separator splitting ─────────────────────────────────────────────

#[test]
fn short_record_is_one_chunk() {
    let rec = record("Pasta Primavera\n\nToss the vegetables with pasta.");
    let chunks = chunk_record(&rec, &ChunkConfig::default());
    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0].text, rec.text);
    assert_eq!(chunks[0].start_offset, 0);
    assert_eq!(chunks[0].source_id, "recipes.csv");
    assert_eq!(chunks[0].row_index, Some(0));
}

#[test]
fn cuts_land_on_paragraph_boundaries() {
    let text = format!("{}\n\n{}\n\n{}", para('a', 40), para('b', 40), para('c', 40));
    let rec = record(&text);
    let chunks = chunk_record(&rec, &config(60, 10));

    assert_eq!(chunks.len(), 3);
    assert_eq!(chunks[0].text, para('a', 40));
    assert!(chunks[1].text.ends_with(&para('b', 40)));
    assert!(chunks[2].text.ends_with(&para('c', 40)));
    for chunk in &chunks {
        assert!(chunk.text.chars().count() <= 60);
    }
    assert_offsets(&rec, &chunks);
}

#[test]
fn early_separator_falls_back_to_hard_cut() {
    // The only separator sits 5 chars in; cutting there would stall the
    // window, so the splitter must cut at the window edge instead.
    let text = format!("{}\n\n{}", para('a', 5), para('z', 300));
    let rec = record(&text);
    let chunks = chunk_record(&rec, &config(100, 50));

    assert_eq!(chunks[0].text.chars().count(), 100);
    assert_eq!(chunks.len(), 6);
    for chunk in &chunks {
        assert!(chunk.text.chars().count() <= 100);
    }
    assert_offsets(&rec, &chunks);
}

// ── Sliding window ──────────────────────────────────────────────────

#[test]
fn hard_cuts_share_exact_overlap() {
    let text: String = ('a'..='z').cycle().take(250).collect();
    let rec = record(&text);
    let chunks = chunk_record(&rec, &config(100, 20));

    assert_eq!(chunks.len(), 3);
    assert_eq!(chunks[0].start_offset, 0);
    assert_eq!(chunks[1].start_offset, 80);
    assert_eq!(chunks[2].start_offset, 160);

    for pair in chunks.windows(2) {
        let left: Vec<char> = pair[0].text.chars().collect();
        let tail: String = left[left.len() - 20..].iter().collect();
        let head: String = pair[1].text.chars().take(20).collect();
        assert_eq!(tail, head, "adjacent chunks must share the overlap");
    }
    assert_offsets(&rec, &chunks);
}

#[test]
fn chunk_sizes_count_characters_not_bytes() {
    let text: String = "味噌汁と豆腐".chars().cycle().take(300).collect();
    let rec = record(&text);
    let chunks = chunk_record(&rec, &config(120, 20));

    assert_eq!(chunks.len(), 3);
    for chunk in &chunks {
        assert!(chunk.text.chars().count() <= 120);
    }
    assert!(chunks[0].text.len() > 120, "multi-byte text exceeds 120 bytes");
    assert_offsets(&rec, &chunks);
}

#[test]
fn splitting_is_deterministic() {
    let text = format!("{}\n\n{}\n\n{}", para('q', 70), para('r', 70), para('s', 70));
    let rec = record(&text);
    let first = chunk_record(&rec, &config(80, 16));
    let second = chunk_record(&rec, &config(80, 16));
    assert_eq!(first, second);
}

// ── Edge cases ──────────────────────────────────────────────────────

#[test]
fn empty_and_whitespace_records_produce_no_chunks() {
    let records = vec![record(""), record("   \n\n\t  ")];
    assert!(chunk_records(&records, &ChunkConfig::default()).is_empty());
}

#[test]
fn leading_whitespace_is_trimmed_and_offset_adjusted() {
    let rec = record("\n\nPasta Primavera\nToss the vegetables with pasta.\n\n");
    let chunks = chunk_record(&rec, &ChunkConfig::default());
    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0].start_offset, 2);
    assert_eq!(
        chunks[0].text,
        "Pasta Primavera\nToss the vegetables with pasta."
    );
    assert_offsets(&rec, &chunks);
}

#[test]
fn chunks_keep_corpus_order_across_records() {
    let records = vec![
        RawRecord {
            source_id: "recipes.csv".to_string(),
            row_index: Some(0),
            text: "Tomato soup".to_string(),
        },
        RawRecord {
            source_id: "recipes.csv".to_string(),
            row_index: Some(1),
            text: "Banana bread".to_string(),
        },
    ];
    let chunks = chunk_records(&records, &ChunkConfig::default());
    assert_eq!(chunks.len(), 2);
    assert_eq!(chunks[0].row_index, Some(0));
    assert_eq!(chunks[1].row_index, Some(1));
}

// ── Config ──────────────────────────────────────────────────────────

#[test]
fn default_config_is_valid() {
    let cfg = ChunkConfig::default();
    assert_eq!(cfg.chunk_size, 1000);
    assert_eq!(cfg.overlap, 200);
    assert_eq!(cfg.separator, "\n\n");
    assert!(cfg.validate().is_ok());
}

#[test]
fn config_rejects_overlap_not_smaller_than_size() {
    assert_eq!(
        config(100, 100).validate(),
        Err(ChunkConfigError::OverlapTooLarge {
            overlap: 100,
            chunk_size: 100
        })
    );
    assert!(config(100, 99).validate().is_ok());
}

#[test]
fn config_rejects_zero_chunk_size() {
    assert_eq!(config(0, 0).validate(), Err(ChunkConfigError::ZeroChunkSize));
}
