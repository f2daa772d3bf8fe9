//! Overlapping word-window text chunker.
//!
//! Deed prose runs in long unbroken clauses, so chunks are fixed windows of
//! words rather than paragraph splits. Adjacent windows share `overlap` words
//! so a clause cut at a window boundary stays retrievable from at least one
//! neighbor.

/// Collapse all whitespace runs to single spaces and trim.
///
/// Idempotent: normalizing already-normalized text is a no-op, so re-chunking
/// the same text yields the same chunk sequence.
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Split text into overlapping chunks of `chunk_size` words.
///
/// The window start advances by `chunk_size - overlap` words. The last
/// partial window is emitted once and iteration stops, so a short tail never
/// produces a duplicate trailing chunk. Empty input yields no chunks.
pub fn chunk_text(text: &str, chunk_size: usize, overlap: usize) -> Vec<String> {
    let words: Vec<&str> = text.split_whitespace().collect();
    let step = chunk_size.saturating_sub(overlap).max(1);

    let mut chunks = Vec::new();
    let mut start = 0;
    while start < words.len() {
        let end = (start + chunk_size).min(words.len());
        let chunk = words[start..end].join(" ");
        if !chunk.is_empty() {
            chunks.push(chunk);
            if start + chunk_size >= words.len() {
                break;
            }
        }
        start += step;
    }
    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(n: usize) -> String {
        (0..n).map(|i| format!("w{}", i)).collect::<Vec<_>>().join(" ")
    }

    #[test]
    fn test_empty_text_no_chunks() {
        assert!(chunk_text("", 160, 40).is_empty());
        assert!(chunk_text("   \n  ", 160, 40).is_empty());
    }

    #[test]
    fn test_short_text_single_chunk() {
        let chunks = chunk_text("a deed between two parties", 160, 40);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0], "a deed between two parties");
    }

    #[test]
    fn test_350_words_three_chunks_at_expected_offsets() {
        let text = words(350);
        let chunks = chunk_text(&text, 160, 40);
        assert_eq!(chunks.len(), 3);
        // Window starts advance by chunk_size - overlap = 120 words.
        assert!(chunks[0].starts_with("w0 "));
        assert!(chunks[1].starts_with("w120 "));
        assert!(chunks[2].starts_with("w240 "));
        // Last partial window runs to the end, emitted exactly once.
        assert!(chunks[2].ends_with("w349"));
    }

    #[test]
    fn test_exact_window_no_duplicate_tail() {
        let text = words(160);
        let chunks = chunk_text(&text, 160, 40);
        assert_eq!(chunks.len(), 1);
    }

    #[test]
    fn test_overlap_shares_words() {
        let text = words(200);
        let chunks = chunk_text(&text, 160, 40);
        assert_eq!(chunks.len(), 2);
        // First chunk covers w0..w159; second starts at w120.
        assert!(chunks[0].contains("w159"));
        assert!(chunks[1].starts_with("w120 "));
        assert!(chunks[1].contains("w159"));
    }

    #[test]
    fn test_normalize_whitespace_collapses_runs() {
        assert_eq!(
            normalize_whitespace("  a\t\tb \n\n c  "),
            "a b c"
        );
    }

    #[test]
    fn test_chunking_idempotent_on_normalized_text() {
        let text = normalize_whitespace(&words(300));
        let first = chunk_text(&text, 160, 40);
        let second = chunk_text(&normalize_whitespace(&text), 160, 40);
        assert_eq!(first, second);
    }
}
