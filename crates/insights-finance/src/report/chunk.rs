//! Response chunking for display

/// Characters per displayed chunk
pub const CHUNK_SIZE: usize = 1000;

/// Split `text` into consecutive pieces of at most `size` characters
///
/// Sizes count Unicode scalar values, so a chunk never splits a character.
/// Every chunk but the last holds exactly `size` characters and joining the
/// chunks gives back `text`. Empty input yields no chunks; a `size` of zero
/// is treated as one.
pub fn chunk_response(text: &str, size: usize) -> Vec<String> {
    let size = size.max(1);
    let mut chunks = Vec::with_capacity(text.len() / size + 1);
    let mut current = String::new();
    let mut count = 0;

    for c in text.chars() {
        current.push(c);
        count += 1;
        if count == size {
            chunks.push(std::mem::take(&mut current));
            count = 0;
        }
    }

    if !current.is_empty() {
        chunks.push(current);
    }

    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_response() {
        assert!(chunk_response("", CHUNK_SIZE).is_empty());
    }

    #[test]
    fn test_short_response_is_one_chunk() {
        let chunks = chunk_response("Revenue grew steadily.", CHUNK_SIZE);
        assert_eq!(chunks, vec!["Revenue grew steadily.".to_string()]);
    }

    #[test]
    fn test_chunk_count_and_sizes() {
        for n in [999, 1000, 1001, 2500, 3000] {
            let text = "x".repeat(n);
            let chunks = chunk_response(&text, CHUNK_SIZE);

            assert_eq!(chunks.len(), n.div_ceil(CHUNK_SIZE), "n = {n}");
            let (last, full) = chunks.split_last().unwrap();
            assert!(full.iter().all(|c| c.chars().count() == CHUNK_SIZE));
            assert!(last.chars().count() <= CHUNK_SIZE);
            assert_eq!(chunks.concat(), text);
        }
    }

    #[test]
    fn test_multibyte_characters_are_not_split() {
        let text = "é".repeat(1500);
        let chunks = chunk_response(&text, CHUNK_SIZE);

        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].chars().count(), 1000);
        assert_eq!(chunks[1].chars().count(), 500);
        assert_eq!(chunks.concat(), text);
    }

    #[test]
    fn test_zero_size_is_clamped() {
        assert_eq!(chunk_response("abc", 0), vec!["a", "b", "c"]);
    }
}
