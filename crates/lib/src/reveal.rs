//! Typewriter reveal: feeds an already-complete answer into the transcript a
//! few characters at a time, so the presentation layer can render it as if it
//! were being generated live.

use std::time::Duration;

use crate::transcript::Transcript;

/// Reveal rate: characters per chunk and pause between chunks. Independent
/// knobs; neither affects the final text.
#[derive(Debug, Clone, Copy)]
pub struct RevealPacing {
    pub chunk_chars: usize,
    pub chunk_pause: Duration,
}

impl Default for RevealPacing {
    fn default() -> Self {
        Self {
            chunk_chars: 3,
            chunk_pause: Duration::from_millis(10),
        }
    }
}

/// Reveal `full_text` into a fresh streaming entry. After each chunk is
/// appended, `on_chunk` is called with the delta and the task sleeps for
/// `chunk_pause`, yielding so the caller's event loop can render the partial
/// message. Always runs to completion; an empty `full_text` leaves an empty
/// assistant message with no pauses and no callbacks. Returns the entry's
/// transcript index.
pub async fn reveal(
    transcript: &mut Transcript,
    pacing: RevealPacing,
    full_text: &str,
    mut on_chunk: Option<&mut (dyn FnMut(&str) + Send)>,
) -> usize {
    let index = transcript.begin_streaming_entry();
    for chunk in char_chunks(full_text, pacing.chunk_chars) {
        transcript.grow_streaming_entry(index, chunk);
        if let Some(cb) = on_chunk.as_mut() {
            cb(chunk);
        }
        tokio::time::sleep(pacing.chunk_pause).await;
    }
    transcript.finish_streaming_entry(index);
    index
}

/// Split on character counts, never byte offsets; answers are Turkish text
/// full of multi-byte scalars.
fn char_chunks(text: &str, chunk_chars: usize) -> Vec<&str> {
    let chunk_chars = chunk_chars.max(1);
    let mut chunks = Vec::new();
    let mut start = 0;
    let mut count = 0;
    for (i, _) in text.char_indices() {
        if count == chunk_chars {
            chunks.push(&text[start..i]);
            start = i;
            count = 0;
        }
        count += 1;
    }
    if start < text.len() {
        chunks.push(&text[start..]);
    }
    chunks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transcript::Role;

    #[test]
    fn chunks_respect_char_boundaries() {
        assert_eq!(char_chunks("abcdefg", 3), vec!["abc", "def", "g"]);
        // "Üzgünüm" is 7 chars but more bytes; a byte split would panic.
        assert_eq!(char_chunks("Üzgünüm", 3), vec!["Üzg", "ünü", "m"]);
        assert_eq!(char_chunks("", 3), Vec::<&str>::new());
        assert_eq!(char_chunks("ab", 0), vec!["a", "b"]);
    }

    #[tokio::test]
    async fn reveal_is_monotonic_and_exact() {
        let mut t = Transcript::new();
        let full = "Garanti belgesi, satın alınan ürünün garanti şartlarını gösterir.";
        let pacing = RevealPacing {
            chunk_chars: 3,
            chunk_pause: Duration::ZERO,
        };

        let mut seen = String::new();
        let mut prefixes = Vec::new();
        let mut on_chunk = |delta: &str| {
            seen.push_str(delta);
            prefixes.push(seen.clone());
        };
        let idx = reveal(&mut t, pacing, full, Some(&mut on_chunk)).await;

        assert_eq!(t.messages()[idx].role, Role::Assistant);
        assert_eq!(t.messages()[idx].text, full);
        // Every observed partial state is a prefix of the next.
        for pair in prefixes.windows(2) {
            assert!(pair[1].starts_with(&pair[0]));
        }
        assert_eq!(prefixes.last().map(String::as_str), Some(full));
    }

    #[tokio::test]
    async fn empty_answer_leaves_empty_entry_without_callbacks() {
        let mut t = Transcript::new();
        let mut calls = 0usize;
        let mut on_chunk = |_: &str| calls += 1;
        let idx = reveal(&mut t, RevealPacing::default(), "", Some(&mut on_chunk)).await;
        assert_eq!(calls, 0);
        assert_eq!(t.messages()[idx].text, "");
        assert_eq!(t.len(), 1);
    }
}
