//! Sentence-aware document chunking for embedding

/// Chunking defaults
pub const DEFAULT_MAX_WORDS: usize = 500;
pub const DEFAULT_OVERLAP_WORDS: usize = 50;

/// Document chunk
#[derive(Debug, Clone, PartialEq)]
pub struct Chunk {
    pub text: String,
    /// Position in the corpus-wide chunk sequence, stable for the run
    pub source_index: usize,
}

/// Split text into sentences on `.`, `!` or `?` followed by whitespace.
///
/// The trailing segment is kept as a sentence even without end punctuation.
/// Whitespace-only segments are dropped.
pub fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut prev_terminator = false;

    for (idx, ch) in text.char_indices() {
        if prev_terminator && ch.is_whitespace() {
            let sentence = text[start..idx].trim();
            if !sentence.is_empty() {
                sentences.push(sentence);
            }
            start = idx;
        }
        prev_terminator = matches!(ch, '.' | '!' | '?');
    }

    let tail = text[start..].trim();
    if !tail.is_empty() {
        sentences.push(tail);
    }

    sentences
}

/// Split text into word-bounded, overlapping chunks at sentence boundaries.
///
/// Sentences accumulate into a buffer until appending the next one would
/// exceed `max_words`; the buffer is then emitted and reseeded with its last
/// `overlap_words` words. A single sentence longer than `max_words` is never
/// split and becomes its own chunk. Purely a function of its inputs.
pub fn split(text: &str, max_words: usize, overlap_words: usize) -> Vec<Chunk> {
    let mut chunks: Vec<Chunk> = Vec::new();
    let mut buffer: Vec<&str> = Vec::new();

    for sentence in split_sentences(text) {
        let words: Vec<&str> = sentence.split_whitespace().collect();
        if words.is_empty() {
            continue;
        }

        if !buffer.is_empty() && buffer.len() + words.len() > max_words {
            let seed_from = buffer.len().saturating_sub(overlap_words);
            let seed: Vec<&str> = if overlap_words > 0 {
                buffer[seed_from..].to_vec()
            } else {
                Vec::new()
            };

            chunks.push(Chunk {
                text: buffer.join(" "),
                source_index: chunks.len(),
            });
            buffer = seed;
        }

        buffer.extend(words);
    }

    if !buffer.is_empty() {
        chunks.push(Chunk {
            text: buffer.join(" "),
            source_index: chunks.len(),
        });
    }

    chunks
}
