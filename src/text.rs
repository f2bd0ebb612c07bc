use std::collections::HashSet;

use crate::model::Block;

pub const STOPWORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "been", "being", "but", "by", "can", "could",
    "did", "do", "does", "for", "from", "had", "has", "have", "how", "if", "in", "into", "is",
    "it", "its", "may", "might", "more", "most", "must", "no", "nor", "not", "of", "on", "once",
    "only", "or", "other", "our", "own", "same", "shall", "should", "so", "some", "such", "than",
    "that", "the", "their", "then", "there", "these", "this", "those", "through", "to", "too",
    "under", "until", "very", "was", "were", "when", "where", "which", "while", "who", "why",
    "will", "with", "would",
];

/// Page text with one span per block, in block order. Blocks are joined
/// with a blank line; empty blocks get a zero-width span so indices stay
/// aligned with block positions.
#[derive(Debug, Clone, Default)]
pub struct FlattenedPage {
    pub text: String,
    pub block_spans: Vec<(usize, usize)>,
}

pub fn flatten_blocks(blocks: &[Block]) -> FlattenedPage {
    let mut text = String::new();
    let mut block_spans = Vec::with_capacity(blocks.len());

    for block in blocks {
        let trimmed = block.text.trim();
        if trimmed.is_empty() {
            let at = text.len();
            block_spans.push((at, at));
            continue;
        }
        if !text.is_empty() {
            text.push_str("\n\n");
        }
        let start = text.len();
        text.push_str(trimmed);
        block_spans.push((start, text.len()));
    }

    FlattenedPage { text, block_spans }
}

pub fn token_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Splits on sentence-final punctuation followed by whitespace. Headings and
/// fragments without terminal punctuation come back as a single sentence.
pub fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let bytes = text.as_bytes();
    let mut start = 0;
    let mut index = 0;

    while index < bytes.len() {
        if matches!(bytes[index], b'.' | b'!' | b'?') {
            let mut end = index + 1;
            while end < bytes.len() && matches!(bytes[end], b'.' | b'!' | b'?') {
                end += 1;
            }
            if end >= bytes.len() || bytes[end].is_ascii_whitespace() {
                let sentence = text[start..end].trim();
                if !sentence.is_empty() {
                    sentences.push(sentence);
                }
                start = end;
            }
            index = end;
        } else {
            index += 1;
        }
    }

    let tail = text[start..].trim();
    if !tail.is_empty() {
        sentences.push(tail);
    }
    sentences
}

/// Offsets in `text` where a chunk may legally start or end: the text
/// edges, positions right after sentence-final punctuation, positions
/// around newlines, and the start of the sentence that follows.
pub fn sentence_boundaries(text: &str) -> HashSet<usize> {
    let bytes = text.as_bytes();
    let mut boundaries = HashSet::new();
    boundaries.insert(0);
    boundaries.insert(bytes.len());

    let mut index = 0;
    while index < bytes.len() {
        match bytes[index] {
            b'.' | b'!' | b'?' => {
                let mut end = index + 1;
                while end < bytes.len() && matches!(bytes[end], b'.' | b'!' | b'?') {
                    end += 1;
                }
                if end >= bytes.len() || bytes[end].is_ascii_whitespace() {
                    boundaries.insert(end);
                    let mut next = end;
                    while next < bytes.len() && bytes[next].is_ascii_whitespace() {
                        next += 1;
                    }
                    boundaries.insert(next);
                }
                index = end;
            }
            b'\n' => {
                boundaries.insert(index);
                boundaries.insert(index + 1);
                index += 1;
            }
            _ => index += 1,
        }
    }

    boundaries
}

/// Lowercased, stopword-filtered tokens of length >= 3, sorted and deduped.
pub fn signal_tokens(text: &str) -> Vec<String> {
    let mut tokens = text
        .to_lowercase()
        .split(|ch: char| !ch.is_alphanumeric())
        .filter(|token| token.len() >= 3)
        .filter(|token| STOPWORDS.iter().all(|stopword| stopword != token))
        .map(str::to_string)
        .collect::<Vec<String>>();
    tokens.sort();
    tokens.dedup();
    tokens
}

pub fn token_set(text: &str) -> HashSet<String> {
    signal_tokens(text).into_iter().collect()
}

/// Capitalized multi-word spans, the cheap stand-in for named entities.
pub fn capitalized_spans(text: &str) -> Vec<String> {
    let mut spans = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for word in text.split_whitespace() {
        let cleaned = word.trim_matches(|ch: char| !ch.is_alphanumeric());
        let is_capitalized = cleaned
            .chars()
            .next()
            .is_some_and(|ch| ch.is_uppercase())
            && cleaned.chars().skip(1).all(|ch| ch.is_lowercase())
            && cleaned.len() > 1;

        if is_capitalized {
            current.push(cleaned);
        } else {
            if current.len() >= 2 {
                spans.push(current.join(" "));
            }
            current.clear();
        }
    }
    if current.len() >= 2 {
        spans.push(current.join(" "));
    }

    spans.sort();
    spans.dedup();
    spans
}
