use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use super::*;
use crate::chunker::ChunkingOutcome;
use crate::dedup::{SHINGLE_K, shingle_signature, similarity};

/// Fraction of semantic chunks whose start and end offsets both land on
/// sentence boundaries of the flattened text. A mid-sentence split hands
/// the retriever half a claim.
pub(super) fn chunk_boundary_integrity(chunks: &ChunkingOutcome) -> Eval {
    if chunks.semantic.is_empty() {
        let mut eval = Eval::new(0.0);
        eval.issue("no chunks produced, nothing for a retriever to index");
        for warning in &chunks.warnings {
            eval.issue(warning.clone());
        }
        return eval;
    }

    let boundaries = text::sentence_boundaries(&chunks.flattened.text);
    let mut broken: Vec<String> = Vec::new();
    let mut clean = 0usize;
    for chunk in &chunks.semantic {
        if boundaries.contains(&chunk.start_offset) && boundaries.contains(&chunk.end_offset) {
            clean += 1;
        } else if broken.len() < 3 {
            let tail_start = chunk.text.len().saturating_sub(50);
            let mut at = tail_start;
            while !chunk.text.is_char_boundary(at) {
                at += 1;
            }
            broken.push(format!("{} ends at '...{}'", chunk.id, &chunk.text[at..]));
        }
    }

    let mut eval = Eval::new(clean as f64 / chunks.semantic.len() as f64);
    eval.fact(format!(
        "{clean} of {} chunks close on sentence boundaries",
        chunks.semantic.len()
    ));
    if !broken.is_empty() {
        eval.issue_with_examples("chunks split mid-sentence", broken);
    }
    for warning in &chunks.warnings {
        eval.issue(warning.clone());
    }
    eval
}

static BOILERPLATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?ix)
        cookie\s*(policy|consent|notice)
        | privacy\s*policy
        | terms\s*(of|and)\s*(service|use)
        | subscribe\s*to\s*(our|the)\s*newsletter
        | follow\s*us\s*on
        | all\s*rights\s*reserved
        | ©\s*\d{4}
        | sign\s*up\s*for
        | share\s*(this|on)",
    )
    .expect("boilerplate regex compiles")
});

const MIN_BLOCK_WORDS: usize = 10;
const NEAR_DUPLICATE_THRESHOLD: f64 = 0.8;

/// Share of body words tied up in repeated or boilerplate blocks. Score
/// is 1 at zero repetition and reaches 0 when half the words are noise.
pub(super) fn duplicate_boilerplate_rate(page: &PageRepresentation) -> Eval {
    if page.blocks.is_empty() {
        let mut eval = Eval::new(0.0);
        eval.issue("page has no content blocks");
        return eval;
    }

    let blocks: Vec<&str> = page
        .blocks
        .iter()
        .filter(|block| !block.kind.is_heading())
        .map(|block| block.text.trim())
        .filter(|body| text::token_count(body) >= MIN_BLOCK_WORDS)
        .collect();

    if blocks.is_empty() {
        let mut eval = Eval::new(1.0);
        eval.fact("no blocks long enough to repeat");
        return eval;
    }

    let signatures: Vec<HashSet<u64>> = blocks
        .iter()
        .map(|body| shingle_signature(body, SHINGLE_K))
        .collect();

    let mut problematic: HashSet<usize> = HashSet::new();
    for left in 0..blocks.len() {
        for right in left + 1..blocks.len() {
            if similarity(&signatures[left], &signatures[right]) >= NEAR_DUPLICATE_THRESHOLD {
                problematic.insert(left);
                problematic.insert(right);
            }
        }
    }
    let duplicate_count = problematic.len();
    for (index, body) in blocks.iter().enumerate() {
        if BOILERPLATE_RE.is_match(body) {
            problematic.insert(index);
        }
    }

    let total_words: usize = blocks.iter().map(|body| text::token_count(body)).sum();
    let problem_words: usize = problematic
        .iter()
        .map(|&index| text::token_count(blocks[index]))
        .sum();
    let rate = problem_words as f64 / total_words as f64;

    let mut eval = Eval::new(1.0 - 2.0 * rate);
    eval.fact(format!(
        "{:.0}% of body words sit in {} repeated or boilerplate blocks ({duplicate_count} near-duplicates)",
        rate * 100.0,
        problematic.len()
    ));
    if !problematic.is_empty() {
        let mut indices: Vec<usize> = problematic.into_iter().collect();
        indices.sort_unstable();
        let examples = indices
            .into_iter()
            .take(3)
            .map(|index| preview(blocks[index], 50))
            .collect();
        eval.issue_with_examples(
            "repeated text pollutes embeddings and crowds out unique content",
            examples,
        );
    }
    eval
}
