use std::sync::LazyLock;

use regex::Regex;

use crate::model::{Chunk, PageRepresentation, SyntheticQuery};
use crate::text;

pub(super) const MAX_QUERIES: usize = 20;
pub(super) const MIN_QUALIFYING_CHUNKS: usize = 3;

static MONEY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\s?\d[\d,]*(?:\.\d{2})?").expect("money regex compiles"));
static DATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:19|20)\d{2}\b|\d{4}-\d{2}-\d{2}|[A-Z][a-z]+\s+\d{1,2},\s+\d{4}")
        .expect("date regex compiles")
});
static NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d").expect("number regex compiles"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum FactKind {
    Entity,
    Quantity,
    Date,
    Monetary,
}

/// The most specific fact present in any sentence of the chunk, or
/// `None` when the chunk carries nothing a user would ask about.
/// Specificity order: money beats dates beats bare numbers beats named
/// entities.
fn extractable_fact(chunk: &Chunk) -> Option<FactKind> {
    let mut best: Option<FactKind> = None;
    for sentence in text::split_sentences(&chunk.text) {
        let kind = if MONEY_RE.is_match(sentence) {
            FactKind::Monetary
        } else if DATE_RE.is_match(sentence) {
            FactKind::Date
        } else if NUMBER_RE.is_match(sentence) {
            FactKind::Quantity
        } else if !text::capitalized_spans(sentence).is_empty() {
            FactKind::Entity
        } else {
            continue;
        };
        best = Some(best.map_or(kind, |current| current.max(kind)));
    }
    best
}

/// The phrase a user would name the chunk by: its heading if it has
/// one, otherwise its most prominent entity, otherwise the page title.
fn subject(page: &PageRepresentation, chunk: &Chunk) -> Option<String> {
    for &block_id in &chunk.source_block_ids {
        if let Some(block) = page.blocks.get(block_id) {
            if block.kind.is_heading() {
                let heading = block.text.trim();
                if !heading.is_empty() {
                    return Some(heading.trim_end_matches(['?', ':', '.']).to_string());
                }
            }
        }
    }
    if let Some(entity) = text::capitalized_spans(&chunk.text).into_iter().next() {
        return Some(entity);
    }
    let title = page.title.trim();
    (!title.is_empty()).then(|| title.to_string())
}

fn render(kind: FactKind, subject: &str) -> String {
    match kind {
        FactKind::Monetary => format!("How much does {subject} cost?"),
        FactKind::Date => format!("When was {subject} updated?"),
        FactKind::Quantity | FactKind::Entity => format!("What is {subject}?"),
    }
}

/// One templated query per fact-bearing semantic chunk, capped at
/// twenty. Fewer than three qualifying chunks yields no queries at all:
/// a page without facts to ask about is not "bad at retrieval", it is
/// unmeasurable.
pub fn generate_queries(page: &PageRepresentation, semantic: &[Chunk]) -> Vec<SyntheticQuery> {
    let mut queries: Vec<SyntheticQuery> = Vec::new();
    for chunk in semantic {
        let Some(kind) = extractable_fact(chunk) else {
            continue;
        };
        let Some(subject) = subject(page, chunk) else {
            continue;
        };
        queries.push(SyntheticQuery {
            text: render(kind, &subject),
            expected_chunk_id: chunk.id.clone(),
        });
    }

    if queries.len() < MIN_QUALIFYING_CHUNKS {
        return Vec::new();
    }
    queries.truncate(MAX_QUERIES);
    queries
}
