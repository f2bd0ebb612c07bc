use crate::chunker::ChunkingOutcome;
use crate::model::{Chunk, PageRepresentation, RetrievalStats};

mod queries;
mod ranker;

pub use queries::generate_queries;
pub use ranker::{LexicalScorer, RelevanceScorer};

const TOP_K: usize = 5;

/// Stress-tests the page against its own chunks: synthetic queries are
/// ranked over every chunk from both strategies, and recall is measured
/// against the semantic chunk each query was derived from. Ties break
/// by position (earlier wins) so rankings are reproducible.
pub fn simulate(
    page: &PageRepresentation,
    chunks: &ChunkingOutcome,
    scorer: &dyn RelevanceScorer,
) -> RetrievalStats {
    let queries = generate_queries(page, &chunks.semantic);
    if queries.is_empty() {
        return RetrievalStats::insufficient();
    }

    let pool: Vec<&Chunk> = chunks.semantic.iter().chain(chunks.sliding.iter()).collect();
    let mut hits_at_1 = 0usize;
    let mut hits_at_5 = 0usize;

    for query in &queries {
        let mut ranked: Vec<(f64, &Chunk)> = pool
            .iter()
            .map(|&chunk| (scorer.score(&query.text, chunk), chunk))
            .collect();
        ranked.sort_by(|left, right| {
            right
                .0
                .total_cmp(&left.0)
                .then_with(|| left.1.start_offset.cmp(&right.1.start_offset))
                .then_with(|| left.1.id.cmp(&right.1.id))
        });

        let top: Vec<&str> = ranked
            .iter()
            .take(TOP_K)
            .map(|(_, chunk)| chunk.id.as_str())
            .collect();
        if top.first() == Some(&query.expected_chunk_id.as_str()) {
            hits_at_1 += 1;
        }
        if top.contains(&query.expected_chunk_id.as_str()) {
            hits_at_5 += 1;
        }
    }

    RetrievalStats {
        recall_at_1: Some(hits_at_1 as f64 / queries.len() as f64),
        recall_at_5: Some(hits_at_5 as f64 / queries.len() as f64),
        query_count: queries.len(),
    }
}
