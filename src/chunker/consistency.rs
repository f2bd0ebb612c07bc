use super::*;

pub(super) fn interval_jaccard(a: (usize, usize), b: (usize, usize)) -> f64 {
    let overlap = a.1.min(b.1).saturating_sub(a.0.max(b.0));
    let union = (a.1 - a.0) + (b.1 - b.0) - overlap;
    if union == 0 {
        return 0.0;
    }
    overlap as f64 / union as f64
}

/// Mean best interval overlap between each semantic chunk and the sliding
/// windows. A well-structured page looks similar to a boundary-agnostic
/// splitter; low agreement means naive RAG pipelines will fragment answers.
pub(super) fn consistency_score(semantic: &[Chunk], sliding: &[Chunk]) -> f64 {
    if semantic.is_empty() || sliding.is_empty() {
        return 0.0;
    }

    let total: f64 = semantic
        .iter()
        .map(|chunk| {
            sliding
                .iter()
                .map(|window| {
                    interval_jaccard(
                        (chunk.start_offset, chunk.end_offset),
                        (window.start_offset, window.end_offset),
                    )
                })
                .fold(0.0, f64::max)
        })
        .sum();

    total / semantic.len() as f64
}
