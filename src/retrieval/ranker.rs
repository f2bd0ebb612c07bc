use crate::model::Chunk;
use crate::text;

/// Scores a chunk's relevance to a query. The simulator only needs
/// "some relevance function"; swapping in an embedding-backed scorer is
/// a drop-in replacement.
pub trait RelevanceScorer {
    fn score(&self, query: &str, chunk: &Chunk) -> f64;
}

/// Token-set Jaccard over stopword-filtered signal tokens. Crude but
/// deterministic, and close enough to a BM25-style retriever to expose
/// pages whose chunks cannot be told apart lexically.
#[derive(Debug, Clone, Copy, Default)]
pub struct LexicalScorer;

impl RelevanceScorer for LexicalScorer {
    fn score(&self, query: &str, chunk: &Chunk) -> f64 {
        let query_tokens = text::token_set(query);
        let chunk_tokens = text::token_set(&chunk.text);
        if query_tokens.is_empty() || chunk_tokens.is_empty() {
            return 0.0;
        }
        let intersection = query_tokens.intersection(&chunk_tokens).count();
        let union = query_tokens.len() + chunk_tokens.len() - intersection;
        intersection as f64 / union as f64
    }
}
