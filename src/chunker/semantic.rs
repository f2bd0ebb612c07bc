use std::collections::HashSet;

use super::*;
use crate::dedup::{SHINGLE_K, shingle_signature, similarity};

#[derive(Default)]
struct PendingChunk {
    block_ids: Vec<usize>,
    pieces: Vec<String>,
    start_offset: Option<usize>,
    end_offset: usize,
    token_total: usize,
    has_body: bool,
}

impl PendingChunk {
    fn push(&mut self, block_id: usize, span: (usize, usize), piece: &str, is_body: bool) {
        self.block_ids.push(block_id);
        if span.0 < span.1 {
            self.pieces.push(piece.to_string());
            if self.start_offset.is_none() {
                self.start_offset = Some(span.0);
            }
            self.end_offset = span.1;
            self.token_total += text::token_count(piece);
        }
        if is_body && span.0 < span.1 {
            self.has_body = true;
        }
    }

    fn take(&mut self) -> PendingChunk {
        std::mem::take(self)
    }

    fn into_chunk(self, index: usize) -> Chunk {
        Chunk {
            id: format!("semantic:{index:04}"),
            strategy: ChunkStrategy::Semantic,
            text: self.pieces.join("\n\n"),
            start_offset: self.start_offset.unwrap_or(0),
            end_offset: self.end_offset,
            source_block_ids: self.block_ids,
        }
    }
}

/// Heading- and budget-driven chunking. Chunks close only at block ends,
/// which are paragraph boundaries in the flattened text, so a sentence is
/// never split. A chunk must carry at least one body block; headings with
/// no following body are dropped with a warning.
pub(super) fn semantic_chunks(
    page: &PageRepresentation,
    flattened: &FlattenedPage,
    config: &AuditConfig,
) -> (Vec<Chunk>, Vec<String>) {
    let mut chunks: Vec<Chunk> = Vec::new();
    let mut warnings: Vec<String> = Vec::new();
    let mut seen_signatures: Vec<HashSet<u64>> = Vec::new();
    let mut pending = PendingChunk::default();

    for (block_id, block) in page.blocks.iter().enumerate() {
        let span = flattened.block_spans[block_id];
        let piece = block.text.trim();

        if block.kind.is_heading() {
            if pending.has_body {
                let closed = pending.take();
                chunks.push(closed.into_chunk(chunks.len()));
            }
            pending.push(block_id, span, piece, false);
            continue;
        }

        // Repeated nav/footer text would otherwise land in several chunks
        // and drown out the unique content during retrieval.
        if span.0 < span.1 {
            let signature = shingle_signature(piece, SHINGLE_K);
            let is_repeat = seen_signatures
                .iter()
                .any(|seen| similarity(seen, &signature) >= config.duplicate_similarity_threshold);
            if is_repeat {
                warnings.push(format!(
                    "near-duplicate block at position {} excluded from chunking",
                    block.position
                ));
                continue;
            }
            seen_signatures.push(signature);
        }

        pending.push(block_id, span, piece, true);

        if pending.has_body && pending.token_total >= config.chunk_max_tokens {
            let closed = pending.take();
            chunks.push(closed.into_chunk(chunks.len()));
        }
    }

    if pending.has_body {
        let closed = pending.take();
        chunks.push(closed.into_chunk(chunks.len()));
    } else if !pending.block_ids.is_empty() {
        warnings.push("trailing heading with no body text dropped".to_string());
    }

    (chunks, warnings)
}
