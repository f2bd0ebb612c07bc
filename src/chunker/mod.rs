use crate::config::AuditConfig;
use crate::model::{Chunk, ChunkStrategy, PageRepresentation};
use crate::text::{self, FlattenedPage};

mod consistency;
mod semantic;
mod sliding;

use consistency::*;
use semantic::*;
use sliding::*;

/// Everything downstream of the chunker: both chunk lists, the agreement
/// score between them, boundary warnings, and the flattened page text the
/// offsets index into.
#[derive(Debug, Clone, Default)]
pub struct ChunkingOutcome {
    pub semantic: Vec<Chunk>,
    pub sliding: Vec<Chunk>,
    pub consistency_score: f64,
    pub warnings: Vec<String>,
    pub flattened: FlattenedPage,
}

pub fn chunk(page: &PageRepresentation, config: &AuditConfig) -> ChunkingOutcome {
    let flattened = text::flatten_blocks(&page.blocks);
    let (semantic, warnings) = semantic_chunks(page, &flattened, config);
    let sliding = sliding_chunks(&flattened, config);
    let consistency_score = consistency_score(&semantic, &sliding);

    ChunkingOutcome {
        semantic,
        sliding,
        consistency_score,
        warnings,
        flattened,
    }
}
