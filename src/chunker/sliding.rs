use super::*;

fn token_spans(text: &str) -> Vec<(usize, usize)> {
    let mut spans = Vec::new();
    let mut start: Option<usize> = None;

    for (index, ch) in text.char_indices() {
        if ch.is_whitespace() {
            if let Some(token_start) = start.take() {
                spans.push((token_start, index));
            }
        } else if start.is_none() {
            start = Some(index);
        }
    }
    if let Some(token_start) = start {
        spans.push((token_start, text.len()));
    }

    spans
}

fn blocks_overlapping(flattened: &FlattenedPage, start: usize, end: usize) -> Vec<usize> {
    flattened
        .block_spans
        .iter()
        .enumerate()
        .filter(|(_, (block_start, block_end))| {
            block_start < block_end && *block_start < end && *block_end > start
        })
        .map(|(block_id, _)| block_id)
        .collect()
}

/// Fixed token windows over the flattened text, ignoring structure. The
/// last window is truncated, never padded.
pub(super) fn sliding_chunks(flattened: &FlattenedPage, config: &AuditConfig) -> Vec<Chunk> {
    let spans = token_spans(&flattened.text);
    if spans.is_empty() {
        return Vec::new();
    }

    let window = config.sliding_window_tokens;
    let stride = config.sliding_stride_tokens;
    let mut chunks = Vec::new();
    let mut start_token = 0;

    loop {
        let end_token = (start_token + window).min(spans.len());
        let start_offset = spans[start_token].0;
        let end_offset = spans[end_token - 1].1;

        chunks.push(Chunk {
            id: format!("sliding:{:04}", chunks.len()),
            strategy: ChunkStrategy::Sliding,
            text: flattened.text[start_offset..end_offset].to_string(),
            start_offset,
            end_offset,
            source_block_ids: blocks_overlapping(flattened, start_offset, end_offset),
        });

        if end_token == spans.len() {
            break;
        }
        start_token += stride;
    }

    chunks
}
