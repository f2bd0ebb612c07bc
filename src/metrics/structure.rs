use super::*;

/// Score = 1 - (level skips / heading transitions). A page with no
/// headings at all scores zero; a single heading has no transitions and
/// scores full marks.
pub(super) fn heading_hierarchy_validity(page: &PageRepresentation) -> Eval {
    let headings: Vec<(u8, &str)> = page
        .blocks
        .iter()
        .filter_map(|block| {
            block
                .kind
                .heading_level()
                .map(|level| (level, block.text.trim()))
        })
        .collect();

    if headings.is_empty() {
        let mut eval = Eval::new(0.0);
        eval.issue("no heading structure");
        eval.suggest("add headings so sections can be addressed and retrieved on their own");
        return eval;
    }

    let transitions = headings.len().saturating_sub(1);
    let mut skips: Vec<String> = Vec::new();
    for pair in headings.windows(2) {
        let (from, _) = pair[0];
        let (to, text) = pair[1];
        if to > from + 1 {
            skips.push(format!("H{from} -> H{to} at '{}'", preview(text, 40)));
        }
    }

    let score = if transitions == 0 {
        1.0
    } else {
        1.0 - skips.len() as f64 / transitions as f64
    };

    let mut eval = Eval::new(score);
    let h1_count = headings.iter().filter(|(level, _)| *level == 1).count();
    eval.fact(format!(
        "{} headings, {} level transitions, {} skipped levels",
        headings.len(),
        transitions,
        skips.len()
    ));
    if !skips.is_empty() {
        eval.issue_with_examples("heading levels are skipped", skips);
    }
    if h1_count == 0 {
        eval.suggest("add a single H1 naming the page topic");
    } else if h1_count > 1 {
        eval.suggest(format!("page has {h1_count} H1 headings, keep exactly one"));
    }
    eval
}

const MAX_OUTLINE_DEPTH: usize = 6;
const AVG_OUTLINE_DEPTH: f64 = 4.0;

/// Depth of each body block in the heading outline. Deeply nested
/// sections fragment poorly when chunked.
pub(super) fn semantic_tree_depth(page: &PageRepresentation) -> Eval {
    if page.blocks.is_empty() {
        let mut eval = Eval::new(0.0);
        eval.issue("page has no content blocks");
        return eval;
    }

    let mut depths: Vec<usize> = Vec::new();
    let mut current_level: usize = 0;
    for block in &page.blocks {
        match block.kind.heading_level() {
            Some(level) => {
                current_level = level as usize;
                depths.push(current_level);
            }
            None => depths.push(current_level + 1),
        }
    }

    let max_depth = depths.iter().copied().max().unwrap_or(0);
    let avg_depth = depths.iter().sum::<usize>() as f64 / depths.len() as f64;

    let mut score = 1.0;
    if max_depth > MAX_OUTLINE_DEPTH {
        score -= 0.05 * (max_depth - MAX_OUTLINE_DEPTH) as f64;
    }
    if avg_depth > AVG_OUTLINE_DEPTH {
        score -= 0.03 * (avg_depth - AVG_OUTLINE_DEPTH);
    }

    let mut eval = Eval::new(score);
    eval.fact(format!(
        "outline depth max {max_depth}, average {avg_depth:.1} over {} blocks",
        depths.len()
    ));
    if max_depth > MAX_OUTLINE_DEPTH {
        eval.issue(format!(
            "outline nests {max_depth} levels deep, sections this deep detach from their context"
        ));
    }
    eval
}

const GOOD_BODY_WORDS: usize = 100;
const PARTIAL_BODY_WORDS: usize = 50;

/// Whether an extractor pointed at this page would come away with a
/// usable article body.
pub(super) fn main_content_detectability(
    page: &PageRepresentation,
    flattened: &FlattenedPage,
) -> Eval {
    let word_count = text::token_count(&flattened.text);
    let has_structure = page.blocks.iter().any(|block| block.kind.is_heading()) && page.blocks.len() >= 2;

    let score = if word_count >= GOOD_BODY_WORDS && has_structure {
        1.0
    } else if word_count >= GOOD_BODY_WORDS {
        0.6
    } else if word_count >= PARTIAL_BODY_WORDS {
        0.3
    } else {
        0.0
    };

    let mut eval = Eval::new(score);
    eval.fact(format!(
        "{word_count} body words across {} blocks",
        page.blocks.len()
    ));
    if word_count < PARTIAL_BODY_WORDS {
        eval.issue("too little body text to extract a main content region");
    } else if !has_structure {
        eval.suggest("segment the body with headings so extractors can isolate the article");
    }
    eval
}
