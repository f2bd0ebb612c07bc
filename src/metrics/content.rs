use std::sync::LazyLock;

use regex::Regex;

use super::*;

const TARGET_TOKENS_PER_BLOCK: f64 = 25.0;

/// Content tokens per structural block, against a target of
/// twenty-five. Pages shredded into tiny fragments score low because
/// each block carries too little context to stand alone.
pub(super) fn dom_to_token_ratio(page: &PageRepresentation, flattened: &FlattenedPage) -> Eval {
    if page.blocks.is_empty() {
        let mut eval = Eval::new(0.0);
        eval.issue("page has no content blocks");
        return eval;
    }

    let tokens = text::token_count(&flattened.text) as f64;
    let ratio = tokens / page.blocks.len() as f64;
    let mut eval = Eval::new(ratio / TARGET_TOKENS_PER_BLOCK);
    eval.fact(format!(
        "{tokens:.0} tokens over {} blocks, {ratio:.1} tokens per block",
        page.blocks.len()
    ));
    if ratio < TARGET_TOKENS_PER_BLOCK / 2.0 {
        eval.suggest("merge fragmented markup so each block carries a self-contained statement");
    }
    eval
}

static FAQ_HEADING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(what|how|why|when|where|who|can|does|is|are|should|will)\b")
        .expect("faq heading regex compiles")
});
static STEP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bstep\s+\d+").expect("step marker regex compiles"));

const LIFTABLE_TARGET_PER_1K: f64 = 5.0;

/// Density of list runs, tables, code blocks, FAQ sections, and step
/// sequences per thousand words. These are the units an answer engine
/// can quote without reassembly.
pub(super) fn liftable_units_density(page: &PageRepresentation, flattened: &FlattenedPage) -> Eval {
    if page.blocks.is_empty() {
        let mut eval = Eval::new(0.0);
        eval.issue("page has no content blocks");
        return eval;
    }

    let mut list_runs = 0usize;
    let mut tables = 0usize;
    let mut code_blocks = 0usize;
    let mut in_list = false;
    for block in &page.blocks {
        match block.kind {
            BlockKind::ListItem => {
                if !in_list {
                    list_runs += 1;
                }
                in_list = true;
            }
            other => {
                in_list = false;
                match other {
                    BlockKind::Table => tables += 1,
                    BlockKind::Code => code_blocks += 1,
                    _ => {}
                }
            }
        }
    }

    let faq_sections = sections(page, 50)
        .iter()
        .filter(|section| {
            section.heading.trim_end().ends_with('?') || FAQ_HEADING_RE.is_match(&section.heading)
        })
        .count();
    let step_sequences = usize::from(STEP_RE.find_iter(&flattened.text).count() >= 2);

    let total_units = list_runs + tables + code_blocks + faq_sections + step_sequences;
    let word_count = text::token_count(&flattened.text).max(1);
    let per_1k = total_units as f64 / word_count as f64 * 1000.0;

    let mut eval = Eval::new(per_1k / LIFTABLE_TARGET_PER_1K);
    eval.fact(format!(
        "{total_units} liftable units ({list_runs} lists, {tables} tables, {code_blocks} code blocks, \
         {faq_sections} FAQ sections), {per_1k:.1} per 1k words"
    ));
    if total_units == 0 {
        eval.suggest("add lists or tables for enumerable facts so they can be quoted directly");
    }
    eval
}

static ANSWER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?x)
        ^[A-Z][^.]*\s(?:is|are|means|refers?\sto)\s
        | ^To\s[a-z]+\s
        | ^The\s[a-z]+\s(?:is|are)\s
        | ^Yes[,.]
        | ^No[,.]
        | ^\d",
    )
    .expect("answer pattern regex compiles")
});
static FLUFF_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?ix)
        ^(?:many|most|some)\s+people\s+(?:wonder|ask|think)
        | ^in\s+this\s+(?:article|post|guide)
        | ^(?:have\s+you\s+ever|did\s+you\s+know)
        | ^(?:let's|let\s+us)\s+(?:take\s+a\s+look|explore|dive)
        | ^(?:before|first)\s+we\s+(?:begin|start|dive)
        | ^(?:as\s+you\s+may\s+know|obviously)",
    )
    .expect("fluff pattern regex compiles")
});

/// Fraction of heading-led sections whose body opens with a direct
/// assertion instead of introductory filler.
pub(super) fn answer_first_compliance(page: &PageRepresentation) -> Eval {
    let sections = sections(page, 50);
    if sections.is_empty() {
        let mut eval = Eval::new(0.0);
        eval.issue("no heading-led sections to assess");
        return eval;
    }

    let mut compliant = 0usize;
    let mut direct_answers = 0usize;
    let mut examples: Vec<String> = Vec::new();
    for section in &sections {
        if FLUFF_RE.is_match(&section.body) {
            if examples.len() < 3 {
                examples.push(format!(
                    "'{}' opens with '{}'",
                    section.heading,
                    preview(&section.body, 60)
                ));
            }
            continue;
        }
        // Only detected filler openings fail; an opening that is neither
        // clearly fluff nor clearly an answer still counts as compliant.
        compliant += 1;
        if ANSWER_RE.is_match(&section.body) {
            direct_answers += 1;
        }
    }

    let rate = compliant as f64 / sections.len() as f64;
    let mut eval = Eval::new(rate);
    eval.fact(format!(
        "{compliant} of {} sections avoid filler openings, {direct_answers} open with an explicit assertion",
        sections.len()
    ));
    if !examples.is_empty() {
        eval.issue_with_examples("sections open with filler instead of an answer", examples);
    }
    if direct_answers * 2 < sections.len() {
        eval.suggest("open each section with the definition or figure the heading promises");
    }
    eval
}

const AMBIGUOUS_PRONOUNS: &[&str] = &["it", "this", "that", "they", "these", "those"];

/// Pronouns with no antecedent closer than one sentence away become
/// unresolvable once the text is chunked. A pronoun resolves against a
/// content word earlier in its own sentence or a noun anchor in the
/// previous sentence of the same block. Score = 1 - unresolved / total
/// sentences, counting at most one unresolved pronoun per sentence.
pub(super) fn anaphora_resolution(page: &PageRepresentation) -> Eval {
    let mut total_sentences = 0usize;
    let mut unresolved: Vec<String> = Vec::new();

    for block in &page.blocks {
        if block.kind.is_heading() {
            continue;
        }
        let sentences = text::split_sentences(&block.text);
        total_sentences += sentences.len();

        for (index, sentence) in sentences.iter().enumerate() {
            let words: Vec<String> = sentence
                .split_whitespace()
                .map(|word| {
                    word.trim_matches(|ch: char| !ch.is_alphanumeric()).to_lowercase()
                })
                .collect();
            let previous_anchor = index > 0 && has_noun_anchor(sentences[index - 1]);

            for (position, word) in words.iter().enumerate() {
                if !AMBIGUOUS_PRONOUNS.contains(&word.as_str()) {
                    continue;
                }
                let same_sentence_anchor = words[..position].iter().any(|earlier| {
                    earlier.len() >= 3
                        && !AMBIGUOUS_PRONOUNS.contains(&earlier.as_str())
                        && text::STOPWORDS.iter().all(|stopword| stopword != earlier)
                });
                if !same_sentence_anchor && !previous_anchor {
                    unresolved.push(preview(sentence, 60));
                    break;
                }
            }
        }
    }

    if total_sentences == 0 {
        let mut eval = Eval::new(0.0);
        eval.issue("no body sentences to analyze");
        return eval;
    }

    let score = 1.0 - unresolved.len() as f64 / total_sentences as f64;
    let mut eval = Eval::new(score);
    eval.fact(format!(
        "{} of {total_sentences} sentences carry an unanchored pronoun",
        unresolved.len()
    ));
    if !unresolved.is_empty() {
        unresolved.truncate(3);
        eval.issue_with_examples(
            "pronouns lose their antecedent when the surrounding text is chunked",
            unresolved,
        );
    }
    eval
}

fn has_noun_anchor(sentence: &str) -> bool {
    sentence
        .split_whitespace()
        .skip(1)
        .any(|word| word.chars().next().is_some_and(char::is_uppercase))
}

const GOOD_SIMILARITY: f64 = 0.3;
const EXCELLENT_SIMILARITY: f64 = 0.5;

/// How well headings predict their section text, measured as the share
/// of heading signal tokens that reappear in the following content.
/// Headings are the anchors a retriever matches against.
pub(super) fn heading_predictive_power(page: &PageRepresentation) -> Eval {
    let pairs: Vec<Section> = sections(page, 100)
        .into_iter()
        .filter(|section| {
            section.heading.len() >= 3 && text::token_count(&section.body) >= 10
        })
        .collect();

    if pairs.is_empty() {
        let mut eval = Eval::new(0.0);
        eval.issue("no heading-led sections to assess");
        return eval;
    }

    let mut similarities: Vec<(f64, String)> = Vec::new();
    for section in &pairs {
        let heading_tokens = text::signal_tokens(&section.heading);
        let body_tokens = text::token_set(&section.body);
        let similarity = if heading_tokens.is_empty() {
            0.0
        } else {
            let hits = heading_tokens
                .iter()
                .filter(|token| body_tokens.contains(token.as_str()))
                .count();
            hits as f64 / heading_tokens.len() as f64
        };
        similarities.push((similarity, section.heading.clone()));
    }

    let avg = similarities.iter().map(|(s, _)| s).sum::<f64>() / similarities.len() as f64;
    let score = if avg >= EXCELLENT_SIMILARITY {
        1.0
    } else if avg >= GOOD_SIMILARITY {
        0.7 + 0.3 * (avg - GOOD_SIMILARITY) / (EXCELLENT_SIMILARITY - GOOD_SIMILARITY)
    } else {
        0.7 * avg / GOOD_SIMILARITY
    };

    let mut eval = Eval::new(score);
    eval.fact(format!(
        "average heading/content overlap {avg:.2} over {} sections",
        similarities.len()
    ));
    let weak: Vec<String> = similarities
        .iter()
        .filter(|(similarity, _)| *similarity < GOOD_SIMILARITY)
        .map(|(_, heading)| heading.clone())
        .take(5)
        .collect();
    if !weak.is_empty() {
        eval.issue_with_examples("headings share little vocabulary with their sections", weak);
    }
    eval
}

pub(super) struct Section {
    pub heading: String,
    pub body: String,
}

/// Heading plus up to `word_limit` words of the body that follows it,
/// stopping at the next heading.
pub(super) fn sections(page: &PageRepresentation, word_limit: usize) -> Vec<Section> {
    let mut sections = Vec::new();
    let mut index = 0;

    while index < page.blocks.len() {
        let block = &page.blocks[index];
        if !block.kind.is_heading() {
            index += 1;
            continue;
        }
        let heading = block.text.trim().to_string();
        let mut body_words: Vec<String> = Vec::new();
        let mut next = index + 1;
        while next < page.blocks.len() && !page.blocks[next].kind.is_heading() {
            for word in page.blocks[next].text.split_whitespace() {
                if body_words.len() >= word_limit {
                    break;
                }
                body_words.push(word.to_string());
            }
            if body_words.len() >= word_limit {
                break;
            }
            next += 1;
        }
        if !heading.is_empty() && !body_words.is_empty() {
            sections.push(Section {
                heading,
                body: body_words.join(" "),
            });
        }
        index += 1;
    }

    sections
}
