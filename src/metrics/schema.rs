use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use super::*;

const MAX_WALK_DEPTH: usize = 5;
const NAME_KEYS: &[&str] = &["name", "headline", "title", "author", "brand", "manufacturer"];
const STOP_SPANS: &[&str] = &["For Example", "In Addition", "As A Result"];

/// Fraction of named entities in the body that are backed by a name or
/// type in the structured data. Schema-backed entities are the ones an
/// answer engine can cross-verify.
pub(super) fn entity_schema_mapping(page: &PageRepresentation, flattened: &FlattenedPage) -> Eval {
    let entities: Vec<String> = text::capitalized_spans(&flattened.text)
        .into_iter()
        .filter(|span| !STOP_SPANS.contains(&span.as_str()))
        .collect();

    if entities.is_empty() {
        let mut eval = Eval::new(0.0);
        eval.issue("no named entities detected in body text");
        return eval;
    }

    let mut schema_names: HashSet<String> = HashSet::new();
    for block in &page.schema_blocks {
        if let Some(schema_type) = &block.schema_type {
            schema_names.insert(schema_type.to_lowercase());
        }
        collect_names(&block.value, 0, &mut schema_names);
    }

    let mut unmapped: Vec<String> = Vec::new();
    let mut matched = 0usize;
    for entity in &entities {
        let lowered = entity.to_lowercase();
        let hit = schema_names
            .iter()
            .any(|name| name.contains(&lowered) || lowered.contains(name.as_str()));
        if hit {
            matched += 1;
        } else {
            unmapped.push(entity.clone());
        }
    }

    let mut eval = Eval::new(matched as f64 / entities.len() as f64);
    eval.fact(format!(
        "{matched} of {} entities appear in structured data",
        entities.len()
    ));
    if !unmapped.is_empty() {
        unmapped.truncate(5);
        eval.issue_with_examples("entities without structured-data backing", unmapped);
    }
    eval
}

fn collect_names(value: &Value, depth: usize, out: &mut HashSet<String>) {
    if depth > MAX_WALK_DEPTH {
        return;
    }
    match value {
        Value::Object(map) => {
            for key in NAME_KEYS {
                match map.get(*key) {
                    Some(Value::String(name)) => {
                        out.insert(name.to_lowercase());
                    }
                    Some(Value::Object(inner)) => {
                        if let Some(Value::String(name)) = inner.get("name") {
                            out.insert(name.to_lowercase());
                        }
                    }
                    _ => {}
                }
            }
            for nested in map.values() {
                collect_names(nested, depth + 1, out);
            }
        }
        Value::Array(items) => {
            for item in items {
                collect_names(item, depth + 1, out);
            }
        }
        _ => {}
    }
}

struct IntentRule {
    name: &'static str,
    patterns: &'static [&'static str],
    expected: &'static [&'static str],
}

const INTENT_RULES: &[IntentRule] = &[
    IntentRule {
        name: "article",
        patterns: &[r"publish", r"author", r"posted", r"written\s+by", r"article", r"blog"],
        expected: &["Article", "NewsArticle", "BlogPosting"],
    },
    IntentRule {
        name: "product",
        patterns: &[r"price", r"\$\d+", r"add\s+to\s+cart", r"buy\s+now", r"product", r"shop"],
        expected: &["Product", "Offer"],
    },
    IntentRule {
        name: "how-to",
        patterns: &[r"step\s+\d+", r"how\s+to", r"tutorial", r"guide", r"instructions"],
        expected: &["HowTo", "Article"],
    },
    IntentRule {
        name: "faq",
        patterns: &[r"faq", r"frequently\s+asked", r"questions?\s+and\s+answers?"],
        expected: &["FAQPage", "Question"],
    },
    IntentRule {
        name: "recipe",
        patterns: &[r"ingredients?", r"servings?", r"cook\s+time", r"prep\s+time", r"recipe"],
        expected: &["Recipe"],
    },
    IntentRule {
        name: "event",
        patterns: &[r"event", r"date:", r"location:", r"register", r"tickets?"],
        expected: &["Event"],
    },
    IntentRule {
        name: "local-business",
        patterns: &[r"hours:", r"address:", r"phone:", r"contact\s+us", r"location"],
        expected: &["LocalBusiness", "Organization"],
    },
];

static INTENT_PATTERNS: LazyLock<Vec<Vec<Regex>>> = LazyLock::new(|| {
    INTENT_RULES
        .iter()
        .map(|rule| {
            rule.patterns
                .iter()
                .map(|pattern| {
                    Regex::new(&format!("(?i){pattern}")).expect("intent regex compiles")
                })
                .collect()
        })
        .collect()
});

const MIN_INTENT_CONFIDENCE: f64 = 0.2;

/// Whether the page declares the schema type its content calls for: a
/// how-to page with HowTo markup, a product page with Product markup.
pub(super) fn schema_coverage_by_intent(
    page: &PageRepresentation,
    flattened: &FlattenedPage,
) -> Eval {
    if flattened.text.is_empty() {
        let mut eval = Eval::new(0.0);
        eval.issue("no body text to infer intent from");
        return eval;
    }

    let combined = format!("{} {}", page.title, flattened.text);
    let mut best: Option<(&IntentRule, f64)> = None;
    for (rule, patterns) in INTENT_RULES.iter().zip(INTENT_PATTERNS.iter()) {
        let matches = patterns
            .iter()
            .filter(|pattern| pattern.is_match(&combined))
            .count();
        let confidence = matches as f64 / rule.patterns.len() as f64;
        if confidence > best.as_ref().map_or(0.0, |(_, c)| *c) {
            best = Some((rule, confidence));
        }
    }
    let detected = best.filter(|(_, confidence)| *confidence >= MIN_INTENT_CONFIDENCE);

    let found_types = schema_types(page);
    match detected {
        None => {
            let mut eval = Eval::new(0.7);
            eval.fact("page intent unclear, schema appropriateness not assessable");
            eval
        }
        Some((rule, confidence)) => {
            let matched = rule
                .expected
                .iter()
                .any(|expected| found_types.contains(*expected));
            let score = if matched {
                1.0
            } else if !found_types.is_empty() {
                0.5
            } else {
                0.0
            };
            let mut eval = Eval::new(score);
            eval.fact(format!(
                "detected intent '{}' (confidence {confidence:.2}), expected one of {:?}",
                rule.name, rule.expected
            ));
            if !matched {
                if found_types.is_empty() {
                    eval.issue("page carries no structured data at all");
                } else {
                    eval.issue(format!(
                        "schema types {:?} do not match the page intent",
                        found_types.iter().collect::<Vec<_>>()
                    ));
                }
            }
            eval
        }
    }
}

fn schema_types(page: &PageRepresentation) -> HashSet<String> {
    let mut types = HashSet::new();
    for block in &page.schema_blocks {
        if let Some(schema_type) = &block.schema_type {
            types.insert(schema_type.clone());
        }
        collect_types(&block.value, 0, &mut types);
    }
    types
}

fn collect_types(value: &Value, depth: usize, out: &mut HashSet<String>) {
    if depth > MAX_WALK_DEPTH {
        return;
    }
    match value {
        Value::Object(map) => {
            if let Some(Value::String(schema_type)) = map.get("@type") {
                out.insert(schema_type.clone());
            }
            for nested in map.values() {
                collect_types(nested, depth + 1, out);
            }
        }
        Value::Array(items) => {
            for item in items {
                collect_types(item, depth + 1, out);
            }
        }
        _ => {}
    }
}

fn has_key(value: &Value, key: &str, depth: usize) -> bool {
    if depth > MAX_WALK_DEPTH {
        return false;
    }
    match value {
        Value::Object(map) => {
            map.contains_key(key)
                || map.values().any(|nested| has_key(nested, key, depth + 1))
        }
        Value::Array(items) => items.iter().any(|item| has_key(item, key, depth + 1)),
        _ => false,
    }
}

/// Completeness of the structured data (typed, named, with @context)
/// weighted at 60%, plus 40% for cross-linking relationships: @id,
/// sameAs, author, publisher, mentions, breadcrumbs.
pub(super) fn schema_quality_relationships(page: &PageRepresentation) -> Eval {
    if page.schema_blocks.is_empty() {
        let mut eval = Eval::new(0.0);
        eval.issue("no structured data found");
        eval.suggest("add JSON-LD describing the page's primary entity");
        return eval;
    }

    let untyped = page
        .schema_blocks
        .iter()
        .filter(|block| block.schema_type.is_none())
        .count();
    let unnamed = page
        .schema_blocks
        .iter()
        .filter(|block| {
            !NAME_KEYS
                .iter()
                .take(3)
                .any(|key| block.value.get(*key).is_some())
        })
        .count();
    let has_context = page
        .schema_blocks
        .iter()
        .any(|block| block.value.get("@context").is_some());

    let mut completeness = 1.0;
    completeness -= 0.2 * untyped.min(3) as f64;
    completeness -= 0.05 * unnamed.min(3) as f64;
    if !has_context {
        completeness -= 0.1;
    }
    let completeness = completeness.max(0.0);

    let has_id = page.schema_blocks.iter().any(|block| block.schema_id.is_some());
    let any = |key: &str| page.schema_blocks.iter().any(|block| has_key(&block.value, key, 0));
    let has_same_as = any("sameAs");
    let has_author = any("author");
    let has_publisher = any("publisher");
    let has_mentions = any("mentions");
    let has_breadcrumbs = schema_types(page).contains("BreadcrumbList");

    let mut relationship = 0.0;
    if has_id {
        relationship += 0.2;
    }
    if has_same_as {
        relationship += 0.2;
    }
    if has_author {
        relationship += 0.25;
    }
    if has_publisher {
        relationship += 0.15;
    }
    if has_mentions {
        relationship += 0.1;
    }
    if has_breadcrumbs {
        relationship += 0.1;
    }

    let mut score = completeness * 0.6 + relationship * 0.4;
    if has_breadcrumbs {
        score = (score + 0.1).min(1.0);
    }

    let mut eval = Eval::new(score);
    eval.fact(format!(
        "{} schema blocks, completeness {completeness:.2}, relationship coverage {relationship:.2}",
        page.schema_blocks.len()
    ));
    if untyped > 0 {
        eval.issue(format!("{untyped} schema blocks carry no @type"));
    }
    if !has_author && !has_publisher {
        eval.suggest("link the content to its author and publisher in the schema graph");
    }
    eval
}
