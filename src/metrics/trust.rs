use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use super::*;

const NAV_ANCHOR_WORDS: &[&str] = &[
    "home", "about", "contact", "menu", "twitter", "facebook", "instagram", "linkedin", "share",
    "comment", "reply",
];
const MIN_ANCHOR_WORDS: usize = 3;
const CITATION_TARGET_PER_1K: f64 = 3.0;

/// External links with descriptive anchor text per thousand words.
/// Three well-labelled outbound sources per thousand words scores full
/// marks; bare "click here" anchors and nav links do not count.
pub(super) fn citation_source_density(page: &PageRepresentation, flattened: &FlattenedPage) -> Eval {
    let word_count = text::token_count(&flattened.text);
    if word_count == 0 {
        let mut eval = Eval::new(0.0);
        eval.issue("no body text to attribute");
        return eval;
    }

    let external: Vec<&Link> = page.links.iter().filter(|link| link.is_external).collect();
    if external.is_empty() {
        let mut eval = Eval::new(0.0);
        eval.issue("no outbound links to sources");
        eval.suggest("link factual claims to their primary sources");
        return eval;
    }

    let descriptive = external
        .iter()
        .filter(|link| {
            let anchor = link.anchor_text.to_lowercase();
            text::token_count(&anchor) >= MIN_ANCHOR_WORDS
                && !NAV_ANCHOR_WORDS.iter().any(|word| anchor.contains(word))
        })
        .count();

    let per_1k = descriptive as f64 / word_count as f64 * 1000.0;
    let mut eval = Eval::new(per_1k / CITATION_TARGET_PER_1K);
    eval.fact(format!(
        "{descriptive} of {} external links carry descriptive anchors, {per_1k:.1} per 1k words",
        external.len()
    ));
    if descriptive < external.len() {
        eval.suggest("describe the cited source in the anchor text instead of a bare label");
    }
    eval
}

static VISIBLE_DATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?x)
        (?i:(?:last\s+)?(?:updated|modified|published)[:\s]+[A-Za-z]+\s+\d{1,2},?\s+\d{4})
        | \d{4}-\d{2}-\d{2}
        | [A-Z][a-z]+\s+\d{1,2},?\s+\d{4}",
    )
    .expect("visible date regex compiles")
});
static YEAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:19|20)\d{2}").expect("year regex compiles"));

/// Presence and agreement of date signals: extractor dates, schema
/// dates, and dates visible in the body. One signal is weak, two or
/// more that agree within a year is strong.
pub(super) fn freshness_signal_strength(page: &PageRepresentation, flattened: &FlattenedPage) -> Eval {
    let visible = VISIBLE_DATE_RE
        .find(&flattened.text)
        .map(|found| found.as_str().to_string());
    let schema_modified = schema_date(page, "dateModified");
    let schema_published = schema_date(page, "datePublished");

    let signals: Vec<(&str, Option<&String>)> = vec![
        ("published date", page.dates.published.as_ref()),
        ("modified date", page.dates.modified.as_ref()),
        (
            "schema date",
            schema_modified.as_ref().or(schema_published.as_ref()),
        ),
        ("visible date", visible.as_ref()),
    ];
    let present: Vec<&(&str, Option<&String>)> =
        signals.iter().filter(|(_, value)| value.is_some()).collect();

    let years: Vec<i32> = present
        .iter()
        .filter_map(|(_, value)| value.as_deref())
        .filter_map(|date| YEAR_RE.find(date))
        .filter_map(|found| found.as_str().parse().ok())
        .collect();
    let consistent = match (years.iter().min(), years.iter().max()) {
        (Some(min), Some(max)) => max - min <= 1,
        _ => true,
    };

    let score = match present.len() {
        0 => 0.0,
        1 => 0.5,
        _ if consistent => 1.0,
        _ => 0.75,
    };

    let mut eval = Eval::new(score);
    if present.is_empty() {
        eval.issue("no freshness signals found");
        eval.suggest("surface a published or last-updated date in both the body and the schema");
    } else {
        let names: Vec<&str> = present.iter().map(|(name, _)| *name).collect();
        eval.fact(format!("{} freshness signals: {}", present.len(), names.join(", ")));
        if !consistent {
            eval.issue("date signals disagree by more than a year");
        }
    }
    eval
}

fn schema_date(page: &PageRepresentation, key: &str) -> Option<String> {
    fn find(value: &Value, key: &str, depth: usize) -> Option<String> {
        if depth > 5 {
            return None;
        }
        match value {
            Value::Object(map) => {
                if let Some(Value::String(date)) = map.get(key) {
                    return Some(date.clone());
                }
                map.values().find_map(|nested| find(nested, key, depth + 1))
            }
            Value::Array(items) => items.iter().find_map(|item| find(item, key, depth + 1)),
            _ => None,
        }
    }
    page.schema_blocks
        .iter()
        .find_map(|block| find(&block.value, key, 0))
}

static CREDENTIAL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?x)
        \b(?:MD|PhD|Dr\.|M\.D\.|Ph\.D\.)\b
        | \b(?:MBA|JD|CPA|CFA|RN|LPN)\b
        | (?i:\b(?:professor|expert|specialist|consultant)\b)
        | (?i:\b(?:certified|licensed|accredited)\b)",
    )
    .expect("credential regex compiles")
});
static EDITORIAL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?ix)
        fact[-\s]?check
        | medically\s+reviewed
        | reviewed\s+by
        | edited\s+by
        | verified\s+by
        | expert\s+review",
    )
    .expect("editorial regex compiles")
});

/// Additive trust signals: a byline, a named author, stated
/// credentials, an author in the schema graph, and editorial or
/// fact-check markers.
pub(super) fn author_eeat_signals(page: &PageRepresentation, flattened: &FlattenedPage) -> Eval {
    let author = page.author.as_ref();
    let has_byline = author.is_some();
    let author_name = author.and_then(|meta| meta.name.as_deref());
    let has_credentials = author.is_some_and(|meta| !meta.credentials.is_empty())
        || CREDENTIAL_RE.is_match(&flattened.text);
    let has_schema_author = page.schema_blocks.iter().any(|block| {
        block.schema_type.as_deref() == Some("Person") || block.value.get("author").is_some()
    });
    let has_editorial = EDITORIAL_RE.is_match(&flattened.text);

    let mut score = 0.0;
    if has_byline {
        score += 0.3;
    }
    if author_name.is_some() {
        score += 0.1;
    }
    if has_credentials {
        score += 0.25;
    }
    if has_schema_author {
        score += 0.2;
    }
    if has_editorial {
        score += 0.15;
    }

    let mut eval = Eval::new(score);
    match author_name {
        Some(name) => eval.fact(format!("byline attributes the page to {name}")),
        None if has_byline => eval.fact("byline present without a resolvable name"),
        None => {
            eval.issue("no author attribution found");
            eval.suggest("add a byline and back it with a Person entry in the schema");
        }
    }
    if has_credentials {
        eval.fact("author credentials stated");
    }
    if has_schema_author {
        eval.fact("author present in structured data");
    }
    if has_editorial {
        eval.fact("editorial or fact-check markers present");
    }
    eval
}
