use std::collections::HashSet;

use serde_json::json;

use super::*;
use crate::chunker::{ChunkingOutcome, chunk};
use crate::config::AuditConfig;
use crate::model::{AuthorMeta, Block, SchemaBlock, Severity};

fn page(blocks: Vec<(BlockKind, &str)>) -> PageRepresentation {
    PageRepresentation {
        url: "https://example.com/page".to_string(),
        title: "Example".to_string(),
        blocks: blocks
            .into_iter()
            .enumerate()
            .map(|(position, (kind, body))| Block {
                kind,
                text: body.to_string(),
                position,
            })
            .collect(),
        schema_blocks: Vec::new(),
        links: Vec::new(),
        dates: Default::default(),
        author: None,
    }
}

fn heading(level: u8) -> BlockKind {
    BlockKind::Heading { level }
}

fn filler(start: usize, count: usize) -> String {
    (start..start + count)
        .map(|index| format!("word{index}"))
        .collect::<Vec<_>>()
        .join(" ")
}

fn run(id: MetricId, page: &PageRepresentation) -> MetricResult {
    let chunks = chunk(page, &AuditConfig::default());
    evaluate(id, page, &chunks)
}

#[test]
fn registry_is_complete_and_weights_renormalize_per_category() {
    assert_eq!(MetricId::ALL.len(), 16);
    let names: HashSet<&str> = MetricId::ALL.iter().map(|id| id.name()).collect();
    assert_eq!(names.len(), 16);

    let page = page(vec![(BlockKind::Paragraph, "A short page.")]);
    let chunks = chunk(&page, &AuditConfig::default());
    let results = evaluate_all(&page, &chunks);
    assert_eq!(results.len(), 16);

    for category in [
        MetricCategory::Structure,
        MetricCategory::Content,
        MetricCategory::Retrieval,
        MetricCategory::Schema,
        MetricCategory::Trust,
    ] {
        let sum: f64 = results
            .iter()
            .filter(|result| result.category == category)
            .map(|result| result.weight)
            .sum();
        assert!((sum - 1.0).abs() < 1e-9, "{category:?} weights sum to {sum}");
    }
    for result in &results {
        assert!(result.score >= 0.0 && result.score <= 1.0, "{}", result.metric_name);
    }
}

#[test]
fn heading_hierarchy_counts_level_skips() {
    let valid = page(vec![
        (heading(1), "Guide"),
        (heading(2), "Setup"),
        (BlockKind::Paragraph, "Run the installer."),
    ]);
    assert_eq!(run(MetricId::HeadingHierarchyValidity, &valid).score, 1.0);

    let skipping = page(vec![
        (heading(1), "Guide"),
        (heading(2), "Setup"),
        (heading(4), "Deep detail"),
        (BlockKind::Paragraph, "Nested text."),
    ]);
    let result = run(MetricId::HeadingHierarchyValidity, &skipping);
    assert!((result.score - 0.5).abs() < 1e-9);

    let bare = page(vec![(BlockKind::Paragraph, "No headings at all here.")]);
    let result = run(MetricId::HeadingHierarchyValidity, &bare);
    assert_eq!(result.score, 0.0);
    let explanations = result.explanations.unwrap();
    assert_eq!(explanations.severity, Severity::Error);
    assert!(explanations.reasons.iter().any(|reason| reason.message.contains("no heading")));
}

#[test]
fn semantic_tree_depth_rewards_flat_outlines() {
    let flat = page(vec![
        (heading(1), "Title"),
        (BlockKind::Paragraph, "Body text."),
        (heading(2), "Section"),
        (BlockKind::Paragraph, "More body text."),
    ]);
    assert_eq!(run(MetricId::SemanticTreeDepth, &flat).score, 1.0);

    let empty = page(Vec::new());
    assert_eq!(run(MetricId::SemanticTreeDepth, &empty).score, 0.0);
}

#[test]
fn main_content_detectability_bands_on_word_count() {
    let long_body = filler(0, 120);
    let good = page(vec![
        (heading(1), "Article"),
        (BlockKind::Paragraph, long_body.as_str()),
    ]);
    assert_eq!(run(MetricId::MainContentDetectability, &good).score, 1.0);

    let medium_body = filler(0, 60);
    let partial = page(vec![(BlockKind::Paragraph, medium_body.as_str())]);
    assert_eq!(run(MetricId::MainContentDetectability, &partial).score, 0.3);

    let thin = page(vec![(BlockKind::Paragraph, "Barely anything.")]);
    assert_eq!(run(MetricId::MainContentDetectability, &thin).score, 0.0);
}

#[test]
fn dom_to_token_ratio_scales_with_tokens_per_block() {
    let first = filler(0, 30);
    let second = filler(30, 30);
    let dense = page(vec![
        (BlockKind::Paragraph, first.as_str()),
        (BlockKind::Paragraph, second.as_str()),
    ]);
    assert_eq!(run(MetricId::DomToTokenRatio, &dense).score, 1.0);

    let fragmented = page(vec![
        (BlockKind::Paragraph, "One."),
        (BlockKind::Paragraph, "Two."),
        (BlockKind::Paragraph, "Three."),
    ]);
    let result = run(MetricId::DomToTokenRatio, &fragmented);
    assert!(result.score < 0.1);

    assert_eq!(run(MetricId::DomToTokenRatio, &page(Vec::new())).score, 0.0);
}

#[test]
fn liftable_units_density_counts_lists_and_tables() {
    let body = filler(0, 30);
    let structured = page(vec![
        (BlockKind::Paragraph, body.as_str()),
        (BlockKind::ListItem, "First item alpha"),
        (BlockKind::ListItem, "Second item bravo"),
        (BlockKind::ListItem, "Third item charlie"),
        (BlockKind::Table, "Plan Price Basic Premium"),
    ]);
    assert_eq!(run(MetricId::LiftableUnitsDensity, &structured).score, 1.0);

    let prose_body = filler(0, 400);
    let prose = page(vec![(BlockKind::Paragraph, prose_body.as_str())]);
    assert_eq!(run(MetricId::LiftableUnitsDensity, &prose).score, 0.0);
}

#[test]
fn liftable_units_density_counts_interrogative_headings_as_faq() {
    let first_answer = filler(0, 20);
    let second_answer = filler(100, 20);
    let faq = page(vec![
        (heading(2), "How does billing work?"),
        (BlockKind::Paragraph, first_answer.as_str()),
        (heading(2), "Can plans change later?"),
        (BlockKind::Paragraph, second_answer.as_str()),
    ]);

    let result = run(MetricId::LiftableUnitsDensity, &faq);
    assert_eq!(result.score, 1.0);
    let explanations = result.explanations.unwrap();
    assert!(explanations
        .reasons
        .iter()
        .any(|reason| reason.message.contains("2 FAQ sections")));
}

#[test]
fn answer_first_compliance_penalizes_filler_openings() {
    let mixed = page(vec![
        (heading(2), "Overview"),
        (
            BlockKind::Paragraph,
            "In this article we will explore all the available options today.",
        ),
        (heading(2), "Pricing"),
        (BlockKind::Paragraph, "The basic plan is ten dollars per month."),
    ]);
    let result = run(MetricId::AnswerFirstCompliance, &mixed);
    assert!((result.score - 0.5).abs() < 1e-9);
    let explanations = result.explanations.unwrap();
    assert!(explanations.reasons.iter().any(|reason| !reason.examples.is_empty()));

    let bare = page(vec![(BlockKind::Paragraph, "No sections here.")]);
    assert_eq!(run(MetricId::AnswerFirstCompliance, &bare).score, 0.0);
}

#[test]
fn anaphora_resolution_flags_unanchored_pronouns() {
    let anchored = page(vec![(
        BlockKind::Paragraph,
        "The Acme Gateway ships updates weekly. It scales to many regions.",
    )]);
    assert_eq!(run(MetricId::AnaphoraResolution, &anchored).score, 1.0);

    let dangling = page(vec![(
        BlockKind::Paragraph,
        "It depends entirely on the plan you choose.",
    )]);
    assert_eq!(run(MetricId::AnaphoraResolution, &dangling).score, 0.0);
}

#[test]
fn anaphora_resolution_checks_pronouns_past_the_first_word() {
    let resolved = page(vec![(
        BlockKind::Paragraph,
        "The gateway restarts whenever it fails a health check.",
    )]);
    assert_eq!(run(MetricId::AnaphoraResolution, &resolved).score, 1.0);

    let dangling = page(vec![(
        BlockKind::Paragraph,
        "Is this what you would want?",
    )]);
    assert_eq!(run(MetricId::AnaphoraResolution, &dangling).score, 0.0);
}

#[test]
fn heading_predictive_power_measures_vocabulary_overlap() {
    let aligned = page(vec![
        (heading(2), "Pricing Plans"),
        (
            BlockKind::Paragraph,
            "Our pricing covers three plans with monthly and annual billing options today.",
        ),
    ]);
    assert_eq!(run(MetricId::HeadingPredictivePower, &aligned).score, 1.0);

    let misleading = page(vec![
        (heading(2), "Quantum Widgets"),
        (
            BlockKind::Paragraph,
            "Our pricing covers three plans with monthly and annual billing options today.",
        ),
    ]);
    let result = run(MetricId::HeadingPredictivePower, &misleading);
    assert_eq!(result.score, 0.0);

    let bare = page(vec![(BlockKind::Paragraph, "No headings at all in this text.")]);
    assert_eq!(run(MetricId::HeadingPredictivePower, &bare).score, 0.0);
}

#[test]
fn chunk_boundary_integrity_is_full_for_sentence_terminated_blocks() {
    let clean = page(vec![
        (heading(2), "Guide"),
        (BlockKind::Paragraph, "First sentence here. Second sentence there."),
        (heading(2), "More"),
        (BlockKind::Paragraph, "Another sentence concludes the page."),
    ]);
    let result = run(MetricId::ChunkBoundaryIntegrity, &clean);
    assert_eq!(result.score, 1.0);

    let empty = page(Vec::new());
    let result = run(MetricId::ChunkBoundaryIntegrity, &empty);
    assert_eq!(result.score, 0.0);
}

#[test]
fn duplicate_boilerplate_rate_drops_with_repeated_footers() {
    let footer = "All rights reserved terms of service privacy policy contact us today";
    let body = filler(0, 12);
    let noisy = page(vec![
        (BlockKind::Paragraph, body.as_str()),
        (BlockKind::Paragraph, footer),
        (BlockKind::Paragraph, footer),
    ]);
    let result = run(MetricId::DuplicateBoilerplateRate, &noisy);
    assert!(result.score < 0.5);

    let clean_body = filler(0, 40);
    let clean = page(vec![(BlockKind::Paragraph, clean_body.as_str())]);
    assert_eq!(run(MetricId::DuplicateBoilerplateRate, &clean).score, 1.0);
}

#[test]
fn entity_schema_mapping_is_the_backed_fraction() {
    let mut mapped = page(vec![(
        BlockKind::Paragraph,
        "Acme Cloud hosts the reference deployment used throughout this guide.",
    )]);
    mapped.schema_blocks.push(SchemaBlock::from_value(json!({
        "@context": "https://schema.org",
        "@type": "Organization",
        "name": "Acme Cloud",
    })));
    assert_eq!(run(MetricId::EntitySchemaMapping, &mapped).score, 1.0);

    let unmapped = page(vec![(
        BlockKind::Paragraph,
        "Acme Cloud hosts the reference deployment used throughout this guide.",
    )]);
    assert_eq!(run(MetricId::EntitySchemaMapping, &unmapped).score, 0.0);

    let no_entities = page(vec![(BlockKind::Paragraph, "plain lowercase text only here.")]);
    assert_eq!(run(MetricId::EntitySchemaMapping, &no_entities).score, 0.0);
}

#[test]
fn schema_coverage_matches_intent_to_declared_types() {
    let body = "The product price starts at $99 and you can buy now from the product page.";
    let mut matching = page(vec![(BlockKind::Paragraph, body)]);
    matching.schema_blocks.push(SchemaBlock::from_value(json!({
        "@context": "https://schema.org",
        "@type": "Product",
        "name": "Widget",
    })));
    assert_eq!(run(MetricId::SchemaCoverageByIntent, &matching).score, 1.0);

    let mut mismatched = page(vec![(BlockKind::Paragraph, body)]);
    mismatched.schema_blocks.push(SchemaBlock::from_value(json!({
        "@type": "Recipe",
        "name": "Widget",
    })));
    assert_eq!(run(MetricId::SchemaCoverageByIntent, &mismatched).score, 0.5);

    let bare = page(vec![(BlockKind::Paragraph, body)]);
    assert_eq!(run(MetricId::SchemaCoverageByIntent, &bare).score, 0.0);
}

#[test]
fn schema_quality_awards_relationship_points() {
    let mut rich = page(vec![(BlockKind::Paragraph, "Body text for the article.")]);
    rich.schema_blocks.push(SchemaBlock::from_value(json!({
        "@context": "https://schema.org",
        "@type": "Article",
        "@id": "https://example.com/page#article",
        "headline": "Example",
        "author": { "@type": "Person", "name": "Jane Doe" },
        "publisher": { "@type": "Organization", "name": "Acme" },
    })));
    let result = run(MetricId::SchemaQualityRelationships, &rich);
    // completeness 1.0, relationships 0.2 + 0.25 + 0.15.
    assert!((result.score - (0.6 + 0.4 * 0.6)).abs() < 1e-9);

    let none = page(vec![(BlockKind::Paragraph, "Body text without schema.")]);
    assert_eq!(run(MetricId::SchemaQualityRelationships, &none).score, 0.0);
}

#[test]
fn citation_density_counts_descriptive_external_links() {
    let body = filler(0, 100);
    let mut cited = page(vec![(BlockKind::Paragraph, body.as_str())]);
    cited.links.push(Link {
        url: "https://research.example.org/report".to_string(),
        anchor_text: "independent uptime research report".to_string(),
        is_external: true,
    });
    cited.links.push(Link {
        url: "https://example.com/home".to_string(),
        anchor_text: "back to home page".to_string(),
        is_external: true,
    });
    let result = run(MetricId::CitationSourceDensity, &cited);
    // One descriptive link in 100 words is 10 per 1k, over the target.
    assert_eq!(result.score, 1.0);

    let unlinked = page(vec![(BlockKind::Paragraph, body.as_str())]);
    assert_eq!(run(MetricId::CitationSourceDensity, &unlinked).score, 0.0);
}

#[test]
fn freshness_scores_signal_count_and_agreement() {
    let body = "A paragraph of body text without any dates in it.";
    let mut agreeing = page(vec![(BlockKind::Paragraph, body)]);
    agreeing.dates.published = Some("2024-03-01".to_string());
    agreeing.schema_blocks.push(SchemaBlock::from_value(json!({
        "@type": "Article",
        "name": "Example",
        "datePublished": "2024-03-05",
    })));
    assert_eq!(run(MetricId::FreshnessSignalStrength, &agreeing).score, 1.0);

    let mut disagreeing = page(vec![(BlockKind::Paragraph, body)]);
    disagreeing.dates.published = Some("2019-01-01".to_string());
    disagreeing.schema_blocks.push(SchemaBlock::from_value(json!({
        "@type": "Article",
        "name": "Example",
        "dateModified": "2024-05-05",
    })));
    assert_eq!(run(MetricId::FreshnessSignalStrength, &disagreeing).score, 0.75);

    let mut single = page(vec![(BlockKind::Paragraph, body)]);
    single.dates.modified = Some("2024-01-01".to_string());
    assert_eq!(run(MetricId::FreshnessSignalStrength, &single).score, 0.5);

    let undated = page(vec![(BlockKind::Paragraph, body)]);
    assert_eq!(run(MetricId::FreshnessSignalStrength, &undated).score, 0.0);
}

#[test]
fn author_eeat_signals_are_additive() {
    let mut full = page(vec![(
        BlockKind::Paragraph,
        "This guide was medically reviewed before publication.",
    )]);
    full.author = Some(AuthorMeta {
        name: Some("Jane Doe".to_string()),
        credentials: vec!["MD".to_string()],
    });
    full.schema_blocks.push(SchemaBlock::from_value(json!({
        "@type": "Person",
        "name": "Jane Doe",
    })));
    assert!((run(MetricId::AuthorEeatSignals, &full).score - 1.0).abs() < 1e-9);

    let anonymous = page(vec![(
        BlockKind::Paragraph,
        "A plain paragraph with no attribution signals at all.",
    )]);
    let result = run(MetricId::AuthorEeatSignals, &anonymous);
    assert_eq!(result.score, 0.0);
    let explanations = result.explanations.unwrap();
    assert_eq!(explanations.severity, Severity::Error);
}

#[test]
fn metrics_are_deterministic_for_the_same_input() {
    let body = filler(0, 80);
    let mut page = page(vec![
        (heading(1), "Reference"),
        (BlockKind::Paragraph, body.as_str()),
    ]);
    page.dates.published = Some("2024-01-01".to_string());
    let chunks: ChunkingOutcome = chunk(&page, &AuditConfig::default());

    let first = evaluate_all(&page, &chunks);
    let second = evaluate_all(&page, &chunks);
    for (a, b) in first.iter().zip(second.iter()) {
        assert_eq!(a.metric_name, b.metric_name);
        assert_eq!(a.score.to_bits(), b.score.to_bits());
    }
}
