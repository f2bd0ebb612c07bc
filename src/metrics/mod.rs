use crate::chunker::ChunkingOutcome;
use crate::model::{BlockKind, Link, MetricCategory, MetricResult, PageRepresentation};
use crate::text::{self, FlattenedPage};

mod content;
mod explain;
mod retrieval;
mod schema;
mod structure;
#[cfg(test)]
mod tests;
mod trust;

use content::*;
use explain::*;
use retrieval::*;
use schema::*;
use structure::*;
use trust::*;

/// The closed set of page metrics. Every variant is bound to one pure
/// evaluator; adding a metric means adding a variant here, so coverage
/// checks stay exhaustive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricId {
    HeadingHierarchyValidity,
    SemanticTreeDepth,
    MainContentDetectability,
    DomToTokenRatio,
    LiftableUnitsDensity,
    AnswerFirstCompliance,
    AnaphoraResolution,
    HeadingPredictivePower,
    ChunkBoundaryIntegrity,
    DuplicateBoilerplateRate,
    EntitySchemaMapping,
    SchemaCoverageByIntent,
    SchemaQualityRelationships,
    CitationSourceDensity,
    FreshnessSignalStrength,
    AuthorEeatSignals,
}

impl MetricId {
    pub const ALL: [MetricId; 16] = [
        MetricId::HeadingHierarchyValidity,
        MetricId::SemanticTreeDepth,
        MetricId::MainContentDetectability,
        MetricId::DomToTokenRatio,
        MetricId::LiftableUnitsDensity,
        MetricId::AnswerFirstCompliance,
        MetricId::AnaphoraResolution,
        MetricId::HeadingPredictivePower,
        MetricId::ChunkBoundaryIntegrity,
        MetricId::DuplicateBoilerplateRate,
        MetricId::EntitySchemaMapping,
        MetricId::SchemaCoverageByIntent,
        MetricId::SchemaQualityRelationships,
        MetricId::CitationSourceDensity,
        MetricId::FreshnessSignalStrength,
        MetricId::AuthorEeatSignals,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::HeadingHierarchyValidity => "heading_hierarchy_validity",
            Self::SemanticTreeDepth => "semantic_tree_depth",
            Self::MainContentDetectability => "main_content_detectability",
            Self::DomToTokenRatio => "dom_to_token_ratio",
            Self::LiftableUnitsDensity => "liftable_units_density",
            Self::AnswerFirstCompliance => "answer_first_compliance",
            Self::AnaphoraResolution => "anaphora_resolution",
            Self::HeadingPredictivePower => "heading_predictive_power",
            Self::ChunkBoundaryIntegrity => "chunk_boundary_integrity",
            Self::DuplicateBoilerplateRate => "duplicate_boilerplate_rate",
            Self::EntitySchemaMapping => "entity_schema_mapping",
            Self::SchemaCoverageByIntent => "schema_coverage_by_intent",
            Self::SchemaQualityRelationships => "schema_quality_relationships",
            Self::CitationSourceDensity => "citation_source_density",
            Self::FreshnessSignalStrength => "freshness_signal_strength",
            Self::AuthorEeatSignals => "author_eeat_signals",
        }
    }

    pub fn category(self) -> MetricCategory {
        match self {
            Self::HeadingHierarchyValidity
            | Self::SemanticTreeDepth
            | Self::MainContentDetectability => MetricCategory::Structure,
            Self::DomToTokenRatio
            | Self::LiftableUnitsDensity
            | Self::AnswerFirstCompliance
            | Self::AnaphoraResolution
            | Self::HeadingPredictivePower => MetricCategory::Content,
            Self::ChunkBoundaryIntegrity | Self::DuplicateBoilerplateRate => {
                MetricCategory::Retrieval
            }
            Self::EntitySchemaMapping
            | Self::SchemaCoverageByIntent
            | Self::SchemaQualityRelationships => MetricCategory::Schema,
            Self::CitationSourceDensity
            | Self::FreshnessSignalStrength
            | Self::AuthorEeatSignals => MetricCategory::Trust,
        }
    }

    fn run(self, page: &PageRepresentation, chunks: &ChunkingOutcome) -> Eval {
        let flattened = &chunks.flattened;
        match self {
            Self::HeadingHierarchyValidity => heading_hierarchy_validity(page),
            Self::SemanticTreeDepth => semantic_tree_depth(page),
            Self::MainContentDetectability => main_content_detectability(page, flattened),
            Self::DomToTokenRatio => dom_to_token_ratio(page, flattened),
            Self::LiftableUnitsDensity => liftable_units_density(page, flattened),
            Self::AnswerFirstCompliance => answer_first_compliance(page),
            Self::AnaphoraResolution => anaphora_resolution(page),
            Self::HeadingPredictivePower => heading_predictive_power(page),
            Self::ChunkBoundaryIntegrity => chunk_boundary_integrity(chunks),
            Self::DuplicateBoilerplateRate => duplicate_boilerplate_rate(page),
            Self::EntitySchemaMapping => entity_schema_mapping(page, flattened),
            Self::SchemaCoverageByIntent => schema_coverage_by_intent(page, flattened),
            Self::SchemaQualityRelationships => schema_quality_relationships(page),
            Self::CitationSourceDensity => citation_source_density(page, flattened),
            Self::FreshnessSignalStrength => freshness_signal_strength(page, flattened),
            Self::AuthorEeatSignals => author_eeat_signals(page, flattened),
        }
    }
}

/// Runs one metric. Total for well-formed input: degenerate pages score
/// zero with an explanation rather than failing.
pub fn evaluate(id: MetricId, page: &PageRepresentation, chunks: &ChunkingOutcome) -> MetricResult {
    let category = id.category();
    let siblings = MetricId::ALL
        .iter()
        .filter(|other| other.category() == category)
        .count();
    let (score, explanations) = id.run(page, chunks).explanations();

    MetricResult {
        metric_name: id.name().to_string(),
        score,
        weight: 1.0 / siblings as f64,
        category,
        explanations: Some(explanations),
    }
}

/// Runs the whole registry in declaration order. Metrics are
/// independent of one another; each sees only the page and the chunker
/// output.
pub fn evaluate_all(page: &PageRepresentation, chunks: &ChunkingOutcome) -> Vec<MetricResult> {
    MetricId::ALL
        .iter()
        .map(|&id| evaluate(id, page, chunks))
        .collect()
}
