use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Normalized page produced by the extractor collaborator. Immutable once
/// built; each audit run owns its own instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageRepresentation {
    pub url: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub blocks: Vec<Block>,
    #[serde(default)]
    pub schema_blocks: Vec<SchemaBlock>,
    #[serde(default)]
    pub links: Vec<Link>,
    #[serde(default)]
    pub dates: PageDates,
    #[serde(default)]
    pub author: Option<AuthorMeta>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Block {
    pub kind: BlockKind,
    pub text: String,
    pub position: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BlockKind {
    Heading { level: u8 },
    Paragraph,
    ListItem,
    Table,
    Code,
}

impl BlockKind {
    pub fn is_heading(self) -> bool {
        matches!(self, Self::Heading { .. })
    }

    pub fn heading_level(self) -> Option<u8> {
        match self {
            Self::Heading { level } => Some(level),
            _ => None,
        }
    }
}

/// One parsed structured-data object (JSON-LD or equivalent) with its
/// `@type`/`@id` lifted out of the raw value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaBlock {
    #[serde(default)]
    pub schema_type: Option<String>,
    #[serde(default)]
    pub schema_id: Option<String>,
    pub value: Value,
}

impl SchemaBlock {
    pub fn from_value(value: Value) -> Self {
        let schema_type = value
            .get("@type")
            .and_then(Value::as_str)
            .map(str::to_string);
        let schema_id = value
            .get("@id")
            .and_then(Value::as_str)
            .map(str::to_string);
        Self {
            schema_type,
            schema_id,
            value,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Link {
    pub url: String,
    #[serde(default)]
    pub anchor_text: String,
    #[serde(default)]
    pub is_external: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageDates {
    #[serde(default)]
    pub published: Option<String>,
    #[serde(default)]
    pub modified: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthorMeta {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub credentials: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChunkStrategy {
    Semantic,
    Sliding,
}

/// A retrieval unit. Offsets index into the page's flattened text; semantic
/// chunks are non-overlapping, sliding chunks overlap by a fixed stride.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunk {
    pub id: String,
    pub strategy: ChunkStrategy,
    pub text: String,
    pub start_offset: usize,
    pub end_offset: usize,
    pub source_block_ids: Vec<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricCategory {
    Structure,
    Content,
    Retrieval,
    Schema,
    Trust,
    Faithfulness,
}

impl MetricCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Structure => "structure",
            Self::Content => "content",
            Self::Retrieval => "retrieval",
            Self::Schema => "schema",
            Self::Trust => "trust",
            Self::Faithfulness => "faithfulness",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "structure" => Some(Self::Structure),
            "content" => Some(Self::Content),
            "retrieval" => Some(Self::Retrieval),
            "schema" => Some(Self::Schema),
            "trust" => Some(Self::Trust),
            "faithfulness" => Some(Self::Faithfulness),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReasonKind {
    Fact,
    Issue,
    Suggestion,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reason {
    pub kind: ReasonKind,
    pub message: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub examples: Vec<String>,
}

impl Reason {
    pub fn new(kind: ReasonKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            examples: Vec::new(),
        }
    }

    pub fn with_examples(
        kind: ReasonKind,
        message: impl Into<String>,
        examples: Vec<String>,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            examples,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Explanations {
    pub severity: Severity,
    pub reasons: Vec<Reason>,
}

/// One metric evaluation. Created once per page per audit run and never
/// mutated afterwards; a re-run replaces the whole record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricResult {
    pub metric_name: String,
    pub score: f64,
    pub weight: f64,
    pub category: MetricCategory,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanations: Option<Explanations>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyntheticQuery {
    pub text: String,
    pub expected_chunk_id: String,
}

/// Recall figures are `None` when the page had too few fact-bearing chunks
/// to query; consumers must treat that as "insufficient data", not zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalStats {
    pub recall_at_1: Option<f64>,
    pub recall_at_5: Option<f64>,
    pub query_count: usize,
}

impl RetrievalStats {
    pub fn insufficient() -> Self {
        Self {
            recall_at_1: None,
            recall_at_5: None,
            query_count: 0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkSummary {
    pub semantic: Vec<String>,
    pub sliding: Vec<String>,
    pub consistency_score: f64,
}

/// Final audit record for one page. Built fresh per scan, immutable, and
/// handed to the report-rendering collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompositeReport {
    pub url: String,
    pub title: String,
    pub generated_at: String,
    pub page_score: f64,
    pub metrics: Vec<MetricResult>,
    pub chunks: ChunkSummary,
    pub retrieval_stats: RetrievalStats,
}
