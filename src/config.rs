use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use crate::model::MetricCategory;

const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// Immutable audit configuration, validated once at load time and threaded
/// through the pipeline. Never ambient state: concurrent audits may carry
/// different tables.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AuditConfig {
    pub chunk_max_tokens: usize,
    pub sliding_window_tokens: usize,
    pub sliding_stride_tokens: usize,
    pub duplicate_similarity_threshold: f64,
    pub llm_enabled: bool,
    pub category_weights: BTreeMap<String, f64>,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            chunk_max_tokens: 300,
            sliding_window_tokens: 200,
            sliding_stride_tokens: 100,
            duplicate_similarity_threshold: 0.8,
            llm_enabled: false,
            category_weights: default_category_weights(),
        }
    }
}

pub fn default_category_weights() -> BTreeMap<String, f64> {
    BTreeMap::from([
        ("structure".to_string(), 0.20),
        ("content".to_string(), 0.25),
        ("retrieval".to_string(), 0.15),
        ("schema".to_string(), 0.15),
        ("trust".to_string(), 0.10),
        ("faithfulness".to_string(), 0.15),
    ])
}

impl AuditConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        let config: Self = serde_json::from_str(&data)
            .with_context(|| format!("failed to parse config file: {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Fails fast, before any page is processed.
    pub fn validate(&self) -> Result<()> {
        if self.chunk_max_tokens == 0 {
            bail!("chunk_max_tokens must be positive");
        }
        if self.sliding_window_tokens == 0 {
            bail!("sliding_window_tokens must be positive");
        }
        if self.sliding_stride_tokens == 0 || self.sliding_stride_tokens > self.sliding_window_tokens
        {
            bail!(
                "sliding_stride_tokens must be in 1..={}",
                self.sliding_window_tokens
            );
        }
        if !(self.duplicate_similarity_threshold > 0.0
            && self.duplicate_similarity_threshold <= 1.0)
        {
            bail!("duplicate_similarity_threshold must be in (0, 1]");
        }

        if self.category_weights.is_empty() {
            bail!("category_weights must not be empty");
        }
        let mut sum = 0.0;
        for (name, weight) in &self.category_weights {
            if MetricCategory::parse(name).is_none() {
                bail!("unknown category in weight table: {name}");
            }
            if !weight.is_finite() || *weight <= 0.0 {
                bail!("weight for category {name} must be positive, got {weight}");
            }
            sum += weight;
        }
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            bail!("category weights must sum to 1.0, got {sum}");
        }

        Ok(())
    }

    pub fn weight_for(&self, category: MetricCategory) -> f64 {
        self.category_weights
            .get(category.as_str())
            .copied()
            .unwrap_or(0.0)
    }
}
