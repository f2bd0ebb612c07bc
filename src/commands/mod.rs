use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::config::AuditConfig;
use crate::model::PageRepresentation;

pub mod audit;
pub mod batch;

pub(crate) struct ConfigOverrides {
    pub chunk_max_tokens: Option<usize>,
    pub sliding_window_tokens: Option<usize>,
    pub sliding_stride_tokens: Option<usize>,
    pub duplicate_similarity_threshold: Option<f64>,
    pub llm_enabled: Option<bool>,
}

/// Loads the config file (or starts from defaults), applies CLI
/// overrides, and re-validates the result before any page is touched.
pub(crate) fn resolve_config(
    config_path: Option<&Path>,
    overrides: ConfigOverrides,
) -> Result<AuditConfig> {
    let mut config = match config_path {
        Some(path) => AuditConfig::load(path)?,
        None => AuditConfig::default(),
    };

    if let Some(value) = overrides.chunk_max_tokens {
        config.chunk_max_tokens = value;
    }
    if let Some(value) = overrides.sliding_window_tokens {
        config.sliding_window_tokens = value;
    }
    if let Some(value) = overrides.sliding_stride_tokens {
        config.sliding_stride_tokens = value;
    }
    if let Some(value) = overrides.duplicate_similarity_threshold {
        config.duplicate_similarity_threshold = value;
    }
    if let Some(value) = overrides.llm_enabled {
        config.llm_enabled = value;
    }

    config.validate()?;
    Ok(config)
}

pub(crate) fn load_page(path: &Path) -> Result<PageRepresentation> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("failed to read page file: {}", path.display()))?;
    serde_json::from_str(&data)
        .with_context(|| format!("failed to parse page representation: {}", path.display()))
}
