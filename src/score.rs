use std::collections::BTreeMap;

use crate::config::AuditConfig;
use crate::model::{MetricCategory, MetricResult};

/// Effective category weights for a run. With the LLM disabled the
/// faithfulness weight is removed and its mass spread proportionally
/// over the survivors: `w[c] / (1 - w[faithfulness])`, which preserves
/// the relative emphasis among the deterministic categories. The
/// returned weights always sum to 1.0.
pub fn effective_weights(config: &AuditConfig) -> BTreeMap<String, f64> {
    if config.llm_enabled {
        return config.category_weights.clone();
    }

    let remaining = 1.0 - config.weight_for(MetricCategory::Faithfulness);
    if remaining <= f64::EPSILON {
        return BTreeMap::new();
    }

    config
        .category_weights
        .iter()
        .filter(|(name, _)| name.as_str() != MetricCategory::Faithfulness.as_str())
        .map(|(name, weight)| (name.clone(), weight / remaining))
        .collect()
}

/// Pure, order-independent aggregation of metric results into the page
/// score. Category scores are weight-averaged over their metrics; a
/// weighted category with no results contributes zero at full weight
/// rather than silently renormalizing.
pub fn aggregate(metrics: &[MetricResult], config: &AuditConfig) -> f64 {
    let weights = effective_weights(config);
    let mut page_score = 0.0;

    for (name, weight) in &weights {
        let Some(category) = MetricCategory::parse(name) else {
            continue;
        };
        page_score += weight * category_score(metrics, category);
    }

    page_score.clamp(0.0, 1.0)
}

fn category_score(metrics: &[MetricResult], category: MetricCategory) -> f64 {
    let mut weighted = 0.0;
    let mut total_weight = 0.0;
    for metric in metrics.iter().filter(|metric| metric.category == category) {
        weighted += metric.score * metric.weight;
        total_weight += metric.weight;
    }
    if total_weight == 0.0 {
        return 0.0;
    }
    weighted / total_weight
}
