use rayon::prelude::*;
use tracing::debug;

use crate::chunker;
use crate::config::AuditConfig;
use crate::metrics;
use crate::model::{ChunkSummary, CompositeReport, PageRepresentation};
use crate::retrieval::{self, LexicalScorer, RelevanceScorer};
use crate::score;
use crate::util::now_utc_string;

/// Full audit of one page with the default lexical scorer. Infallible
/// for a well-formed PageRepresentation: degenerate pages come back as
/// a valid report full of zero scores.
pub fn audit_page(page: &PageRepresentation, config: &AuditConfig) -> CompositeReport {
    audit_page_with_scorer(page, config, &LexicalScorer)
}

pub fn audit_page_with_scorer(
    page: &PageRepresentation,
    config: &AuditConfig,
    scorer: &dyn RelevanceScorer,
) -> CompositeReport {
    let chunks = chunker::chunk(page, config);
    debug!(
        url = %page.url,
        semantic = chunks.semantic.len(),
        sliding = chunks.sliding.len(),
        consistency = chunks.consistency_score,
        "chunked page"
    );

    let metrics = metrics::evaluate_all(page, &chunks);
    let retrieval_stats = retrieval::simulate(page, &chunks, scorer);
    debug!(
        url = %page.url,
        queries = retrieval_stats.query_count,
        "retrieval simulation finished"
    );
    let page_score = score::aggregate(&metrics, config);

    CompositeReport {
        url: page.url.clone(),
        title: page.title.clone(),
        generated_at: now_utc_string(),
        page_score,
        metrics,
        chunks: ChunkSummary {
            semantic: chunks.semantic.iter().map(|chunk| chunk.text.clone()).collect(),
            sliding: chunks.sliding.iter().map(|chunk| chunk.text.clone()).collect(),
            consistency_score: chunks.consistency_score,
        },
        retrieval_stats,
    }
}

/// Audits pages in parallel. Each page is independent, so this is a
/// plain data-parallel map over a CPU-sized worker pool.
pub fn audit_pages(pages: &[PageRepresentation], config: &AuditConfig) -> Vec<CompositeReport> {
    pages
        .par_iter()
        .map(|page| audit_page(page, config))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Block, BlockKind};

    fn block(kind: BlockKind, text: &str, position: usize) -> Block {
        Block {
            kind,
            text: text.to_string(),
            position,
        }
    }

    fn section_page() -> PageRepresentation {
        let sections = [
            ("Pricing", "The starter plan costs $10 per month."),
            ("Support Hours", "Support is available 24 hours every day."),
            ("Team Limits", "Each workspace allows 25 members maximum."),
            ("Launch Date", "The service launched on March 5, 2021."),
            ("Data Regions", "Acme Cloud stores data in three regions."),
        ];
        let mut blocks = Vec::new();
        for (heading, body) in sections {
            blocks.push(block(BlockKind::Heading { level: 2 }, heading, blocks.len()));
            blocks.push(block(BlockKind::Paragraph, body, blocks.len()));
        }
        PageRepresentation {
            url: "https://example.com/plans".to_string(),
            title: "Plans".to_string(),
            blocks,
            schema_blocks: Vec::new(),
            links: Vec::new(),
            dates: Default::default(),
            author: None,
        }
    }

    fn single_paragraph_page() -> PageRepresentation {
        PageRepresentation {
            url: "https://example.com/note".to_string(),
            title: "Note".to_string(),
            blocks: vec![block(
                BlockKind::Paragraph,
                "A single plain paragraph with nothing to ask about.",
                0,
            )],
            schema_blocks: Vec::new(),
            links: Vec::new(),
            dates: Default::default(),
            author: None,
        }
    }

    #[test]
    fn sectioned_page_recalls_every_query_at_rank_one() {
        let report = audit_page(&section_page(), &AuditConfig::default());

        assert_eq!(report.chunks.semantic.len(), 5);
        assert_eq!(report.retrieval_stats.query_count, 5);
        assert_eq!(report.retrieval_stats.recall_at_1, Some(1.0));
        assert_eq!(report.metrics.len(), 16);
        assert!(report.page_score > 0.0 && report.page_score <= 1.0);
    }

    #[test]
    fn single_paragraph_page_reports_insufficient_retrieval_data() {
        let report = audit_page(&single_paragraph_page(), &AuditConfig::default());

        assert_eq!(report.retrieval_stats.recall_at_1, None);
        assert_eq!(report.retrieval_stats.recall_at_5, None);
        assert_eq!(report.retrieval_stats.query_count, 0);
        assert!(report.page_score >= 0.0 && report.page_score <= 1.0);
    }

    #[test]
    fn empty_page_still_produces_a_complete_report() {
        let page = PageRepresentation {
            url: "https://example.com/empty".to_string(),
            title: String::new(),
            blocks: Vec::new(),
            schema_blocks: Vec::new(),
            links: Vec::new(),
            dates: Default::default(),
            author: None,
        };
        let report = audit_page(&page, &AuditConfig::default());

        assert_eq!(report.metrics.len(), 16);
        assert_eq!(report.page_score, 0.0);
        assert!(report.chunks.semantic.is_empty());
        for metric in &report.metrics {
            assert!(metric.score >= 0.0 && metric.score <= 1.0);
        }
    }

    #[test]
    fn page_score_is_reproducible() {
        let page = section_page();
        let config = AuditConfig::default();
        let first = audit_page(&page, &config);
        let second = audit_page(&page, &config);
        assert_eq!(first.page_score.to_bits(), second.page_score.to_bits());
    }

    #[test]
    fn batch_order_matches_input_order() {
        let pages = vec![section_page(), single_paragraph_page()];
        let reports = audit_pages(&pages, &AuditConfig::default());
        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0].url, pages[0].url);
        assert_eq!(reports[1].url, pages[1].url);
    }
}
