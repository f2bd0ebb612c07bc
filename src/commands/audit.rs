use anyhow::{Context, Result};
use tracing::info;

use crate::cli::AuditArgs;
use crate::commands::{load_page, resolve_config, ConfigOverrides};
use crate::pipeline;
use crate::util::write_json_pretty;

pub fn run(args: AuditArgs) -> Result<()> {
    let config = resolve_config(
        args.config_path.as_deref(),
        ConfigOverrides {
            chunk_max_tokens: args.chunk_max_tokens,
            sliding_window_tokens: args.sliding_window_tokens,
            sliding_stride_tokens: args.sliding_stride_tokens,
            duplicate_similarity_threshold: args.duplicate_similarity_threshold,
            llm_enabled: args.llm_enabled,
        },
    )?;

    let page = load_page(&args.page_path)?;
    info!(url = %page.url, blocks = page.blocks.len(), "auditing page");

    let report = pipeline::audit_page(&page, &config);
    info!(
        url = %report.url,
        page_score = report.page_score,
        metrics = report.metrics.len(),
        "audit complete"
    );

    match &args.report_path {
        Some(path) => {
            write_json_pretty(path, &report)?;
            info!(path = %path.display(), "report written");
        }
        None => {
            let rendered = serde_json::to_string_pretty(&report)
                .context("failed to serialize report")?;
            println!("{rendered}");
        }
    }

    Ok(())
}
