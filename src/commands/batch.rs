use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use tracing::{info, warn};

use crate::cli::BatchArgs;
use crate::commands::{load_page, resolve_config, ConfigOverrides};
use crate::pipeline;
use crate::util::write_json_pretty;

pub fn run(args: BatchArgs) -> Result<()> {
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

    let mut page_paths = page_files(&args)?;
    page_paths.sort();
    if page_paths.is_empty() {
        bail!("no page files found in {}", args.pages_dir.display());
    }
    info!(
        pages = page_paths.len(),
        dir = %args.pages_dir.display(),
        "starting batch audit"
    );

    let mut pages = Vec::new();
    let mut stems = Vec::new();
    let mut failed = 0usize;
    for path in &page_paths {
        match load_page(path) {
            Ok(page) => {
                stems.push(report_stem(path));
                pages.push(page);
            }
            Err(err) => {
                warn!(path = %path.display(), error = %err, "skipping unreadable page");
                failed += 1;
            }
        }
    }

    let reports = pipeline::audit_pages(&pages, &config);
    for (stem, report) in stems.iter().zip(reports.iter()) {
        let out = args.report_dir.join(format!("{stem}.report.json"));
        write_json_pretty(&out, report)?;
        info!(
            path = %out.display(),
            page_score = report.page_score,
            "report written"
        );
    }

    info!(audited = reports.len(), failed, "batch audit complete");
    if failed > 0 {
        bail!("{failed} page file(s) could not be audited");
    }
    Ok(())
}

fn page_files(args: &BatchArgs) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(&args.pages_dir)
        .with_context(|| format!("failed to read pages dir: {}", args.pages_dir.display()))?;

    let mut paths = Vec::new();
    for entry in entries {
        let entry = entry.context("failed to read directory entry")?;
        let path = entry.path();
        if path.extension().is_some_and(|ext| ext == "json") {
            paths.push(path);
        }
    }
    Ok(paths)
}

fn report_stem(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "page".to_string())
}
