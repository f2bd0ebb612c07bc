use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "aeo-audit",
    version,
    about = "Deterministic answerability auditing for extracted pages"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Audit a single page representation and emit its report.
    Audit(AuditArgs),
    /// Audit every page file in a directory.
    Batch(BatchArgs),
}

#[derive(Args, Debug, Clone)]
pub struct AuditArgs {
    /// Page representation JSON to audit.
    #[arg(long)]
    pub page_path: PathBuf,

    /// Report destination; stdout when omitted.
    #[arg(long)]
    pub report_path: Option<PathBuf>,

    #[arg(long)]
    pub config_path: Option<PathBuf>,

    #[arg(long)]
    pub chunk_max_tokens: Option<usize>,

    #[arg(long)]
    pub sliding_window_tokens: Option<usize>,

    #[arg(long)]
    pub sliding_stride_tokens: Option<usize>,

    #[arg(long)]
    pub duplicate_similarity_threshold: Option<f64>,

    /// Override the config's llm_enabled flag; bare `--llm-enabled`
    /// means true, `--llm-enabled false` forces it off.
    #[arg(long, num_args = 0..=1, default_missing_value = "true")]
    pub llm_enabled: Option<bool>,
}

#[derive(Args, Debug, Clone)]
pub struct BatchArgs {
    /// Directory of page representation JSON files.
    #[arg(long)]
    pub pages_dir: PathBuf,

    #[arg(long, default_value = "reports")]
    pub report_dir: PathBuf,

    #[arg(long)]
    pub config_path: Option<PathBuf>,

    #[arg(long)]
    pub chunk_max_tokens: Option<usize>,

    #[arg(long)]
    pub sliding_window_tokens: Option<usize>,

    #[arg(long)]
    pub sliding_stride_tokens: Option<usize>,

    #[arg(long)]
    pub duplicate_similarity_threshold: Option<f64>,

    /// Override the config's llm_enabled flag; bare `--llm-enabled`
    /// means true, `--llm-enabled false` forces it off.
    #[arg(long, num_args = 0..=1, default_missing_value = "true")]
    pub llm_enabled: Option<bool>,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn llm_enabled_works_as_switch_and_as_valued_override() {
        let parse = |argv: &[&str]| match Cli::parse_from(argv).command {
            Commands::Audit(args) => args,
            Commands::Batch(_) => panic!("expected audit subcommand"),
        };

        let base = ["aeo-audit", "audit", "--page-path", "page.json"];
        assert_eq!(parse(&base).llm_enabled, None);

        let bare = ["aeo-audit", "audit", "--page-path", "page.json", "--llm-enabled"];
        assert_eq!(parse(&bare).llm_enabled, Some(true));

        let off = [
            "aeo-audit",
            "audit",
            "--page-path",
            "page.json",
            "--llm-enabled",
            "false",
        ];
        assert_eq!(parse(&off).llm_enabled, Some(false));
    }
}
