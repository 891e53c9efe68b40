use crate::config::DiffBackend;
use crate::orchestrator::{EXIT_FAILURE, EXIT_SUCCESS};
use clap::Parser;
use std::path::PathBuf;

// Display order for log level option (placed at end of help text)
const LOG_LEVEL_DISPLAY_ORDER: usize = 100;

/// CLI arguments
#[derive(Parser, Debug)]
#[command(
    name = "lint-summary-diff",
    version,
    about = "Compare a lint summary against its baseline and report rule changes",
    long_about = None
)]
pub struct Cli {
    /// Baseline (reference) summary report
    pub baseline: PathBuf,

    /// Summary report of the new run
    pub new: PathBuf,

    /// Path to an optional TOML config file
    #[arg(long)]
    pub config: Option<String>,

    /// Report output file (.yml, .yaml, .json or .md)
    /// [default: artifacts/reports/<CI_JOB_NAME>.yml]
    #[arg(long, verbatim_doc_comment)]
    pub output: Option<PathBuf>,

    /// Report label
    #[arg(long)]
    pub label: Option<String>,

    /// Raw diff implementation used to gate the job
    #[arg(long, value_enum)]
    pub diff_backend: Option<DiffBackend>,

    /// Log level (see https://docs.rs/tracing-subscriber/latest/tracing_subscriber/filter/struct.EnvFilter.html)
    /// [env: LINT_SUMMARY_DIFF_LOG=] [default: info]
    #[arg(
        long,
        env = "LINT_SUMMARY_DIFF_LOG",
        default_value = "info",
        hide_default_value = true,
        hide_env = true,
        display_order = LOG_LEVEL_DISPLAY_ORDER,
        verbatim_doc_comment
    )]
    pub log_level: String,
}

/// Exit code for a failed parse: usage errors fail the job, --help and --version succeed
pub fn parse_error_exit_code(err: &clap::Error) -> i32 {
    if err.use_stderr() {
        EXIT_FAILURE
    } else {
        EXIT_SUCCESS
    }
}
