mod cli;
mod config;
mod orchestrator;
mod report;
mod summary;
mod types;
mod util;

use clap::Parser;
use cli::Cli;
use config::Config;
use orchestrator::{EXIT_FAILURE, ReportTarget};
use tracing::debug;
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::try_parse().unwrap_or_else(|e| {
        let _ = e.print();
        std::process::exit(cli::parse_error_exit_code(&e));
    });

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&cli.log_level).unwrap_or_else(|e| {
            eprintln!("Invalid log level '{}': {}", cli.log_level, e);
            std::process::exit(EXIT_FAILURE);
        }))
        .with_writer(std::io::stderr)
        .init();

    match run(cli) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(EXIT_FAILURE);
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<i32> {
    let mut config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if let Some(backend) = cli.diff_backend {
        config.diff.backend = backend;
    }
    debug!("Config: {:?}", config);

    let differ = config.diff.build()?;
    let label = cli.label.unwrap_or(config.report.label);
    let output = cli
        .output
        .or(config.report.output)
        .unwrap_or_else(util::default_report_path);
    let target = ReportTarget {
        label: &label,
        path: &output,
    };

    orchestrator::run(differ.as_ref(), &cli.baseline, &cli.new, &target)
}
