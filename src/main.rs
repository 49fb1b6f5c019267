use anyhow::Result;
use clap::Parser;
use class_finder::cli::Cli;
use class_finder::config::{SearchConfig, Verbosity};
use class_finder::report::ConsoleReporter;
use class_finder::search::Searcher;
use std::time::Instant;
use tracing::{debug, info};

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = SearchConfig::from_cli(&cli)?;
    init_logging(config.verbosity);

    let start = Instant::now();
    debug!(
        "searching {:?} for {} (recursive: {})",
        config.directories,
        config.query.class_name(),
        config.recursive
    );

    let reporter = ConsoleReporter::new(std::io::stdout().lock(), config.format);
    let mut searcher = Searcher::new(config.query, reporter);
    let summary = searcher.search_directories(&config.directories, config.recursive);

    info!(
        "{} match(es) in {} candidate(s), {} error(s), {} ms",
        summary.matches,
        summary.candidates,
        summary.errors,
        start.elapsed().as_millis()
    );

    Ok(())
}

fn init_logging(verbosity: Verbosity) {
    use tracing_subscriber::{EnvFilter, fmt};

    let default = match verbosity {
        Verbosity::Quiet => "error",
        Verbosity::Normal => "info",
        Verbosity::Verbose => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
