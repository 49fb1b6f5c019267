use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;

use crate::cli::{Cli, OutputFormat};
use crate::query::SearchQuery;
use crate::scan::split_directory_list;

/// Environment fallback for `-d`, in the same `a;b` list form.
pub const PATH_ENV: &str = "CLASS_FINDER_PATH";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    Quiet,
    Normal,
    Verbose,
}

/// Everything a run needs, validated once.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    pub query: SearchQuery,
    pub directories: Vec<PathBuf>,
    pub recursive: bool,
    pub format: OutputFormat,
    pub verbosity: Verbosity,
}

impl SearchConfig {
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let query = SearchQuery::new(&cli.class_name, cli.match_case, cli.method.as_deref())
            .context("Invalid class name")?;
        let directories = resolve_directories(cli, env::var(PATH_ENV).ok())?;

        let verbosity = if cli.quiet {
            Verbosity::Quiet
        } else if cli.verbose {
            Verbosity::Verbose
        } else {
            Verbosity::Normal
        };

        Ok(Self {
            query,
            directories,
            recursive: cli.recursive,
            format: cli.format,
            verbosity,
        })
    }
}

/// CLI values first, then the environment, then the working directory.
fn resolve_directories(cli: &Cli, env_value: Option<String>) -> Result<Vec<PathBuf>> {
    let from_cli: Vec<PathBuf> = cli
        .directories
        .iter()
        .flat_map(|d| split_directory_list(&d.to_string_lossy()))
        .collect();
    if !from_cli.is_empty() {
        return Ok(from_cli);
    }

    if let Some(raw) = env_value {
        let from_env = split_directory_list(&raw);
        if !from_env.is_empty() {
            return Ok(from_env);
        }
    }

    let cwd = env::current_dir().context("Failed to resolve current directory")?;
    Ok(vec![cwd])
}
