use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "class-finder", version)]
#[command(about = "Find Java classes in directories and jar/war/ear/zip archives")]
#[command(
    after_help = "The class name can either be the simple name (e.g. Random) or the fully qualified name (e.g. java.util.Random)."
)]
pub struct Cli {
    /// Directory (or file) to search; repeatable, and `a;b` lists are accepted
    #[arg(short = 'd', long = "directory", value_name = "DIR")]
    pub directories: Vec<PathBuf>,

    /// Class name to search for
    #[arg(short = 'c', long = "class", value_name = "CLASS")]
    pub class_name: String,

    /// Match case
    #[arg(short = 'm', long)]
    pub match_case: bool,

    /// Search sub directories
    #[arg(short = 'r', long)]
    pub recursive: bool,

    /// Print matching method signatures of the found class
    #[arg(short = 'o', long = "method", value_name = "METHOD")]
    pub method: Option<String>,

    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Enable verbose output
    #[arg(short = 'v', long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only print results and errors
    #[arg(short = 'q', long)]
    pub quiet: bool,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}
