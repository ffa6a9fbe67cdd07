use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// CLI arguments for the guardlint binary.
#[derive(Parser, Debug)]
#[command(
    name = "guardlint",
    version,
    about = "Finds calls that need a runtime guard and checks that one is in place"
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Path to guardlint.json. Defaults to guardlint.json in the working directory.
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,

    /// Apply the suggested fixes in place, then report what is left.
    #[arg(long)]
    pub fix: bool,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, ignore_case = true)]
    pub format: OutputFormat,

    /// Colorize text output. Defaults to on when stdout is a terminal.
    #[arg(long)]
    pub pretty: Option<bool>,

    /// Files or directories to lint. Defaults to the working directory.
    #[arg(value_name = "PATH")]
    pub paths: Vec<PathBuf>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// List the active rules after applying the configuration.
    Rules,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}
