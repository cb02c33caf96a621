//! Command-line interface argument parsing and definitions
//!
//! This module defines the CLI structure using clap's derive API.

use clap::{Parser, Subcommand, ValueEnum};
use std::io::IsTerminal;
use std::path::PathBuf;

/// Racefetch CLI - Race HTTP providers with ordered fallback
///
/// Loads a providers file, tries each provider in priority order and prints
/// the first normalized response.
#[derive(Parser, Debug)]
#[command(
    name = "racefetch",
    version,
    author,
    about,
    long_about = None,
    propagate_version = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Enable verbose output (can be used multiple times for increased verbosity)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all non-essential output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Output format for results
    #[arg(short, long, value_enum, global = true, default_value = "json-pretty")]
    pub output: OutputFormat,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// The subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a race and print the winning response
    Run(RunArgs),

    /// Print the order in which providers would be tried
    Order(OrderArgs),
}

/// Arguments for the run command
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Providers file (YAML or JSON); searched in default locations when omitted
    #[arg(value_name = "FILE", env = "RACEFETCH_CONFIG")]
    pub file: Option<PathBuf>,

    /// Per-attempt timeout in milliseconds, overriding the file
    #[arg(long, value_name = "MS")]
    pub timeout_per_attempt: Option<u64>,

    /// Stop at the first failed provider
    #[arg(long)]
    pub no_fallback: bool,

    /// Treat non-2xx responses as failed attempts
    #[arg(long)]
    pub reject_error_status: bool,

    /// Save the response to a file instead of printing it
    #[arg(long = "save-to", value_name = "OUTPUT_FILE")]
    pub save_to: Option<PathBuf>,
}

/// Arguments for the order command
#[derive(Parser, Debug)]
pub struct OrderArgs {
    /// Providers file (YAML or JSON); searched in default locations when omitted
    #[arg(value_name = "FILE", env = "RACEFETCH_CONFIG")]
    pub file: Option<PathBuf>,
}

/// Output format options
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable formatted output
    Human,
    /// JSON output
    Json,
    /// Pretty-printed JSON output
    JsonPretty,
    /// YAML output
    Yaml,
}

impl Cli {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Get the effective verbosity level (considering quiet flag)
    pub fn verbosity_level(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose
        }
    }

    /// Check if colored output should be used
    pub fn use_color(&self) -> bool {
        !self.no_color && std::io::stdout().is_terminal()
    }
}
