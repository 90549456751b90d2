//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Timebase Align - put every session modality on one reference time axis
#[derive(Parser, Debug)]
#[command(
    name = "timebase-align",
    author,
    version,
    about = "Session timebase construction and sample alignment",
    long_about = "Builds one reference timeline for a recording session from a nominal \n\
                  rate, TTL pulse logs or an external clock, maps every configured \n\
                  modality onto it, and gates the result on a jitter budget."
)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, env = "TIMEBASE_VERBOSE")]
    pub verbose: u8,

    /// Suppress all output except warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(
        long,
        value_enum,
        default_value = "pretty",
        global = true,
        env = "TIMEBASE_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Align all modalities and write sidecars
    Align(AlignArgs),

    /// Validate configuration file without aligning
    Validate(ValidateArgs),

    /// Display configuration information
    Info(InfoArgs),
}

/// Arguments for the `align` command
#[derive(Parser, Debug, Clone)]
pub struct AlignArgs {
    /// Path to session configuration file (TOML or JSON)
    #[arg(short, long, default_value = "session.toml", env = "TIMEBASE_CONFIG")]
    pub config: PathBuf,

    /// Report jitter without failing on the budget
    #[arg(long)]
    pub no_enforce_budget: bool,

    /// Override the sidecar output directory
    #[arg(short, long, env = "TIMEBASE_OUTPUT_DIR")]
    pub output: Option<PathBuf>,

    /// Align and log results without writing sidecars
    #[arg(long)]
    pub dry_run: bool,

    /// Metrics server port (0 = disabled)
    #[arg(long, default_value = "0", env = "TIMEBASE_METRICS_PORT")]
    pub metrics_port: u16,
}

/// Arguments for the `validate` command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Path to configuration file to validate
    #[arg(short, long, default_value = "session.toml")]
    pub config: PathBuf,

    /// Output validation result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `info` command
#[derive(Parser, Debug)]
pub struct InfoArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "session.toml")]
    pub config: PathBuf,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Build the reference timeline and show its extent
    #[arg(long)]
    pub timeline: bool,
}

/// Log output format
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    #[default]
    Pretty,
    /// Compact single-line format
    Compact,
}

impl From<LogFormat> for observability::LogFormat {
    fn from(format: LogFormat) -> Self {
        match format {
            LogFormat::Json => Self::Json,
            LogFormat::Pretty => Self::Pretty,
            LogFormat::Compact => Self::Compact,
        }
    }
}
