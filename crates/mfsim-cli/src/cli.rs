//! CLI argument definitions for the `mfsim` tool.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "mfsim",
    version,
    about = "Inspect, check and re-emit MFSim value item documents",
    long_about = "Work with MFSim value item container documents.\n\n\
                  Lists items, validates cell values against their type formats,\n\
                  derives schema items and writes documents in canonical form."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// List the value items of a container document.
    Inspect(InspectArgs),

    /// Validate every cell value against its type format.
    Check(CheckArgs),

    /// Print the schema item derived from a matrix item.
    Schema(SchemaArgs),

    /// Re-emit a container document in canonical form.
    Format(FormatArgs),
}

#[derive(Parser)]
pub struct InspectArgs {
    /// Container document to read.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Print a JSON summary instead of a table.
    #[arg(long = "json")]
    pub json: bool,
}

#[derive(Parser)]
pub struct CheckArgs {
    /// Container document to read.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Print the report as JSON instead of a table.
    #[arg(long = "json")]
    pub json: bool,
}

#[derive(Parser)]
pub struct SchemaArgs {
    /// Container document to read.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Name of the matrix item to derive the schema from.
    #[arg(long = "item", value_name = "NAME")]
    pub item: String,

    /// Name of the schema item (default: the item name).
    #[arg(long = "schema-name", value_name = "NAME")]
    pub schema_name: Option<String>,
}

#[derive(Parser)]
pub struct FormatArgs {
    /// Container document to read.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Write to this file instead of stdout.
    #[arg(long = "output", short = 'o', value_name = "PATH")]
    pub output: Option<PathBuf>,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
