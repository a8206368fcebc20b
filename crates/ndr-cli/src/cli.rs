//! CLI argument definitions for the NDR record checker.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "ndr-check",
    version,
    about = "NDR record checker - Find data-quality issues in NDR patient records",
    long_about = "Check a single NDR patient record (XML) against the clinical\n\
                  data-quality rules used for HIV treatment reporting.\n\n\
                  Reports missing regimens, visit ordering problems, TB/IPT gaps,\n\
                  incomplete lab reports, MMD omissions, ARV code mismatches and\n\
                  age inconsistencies."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
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

    /// Allow patient values (dates, codes, file names) in log output.
    ///
    /// Off by default; logs then carry counts and rule ids only.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Check one NDR record document.
    Check(CheckArgs),

    /// List the data-quality rules.
    Rules,
}

#[derive(Parser)]
pub struct CheckArgs {
    /// Path to the NDR record (.xml).
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Report format.
    #[arg(long = "format", value_enum, default_value = "text")]
    pub format: ReportFormatArg,

    /// Exit with a failure status when only warnings are found.
    #[arg(long = "warnings-as-errors")]
    pub warnings_as_errors: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportFormatArg {
    Text,
    Json,
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
