//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::commands::day::DayArgs;
use crate::commands::report::ReportArgs;

/// Break-compliance dashboard for exported time entries.
///
/// Groups entries by day, flags days that break the statutory break policy
/// and warns about overlapping entries.
#[derive(Debug, Parser)]
#[command(name = "bw", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show the per-day compliance report.
    Report(ReportArgs),

    /// Show the timeline and entries of a single day.
    Day(DayArgs),
}
