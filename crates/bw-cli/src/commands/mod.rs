//! CLI subcommand implementations.

pub mod day;
pub mod report;
pub mod util;
