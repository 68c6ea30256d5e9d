//! Break-compliance dashboard CLI library.
//!
//! This crate provides the CLI interface for the break-compliance analyzer.

mod cli;
pub mod commands;
mod config;

pub use cli::{Cli, Commands};
pub use config::{Config, PeriodOrder};
