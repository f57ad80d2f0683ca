//! Command-line interface

use std::path::PathBuf;

use clap::{ArgAction, Parser};

pub mod commands;

pub use commands::Commands;

#[derive(Parser, Debug)]
#[command(
    name = "memdex",
    version,
    about = "Member directory with tiered full-text search",
    propagate_version = true
)]
pub struct Cli {
    /// Emit machine-readable JSON output
    #[arg(long, global = true)]
    pub robot: bool,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress log output entirely
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to a config file (overrides discovery)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Memdex root directory (overrides MEMDEX_ROOT and discovery)
    #[arg(long, global = true, value_name = "DIR")]
    pub root: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}
