//! CLI command definitions and subcommands

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// stackdump - diagnostic dump trigger for the stack runtime
#[derive(Parser)]
#[command(
    name = "sd",
    about = "Trigger a diagnostic dump of the stack runtime",
    version,
    after_help = "Logs are written to: ~/.local/share/stackdump/logs/stackdump.log"
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// CLI subcommands
#[derive(Subcommand)]
pub enum Command {
    /// Run one dump cycle against the built-in demo stack
    Dump {
        /// Arguments forwarded unmodified to every dump target
        args: Vec<String>,
    },
}
