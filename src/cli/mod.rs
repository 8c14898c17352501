//! CLI module for Pizzaiolo.

pub mod commands;
mod output;
pub mod preflight;

pub use output::Output;

use clap::{Parser, Subcommand};

/// Pizzaiolo - hosted pizza agent CLI
///
/// Provisions a named agent on a hosted agent service (reference documents,
/// vector store, tools) and chats with it interactively.
#[derive(Parser, Debug)]
#[command(name = "pizzaiolo")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Provision the agent and start an interactive chat session
    Chat {
        /// Model the agent runs on (overrides configuration)
        #[arg(short, long)]
        model: Option<String>,
    },

    /// Check environment and configuration
    Doctor,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,
}
