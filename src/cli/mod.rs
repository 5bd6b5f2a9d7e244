//! CLI module for Velg.

pub mod commands;
mod output;
pub mod preflight;

pub use output::Output;

use clap::{Parser, Subcommand};

/// Velg - Voice-driven YouTube video picker
///
/// Speak or type a query and get an AI-picked recommendation from recent
/// YouTube uploads. The name "Velg" comes from the Norwegian word for "choose."
#[derive(Parser, Debug)]
#[command(name = "velg")]
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
    /// Find the best recent video for a query
    Find {
        /// The query to search for (prompts interactively if omitted)
        query: Option<String>,

        /// Skip the input prompt and capture the query by voice
        #[arg(long)]
        voice: bool,

        /// LLM model to use for the recommendation
        #[arg(short, long)]
        model: Option<String>,

        /// Only consider videos published within this many days
        #[arg(short, long)]
        days: Option<i64>,
    },

    /// Check API keys, microphone, and configuration
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

    /// Set a configuration value
    Set {
        /// Configuration key (e.g., "recommend.model")
        key: String,
        /// Configuration value
        value: String,
    },

    /// Open configuration file in editor
    Edit,

    /// Show configuration file path
    Path,
}
