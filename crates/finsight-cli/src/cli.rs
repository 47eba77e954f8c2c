//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Finsight - Financial wellbeing snapshots and scenarios
#[derive(Parser)]
#[command(name = "finsight")]
#[command(about = "Financial wellbeing dashboard backend", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Data directory containing profiles/<id>.json
    #[arg(long, env = "FINSIGHT_DATA_DIR", default_value = "data", global = true)]
    pub data_dir: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List available profiles
    Profiles,

    /// Show the snapshot and summary for a period
    Snapshot {
        /// Period key (6M, 1Y, 3Y, 5Y)
        #[arg(short, long, default_value = "6M")]
        period: String,

        /// Profile ID
        #[arg(long, default_value = "james_thompson")]
        profile: String,

        /// Scenario question that steers the summary
        #[arg(short, long)]
        question: Option<String>,

        /// Ask the AI backend for the summary (falls back to rules)
        #[arg(long)]
        ai_summary: bool,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Answer a scenario question
    Simulate {
        /// The question, e.g. "retire at 60"
        question: Vec<String>,

        /// Period key (6M, 1Y, 3Y, 5Y)
        #[arg(short, long, default_value = "6M")]
        period: String,

        /// Profile ID
        #[arg(long, default_value = "james_thompson")]
        profile: String,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Start the web server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Directory with the built dashboard to serve
        #[arg(long)]
        static_dir: Option<PathBuf>,

        /// Allowed CORS origin (repeatable, "*" for any)
        #[arg(long = "allow-origin")]
        allow_origins: Vec<String>,
    },

    /// Manage AI prompts
    Prompts {
        #[command(subcommand)]
        action: Option<PromptsAction>,
    },
}

#[derive(Subcommand)]
pub enum PromptsAction {
    /// List all available prompts and their override status
    List,

    /// Show the content of a specific prompt
    Show {
        /// Prompt ID (e.g., scenario_coach, facts_summary)
        prompt_id: String,
    },

    /// Show the path where prompt overrides should be placed
    Path,
}
