//! Finsight CLI - Financial wellbeing snapshots and scenarios
//!
//! Usage:
//!   finsight profiles                       List profiles
//!   finsight snapshot --period 1Y           Show a period snapshot and summary
//!   finsight simulate "retire at 60"        Answer a scenario question
//!   finsight serve --port 3000              Start web server

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    match cli.command {
        Commands::Profiles => commands::cmd_profiles(&cli.data_dir),
        Commands::Snapshot {
            period,
            profile,
            question,
            ai_summary,
            json,
        } => {
            commands::cmd_snapshot(
                &cli.data_dir,
                &profile,
                &period,
                question.as_deref().unwrap_or_default(),
                ai_summary,
                json,
            )
            .await
        }
        Commands::Simulate {
            question,
            period,
            profile,
            json,
        } => {
            commands::cmd_simulate(&cli.data_dir, &profile, &period, &question.join(" "), json)
                .await
        }
        Commands::Serve {
            port,
            host,
            static_dir,
            allow_origins,
        } => {
            commands::cmd_serve(
                &cli.data_dir,
                &host,
                port,
                static_dir.as_deref(),
                allow_origins,
            )
            .await
        }
        Commands::Prompts { action } => match action {
            None | Some(PromptsAction::List) => commands::cmd_prompts_list(),
            Some(PromptsAction::Show { prompt_id }) => commands::cmd_prompts_show(&prompt_id),
            Some(PromptsAction::Path) => commands::cmd_prompts_path(),
        },
    }
}
