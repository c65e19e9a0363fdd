use clap::Parser;
use owo_colors::OwoColorize;
use std::process;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cli;
mod commands;
mod output;

use cli::{Cli, Commands};
use commands::*;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries command output and the serve protocol.
    let default_filter = match cli.verbose {
        0 => "recfix_cli=info,recfix_core=info",
        _ => "recfix_cli=debug,recfix_core=debug",
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let result = match &cli.command {
        Commands::Resolve { inputs, allow_ids } => resolve::run(&cli, inputs, *allow_ids).await,
        Commands::Related { seed } => related::run(&cli, seed).await,
        Commands::Recommend {
            seeds,
            limit,
            from_page,
            save,
            token,
        } => {
            recommend::run(
                &cli,
                seeds,
                *limit,
                from_page.as_deref(),
                *save,
                token.as_deref(),
            )
            .await
        }
        Commands::Save { videos, token } => save::run(&cli, videos, token.as_deref()).await,
        Commands::Scrape { file } => scrape::run(&cli, file).await,
        Commands::Serve => serve::run().await,
        Commands::Auth { action } => auth::run(&cli, action.clone()).await,
        Commands::Config { action } => config::run(&cli, action.clone()).await,
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        process::exit(1);
    }
}
