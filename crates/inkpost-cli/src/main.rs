//! Inkpost CLI
//!
//! Command-line interface for converting Markdown into publishing-platform
//! HTML.

#![warn(clippy::all)]
#![forbid(unsafe_code)]

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use inkpost_cli::commands::{self, ConvertArgs};
use inkpost_cli::config_handlers::handle_config_command;
use inkpost_cli::{Args, Command};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // RUST_LOG wins over --verbose
    let default_filter = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!(command = ?args.command, "Starting inkpost");

    match args.command {
        Command::Convert {
            input,
            title,
            author,
            digest,
            json,
        } => {
            let markdown = commands::read_input(&input).await?;
            let options = ConvertArgs {
                title,
                author,
                digest,
                json,
            };
            println!("{}", commands::render_convert(&markdown, &options)?);
        }
        Command::Frontmatter { input } => {
            let markdown = commands::read_input(&input).await?;
            println!("{}", commands::render_frontmatter(&markdown)?);
        }
        Command::Config { action } => {
            handle_config_command(args.config.as_deref(), action)?;
        }
    }

    Ok(())
}
