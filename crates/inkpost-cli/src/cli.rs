//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Inkpost - Markdown to publishing-platform HTML
#[derive(Parser, Debug)]
#[command(name = "inkpost", version)]
#[command(about = "Convert Markdown into HTML for the publishing platform", long_about = None)]
pub struct Args {
    /// Configuration file path
    #[arg(short, long, global = true, env = "INKPOST_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Convert a Markdown file into platform HTML
    Convert {
        /// Markdown file, or `-` for stdin
        input: String,

        /// Article title (defaults to frontmatter, then the first heading)
        #[arg(long)]
        title: Option<String>,

        /// Article author
        #[arg(long)]
        author: Option<String>,

        /// Short summary
        #[arg(long)]
        digest: Option<String>,

        /// Print the full article as JSON instead of bare HTML
        #[arg(long)]
        json: bool,
    },

    /// Print a document's frontmatter as JSON
    Frontmatter {
        /// Markdown file, or `-` for stdin
        input: String,
    },

    /// Configuration management
    Config {
        /// Config action to run
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// `config` subcommands.
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show the resolved config file path
    Path,

    /// Show the effective configuration with secrets hidden
    Show,

    /// Write a default config file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}
