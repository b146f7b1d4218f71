//! # inkpost-cli
//!
//! Command-line tools for Inkpost:
//! - Markdown conversion to platform HTML or article JSON
//! - Frontmatter inspection
//! - Configuration file management

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]

pub mod cli;
pub mod commands;
pub mod config_handlers;

pub use cli::{Args, Command, ConfigAction};
