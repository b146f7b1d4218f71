//! Inkpost Core: shared errors and configuration.
//!
//! This crate has no internal Inkpost dependencies (dependency level 0).
//!
//! # Modules
//!
//! - [`error`]: Error types and Result alias
//! - [`config`]: TOML + environment configuration

#![doc = include_str!("../README.md")]
#![forbid(unsafe_code)]

pub mod config;
pub mod error;

// Re-export key types at crate root for convenience
pub use config::{AuthoritySettings, CacheSettings, InkpostConfig};
pub use error::{Error, Result};
