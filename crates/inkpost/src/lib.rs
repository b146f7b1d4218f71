//! Inkpost: Markdown publishing with cached credentials.
//!
//! This crate re-exports the Inkpost components and adds the draft
//! publishing workflow in [`publish`].

#![doc = include_str!("../README.md")]
#![forbid(unsafe_code)]

pub use inkpost_auth as auth;
pub use inkpost_content as content;
pub use inkpost_core as core;

pub mod error;
pub mod publish;

pub use error::{Error, Result};
pub use publish::{
    publish_draft, resolve_title, DraftRequest, DraftResponse, MockPublisher, Publisher,
};
