//! streamer-embed library crate.
//!
//! Expands the `#streamer` and `#streamerinfo` directives into live status
//! markup and keeps the claim records those directives create in sync with
//! page edits.

pub mod config;
pub mod database;
pub mod embed;
pub mod error;
pub mod logging;
pub mod params;
pub mod template;

pub use embed::{ClaimTransition, DirectiveOutput, PageContext, StreamerEmbed};
pub use error::{Error, Result};
