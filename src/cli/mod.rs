//! CLI module
//!
//! Command-line interface for the Okta connector.
//!
//! # Commands
//!
//! - `read` - Fetch one page, or every page with `--all`
//! - `serve` - Start HTTP server mode

mod commands;
mod runner;
mod server;

pub use commands::{Cli, Commands, ReadArgs};
pub use runner::{read_pages, Runner};
pub use server::{router, serve};
