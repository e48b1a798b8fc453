//! CLI commands and argument parsing

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Solidafy Okta connector CLI
#[derive(Parser, Debug)]
#[command(name = "solidafy-okta")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Read pages of an entity
    Read(ReadArgs),

    /// Start HTTP server mode
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "8080")]
        port: u16,
    },
}

/// Arguments of the `read` command
#[derive(Args, Debug, Clone)]
pub struct ReadArgs {
    /// Okta domain, e.g. acme.okta.com
    #[arg(short, long)]
    pub address: String,

    /// Authorization header value (`SSWS <token>` or `Bearer <token>`)
    #[arg(long, env = "OKTA_AUTH", hide_env_values = true)]
    pub auth: String,

    /// Entity to read: User, Application, Group or GroupMember
    #[arg(short, long)]
    pub entity: String,

    /// Attributes to return (comma-separated, dotted paths allowed)
    #[arg(long, value_delimiter = ',', default_value = "id")]
    pub attributes: Vec<String>,

    /// Records per page
    #[arg(long, default_value = "200")]
    pub page_size: i64,

    /// Cursor to resume from (overrides the state file)
    #[arg(long)]
    pub cursor: Option<String>,

    /// Datasource configuration file (YAML or JSON)
    #[arg(short = 'C', long)]
    pub config: Option<PathBuf>,

    /// State file (JSON)
    #[arg(short, long)]
    pub state: Option<PathBuf>,

    /// Keep reading until the entity is exhausted
    #[arg(long)]
    pub all: bool,
}
