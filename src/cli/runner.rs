//! CLI runner - executes commands

use crate::adapter::{Adapter, AdapterRequest, AttributeConfig, EntityConfig};
use crate::cli::commands::{Cli, Commands, ReadArgs};
use crate::config::OktaConfig;
use crate::error::{Error, Result};
use crate::state::StateManager;
use crate::types::UNIQUE_ID_FIELD;
use std::io::Write;
use tracing::{debug, info, warn};

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Read(args) => self.read(args).await,
            Commands::Serve { port } => crate::cli::serve(Adapter::with_http()?, *port).await,
        }
    }

    /// Read pages, aborting in-flight requests on Ctrl-C
    async fn read(&self, args: &ReadArgs) -> Result<()> {
        let adapter = Adapter::with_http()?;
        let state = match &args.state {
            Some(path) => StateManager::from_file(path)?,
            None => StateManager::in_memory(),
        };

        let mut stdout = std::io::stdout();
        tokio::select! {
            result = read_pages(&adapter, args, &state, &mut stdout) => {
                let pages = result?;
                info!("Read {pages} page(s) of {}", args.entity);
                Ok(())
            }
            _ = tokio::signal::ctrl_c() => {
                warn!("Interrupted, {} cursor left at the last completed page", args.entity);
                Err(Error::Other("Interrupted".to_string()))
            }
        }
    }
}

/// Fetch pages and write each one to `out` as a JSON line
///
/// The cursor starts from `--cursor`, then the state, then the beginning.
/// After every page the state holds the cursor of the next one, so an
/// interrupted run resumes where it stopped. Returns the number of pages.
pub async fn read_pages<W: Write>(
    adapter: &Adapter,
    args: &ReadArgs,
    state: &StateManager,
    out: &mut W,
) -> Result<usize> {
    let config = match &args.config {
        Some(path) => Some(serde_json::to_value(OktaConfig::load(path)?)?),
        None => None,
    };

    let mut cursor = match &args.cursor {
        Some(cursor) => cursor.clone(),
        None => state.resume_cursor(&args.entity).await.unwrap_or_default(),
    };

    let mut pages = 0;
    loop {
        let request = AdapterRequest {
            address: args.address.clone(),
            auth: Some(args.auth.clone()),
            config: config.clone(),
            entity: entity_config(args),
            ordered: false,
            page_size: args.page_size,
            cursor,
        };

        let page = adapter
            .get_page(&request)
            .await
            .map_err(|e| Error::Other(format!("{:?}: {}", e.code, e.message)))?;
        pages += 1;

        writeln!(out, "{}", serde_json::to_string(&page)?)?;
        debug!("Page {pages}: {} record(s)", page.objects.len());

        if page.is_last() {
            state.mark_completed(&args.entity).await?;
            break;
        }
        state.set_cursor(&args.entity, page.next_cursor.clone()).await?;

        if !args.all {
            break;
        }
        cursor = page.next_cursor;
    }

    Ok(pages)
}

/// Requested attributes, with the unique id always included
fn entity_config(args: &ReadArgs) -> EntityConfig {
    let mut entity = EntityConfig::new(&args.entity).unique_attribute(UNIQUE_ID_FIELD);
    entity.attributes.extend(
        args.attributes
            .iter()
            .map(|attr| attr.trim())
            .filter(|attr| !attr.is_empty() && *attr != UNIQUE_ID_FIELD)
            .map(AttributeConfig::new),
    );
    entity
}
