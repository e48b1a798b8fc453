//! Adapter facade
//!
//! Validates a host page request, runs one engine step and turns the result
//! into projected records plus an opaque cursor string.
//!
//! # Overview
//!
//! - `Adapter` - Entry point used by the CLI and the HTTP server
//! - `AdapterRequest` / `AdapterPage` - Host-facing request and response
//! - `AdapterError` / `ErrorCode` - Host-facing error classification
//!
//! # Example
//!
//! ```ignore
//! use solidafy_okta::adapter::{Adapter, AdapterRequest, EntityConfig};
//!
//! let adapter = Adapter::with_http()?;
//! let page = adapter
//!     .get_page(&AdapterRequest {
//!         address: "acme.okta.com".to_string(),
//!         auth: Some("SSWS 00abc".to_string()),
//!         entity: EntityConfig::new("User").unique_attribute("id"),
//!         page_size: 200,
//!         ..Default::default()
//!     })
//!     .await?;
//! ```

mod types;

pub use types::{AdapterError, AdapterPage, AdapterRequest, AttributeConfig, EntityConfig, ErrorCode};

use crate::config::OktaConfig;
use crate::cursor;
use crate::engine::{PageRequest, SyncEngine};
use crate::error::Result;
use crate::http::Datasource;
use crate::types::{EntityKind, JsonObject, JsonValue, UNIQUE_ID_FIELD};
use std::sync::Arc;
use tracing::{debug, warn};
use url::Url;

const HTTPS_PREFIX: &str = "https://";
const HTTP_PREFIX: &str = "http://";
const AUTH_PREFIXES: [&str; 2] = ["Bearer ", "SSWS "];

/// Paginated connector facade
#[derive(Debug, Clone)]
pub struct Adapter {
    engine: SyncEngine,
}

impl Adapter {
    /// Create an adapter over any datasource
    pub fn new(datasource: Arc<dyn Datasource>) -> Self {
        Self {
            engine: SyncEngine::new(datasource),
        }
    }

    /// Create an adapter backed by the default HTTP client
    pub fn with_http() -> Result<Self> {
        Ok(Self {
            engine: SyncEngine::with_http()?,
        })
    }

    /// Fetch one page for the host
    ///
    /// Every check runs before any request is sent. A source answering with
    /// a non-success status becomes an error carrying its `Retry-After` hint;
    /// the host retries with the cursor it sent.
    pub async fn get_page(
        &self,
        request: &AdapterRequest,
    ) -> std::result::Result<AdapterPage, AdapterError> {
        let page_request = prepare(request)?;
        debug!(
            "Fetching {} page of {} at {}",
            page_request.entity, page_request.page_size, page_request.base_url
        );

        let result = self.engine.get_page(&page_request).await.map_err(|e| {
            warn!("{} page failed: {e}", page_request.entity);
            AdapterError::from(e)
        })?;

        if !result.is_success() {
            warn!(
                "{} page failed with status {}",
                page_request.entity, result.status
            );
            return Err(AdapterError::from_status(result.status, result.retry_after));
        }

        let next_cursor = match &result.next_cursor {
            Some(token) => cursor::encode(token)?,
            None => String::new(),
        };

        let objects = result
            .objects
            .iter()
            .map(|object| project(object, &request.entity.attributes))
            .collect();

        Ok(AdapterPage {
            objects,
            next_cursor,
        })
    }
}

/// Validate a host request and build the engine step for it
fn prepare(request: &AdapterRequest) -> std::result::Result<PageRequest, AdapterError> {
    let config = match &request.config {
        Some(value) => OktaConfig::from_value(value.clone()).map_err(|e| {
            AdapterError::new(
                ErrorCode::InvalidDatasourceConfig,
                format!("Failed to load datasource config: {e}"),
            )
        })?,
        None => OktaConfig::default(),
    };

    let base_url = normalize_address(&request.address)?;
    let base = Url::parse(&base_url).map_err(|e| {
        AdapterError::new(
            ErrorCode::InvalidDatasourceConfig,
            format!("Invalid datasource address {base_url}: {e}"),
        )
    })?;
    let auth = validate_auth(request.auth.as_deref())?;

    let entity: EntityKind = request.entity.external_id.parse().map_err(|_| {
        AdapterError::new(
            ErrorCode::InvalidEntityConfig,
            format!(
                "Provided entity external ID {} is not supported.",
                request.entity.external_id
            ),
        )
    })?;

    let has_unique_id = request
        .entity
        .attributes
        .iter()
        .any(|attr| attr.external_id == UNIQUE_ID_FIELD && attr.unique_id);
    if !has_unique_id {
        return Err(AdapterError::new(
            ErrorCode::InvalidEntityConfig,
            format!("Entity {entity} must request the unique attribute {UNIQUE_ID_FIELD}."),
        ));
    }

    if !request.entity.child_entities.is_empty() {
        return Err(AdapterError::new(
            ErrorCode::InvalidEntityConfig,
            format!("Entity {entity} does not support child entities."),
        ));
    }

    if request.ordered {
        return Err(AdapterError::new(
            ErrorCode::InvalidPageRequestConfig,
            "Ordered responses are not supported.",
        ));
    }

    let page_size = u32::try_from(request.page_size)
        .ok()
        .filter(|size| *size > 0)
        .ok_or_else(|| {
            AdapterError::new(
                ErrorCode::InvalidPageRequestConfig,
                format!(
                    "Provided page size {} must be greater than 0.",
                    request.page_size
                ),
            )
        })?;

    let resume = cursor::decode(&request.cursor, entity)?;
    resume.validate_origin(entity, &base)?;

    let mut page_request = PageRequest::new(entity, base_url, auth)
        .with_page_size(page_size)
        .with_api_version(config.api_version.clone())
        .with_cursor(resume)
        .with_timeout(config.request_timeout());
    page_request.filter = config.filter_for(entity).map(str::to_string);
    page_request.search = config.search_for(entity).map(str::to_string);

    Ok(page_request)
}

/// Require `https://`, prefixing addresses that have no scheme
fn normalize_address(address: &str) -> std::result::Result<String, AdapterError> {
    let address = address.trim();

    if address.is_empty() {
        return Err(AdapterError::new(
            ErrorCode::InvalidDatasourceConfig,
            "Datasource address must be provided.",
        ));
    }

    if has_scheme(address, HTTP_PREFIX) {
        return Err(AdapterError::new(
            ErrorCode::InvalidDatasourceConfig,
            "The provided datasource address must use https.",
        ));
    }

    if has_scheme(address, HTTPS_PREFIX) {
        Ok(address.to_string())
    } else {
        Ok(format!("{HTTPS_PREFIX}{address}"))
    }
}

/// Schemes are case-insensitive
fn has_scheme(address: &str, prefix: &str) -> bool {
    address
        .get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}

fn validate_auth(auth: Option<&str>) -> std::result::Result<String, AdapterError> {
    let auth = auth.map(str::trim).filter(|auth| !auth.is_empty()).ok_or_else(|| {
        AdapterError::new(
            ErrorCode::InvalidDatasourceConfig,
            "Datasource auth must be provided.",
        )
    })?;

    if !AUTH_PREFIXES.iter().any(|prefix| auth.starts_with(prefix)) {
        return Err(AdapterError::new(
            ErrorCode::InvalidDatasourceConfig,
            "Datasource auth must be a Bearer or SSWS authorization value.",
        ));
    }

    Ok(auth.to_string())
}

/// Keep only the requested attributes, resolving dotted paths
///
/// `profile.email` reads `object["profile"]["email"]` and is returned under
/// the key `profile.email`. Missing attributes are left out.
fn project(object: &JsonObject, attributes: &[AttributeConfig]) -> JsonObject {
    attributes
        .iter()
        .filter_map(|attr| {
            lookup(object, &attr.external_id).map(|value| (attr.external_id.clone(), value.clone()))
        })
        .collect()
}

fn lookup<'a>(object: &'a JsonObject, path: &str) -> Option<&'a JsonValue> {
    if let Some(value) = object.get(path) {
        return Some(value);
    }

    let mut parts = path.split('.');
    let mut current = object.get(parts.next()?)?;
    for part in parts {
        current = current.as_object()?.get(part)?;
    }
    Some(current)
}

#[cfg(test)]
mod tests;
