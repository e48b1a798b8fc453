//! HTTP client for collection pages
//!
//! Provides the reqwest-backed datasource that:
//! - Applies the per-call deadline
//! - Classifies transport failures (timeout vs. everything else)
//! - Returns non-success statuses as data
//! - Parses the body into a list of JSON objects

use super::datasource::{Datasource, FetchRequest, FetchResponse};
use crate::error::{Error, Result};
use crate::pagination::next_link_from_headers;
use crate::types::{JsonObject, JsonValue};
use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION, RETRY_AFTER};
use reqwest::Client;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, warn};

/// Configuration for the HTTP client
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Timeout used when a request does not carry its own
    pub timeout: Duration,
    /// Default headers for all requests
    pub default_headers: HashMap<String, String>,
    /// User agent string
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(120),
            default_headers: HashMap::new(),
            user_agent: format!("solidafy-okta/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl HttpClientConfig {
    /// Create a new config builder
    pub fn builder() -> HttpClientConfigBuilder {
        HttpClientConfigBuilder::default()
    }
}

/// Builder for HTTP client config
#[derive(Default)]
pub struct HttpClientConfigBuilder {
    config: HttpClientConfig,
}

impl HttpClientConfigBuilder {
    /// Set the default request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Add a default header
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.default_headers.insert(key.into(), value.into());
        self
    }

    /// Set user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    /// Build the config
    pub fn build(self) -> HttpClientConfig {
        self.config
    }
}

/// HTTP client fetching one collection page per call
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    config: HttpClientConfig,
}

impl HttpClient {
    /// Create a new HTTP client with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(HttpClientConfig::default())
    }

    /// Create a new HTTP client with custom configuration
    pub fn with_config(config: HttpClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()?;

        Ok(Self { client, config })
    }

    /// Fetch one page
    pub async fn get_page(&self, request: &FetchRequest) -> Result<FetchResponse> {
        let mut req = self
            .client
            .get(&request.url)
            .header(ACCEPT, "application/json")
            .header(AUTHORIZATION, &request.auth)
            .timeout(request.timeout);

        for (key, value) in &self.config.default_headers {
            req = req.header(key.as_str(), value.as_str());
        }

        debug!("Requesting page: GET {}", request.url);

        let response = req
            .send()
            .await
            .map_err(|e| classify_transport_error(e, request.timeout))?;

        let status = response.status();
        let retry_after = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        if !status.is_success() {
            warn!(
                "Page request returned {}, retry-after: {:?}",
                status.as_u16(),
                retry_after
            );
            return Ok(FetchResponse {
                status: status.as_u16(),
                retry_after,
                objects: Vec::new(),
                next_cursor: None,
            });
        }

        let next_cursor = next_link_from_headers(response.headers());

        let body = response
            .text()
            .await
            .map_err(|e| classify_transport_error(e, request.timeout))?;
        let objects = parse_objects(&body)?;

        debug!(
            "Page received: status {}, {} objects, next page: {}",
            status.as_u16(),
            objects.len(),
            next_cursor.is_some()
        );

        Ok(FetchResponse {
            status: status.as_u16(),
            retry_after,
            objects,
            next_cursor,
        })
    }
}

#[async_trait]
impl Datasource for HttpClient {
    async fn fetch(&self, request: &FetchRequest) -> Result<FetchResponse> {
        self.get_page(request).await
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Parse a page body into its records
///
/// Anything other than a JSON array of objects, an empty body included,
/// fails the whole page.
pub fn parse_objects(body: &str) -> Result<Vec<JsonObject>> {
    let value: JsonValue = serde_json::from_str(body)?;
    let JsonValue::Array(items) = value else {
        return Err(Error::decode(format!(
            "expected a JSON array of objects, got {}",
            json_kind(&value)
        )));
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| match item {
            JsonValue::Object(map) => Ok(map),
            other => Err(Error::decode(format!(
                "expected an object at index {index}, got {}",
                json_kind(&other)
            ))),
        })
        .collect()
}

fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "a boolean",
        JsonValue::Number(_) => "a number",
        JsonValue::String(_) => "a string",
        JsonValue::Array(_) => "an array",
        JsonValue::Object(_) => "an object",
    }
}

/// Map a reqwest failure to a transport error, singling out the deadline
fn classify_transport_error(e: reqwest::Error, timeout: Duration) -> Error {
    if e.is_timeout() {
        warn!("Page request timed out after {:?}", timeout);
        return Error::Timeout {
            timeout_ms: timeout.as_millis() as u64,
        };
    }
    Error::Http(e)
}
