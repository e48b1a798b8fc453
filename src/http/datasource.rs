//! Datasource seam between the traversal and the wire

use crate::error::Result;
use crate::types::JsonObject;
use async_trait::async_trait;
use std::fmt;
use std::time::Duration;

/// One fully-built page request
#[derive(Clone)]
pub struct FetchRequest {
    /// Complete page URL
    pub url: String,
    /// Authorization header value, scheme included
    pub auth: String,
    /// Deadline for the whole exchange
    pub timeout: Duration,
}

impl FetchRequest {
    /// Create a fetch request
    pub fn new(url: impl Into<String>, auth: impl Into<String>, timeout: Duration) -> Self {
        Self {
            url: url.into(),
            auth: auth.into(),
            timeout,
        }
    }
}

impl fmt::Debug for FetchRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FetchRequest")
            .field("url", &self.url)
            .field("auth", &"<redacted>")
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Outcome of one page request that reached the source
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FetchResponse {
    /// HTTP status code
    pub status: u16,
    /// Raw `Retry-After` header value
    pub retry_after: Option<String>,
    /// Records of the page, empty on a non-success status
    pub objects: Vec<JsonObject>,
    /// Next page URL from the `Link` headers
    pub next_cursor: Option<String>,
}

impl FetchResponse {
    /// Check if the source answered with a 2xx status
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Source of collection pages
///
/// Implementations return `Err` only when the exchange itself failed
/// (connection, deadline, unreadable body). A non-success status is an
/// `Ok` response with no objects.
#[async_trait]
pub trait Datasource: Send + Sync {
    /// Fetch one page
    async fn fetch(&self, request: &FetchRequest) -> Result<FetchResponse>;
}
