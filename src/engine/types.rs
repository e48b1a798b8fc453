//! Engine types
//!
//! Request and result of one page step.

use crate::cursor::ResumeToken;
use crate::endpoint::DEFAULT_API_VERSION;
use crate::types::{EntityKind, JsonObject};
use std::fmt;
use std::time::Duration;

/// Default number of records per page
pub const DEFAULT_PAGE_SIZE: u32 = 200;

/// Default deadline for each outbound request
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// One page step of a traversal
#[derive(Clone)]
pub struct PageRequest {
    /// Entity kind being synced
    pub entity: EntityKind,
    /// Records per page, must be greater than 0
    pub page_size: u32,
    /// Filter expression (for `GroupMember`, applied to the group query)
    pub filter: Option<String>,
    /// Search expression (for `GroupMember`, applied to the group query)
    pub search: Option<String>,
    /// Base address, scheme included
    pub base_url: String,
    /// API version path segment
    pub api_version: String,
    /// Authorization header value
    pub auth: String,
    /// Where the previous step stopped
    pub cursor: ResumeToken,
    /// Deadline for each outbound request
    pub timeout: Duration,
}

impl PageRequest {
    /// Create a first-page request with defaults
    pub fn new(entity: EntityKind, base_url: impl Into<String>, auth: impl Into<String>) -> Self {
        Self {
            entity,
            page_size: DEFAULT_PAGE_SIZE,
            filter: None,
            search: None,
            base_url: base_url.into(),
            api_version: DEFAULT_API_VERSION.to_string(),
            auth: auth.into(),
            cursor: ResumeToken::Start,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Set page size
    #[must_use]
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    /// Set filter expression
    #[must_use]
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    /// Set search expression
    #[must_use]
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    /// Set API version
    #[must_use]
    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = version.into();
        self
    }

    /// Set resume cursor
    #[must_use]
    pub fn with_cursor(mut self, cursor: ResumeToken) -> Self {
        self.cursor = cursor;
        self
    }

    /// Set per-request timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl fmt::Debug for PageRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PageRequest")
            .field("entity", &self.entity)
            .field("page_size", &self.page_size)
            .field("filter", &self.filter)
            .field("search", &self.search)
            .field("base_url", &self.base_url)
            .field("api_version", &self.api_version)
            .field("auth", &"<redacted>")
            .field("cursor", &self.cursor)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Outcome of one page step
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageResult {
    /// HTTP status of the last request issued
    pub status: u16,
    /// Raw `Retry-After` value of the last request issued
    pub retry_after: Option<String>,
    /// Records of this page, possibly empty
    pub objects: Vec<JsonObject>,
    /// Where to resume. `None` means the sync is complete.
    pub next_cursor: Option<ResumeToken>,
}

impl PageResult {
    /// Check if the source answered with a 2xx status
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Check if this was the last page of the sync
    ///
    /// Only meaningful on success: a failed step carries no cursor and the
    /// caller retries with the cursor it sent.
    pub fn is_done(&self) -> bool {
        self.is_success() && self.next_cursor.is_none()
    }
}
