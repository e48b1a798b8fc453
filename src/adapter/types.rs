//! Adapter request, response and error types
//!
//! These are the shapes exchanged with the host framework, so they all
//! serialize with camelCase field names.

use crate::error::{Error, ErrorCategory};
use crate::types::{JsonObject, JsonValue};
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Request
// ============================================================================

/// Page request as received from the host
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdapterRequest {
    /// Address of the source, `https://` or no scheme
    pub address: String,

    /// Authorization header value, e.g. `SSWS <token>` or `Bearer <token>`
    #[serde(default)]
    pub auth: Option<String>,

    /// Datasource configuration, see [`crate::config::OktaConfig`]
    #[serde(default)]
    pub config: Option<JsonValue>,

    /// Entity to fetch and the attributes wanted from it
    pub entity: EntityConfig,

    /// Whether ordered delivery is required
    #[serde(default)]
    pub ordered: bool,

    /// Records per page
    pub page_size: i64,

    /// Opaque cursor from the previous page, empty to start
    #[serde(default)]
    pub cursor: String,
}

impl fmt::Debug for AdapterRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdapterRequest")
            .field("address", &self.address)
            .field("auth", &self.auth.as_ref().map(|_| "<redacted>"))
            .field("config", &self.config)
            .field("entity", &self.entity)
            .field("ordered", &self.ordered)
            .field("page_size", &self.page_size)
            .field("cursor", &self.cursor)
            .finish()
    }
}

/// Entity requested by the host
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityConfig {
    /// Entity name, e.g. "User"
    pub external_id: String,

    /// Attributes to return
    #[serde(default)]
    pub attributes: Vec<AttributeConfig>,

    /// Nested entities (not supported)
    #[serde(default)]
    pub child_entities: Vec<EntityConfig>,
}

impl EntityConfig {
    /// Create an entity config
    pub fn new(external_id: impl Into<String>) -> Self {
        Self {
            external_id: external_id.into(),
            ..Self::default()
        }
    }

    /// Add an attribute
    #[must_use]
    pub fn attribute(mut self, external_id: impl Into<String>) -> Self {
        self.attributes.push(AttributeConfig::new(external_id));
        self
    }

    /// Add the unique identifier attribute
    #[must_use]
    pub fn unique_attribute(mut self, external_id: impl Into<String>) -> Self {
        self.attributes.push(AttributeConfig {
            external_id: external_id.into(),
            unique_id: true,
        });
        self
    }
}

/// One requested attribute
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeConfig {
    /// Attribute path in the source record, dotted for nested fields
    pub external_id: String,

    /// Whether this attribute uniquely identifies a record
    #[serde(default)]
    pub unique_id: bool,
}

impl AttributeConfig {
    /// Create a plain attribute
    pub fn new(external_id: impl Into<String>) -> Self {
        Self {
            external_id: external_id.into(),
            unique_id: false,
        }
    }
}

// ============================================================================
// Response
// ============================================================================

/// A successful page
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdapterPage {
    /// Records projected to the requested attributes
    pub objects: Vec<JsonObject>,

    /// Cursor for the next page, empty when the sync is complete
    pub next_cursor: String,
}

impl AdapterPage {
    /// Check if this was the last page
    pub fn is_last(&self) -> bool {
        self.next_cursor.is_empty()
    }
}

// ============================================================================
// Errors
// ============================================================================

/// Classification of a failed page request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Address, credential or datasource config is invalid
    InvalidDatasourceConfig,
    /// Entity, attributes, filter or search are invalid
    InvalidEntityConfig,
    /// Page size or cursor is invalid
    InvalidPageRequestConfig,
    /// The source rejected the credential
    DatasourceAuthenticationFailed,
    /// The source is throttling requests
    DatasourceRateLimited,
    /// The source could not be reached or answered with an error
    DatasourceFailed,
    /// Unexpected response or broken invariant
    Internal,
}

impl ErrorCode {
    /// Classify a non-success HTTP status from the source
    pub fn from_http_status(status: u16) -> Self {
        match status {
            401 | 403 => Self::DatasourceAuthenticationFailed,
            429 => Self::DatasourceRateLimited,
            _ => Self::DatasourceFailed,
        }
    }

    /// Whether the host may retry the same request later
    pub fn is_retryable(self) -> bool {
        matches!(self, Self::DatasourceRateLimited | Self::DatasourceFailed)
    }
}

/// Caller-facing error with a stable message and classification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[serde(rename_all = "camelCase")]
#[error("{message}")]
pub struct AdapterError {
    /// Classification
    pub code: ErrorCode,
    /// Human-readable description
    pub message: String,
    /// Raw `Retry-After` value when the source sent one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry_after: Option<String>,
}

impl AdapterError {
    /// Create an error
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            retry_after: None,
        }
    }

    /// Error for a non-success status returned by the source
    pub fn from_status(status: u16, retry_after: Option<String>) -> Self {
        Self {
            code: ErrorCode::from_http_status(status),
            message: format!("Datasource responded with an error status code: {status}."),
            retry_after,
        }
    }
}

impl From<Error> for AdapterError {
    fn from(err: Error) -> Self {
        let code = match &err {
            Error::InvalidCursor { .. } | Error::InvalidPageSize { .. } => {
                ErrorCode::InvalidPageRequestConfig
            }
            Error::Config { .. }
            | Error::InvalidConfigValue { .. }
            | Error::YamlParse(_)
            | Error::InvalidUrl(_) => ErrorCode::InvalidDatasourceConfig,
            _ => match err.category() {
                ErrorCategory::Configuration => ErrorCode::InvalidEntityConfig,
                ErrorCategory::Transport => ErrorCode::DatasourceFailed,
                ErrorCategory::Parse | ErrorCategory::Internal => ErrorCode::Internal,
            },
        };

        let message = match err.category() {
            ErrorCategory::Transport => format!("Failed to execute Okta request: {err}"),
            ErrorCategory::Parse => format!("Failed to parse Okta response: {err}"),
            ErrorCategory::Configuration | ErrorCategory::Internal => err.to_string(),
        };

        Self::new(code, message)
    }
}
