//! Error types for Solidafy Okta
//!
//! This module defines the error hierarchy for the entire connector.
//! All public APIs return `Result<T, Error>` where Error is defined here.
//!
//! Every variant falls into one [`ErrorCategory`]. Only transport errors are
//! retryable; configuration, parse and internal errors are always fatal for
//! the page being fetched.

use thiserror::Error;

/// The main error type for Solidafy Okta
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid config value for '{field}': {message}")]
    InvalidConfigValue { field: String, message: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Filter and search cannot both be set for entity {entity}")]
    FilterAndSearch { entity: String },

    #[error("Filter for entity {entity} is too short to be a valid expression: {filter}")]
    InvalidFilter { entity: String, filter: String },

    #[error("Search for entity {entity} is too short to be a valid expression: {search}")]
    InvalidSearch { entity: String, search: String },

    #[error("Entity {entity} is not supported")]
    UnsupportedEntity { entity: String },

    #[error("Invalid cursor for entity {entity}: {message}")]
    InvalidCursor { entity: String, message: String },

    #[error("Missing parent group id for entity {entity}")]
    MissingParentId { entity: String },

    #[error("Page size must be greater than 0, got {page_size}")]
    InvalidPageSize { page_size: i64 },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ============================================================================
    // Transport Errors
    // ============================================================================
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Request timeout after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    // ============================================================================
    // Parse Errors
    // ============================================================================
    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Failed to decode response: {message}")]
    Decode { message: String },

    // ============================================================================
    // Internal Errors
    // ============================================================================
    #[error("Too many collection objects returned in response; expected {expected}, got {got}.")]
    TooManyCollectionObjects { expected: usize, got: usize },

    #[error("State error: {message}")]
    State { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

/// Broad classification used by callers to pick a retry policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Invalid request shape, filter, cursor or entity. Never retryable.
    Configuration,
    /// The request could not be completed on the wire.
    Transport,
    /// The source answered with something that is not a page of objects.
    Parse,
    /// An invariant of the traversal was violated.
    Internal,
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an invalid config value error
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfigValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create an invalid cursor error
    pub fn invalid_cursor(entity: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidCursor {
            entity: entity.into(),
            message: message.into(),
        }
    }

    /// Create a decode error
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Create a state error
    pub fn state(message: impl Into<String>) -> Self {
        Self::State {
            message: message.into(),
        }
    }

    /// Category this error belongs to
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::Config { .. }
            | Error::InvalidConfigValue { .. }
            | Error::YamlParse(_)
            | Error::FilterAndSearch { .. }
            | Error::InvalidFilter { .. }
            | Error::InvalidSearch { .. }
            | Error::UnsupportedEntity { .. }
            | Error::InvalidCursor { .. }
            | Error::MissingParentId { .. }
            | Error::InvalidPageSize { .. }
            | Error::InvalidUrl(_) => ErrorCategory::Configuration,
            Error::Http(_) | Error::Timeout { .. } => ErrorCategory::Transport,
            Error::JsonParse(_) | Error::Decode { .. } => ErrorCategory::Parse,
            Error::TooManyCollectionObjects { .. }
            | Error::State { .. }
            | Error::Io(_)
            | Error::Other(_) => ErrorCategory::Internal,
        }
    }

    /// Check if this error is a configuration error
    pub fn is_config(&self) -> bool {
        self.category() == ErrorCategory::Configuration
    }

    /// Check if this error is retryable
    pub fn is_retryable(&self) -> bool {
        self.category() == ErrorCategory::Transport
    }

    /// Check if this error was caused by the configured request timeout
    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::Timeout { .. })
    }
}

/// Result type alias for Solidafy Okta
pub type Result<T> = std::result::Result<T, Error>;
