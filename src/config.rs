//! Datasource configuration
//!
//! The host sends this configuration with every page request as JSON. The
//! CLI can also read it from a YAML or JSON file.

use crate::endpoint::DEFAULT_API_VERSION;
use crate::error::{Error, Result};
use crate::types::EntityKind;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

/// Default request timeout in seconds
pub const DEFAULT_REQUEST_TIMEOUT_SECONDS: u64 = 120;

// ============================================================================
// Okta Config
// ============================================================================

/// Per-datasource configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OktaConfig {
    /// API version path segment
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// Deadline for each outbound request
    #[serde(default = "default_request_timeout_seconds")]
    pub request_timeout_seconds: u64,

    /// Filter expression per entity name
    #[serde(default)]
    pub filters: HashMap<String, String>,

    /// Search expression per entity name
    #[serde(default)]
    pub search: HashMap<String, String>,
}

fn default_api_version() -> String {
    DEFAULT_API_VERSION.to_string()
}

fn default_request_timeout_seconds() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECONDS
}

impl Default for OktaConfig {
    fn default() -> Self {
        Self {
            api_version: default_api_version(),
            request_timeout_seconds: default_request_timeout_seconds(),
            filters: HashMap::new(),
            search: HashMap::new(),
        }
    }
}

impl OktaConfig {
    /// Parse from a JSON value and validate
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        let config: Self = serde_json::from_value(value)
            .map_err(|e| Error::config(format!("Failed to parse datasource config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Parse from a JSON string and validate
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| Error::config(format!("Failed to parse datasource config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Parse from a YAML string and validate
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a file, YAML for `.yaml`/`.yml`, JSON otherwise
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!("Failed to read config file {}: {e}", path.display()))
        })?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml" | "yml") => Self::from_yaml_str(&contents),
            _ => Self::from_json_str(&contents),
        }
    }

    /// Check values the type system cannot
    pub fn validate(&self) -> Result<()> {
        if self.api_version.trim().is_empty() {
            return Err(Error::invalid_value("apiVersion", "must not be empty"));
        }

        if self.request_timeout_seconds == 0 {
            return Err(Error::invalid_value(
                "requestTimeoutSeconds",
                "must be greater than 0",
            ));
        }

        for (field, map) in [("filters", &self.filters), ("search", &self.search)] {
            for entity in map.keys() {
                entity.parse::<EntityKind>().map_err(|_| {
                    Error::invalid_value(field, format!("unknown entity {entity}"))
                })?;
            }
        }

        Ok(())
    }

    /// Filter configured for an entity
    pub fn filter_for(&self, entity: EntityKind) -> Option<&str> {
        self.filters.get(entity.as_str()).map(String::as_str)
    }

    /// Search configured for an entity
    pub fn search_for(&self, entity: EntityKind) -> Option<&str> {
        self.search.get(entity.as_str()).map(String::as_str)
    }

    /// Deadline for each outbound request
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }
}
