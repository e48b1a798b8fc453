//! HTTP client module
//!
//! Fetches one page of one collection per call.
//!
//! # Features
//!
//! - **Per-call deadline**: every request carries the caller's timeout
//! - **Status as data**: a non-success status is returned, not raised
//! - **Next link extraction**: `Link` headers are resolved to a next-page URL
//! - **Strict body shape**: the body must be a JSON array of objects
//!
//! Retries are deliberately absent. The caller decides, using the returned
//! status and retry-after hint.

mod client;
mod datasource;

pub use client::{parse_objects, HttpClient, HttpClientConfig};
pub use datasource::{Datasource, FetchRequest, FetchResponse};
