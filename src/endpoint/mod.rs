//! Endpoint module
//!
//! Pure construction of request URLs. No I/O happens here.
//!
//! # Overview
//!
//! - `build_endpoint` - URL for one page of one entity kind
//! - `validate_expressions` - Filter/search checks, run before any request
//!
//! Once a traversal holds a next-page link, that link *is* the request URL:
//! the source embeds filter, search and page size in it, and they are never
//! re-derived.

mod builder;

pub use builder::{
    build_endpoint, encode_expression, validate_expressions, EndpointRequest,
    DEFAULT_API_VERSION, DEFAULT_GROUP_FILTER, MIN_EXPRESSION_LEN,
};
