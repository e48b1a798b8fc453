//! Pagination module
//!
//! The source paginates with server-issued links: each response carries one
//! or more `Link` headers (RFC 8288), and the link with `rel="next"` is the
//! complete URL of the following page, `after` continuation included.
//!
//! # Overview
//!
//! - `parse_link_header` - Extract the URL for a relation from one header value
//! - `next_link` - Pick the `next` URL out of every header value of a response

mod link;

pub use link::{
    next_link, next_link_from_headers, parse_link_header, parse_links, LinkRelation, NEXT_REL,
};
