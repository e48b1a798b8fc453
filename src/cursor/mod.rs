//! Resume cursor module
//!
//! Handles the composite cursor a caller hands back on every page request.
//!
//! # Overview
//!
//! - `ResumeToken` - Tagged union of the valid traversal positions
//! - `CompositeCursor` - Three optional fields, the shape kept on the wire
//! - `encode` / `decode` - Conversion to and from the opaque cursor string
//!
//! The engine never stores a cursor. The caller owns durability and passes
//! the string back verbatim.

mod codec;
mod types;

pub use codec::{decode, encode};
pub use types::{CompositeCursor, ResumeToken};

#[cfg(test)]
mod tests;
