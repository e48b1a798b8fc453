//! Cursor string codec
//!
//! The opaque cursor is base64 (standard alphabet) over the JSON form of
//! `CompositeCursor`. The start token is the empty string in both
//! directions.

use super::types::{CompositeCursor, ResumeToken};
use crate::error::{Error, Result};
use crate::types::EntityKind;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

/// Encode a resume token into the opaque string handed to the caller
pub fn encode(token: &ResumeToken) -> Result<String> {
    if token.is_start() {
        return Ok(String::new());
    }

    let json = serde_json::to_vec(&CompositeCursor::from(token))?;
    Ok(STANDARD.encode(json))
}

/// Decode the caller's opaque string into a resume token for `entity`
///
/// The decoded shape is checked against the entity kind, so a flat cursor
/// handed to the derived entity (or the reverse) is rejected here.
pub fn decode(encoded: &str, entity: EntityKind) -> Result<ResumeToken> {
    let encoded = encoded.trim();
    if encoded.is_empty() {
        return Ok(ResumeToken::Start);
    }

    let bytes = STANDARD
        .decode(encoded)
        .map_err(|e| Error::invalid_cursor(entity.as_str(), format!("not valid base64: {e}")))?;

    let wire: CompositeCursor = serde_json::from_slice(&bytes)
        .map_err(|e| Error::invalid_cursor(entity.as_str(), format!("not valid JSON: {e}")))?;

    let token =
        ResumeToken::try_from(wire).map_err(|msg| Error::invalid_cursor(entity.as_str(), msg))?;
    token.validate_for(entity)?;

    Ok(token)
}
