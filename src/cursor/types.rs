//! Cursor types
//!
//! `ResumeToken` is what the traversal branches on. `CompositeCursor` is the
//! flat wire form, kept as three optional fields for compatibility with
//! cursors already persisted by callers.

use crate::error::{Error, Result};
use crate::types::EntityKind;
use serde::{Deserialize, Serialize};
use url::Url;

/// Position of a paused traversal
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ResumeToken {
    /// Start of sync
    #[default]
    Start,

    /// Mid-way through a flat collection
    Item {
        /// Next page link of the collection
        cursor: String,
    },

    /// Iterating the children of one parent
    Child {
        /// Parent currently being walked
        parent_id: String,
        /// Next page link of the parent's children, absent on the first page
        item_cursor: Option<String>,
        /// Next page link of the parent collection, carried for later
        parent_cursor: Option<String>,
    },

    /// Current parent exhausted, next call resolves a fresh parent
    NextParent {
        /// Next page link of the parent collection
        parent_cursor: String,
    },
}

impl ResumeToken {
    /// Flat-collection token for a next page link
    pub fn item(cursor: impl Into<String>) -> Self {
        Self::Item {
            cursor: cursor.into(),
        }
    }

    /// Token pointing at the next parent page
    pub fn next_parent(parent_cursor: impl Into<String>) -> Self {
        Self::NextParent {
            parent_cursor: parent_cursor.into(),
        }
    }

    /// Check if this is the start-of-sync token
    pub fn is_start(&self) -> bool {
        matches!(self, Self::Start)
    }

    /// Position within the innermost collection
    pub fn item_cursor(&self) -> Option<&str> {
        match self {
            Self::Item { cursor } => Some(cursor),
            Self::Child { item_cursor, .. } => item_cursor.as_deref(),
            Self::Start | Self::NextParent { .. } => None,
        }
    }

    /// Parent currently being iterated
    pub fn parent_id(&self) -> Option<&str> {
        match self {
            Self::Child { parent_id, .. } => Some(parent_id),
            _ => None,
        }
    }

    /// Position within the parent collection
    pub fn parent_cursor(&self) -> Option<&str> {
        match self {
            Self::Child { parent_cursor, .. } => parent_cursor.as_deref(),
            Self::NextParent { parent_cursor } => Some(parent_cursor),
            Self::Start | Self::Item { .. } => None,
        }
    }

    /// Check that this token is a legal position for the entity kind
    ///
    /// Flat kinds only ever see `Start` or `Item`. The derived kind never
    /// sees `Item`, since a bare item cursor cannot say which parent it
    /// belongs to.
    pub fn validate_for(&self, entity: EntityKind) -> Result<()> {
        let valid = if entity.is_derived() {
            !matches!(self, Self::Item { .. })
        } else {
            matches!(self, Self::Start | Self::Item { .. })
        };

        if valid {
            Ok(())
        } else {
            Err(Error::invalid_cursor(
                entity.as_str(),
                format!("cursor shape {} is not valid for this entity", self.shape()),
            ))
        }
    }

    /// Check that every link in this token stays on `base` over https
    ///
    /// Links are followed verbatim with the caller's credential attached, so
    /// a link to another host or a plain-http URL is refused.
    pub fn validate_origin(&self, entity: EntityKind, base: &Url) -> Result<()> {
        for link in [self.item_cursor(), self.parent_cursor()].into_iter().flatten() {
            let url = Url::parse(link).map_err(|e| {
                Error::invalid_cursor(entity.as_str(), format!("cursor link is not a URL: {e}"))
            })?;

            if url.scheme() != "https" {
                return Err(Error::invalid_cursor(
                    entity.as_str(),
                    format!("cursor link must use https, got {}", url.scheme()),
                ));
            }

            if url.host_str() != base.host_str()
                || url.port_or_known_default() != base.port_or_known_default()
            {
                return Err(Error::invalid_cursor(
                    entity.as_str(),
                    format!(
                        "cursor link host {} does not match the datasource address",
                        url.host_str().unwrap_or_default()
                    ),
                ));
            }
        }

        Ok(())
    }

    fn shape(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Item { .. } => "item",
            Self::Child { .. } => "child",
            Self::NextParent { .. } => "next-parent",
        }
    }
}

/// Wire form of the resume token
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompositeCursor {
    /// Next page link of the innermost collection
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,

    /// Parent being iterated
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection_id: Option<String>,

    /// Next page link of the parent collection
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection_cursor: Option<String>,
}

impl From<&ResumeToken> for CompositeCursor {
    fn from(token: &ResumeToken) -> Self {
        match token {
            ResumeToken::Start => Self::default(),
            ResumeToken::Item { cursor } => Self {
                cursor: Some(cursor.clone()),
                ..Self::default()
            },
            ResumeToken::Child {
                parent_id,
                item_cursor,
                parent_cursor,
            } => Self {
                cursor: item_cursor.clone(),
                collection_id: Some(parent_id.clone()),
                collection_cursor: parent_cursor.clone(),
            },
            ResumeToken::NextParent { parent_cursor } => Self {
                collection_cursor: Some(parent_cursor.clone()),
                ..Self::default()
            },
        }
    }
}

impl TryFrom<CompositeCursor> for ResumeToken {
    type Error = String;

    fn try_from(wire: CompositeCursor) -> std::result::Result<Self, Self::Error> {
        // Empty strings are treated as absent fields.
        let non_empty = |v: Option<String>| v.filter(|s| !s.is_empty());

        match (
            non_empty(wire.cursor),
            non_empty(wire.collection_id),
            non_empty(wire.collection_cursor),
        ) {
            (None, None, None) => Ok(Self::Start),
            (Some(cursor), None, None) => Ok(Self::Item { cursor }),
            (item_cursor, Some(parent_id), parent_cursor) => Ok(Self::Child {
                parent_id,
                item_cursor,
                parent_cursor,
            }),
            (None, None, Some(parent_cursor)) => Ok(Self::NextParent { parent_cursor }),
            (Some(_), None, Some(_)) => Err(
                "cursor carries both an item cursor and a parent cursor without a parent id"
                    .to_string(),
            ),
        }
    }
}
