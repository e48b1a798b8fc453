//! Common types used throughout Solidafy Okta
//!
//! This module contains shared type definitions, type aliases,
//! and the closed set of entity kinds the connector can sync.

use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// JSON object type, the shape of every record returned by the source
pub type JsonObject = serde_json::Map<String, JsonValue>;

// ============================================================================
// Field names
// ============================================================================

/// Unique identifier attribute every entity must request
pub const UNIQUE_ID_FIELD: &str = "id";

/// Foreign key to the user on a stamped group member record
pub const MEMBER_USER_ID_FIELD: &str = "userId";

/// Foreign key to the group on a stamped group member record
pub const MEMBER_GROUP_ID_FIELD: &str = "groupId";

/// Separator between the user id and group id in a member's synthetic id
pub const MEMBER_ID_SEPARATOR: &str = "-";

// ============================================================================
// Entity Kind
// ============================================================================

/// Entity kinds the connector knows how to page through
///
/// Flat kinds are fetched with one level of pagination. `GroupMember` is
/// derived: its members are the users of each group, walked group by group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    User,
    Application,
    Group,
    GroupMember,
}

impl EntityKind {
    /// All supported kinds, in declaration order
    pub const ALL: [EntityKind; 4] = [
        EntityKind::User,
        EntityKind::Application,
        EntityKind::Group,
        EntityKind::GroupMember,
    ];

    /// Name used in requests, configuration and cursors
    pub fn as_str(self) -> &'static str {
        match self {
            EntityKind::User => "User",
            EntityKind::Application => "Application",
            EntityKind::Group => "Group",
            EntityKind::GroupMember => "GroupMember",
        }
    }

    /// Whether this kind needs a parent walk
    pub fn is_derived(self) -> bool {
        matches!(self, EntityKind::GroupMember)
    }

    /// Kind whose collection supplies the parents of a derived kind
    pub fn parent(self) -> Option<EntityKind> {
        match self {
            EntityKind::GroupMember => Some(EntityKind::Group),
            EntityKind::User | EntityKind::Application | EntityKind::Group => None,
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EntityKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| Error::UnsupportedEntity {
                entity: s.to_string(),
            })
    }
}
