//! State types for tracking sync progress
//!
//! These types are serialized to JSON and persisted between runs.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Complete state for a datasource
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct State {
    /// Per-entity state, keyed by entity name
    #[serde(default)]
    pub entities: HashMap<String, EntityState>,
}

impl State {
    /// Create a new empty state
    pub fn new() -> Self {
        Self::default()
    }

    /// Get state for an entity
    pub fn get_entity(&self, entity: &str) -> Option<&EntityState> {
        self.entities.get(entity)
    }

    /// Get mutable state for an entity, creating if needed
    pub fn get_entity_mut(&mut self, entity: &str) -> &mut EntityState {
        self.entities.entry(entity.to_string()).or_default()
    }

    /// Cursor to resume an entity from
    ///
    /// A completed entity resumes from the start.
    pub fn resume_cursor(&self, entity: &str) -> Option<&str> {
        let entity_state = self.entities.get(entity)?;
        if entity_state.completed {
            return None;
        }
        entity_state.cursor.as_deref()
    }

    /// Record the cursor returned by a page
    pub fn set_cursor(&mut self, entity: &str, cursor: String) {
        let entity_state = self.get_entity_mut(entity);
        entity_state.cursor = Some(cursor);
        entity_state.completed = false;
    }

    /// Record that the last page of an entity was delivered
    pub fn mark_completed(&mut self, entity: &str) {
        let entity_state = self.get_entity_mut(entity);
        entity_state.cursor = None;
        entity_state.completed = true;
    }
}

/// State for a single entity
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityState {
    /// Opaque cursor of the next page
    #[serde(default)]
    pub cursor: Option<String>,

    /// Whether the last sync of this entity ran to completion
    #[serde(default)]
    pub completed: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_default() {
        let state = State::new();
        assert!(state.entities.is_empty());
        assert!(state.resume_cursor("User").is_none());
    }

    #[test]
    fn test_state_cursor() {
        let mut state = State::new();
        state.set_cursor("User", "abc".to_string());
        assert_eq!(state.resume_cursor("User"), Some("abc"));
        assert!(!state.get_entity("User").unwrap().completed);
    }

    #[test]
    fn test_completed_entity_restarts() {
        let mut state = State::new();
        state.set_cursor("GroupMember", "abc".to_string());
        state.mark_completed("GroupMember");

        assert!(state.resume_cursor("GroupMember").is_none());
        assert!(state.get_entity("GroupMember").unwrap().completed);

        state.set_cursor("GroupMember", "def".to_string());
        assert_eq!(state.resume_cursor("GroupMember"), Some("def"));
    }

    #[test]
    fn test_state_serialization() {
        let mut state = State::new();
        state.set_cursor("User", "cursor123".to_string());
        state.mark_completed("Group");

        let json = serde_json::to_string(&state).unwrap();
        let restored: State = serde_json::from_str(&json).unwrap();

        assert_eq!(restored, state);
    }
}
