//! State management module
//!
//! Persists the opaque cursor of each entity between CLI runs. The engine
//! never stores anything; this is the caller side of that contract.
//!
//! # Overview
//!
//! - `State` - Cursor and completion flag per entity
//! - `StateManager` - File-based persistence with atomic writes

mod manager;
mod types;

pub use manager::StateManager;
pub use types::{EntityState, State};
