//! Data layer for RPG Master (`SQLite` roster + durable record files).
//!
//! `SQLite` holds the combatant roster and the turn cursor. The screen
//! command relay and the whiteboard are single JSON record files, which
//! display clients reach only through the HTTP layer.
//!
//! # Architecture
//!
//! ```text
//! Tracker operation
//!     |
//!     +-- roster / cursor ----> SQLite (Database)
//!     |                          |-- RosterStore   (combatants)
//!     |                          +-- CursorStore   (turn_cursor)
//!     |
//!     +-- publish ------------> CommandRelay      (screen command file)
//!
//! Whiteboard save / load ----> WhiteboardStore   (whiteboard file)
//! ```
//!
//! # Modules
//!
//! - [`sqlite`] -- `SQLite` connection pool and configuration
//! - [`roster_store`] -- Combatant insertion, soft delete, and hit points
//! - [`cursor_store`] -- The singleton turn cursor
//! - [`relay`] -- Last-value display command relay
//! - [`whiteboard_store`] -- Latest whiteboard drawing
//! - [`files`] -- Atomic writes and appends for record files
//! - [`error`] -- Shared error types

pub mod cursor_store;
pub mod error;
pub mod files;
pub mod relay;
pub mod roster_store;
pub mod sqlite;
pub mod whiteboard_store;

// Re-export primary types for convenience.
pub use cursor_store::CursorStore;
pub use error::DbError;
pub use relay::CommandRelay;
pub use roster_store::{CombatantRow, RosterStore};
pub use sqlite::{Database, IN_MEMORY_URL, SqliteConfig};
pub use whiteboard_store::WhiteboardStore;
