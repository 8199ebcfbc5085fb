//! Shared type definitions for RPG Master.
//!
//! This crate is the single source of truth for the data model shared by
//! the turn tracker, the screen command relay, and the HTTP layer. Types
//! that cross the wire flow downstream to `TypeScript` via `ts-rs` for the
//! master and player browser clients.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe UUID wrappers for entity identifiers
//! - [`enums`] -- Combatant category, screen command kind, relay retention
//! - [`structs`] -- Combatants, the turn cursor, display commands, and views

pub mod enums;
pub mod ids;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::{Category, CommandKind, RelayRetention};
pub use ids::CombatantId;
pub use structs::{
    Combatant, CombatantView, DisplayCommand, InitiativeBoard, TurnCursor, WhiteboardRecord,
};

#[cfg(test)]
mod tests {
    //! Binding generation for the browser clients.

    #[test]
    fn export_bindings() {
        // ts-rs writes the TypeScript files to `bindings/` relative to the
        // crate root when the types are exported.
        use ts_rs::TS;

        let _ = crate::ids::CombatantId::export_all();
        let _ = crate::structs::TurnCursor::export_all();
        let _ = crate::structs::DisplayCommand::export_all();
        let _ = crate::structs::WhiteboardRecord::export_all();
        let _ = crate::structs::CombatantView::export_all();
        let _ = crate::structs::InitiativeBoard::export_all();
    }
}
