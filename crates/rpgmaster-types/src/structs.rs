//! Core entity structs for RPG Master.
//!
//! [`Combatant`] and [`TurnCursor`] are the persisted turn-tracker state.
//! [`DisplayCommand`] and [`WhiteboardRecord`] are the durable records
//! handed from the master client to display clients. [`CombatantView`]
//! and [`InitiativeBoard`] are read projections; nothing in them is
//! stored.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{Category, CommandKind};
use crate::ids::CombatantId;

// ---------------------------------------------------------------------------
// Roster
// ---------------------------------------------------------------------------

/// A combatant row as stored in the roster.
///
/// Position in turn order is deliberately absent: it is derived from
/// `initiative`, `name`, and `active` on every read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Combatant {
    /// Stable identifier assigned on creation.
    pub id: CombatantId,
    /// Display name (never empty).
    pub name: String,
    /// Initiative score. Only used for sort order; may be negative or tied.
    pub initiative: i64,
    /// Current hit points. Not clamped to `max_hp` and may go negative.
    pub hp: i64,
    /// Maximum hit points.
    pub max_hp: i64,
    /// Category tag.
    pub category: Category,
    /// Optional content-library slug (monster entry) for portrait lookup.
    pub content_ref: Option<String>,
    /// `false` once soft-deleted. Inactive combatants never take turns.
    pub active: bool,
    /// When the combatant was added.
    pub created_at: DateTime<Utc>,
}

/// The singleton round/turn cursor.
///
/// `current_turn` is a zero-based offset into the *sorted* active roster,
/// not a combatant id. It is only re-validated against the roster size on
/// the next advance or retreat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct TurnCursor {
    /// Index of the combatant whose turn it is.
    pub current_turn: usize,
    /// Current round, starting at 1. Never below 1.
    pub round_number: u32,
}

impl TurnCursor {
    /// The cursor at the start of combat: first combatant, round 1.
    pub const START: Self = Self {
        current_turn: 0,
        round_number: 1,
    };
}

impl Default for TurnCursor {
    fn default() -> Self {
        Self::START
    }
}

// ---------------------------------------------------------------------------
// Relay records
// ---------------------------------------------------------------------------

/// The latest display instruction published by the master client.
///
/// Serialized as `{type, data, timestamp}`. A placeholder command (nothing
/// published yet, or the record was unreadable) has no payload and no
/// timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct DisplayCommand {
    /// What the display should render.
    #[serde(rename = "type")]
    #[ts(type = "string")]
    pub kind: CommandKind,
    /// Kind-specific payload.
    #[serde(default)]
    pub data: Option<serde_json::Value>,
    /// When the command was published.
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}

impl DisplayCommand {
    /// Create a freshly stamped command.
    pub fn new(kind: CommandKind, data: Option<serde_json::Value>) -> Self {
        Self {
            kind,
            data,
            timestamp: Some(Utc::now()),
        }
    }

    /// Create the synthetic command returned when nothing can be read.
    pub const fn placeholder(kind: CommandKind) -> Self {
        Self {
            kind,
            data: None,
            timestamp: None,
        }
    }
}

/// The latest free-form whiteboard drawing saved by the master client.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct WhiteboardRecord {
    /// Opaque drawing state produced by the browser canvas.
    #[serde(default)]
    pub state: Option<serde_json::Value>,
    /// When the state was saved. Absent for an empty whiteboard.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

// ---------------------------------------------------------------------------
// Read projections
// ---------------------------------------------------------------------------

/// One row of the initiative board as displayed to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct CombatantView {
    /// Combatant identifier.
    pub id: CombatantId,
    /// Display name.
    pub name: String,
    /// Initiative score.
    pub initiative: i64,
    /// Current hit points.
    pub hp: i64,
    /// Maximum hit points.
    pub max_hp: i64,
    /// Category tag.
    #[serde(rename = "type")]
    #[ts(type = "string")]
    pub category: Category,
    /// One-based position in turn order.
    pub order: usize,
    /// Whether the cursor points at this combatant.
    #[serde(rename = "isCurrent")]
    pub is_current: bool,
    /// Portrait resolved from the content library (monsters only).
    pub portrait_path: Option<String>,
}

/// The full initiative board: sorted active roster plus the cursor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct InitiativeBoard {
    /// Active combatants in turn order.
    pub characters: Vec<CombatantView>,
    /// Zero-based cursor index as stored.
    pub current_turn: usize,
    /// Current round.
    pub round_number: u32,
}

impl InitiativeBoard {
    /// The combatant whose turn it is, if the cursor points inside the roster.
    pub fn current(&self) -> Option<&CombatantView> {
        self.characters.iter().find(|c| c.is_current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_command_uses_type_key_on_the_wire() {
        let cmd = DisplayCommand::new(
            CommandKind::Image,
            Some(serde_json::json!({"url": "a.png"})),
        );
        let json = serde_json::to_value(&cmd).unwrap_or_default();
        assert_eq!(json["type"], "image");
        assert_eq!(json["data"]["url"], "a.png");
        assert!(json["timestamp"].is_string());
    }

    #[test]
    fn placeholder_has_null_payload_and_timestamp() {
        let cmd = DisplayCommand::placeholder(CommandKind::Initiative);
        let json = serde_json::to_value(&cmd).unwrap_or_default();
        assert_eq!(json["type"], "initiative");
        assert!(json["data"].is_null());
        assert!(json["timestamp"].is_null());
    }

    #[test]
    fn display_command_parses_legacy_line_without_timestamp() {
        let parsed: Result<DisplayCommand, _> = serde_json::from_str(r#"{"type":"clear"}"#);
        let cmd = parsed.ok();
        assert_eq!(cmd, Some(DisplayCommand::placeholder(CommandKind::Clear)));
    }

    #[test]
    fn empty_whiteboard_serializes_null_state_only() {
        let json = serde_json::to_value(WhiteboardRecord::default()).unwrap_or_default();
        assert_eq!(json, serde_json::json!({"state": null}));
    }

    #[test]
    fn cursor_starts_at_round_one() {
        assert_eq!(TurnCursor::default().current_turn, 0);
        assert_eq!(TurnCursor::default().round_number, 1);
    }
}
