//! Enumeration types for RPG Master.
//!
//! [`Category`] and [`CommandKind`] are *open* tags: the named variants
//! cover everything the master and player clients know about today, and
//! the `Other` variant carries any value a newer client sends so it
//! round-trips unchanged. On the wire and in storage every tag is its
//! plain string form.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Relay retention
// ---------------------------------------------------------------------------

/// How many published screen commands the relay keeps recoverable.
///
/// Display clients only ever observe the latest command either way; the
/// choice only affects what a history reader can still recover after
/// later publishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelayRetention {
    /// Overwrite the record on every publish; only the latest survives.
    #[default]
    KeepLast,
    /// Append every publish as a new line; the last line is current.
    AppendAll,
}

// ---------------------------------------------------------------------------
// Combatant category
// ---------------------------------------------------------------------------

/// The kind of entity a combatant represents.
///
/// Only [`Category::Monster`] has behavior attached: monsters may carry a
/// content-library slug used to resolve their portrait.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Category {
    /// A player character.
    #[default]
    Player,
    /// A monster controlled by the game master.
    Monster,
    /// Any other tag sent by a client.
    Other(String),
}

impl Category {
    /// Return the wire/storage form of this category.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Player => "player",
            Self::Monster => "monster",
            Self::Other(tag) => tag,
        }
    }
}

impl From<String> for Category {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "player" => Self::Player,
            "monster" => Self::Monster,
            _ => Self::Other(tag),
        }
    }
}

impl From<&str> for Category {
    fn from(tag: &str) -> Self {
        Self::from(tag.to_owned())
    }
}

impl From<Category> for String {
    fn from(category: Category) -> Self {
        match category {
            Category::Other(tag) => tag,
            named => named.as_str().to_owned(),
        }
    }
}

impl core::fmt::Display for Category {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Screen command kind
// ---------------------------------------------------------------------------

/// What a display client should render for the latest screen command.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CommandKind {
    /// Redraw the initiative board.
    #[default]
    Initiative,
    /// Blank the display.
    Clear,
    /// Show nothing at all (distinct from [`CommandKind::Clear`]).
    Blackout,
    /// Show an information card (title + HTML payload).
    InfoCard,
    /// Show an image (`url` payload).
    Image,
    /// Play a hosted video (`url` + `autoplay` payload).
    Video,
    /// Embed a `YouTube` video (`video_id`, `autoplay`, `muted`).
    Youtube,
    /// Control an already-embedded `YouTube` video (`action` payload).
    YoutubeControl,
    /// Show or hide the battle grid (`show` payload).
    ToggleGrid,
    /// Any other kind sent by a client.
    Other(String),
}

impl CommandKind {
    /// Return the wire form of this kind.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Initiative => "initiative",
            Self::Clear => "clear",
            Self::Blackout => "blackout",
            Self::InfoCard => "info_card",
            Self::Image => "image",
            Self::Video => "video",
            Self::Youtube => "youtube",
            Self::YoutubeControl => "youtube_control",
            Self::ToggleGrid => "toggle-grid",
            Self::Other(kind) => kind,
        }
    }
}

impl From<String> for CommandKind {
    fn from(kind: String) -> Self {
        match kind.as_str() {
            "initiative" => Self::Initiative,
            "clear" => Self::Clear,
            "blackout" => Self::Blackout,
            "info_card" => Self::InfoCard,
            "image" => Self::Image,
            "video" => Self::Video,
            "youtube" => Self::Youtube,
            "youtube_control" => Self::YoutubeControl,
            "toggle-grid" => Self::ToggleGrid,
            _ => Self::Other(kind),
        }
    }
}

impl From<&str> for CommandKind {
    fn from(kind: &str) -> Self {
        Self::from(kind.to_owned())
    }
}

impl From<CommandKind> for String {
    fn from(kind: CommandKind) -> Self {
        match kind {
            CommandKind::Other(kind) => kind,
            named => named.as_str().to_owned(),
        }
    }
}

impl core::fmt::Display for CommandKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retention_uses_snake_case_names() {
        let parsed: Result<RelayRetention, _> = serde_json::from_str("\"append_all\"");
        assert_eq!(parsed.ok(), Some(RelayRetention::AppendAll));
        assert_eq!(RelayRetention::default(), RelayRetention::KeepLast);
    }

    #[test]
    fn category_known_tags_map_to_variants() {
        assert_eq!(Category::from("player"), Category::Player);
        assert_eq!(Category::from("monster"), Category::Monster);
        assert_eq!(Category::from("npc"), Category::Other("npc".to_owned()));
    }

    #[test]
    fn category_serializes_as_plain_string() {
        let json = serde_json::to_string(&Category::Monster).ok();
        assert_eq!(json.as_deref(), Some("\"monster\""));

        let other: Result<Category, _> = serde_json::from_str("\"ally\"");
        assert_eq!(other.ok(), Some(Category::Other("ally".to_owned())));
    }

    #[test]
    fn command_kind_keeps_hyphenated_and_underscored_names() {
        assert_eq!(CommandKind::ToggleGrid.as_str(), "toggle-grid");
        assert_eq!(CommandKind::YoutubeControl.as_str(), "youtube_control");
        assert_eq!(CommandKind::from("toggle-grid"), CommandKind::ToggleGrid);
        assert_eq!(CommandKind::from("info_card"), CommandKind::InfoCard);
    }

    #[test]
    fn command_kind_unknown_tag_round_trips() {
        let kind = CommandKind::from("dice_roll");
        assert_eq!(kind, CommandKind::Other("dice_roll".to_owned()));
        assert_eq!(String::from(kind), "dice_roll");
    }
}
