//! Shared application state for the RPG Master API server.
//!
//! There is one game per server: one roster, one cursor, one screen, one
//! whiteboard. [`AppState`] owns handles to all of them and is passed to
//! every handler behind an [`Arc`], so tests can build as many isolated
//! instances as they like.

use std::sync::Arc;

use rpgmaster_core::config::DEFAULT_MAX_BODY_BYTES;
use rpgmaster_core::{AppConfig, ContentLibrary};
use rpgmaster_db::{CommandRelay, Database, WhiteboardStore};

use crate::tracker::TurnTracker;

/// Shared state handed to all handlers.
#[derive(Debug)]
pub struct AppState {
    /// Roster and cursor storage.
    pub db: Database,
    /// Latest display command.
    pub relay: CommandRelay,
    /// Latest whiteboard drawing.
    pub whiteboard: WhiteboardStore,
    /// Monster, spell, and rule entries.
    pub library: Arc<ContentLibrary>,
    /// Largest accepted request body in bytes; `0` removes the cap.
    pub max_body_bytes: usize,
}

impl AppState {
    /// Assemble state from its parts.
    pub const fn new(
        db: Database,
        relay: CommandRelay,
        whiteboard: WhiteboardStore,
        library: Arc<ContentLibrary>,
    ) -> Self {
        Self {
            db,
            relay,
            whiteboard,
            library,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }

    /// Replace the request body cap.
    #[must_use]
    pub const fn with_max_body_bytes(mut self, max_body_bytes: usize) -> Self {
        self.max_body_bytes = max_body_bytes;
        self
    }

    /// Assemble state around a connected database, taking file locations
    /// and relay behavior from the configuration.
    pub fn from_config(db: Database, config: &AppConfig) -> Self {
        let relay = CommandRelay::new(
            config.storage.screen_command_file.clone(),
            config.relay.retention,
            config.relay.default_kind.clone(),
        );
        let whiteboard = WhiteboardStore::new(config.storage.whiteboard_file.clone());
        let library = Arc::new(ContentLibrary::new(&config.content));

        Self::new(db, relay, whiteboard, library).with_max_body_bytes(config.server.max_body_bytes)
    }

    /// The turn tracker over this state.
    pub const fn tracker(&self) -> TurnTracker<'_> {
        TurnTracker::new(&self.db, &self.relay, &self.library)
    }
}
