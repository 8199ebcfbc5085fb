//! The turn tracker service.
//!
//! [`TurnTracker`] ties the roster and cursor stores to the display relay.
//! Each operation is a few independent writes: roster or cursor first,
//! then a relay publish so displays redraw. Nothing spans them in a
//! transaction, and a publish that fails after a successful mutation is
//! logged rather than reported, since the mutation itself stands.
//!
//! Turn order is recomputed from the active roster on every call; see
//! [`rpgmaster_core::turn_order`].

use std::sync::Arc;

use chrono::Utc;
use rpgmaster_core::{ContentLibrary, NewCombatant, turn_order};
use rpgmaster_db::{CommandRelay, Database};
use rpgmaster_types::{Combatant, CombatantId, CommandKind, InitiativeBoard};

use crate::error::TrackerError;

/// Turn tracker operations over shared storage.
pub struct TurnTracker<'a> {
    db: &'a Database,
    relay: &'a CommandRelay,
    library: &'a Arc<ContentLibrary>,
}

impl<'a> TurnTracker<'a> {
    /// Create a tracker over the given stores.
    pub const fn new(
        db: &'a Database,
        relay: &'a CommandRelay,
        library: &'a Arc<ContentLibrary>,
    ) -> Self {
        Self { db, relay, library }
    }

    /// Add a new active combatant. The cursor is left alone.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::Storage`] if the insert fails.
    pub async fn add(&self, new: NewCombatant) -> Result<Combatant, TrackerError> {
        let combatant = Combatant {
            id: CombatantId::new(),
            name: new.name,
            initiative: new.initiative,
            hp: new.hp,
            max_hp: new.max_hp,
            category: new.category,
            content_ref: new.content_ref,
            active: true,
            created_at: Utc::now(),
        };
        self.db.roster().insert(&combatant).await?;

        tracing::info!(
            combatant_id = %combatant.id,
            name = combatant.name,
            initiative = combatant.initiative,
            category = %combatant.category,
            "Combatant added"
        );
        self.notify(CommandKind::Initiative).await;
        Ok(combatant)
    }

    /// Soft-delete an active combatant.
    ///
    /// The cursor is not adjusted; the next advance or retreat folds it
    /// back into range.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::NotFound`] if the id is unknown or already
    /// inactive, or [`TrackerError::Storage`] if the update fails.
    pub async fn remove(&self, id: CombatantId) -> Result<(), TrackerError> {
        if !self.db.roster().deactivate(id).await? {
            return Err(TrackerError::NotFound(id));
        }

        tracing::info!(combatant_id = %id, "Combatant removed");
        self.notify(CommandKind::Initiative).await;
        Ok(())
    }

    /// Overwrite a combatant's current hit points. Inactive combatants
    /// count.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::NotFound`] if the id is unknown, or
    /// [`TrackerError::Storage`] if the update fails.
    pub async fn set_hp(&self, id: CombatantId, hp: i64) -> Result<(), TrackerError> {
        if !self.db.roster().set_hp(id, hp).await? {
            return Err(TrackerError::NotFound(id));
        }

        tracing::info!(combatant_id = %id, hp, "Hit points set");
        self.notify(CommandKind::Initiative).await;
        Ok(())
    }

    /// Move to the next turn, starting a new round on wrap.
    ///
    /// Returns `false` when there are no active combatants.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::Storage`] if the roster or cursor cannot be
    /// read or written.
    pub async fn advance(&self) -> Result<bool, TrackerError> {
        let count = self.db.roster().count_active().await?;
        let cursor = self.db.cursor().get().await?;

        let Some(next) = turn_order::advance(cursor, count) else {
            tracing::debug!("Advance with empty roster");
            return Ok(false);
        };
        self.db.cursor().set(next).await?;

        tracing::info!(turn = next.current_turn, round = next.round_number, "Turn advanced");
        self.notify(CommandKind::Initiative).await;
        Ok(true)
    }

    /// Move to the previous turn, stepping the round back on wrap (never
    /// below round 1).
    ///
    /// Returns `false` when there are no active combatants.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::Storage`] if the roster or cursor cannot be
    /// read or written.
    pub async fn retreat(&self) -> Result<bool, TrackerError> {
        let count = self.db.roster().count_active().await?;
        let cursor = self.db.cursor().get().await?;

        let Some(prev) = turn_order::retreat(cursor, count) else {
            tracing::debug!("Retreat with empty roster");
            return Ok(false);
        };
        self.db.cursor().set(prev).await?;

        tracing::info!(turn = prev.current_turn, round = prev.round_number, "Turn retreated");
        self.notify(CommandKind::Initiative).await;
        Ok(true)
    }

    /// End combat: deactivate every combatant and rewind the cursor.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::Storage`] if the roster or cursor cannot be
    /// written.
    pub async fn reset(&self) -> Result<(), TrackerError> {
        let deactivated = self.db.roster().deactivate_all().await?;
        self.db.cursor().reset().await?;

        tracing::info!(deactivated, "Combat reset");
        self.notify(CommandKind::Clear).await;
        Ok(())
    }

    /// The initiative board: active combatants in turn order with the
    /// cursor marked and monster portraits resolved.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::Storage`] if the roster or cursor cannot be
    /// read.
    pub async fn current_view(&self) -> Result<InitiativeBoard, TrackerError> {
        let sorted = turn_order::active_turn_order(self.db.roster().list_active().await?);
        let cursor = self.db.cursor().get().await?;

        let library = Arc::clone(self.library);
        let rows = sorted.clone();
        let board = tokio::task::spawn_blocking(move || {
            turn_order::build_board(&rows, cursor, |slug| library.portrait(slug))
        })
        .await;

        Ok(board.unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Portrait lookup failed");
            turn_order::build_board(&sorted, cursor, |_| None)
        }))
    }

    async fn notify(&self, kind: CommandKind) {
        if let Err(e) = self.relay.publish(kind.clone(), None).await {
            tracing::error!(kind = %kind, error = %e, "Failed to notify displays");
        }
    }
}
