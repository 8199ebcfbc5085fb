//! Combatant roster persistence.
//!
//! The `combatants` table is an unordered collection keyed by id. Turn
//! order is computed by the caller from whatever this store returns, so
//! nothing here sorts beyond what makes output deterministic.

use chrono::{DateTime, Utc};
use rpgmaster_types::{Category, Combatant, CombatantId};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::error::DbError;

/// Operations on the `combatants` table.
pub struct RosterStore<'a> {
    pool: &'a SqlitePool,
}

impl<'a> RosterStore<'a> {
    /// Create a new roster store bound to a connection pool.
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a new combatant row.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Sqlite`] if the insert fails.
    pub async fn insert(&self, combatant: &Combatant) -> Result<(), DbError> {
        sqlx::query(
            r"INSERT INTO combatants
              (id, name, initiative, hp, max_hp, category, content_ref, active, created_at)
              VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        )
        .bind(combatant.id.into_inner())
        .bind(&combatant.name)
        .bind(combatant.initiative)
        .bind(combatant.hp)
        .bind(combatant.max_hp)
        .bind(combatant.category.as_str())
        .bind(combatant.content_ref.as_deref())
        .bind(combatant.active)
        .bind(combatant.created_at)
        .execute(self.pool)
        .await?;

        tracing::debug!(combatant_id = %combatant.id, name = combatant.name, "Inserted combatant");
        Ok(())
    }

    /// Fetch one combatant, active or not.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Sqlite`] if the query fails.
    pub async fn get(&self, id: CombatantId) -> Result<Option<Combatant>, DbError> {
        let row = sqlx::query_as::<_, CombatantRow>(
            r"SELECT id, name, initiative, hp, max_hp, category, content_ref, active, created_at
              FROM combatants
              WHERE id = ?1",
        )
        .bind(id.into_inner())
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Combatant::from))
    }

    /// Fetch every active combatant (unsorted as far as callers care).
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Sqlite`] if the query fails.
    pub async fn list_active(&self) -> Result<Vec<Combatant>, DbError> {
        let rows = sqlx::query_as::<_, CombatantRow>(
            r"SELECT id, name, initiative, hp, max_hp, category, content_ref, active, created_at
              FROM combatants
              WHERE active = 1
              ORDER BY id",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Combatant::from).collect())
    }

    /// Fetch every combatant ever added, including soft-deleted ones.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Sqlite`] if the query fails.
    pub async fn list_all(&self) -> Result<Vec<Combatant>, DbError> {
        let rows = sqlx::query_as::<_, CombatantRow>(
            r"SELECT id, name, initiative, hp, max_hp, category, content_ref, active, created_at
              FROM combatants
              ORDER BY id",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Combatant::from).collect())
    }

    /// Count the active combatants.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Sqlite`] if the query fails.
    pub async fn count_active(&self) -> Result<usize, DbError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM combatants WHERE active = 1")
            .fetch_one(self.pool)
            .await?;

        Ok(usize::try_from(count).unwrap_or(0))
    }

    /// Soft-delete an active combatant.
    ///
    /// Returns `false` if the id is unknown or already inactive.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Sqlite`] if the update fails.
    pub async fn deactivate(&self, id: CombatantId) -> Result<bool, DbError> {
        let result = sqlx::query("UPDATE combatants SET active = 0 WHERE id = ?1 AND active = 1")
            .bind(id.into_inner())
            .execute(self.pool)
            .await?;

        let changed = result.rows_affected() > 0;
        tracing::debug!(combatant_id = %id, changed, "Deactivated combatant");
        Ok(changed)
    }

    /// Soft-delete every combatant. Idempotent.
    ///
    /// Returns how many rows were touched.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Sqlite`] if the update fails.
    pub async fn deactivate_all(&self) -> Result<u64, DbError> {
        let result = sqlx::query("UPDATE combatants SET active = 0")
            .execute(self.pool)
            .await?;

        tracing::debug!(rows = result.rows_affected(), "Deactivated all combatants");
        Ok(result.rows_affected())
    }

    /// Overwrite a combatant's current hit points, active or not.
    ///
    /// No clamping is applied. Returns `false` if the id is unknown.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Sqlite`] if the update fails.
    pub async fn set_hp(&self, id: CombatantId, hp: i64) -> Result<bool, DbError> {
        let result = sqlx::query("UPDATE combatants SET hp = ?1 WHERE id = ?2")
            .bind(hp)
            .bind(id.into_inner())
            .execute(self.pool)
            .await?;

        let changed = result.rows_affected() > 0;
        tracing::debug!(combatant_id = %id, hp, changed, "Set combatant hit points");
        Ok(changed)
    }
}

/// A row from the `combatants` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CombatantRow {
    /// Combatant UUID.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Initiative score.
    pub initiative: i64,
    /// Current hit points.
    pub hp: i64,
    /// Maximum hit points.
    pub max_hp: i64,
    /// Category tag as stored.
    pub category: String,
    /// Content-library slug.
    pub content_ref: Option<String>,
    /// Soft-delete flag.
    pub active: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl From<CombatantRow> for Combatant {
    fn from(row: CombatantRow) -> Self {
        Self {
            id: CombatantId::from(row.id),
            name: row.name,
            initiative: row.initiative,
            hp: row.hp,
            max_hp: row.max_hp,
            category: Category::from(row.category),
            content_ref: row.content_ref,
            active: row.active,
            created_at: row.created_at,
        }
    }
}
