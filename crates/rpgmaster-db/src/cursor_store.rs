//! Turn cursor persistence.
//!
//! The cursor is a single row (`id = 1`) seeded by the migration. Reads
//! recreate it if it has gone missing, so callers always get a cursor.

use rpgmaster_types::TurnCursor;
use sqlx::SqlitePool;

use crate::error::DbError;

/// Operations on the singleton `turn_cursor` row.
pub struct CursorStore<'a> {
    pool: &'a SqlitePool,
}

impl<'a> CursorStore<'a> {
    /// Create a new cursor store bound to a connection pool.
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Read the cursor, creating the start-of-combat row if absent.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Sqlite`] if the query fails.
    pub async fn get(&self) -> Result<TurnCursor, DbError> {
        let row: Option<(i64, i64)> =
            sqlx::query_as("SELECT current_turn, round_number FROM turn_cursor WHERE id = 1")
                .fetch_optional(self.pool)
                .await?;

        let Some((current_turn, round_number)) = row else {
            self.set(TurnCursor::START).await?;
            return Ok(TurnCursor::START);
        };

        Ok(TurnCursor {
            current_turn: usize::try_from(current_turn).unwrap_or(0),
            round_number: u32::try_from(round_number)
                .ok()
                .filter(|round| *round >= 1)
                .unwrap_or(1),
        })
    }

    /// Overwrite the cursor.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Sqlite`] if the upsert fails.
    pub async fn set(&self, cursor: TurnCursor) -> Result<(), DbError> {
        let current_turn = i64::try_from(cursor.current_turn).unwrap_or(i64::MAX);
        let round_number = i64::from(cursor.round_number.max(1));

        sqlx::query(
            r"INSERT INTO turn_cursor (id, current_turn, round_number, updated_at)
              VALUES (1, ?1, ?2, CURRENT_TIMESTAMP)
              ON CONFLICT (id) DO UPDATE SET
                current_turn = excluded.current_turn,
                round_number = excluded.round_number,
                updated_at = excluded.updated_at",
        )
        .bind(current_turn)
        .bind(round_number)
        .execute(self.pool)
        .await?;

        tracing::debug!(
            current_turn = cursor.current_turn,
            round_number = cursor.round_number,
            "Stored turn cursor"
        );
        Ok(())
    }

    /// Put the cursor back to the first turn of round 1.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Sqlite`] if the update fails.
    pub async fn reset(&self) -> Result<(), DbError> {
        self.set(TurnCursor::START).await
    }
}
