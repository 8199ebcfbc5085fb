//! Whiteboard persistence.
//!
//! One record file holds the latest drawing as `{state, timestamp}`.
//! Saves replace it atomically; loads fall back to an empty whiteboard.

use std::path::PathBuf;

use chrono::Utc;
use rpgmaster_types::WhiteboardRecord;

use crate::error::DbError;
use crate::files;

/// File-backed store for the latest whiteboard drawing.
#[derive(Debug, Clone)]
pub struct WhiteboardStore {
    path: PathBuf,
}

impl WhiteboardStore {
    /// Create a store over the given record file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Save a drawing, replacing the previous one.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Serialization`] if the state cannot be encoded
    /// or [`DbError::Io`] if the record cannot be written.
    pub async fn save(&self, state: serde_json::Value) -> Result<WhiteboardRecord, DbError> {
        let record = WhiteboardRecord {
            state: Some(state),
            timestamp: Some(Utc::now()),
        };
        let bytes = serde_json::to_vec(&record)?;
        files::write_atomic(&self.path, &bytes).await?;

        tracing::debug!(file = %self.path.display(), "Saved whiteboard");
        Ok(record)
    }

    /// Load the latest drawing, or an empty whiteboard if there is none
    /// or it cannot be read.
    pub async fn load(&self) -> WhiteboardRecord {
        match files::read_optional(&self.path).await {
            Ok(Some(text)) => serde_json::from_str(&text).unwrap_or_else(|e| {
                tracing::warn!(file = %self.path.display(), error = %e, "Whiteboard record is corrupt");
                WhiteboardRecord::default()
            }),
            Ok(None) => WhiteboardRecord::default(),
            Err(e) => {
                tracing::warn!(error = %e, "Whiteboard record unreadable");
                WhiteboardRecord::default()
            }
        }
    }
}
