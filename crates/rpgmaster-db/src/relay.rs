//! Screen command relay.
//!
//! The master client publishes [`DisplayCommand`]s; display clients poll
//! for the newest one. Delivery is last-value: a display that polls
//! after two publishes sees only the second, and polling never consumes
//! anything.
//!
//! The record lives in a single file. With [`RelayRetention::KeepLast`]
//! every publish replaces it; with [`RelayRetention::AppendAll`] each
//! publish appends one JSON line and the newest line is current, so
//! superseded commands stay available through [`CommandRelay::history`].
//!
//! Reads never fail. A missing, empty, or corrupt record yields a
//! placeholder command of the fallback kind.

use std::path::PathBuf;

use rpgmaster_types::{CommandKind, DisplayCommand, RelayRetention};
use tokio::sync::Mutex;

use crate::error::DbError;
use crate::files;

/// File-backed last-value relay for display commands.
#[derive(Debug)]
pub struct CommandRelay {
    path: PathBuf,
    retention: RelayRetention,
    default_kind: CommandKind,
    write_lock: Mutex<()>,
}

impl CommandRelay {
    /// Create a relay over the given record file.
    pub fn new(path: impl Into<PathBuf>, retention: RelayRetention, default_kind: CommandKind) -> Self {
        Self {
            path: path.into(),
            retention,
            default_kind,
            write_lock: Mutex::new(()),
        }
    }

    /// Publish a command, stamping it with the current time.
    ///
    /// Publishes are serialized within the process; the last one to
    /// complete is what displays see.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Serialization`] if the payload cannot be encoded
    /// or [`DbError::Io`] if the record cannot be written.
    pub async fn publish(
        &self,
        kind: CommandKind,
        data: Option<serde_json::Value>,
    ) -> Result<DisplayCommand, DbError> {
        let command = DisplayCommand::new(kind, data);
        let line = serde_json::to_string(&command)?;

        let _guard = self.write_lock.lock().await;
        match self.retention {
            RelayRetention::KeepLast => files::write_atomic(&self.path, line.as_bytes()).await?,
            RelayRetention::AppendAll => files::append_line(&self.path, &line).await?,
        }

        tracing::debug!(kind = %command.kind, file = %self.path.display(), "Published display command");
        Ok(command)
    }

    /// The newest command, or a placeholder of the configured default kind.
    pub async fn current(&self) -> DisplayCommand {
        self.current_or(self.default_kind.clone()).await
    }

    /// The newest command, or a placeholder of `fallback`.
    pub async fn current_or(&self, fallback: CommandKind) -> DisplayCommand {
        let text = match files::read_optional(&self.path).await {
            Ok(Some(text)) => text,
            Ok(None) => return DisplayCommand::placeholder(fallback),
            Err(e) => {
                tracing::warn!(error = %e, "Display command record unreadable");
                return DisplayCommand::placeholder(fallback);
            }
        };

        parse_latest(&text).unwrap_or_else(|| {
            if !text.trim().is_empty() {
                tracing::warn!(file = %self.path.display(), "Display command record is corrupt");
            }
            DisplayCommand::placeholder(fallback)
        })
    }

    /// Every recoverable command, oldest first.
    ///
    /// Under keep-last retention this is at most the current command.
    /// Corrupt lines are skipped.
    pub async fn history(&self) -> Vec<DisplayCommand> {
        let text = match files::read_optional(&self.path).await {
            Ok(Some(text)) => text,
            Ok(None) => return Vec::new(),
            Err(e) => {
                tracing::warn!(error = %e, "Display command record unreadable");
                return Vec::new();
            }
        };

        if let Ok(command) = serde_json::from_str::<DisplayCommand>(&text) {
            return vec![command];
        }

        text.lines()
            .filter(|line| !line.trim().is_empty())
            .filter_map(|line| match serde_json::from_str(line) {
                Ok(command) => Some(command),
                Err(e) => {
                    tracing::debug!(error = %e, "Skipping corrupt display command line");
                    None
                }
            })
            .collect()
    }
}

/// Parse the newest command from a record: the whole text if it is one
/// JSON document, otherwise its last non-empty line.
fn parse_latest(text: &str) -> Option<DisplayCommand> {
    serde_json::from_str(text).ok().or_else(|| {
        text.lines()
            .rev()
            .find(|line| !line.trim().is_empty())
            .and_then(|line| serde_json::from_str(line).ok())
    })
}
