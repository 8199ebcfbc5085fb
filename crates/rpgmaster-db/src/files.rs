//! Small filesystem helpers for the JSON record files.
//!
//! Readers never observe a half-written record: whole-file writes go to a
//! uniquely named sibling first and are renamed into place, and appends
//! are a single write of one complete line.

use std::path::{Path, PathBuf};

use tokio::io::AsyncWriteExt;
use uuid::Uuid;

use crate::error::DbError;

/// Create the parent directory of `path` if it has one.
async fn ensure_parent(path: &Path) -> Result<(), DbError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| DbError::io(parent, e))?;
    }
    Ok(())
}

fn temp_sibling(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map_or_else(|| "record".into(), |n| n.to_string_lossy());
    path.with_file_name(format!(".{name}.{}.tmp", Uuid::new_v4().simple()))
}

/// Replace the contents of `path` atomically.
///
/// # Errors
///
/// Returns [`DbError::Io`] if the temporary file cannot be written or
/// renamed over the target.
pub async fn write_atomic(path: &Path, contents: &[u8]) -> Result<(), DbError> {
    ensure_parent(path).await?;

    let tmp = temp_sibling(path);
    if let Err(e) = tokio::fs::write(&tmp, contents).await {
        return Err(DbError::io(&tmp, e));
    }
    if let Err(e) = tokio::fs::rename(&tmp, path).await {
        let _ = tokio::fs::remove_file(&tmp).await;
        return Err(DbError::io(path, e));
    }
    Ok(())
}

/// Append one line to `path`, creating the file if needed.
///
/// # Errors
///
/// Returns [`DbError::Io`] if the file cannot be opened or written.
pub async fn append_line(path: &Path, line: &str) -> Result<(), DbError> {
    ensure_parent(path).await?;

    let mut record = String::with_capacity(line.len().saturating_add(1));
    record.push_str(line);
    record.push('\n');

    let mut file = tokio::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await
        .map_err(|e| DbError::io(path, e))?;
    file.write_all(record.as_bytes())
        .await
        .map_err(|e| DbError::io(path, e))?;
    file.flush().await.map_err(|e| DbError::io(path, e))?;
    Ok(())
}

/// Read a whole file, treating a missing file as `None`.
///
/// # Errors
///
/// Returns [`DbError::Io`] for any failure other than the file not
/// existing.
pub async fn read_optional(path: &Path) -> Result<Option<String>, DbError> {
    match tokio::fs::read_to_string(path).await {
        Ok(text) => Ok(Some(text)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(DbError::io(path, e)),
    }
}
