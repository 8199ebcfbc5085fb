//! Content library handlers.
//!
//! Library reads are blocking file I/O and run on the blocking pool.
//! `kind` in the path accepts the singular or plural form (`monster` or
//! `monsters`); anything else is 404.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use rpgmaster_core::{ContentDetail, ContentEntry, ContentKind};

use crate::error::ApiError;
use crate::state::AppState;

/// Body of `GET /api/content/{kind}`.
#[derive(Debug, serde::Serialize)]
pub struct ListResponse {
    /// Always `true`.
    pub success: bool,
    /// The section listed.
    pub kind: ContentKind,
    /// Entries sorted by display name.
    pub entries: Vec<ContentEntry>,
}

fn parse_kind(raw: &str) -> Result<ContentKind, ApiError> {
    match raw {
        "monster" | "monsters" => Ok(ContentKind::Monster),
        "spell" | "spells" => Ok(ContentKind::Spell),
        "rule" | "rules" => Ok(ContentKind::Rule),
        _ => Err(ApiError::NotFound(format!("content kind {raw}"))),
    }
}

/// `GET /api/content/{kind}` -- list a library section.
///
/// # Errors
///
/// Returns [`ApiError::NotFound`] for an unknown kind, or
/// [`ApiError::Internal`] if the blocking task fails.
pub async fn list(
    State(state): State<Arc<AppState>>,
    Path(kind): Path<String>,
) -> Result<Json<ListResponse>, ApiError> {
    let kind = parse_kind(&kind)?;
    let library = Arc::clone(&state.library);

    let entries = tokio::task::spawn_blocking(move || library.list(kind))
        .await
        .map_err(|e| ApiError::Internal(format!("content listing failed: {e}")))?;

    Ok(Json(ListResponse {
        success: true,
        kind,
        entries,
    }))
}

/// `GET /api/content/{kind}/{slug}` -- one entry with its markdown body.
///
/// # Errors
///
/// Returns [`ApiError::NotFound`] for an unknown kind or entry, or
/// [`ApiError::Internal`] if the blocking task fails.
pub async fn detail(
    State(state): State<Arc<AppState>>,
    Path((kind, slug)): Path<(String, String)>,
) -> Result<Json<ContentDetail>, ApiError> {
    let kind = parse_kind(&kind)?;
    let library = Arc::clone(&state.library);
    let lookup = slug.clone();

    tokio::task::spawn_blocking(move || library.detail(kind, &lookup))
        .await
        .map_err(|e| ApiError::Internal(format!("content lookup failed: {e}")))?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("content entry {slug}")))
}
