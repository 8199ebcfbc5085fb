//! Whiteboard handlers.
//!
//! `POST /api/whiteboard/save` stores the canvas state the master client
//! sends; `GET /api/whiteboard/load` hands back the latest one, or
//! `{"state": null}` when there is none.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use rpgmaster_core::validate_whiteboard_state;
use rpgmaster_types::WhiteboardRecord;
use serde_json::{Value, json};

use crate::error::ApiError;
use crate::extract::LenientJson;
use crate::state::AppState;

/// Body of `POST /api/whiteboard/save`.
#[derive(Debug, Default, serde::Deserialize)]
pub struct SaveRequest {
    /// Opaque canvas state (required, not blank).
    #[serde(default)]
    pub state: Option<Value>,
}

/// `POST /api/whiteboard/save`.
///
/// # Errors
///
/// Returns [`ApiError::BadRequest`] if `state` is missing or blank, or
/// [`ApiError::Internal`] if the record cannot be written.
pub async fn save(
    State(state): State<Arc<AppState>>,
    LenientJson(body): LenientJson<SaveRequest>,
) -> Result<Json<Value>, ApiError> {
    let drawing = validate_whiteboard_state(body.state)?;
    state.whiteboard.save(drawing).await?;

    tracing::info!("Whiteboard saved");
    Ok(Json(json!({ "success": true })))
}

/// `GET /api/whiteboard/load`.
pub async fn load(State(state): State<Arc<AppState>>) -> Json<WhiteboardRecord> {
    Json(state.whiteboard.load().await)
}
