//! Screen command handlers.
//!
//! The master client publishes display instructions here and the player
//! screen polls `GET /api/screen/command` for the newest one. Request
//! bodies are read leniently: a missing or malformed body counts as `{}`.
//!
//! # Endpoints
//!
//! | Method | Path | Publishes |
//! |--------|------|-----------|
//! | `GET` | `/api/screen/command` | (reads the latest command) |
//! | `POST` | `/api/screen/command` | any `{type, data}` |
//! | `GET` | `/api/screen/history` | (reads recoverable commands) |
//! | `POST` | `/api/screen/show-image` | `image {url}` |
//! | `POST` | `/api/screen/show-video` | `video {url, autoplay}` |
//! | `POST` | `/api/screen/show-youtube` | `youtube {video_id, autoplay, muted}` |
//! | `POST` | `/api/screen/show-card` | `info_card` with the body as payload |
//! | `POST` | `/api/screen/youtube-control` | `youtube_control {action}` |
//! | `POST` | `/api/screen/toggle-grid` | `toggle-grid {show}` |
//! | `POST` | `/api/screen/show-initiative` | `initiative` |
//! | `POST` | `/api/screen/clear` | `clear` |
//! | `POST` | `/api/screen/blackout` | `blackout` |

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use rpgmaster_core::{ValidationError, is_truthy};
use rpgmaster_types::{CommandKind, DisplayCommand};
use serde_json::{Value, json};

use crate::error::ApiError;
use crate::extract::LenientJson;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Body of `POST /api/screen/command`.
#[derive(Debug, Default, serde::Deserialize)]
pub struct CommandRequest {
    /// Command kind (required).
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    /// Payload, passed through untouched.
    #[serde(default)]
    pub data: Option<Value>,
}

/// Body of the media endpoints.
#[derive(Debug, Default, serde::Deserialize)]
pub struct MediaRequest {
    /// Image or video URL.
    #[serde(default)]
    pub url: Option<Value>,
    /// `YouTube` video id.
    #[serde(default)]
    pub video_id: Option<Value>,
}

/// Body of `POST /api/screen/youtube-control`.
#[derive(Debug, Default, serde::Deserialize)]
pub struct YoutubeControlRequest {
    /// Player action, e.g. `play` or `pause`.
    #[serde(default)]
    pub action: Option<Value>,
}

/// Body of `POST /api/screen/toggle-grid`.
#[derive(Debug, Default, serde::Deserialize)]
pub struct ToggleGridRequest {
    /// Whether the grid overlay is shown.
    #[serde(default)]
    pub show: Option<Value>,
}

/// Body of `GET /api/screen/history`.
#[derive(Debug, serde::Serialize)]
pub struct HistoryResponse {
    /// Always `true`.
    pub success: bool,
    /// Recoverable commands, oldest first.
    pub commands: Vec<DisplayCommand>,
}

async fn publish(state: &AppState, kind: CommandKind, data: Option<Value>) -> Result<Json<Value>, ApiError> {
    let command = state.relay.publish(kind, data).await?;
    tracing::info!(kind = %command.kind, "Screen command published");
    Ok(Json(json!({ "success": true })))
}

// ---------------------------------------------------------------------------
// Generic command
// ---------------------------------------------------------------------------

/// `GET /api/screen/command` -- the newest command, or a placeholder.
pub async fn get_command(State(state): State<Arc<AppState>>) -> Json<DisplayCommand> {
    Json(state.relay.current().await)
}

/// `POST /api/screen/command` -- publish an arbitrary command.
///
/// # Errors
///
/// Returns [`ApiError::BadRequest`] if `type` is missing, or
/// [`ApiError::Internal`] if the record cannot be written.
pub async fn post_command(
    State(state): State<Arc<AppState>>,
    LenientJson(body): LenientJson<CommandRequest>,
) -> Result<Json<Value>, ApiError> {
    let kind = body
        .kind
        .as_deref()
        .map(str::trim)
        .filter(|kind| !kind.is_empty())
        .ok_or(ValidationError::MissingField("type"))?;

    publish(&state, CommandKind::from(kind), body.data).await
}

/// `GET /api/screen/history` -- every recoverable command.
pub async fn get_history(State(state): State<Arc<AppState>>) -> Json<HistoryResponse> {
    Json(HistoryResponse {
        success: true,
        commands: state.relay.history().await,
    })
}

// ---------------------------------------------------------------------------
// Media
// ---------------------------------------------------------------------------

/// `POST /api/screen/show-image`.
///
/// # Errors
///
/// Returns [`ApiError::Internal`] if the record cannot be written.
pub async fn show_image(
    State(state): State<Arc<AppState>>,
    LenientJson(body): LenientJson<MediaRequest>,
) -> Result<Json<Value>, ApiError> {
    publish(&state, CommandKind::Image, Some(json!({ "url": body.url }))).await
}

/// `POST /api/screen/show-video`.
///
/// # Errors
///
/// Returns [`ApiError::Internal`] if the record cannot be written.
pub async fn show_video(
    State(state): State<Arc<AppState>>,
    LenientJson(body): LenientJson<MediaRequest>,
) -> Result<Json<Value>, ApiError> {
    let data = json!({ "url": body.url, "autoplay": true });
    publish(&state, CommandKind::Video, Some(data)).await
}

/// `POST /api/screen/show-youtube`.
///
/// # Errors
///
/// Returns [`ApiError::Internal`] if the record cannot be written.
pub async fn show_youtube(
    State(state): State<Arc<AppState>>,
    LenientJson(body): LenientJson<MediaRequest>,
) -> Result<Json<Value>, ApiError> {
    let data = json!({ "video_id": body.video_id, "autoplay": true, "muted": false });
    publish(&state, CommandKind::Youtube, Some(data)).await
}

/// `POST /api/screen/youtube-control`.
///
/// # Errors
///
/// Returns [`ApiError::Internal`] if the record cannot be written.
pub async fn youtube_control(
    State(state): State<Arc<AppState>>,
    LenientJson(body): LenientJson<YoutubeControlRequest>,
) -> Result<Json<Value>, ApiError> {
    let data = json!({ "action": body.action });
    publish(&state, CommandKind::YoutubeControl, Some(data)).await
}

// ---------------------------------------------------------------------------
// Cards, overlays, and blanking
// ---------------------------------------------------------------------------

/// `POST /api/screen/show-card` -- the body is the card.
///
/// # Errors
///
/// Returns [`ApiError::Internal`] if the record cannot be written.
pub async fn show_card(
    State(state): State<Arc<AppState>>,
    LenientJson(body): LenientJson<Value>,
) -> Result<Json<Value>, ApiError> {
    let card = if body.is_null() { json!({}) } else { body };
    publish(&state, CommandKind::InfoCard, Some(card)).await
}

/// `POST /api/screen/toggle-grid`.
///
/// # Errors
///
/// Returns [`ApiError::Internal`] if the record cannot be written.
pub async fn toggle_grid(
    State(state): State<Arc<AppState>>,
    LenientJson(body): LenientJson<ToggleGridRequest>,
) -> Result<Json<Value>, ApiError> {
    let show = body.show.as_ref().is_some_and(is_truthy);
    publish(&state, CommandKind::ToggleGrid, Some(json!({ "show": show }))).await
}

/// `POST /api/screen/show-initiative`.
///
/// # Errors
///
/// Returns [`ApiError::Internal`] if the record cannot be written.
pub async fn show_initiative(State(state): State<Arc<AppState>>) -> Result<Json<Value>, ApiError> {
    publish(&state, CommandKind::Initiative, None).await
}

/// `POST /api/screen/clear`.
///
/// # Errors
///
/// Returns [`ApiError::Internal`] if the record cannot be written.
pub async fn clear(State(state): State<Arc<AppState>>) -> Result<Json<Value>, ApiError> {
    publish(&state, CommandKind::Clear, None).await
}

/// `POST /api/screen/blackout`.
///
/// # Errors
///
/// Returns [`ApiError::Internal`] if the record cannot be written.
pub async fn blackout(State(state): State<Arc<AppState>>) -> Result<Json<Value>, ApiError> {
    publish(&state, CommandKind::Blackout, None).await
}
