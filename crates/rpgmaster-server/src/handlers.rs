//! Turn tracker endpoint handlers and the status page.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/` | Minimal HTML status page |
//! | `GET` | `/api/characters` | Initiative board |
//! | `POST` | `/api/characters` | Add a combatant |
//! | `DELETE` | `/api/characters/{id}` | Soft-delete a combatant |
//! | `PUT` | `/api/characters/{id}/hp` | Set current hit points |
//! | `POST` | `/api/game/next-turn` | Advance the cursor |
//! | `POST` | `/api/game/prev-turn` | Retreat the cursor |
//! | `POST` | `/api/game/reset` | End combat |

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::response::{Html, IntoResponse};
use rpgmaster_core::{AddCombatantRequest, SetHpRequest};
use rpgmaster_types::{CombatantId, InitiativeBoard};
use serde_json::Value;

use crate::error::ApiError;
use crate::extract::LenientJson;
use crate::state::AppState;

/// Body of `GET /api/characters`.
#[derive(Debug, serde::Serialize)]
pub struct BoardResponse {
    /// Always `true`.
    pub success: bool,
    /// The board itself, flattened into the response.
    #[serde(flatten)]
    pub board: InitiativeBoard,
}

/// Parse a combatant id from the path. Anything that is not a UUID cannot
/// name a combatant, so it is reported as not found.
fn parse_id(raw: &str) -> Result<CombatantId, ApiError> {
    raw.parse()
        .map_err(|_parse_err| ApiError::NotFound(format!("combatant {raw}")))
}

/// Decode a loosely typed body, treating an absent body as `{}`.
fn decode_body<T>(body: Value) -> Result<T, ApiError>
where
    T: serde::de::DeserializeOwned + Default,
{
    if body.is_null() {
        return Ok(T::default());
    }
    serde_json::from_value(body).map_err(|e| ApiError::BadRequest(format!("invalid request body: {e}")))
}

// ---------------------------------------------------------------------------
// GET / -- minimal HTML status page
// ---------------------------------------------------------------------------

/// Serve a minimal HTML page showing the table's state and API links.
pub async fn index(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let (round, current, active) = match state.tracker().current_view().await {
        Ok(board) => (
            board.round_number.to_string(),
            board
                .current()
                .map_or_else(|| String::from("--"), |c| escape_html(&c.name)),
            board.characters.len().to_string(),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "Status page could not read the board");
            (String::from("?"), String::from("?"), String::from("?"))
        }
    };
    let screen = escape_html(state.relay.current().await.kind.as_str());

    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <title>RPG Master</title>
    <style>
        body {{
            background: #1b1510;
            color: #e8dcc4;
            font-family: Georgia, 'Times New Roman', serif;
            padding: 2rem;
            max-width: 760px;
            margin: 0 auto;
        }}
        h1 {{ color: #d4a73c; margin-bottom: 0.25rem; }}
        .metric {{
            display: inline-block;
            background: #2a2119;
            border: 1px solid #4a3b2c;
            border-radius: 6px;
            padding: 0.9rem 1.4rem;
            margin: 0.5rem 0.5rem 0.5rem 0;
            min-width: 110px;
        }}
        .metric .label {{ color: #a8977c; font-size: 0.85rem; }}
        .metric .value {{ color: #d4a73c; font-size: 1.4rem; font-weight: bold; }}
        code {{ color: #9fd39f; }}
        ul {{ list-style: none; padding: 0; }}
        li {{ padding: 0.2rem 0; }}
    </style>
</head>
<body>
    <h1>RPG Master</h1>
    <div>
        <div class="metric"><div class="label">Round</div><div class="value">{round}</div></div>
        <div class="metric"><div class="label">Current turn</div><div class="value">{current}</div></div>
        <div class="metric"><div class="label">Combatants</div><div class="value">{active}</div></div>
        <div class="metric"><div class="label">Screen</div><div class="value">{screen}</div></div>
    </div>
    <h2>Endpoints</h2>
    <ul>
        <li><code>GET /api/characters</code></li>
        <li><code>POST /api/characters</code></li>
        <li><code>DELETE /api/characters/{{id}}</code></li>
        <li><code>PUT /api/characters/{{id}}/hp</code></li>
        <li><code>POST /api/game/next-turn | prev-turn | reset</code></li>
        <li><code>GET|POST /api/screen/command</code>, <code>GET /api/screen/history</code></li>
        <li><code>POST /api/screen/show-image | show-video | show-youtube | show-card</code></li>
        <li><code>POST /api/screen/youtube-control | toggle-grid | show-initiative | clear | blackout</code></li>
        <li><code>POST /api/whiteboard/save</code>, <code>GET /api/whiteboard/load</code></li>
        <li><code>GET /api/content/{{kind}}</code>, <code>GET /api/content/{{kind}}/{{slug}}</code></li>
    </ul>
</body>
</html>"#
    ))
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Characters
// ---------------------------------------------------------------------------

/// `GET /api/characters` -- the initiative board.
///
/// # Errors
///
/// Returns [`ApiError::Internal`] if the roster or cursor cannot be read.
pub async fn list_characters(
    State(state): State<Arc<AppState>>,
) -> Result<Json<BoardResponse>, ApiError> {
    let board = state.tracker().current_view().await?;
    Ok(Json(BoardResponse {
        success: true,
        board,
    }))
}

/// `POST /api/characters` -- add a combatant.
///
/// # Errors
///
/// Returns [`ApiError::BadRequest`] if the name is missing or a number
/// does not parse, or [`ApiError::Internal`] on storage failure.
pub async fn add_character(
    State(state): State<Arc<AppState>>,
    LenientJson(body): LenientJson<Value>,
) -> Result<Json<Value>, ApiError> {
    let request: AddCombatantRequest = decode_body(body)?;
    let new = request.validate()?;
    let combatant = state.tracker().add(new).await?;

    Ok(Json(serde_json::json!({
        "success": true,
        "id": combatant.id,
    })))
}

/// `DELETE /api/characters/{id}` -- soft-delete a combatant.
///
/// # Errors
///
/// Returns [`ApiError::NotFound`] if no active combatant has this id, or
/// [`ApiError::Internal`] on storage failure.
pub async fn delete_character(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let id = parse_id(&id)?;
    state.tracker().remove(id).await?;
    Ok(Json(serde_json::json!({ "success": true })))
}

/// `PUT /api/characters/{id}/hp` -- set current hit points.
///
/// # Errors
///
/// Returns [`ApiError::NotFound`] for an unknown id,
/// [`ApiError::BadRequest`] if `hp` is missing or not an integer, or
/// [`ApiError::Internal`] on storage failure.
pub async fn set_character_hp(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    LenientJson(body): LenientJson<Value>,
) -> Result<Json<Value>, ApiError> {
    let id = parse_id(&id)?;
    let request: SetHpRequest = decode_body(body)?;
    let hp = request.validate()?;
    state.tracker().set_hp(id, hp).await?;
    Ok(Json(serde_json::json!({ "success": true })))
}

// ---------------------------------------------------------------------------
// Game flow
// ---------------------------------------------------------------------------

/// `POST /api/game/next-turn` -- advance the cursor.
///
/// `success` is `false` when there is nobody to advance to.
///
/// # Errors
///
/// Returns [`ApiError::Internal`] on storage failure.
pub async fn next_turn(State(state): State<Arc<AppState>>) -> Result<Json<Value>, ApiError> {
    let moved = state.tracker().advance().await?;
    Ok(Json(serde_json::json!({ "success": moved })))
}

/// `POST /api/game/prev-turn` -- retreat the cursor.
///
/// `success` is `false` when there is nobody to retreat to.
///
/// # Errors
///
/// Returns [`ApiError::Internal`] on storage failure.
pub async fn prev_turn(State(state): State<Arc<AppState>>) -> Result<Json<Value>, ApiError> {
    let moved = state.tracker().retreat().await?;
    Ok(Json(serde_json::json!({ "success": moved })))
}

/// `POST /api/game/reset` -- deactivate everyone and rewind to round 1.
///
/// # Errors
///
/// Returns [`ApiError::Internal`] on storage failure.
pub async fn reset_game(State(state): State<Arc<AppState>>) -> Result<Json<Value>, ApiError> {
    state.tracker().reset().await?;
    Ok(Json(serde_json::json!({ "success": true })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn html_is_escaped() {
        assert_eq!(escape_html("<b>Orc & \"Goblin\"</b>"), "&lt;b&gt;Orc &amp; &quot;Goblin&quot;&lt;/b&gt;");
    }

    #[test]
    fn non_uuid_ids_are_not_found() {
        assert!(matches!(parse_id("42"), Err(ApiError::NotFound(_))));
        assert!(parse_id(&CombatantId::new().to_string()).is_ok());
    }
}
