//! Axum router construction for the RPG Master API.
//!
//! Assembles every route into a single [`Router`] with CORS enabled so
//! display browsers on other origins can poll.

use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{delete, get, post, put};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;
use crate::{content, handlers, screen, whiteboard};

/// Build the complete Axum router.
///
/// The router includes:
/// - `GET /` -- minimal HTML status page
/// - `/api/characters` and `/api/game/*` -- turn tracker
/// - `/api/screen/*` -- screen command relay
/// - `/api/whiteboard/*` -- whiteboard save and load
/// - `/api/content/*` -- content library
///
/// CORS allows any origin; the server is meant for a trusted table.
/// Request bodies are capped at [`AppState::max_body_bytes`]; larger
/// ones are rejected with 413.
pub fn build_router(state: Arc<AppState>) -> Router {
    let body_limit = match state.max_body_bytes {
        0 => DefaultBodyLimit::disable(),
        max => DefaultBodyLimit::max(max),
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Status page
        .route("/", get(handlers::index))
        // Turn tracker
        .route(
            "/api/characters",
            get(handlers::list_characters).post(handlers::add_character),
        )
        .route("/api/characters/{id}", delete(handlers::delete_character))
        .route("/api/characters/{id}/hp", put(handlers::set_character_hp))
        .route("/api/game/next-turn", post(handlers::next_turn))
        .route("/api/game/prev-turn", post(handlers::prev_turn))
        .route("/api/game/reset", post(handlers::reset_game))
        // Screen relay
        .route(
            "/api/screen/command",
            get(screen::get_command).post(screen::post_command),
        )
        .route("/api/screen/history", get(screen::get_history))
        .route("/api/screen/show-image", post(screen::show_image))
        .route("/api/screen/show-video", post(screen::show_video))
        .route("/api/screen/show-youtube", post(screen::show_youtube))
        .route("/api/screen/show-card", post(screen::show_card))
        .route("/api/screen/youtube-control", post(screen::youtube_control))
        .route("/api/screen/toggle-grid", post(screen::toggle_grid))
        .route("/api/screen/show-initiative", post(screen::show_initiative))
        .route("/api/screen/clear", post(screen::clear))
        .route("/api/screen/blackout", post(screen::blackout))
        // Whiteboard
        .route("/api/whiteboard/save", post(whiteboard::save))
        .route("/api/whiteboard/load", get(whiteboard::load))
        // Content library
        .route("/api/content/{kind}", get(content::list))
        .route("/api/content/{kind}/{slug}", get(content::detail))
        .layer(body_limit)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
