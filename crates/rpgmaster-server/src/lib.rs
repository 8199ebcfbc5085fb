//! HTTP API server for RPG Master.
//!
//! This crate provides an Axum HTTP server that exposes:
//!
//! - **Turn tracker endpoints** (`/api/characters`, `/api/game/*`) for
//!   the master client to manage the roster and step through turns
//! - **Screen relay endpoints** (`/api/screen/*`) the master publishes to
//!   and the player screen polls
//! - **Whiteboard endpoints** (`/api/whiteboard/*`)
//! - **Content library endpoints** (`/api/content/*`)
//! - **Minimal HTML status page** (`GET /`)
//!
//! # Architecture
//!
//! Handlers are thin: they decode the request, call the
//! [`TurnTracker`](tracker::TurnTracker) or a store on the shared
//! [`AppState`], and shape the JSON reply. Displays learn about changes
//! only by polling; every tracker mutation republishes `initiative` so the
//! next poll redraws.

pub mod content;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod router;
pub mod screen;
pub mod server;
pub mod state;
pub mod tracker;
pub mod whiteboard;

// Re-export primary types for convenience.
pub use error::{ApiError, TrackerError};
pub use router::build_router;
pub use server::{ServerConfig, ServerError, start_server};
pub use state::AppState;
pub use tracker::TurnTracker;
