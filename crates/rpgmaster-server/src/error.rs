//! Error types for the RPG Master API server.
//!
//! [`TrackerError`] is what the turn tracker service reports.
//! [`ApiError`] unifies every failure a handler can hit into one enum
//! that converts into an Axum HTTP response via its
//! [`IntoResponse`](axum::response::IntoResponse) implementation.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use rpgmaster_core::ValidationError;
use rpgmaster_db::DbError;
use rpgmaster_types::CombatantId;

/// Errors from turn tracker operations.
#[derive(Debug, thiserror::Error)]
pub enum TrackerError {
    /// The request was rejected before any state changed.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// No combatant with this id (or no active one, for removal).
    #[error("combatant not found: {0}")]
    NotFound(CombatantId),

    /// The roster or cursor could not be read or written.
    #[error(transparent)]
    Storage(#[from] DbError),
}

/// Errors that can occur in the API layer.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request was malformed or failed validation.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// The requested resource was not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// The request body exceeded the size cap.
    #[error("payload too large: {0}")]
    PayloadTooLarge(String),

    /// An internal error occurred.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        Self::BadRequest(err.to_string())
    }
}

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        Self::Internal(err.to_string())
    }
}

impl From<TrackerError> for ApiError {
    fn from(err: TrackerError) -> Self {
        match err {
            TrackerError::Validation(e) => e.into(),
            TrackerError::NotFound(id) => Self::NotFound(format!("combatant {id}")),
            TrackerError::Storage(e) => e.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            Self::PayloadTooLarge(msg) => (StatusCode::PAYLOAD_TOO_LARGE, msg),
            Self::Internal(msg) => {
                tracing::error!(error = %msg, "Request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };

        let body = serde_json::json!({
            "success": false,
            "error": message,
            "status": status.as_u16(),
        });

        (status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracker_errors_map_to_status_codes() {
        let missing = ApiError::from(TrackerError::Validation(ValidationError::MissingField("name")));
        assert_eq!(missing.into_response().status(), StatusCode::BAD_REQUEST);

        let absent = ApiError::from(TrackerError::NotFound(CombatantId::new()));
        assert_eq!(absent.into_response().status(), StatusCode::NOT_FOUND);

        let broken = ApiError::from(TrackerError::Storage(DbError::Config("bad".to_owned())));
        assert_eq!(broken.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);

        let oversized = ApiError::PayloadTooLarge("length limit exceeded".to_owned());
        assert_eq!(oversized.into_response().status(), StatusCode::PAYLOAD_TOO_LARGE);
    }
}
