//! Request body extraction.
//!
//! The browser clients post JSON without much care for headers, and the
//! screen endpoints must act even on an empty or garbled body. The
//! [`LenientJson`] extractor reads the raw bytes and falls back to the
//! target's default when they are not usable JSON.

use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::{FromRequest, Request};
use axum::http::StatusCode;
use serde::de::DeserializeOwned;

use crate::error::ApiError;

/// JSON body that tolerates bad content: absent or unparseable bodies
/// yield `T::default()`.
///
/// A body that cannot be read at all is still rejected, with 413 when
/// it exceeds the configured size cap.
#[derive(Debug, Clone, Default)]
pub struct LenientJson<T>(pub T);

impl<S, T> FromRequest<S> for LenientJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Default,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state).await.map_err(unreadable_body)?;

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self(T::default()));
        }

        Ok(Self(serde_json::from_slice(&bytes).unwrap_or_else(|e| {
            tracing::debug!(error = %e, "Ignoring malformed JSON body");
            T::default()
        })))
    }
}

fn unreadable_body(rejection: BytesRejection) -> ApiError {
    let message = rejection.body_text();
    if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
        tracing::warn!(error = %message, "Request body over the size cap");
        ApiError::PayloadTooLarge(message)
    } else {
        ApiError::BadRequest(message)
    }
}
