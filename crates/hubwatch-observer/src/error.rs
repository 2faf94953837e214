//! API error type and its JSON rendering.
//!
//! Every failing handler returns [`ObserverError`]; its
//! [`IntoResponse`] impl picks the status code and renders
//! `{"error": "...", "status": N}`.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use hubwatch_core::store::StoreError;
use serde::Serialize;

/// Errors that can occur while answering an API request.
#[derive(Debug, thiserror::Error)]
pub enum ObserverError {
    /// No such entry or route.
    #[error("not found: {0}")]
    NotFound(String),

    /// A query parameter had an unsupported value.
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    /// A path segment was not a UUID.
    #[error("invalid UUID: {0}")]
    InvalidUuid(String),

    /// No poll cycle has completed yet.
    #[error("not ready: {0}")]
    NotReady(String),

    /// The store failed to answer.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ObserverError {
    /// HTTP status for this error.
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::InvalidQuery(_) | Self::InvalidUuid(_) => StatusCode::BAD_REQUEST,
            Self::NotReady(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    status: u16,
}

impl IntoResponse for ObserverError {
    fn into_response(self) -> Response {
        let status = self.status();
        if let Self::Store(e) = &self {
            tracing::error!(error = %e, "Store error while serving request");
        }

        let body = ErrorBody {
            error: self.to_string(),
            status: status.as_u16(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_follow_error_kind() {
        assert_eq!(
            ObserverError::NotFound("x".to_owned()).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ObserverError::InvalidUuid("x".to_owned()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ObserverError::NotReady("x".to_owned()).status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            ObserverError::from(StoreError::backend("down")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
