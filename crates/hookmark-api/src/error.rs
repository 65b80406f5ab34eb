//! Mapping of core errors onto HTTP responses.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

/// Error returned by handlers, rendered as `{"error": message}`.
#[derive(Debug)]
pub enum ApiError {
    Internal(hookmark_core::Error),
    NotFound(String),
    BadRequest(String),
}

impl From<hookmark_core::Error> for ApiError {
    fn from(err: hookmark_core::Error) -> Self {
        match err {
            hookmark_core::Error::BookmarkNotFound(id) => {
                ApiError::NotFound(format!("Bookmark {} not found", id))
            }
            hookmark_core::Error::InvalidInput(msg) => ApiError::BadRequest(msg),
            other => ApiError::Internal(other),
        }
    }
}

impl From<hookmark_store::ConfigError> for ApiError {
    fn from(err: hookmark_store::ConfigError) -> Self {
        hookmark_core::Error::from(err).into()
    }
}

/// Malformed or mistyped request bodies, e.g. an unknown trigger name.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            ApiError::Internal(err) => {
                tracing::error!(error = %err, "Request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
            }
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
        };

        let body = Json(serde_json::json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}
