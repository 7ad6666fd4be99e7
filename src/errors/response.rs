use axum::{
    response::{IntoResponse, Response, Json},
    http::StatusCode,
};
use serde_json::json;
use crate::errors::AppError;

// The IntoResponse trait implementation converts AppError into a well-formed HTTP response.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Auth(msg) => (StatusCode::UNAUTHORIZED, msg),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),

            // Missing or malformed fields are rejected before any store mutation
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            AppError::JsonBody(rejection) => (StatusCode::BAD_REQUEST, rejection.body_text()),
            AppError::FormBody(rejection) => (StatusCode::BAD_REQUEST, rejection.body_text()),

            // Storage and internal failures share one generic message; the detail goes to the log
            AppError::Redis(e) => internal("Storage error", &e),
            AppError::Serialization(e) => internal("Storage error", &e),
            AppError::Hash(e) => internal("Internal error", &e),
            AppError::Session(msg) => internal("Session error", &msg),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

fn internal(public: &str, detail: &dyn std::fmt::Display) -> (StatusCode, String) {
    tracing::error!("{}: {}", public, detail);
    (StatusCode::INTERNAL_SERVER_ERROR, public.to_string())
}
