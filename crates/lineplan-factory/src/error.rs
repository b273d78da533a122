//! Error taxonomy for the factory-event intake boundary.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

#[derive(Debug, thiserror::Error)]
pub enum IntakeError {
    /// The currently-executing production order could not be identified.
    /// Responds 200 with `status: "unresolved"` — no state change, no crash.
    #[error("could not resolve a production order: {0}")]
    Resolution(String),

    /// Malformed multipart payload.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Anything downstream (orchestrator, channel) failed.
    #[error("internal error: {0}")]
    Internal(String),
}

#[derive(Serialize)]
pub struct IntakeResponse {
    pub status: &'static str,
    pub message: String,
}

impl IntoResponse for IntakeError {
    fn into_response(self) -> Response {
        let (code, status, message) = match &self {
            Self::Resolution(msg) => (StatusCode::OK, "unresolved", msg.clone()),
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, "error", msg.clone()),
            Self::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "error", msg.clone()),
        };
        (code, Json(IntakeResponse { status, message })).into_response()
    }
}

impl From<lineplan_orchestrator::OrchestratorError> for IntakeError {
    fn from(e: lineplan_orchestrator::OrchestratorError) -> Self {
        Self::Internal(e.to_string())
    }
}
