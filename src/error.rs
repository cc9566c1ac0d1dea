//! Fault taxonomy. Every fault maps to exactly one terminal HTTP
//! response; nothing is retried.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::llm::LlmError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// No task-description upload; nothing to analyze. Surfaced before
    /// any LLM call is made.
    #[error("questions.txt is missing.")]
    MissingTaskFile,

    /// Artifact name would resolve outside the workspace.
    #[error("invalid artifact name: {0:?}")]
    InvalidArtifactName(String),

    /// The generation call failed or returned an unusable payload.
    #[error("script generation failed: {0}")]
    Generation(#[from] LlmError),

    /// The generated script exceeded the execution budget.
    #[error("Analysis task timed out.")]
    Timeout,

    /// The generated script exited non-zero.
    #[error("Script execution failed")]
    ExecutionFailed { stderr: String },

    /// The script exited zero but its stdout was not a single JSON value.
    #[error("Agent script produced invalid JSON.")]
    InvalidScriptOutput { stdout: String },

    #[error("{0}")]
    Internal(String),
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            AppError::MissingTaskFile => {
                (StatusCode::BAD_REQUEST, json!({ "detail": self.to_string() }))
            }
            AppError::Timeout => {
                (StatusCode::GATEWAY_TIMEOUT, json!({ "detail": self.to_string() }))
            }
            AppError::ExecutionFailed { stderr } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": "Script execution failed", "stderr": stderr }),
            ),
            AppError::InvalidScriptOutput { stdout } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "detail": self.to_string(), "stdout": stdout }),
            ),
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "detail": self.to_string() }),
            ),
        };
        (status, Json(body)).into_response()
    }
}
