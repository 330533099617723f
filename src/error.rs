use axum::{ http::StatusCode, response::IntoResponse, Json };
use serde_json::json;
use thiserror::Error;

/// First field of a payload that does not match its declared shape.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("Schema violation at `{path}`: expected {expected}, found {actual}")]
pub struct SchemaViolation {
    pub path: String,
    pub expected: String,
    pub actual: String,
}

impl SchemaViolation {
    pub fn new(
        path: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>
    ) -> Self {
        Self {
            path: path.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not found: {0}")] NotFound(String),

    #[error("Bad request: {0}")] BadRequest(String),

    #[error(transparent)] SchemaViolation(#[from] SchemaViolation),

    #[error("Model returned no usable answer: {0}")] EmptyGeneration(String),

    #[error("Upstream call failed: {0}")] UpstreamCallFailure(String),

    #[error("Internal server error")] InternalError(#[from] anyhow::Error),
}

impl AppError {
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::NotFound(_) => "not_found",
            AppError::BadRequest(_) => "bad_request",
            AppError::SchemaViolation(_) => "schema_violation",
            AppError::EmptyGeneration(_) => "empty_generation",
            AppError::UpstreamCallFailure(_) => "upstream_call_failure",
            AppError::InternalError(_) => "internal_error",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let kind = self.kind();

        let (status, body) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, json!({ "error": msg, "kind": kind })),
            AppError::BadRequest(msg) =>
                (StatusCode::BAD_REQUEST, json!({ "error": msg, "kind": kind })),
            AppError::SchemaViolation(violation) =>
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    json!({
                        "error": violation.to_string(),
                        "kind": kind,
                        "path": violation.path,
                        "expected": violation.expected,
                        "actual": violation.actual,
                    }),
                ),
            AppError::EmptyGeneration(msg) =>
                (StatusCode::BAD_GATEWAY, json!({ "error": msg, "kind": kind })),
            AppError::UpstreamCallFailure(msg) =>
                (StatusCode::SERVICE_UNAVAILABLE, json!({ "error": msg, "kind": kind })),
            AppError::InternalError(e) => {
                tracing::error!("Internal error: {:#}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "Internal server error", "kind": kind }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
