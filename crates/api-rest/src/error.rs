//! HTTP error responses.
//!
//! Every failure is rendered as a FHIR `OperationOutcome` with a single issue. Server-side
//! failures (5xx) carry a generic message; the detail goes to the log only.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use medrec_core::CoreError;
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("invalid request body: {0}")]
    Body(#[from] JsonRejection),
}

/// FHIR `OperationOutcome` error body.
#[derive(Debug, Serialize, ToSchema)]
pub struct OperationOutcome {
    #[serde(rename = "resourceType")]
    pub resource_type: String,
    pub issue: Vec<OperationOutcomeIssue>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OperationOutcomeIssue {
    pub severity: String,
    /// FHIR issue type: `not-found`, `invalid`, `conflict`, `transient`, `timeout`, `exception`.
    pub code: String,
    pub diagnostics: String,
}

impl OperationOutcome {
    fn error(code: &'static str, diagnostics: String) -> Self {
        Self {
            resource_type: "OperationOutcome".into(),
            issue: vec![OperationOutcomeIssue {
                severity: "error".into(),
                code: code.into(),
                diagnostics,
            }],
        }
    }
}

impl ApiError {
    fn parts(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::Core(err) => match err {
                CoreError::NotFound { .. } | CoreError::ReferenceNotFound { .. } => {
                    (StatusCode::NOT_FOUND, "not-found")
                }
                CoreError::LookupFailed { .. } | CoreError::InvalidInput(_) => {
                    (StatusCode::BAD_REQUEST, "invalid")
                }
                CoreError::Conflict { .. } => (StatusCode::CONFLICT, "conflict"),
                CoreError::Transport(_) => (StatusCode::BAD_GATEWAY, "transient"),
                CoreError::Timeout(_) => (StatusCode::GATEWAY_TIMEOUT, "timeout"),
                CoreError::Store(_) | CoreError::Config(_) => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "exception")
                }
            },
            ApiError::Body(rejection) => (rejection.status(), "invalid"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.parts();

        let diagnostics = if status.is_server_error() {
            tracing::error!("request failed with {}: {}", status, self);
            match status {
                StatusCode::INTERNAL_SERVER_ERROR => "Internal server error".to_string(),
                _ => self.to_string(),
            }
        } else {
            tracing::debug!("request rejected with {}: {}", status, self);
            match &self {
                ApiError::Body(rejection) => rejection.body_text(),
                ApiError::Core(err) => err.to_string(),
            }
        };

        (status, Json(OperationOutcome::error(code, diagnostics))).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
