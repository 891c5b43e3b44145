// HTTP API error normalization
use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;

use crate::auth::{AuthFailure, CredentialError, Forbidden};
use crate::config;
use crate::database::StoreError;

pub const ACCESS_DENIED: &str = "Access Denied";
pub const FORBIDDEN: &str = "Forbidden";
pub const ROUTE_NOT_FOUND: &str = "Route Not Found";

/// Every failure a request can end in. `into_response` is the single place
/// that turns one into a status and body.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Field validation or uniqueness messages, surfaced identically.
    #[error("request failed validation: {}", .0.join("; "))]
    Validation(Vec<String>),

    #[error("authentication failed: {0}")]
    Unauthenticated(AuthFailure),

    #[error("authorization failed: {0}")]
    Forbidden(#[from] Forbidden),

    #[error("record not found")]
    NotFound,

    #[error("no route matches the request")]
    RouteNotFound,

    /// Anything the pipeline does not classify. Rendered with its own status
    /// (500 unless the failure carries one) and its message.
    #[error("{message}")]
    Unclassified {
        status: StatusCode,
        message: String,
        cause: Option<anyhow::Error>,
    },
}

impl ApiError {
    pub fn unclassified(source: impl Into<anyhow::Error>) -> Self {
        let cause = source.into();
        ApiError::Unclassified {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: cause.to_string(),
            cause: Some(cause),
        }
    }

    pub fn with_status(status: StatusCode, message: impl Into<String>) -> Self {
        ApiError::Unclassified {
            status,
            message: message.into(),
            cause: None,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound | ApiError::RouteNotFound => StatusCode::NOT_FOUND,
            ApiError::Unclassified { status, .. } => *status,
        }
    }

    /// Client-facing body. `None` means an empty body.
    pub fn to_json(&self) -> Option<Value> {
        match self {
            ApiError::Validation(errors) => Some(json!({ "errors": errors })),
            ApiError::Unauthenticated(_) => Some(json!({ "message": ACCESS_DENIED })),
            ApiError::Forbidden(_) => Some(json!({ "message": FORBIDDEN })),
            ApiError::NotFound => None,
            ApiError::RouteNotFound => Some(json!({ "message": ROUTE_NOT_FOUND })),
            ApiError::Unclassified { message, .. } => {
                Some(json!({ "message": message, "error": {} }))
            }
        }
    }

    fn log(&self) {
        match self {
            ApiError::Unauthenticated(reason) => {
                tracing::warn!(%reason, "rejected credentials");
            }
            ApiError::Forbidden(forbidden) => {
                tracing::warn!(caller = forbidden.caller, owner = forbidden.owner, "ownership check failed");
            }
            ApiError::Unclassified { status, message, cause } => {
                if config::config().api.enable_global_error_logging {
                    match cause {
                        Some(cause) => {
                            tracing::error!(%status, "Global error handler: {:?}", cause)
                        }
                        None => tracing::error!(%status, "Global error handler: {}", message),
                    }
                }
            }
            ApiError::Validation(_) | ApiError::NotFound | ApiError::RouteNotFound => {}
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Validation(errors) | StoreError::Uniqueness(errors) => {
                ApiError::Validation(errors)
            }
            StoreError::Unclassified(source) => ApiError::unclassified(source),
        }
    }
}

impl From<CredentialError> for ApiError {
    fn from(err: CredentialError) -> Self {
        match err {
            CredentialError::Rejected(reason) => ApiError::Unauthenticated(reason),
            CredentialError::Store(store) => store.into(),
        }
    }
}

// Malformed request bodies keep the status axum assigned (400, 415, 422).
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::with_status(rejection.status(), rejection.body_text())
    }
}

// An id that is not a number cannot name an existing record.
impl From<PathRejection> for ApiError {
    fn from(_: PathRejection) -> Self {
        ApiError::NotFound
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        self.log();
        let status = self.status_code();
        match self.to_json() {
            Some(body) => (status, Json(body)).into_response(),
            None => status.into_response(),
        }
    }
}
