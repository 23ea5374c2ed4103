use std::error::Error as _;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use brainflip_core::ServiceError;

/// Message for failures that carry no message of their own.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    NotFound(String),
    /// A failure that declares its own status, e.g. an extractor rejection.
    Rejected { status: StatusCode, message: String },
    /// Server fault. `message` goes to the client, `cause` only to the logs.
    Internal {
        message: String,
        cause: Option<String>,
    },
}

/// Underlying cause of a failed request, attached to the response extensions
/// for the error reporting middleware.
#[derive(Debug, Clone)]
pub struct ErrorCause(pub String);

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BadRequest(m)
            | Self::NotFound(m)
            | Self::Rejected { message: m, .. }
            | Self::Internal { message: m, .. } => write!(f, "{m}"),
        }
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Rejected { status, .. } => *status,
            Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (message, cause) = match self {
            Self::BadRequest(m) | Self::NotFound(m) => (m, None),
            Self::Rejected { message, .. } => (message, None),
            Self::Internal { message, cause } => (message, cause),
        };
        let message = if message.is_empty() {
            INTERNAL_ERROR_MESSAGE.to_string()
        } else {
            message
        };

        let mut response = (status, Json(serde_json::json!({ "error": message }))).into_response();
        if let Some(cause) = cause {
            response.extensions_mut().insert(ErrorCause(cause));
        }
        response
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        if err.is_client_error() {
            return Self::BadRequest(err.to_string());
        }
        Self::Internal {
            message: err.to_string(),
            cause: err.source().map(ToString::to_string),
        }
    }
}

/// A store task that panicked or was cancelled on the blocking pool.
impl From<tokio::task::JoinError> for AppError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::Internal {
            message: INTERNAL_ERROR_MESSAGE.to_string(),
            cause: Some(format!("store task failed: {err}")),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Rejected {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}
