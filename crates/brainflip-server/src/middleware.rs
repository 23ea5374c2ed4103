use std::any::Any;

use axum::extract::{OriginalUri, Request};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::error::{AppError, ErrorCause, INTERNAL_ERROR_MESSAGE};

/// Logs every incoming request.
pub async fn log_requests(request: Request, next: Next) -> Response {
    tracing::info!(method = %request.method(), path = %request.uri(), "Request");
    next.run(request).await
}

/// Last-resort error reporting. Server faults are logged with method, path
/// and cause; client errors only at debug level.
pub async fn report_errors(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().clone();
    let response = next.run(request).await;

    let status = response.status();
    if status.is_server_error() {
        let cause = response
            .extensions()
            .get::<ErrorCause>()
            .map_or("unspecified", |c| c.0.as_str());
        tracing::error!(%method, %path, status = status.as_u16(), cause, "Request failed");
    } else if status.is_client_error() {
        tracing::debug!(%method, %path, status = status.as_u16(), "Client error");
    }
    response
}

/// Converts a handler panic into a JSON 500.
pub fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let details = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        (*s).to_string()
    } else {
        "unknown panic payload".to_string()
    };
    AppError::Internal {
        message: INTERNAL_ERROR_MESSAGE.to_string(),
        cause: Some(format!("panic: {details}")),
    }
    .into_response()
}

/// Fallback for unmatched requests: JSON under `/api`, plain text elsewhere.
///
/// Branches on the original URI; inside the `/api` nest the plain `Uri` has
/// the prefix stripped.
pub async fn not_found(OriginalUri(uri): OriginalUri) -> Response {
    if uri.path().starts_with("/api") {
        AppError::NotFound("Not found".to_string()).into_response()
    } else {
        (axum::http::StatusCode::NOT_FOUND, "Not found").into_response()
    }
}
