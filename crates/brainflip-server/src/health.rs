use axum::Json;
use serde::Serialize;

/// Liveness response. Deliberately independent of storage state.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// GET /health
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}
