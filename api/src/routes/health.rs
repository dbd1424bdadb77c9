use axum::{Router, extract::State, routing::get};
use db::Backend;
use serde::Serialize;

use crate::response::{ApiResult, ok};
use crate::state::AppState;

/// Builds the `/health` route group.
pub fn health_routes() -> Router<AppState> {
    Router::new().route("/", get(health_check))
}

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub backend: Backend,
}

/// GET /health
///
/// Reports that the API is running and which backend a request arriving now
/// would be served by.
///
/// ### Response
/// - `200 OK`
///
/// ```json
/// {
///   "success": true,
///   "data": { "status": "OK", "backend": "primary" },
///   "message": "Health check passed"
/// }
/// ```
async fn health_check(State(app_state): State<AppState>) -> ApiResult<HealthStatus> {
    let backend = app_state.backend().await;
    ok(
        HealthStatus {
            status: "OK",
            backend,
        },
        "Health check passed",
    )
}
