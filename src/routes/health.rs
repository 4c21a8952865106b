use axum::{Json, extract::State, http::StatusCode};
use serde_json::{Value, json};

use crate::{AppState, database};

pub async fn health_check() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// 503 until the database answers `SELECT 1`.
pub async fn readiness_check(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    match database::check_health(&state.db).await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "status": "ready",
                "database": "connected",
                "connections": state.db.size(),
            })),
        ),
        Err(e) => {
            tracing::warn!("Readiness check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "unavailable",
                    "database": "unreachable",
                })),
            )
        }
    }
}
