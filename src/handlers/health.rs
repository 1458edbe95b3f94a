use axum::{extract::State, http::StatusCode, response::Json};
use serde_json::json;

use crate::handlers::AppState;

pub async fn liveness() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

pub async fn readiness(State(state): State<AppState>) -> (StatusCode, Json<serde_json::Value>) {
    let store = state.gateway.quota().store();

    let store_status = match tokio::time::timeout(state.config.quota_store_timeout(), store.ping()).await {
        Ok(Ok(())) => "healthy",
        Ok(Err(e)) => {
            tracing::warn!("Quota store ping failed: {}", e);
            "unhealthy"
        }
        Err(_) => "unhealthy",
    };

    // An unreachable Redis degrades to in-memory counting rather than
    // taking the service down, so readiness stays 200 either way.
    let overall_status = if store_status == "healthy" { "ready" } else { "degraded" };

    (
        StatusCode::OK,
        Json(json!({
            "status": overall_status,
            "checks": {
                "quota_store": store_status
            },
            "quota_backend": store.backend(),
            "timestamp": chrono::Utc::now().to_rfc3339()
        })),
    )
}
