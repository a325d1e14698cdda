use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Service status, version and the task handlers available to workflows.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "copilot-api",
        "handlers": state.orchestrator.handler_names(),
        "plans": state.orchestrator.plan_count().await
    }))
}
