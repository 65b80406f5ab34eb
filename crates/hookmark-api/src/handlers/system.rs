//! Health check and the alert listing.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;

use crate::state::AppState;

pub async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Recent alerts, oldest first.
pub async fn list_notifications(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.notifications.recent())
}
