//! Webhook settings endpoints.
//!
//! Settings are read and written in their stored form: `${VAR}` references
//! stay unresolved, so secrets kept in the environment never leave it.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;

use hookmark_core::WebhookConfig;

use crate::error::ApiError;
use crate::state::AppState;

pub async fn get_settings(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.settings.stored())
}

/// Replace the settings. Events already in flight keep the snapshot they
/// started with.
pub async fn put_settings(
    State(state): State<AppState>,
    body: Result<Json<WebhookConfig>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(body) = body?;
    state.settings.set(body)?;
    Ok(Json(state.settings.stored()))
}
