//! Bookmark tree endpoints. Every mutation here is reported to the webhook
//! pipeline by the store.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use hookmark_store::{CreateBookmarkRequest, MoveBookmarkRequest, UpdateBookmarkRequest};

use crate::error::ApiError;
use crate::state::AppState;

pub async fn get_bookmark(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let node = state.store.fetch(&id).await?;
    Ok(Json(node))
}

pub async fn get_children(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let children = state.store.children(&id).await?;
    Ok(Json(children))
}

pub async fn create_bookmark(
    State(state): State<AppState>,
    body: Result<Json<CreateBookmarkRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(body) = body?;
    let node = state.store.create(body).await?;
    Ok((StatusCode::CREATED, Json(node)))
}

pub async fn update_bookmark(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<UpdateBookmarkRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(body) = body?;
    let node = state.store.update(&id, body).await?;
    Ok(Json(node))
}

pub async fn delete_bookmark(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    state.store.remove(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn move_bookmark(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<MoveBookmarkRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(body) = body?;
    let node = state.store.move_node(&id, body).await?;
    Ok(Json(node))
}
