//! # hookmark-api
//!
//! HTTP host for the hookmark pipeline: exposes the bookmark tree and the
//! webhook settings, and runs the listener that turns tree mutations into
//! webhook deliveries.

pub mod config;
pub mod error;
pub mod handlers;
pub mod state;

use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use handlers::{bookmarks, settings, system};

pub use config::ServerConfig;
pub use error::ApiError;
pub use state::AppState;

/// Build the router over `state`.
pub fn router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(system::health_check))
        // Bookmark tree
        .route("/api/v1/bookmarks", post(bookmarks::create_bookmark))
        .route(
            "/api/v1/bookmarks/:id",
            get(bookmarks::get_bookmark)
                .patch(bookmarks::update_bookmark)
                .delete(bookmarks::delete_bookmark),
        )
        .route("/api/v1/bookmarks/:id/children", get(bookmarks::get_children))
        .route("/api/v1/bookmarks/:id/move", post(bookmarks::move_bookmark))
        // Webhook settings
        .route(
            "/api/v1/settings",
            get(settings::get_settings).put(settings::put_settings),
        )
        // Alerts
        .route("/api/v1/notifications", get(system::list_notifications))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
