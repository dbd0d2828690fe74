use axum::routing::{get, post};
use axum::Router;

use crate::state::AppState;

pub mod filters;
pub mod images;
pub mod sessions;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/filters/list", get(filters::list_filters))
        .route(
            "/api/sessions/list",
            get(sessions::list_sessions).post(sessions::list_sessions),
        )
        .route("/api/images/upload", post(images::upload_image))
        .route("/api/images/process", post(images::process_images))
        .route("/api/images/return", post(images::return_image))
        .with_state(state)
}
