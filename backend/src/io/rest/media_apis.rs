//! # REST API for the Media Library

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, put},
    Router,
};
use log::info;
use shared::{MediaLibraryResponse, MediaUpdateRequest};

use super::error::error_response;
use crate::AppState;

/// Admin routes, nested under `/api/admin/media`
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_media_library))
        .route("/:category/:image_id", put(update_image))
}

pub async fn get_media_library(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET media library");
    match state.media.list().await {
        Ok(categories) => (StatusCode::OK, Json(MediaLibraryResponse { categories })).into_response(),
        Err(e) => error_response("read media library", e),
    }
}

pub async fn update_image(
    State(state): State<AppState>,
    Path((category, image_id)): Path<(String, String)>,
    Json(request): Json<MediaUpdateRequest>,
) -> impl IntoResponse {
    info!("PUT /api/admin/media/{}/{} - url: {}", category, image_id, request.url);
    match state.media.update_image_url(&category, &image_id, &request.url).await {
        Ok(image) => (StatusCode::OK, Json(image)).into_response(),
        Err(e) => error_response("update media image", e),
    }
}
