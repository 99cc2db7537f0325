use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use log::info;
use shared::SalonSettings;

use super::error::error_response;
use crate::AppState;

pub async fn get_settings(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/admin/settings");
    match state.settings.get().await {
        Ok(settings) => (StatusCode::OK, Json(settings)).into_response(),
        Err(e) => error_response("read settings", e),
    }
}

pub async fn update_settings(
    State(state): State<AppState>,
    Json(settings): Json<SalonSettings>,
) -> impl IntoResponse {
    info!("PUT /api/admin/settings - request: {:?}", settings);
    match state.settings.update(settings).await {
        Ok(settings) => (StatusCode::OK, Json(settings)).into_response(),
        Err(e) => error_response("update settings", e),
    }
}
