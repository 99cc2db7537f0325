use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use log::info;
use shared::NotificationListResponse;

use crate::AppState;

/// Composed messaging links, oldest first, for the admin to open
pub async fn list_notifications(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/admin/notifications");
    let notifications = state.outbox.list();
    (StatusCode::OK, Json(NotificationListResponse { notifications }))
}
