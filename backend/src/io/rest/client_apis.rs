//! # REST API for Clients

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use log::info;
use shared::ClientListResponse;

use super::error::error_response;
use crate::AppState;

/// Admin routes, nested under `/api/admin/clients`
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_clients))
        .route("/:id", get(get_client))
}

/// Every client with visit aggregates derived from the appointments
pub async fn list_clients(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/admin/clients");
    match state.clients.list_summaries().await {
        Ok(clients) => (StatusCode::OK, Json(ClientListResponse { clients })).into_response(),
        Err(e) => error_response("list clients", e),
    }
}

pub async fn get_client(State(state): State<AppState>, Path(id): Path<String>) -> impl IntoResponse {
    info!("GET /api/admin/clients/{}", id);
    match state.clients.summary(&id).await {
        Ok(summary) => (StatusCode::OK, Json(summary)).into_response(),
        Err(e) => error_response("get client", e),
    }
}
