//! # REST API for the Service Catalogue

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use log::info;
use shared::{ServiceForm, ServiceListResponse};

use super::error::error_response;
use crate::AppState;

/// Admin routes, nested under `/api/admin/services`
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_services).post(create_service))
        .route("/:id", get(get_service).put(update_service))
        .route("/:id/delete", post(request_delete))
        .route("/delete/confirm", post(confirm_delete))
        .route("/delete/cancel", post(cancel_delete))
}

/// Public and admin catalogue listing
pub async fn list_services(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET services");
    match state.catalog.list().await {
        Ok(services) => (StatusCode::OK, Json(ServiceListResponse { services })).into_response(),
        Err(e) => error_response("list services", e),
    }
}

pub async fn get_service(State(state): State<AppState>, Path(id): Path<String>) -> impl IntoResponse {
    info!("GET /api/admin/services/{}", id);
    match state.catalog.get(&id).await {
        Ok(service) => (StatusCode::OK, Json(service)).into_response(),
        Err(e) => error_response("get service", e),
    }
}

pub async fn create_service(State(state): State<AppState>, Json(form): Json<ServiceForm>) -> impl IntoResponse {
    info!("POST /api/admin/services - request: {:?}", form);
    match state.catalog.create(form).await {
        Ok(response) => (StatusCode::CREATED, Json(response)).into_response(),
        Err(e) => error_response("create service", e),
    }
}

pub async fn update_service(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(form): Json<ServiceForm>,
) -> impl IntoResponse {
    info!("PUT /api/admin/services/{} - request: {:?}", id, form);
    match state.catalog.update(&id, form).await {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(e) => error_response("update service", e),
    }
}

pub async fn request_delete(State(state): State<AppState>, Path(id): Path<String>) -> impl IntoResponse {
    info!("POST /api/admin/services/{}/delete", id);
    match state.catalog.request_delete(&id).await {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(e) => error_response("request service delete", e),
    }
}

pub async fn confirm_delete(State(state): State<AppState>) -> impl IntoResponse {
    info!("POST /api/admin/services/delete/confirm");
    match state.catalog.confirm_delete().await {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(e) => error_response("delete service", e),
    }
}

pub async fn cancel_delete(State(state): State<AppState>) -> impl IntoResponse {
    info!("POST /api/admin/services/delete/cancel");
    (StatusCode::OK, Json(state.catalog.cancel_delete()))
}
