//! # REST API for Offers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use log::info;
use shared::{OfferForm, OfferListResponse};

use super::error::error_response;
use crate::AppState;

/// Admin routes, nested under `/api/admin/offers`
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_offers).post(create_offer))
        .route("/:id", get(get_offer).put(update_offer))
        .route("/:id/toggle", post(toggle_offer))
        .route("/:id/delete", post(request_delete))
        .route("/delete/confirm", post(confirm_delete))
        .route("/delete/cancel", post(cancel_delete))
}

/// Public listing: active offers only
pub async fn list_active_offers(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/offers");
    match state.offers.list_active().await {
        Ok(offers) => (StatusCode::OK, Json(OfferListResponse { offers })).into_response(),
        Err(e) => error_response("list active offers", e),
    }
}

pub async fn list_offers(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/admin/offers");
    match state.offers.list().await {
        Ok(offers) => (StatusCode::OK, Json(OfferListResponse { offers })).into_response(),
        Err(e) => error_response("list offers", e),
    }
}

pub async fn get_offer(State(state): State<AppState>, Path(id): Path<String>) -> impl IntoResponse {
    info!("GET /api/admin/offers/{}", id);
    match state.offers.get(&id).await {
        Ok(offer) => (StatusCode::OK, Json(offer)).into_response(),
        Err(e) => error_response("get offer", e),
    }
}

pub async fn create_offer(State(state): State<AppState>, Json(form): Json<OfferForm>) -> impl IntoResponse {
    info!("POST /api/admin/offers - request: {:?}", form);
    match state.offers.create(form).await {
        Ok(response) => (StatusCode::CREATED, Json(response)).into_response(),
        Err(e) => error_response("create offer", e),
    }
}

pub async fn update_offer(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(form): Json<OfferForm>,
) -> impl IntoResponse {
    info!("PUT /api/admin/offers/{} - request: {:?}", id, form);
    match state.offers.update(&id, form).await {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(e) => error_response("update offer", e),
    }
}

pub async fn toggle_offer(State(state): State<AppState>, Path(id): Path<String>) -> impl IntoResponse {
    info!("POST /api/admin/offers/{}/toggle", id);
    match state.offers.toggle_active(&id).await {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(e) => error_response("toggle offer", e),
    }
}

pub async fn request_delete(State(state): State<AppState>, Path(id): Path<String>) -> impl IntoResponse {
    info!("POST /api/admin/offers/{}/delete", id);
    match state.offers.request_delete(&id).await {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(e) => error_response("request offer delete", e),
    }
}

pub async fn confirm_delete(State(state): State<AppState>) -> impl IntoResponse {
    info!("POST /api/admin/offers/delete/confirm");
    match state.offers.confirm_delete().await {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(e) => error_response("delete offer", e),
    }
}

pub async fn cancel_delete(State(state): State<AppState>) -> impl IntoResponse {
    info!("POST /api/admin/offers/delete/cancel");
    (StatusCode::OK, Json(state.offers.cancel_delete()))
}
