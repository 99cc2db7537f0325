//! # REST API for Reviews
//!
//! Public submissions and the approved listing, plus the admin moderation grid.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post, put},
    Router,
};
use log::info;
use shared::{ReviewForm, ReviewListQuery, ReviewListResponse, ReviewStatusRequest};

use super::error::error_response;
use crate::AppState;

/// Admin routes, nested under `/api/admin/reviews`
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_reviews).post(create_review))
        .route("/:id", get(get_review).put(update_review))
        .route("/:id/status", put(set_status))
        .route("/:id/delete", post(request_delete))
        .route("/delete/confirm", post(confirm_delete))
        .route("/delete/cancel", post(cancel_delete))
}

pub async fn list_approved_reviews(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/reviews");
    match state.reviews.list_approved().await {
        Ok(reviews) => (StatusCode::OK, Json(ReviewListResponse { reviews })).into_response(),
        Err(e) => error_response("list approved reviews", e),
    }
}

/// Public review form
pub async fn submit_review(State(state): State<AppState>, Json(form): Json<ReviewForm>) -> impl IntoResponse {
    info!("POST /api/reviews - author: {}", form.author_name);
    match state.reviews.submit(form).await {
        Ok(response) => (StatusCode::CREATED, Json(response)).into_response(),
        Err(e) => error_response("submit review", e),
    }
}

pub async fn list_reviews(State(state): State<AppState>, Query(query): Query<ReviewListQuery>) -> impl IntoResponse {
    info!("GET /api/admin/reviews - query: {:?}", query);
    match state.reviews.list(query.view.unwrap_or_default()).await {
        Ok(reviews) => (StatusCode::OK, Json(ReviewListResponse { reviews })).into_response(),
        Err(e) => error_response("list reviews", e),
    }
}

pub async fn get_review(State(state): State<AppState>, Path(id): Path<String>) -> impl IntoResponse {
    info!("GET /api/admin/reviews/{}", id);
    match state.reviews.get(&id).await {
        Ok(review) => (StatusCode::OK, Json(review)).into_response(),
        Err(e) => error_response("get review", e),
    }
}

pub async fn create_review(State(state): State<AppState>, Json(form): Json<ReviewForm>) -> impl IntoResponse {
    info!("POST /api/admin/reviews - request: {:?}", form);
    match state.reviews.create(form).await {
        Ok(response) => (StatusCode::CREATED, Json(response)).into_response(),
        Err(e) => error_response("create review", e),
    }
}

pub async fn update_review(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(form): Json<ReviewForm>,
) -> impl IntoResponse {
    info!("PUT /api/admin/reviews/{} - request: {:?}", id, form);
    match state.reviews.update(&id, form).await {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(e) => error_response("update review", e),
    }
}

pub async fn set_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<ReviewStatusRequest>,
) -> impl IntoResponse {
    info!("PUT /api/admin/reviews/{}/status - {}", id, request.status);
    match state.reviews.set_status(&id, request.status).await {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(e) => error_response("change review status", e),
    }
}

pub async fn request_delete(State(state): State<AppState>, Path(id): Path<String>) -> impl IntoResponse {
    info!("POST /api/admin/reviews/{}/delete", id);
    match state.reviews.request_delete(&id).await {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(e) => error_response("request review delete", e),
    }
}

pub async fn confirm_delete(State(state): State<AppState>) -> impl IntoResponse {
    info!("POST /api/admin/reviews/delete/confirm");
    match state.reviews.confirm_delete().await {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(e) => error_response("delete review", e),
    }
}

pub async fn cancel_delete(State(state): State<AppState>) -> impl IntoResponse {
    info!("POST /api/admin/reviews/delete/cancel");
    (StatusCode::OK, Json(state.reviews.cancel_delete()))
}
