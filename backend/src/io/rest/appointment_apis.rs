//! # REST API for Appointment Management
//!
//! The admin appointment table: filtered and grouped listings, edits, status
//! changes, on-demand client messages and the two-phase delete.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post, put},
    Router,
};
use log::info;
use shared::{
    AppointmentForm, AppointmentListResponse, AppointmentQuery, AppointmentStatusRequest,
    GroupedAppointmentsResponse,
};

use super::error::error_response;
use crate::domain::collection::FilterSet;
use crate::AppState;

/// Admin routes, nested under `/api/admin/appointments`
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_appointments).post(create_appointment))
        .route("/grouped", get(list_grouped))
        .route("/:id", get(get_appointment).put(update_appointment))
        .route("/:id/status", put(set_status))
        .route("/:id/reminder", post(send_reminder))
        .route("/:id/confirmation", post(send_confirmation))
        .route("/:id/delete", post(request_delete))
        .route("/delete/confirm", post(confirm_delete))
        .route("/delete/cancel", post(cancel_delete))
}

fn filters(query: AppointmentQuery) -> FilterSet {
    FilterSet::from_parts(query.date, query.service.filter(|s| !s.trim().is_empty()))
}

pub async fn list_appointments(
    State(state): State<AppState>,
    Query(query): Query<AppointmentQuery>,
) -> impl IntoResponse {
    info!("GET /api/admin/appointments - query: {:?}", query);
    match state.appointments.list(&filters(query)).await {
        Ok(appointments) => (StatusCode::OK, Json(AppointmentListResponse { appointments })).into_response(),
        Err(e) => error_response("list appointments", e),
    }
}

pub async fn list_grouped(
    State(state): State<AppState>,
    Query(query): Query<AppointmentQuery>,
) -> impl IntoResponse {
    info!("GET /api/admin/appointments/grouped - query: {:?}", query);
    match state.appointments.grouped(&filters(query)).await {
        Ok(groups) => (StatusCode::OK, Json(GroupedAppointmentsResponse { groups })).into_response(),
        Err(e) => error_response("group appointments", e),
    }
}

pub async fn get_appointment(State(state): State<AppState>, Path(id): Path<String>) -> impl IntoResponse {
    info!("GET /api/admin/appointments/{}", id);
    match state.appointments.get(&id).await {
        Ok(appointment) => (StatusCode::OK, Json(appointment)).into_response(),
        Err(e) => error_response("get appointment", e),
    }
}

pub async fn create_appointment(
    State(state): State<AppState>,
    Json(form): Json<AppointmentForm>,
) -> impl IntoResponse {
    info!("POST /api/admin/appointments - request: {:?}", form);
    match state.appointments.create(form).await {
        Ok(response) => (StatusCode::CREATED, Json(response)).into_response(),
        Err(e) => error_response("create appointment", e),
    }
}

pub async fn update_appointment(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(form): Json<AppointmentForm>,
) -> impl IntoResponse {
    info!("PUT /api/admin/appointments/{} - request: {:?}", id, form);
    match state.appointments.update(&id, form).await {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(e) => error_response("update appointment", e),
    }
}

pub async fn set_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<AppointmentStatusRequest>,
) -> impl IntoResponse {
    info!("PUT /api/admin/appointments/{}/status - {}", id, request.status);
    match state.appointments.set_status(&id, request.status).await {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(e) => error_response("change appointment status", e),
    }
}

pub async fn send_reminder(State(state): State<AppState>, Path(id): Path<String>) -> impl IntoResponse {
    info!("POST /api/admin/appointments/{}/reminder", id);
    match state.appointments.reminder_link(&id).await {
        Ok(link) => (StatusCode::OK, Json(link)).into_response(),
        Err(e) => error_response("compose reminder", e),
    }
}

pub async fn send_confirmation(State(state): State<AppState>, Path(id): Path<String>) -> impl IntoResponse {
    info!("POST /api/admin/appointments/{}/confirmation", id);
    match state.appointments.confirmation_link(&id).await {
        Ok(link) => (StatusCode::OK, Json(link)).into_response(),
        Err(e) => error_response("compose confirmation", e),
    }
}

pub async fn request_delete(State(state): State<AppState>, Path(id): Path<String>) -> impl IntoResponse {
    info!("POST /api/admin/appointments/{}/delete", id);
    match state.appointments.request_delete(&id).await {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(e) => error_response("request appointment delete", e),
    }
}

pub async fn confirm_delete(State(state): State<AppState>) -> impl IntoResponse {
    info!("POST /api/admin/appointments/delete/confirm");
    match state.appointments.confirm_delete().await {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(e) => error_response("delete appointment", e),
    }
}

pub async fn cancel_delete(State(state): State<AppState>) -> impl IntoResponse {
    info!("POST /api/admin/appointments/delete/cancel");
    (StatusCode::OK, Json(state.appointments.cancel_delete()))
}
