//! # REST API for Public Bookings

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use log::info;
use shared::{BookingRequest, SlotListResponse, SlotQuery};

use super::error::error_response;
use crate::AppState;

/// Book an appointment from the public booking form
pub async fn create_booking(State(state): State<AppState>, Json(request): Json<BookingRequest>) -> impl IntoResponse {
    info!(
        "POST /api/bookings - service: {}, date: {}, slot: {}",
        request.service, request.date, request.time_slot
    );
    match state.appointments.book(request).await {
        Ok(response) => (StatusCode::CREATED, Json(response)).into_response(),
        Err(e) => error_response("book appointment", e),
    }
}

/// Every slot on a day with its availability
pub async fn list_slots(State(state): State<AppState>, Query(query): Query<SlotQuery>) -> impl IntoResponse {
    info!("GET /api/bookings/slots - date: {}", query.date);
    match state.appointments.available_slots(query.date).await {
        Ok(slots) => {
            let response = SlotListResponse { date: query.date, slots };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => error_response("list slots", e),
    }
}
