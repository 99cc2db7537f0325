//! # REST API Interface Layer
//!
//! HTTP endpoints for the public site and the admin dashboard.
//!
//! - **Public** (`/api/...`): catalogue, active offers, approved reviews,
//!   review submission, bookings and slot availability, media library, login
//! - **Admin** (`/api/admin/...`): every collection screen, behind the bearer
//!   token middleware in [`middleware`]
//!
//! Domain errors are translated in [`error`]: validation 422, missing records
//! 404, status and slot conflicts 409, authentication 401, storage 500.

pub mod appointment_apis;
pub mod auth_apis;
pub mod booking_apis;
pub mod client_apis;
pub mod dashboard_apis;
pub mod error;
pub mod media_apis;
pub mod middleware;
pub mod notification_apis;
pub mod offer_apis;
pub mod review_apis;
pub mod service_apis;
pub mod settings_apis;

use axum::{
    routing::{get, post},
    Router,
};

use crate::AppState;

/// Routes the public site calls without a session
pub fn public_router() -> Router<AppState> {
    Router::new()
        .route("/services", get(service_apis::list_services))
        .route("/offers", get(offer_apis::list_active_offers))
        .route(
            "/reviews",
            get(review_apis::list_approved_reviews).post(review_apis::submit_review),
        )
        .route("/bookings", post(booking_apis::create_booking))
        .route("/bookings/slots", get(booking_apis::list_slots))
        .route("/media", get(media_apis::get_media_library))
        .route("/auth/login", post(auth_apis::login))
}

/// Admin dashboard routes; the caller adds the auth layer
pub fn admin_router() -> Router<AppState> {
    Router::new()
        .route("/session", get(auth_apis::session))
        .nest("/services", service_apis::router())
        .nest("/appointments", appointment_apis::router())
        .nest("/clients", client_apis::router())
        .nest("/offers", offer_apis::router())
        .nest("/reviews", review_apis::router())
        .route(
            "/settings",
            get(settings_apis::get_settings).put(settings_apis::update_settings),
        )
        .nest("/media", media_apis::router())
        .route("/dashboard", get(dashboard_apis::get_overview))
        .route("/notifications", get(notification_apis::list_notifications))
}
