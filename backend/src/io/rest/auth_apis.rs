//! # REST API for Admin Authentication

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use log::info;
use shared::{LoginRequest, LoginResponse, SessionResponse};

use super::error::auth_error_response;
use crate::domain::auth::Session;
use crate::AppState;

/// Exchange admin credentials for a bearer token
pub async fn login(State(state): State<AppState>, Json(request): Json<LoginRequest>) -> impl IntoResponse {
    info!("POST /api/auth/login - user: {}", request.username);

    match state.authenticator.login(&request.username, &request.password) {
        Ok((token, session)) => {
            let response = LoginResponse {
                token,
                expires_at: session.expires_at.to_rfc3339(),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => auth_error_response(e),
    }
}

/// The session behind the presented token
pub async fn session(Extension(session): Extension<Session>) -> impl IntoResponse {
    info!("GET /api/admin/session");
    let response = SessionResponse {
        username: session.username,
        expires_at: session.expires_at.to_rfc3339(),
    };
    (StatusCode::OK, Json(response))
}
