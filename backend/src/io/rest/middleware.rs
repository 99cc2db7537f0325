use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use log::{debug, warn};

use super::error::auth_error_response;
use crate::domain::auth::{AuthError, AuthOutcome};
use crate::AppState;

fn bearer_token(request: &Request) -> Option<&str> {
    request
        .headers()
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Admin routes require a bearer token accepted by the auth gate. The
/// verified `Session` is handed to handlers as a request extension.
pub async fn require_admin(State(state): State<AppState>, mut request: Request, next: Next) -> Response {
    let outcome = match bearer_token(&request) {
        Some(token) => state.auth_gate.verify(token),
        None => AuthOutcome::Unauthenticated,
    };

    match outcome {
        AuthOutcome::Authenticated(session) => {
            debug!("{} {} as {}", request.method(), request.uri().path(), session.username);
            request.extensions_mut().insert(session);
            next.run(request).await
        }
        AuthOutcome::Unauthenticated => {
            warn!("Unauthenticated {} {}", request.method(), request.uri().path());
            auth_error_response(AuthError::Unauthenticated)
        }
    }
}
