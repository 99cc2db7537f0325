//! Translation of domain errors into HTTP responses with an `ErrorResponse` body.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use log::{error, warn};
use shared::{ErrorResponse, FieldErrorDto};

use crate::domain::auth::AuthError;
use crate::domain::models::CollectionError;
use crate::domain::notification::NotificationError;

pub fn status_for(e: &CollectionError) -> StatusCode {
    match e {
        CollectionError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        CollectionError::NotFound { .. } => StatusCode::NOT_FOUND,
        CollectionError::InvalidTransition { .. } | CollectionError::SlotUnavailable { .. } => StatusCode::CONFLICT,
        CollectionError::Notification(NotificationError::InvalidPhone(_)) => StatusCode::UNPROCESSABLE_ENTITY,
        CollectionError::Notification(_) | CollectionError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Response for a failed domain call; `context` names the operation in the log
pub fn error_response(context: &str, e: CollectionError) -> Response {
    let status = status_for(&e);
    if status.is_server_error() {
        error!("Failed to {}: {}", context, e);
    } else {
        warn!("Could not {}: {}", context, e);
    }

    let body = match &e {
        CollectionError::Validation(errors) => ErrorResponse {
            error: "Validation failed".to_string(),
            fields: errors
                .errors()
                .iter()
                .map(|f| FieldErrorDto {
                    field: f.field.to_string(),
                    message: f.message.clone(),
                })
                .collect(),
        },
        CollectionError::Storage(_) => ErrorResponse {
            error: "Internal storage error".to_string(),
            fields: Vec::new(),
        },
        other => ErrorResponse {
            error: other.to_string(),
            fields: Vec::new(),
        },
    };
    (status, Json(body)).into_response()
}

pub fn auth_error_response(e: AuthError) -> Response {
    let status = match e {
        AuthError::PasswordHash(_) | AuthError::Token(_) => StatusCode::INTERNAL_SERVER_ERROR,
        AuthError::InvalidCredentials | AuthError::LoginDisabled | AuthError::Unauthenticated => {
            StatusCode::UNAUTHORIZED
        }
    };
    if status.is_server_error() {
        error!("Authentication failure: {}", e);
    }
    let body = ErrorResponse {
        error: e.to_string(),
        fields: Vec::new(),
    };
    (status, Json(body)).into_response()
}
