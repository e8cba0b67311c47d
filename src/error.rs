//! Error handling module
//!
//! Centralized error types and HTTP response conversion.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use uuid::Uuid;

use crate::domain::DomainError;

/// Application-wide Result type
pub type AppResult<T> = Result<T, AppError>;

/// Application error types
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // Client errors (4xx)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Validation failed")]
    Validation(String),

    #[error("Not authenticated")]
    Unauthorized,

    #[error("Inactive user")]
    InactiveUser,

    #[error("Event not found")]
    EventNotFound(Uuid),

    #[error("Registration not found")]
    RegistrationNotFound(Uuid),

    #[error("User not found")]
    UserNotFound(String),

    #[error("Item not found")]
    ItemNotFound(Uuid),

    // Domain errors
    #[error(transparent)]
    Domain(#[from] DomainError),

    // Server errors (5xx)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub error_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl AppError {
    /// HTTP status, machine-readable code and optional details
    fn parts(&self) -> (StatusCode, &'static str, Option<String>) {
        match self {
            AppError::InvalidRequest(msg) => {
                (StatusCode::BAD_REQUEST, "invalid_request", Some(msg.clone()))
            }
            AppError::Validation(msg) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "validation_error", Some(msg.clone()))
            }
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "not_authenticated", None),
            AppError::InactiveUser => (StatusCode::BAD_REQUEST, "inactive_user", None),

            AppError::EventNotFound(id) => {
                (StatusCode::NOT_FOUND, "event_not_found", Some(id.to_string()))
            }
            AppError::RegistrationNotFound(event_id) => {
                (StatusCode::NOT_FOUND, "registration_not_found", Some(event_id.to_string()))
            }
            AppError::UserNotFound(id) => {
                (StatusCode::NOT_FOUND, "user_not_found", Some(id.clone()))
            }
            AppError::ItemNotFound(id) => {
                (StatusCode::NOT_FOUND, "item_not_found", Some(id.to_string()))
            }

            AppError::Domain(domain_err) => match domain_err {
                DomainError::InvalidField { .. } => (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "validation_error",
                    Some(domain_err.to_string()),
                ),
                // 400, not 403
                DomainError::NotOrganizer
                | DomainError::NotOwner
                | DomainError::SuperuserRequired
                | DomainError::SuperuserSelfDelete => {
                    (StatusCode::BAD_REQUEST, "permission_denied", None)
                }
                DomainError::AlreadyRegistered => {
                    (StatusCode::BAD_REQUEST, "already_registered", None)
                }
                DomainError::EmailTaken => (StatusCode::BAD_REQUEST, "email_taken", None),
                DomainError::IncorrectPassword => {
                    (StatusCode::BAD_REQUEST, "incorrect_password", None)
                }
                DomainError::PasswordUnchanged => {
                    (StatusCode::BAD_REQUEST, "password_unchanged", None)
                }
            },

            // 500 Internal Server Error
            AppError::Database(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "database_error", None)
            }
            AppError::Internal(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", None)
            }
        }
    }

    pub fn status_code(&self) -> StatusCode {
        self.parts().0
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::Database(e) => tracing::error!("Database error: {:?}", e),
            AppError::Internal(msg) => tracing::error!("Internal error: {}", msg),
            _ => {}
        }

        let (status, error_code, details) = self.parts();

        // Server-side failures never leak their cause
        let error = if status.is_server_error() {
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        let body = ErrorResponse {
            error,
            error_code: error_code.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use serde_json::Value;

    async fn body_json(err: AppError) -> (StatusCode, Value) {
        let response = err.into_response();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(AppError::EventNotFound(Uuid::nil()).status_code(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::InactiveUser.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::Unauthorized.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            AppError::from(DomainError::invalid_field("title", "too long")).status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            AppError::from(DomainError::AlreadyRegistered).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::from(DomainError::NotOrganizer).status_code(),
            StatusCode::BAD_REQUEST
        );
    }

    #[tokio::test]
    async fn test_error_body() {
        let (status, json) = body_json(DomainError::AlreadyRegistered.into()).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "User is already registered for this event");
        assert_eq!(json["error_code"], "already_registered");
        assert!(json.get("details").is_none());
    }

    #[tokio::test]
    async fn test_internal_error_hides_details() {
        let (status, json) = body_json(AppError::Internal("pool exhausted".to_string())).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["error"], "Internal server error");
        assert_eq!(json["error_code"], "internal_error");
    }
}
