// ============================================================================
// Supplier API - Error Responses
// File: crates/supplier-api/src/error.rs
// ============================================================================
//! Maps domain failures onto HTTP status codes and JSON error bodies.

use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use supplier_core::{DomainError, IdentityFailure, ValidationErrors};

pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid user or password";
pub const LOCKED_OUT_MESSAGE: &str = "User locked out";

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    #[error("Registration failed")]
    Registration(Vec<IdentityFailure>),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Locked out")]
    LockedOut,

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: &'static str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<Value>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, message, errors) = match self {
            ApiError::Validation(errors) => {
                tracing::warn!("Validation failed: {}", errors);
                (
                    StatusCode::BAD_REQUEST,
                    "ValidationError",
                    "One or more validation errors occurred.".to_string(),
                    serde_json::to_value(&errors).ok(),
                )
            },
            ApiError::Registration(failures) => {
                tracing::warn!("Registration failed: {} reason(s)", failures.len());
                (
                    StatusCode::BAD_REQUEST,
                    "RegistrationFailed",
                    "The user could not be registered.".to_string(),
                    serde_json::to_value(&failures).ok(),
                )
            },
            ApiError::InvalidCredentials => {
                (StatusCode::BAD_REQUEST, "InvalidCredentials", INVALID_CREDENTIALS_MESSAGE.to_string(), None)
            },
            ApiError::LockedOut => {
                (StatusCode::BAD_REQUEST, "LockedOut", LOCKED_OUT_MESSAGE.to_string(), None)
            },
            ApiError::BadRequest(msg) => {
                tracing::warn!("Bad request: {}", msg);
                (StatusCode::BAD_REQUEST, "BadRequest", msg, None)
            },
            ApiError::Unauthorized(msg) => {
                tracing::warn!("Unauthorized: {}", msg);
                (StatusCode::UNAUTHORIZED, "Unauthorized", msg, None)
            },
            ApiError::Forbidden(msg) => {
                tracing::warn!("Forbidden: {}", msg);
                (StatusCode::FORBIDDEN, "Forbidden", msg, None)
            },
            ApiError::NotFound(msg) => {
                (StatusCode::NOT_FOUND, "NotFound", msg, None)
            },
            ApiError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "InternalError",
                    "An unexpected error occurred.".to_string(),
                    None,
                )
            },
        };

        let body = Json(ErrorResponse {
            error: error_type,
            message,
            errors,
        });

        (status, body).into_response()
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::SupplierNotFound(id) => ApiError::NotFound(format!("Supplier {} not found", id)),
            DomainError::UserNotFound(who) => ApiError::NotFound(format!("User {} not found", who)),
            DomainError::SupplierAlreadyExists(id) => {
                ApiError::BadRequest(format!("A supplier with id {} already exists", id))
            }
            DomainError::Validation(errors) => ApiError::Validation(errors),
            DomainError::PersistenceFailed(msg) => ApiError::BadRequest(msg),
            DomainError::EmailAlreadyExists(email) => {
                ApiError::Registration(vec![IdentityFailure::duplicate_email(&email)])
            }
            DomainError::RegistrationFailed(failures) => ApiError::Registration(failures),
            DomainError::InvalidCredentials => ApiError::InvalidCredentials,
            DomainError::LockedOut => ApiError::LockedOut,
            DomainError::Unauthorized(msg) => ApiError::Unauthorized(msg),
            DomainError::Forbidden(policy) => {
                ApiError::Forbidden(format!("Policy '{}' is not satisfied", policy))
            }
            err @ (DomainError::PasswordHashError(_)
            | DomainError::TokenGenerationError(_)
            | DomainError::DatabaseError(_)
            | DomainError::InternalError(_)) => ApiError::InternalError(err.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}
