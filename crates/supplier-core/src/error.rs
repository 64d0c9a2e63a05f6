//! Domain errors

use thiserror::Error;
use uuid::Uuid;

use crate::domain::IdentityFailure;
use crate::validation::ValidationErrors;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Supplier not found: {0}")]
    SupplierNotFound(Uuid),

    #[error("Supplier already exists: {0}")]
    SupplierAlreadyExists(Uuid),

    #[error("Validation error: {0}")]
    Validation(ValidationErrors),

    #[error("Persistence failed: {0}")]
    PersistenceFailed(String),

    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("Email already exists: {0}")]
    EmailAlreadyExists(String),

    #[error("Registration failed")]
    RegistrationFailed(Vec<IdentityFailure>),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("User locked out")]
    LockedOut,

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: policy '{0}' not satisfied")]
    Forbidden(String),

    #[error("Password hash error: {0}")]
    PasswordHashError(String),

    #[error("Token generation error: {0}")]
    TokenGenerationError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl From<ValidationErrors> for DomainError {
    fn from(errors: ValidationErrors) -> Self {
        DomainError::Validation(errors)
    }
}

impl From<validator::ValidationErrors> for DomainError {
    fn from(errors: validator::ValidationErrors) -> Self {
        DomainError::Validation(errors.into())
    }
}
