use crate::domain::validation::ValidationErrors;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("{0}")]
    NotFound(String),
    #[error("Email already registered: {0}")]
    EmailAlreadyExists(String),
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Validation failed")]
    Validation(ValidationErrors),
    #[error("{0}")]
    InvalidArgument(String),
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn not_found(resource: &str, id: impl std::fmt::Display) -> Self {
        DomainError::NotFound(format!("{} not found: {}", resource, id))
    }
}
