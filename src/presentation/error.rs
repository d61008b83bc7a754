use crate::domain::enums::UnknownCode;
use crate::domain::error::DomainError;
use crate::domain::validation::ValidationErrors;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use chrono::Local;
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};

const INTERNAL_MESSAGE: &str = "An unexpected error occurred";

#[derive(Serialize)]
struct ErrorResponse {
    timestamp: String,
    status: u16,
    error: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<ValidationErrors>,
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Validation failed")]
    Validation(ValidationErrors),
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn unauthenticated() -> Self {
        ApiError::Unauthorized("Authentication required".to_string())
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();

        let message = match self {
            ApiError::Internal(detail) => {
                error!(error = %detail, status = %status, "Internal error");
                INTERNAL_MESSAGE.to_string()
            }
            ApiError::Validation(errors) => {
                warn!(fields = ?errors.fields().keys().collect::<Vec<_>>(), status = %status, "Validation error");
                self.to_string()
            }
            other => {
                warn!(error = %other, status = %status, "Request rejected");
                other.to_string()
            }
        };

        let errors = match self {
            ApiError::Validation(errors) => Some(errors.clone()),
            _ => None,
        };

        HttpResponse::build(status).json(ErrorResponse {
            timestamp: Local::now().naive_local().to_string(),
            status: status.as_u16(),
            error: status.canonical_reason().unwrap_or("Error").to_string(),
            message,
            errors,
        })
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::NotFound(msg) => ApiError::NotFound(msg),
            DomainError::EmailAlreadyExists(email) => {
                ApiError::Conflict(format!("Email already registered: {}", email))
            }
            DomainError::InvalidCredentials => {
                ApiError::Unauthorized("Invalid email or password".to_string())
            }
            DomainError::Validation(errors) => ApiError::Validation(errors),
            DomainError::InvalidArgument(msg) => ApiError::BadRequest(msg),
            DomainError::Unauthorized(msg) => ApiError::Unauthorized(msg),
            DomainError::Internal(msg) => ApiError::Internal(msg),
        }
    }
}

impl From<UnknownCode> for ApiError {
    fn from(err: UnknownCode) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast::<DomainError>() {
            Ok(domain) => domain.into(),
            Err(other) => ApiError::Internal(format!("{:#}", other)),
        }
    }
}
