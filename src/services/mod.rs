use thiserror::Error;

use crate::repository::RepositoryError;

pub mod catalog;
pub mod categories;
pub mod dashboard;
pub mod orders;
pub mod products;

/// Result type returned by the service layer.
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Errors surfaced by services to the HTTP layer.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The user lacks the role required by the operation.
    #[error("unauthorized")]
    Unauthorized,
    /// The request body failed validation.
    #[error("{0}")]
    Form(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    /// The request is well formed but breaks a business rule.
    #[error("{0}")]
    InvalidRequest(String),
    /// Infrastructure failure in the data access layer.
    #[error(transparent)]
    Repository(RepositoryError),
}

impl ServiceError {
    /// Diagnostic code of infrastructure failures.
    pub fn diagnostic_code(&self) -> Option<&'static str> {
        match self {
            Self::Repository(err) => err.diagnostic_code(),
            _ => None,
        }
    }
}

impl From<RepositoryError> for ServiceError {
    fn from(value: RepositoryError) -> Self {
        match value {
            RepositoryError::NotFound => Self::NotFound("record not found".to_string()),
            RepositoryError::ProductNotFound(_) => Self::NotFound(value.to_string()),
            RepositoryError::Conflict(message) => Self::Conflict(message),
            RepositoryError::InsufficientStock { .. }
            | RepositoryError::AmountOverflow(_)
            | RepositoryError::ProductInUse(_) => Self::InvalidRequest(value.to_string()),
            other => Self::Repository(other),
        }
    }
}
