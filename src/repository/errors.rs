use diesel::r2d2::PoolError;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use thiserror::Error;

/// Result type returned by every repository operation.
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Errors raised by the data access layer.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("record not found")]
    NotFound,
    /// A product referenced by an order line does not exist.
    #[error("product {0} not found")]
    ProductNotFound(i32),
    /// A uniqueness constraint was violated.
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("insufficient stock for product {product_id}: {available} available, {requested} requested")]
    InsufficientStock {
        product_id: i32,
        available: i32,
        requested: i32,
    },
    /// A line total or the order total does not fit the money type.
    #[error("order amount for product {0} is too large")]
    AmountOverflow(i32),
    /// The product is referenced by order items and cannot be removed.
    #[error("product {0} is referenced by existing orders")]
    ProductInUse(i32),
    /// The connection pool could not hand out a connection.
    #[error("database unavailable: {0}")]
    Unavailable(#[from] PoolError),
    /// A table or view the query depends on does not exist.
    #[error("missing schema object: {0}")]
    MissingSchema(String),
    #[error("database error: {0}")]
    Database(DieselError),
}

impl RepositoryError {
    /// Machine-readable code of infrastructure failures, `None` for domain errors.
    pub fn diagnostic_code(&self) -> Option<&'static str> {
        match self {
            Self::Unavailable(_) => Some("database_unavailable"),
            Self::MissingSchema(_) => Some("schema_missing"),
            Self::Database(_) => Some("database_error"),
            _ => None,
        }
    }
}

impl From<DieselError> for RepositoryError {
    fn from(value: DieselError) -> Self {
        match value {
            DieselError::NotFound => Self::NotFound,
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
                Self::Conflict(info.message().to_string())
            }
            DieselError::DatabaseError(kind, info) => {
                let message = info.message();
                if message.contains("no such table") || message.contains("no such view") {
                    Self::MissingSchema(message.to_string())
                } else {
                    Self::Database(DieselError::DatabaseError(kind, info))
                }
            }
            other => Self::Database(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_is_a_domain_error() {
        let err = RepositoryError::from(DieselError::NotFound);
        assert!(matches!(err, RepositoryError::NotFound));
        assert_eq!(err.diagnostic_code(), None);
    }

    #[test]
    fn rollback_is_classified_as_database_error() {
        let err = RepositoryError::from(DieselError::RollbackTransaction);
        assert_eq!(err.diagnostic_code(), Some("database_error"));
    }

    #[test]
    fn stock_errors_describe_quantities() {
        let err = RepositoryError::InsufficientStock {
            product_id: 3,
            available: 2,
            requested: 5,
        };
        assert_eq!(
            err.to_string(),
            "insufficient stock for product 3: 2 available, 5 requested"
        );
    }
}
