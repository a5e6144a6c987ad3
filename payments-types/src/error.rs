//! Error types for the payment service.

use crate::domain::PaymentStatus;

/// Boxed underlying cause carried by [`AppError::Internal`].
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Domain-level errors (business rule violations).
#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    #[error("{0}")]
    Validation(String),

    #[error("Invalid status transition: {from} -> {to}")]
    InvalidTransition {
        from: PaymentStatus,
        to: PaymentStatus,
    },

    #[error("Secure random source unavailable: {0}")]
    EntropyUnavailable(String),
}

/// Repository-level errors (data access failures).
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Entity not found")]
    NotFound,

    #[error("Conflict: {0}")]
    Conflict(String),
}

/// Application-level errors returned by the use cases.
///
/// `Validation` and `NotFound` carry a caller-facing message. `Internal`
/// carries only the cause, which is for logs and never shown to callers.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("internal error occurred")]
    Internal {
        #[source]
        source: Option<BoxError>,
    },
}

impl AppError {
    /// Wraps an unexpected failure.
    pub fn internal<E>(err: E) -> Self
    where
        E: Into<BoxError>,
    {
        AppError::Internal {
            source: Some(err.into()),
        }
    }

    /// The wrapped cause of an `Internal` error, if any.
    pub fn cause(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        match self {
            AppError::Internal { source } => source.as_deref(),
            _ => None,
        }
    }
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(msg) => AppError::Validation(msg),
            DomainError::InvalidTransition { from, to } => {
                AppError::Validation(format!("payment cannot move from {} to {}", from, to))
            }
            e @ DomainError::EntropyUnavailable(_) => AppError::internal(e),
        }
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound => AppError::NotFound("payment not found".into()),
            e => AppError::internal(e),
        }
    }
}
