//! Application-wide error types.

use thiserror::Error;

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// Application error types.
///
/// Domain crates keep their own detailed errors; this is the shape every one of
/// them collapses into at the outer boundary (binaries, future HTTP layer).
#[derive(Debug, Error)]
pub enum AppError {
    /// The caller's role lacks the permission for the operation.
    #[error("Access denied: {0}")]
    Forbidden(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// User input violates a business invariant.
    #[error("Validation error: {0}")]
    Validation(String),

    /// A required branch-level setting (e.g. the linked cheque account) is missing.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Conflict (e.g., duplicate serial, inconsistent stock after a batch).
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Forbidden(_) => 403,
            Self::NotFound(_) => 404,
            Self::Validation(_) | Self::Configuration(_) => 400,
            Self::Conflict(_) => 409,
            Self::Database(_) | Self::Internal(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Forbidden(_) => "FORBIDDEN",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Configuration(_) => "CONFIGURATION_ERROR",
            Self::Conflict(_) => "CONFLICT",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Builds an error from an HTTP-style status code and a message.
    ///
    /// Used by the domain crates to collapse their detailed errors.
    #[must_use]
    pub fn from_status(status: u16, message: String) -> Self {
        match status {
            403 => Self::Forbidden(message),
            404 => Self::NotFound(message),
            400 => Self::Validation(message),
            409 => Self::Conflict(message),
            _ => Self::Internal(message),
        }
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::Configuration(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(AppError::Forbidden(String::new()), 403, "FORBIDDEN")]
    #[case(AppError::NotFound(String::new()), 404, "NOT_FOUND")]
    #[case(AppError::Validation(String::new()), 400, "VALIDATION_ERROR")]
    #[case(AppError::Configuration(String::new()), 400, "CONFIGURATION_ERROR")]
    #[case(AppError::Conflict(String::new()), 409, "CONFLICT")]
    #[case(AppError::Database(String::new()), 500, "DATABASE_ERROR")]
    #[case(AppError::Internal(String::new()), 500, "INTERNAL_ERROR")]
    fn test_status_and_code(#[case] err: AppError, #[case] status: u16, #[case] code: &str) {
        assert_eq!(err.status_code(), status);
        assert_eq!(err.error_code(), code);
    }

    #[test]
    fn test_from_status_keeps_class() {
        assert!(matches!(
            AppError::from_status(404, "cheque".into()),
            AppError::NotFound(_)
        ));
        assert!(matches!(
            AppError::from_status(400, "low stock".into()),
            AppError::Validation(_)
        ));
        assert!(matches!(
            AppError::from_status(409, "lot 12".into()),
            AppError::Conflict(_)
        ));
        assert!(matches!(
            AppError::from_status(500, "boom".into()),
            AppError::Internal(_)
        ));
    }

    #[test]
    fn test_configuration_message() {
        let err = AppError::Configuration("cheque account is not linked".into());
        assert_eq!(
            err.to_string(),
            "Configuration error: cheque account is not linked"
        );
    }
}
