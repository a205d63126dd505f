//! Repository error type.

use loomledger_core::cheque::ChequeError;
use loomledger_core::ledger::LedgerError;
use loomledger_core::raw::RawStockError;
use loomledger_core::reports::ReportError;
use loomledger_core::stock::StockError;
use loomledger_shared::AppError;
use sea_orm::DbErr;
use uuid::Uuid;

/// Error returned by every repository operation.
///
/// Business-rule failures keep their core error so callers can match on the
/// exact reason; storage failures surface as [`RepoError::Database`].
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    /// The caller's role lacks the permission for the operation.
    #[error("Access denied: {0}")]
    Forbidden(String),

    /// A referenced row does not exist in the caller's branch.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Kind of row.
        entity: &'static str,
        /// Requested id.
        id: Uuid,
    },

    /// A stored row could not be mapped back to a domain value.
    #[error("Stored data is inconsistent: {0}")]
    Corrupt(String),

    /// Ledger rule violation.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// Cheque rule violation.
    #[error(transparent)]
    Cheque(#[from] ChequeError),

    /// Raw lot rule violation.
    #[error(transparent)]
    RawStock(#[from] RawStockError),

    /// Finished-goods stock rule violation.
    #[error(transparent)]
    Stock(#[from] StockError),

    /// Report parameter violation.
    #[error(transparent)]
    Report(#[from] ReportError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl RepoError {
    /// Shorthand for [`RepoError::NotFound`].
    pub fn not_found(entity: &'static str, id: impl Into<Uuid>) -> Self {
        Self::NotFound {
            entity,
            id: id.into(),
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Forbidden(_) => "FORBIDDEN",
            Self::NotFound { .. } => "NOT_FOUND",
            Self::Corrupt(_) => "CORRUPT_DATA",
            Self::Ledger(e) => e.error_code(),
            Self::Cheque(e) => e.error_code(),
            Self::RawStock(e) => e.error_code(),
            Self::Stock(e) => e.error_code(),
            Self::Report(e) => e.error_code(),
            Self::Database(_) => "DATABASE_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            Self::Forbidden(_) => 403,
            Self::NotFound { .. } => 404,
            Self::Corrupt(_) | Self::Database(_) => 500,
            Self::Ledger(e) => e.http_status_code(),
            Self::Cheque(e) => e.http_status_code(),
            Self::RawStock(e) => e.http_status_code(),
            Self::Stock(e) => e.http_status_code(),
            Self::Report(e) => e.http_status_code(),
        }
    }
}

impl From<AppError> for RepoError {
    fn from(err: AppError) -> Self {
        match err {
            AppError::Forbidden(msg) => Self::Forbidden(msg),
            other => Self::Corrupt(other.to_string()),
        }
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::Database(e) => Self::Database(e.to_string()),
            other @ RepoError::Cheque(ChequeError::ChequeAccountNotConfigured) => {
                Self::Configuration(other.to_string())
            }
            other => Self::from_status(other.http_status_code(), other.to_string()),
        }
    }
}
