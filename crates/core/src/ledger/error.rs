//! Ledger error types.

use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur while building or reading ledger rows.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Entry amount cannot be negative.
    #[error("Entry amount cannot be negative")]
    NegativeAmount,

    /// More than one origin reference is set on a stored row.
    #[error("Ledger entry references {count} source documents, expected at most one")]
    AmbiguousOrigin {
        /// Number of origin references found.
        count: usize,
    },

    /// A manual entry must say what it is for.
    #[error("Manual ledger entries require a detail")]
    MissingDetail,

    /// An origin reference is set but its serial is missing.
    #[error("Ledger entry origin {0} is missing its serial")]
    MissingSerial(&'static str),

    /// Stored nature column holds an unknown value.
    #[error("Unknown ledger nature: {0}")]
    UnknownNature(String),

    /// Ledger entry not found.
    #[error("Ledger entry not found: {0}")]
    EntryNotFound(Uuid),
}

impl LedgerError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NegativeAmount => "NEGATIVE_AMOUNT",
            Self::AmbiguousOrigin { .. } => "AMBIGUOUS_ORIGIN",
            Self::MissingDetail => "MISSING_DETAIL",
            Self::MissingSerial(_) => "MISSING_SERIAL",
            Self::UnknownNature(_) => "UNKNOWN_NATURE",
            Self::EntryNotFound(_) => "ENTRY_NOT_FOUND",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            Self::NegativeAmount | Self::MissingDetail => 400,
            Self::EntryNotFound(_) => 404,
            Self::AmbiguousOrigin { .. } | Self::MissingSerial(_) | Self::UnknownNature(_) => 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes_and_status() {
        assert_eq!(LedgerError::NegativeAmount.http_status_code(), 400);
        assert_eq!(
            LedgerError::AmbiguousOrigin { count: 2 }.error_code(),
            "AMBIGUOUS_ORIGIN"
        );
        assert_eq!(
            LedgerError::EntryNotFound(Uuid::nil()).http_status_code(),
            404
        );
    }
}
