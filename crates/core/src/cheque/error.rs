//! Cheque error types.

use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

/// Errors raised by cheque lifecycle rules.
#[derive(Debug, Error)]
pub enum ChequeError {
    /// Amounts must be strictly positive.
    #[error("Cheque amount must be positive, got {0}")]
    InvalidAmount(Decimal),

    /// Bank and cheque number already used in this branch.
    #[error("Cheque {cheque_number} of bank {bank} already exists")]
    DuplicateChequeNumber {
        /// Bank name.
        bank: String,
        /// Cheque number.
        cheque_number: String,
    },

    /// No cheque account is linked for the branch.
    #[error("Cheque account is not configured for this branch")]
    ChequeAccountNotConfigured,

    /// The cheque account cannot be used for this posting.
    #[error("The cheque account cannot be used here")]
    ChequeAccountNotAllowed,

    /// The cheque has already been transferred.
    #[error("Cheque has already been transferred")]
    AlreadyTransferred,

    /// History amount is above what is still owed.
    #[error("Amount {amount} exceeds remaining amount {remaining}")]
    AmountExceedsRemaining {
        /// Requested amount.
        amount: Decimal,
        /// What is still owed.
        remaining: Decimal,
    },

    /// Cheques with history cannot be transferred.
    #[error("Cheque has history rows and cannot be transferred")]
    HasHistory,

    /// Transfer target is the current holder.
    #[error("Cheque already belongs to this person")]
    SamePerson,

    /// The action is not allowed from the current state.
    #[error("Cannot {action} a cheque that is {status}")]
    InvalidStatus {
        /// Current status.
        status: String,
        /// Attempted action.
        action: &'static str,
    },

    /// The cheque is already in (or past) the requested state.
    #[error("Cheque is already {status}")]
    AlreadyInState {
        /// Current status.
        status: String,
    },

    /// A chain of return cheques loops back on itself.
    #[error("Return cheque chain starting at {0} does not terminate")]
    BrokenChain(Uuid),

    /// Cheque not found.
    #[error("Cheque not found: {0}")]
    ChequeNotFound(Uuid),

    /// History row not found.
    #[error("Cheque history not found: {0}")]
    HistoryNotFound(Uuid),
}

impl ChequeError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidAmount(_) => "INVALID_AMOUNT",
            Self::DuplicateChequeNumber { .. } => "DUPLICATE_CHEQUE_NUMBER",
            Self::ChequeAccountNotConfigured => "CHEQUE_ACCOUNT_NOT_CONFIGURED",
            Self::ChequeAccountNotAllowed => "CHEQUE_ACCOUNT_NOT_ALLOWED",
            Self::AlreadyTransferred => "ALREADY_TRANSFERRED",
            Self::AmountExceedsRemaining { .. } => "AMOUNT_EXCEEDS_REMAINING",
            Self::HasHistory => "HAS_HISTORY",
            Self::SamePerson => "SAME_PERSON",
            Self::InvalidStatus { .. } => "INVALID_STATUS",
            Self::AlreadyInState { .. } => "ALREADY_IN_STATE",
            Self::BrokenChain(_) => "BROKEN_CHAIN",
            Self::ChequeNotFound(_) => "CHEQUE_NOT_FOUND",
            Self::HistoryNotFound(_) => "HISTORY_NOT_FOUND",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            Self::ChequeNotFound(_) | Self::HistoryNotFound(_) => 404,
            Self::BrokenChain(_) => 409,
            _ => 400,
        }
    }
}
