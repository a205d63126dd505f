//! Cheque domain types.

use chrono::NaiveDate;
use loomledger_shared::types::{
    AccountTypeId, BranchId, ChequeHistoryId, ExternalChequeId, PersonId, PersonalChequeId,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state of a received cheque.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExternalChequeStatus {
    /// Received, not yet settled.
    Pending,
    /// Endorsed over to another person.
    Transferred,
    /// Cleared by the bank.
    Cleared,
    /// Bounced back.
    Returned,
    /// Fully recovered through history rows.
    CompletedHistory,
    /// Settled by transferring a return cheque after full recovery.
    CompletedTransfer,
}

impl ExternalChequeStatus {
    /// Returns the string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Transferred => "transferred",
            Self::Cleared => "cleared",
            Self::Returned => "returned",
            Self::CompletedHistory => "completed_history",
            Self::CompletedTransfer => "completed_transfer",
        }
    }
}

impl fmt::Display for ExternalChequeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle state of a cheque we issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PersonalChequeStatus {
    /// Issued, not yet presented.
    Pending,
    /// Passed by the bank. Terminal.
    Cleared,
    /// Came back unpaid.
    Returned,
    /// Returned and written off. Terminal.
    Cancelled,
}

impl PersonalChequeStatus {
    /// Returns the string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Cleared => "cleared",
            Self::Returned => "returned",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for PersonalChequeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Transitions on a received cheque outside of history and transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExternalChequeAction {
    /// pending → cleared.
    Clear,
    /// pending → returned.
    Return,
}

/// Transitions on a personal cheque after issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PersonalChequeAction {
    /// pending → returned.
    Return,
    /// returned → pending, to a new person.
    Reissue,
    /// pending → cleared.
    Pass,
    /// returned → cancelled.
    Cancel,
}

/// A received cheque.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalCheque {
    /// Cheque id.
    pub id: ExternalChequeId,
    /// Owning branch.
    pub branch_id: BranchId,
    /// Branch serial.
    pub serial: i64,
    /// Person who handed it over.
    pub person_id: PersonId,
    /// Drawee bank.
    pub bank: String,
    /// Number printed on the cheque.
    pub cheque_number: String,
    /// Date received.
    pub date: NaiveDate,
    /// Date it can be presented.
    pub due_date: NaiveDate,
    /// Face value.
    pub amount: Decimal,
    /// Current state.
    pub status: ExternalChequeStatus,
    /// Set once the history chain has recovered the full amount.
    pub is_passed_with_history: bool,
}

/// One partial recovery against a root cheque.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChequeHistory {
    /// History id.
    pub id: ChequeHistoryId,
    /// Root cheque being paid down.
    pub parent_cheque_id: ExternalChequeId,
    /// Cheque the row was recorded against.
    pub cheque_id: ExternalChequeId,
    /// Account the money arrived on.
    pub account_type_id: AccountTypeId,
    /// Amount recovered.
    pub amount: Decimal,
    /// Change cheque created by this row, if any.
    pub return_cheque_id: Option<ExternalChequeId>,
    /// Date recorded.
    pub date: NaiveDate,
}

/// A cheque we issued.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonalCheque {
    /// Cheque id.
    pub id: PersonalChequeId,
    /// Owning branch.
    pub branch_id: BranchId,
    /// Branch serial.
    pub serial: i64,
    /// Payee.
    pub person_id: PersonId,
    /// Bank account the cheque is drawn on.
    pub account_type_id: AccountTypeId,
    /// Bank name.
    pub bank: String,
    /// Number printed on the cheque.
    pub cheque_number: String,
    /// Issue date.
    pub date: NaiveDate,
    /// Date it can be presented.
    pub due_date: NaiveDate,
    /// Face value.
    pub amount: Decimal,
    /// Current state.
    pub status: PersonalChequeStatus,
}

/// Recovery position of a root cheque.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChequeSummary {
    /// The root cheque.
    pub parent: ExternalCheque,
    /// Still owed, ignoring cheque-account rows.
    pub remaining_amount: Decimal,
    /// Everything handed in against the root, cheque-account rows included.
    pub amount_received: Decimal,
    /// History rows anywhere in the root's recovery chain.
    pub history: Vec<ChequeHistory>,
}
