//! Ledger posting rules.

use rust_decimal::Decimal;

use super::entry::{NewLedgerEntry, Origin};
use super::error::LedgerError;

/// Validation applied to every row before it is written.
pub struct LedgerService;

impl LedgerService {
    /// Validates a new row.
    ///
    /// Zero amounts are allowed (a fully discounted sale still posts).
    ///
    /// # Errors
    ///
    /// - [`LedgerError::NegativeAmount`] if the amount is below zero
    /// - [`LedgerError::MissingDetail`] if a manual row has no detail
    pub fn validate_new_entry(entry: &NewLedgerEntry) -> Result<(), LedgerError> {
        if entry.amount < Decimal::ZERO {
            return Err(LedgerError::NegativeAmount);
        }
        if entry.origin == Origin::Manual
            && entry.detail.as_deref().is_none_or(|d| d.trim().is_empty())
        {
            return Err(LedgerError::MissingDetail);
        }
        Ok(())
    }
}
