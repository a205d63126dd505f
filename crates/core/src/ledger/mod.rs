//! Single-sided money ledger.
//!
//! This module implements the ledger every other module posts into:
//! - Row natures and person types
//! - Ledger entries and their source-document origin
//! - Filters and balance aggregation
//! - Posting validation
//! - Error types for ledger operations

pub mod balance;
pub mod entry;
pub mod error;
pub mod service;
pub mod types;

#[cfg(test)]
mod balance_props;

pub use balance::{
    AccountTypeBalance, LedgerBalances, LedgerFilter, NatureTotals, PersonBalance, StatementLine,
};
pub use entry::{LedgerEntry, NewLedgerEntry, Origin, OriginLinks};
pub use error::LedgerError;
pub use service::LedgerService;
pub use types::{Nature, PersonType};
