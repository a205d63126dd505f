//! Financial report generation.
//!
//! This module provides pure business logic for generating financial reports:
//! - Account balances, payables and receivables
//! - Balance Sheet
//! - Income Statement with weighted-average cost of goods sold

pub mod error;
pub mod service;
pub mod types;

#[cfg(test)]
mod tests;

pub use error::ReportError;
pub use service::ReportService;
pub use types::*;
