//! Core business logic for LoomLedger.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and calculations live here; the `db`
//! crate loads rows, calls into these functions, and persists the outcome.
//!
//! # Modules
//!
//! - `ledger` - Money ledger postings, origins and balance aggregation
//! - `cheque` - External and personal cheque lifecycle rules
//! - `raw` - Raw-material lot stock reconciliation
//! - `stock` - Finished-goods stock posting rules
//! - `reports` - Balance sheet and income statement calculations

pub mod cheque;
pub mod ledger;
pub mod raw;
pub mod reports;
pub mod stock;
