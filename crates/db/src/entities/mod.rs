//! `SeaORM` entity definitions, one module per table.

pub mod account_types;
pub mod assets;
pub mod dying_issue_details;
pub mod dying_issues;
pub mod expenses;
pub mod external_cheque_histories;
pub mod external_cheque_transfers;
pub mod external_cheques;
pub mod ledger_entries;
pub mod linked_accounts;
pub mod payments;
pub mod personal_cheques;
pub mod persons;
pub mod raw_debit_lot_details;
pub mod raw_debits;
pub mod raw_lot_details;
pub mod raw_products;
pub mod raw_transactions;
pub mod raw_transfer_lot_details;
pub mod raw_transfers;
pub mod sea_orm_active_enums;
pub mod serial_counters;
pub mod stocks;
pub mod transaction_details;
pub mod transactions;
