//! Repository layer over the branch-partitioned store.
//!
//! Each repository owns a connection pool, takes a [`loomledger_shared::RequestContext`]
//! on every call and runs every mutating operation in one database transaction.

mod common;
pub mod directory;
pub mod external_cheque;
pub mod ledger;
pub mod payment;
pub mod personal_cheque;
pub mod raw_stock;
pub mod report;
pub mod serial;
pub mod transaction;

pub use directory::{
    CreateRawProductInput, DirectoryRepository, LinkedAccountKind, RecordExpenseInput,
};
pub use external_cheque::{
    ChangeCheque, ChequeDetails, ExternalChequeRepository, RecordHistoryInput,
};
pub use ledger::LedgerRepository;
pub use payment::{PaymentRepository, RecordPaymentInput};
pub use personal_cheque::{IssuePersonalChequeInput, PersonalChequeRepository};
pub use raw_stock::{
    CreateDyingIssueInput, CreateRawDebitInput, CreateRawLotInput, CreateRawTransferInput,
    RawLotLineInput, RawStockRepository,
};
pub use report::ReportRepository;
pub use serial::SerialKind;
pub use transaction::{SetOpeningStockInput, TransactionRepository, TransactionWithDetails};
