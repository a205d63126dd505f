//! Finished-goods stock posting.

pub mod error;
pub mod service;
pub mod types;

#[cfg(test)]
mod service_props;

pub use error::StockError;
pub use service::StockService;
pub use types::{
    DetailLine, StockChange, StockKey, StockLevel, TransactionInput, TransactionKind,
    TransactionTotals,
};
