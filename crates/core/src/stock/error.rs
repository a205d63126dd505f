//! Finished-goods stock error types.

use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

/// Errors raised by transaction and stock posting rules.
#[derive(Debug, Error)]
pub enum StockError {
    /// A transaction needs at least one detail.
    #[error("Transaction must have at least one detail")]
    EmptyTransaction,

    /// Quantities must be positive.
    #[error("Quantity must be positive, got {0}")]
    InvalidQuantity(Decimal),

    /// Rates must not be negative.
    #[error("Rate cannot be negative, got {0}")]
    NegativeRate(Decimal),

    /// Discounts must not be negative.
    #[error("Discount cannot be negative, got {0}")]
    NegativeDiscount(Decimal),

    /// Discount above the gross amount.
    #[error("Discount {discount} exceeds the transaction total {gross}")]
    DiscountExceedsTotal {
        /// Requested discount.
        discount: Decimal,
        /// Gross amount.
        gross: Decimal,
    },

    /// A paid transaction must say where the money went.
    #[error("Paid transactions require a paid account")]
    PaidAccountRequired,

    /// A paid transaction must carry a positive amount.
    #[error("Paid amount must be positive, got {0}")]
    InvalidPaidAmount(Decimal),

    /// Debit against a stock row that does not exist.
    #[error("No stock for product {product_id} in warehouse {warehouse_id}")]
    StockNotFound {
        /// Product.
        product_id: Uuid,
        /// Warehouse.
        warehouse_id: Uuid,
    },

    /// Debit would drive stock negative.
    #[error(
        "Insufficient stock for product {product_id} in warehouse {warehouse_id}: available {available}, requested {requested}"
    )]
    InsufficientStock {
        /// Product.
        product_id: Uuid,
        /// Warehouse.
        warehouse_id: Uuid,
        /// On hand.
        available: Decimal,
        /// Asked for.
        requested: Decimal,
    },

    /// A kept detail id does not belong to the transaction.
    #[error("Transaction detail not found: {0}")]
    DetailNotFound(Uuid),

    /// Transaction not found.
    #[error("Transaction not found: {0}")]
    TransactionNotFound(Uuid),
}

impl StockError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::EmptyTransaction => "EMPTY_TRANSACTION",
            Self::InvalidQuantity(_) => "INVALID_QUANTITY",
            Self::NegativeRate(_) => "NEGATIVE_RATE",
            Self::NegativeDiscount(_) => "NEGATIVE_DISCOUNT",
            Self::DiscountExceedsTotal { .. } => "DISCOUNT_EXCEEDS_TOTAL",
            Self::PaidAccountRequired => "PAID_ACCOUNT_REQUIRED",
            Self::InvalidPaidAmount(_) => "INVALID_PAID_AMOUNT",
            Self::StockNotFound { .. } => "STOCK_NOT_FOUND",
            Self::InsufficientStock { .. } => "INSUFFICIENT_STOCK",
            Self::DetailNotFound(_) => "DETAIL_NOT_FOUND",
            Self::TransactionNotFound(_) => "TRANSACTION_NOT_FOUND",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            Self::StockNotFound { .. } | Self::DetailNotFound(_) | Self::TransactionNotFound(_) => {
                404
            }
            _ => 400,
        }
    }
}
