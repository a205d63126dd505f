//! Raw stock error types.

use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

/// Errors raised by the raw lot reconciler and lot document rules.
#[derive(Debug, Error)]
pub enum RawStockError {
    /// Post-hoc check found a negative group.
    #[error("Low stock for lot # {lot_number}")]
    NegativeStock {
        /// Offending lot.
        lot_number: i64,
        /// Resulting quantity.
        quantity: Decimal,
    },

    /// Pre-check found that a proposed line asks for more than is on hand.
    #[error("Low stock for lot # {lot_number}: requested {requested}, available {available}")]
    LowStock {
        /// Offending lot.
        lot_number: i64,
        /// Total requested for the group.
        requested: Decimal,
        /// On hand for the group.
        available: Decimal,
    },

    /// No purchase exists for the lot number.
    #[error("Lot # {0} does not exist")]
    UnknownLot(i64),

    /// Lot number already used in this branch.
    #[error("Lot # {0} already exists")]
    DuplicateLotNumber(i64),

    /// Purchase returns must go back to the lot's supplier.
    #[error("Lot # {lot_number} was not purchased from this person")]
    LotOwnerMismatch {
        /// Offending lot.
        lot_number: i64,
    },

    /// A line names a raw product the lot never contained.
    #[error("Raw product {raw_product_id} is not part of lot # {lot_number}")]
    ProductNotInLot {
        /// Lot.
        lot_number: i64,
        /// Raw product.
        raw_product_id: Uuid,
    },

    /// Quantities must be positive.
    #[error("Quantity must be positive, got {0}")]
    InvalidQuantity(Decimal),

    /// Rates must not be negative.
    #[error("Rate cannot be negative, got {0}")]
    NegativeRate(Decimal),

    /// Lots kept in stock need a warehouse on every line.
    #[error("Lot # {0} is not issued, every line needs a warehouse")]
    WarehouseRequired(i64),

    /// Lots issued to dyeing have no warehouse.
    #[error("Lot # {0} is issued to dyeing, lines cannot have a warehouse")]
    WarehouseNotAllowed(i64),

    /// Issued lots must name the dyeing unit.
    #[error("Lot # {0} is issued but has no dyeing unit")]
    DyingUnitRequired(i64),

    /// Transfer source and destination are the same.
    #[error("Cannot transfer lot # {0} to the warehouse it is already in")]
    SameWarehouse(i64),

    /// A batch with no lines.
    #[error("At least one lot line is required")]
    EmptyBatch,

    /// Referenced raw document not found.
    #[error("Raw document not found: {0}")]
    NotFound(Uuid),
}

impl RawStockError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NegativeStock { .. } => "NEGATIVE_STOCK",
            Self::LowStock { .. } => "LOW_STOCK",
            Self::UnknownLot(_) => "UNKNOWN_LOT",
            Self::DuplicateLotNumber(_) => "DUPLICATE_LOT_NUMBER",
            Self::LotOwnerMismatch { .. } => "LOT_OWNER_MISMATCH",
            Self::ProductNotInLot { .. } => "PRODUCT_NOT_IN_LOT",
            Self::InvalidQuantity(_) => "INVALID_QUANTITY",
            Self::NegativeRate(_) => "NEGATIVE_RATE",
            Self::WarehouseRequired(_) => "WAREHOUSE_REQUIRED",
            Self::WarehouseNotAllowed(_) => "WAREHOUSE_NOT_ALLOWED",
            Self::DyingUnitRequired(_) => "DYING_UNIT_REQUIRED",
            Self::SameWarehouse(_) => "SAME_WAREHOUSE",
            Self::EmptyBatch => "EMPTY_BATCH",
            Self::NotFound(_) => "NOT_FOUND",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            Self::NegativeStock { .. } => 409,
            Self::UnknownLot(_) | Self::NotFound(_) => 404,
            _ => 400,
        }
    }
}
