//! Finished-goods stock types.

use chrono::NaiveDate;
use loomledger_shared::types::{
    AccountTypeId, PersonId, ProductId, StockId, TransactionDetailId, WarehouseId,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::ledger::{Nature, PersonType};

/// Identity of a stock row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StockKey {
    /// Product.
    pub product_id: ProductId,
    /// Warehouse.
    pub warehouse_id: WarehouseId,
    /// Yards per piece, part of the key.
    pub yards_per_piece: Decimal,
}

/// A materialized stock row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockLevel {
    /// Row id.
    pub id: StockId,
    /// Row identity.
    pub key: StockKey,
    /// Quantity on hand.
    pub stock_quantity: Decimal,
    /// Opening quantity.
    pub opening_stock: Decimal,
    /// Valuation rate of the opening quantity.
    pub opening_stock_rate: Decimal,
}

/// A transaction detail line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailLine {
    /// Existing detail id when the line is kept on update.
    pub id: Option<TransactionDetailId>,
    /// Stock row it moves.
    pub key: StockKey,
    /// Pieces moved.
    pub quantity: Decimal,
    /// Price per piece.
    pub rate: Decimal,
}

impl DetailLine {
    /// `quantity * rate`.
    #[must_use]
    pub fn amount(&self) -> Decimal {
        self.quantity * self.rate
    }
}

/// Business meaning of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    /// Goods out to a customer.
    Sale,
    /// Goods in from a supplier.
    Purchase,
    /// Goods back from a customer.
    SaleReturn,
    /// Goods back to a supplier.
    PurchaseReturn,
}

impl TransactionKind {
    /// Derives the kind from the stock side and the party.
    #[must_use]
    pub const fn from_parts(nature: Nature, person_type: PersonType) -> Self {
        match (nature, person_type) {
            (Nature::Debit, PersonType::Customer) => Self::Sale,
            (Nature::Credit, PersonType::Supplier) => Self::Purchase,
            (Nature::Credit, PersonType::Customer) => Self::SaleReturn,
            (Nature::Debit, PersonType::Supplier) => Self::PurchaseReturn,
        }
    }

    /// Returns the string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sale => "sale",
            Self::Purchase => "purchase",
            Self::SaleReturn => "sale_return",
            Self::PurchaseReturn => "purchase_return",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Input of `post_transaction` and `update_transaction`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionInput {
    /// Counterparty.
    pub person_id: PersonId,
    /// Credit brings stock in, Debit takes it out.
    pub nature: Nature,
    /// Transaction date.
    pub date: NaiveDate,
    /// Detail lines.
    pub details: Vec<DetailLine>,
    /// Discount on the gross amount.
    pub discount: Decimal,
    /// Whether part of it was settled on the spot.
    pub paid: bool,
    /// Account the settlement went through.
    pub paid_account_id: Option<AccountTypeId>,
    /// Amount settled.
    pub paid_amount: Decimal,
}

/// Money totals of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionTotals {
    /// Σ detail amounts.
    pub gross: Decimal,
    /// Discount.
    pub discount: Decimal,
    /// `gross - discount`, the ledger amount.
    pub net: Decimal,
}

/// Net quantity change for one stock row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockChange {
    /// Stock row.
    pub key: StockKey,
    /// Signed change; negative consumes stock.
    pub delta: Decimal,
}
