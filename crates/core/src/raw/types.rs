//! Raw lot types.

use loomledger_shared::types::{FormulaId, RawProductId, WarehouseId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::ledger::Nature;

/// What a raw debit does to stock and to the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RawDebitType {
    /// Raw lot sold to a customer.
    Sale,
    /// Raw lot sent back to its supplier.
    PurchaseReturn,
    /// Raw lot coming back from a customer.
    SaleReturn,
}

impl RawDebitType {
    /// Side of the detail lines and of the ledger row.
    #[must_use]
    pub const fn nature(self) -> Nature {
        match self {
            Self::Sale | Self::PurchaseReturn => Nature::Debit,
            Self::SaleReturn => Nature::Credit,
        }
    }

    /// Purchase returns must go back to the supplier the lot came from.
    #[must_use]
    pub const fn requires_same_person(self) -> bool {
        matches!(self, Self::PurchaseReturn)
    }

    /// Returns the string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sale => "sale",
            Self::PurchaseReturn => "purchase_return",
            Self::SaleReturn => "sale_return",
        }
    }
}

impl fmt::Display for RawDebitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Grouping key of the raw inventory.
///
/// Nature and the event a line came from are deliberately absent so that
/// purchases, returns, transfers and dye issues of one physical lot net out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LotKey {
    /// Lot number.
    pub lot_number: i64,
    /// Raw product.
    pub raw_product_id: RawProductId,
    /// Warehouse; `None` for lots issued straight to dyeing.
    pub warehouse_id: Option<WarehouseId>,
    /// Actual gazaana.
    pub actual_gazaana: Decimal,
    /// Expected gazaana.
    pub expected_gazaana: Decimal,
    /// Dyeing formula.
    pub formula_id: Option<FormulaId>,
}

/// One quantity line of a lot event, as stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LotLine {
    /// Lot number.
    pub lot_number: i64,
    /// Raw product.
    pub raw_product_id: RawProductId,
    /// Warehouse the quantity sits in (the source warehouse for transfers).
    pub warehouse_id: Option<WarehouseId>,
    /// Actual gazaana.
    pub actual_gazaana: Decimal,
    /// Expected gazaana.
    pub expected_gazaana: Decimal,
    /// Dyeing formula.
    pub formula_id: Option<FormulaId>,
    /// Quantity moved.
    pub quantity: Decimal,
}

impl LotLine {
    /// Grouping key of this line.
    #[must_use]
    pub const fn key(&self) -> LotKey {
        LotKey {
            lot_number: self.lot_number,
            raw_product_id: self.raw_product_id,
            warehouse_id: self.warehouse_id,
            actual_gazaana: self.actual_gazaana,
            expected_gazaana: self.expected_gazaana,
            formula_id: self.formula_id,
        }
    }
}

/// A raw debit line with its stored nature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebitLine {
    /// The quantity line.
    pub line: LotLine,
    /// Credit adds back to stock, Debit removes.
    pub nature: Nature,
}

/// A warehouse transfer line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferLine {
    /// Quantity line located at the source warehouse.
    pub line: LotLine,
    /// Destination warehouse.
    pub to_warehouse_id: WarehouseId,
}

/// Every raw stock event of a branch, one vector per event table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawEvents {
    /// Purchase lot details.
    pub purchases: Vec<LotLine>,
    /// Raw debit details.
    pub debits: Vec<DebitLine>,
    /// Transfer details.
    pub transfers: Vec<TransferLine>,
    /// Dye issue details.
    pub dye_issues: Vec<LotLine>,
}

/// Where a normalized movement came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovementSource {
    /// Purchase lot detail.
    Purchase,
    /// Raw debit detail.
    Debit,
    /// Transfer leaving a warehouse.
    TransferOut,
    /// Transfer arriving at a warehouse.
    TransferIn,
    /// Dye issue detail.
    DyeIssue,
}

/// A signed movement in the common shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LotMovement {
    /// Grouping key.
    pub key: LotKey,
    /// Credit adds, Debit removes.
    pub nature: Nature,
    /// Unsigned quantity.
    pub quantity: Decimal,
    /// Originating event table.
    pub source: MovementSource,
}

impl LotMovement {
    /// Quantity signed by nature.
    #[must_use]
    pub fn signed_quantity(&self) -> Decimal {
        self.nature.signed(self.quantity)
    }
}

/// Descriptive attributes of a raw product.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawProductInfo {
    /// Glue grade.
    pub product_glue: Option<String>,
    /// Product type.
    pub product_type: Option<String>,
}

/// One row of the computed raw inventory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionRow {
    /// Grouping key.
    pub key: LotKey,
    /// Glue grade of the raw product.
    pub product_glue: Option<String>,
    /// Type of the raw product.
    pub product_type: Option<String>,
    /// Net quantity on hand.
    pub quantity: Decimal,
}

/// Outcome of a whole-inventory check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryCheck {
    /// True when no group is negative.
    pub ok: bool,
    /// Empty when ok, otherwise names the offending lot.
    pub message: String,
}

/// A lot line carrying a rate, for documents that post to the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricedLine {
    /// The quantity line.
    pub line: LotLine,
    /// Rate per unit.
    pub rate: Decimal,
}

impl PricedLine {
    /// `quantity * rate`.
    #[must_use]
    pub fn amount(&self) -> Decimal {
        self.line.quantity * self.rate
    }
}
