//! Raw material lots and their computed stock.
//!
//! - `types` - lot lines, grouping key, event bundles
//! - `reconciler` - normalization, position, pre- and post-checks
//! - `error` - raw stock errors

pub mod error;
pub mod reconciler;
pub mod types;

#[cfg(test)]
mod reconciler_props;

pub use error::RawStockError;
pub use reconciler::RawStockReconciler;
pub use types::{
    DebitLine, InventoryCheck, LotKey, LotLine, LotMovement, MovementSource, PositionRow,
    PricedLine, RawDebitType, RawEvents, RawProductInfo, TransferLine,
};
