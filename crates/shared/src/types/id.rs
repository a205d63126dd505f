//! Typed IDs for type-safe entity references.
//!
//! Using typed IDs prevents accidentally passing a `PersonId` where an `AccountTypeId`
//! is expected, which matters a lot in a ledger where every row references both.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Macro to generate typed ID wrappers.
macro_rules! typed_id {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Creates a new random ID using UUID v7 (time-ordered).
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// Creates an ID from an existing UUID.
            #[must_use]
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Returns the inner UUID.
            #[must_use]
            pub const fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(Uuid::parse_str(s)?))
            }
        }

        impl From<Uuid> for $name {
            fn from(value: Uuid) -> Self {
                Self(value)
            }
        }

        impl From<$name> for Uuid {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

typed_id!(BranchId, "Unique identifier for a branch (tenant partition).");
typed_id!(UserId, "Unique identifier for a user.");
typed_id!(PersonId, "Unique identifier for a customer or supplier.");
typed_id!(AccountTypeId, "Unique identifier for an account type (cash, bank, cheque account).");
typed_id!(ProductId, "Unique identifier for a finished-goods product.");
typed_id!(WarehouseId, "Unique identifier for a warehouse.");
typed_id!(RawProductId, "Unique identifier for a raw material product.");
typed_id!(FormulaId, "Unique identifier for a dyeing formula.");
typed_id!(DyingUnitId, "Unique identifier for an external dyeing unit.");
typed_id!(LedgerEntryId, "Unique identifier for a ledger entry.");
typed_id!(TransactionId, "Unique identifier for a finished-goods transaction.");
typed_id!(TransactionDetailId, "Unique identifier for a transaction detail line.");
typed_id!(StockId, "Unique identifier for a finished-goods stock row.");
typed_id!(ExternalChequeId, "Unique identifier for an external (received) cheque.");
typed_id!(ChequeHistoryId, "Unique identifier for an external cheque history row.");
typed_id!(ChequeTransferId, "Unique identifier for an external cheque transfer.");
typed_id!(PersonalChequeId, "Unique identifier for a personal (issued) cheque.");
typed_id!(PaymentId, "Unique identifier for a payment.");
typed_id!(RawTransactionId, "Unique identifier for a raw purchase lot.");
typed_id!(RawDebitId, "Unique identifier for a raw debit (sale or return).");
typed_id!(RawTransferId, "Unique identifier for a raw warehouse transfer.");
typed_id!(DyingIssueId, "Unique identifier for a dye issue.");
typed_id!(ExpenseId, "Unique identifier for an expense.");
typed_id!(AssetId, "Unique identifier for a fixed asset.");
