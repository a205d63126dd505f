//! String-backed enums stored in the database, with conversions to the core types.

use loomledger_core::cheque::{ExternalChequeStatus, PersonalChequeStatus};
use loomledger_core::ledger::{Nature, PersonType};
use loomledger_core::raw::RawDebitType;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum NatureDb {
    #[sea_orm(string_value = "credit")]
    Credit,
    #[sea_orm(string_value = "debit")]
    Debit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum PersonTypeDb {
    #[sea_orm(string_value = "customer")]
    Customer,
    #[sea_orm(string_value = "supplier")]
    Supplier,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum ExternalChequeStatusDb {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "transferred")]
    Transferred,
    #[sea_orm(string_value = "cleared")]
    Cleared,
    #[sea_orm(string_value = "returned")]
    Returned,
    #[sea_orm(string_value = "completed_history")]
    CompletedHistory,
    #[sea_orm(string_value = "completed_transfer")]
    CompletedTransfer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum PersonalChequeStatusDb {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "cleared")]
    Cleared,
    #[sea_orm(string_value = "returned")]
    Returned,
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum RawDebitTypeDb {
    #[sea_orm(string_value = "sale")]
    Sale,
    #[sea_orm(string_value = "purchase_return")]
    PurchaseReturn,
    #[sea_orm(string_value = "sale_return")]
    SaleReturn,
}

macro_rules! mirror_enum {
    ($db:ident <=> $core:ident { $($variant:ident),+ $(,)? }) => {
        impl From<$core> for $db {
            fn from(value: $core) -> Self {
                match value {
                    $($core::$variant => Self::$variant,)+
                }
            }
        }

        impl From<$db> for $core {
            fn from(value: $db) -> Self {
                match value {
                    $($db::$variant => Self::$variant,)+
                }
            }
        }
    };
}

mirror_enum!(NatureDb <=> Nature { Credit, Debit });
mirror_enum!(PersonTypeDb <=> PersonType { Customer, Supplier });
mirror_enum!(ExternalChequeStatusDb <=> ExternalChequeStatus {
    Pending,
    Transferred,
    Cleared,
    Returned,
    CompletedHistory,
    CompletedTransfer,
});
mirror_enum!(PersonalChequeStatusDb <=> PersonalChequeStatus {
    Pending,
    Cleared,
    Returned,
    Cancelled,
});
mirror_enum!(RawDebitTypeDb <=> RawDebitType { Sale, PurchaseReturn, SaleReturn });
