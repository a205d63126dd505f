//! `SeaORM` Entity for ledger_entries table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::NatureDb;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "ledger_entries")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub branch_id: Uuid,
    pub date: Date,
    pub amount: Decimal,
    pub nature: NatureDb,
    pub person_id: Uuid,
    pub account_type_id: Option<Uuid>,
    pub transaction_id: Option<Uuid>,
    pub external_cheque_id: Option<Uuid>,
    pub personal_cheque_id: Option<Uuid>,
    pub payment_id: Option<Uuid>,
    pub raw_transaction_id: Option<Uuid>,
    pub raw_debit_id: Option<Uuid>,
    pub source_serial: Option<i64>,
    pub detail: Option<String>,
    pub draft: bool,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
