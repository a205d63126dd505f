//! `SeaORM` Entity for external_cheques table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::ExternalChequeStatusDb;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "external_cheques")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub branch_id: Uuid,
    pub serial: i64,
    pub person_id: Uuid,
    pub bank: String,
    pub cheque_number: String,
    pub date: Date,
    pub due_date: Date,
    pub amount: Decimal,
    pub status: ExternalChequeStatusDb,
    pub is_passed_with_history: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
