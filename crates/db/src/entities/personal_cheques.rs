//! `SeaORM` Entity for personal_cheques table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::PersonalChequeStatusDb;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "personal_cheques")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub branch_id: Uuid,
    pub serial: i64,
    pub person_id: Uuid,
    pub account_type_id: Uuid,
    pub bank: String,
    pub cheque_number: String,
    pub date: Date,
    pub due_date: Date,
    pub amount: Decimal,
    pub status: PersonalChequeStatusDb,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
