//! `SeaORM` Entity for raw_lot_details table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "raw_lot_details")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub raw_transaction_id: Uuid,
    pub raw_product_id: Uuid,
    pub warehouse_id: Option<Uuid>,
    pub actual_gazaana: Decimal,
    pub expected_gazaana: Decimal,
    pub formula_id: Option<Uuid>,
    pub quantity: Decimal,
    pub rate: Decimal,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
