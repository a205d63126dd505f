//! `SeaORM` Entity for dying_issue_details table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "dying_issue_details")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub dying_issue_id: Uuid,
    pub lot_number: i64,
    pub raw_product_id: Uuid,
    pub warehouse_id: Option<Uuid>,
    pub actual_gazaana: Decimal,
    pub expected_gazaana: Decimal,
    pub formula_id: Option<Uuid>,
    pub quantity: Decimal,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
