//! Database seeder for LoomLedger development and testing.
//!
//! Seeds one demo branch: money accounts, a customer and a supplier, a raw
//! product with a purchase lot, opening finished-goods stock and one sale.
//! Everything goes through the repositories so the ledger stays consistent.
//!
//! Usage: cargo run --bin seeder

use anyhow::{Context, Result};
use chrono::NaiveDate;
use loomledger_core::ledger::{Nature, PersonType};
use loomledger_core::stock::{DetailLine, StockKey, TransactionInput};
use loomledger_db::entities::persons;
use loomledger_db::repositories::{
    CreateRawLotInput, CreateRawProductInput, DirectoryRepository, LinkedAccountKind,
    RawLotLineInput, RawStockRepository, SetOpeningStockInput, TransactionRepository,
};
use loomledger_shared::types::{BranchId, ProductId, UserId, WarehouseId};
use loomledger_shared::{AppConfig, RequestContext, Role, telemetry};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter};
use tracing::info;
use uuid::Uuid;

/// Demo branch (consistent for all seeds).
const DEMO_BRANCH_ID: Uuid = Uuid::from_u128(1);
/// Demo user (consistent for all seeds).
const DEMO_USER_ID: Uuid = Uuid::from_u128(2);
/// Demo warehouse for raw and finished stock.
const DEMO_WAREHOUSE_ID: Uuid = Uuid::from_u128(3);
/// Demo finished-goods product.
const DEMO_PRODUCT_ID: Uuid = Uuid::from_u128(4);

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("failed to load configuration")?;
    telemetry::init(&config.logging);

    let db = loomledger_db::connect(&config.database)
        .await
        .context("failed to connect to database")?;

    let ctx = RequestContext::new(
        BranchId::from_uuid(DEMO_BRANCH_ID),
        UserId::from_uuid(DEMO_USER_ID),
        Role::Admin,
    );

    if already_seeded(&db, ctx.branch_id).await? {
        info!(branch = %ctx.branch_id, "demo branch already seeded, skipping");
        return Ok(());
    }

    seed_branch(&db, &ctx).await?;
    info!(branch = %ctx.branch_id, "seeding complete");
    Ok(())
}

async fn already_seeded(db: &DatabaseConnection, branch_id: BranchId) -> Result<bool> {
    let count = persons::Entity::find()
        .filter(persons::Column::BranchId.eq(branch_id.into_inner()))
        .count(db)
        .await?;
    Ok(count > 0)
}

fn date(day: u32) -> Result<NaiveDate> {
    NaiveDate::from_ymd_opt(2026, 1, day).context("invalid seed date")
}

async fn seed_branch(db: &DatabaseConnection, ctx: &RequestContext) -> Result<()> {
    let directory = DirectoryRepository::new(db.clone());
    let raw = RawStockRepository::new(db.clone());
    let transactions = TransactionRepository::new(db.clone());
    let warehouse = WarehouseId::from_uuid(DEMO_WAREHOUSE_ID);

    info!("seeding accounts");
    directory.create_account_type(ctx, "Cash").await?;
    let cheques = directory.create_account_type(ctx, "Cheques in hand").await?;
    directory
        .set_linked_account(ctx, LinkedAccountKind::ChequeAccount, cheques.id.into())
        .await?;

    info!("seeding persons");
    let customer = directory
        .create_person(ctx, "Aslam Traders", PersonType::Customer)
        .await?;
    let supplier = directory
        .create_person(ctx, "Faisal Yarn Mills", PersonType::Supplier)
        .await?;

    info!("seeding raw stock");
    let greige = directory
        .create_raw_product(
            ctx,
            CreateRawProductInput {
                name: "Greige lawn 60x60".to_string(),
                product_glue: None,
                product_type: Some("lawn".to_string()),
            },
        )
        .await?;
    let lot = raw
        .create_raw_lot(
            ctx,
            CreateRawLotInput {
                person_id: supplier.id.into(),
                date: date(5)?,
                issued: false,
                dying_unit_id: None,
                lot_number: None,
                lines: vec![RawLotLineInput {
                    raw_product_id: greige.id.into(),
                    warehouse_id: Some(warehouse),
                    actual_gazaana: dec!(98),
                    expected_gazaana: dec!(100),
                    formula_id: None,
                    quantity: dec!(1200),
                    rate: dec!(85),
                }],
            },
        )
        .await?;
    info!(lot = lot.lot_number, "raw lot created");

    info!("seeding finished goods");
    let key = StockKey {
        product_id: ProductId::from_uuid(DEMO_PRODUCT_ID),
        warehouse_id: warehouse,
        yards_per_piece: dec!(40),
    };
    transactions
        .set_opening_stock(
            ctx,
            SetOpeningStockInput {
                key,
                quantity: dec!(150),
                rate: dec!(1800),
            },
        )
        .await?;
    transactions
        .post_transaction(
            ctx,
            TransactionInput {
                person_id: customer.id.into(),
                nature: Nature::Debit,
                date: date(12)?,
                details: vec![DetailLine {
                    id: None,
                    key,
                    quantity: dec!(20),
                    rate: dec!(2400),
                }],
                discount: dec!(1000),
                paid: false,
                paid_account_id: None,
                paid_amount: Decimal::ZERO,
            },
        )
        .await?;

    Ok(())
}
