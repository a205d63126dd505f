//! Integration tests for the raw lot chain.

mod common;

use loomledger_core::ledger::{LedgerFilter, Nature};
use loomledger_core::raw::{LotLine, PricedLine, RawDebitType, RawStockError};
use loomledger_db::RepoError;
use loomledger_db::repositories::{
    CreateDyingIssueInput, CreateRawDebitInput, CreateRawLotInput, CreateRawProductInput,
    CreateRawTransferInput, DirectoryRepository, LedgerRepository, RawLotLineInput,
    RawStockRepository,
};
use loomledger_shared::Role;
use loomledger_shared::types::{DyingUnitId, PersonId, RawProductId, WarehouseId};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use common::{TestBranch, day, setup};

async fn raw_product(branch: &TestBranch, name: &str) -> RawProductId {
    DirectoryRepository::new(branch.db.clone())
        .create_raw_product(
            &branch.ctx,
            CreateRawProductInput {
                name: name.to_string(),
                product_glue: Some("A".to_string()),
                product_type: Some("Greige".to_string()),
            },
        )
        .await
        .unwrap()
        .id
        .into()
}

fn lot_input(
    person_id: PersonId,
    raw_product_id: RawProductId,
    warehouse_id: WarehouseId,
    quantity: Decimal,
) -> CreateRawLotInput {
    CreateRawLotInput {
        person_id,
        date: day(1),
        issued: false,
        dying_unit_id: None,
        lot_number: None,
        lines: vec![RawLotLineInput {
            raw_product_id,
            warehouse_id: Some(warehouse_id),
            actual_gazaana: dec!(36),
            expected_gazaana: dec!(40),
            formula_id: None,
            quantity,
            rate: dec!(10),
        }],
    }
}

fn lot_line(
    lot_number: i64,
    raw_product_id: RawProductId,
    warehouse_id: Option<WarehouseId>,
    quantity: Decimal,
) -> LotLine {
    LotLine {
        lot_number,
        raw_product_id,
        warehouse_id,
        actual_gazaana: dec!(36),
        expected_gazaana: dec!(40),
        formula_id: None,
        quantity,
    }
}

fn debit(
    person_id: PersonId,
    debit_type: RawDebitType,
    lines: Vec<LotLine>,
) -> CreateRawDebitInput {
    CreateRawDebitInput {
        person_id,
        debit_type,
        date: day(3),
        lines: lines
            .into_iter()
            .map(|line| PricedLine {
                line,
                rate: dec!(12),
            })
            .collect(),
    }
}

#[tokio::test]
async fn test_position_nets_every_event_kind() {
    let branch = setup().await;
    let repo = RawStockRepository::new(branch.db.clone());
    let ledger = LedgerRepository::new(branch.db.clone());
    let product = raw_product(&branch, "Cotton 60s").await;
    let (main, annex) = (WarehouseId::new(), WarehouseId::new());

    let lot = repo
        .create_raw_lot(&branch.ctx, lot_input(branch.supplier, product, main, dec!(100)))
        .await
        .unwrap();
    assert_eq!(lot.lot_number, 1);
    let n = lot.lot_number;

    repo.create_raw_debit(
        &branch.ctx,
        debit(branch.customer, RawDebitType::Sale, vec![lot_line(n, product, Some(main), dec!(30))]),
    )
    .await
    .unwrap();
    repo.create_raw_transfer(
        &branch.ctx,
        CreateRawTransferInput {
            to_warehouse_id: annex,
            date: day(4),
            lines: vec![lot_line(n, product, Some(main), dec!(20))],
        },
    )
    .await
    .unwrap();
    repo.create_dying_issue(
        &branch.ctx,
        CreateDyingIssueInput {
            dying_unit_id: DyingUnitId::new(),
            date: day(5),
            lines: vec![lot_line(n, product, Some(annex), dec!(10))],
        },
    )
    .await
    .unwrap();
    repo.create_raw_debit(
        &branch.ctx,
        debit(
            branch.customer,
            RawDebitType::SaleReturn,
            vec![lot_line(n, product, Some(main), dec!(5))],
        ),
    )
    .await
    .unwrap();

    let rows = repo.lot_position(&branch.ctx, n).await.unwrap();
    assert_eq!(rows.len(), 2);
    let at = |w: WarehouseId| {
        rows.iter()
            .find(|r| r.key.warehouse_id == Some(w))
            .map(|r| r.quantity)
            .unwrap()
    };
    assert_eq!(at(main), dec!(55));
    assert_eq!(at(annex), dec!(10));
    assert_eq!(rows[0].product_glue.as_deref(), Some("A"));
    assert!(repo.validate_inventory(&branch.ctx).await.unwrap().ok);

    let customer = ledger
        .totals_by_nature(
            &branch.ctx,
            &LedgerFilter {
                person_id: Some(branch.customer),
                ..LedgerFilter::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(customer.debit_total, dec!(360));
    assert_eq!(customer.credit_total, dec!(60));

    let supplier = ledger
        .totals_by_nature(
            &branch.ctx,
            &LedgerFilter {
                person_id: Some(branch.supplier),
                ..LedgerFilter::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(supplier.credit_total, dec!(1000));
}

#[tokio::test]
async fn test_low_stock_rolls_back_whole_batch() {
    let branch = setup().await;
    let repo = RawStockRepository::new(branch.db.clone());
    let ledger = LedgerRepository::new(branch.db.clone());
    let product = raw_product(&branch, "Polyester").await;
    let warehouse = WarehouseId::new();

    let lot = repo
        .create_raw_lot(&branch.ctx, lot_input(branch.supplier, product, warehouse, dec!(10)))
        .await
        .unwrap();

    let err = repo
        .create_raw_debit(
            &branch.ctx,
            debit(
                branch.customer,
                RawDebitType::Sale,
                vec![
                    lot_line(lot.lot_number, product, Some(warehouse), dec!(6)),
                    lot_line(lot.lot_number, product, Some(warehouse), dec!(6)),
                ],
            ),
        )
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        RepoError::RawStock(RawStockError::LowStock { lot_number, .. }) if lot_number == lot.lot_number
    ));

    let position = repo.current_position(&branch.ctx).await.unwrap();
    assert_eq!(position.len(), 1);
    assert_eq!(position[0].quantity, dec!(10));
    let rows = ledger.list(&branch.ctx, &LedgerFilter::default()).await.unwrap();
    assert_eq!(rows.len(), 1);

    let accepted = repo
        .create_raw_debit(
            &branch.ctx,
            debit(
                branch.customer,
                RawDebitType::Sale,
                vec![lot_line(lot.lot_number, product, Some(warehouse), dec!(10))],
            ),
        )
        .await
        .unwrap();
    assert_eq!(accepted.serial, 1);
}

#[tokio::test]
async fn test_purchase_return_must_go_back_to_supplier() {
    let branch = setup().await;
    let repo = RawStockRepository::new(branch.db.clone());
    let product = raw_product(&branch, "Viscose").await;
    let warehouse = WarehouseId::new();

    let lot = repo
        .create_raw_lot(&branch.ctx, lot_input(branch.supplier, product, warehouse, dec!(40)))
        .await
        .unwrap();
    let lines = vec![lot_line(lot.lot_number, product, Some(warehouse), dec!(15))];

    let err = repo
        .create_raw_debit(
            &branch.ctx,
            debit(branch.customer, RawDebitType::PurchaseReturn, lines.clone()),
        )
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        RepoError::RawStock(RawStockError::LotOwnerMismatch { .. })
    ));

    repo.create_raw_debit(
        &branch.ctx,
        debit(branch.supplier, RawDebitType::PurchaseReturn, lines),
    )
    .await
    .unwrap();
    let rows = repo.lot_position(&branch.ctx, lot.lot_number).await.unwrap();
    assert_eq!(rows[0].quantity, dec!(25));
}

#[tokio::test]
async fn test_sale_of_unknown_lot_rejected() {
    let branch = setup().await;
    let repo = RawStockRepository::new(branch.db.clone());
    let product = raw_product(&branch, "Linen").await;

    let err = repo
        .create_raw_debit(
            &branch.ctx,
            debit(
                branch.customer,
                RawDebitType::SaleReturn,
                vec![lot_line(77, product, Some(WarehouseId::new()), dec!(1))],
            ),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::RawStock(RawStockError::UnknownLot(77))));
    assert_eq!(err.http_status_code(), 404);
}

#[tokio::test]
async fn test_explicit_lot_numbers_advance_the_counter() {
    let branch = setup().await;
    let repo = RawStockRepository::new(branch.db.clone());
    let product = raw_product(&branch, "Wool").await;
    let warehouse = WarehouseId::new();

    let imported = repo
        .create_raw_lot(
            &branch.ctx,
            CreateRawLotInput {
                lot_number: Some(500),
                ..lot_input(branch.supplier, product, warehouse, dec!(5))
            },
        )
        .await
        .unwrap();
    assert_eq!(imported.lot_number, 500);

    let err = repo
        .create_raw_lot(
            &branch.ctx,
            CreateRawLotInput {
                lot_number: Some(500),
                ..lot_input(branch.supplier, product, warehouse, dec!(5))
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        RepoError::RawStock(RawStockError::DuplicateLotNumber(500))
    ));

    let next = repo
        .create_raw_lot(&branch.ctx, lot_input(branch.supplier, product, warehouse, dec!(5)))
        .await
        .unwrap();
    assert_eq!(next.lot_number, 501);
}

#[tokio::test]
async fn test_issued_lot_needs_dying_unit_and_no_warehouse() {
    let branch = setup().await;
    let repo = RawStockRepository::new(branch.db.clone());
    let product = raw_product(&branch, "Rayon").await;

    let mut input = lot_input(branch.supplier, product, WarehouseId::new(), dec!(5));
    input.issued = true;
    input.dying_unit_id = Some(DyingUnitId::new());
    let err = repo.create_raw_lot(&branch.ctx, input.clone()).await.unwrap_err();
    assert!(matches!(
        err,
        RepoError::RawStock(RawStockError::WarehouseNotAllowed(_))
    ));

    input.lines[0].warehouse_id = None;
    let lot = repo.create_raw_lot(&branch.ctx, input).await.unwrap();
    assert!(lot.issued);
    let rows = repo.lot_position(&branch.ctx, lot.lot_number).await.unwrap();
    assert_eq!(rows[0].key.warehouse_id, None);
}

#[tokio::test]
async fn test_transfer_rules() {
    let branch = setup().await;
    let repo = RawStockRepository::new(branch.db.clone());
    let product = raw_product(&branch, "Silk").await;
    let warehouse = WarehouseId::new();
    let lot = repo
        .create_raw_lot(&branch.ctx, lot_input(branch.supplier, product, warehouse, dec!(8)))
        .await
        .unwrap();

    let same = repo
        .create_raw_transfer(
            &branch.ctx,
            CreateRawTransferInput {
                to_warehouse_id: warehouse,
                date: day(2),
                lines: vec![lot_line(lot.lot_number, product, Some(warehouse), dec!(1))],
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(same, RepoError::RawStock(RawStockError::SameWarehouse(_))));

    let unplaced = repo
        .create_raw_transfer(
            &branch.ctx,
            CreateRawTransferInput {
                to_warehouse_id: WarehouseId::new(),
                date: day(2),
                lines: vec![lot_line(lot.lot_number, product, None, dec!(1))],
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(
        unplaced,
        RepoError::RawStock(RawStockError::WarehouseRequired(_))
    ));

    let too_much = repo
        .create_raw_transfer(
            &branch.ctx,
            CreateRawTransferInput {
                to_warehouse_id: WarehouseId::new(),
                date: day(2),
                lines: vec![lot_line(lot.lot_number, product, Some(warehouse), dec!(9))],
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(too_much, RepoError::RawStock(RawStockError::LowStock { .. })));
}

#[tokio::test]
async fn test_dye_issue_product_must_belong_to_lot() {
    let branch = setup().await;
    let repo = RawStockRepository::new(branch.db.clone());
    let bought = raw_product(&branch, "Cotton 40s").await;
    let other = raw_product(&branch, "Cotton 80s").await;
    let warehouse = WarehouseId::new();
    let lot = repo
        .create_raw_lot(&branch.ctx, lot_input(branch.supplier, bought, warehouse, dec!(8)))
        .await
        .unwrap();

    let err = repo
        .create_dying_issue(
            &branch.ctx,
            CreateDyingIssueInput {
                dying_unit_id: DyingUnitId::new(),
                date: day(2),
                lines: vec![lot_line(lot.lot_number, other, Some(warehouse), dec!(1))],
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        RepoError::RawStock(RawStockError::ProductNotInLot { .. })
    ));

    let over = repo
        .create_dying_issue(
            &branch.ctx,
            CreateDyingIssueInput {
                dying_unit_id: DyingUnitId::new(),
                date: day(2),
                lines: vec![lot_line(lot.lot_number, bought, Some(warehouse), dec!(9))],
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(over, RepoError::RawStock(RawStockError::NegativeStock { .. })));
    assert_eq!(over.http_status_code(), 409);
}

#[tokio::test]
async fn test_deleting_consumed_lot_rejected() {
    let branch = setup().await;
    let repo = RawStockRepository::new(branch.db.clone());
    let ledger = LedgerRepository::new(branch.db.clone());
    let product = raw_product(&branch, "Denim").await;
    let warehouse = WarehouseId::new();

    let lot = repo
        .create_raw_lot(&branch.ctx, lot_input(branch.supplier, product, warehouse, dec!(10)))
        .await
        .unwrap();
    let sale = repo
        .create_raw_debit(
            &branch.ctx,
            debit(
                branch.customer,
                RawDebitType::Sale,
                vec![lot_line(lot.lot_number, product, Some(warehouse), dec!(4))],
            ),
        )
        .await
        .unwrap();

    let err = repo.delete_raw_lot(&branch.ctx, lot.id.into()).await.unwrap_err();
    assert!(matches!(err, RepoError::RawStock(RawStockError::NegativeStock { .. })));

    repo.delete_raw_debit(&branch.ctx, sale.id.into()).await.unwrap();
    repo.delete_raw_lot(&branch.ctx, lot.id.into()).await.unwrap();

    assert!(repo.current_position(&branch.ctx).await.unwrap().is_empty());
    let rows = ledger.list(&branch.ctx, &LedgerFilter::default()).await.unwrap();
    assert!(rows.is_empty());
}

#[tokio::test]
async fn test_raw_lots_need_manage_permission() {
    let branch = setup().await;
    let repo = RawStockRepository::new(branch.db.clone());
    let product = raw_product(&branch, "Jute").await;

    let err = repo
        .create_raw_lot(
            &branch.as_role(Role::Viewer),
            lot_input(branch.supplier, product, WarehouseId::new(), dec!(3)),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::Forbidden(_)));
    assert_eq!(err.http_status_code(), 403);

    let lot = repo
        .create_raw_lot(
            &branch.as_role(Role::Storekeeper),
            lot_input(branch.supplier, product, WarehouseId::new(), dec!(3)),
        )
        .await
        .unwrap();
    let ledger = LedgerRepository::new(branch.db.clone());
    let rows = ledger.list(&branch.ctx, &LedgerFilter::default()).await.unwrap();
    assert_eq!(rows[0].nature, Nature::Credit);
    assert_eq!(rows[0].amount, dec!(30));
    assert_eq!(lot.lot_number, 1);
}
