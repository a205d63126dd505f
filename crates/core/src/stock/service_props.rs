//! Property-based tests for stock delta algebra.

use loomledger_shared::types::{ProductId, TransactionDetailId, WarehouseId};
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::service::StockService;
use super::types::{DetailLine, StockKey};
use crate::ledger::Nature;

fn quantity() -> impl Strategy<Value = Decimal> {
    (1i64..1_000_000i64).prop_map(|q| Decimal::new(q, 2))
}

fn nature() -> impl Strategy<Value = Nature> {
    prop_oneof![Just(Nature::Debit), Just(Nature::Credit)]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// A kept-line delta equals undoing the old effect and applying the new one.
    #[test]
    fn prop_detail_delta_is_undo_then_apply(
        old_nature in nature(),
        old_qty in quantity(),
        new_nature in nature(),
        new_qty in quantity(),
    ) {
        let expected = StockService::signed_effect(new_nature, new_qty)
            - StockService::signed_effect(old_nature, old_qty);
        prop_assert_eq!(
            StockService::detail_delta(old_nature, old_qty, new_nature, new_qty),
            expected
        );
    }

    /// Posting then deleting leaves every stock row where it was.
    #[test]
    fn prop_post_then_delete_is_identity(
        nature in nature(),
        quantities in prop::collection::vec(quantity(), 1..8),
    ) {
        let key = StockKey {
            product_id: ProductId::new(),
            warehouse_id: WarehouseId::new(),
            yards_per_piece: Decimal::new(10, 0),
        };
        let details: Vec<DetailLine> = quantities
            .iter()
            .map(|q| DetailLine {
                id: Some(TransactionDetailId::new()),
                key,
                quantity: *q,
                rate: Decimal::ONE,
            })
            .collect();

        let post: Decimal = StockService::plan_post(nature, &details).iter().map(|c| c.delta).sum();
        let delete: Decimal = StockService::plan_delete(nature, &details).iter().map(|c| c.delta).sum();
        prop_assert_eq!(post + delete, Decimal::ZERO);
    }

    /// Updating to identical details changes nothing.
    #[test]
    fn prop_identity_update_is_empty(
        nature in nature(),
        quantities in prop::collection::vec(quantity(), 1..8),
    ) {
        let key = StockKey {
            product_id: ProductId::new(),
            warehouse_id: WarehouseId::new(),
            yards_per_piece: Decimal::new(10, 0),
        };
        let details: Vec<DetailLine> = quantities
            .iter()
            .map(|q| DetailLine {
                id: Some(TransactionDetailId::new()),
                key,
                quantity: *q,
                rate: Decimal::ONE,
            })
            .collect();
        let changes = StockService::plan_update(nature, &details, nature, &details).unwrap();
        prop_assert!(changes.is_empty());
    }
}
