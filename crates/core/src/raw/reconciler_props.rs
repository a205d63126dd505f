//! Property-based tests for the raw reconciliation law.
//!
//! For any sequence of purchase, debit, transfer and dye events on one lot
//! key, the computed quantity equals the hand-written signed sum.

use loomledger_shared::types::{FormulaId, RawProductId, WarehouseId};
use proptest::prelude::*;
use rust_decimal::Decimal;
use std::collections::HashMap;

use super::reconciler::RawStockReconciler;
use super::types::{DebitLine, LotLine, RawEvents, TransferLine};
use crate::ledger::Nature;

fn quantity() -> impl Strategy<Value = Decimal> {
    (1i64..100_000i64).prop_map(|q| Decimal::new(q, 2))
}

fn line(product: RawProductId, warehouse: WarehouseId, formula: FormulaId, qty: Decimal) -> LotLine {
    LotLine {
        lot_number: 1,
        raw_product_id: product,
        warehouse_id: Some(warehouse),
        actual_gazaana: Decimal::new(36, 0),
        expected_gazaana: Decimal::new(38, 0),
        formula_id: Some(formula),
        quantity: qty,
    }
}

#[derive(Debug, Clone)]
struct Scenario {
    purchases: Vec<Decimal>,
    debits: Vec<(Decimal, bool)>,
    transfers_out: Vec<Decimal>,
    transfers_in: Vec<Decimal>,
    dyes: Vec<Decimal>,
}

fn scenario() -> impl Strategy<Value = Scenario> {
    (
        prop::collection::vec(quantity(), 0..6),
        prop::collection::vec((quantity(), any::<bool>()), 0..6),
        prop::collection::vec(quantity(), 0..4),
        prop::collection::vec(quantity(), 0..4),
        prop::collection::vec(quantity(), 0..4),
    )
        .prop_map(|(purchases, debits, transfers_out, transfers_in, dyes)| Scenario {
            purchases,
            debits,
            transfers_out,
            transfers_in,
            dyes,
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Position at one key equals purchases - debit(Debit) + debit(Credit)
    /// + transfer-in - transfer-out - dye.
    #[test]
    fn prop_reconciliation_law(s in scenario()) {
        let product = RawProductId::new();
        let formula = FormulaId::new();
        let here = WarehouseId::new();
        let elsewhere = WarehouseId::new();

        let events = RawEvents {
            purchases: s.purchases.iter().map(|q| line(product, here, formula, *q)).collect(),
            debits: s.debits.iter().map(|(q, credit)| DebitLine {
                line: line(product, here, formula, *q),
                nature: if *credit { Nature::Credit } else { Nature::Debit },
            }).collect(),
            transfers: s.transfers_out.iter().map(|q| TransferLine {
                line: line(product, here, formula, *q),
                to_warehouse_id: elsewhere,
            }).chain(s.transfers_in.iter().map(|q| TransferLine {
                line: line(product, elsewhere, formula, *q),
                to_warehouse_id: here,
            })).collect(),
            dye_issues: s.dyes.iter().map(|q| line(product, here, formula, *q)).collect(),
        };

        let expected: Decimal = s.purchases.iter().copied().sum::<Decimal>()
            - s.debits.iter().filter(|(_, c)| !c).map(|(q, _)| *q).sum::<Decimal>()
            + s.debits.iter().filter(|(_, c)| *c).map(|(q, _)| *q).sum::<Decimal>()
            + s.transfers_in.iter().copied().sum::<Decimal>()
            - s.transfers_out.iter().copied().sum::<Decimal>()
            - s.dyes.iter().copied().sum::<Decimal>();

        let position = RawStockReconciler::current_position(&events, &HashMap::new());
        let actual: Decimal = position
            .iter()
            .filter(|r| r.key.warehouse_id == Some(here))
            .map(|r| r.quantity)
            .sum();
        prop_assert_eq!(actual, expected);
    }

    /// Transfers never create or destroy quantity across warehouses.
    #[test]
    fn prop_transfers_conserve_total(purchase in quantity(), moves in prop::collection::vec(quantity(), 0..8)) {
        let product = RawProductId::new();
        let formula = FormulaId::new();
        let a = WarehouseId::new();
        let b = WarehouseId::new();

        let events = RawEvents {
            purchases: vec![line(product, a, formula, purchase)],
            transfers: moves.iter().enumerate().map(|(i, q)| {
                let (from, to) = if i % 2 == 0 { (a, b) } else { (b, a) };
                TransferLine { line: line(product, from, formula, *q), to_warehouse_id: to }
            }).collect(),
            ..RawEvents::default()
        };

        let total: Decimal = RawStockReconciler::current_position(&events, &HashMap::new())
            .iter()
            .map(|r| r.quantity)
            .sum();
        prop_assert_eq!(total, purchase);
    }
}
