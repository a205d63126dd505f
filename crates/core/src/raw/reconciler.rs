//! Raw lot stock reconciliation.
//!
//! Raw stock is never stored. It is recomputed from the four event tables
//! (purchases, debits, transfers, dye issues) by normalizing every line into
//! a signed [`LotMovement`] and summing per [`LotKey`].
//!
//! Mutating batches are checked twice: [`RawStockReconciler::check_stock`]
//! before writing, scoped to the lines being touched, and
//! [`RawStockReconciler::validate_inventory`] after writing, over the whole
//! branch, because one batch can reduce one group and add to another.

use loomledger_shared::types::{PersonId, RawProductId, WarehouseId};
use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashMap, HashSet};

use super::error::RawStockError;
use super::types::{
    InventoryCheck, LotKey, LotLine, LotMovement, MovementSource, PositionRow, PricedLine,
    RawEvents, RawProductInfo,
};
use crate::ledger::Nature;

/// Stateless raw stock projection.
pub struct RawStockReconciler;

impl RawStockReconciler {
    /// Normalizes every event line into signed movements.
    ///
    /// A transfer line yields two movements: a debit at its source warehouse
    /// and a credit at the destination.
    #[must_use]
    pub fn normalize(events: &RawEvents) -> Vec<LotMovement> {
        let mut movements = Vec::with_capacity(
            events.purchases.len()
                + events.debits.len()
                + events.transfers.len() * 2
                + events.dye_issues.len(),
        );

        movements.extend(events.purchases.iter().map(|line| LotMovement {
            key: line.key(),
            nature: Nature::Credit,
            quantity: line.quantity,
            source: MovementSource::Purchase,
        }));

        movements.extend(events.debits.iter().map(|debit| LotMovement {
            key: debit.line.key(),
            nature: debit.nature,
            quantity: debit.line.quantity,
            source: MovementSource::Debit,
        }));

        for transfer in &events.transfers {
            let from = transfer.line.key();
            let to = LotKey {
                warehouse_id: Some(transfer.to_warehouse_id),
                ..from
            };
            movements.push(LotMovement {
                key: from,
                nature: Nature::Debit,
                quantity: transfer.line.quantity,
                source: MovementSource::TransferOut,
            });
            movements.push(LotMovement {
                key: to,
                nature: Nature::Credit,
                quantity: transfer.line.quantity,
                source: MovementSource::TransferIn,
            });
        }

        movements.extend(events.dye_issues.iter().map(|line| LotMovement {
            key: line.key(),
            nature: Nature::Debit,
            quantity: line.quantity,
            source: MovementSource::DyeIssue,
        }));

        movements
    }

    /// Current raw inventory, one row per key, ordered by lot number.
    ///
    /// Groups that net to zero are kept so a fully consumed lot still shows.
    #[must_use]
    pub fn current_position(
        events: &RawEvents,
        products: &HashMap<RawProductId, RawProductInfo>,
    ) -> Vec<PositionRow> {
        let mut grouped: BTreeMap<LotKey, Decimal> = BTreeMap::new();
        for movement in Self::normalize(events) {
            *grouped.entry(movement.key).or_default() += movement.signed_quantity();
        }

        grouped
            .into_iter()
            .map(|(key, quantity)| {
                let info = products.get(&key.raw_product_id);
                PositionRow {
                    key,
                    product_glue: info.and_then(|i| i.product_glue.clone()),
                    product_type: info.and_then(|i| i.product_type.clone()),
                    quantity,
                }
            })
            .collect()
    }

    /// Rows of one lot.
    #[must_use]
    pub fn lot_position(position: &[PositionRow], lot_number: i64) -> Vec<PositionRow> {
        position
            .iter()
            .filter(|row| row.key.lot_number == lot_number)
            .cloned()
            .collect()
    }

    /// Checks the whole position, reporting the first negative group.
    #[must_use]
    pub fn inventory_status(position: &[PositionRow]) -> InventoryCheck {
        match Self::validate_inventory(position) {
            Ok(()) => InventoryCheck {
                ok: true,
                message: String::new(),
            },
            Err(err) => InventoryCheck {
                ok: false,
                message: err.to_string(),
            },
        }
    }

    /// Fails on the first group with a negative quantity.
    ///
    /// # Errors
    ///
    /// Returns [`RawStockError::NegativeStock`] naming the lot.
    pub fn validate_inventory(position: &[PositionRow]) -> Result<(), RawStockError> {
        match position.iter().find(|row| row.quantity < Decimal::ZERO) {
            Some(row) => Err(RawStockError::NegativeStock {
                lot_number: row.key.lot_number,
                quantity: row.quantity,
            }),
            None => Ok(()),
        }
    }

    /// Pre-checks lines that are about to leave stock.
    ///
    /// Lines sharing a key are summed first, so two lines of 6 against a
    /// group holding 10 fail. When `required_owner` is set every lot must
    /// have been purchased from that person.
    ///
    /// # Errors
    ///
    /// - [`RawStockError::EmptyBatch`] if there are no lines
    /// - [`RawStockError::InvalidQuantity`] on a non-positive quantity
    /// - [`RawStockError::UnknownLot`] if no purchase exists for a lot
    /// - [`RawStockError::LotOwnerMismatch`] if the owner differs
    /// - [`RawStockError::LowStock`] if a group would go negative
    pub fn check_stock(
        proposed: &[LotLine],
        position: &[PositionRow],
        lot_owners: &HashMap<i64, PersonId>,
        required_owner: Option<PersonId>,
    ) -> Result<(), RawStockError> {
        Self::validate_quantities(proposed)?;

        let mut requested: BTreeMap<LotKey, Decimal> = BTreeMap::new();
        for line in proposed {
            *requested.entry(line.key()).or_default() += line.quantity;
        }

        for (key, requested) in requested {
            let owner = lot_owners
                .get(&key.lot_number)
                .ok_or(RawStockError::UnknownLot(key.lot_number))?;
            if required_owner.is_some_and(|p| p != *owner) {
                return Err(RawStockError::LotOwnerMismatch {
                    lot_number: key.lot_number,
                });
            }

            let available = position
                .iter()
                .find(|row| row.key == key)
                .map_or(Decimal::ZERO, |row| row.quantity);
            if requested > available {
                return Err(RawStockError::LowStock {
                    lot_number: key.lot_number,
                    requested,
                    available,
                });
            }
        }
        Ok(())
    }

    /// Validates the lines of a new purchase lot.
    ///
    /// # Errors
    ///
    /// - [`RawStockError::EmptyBatch`] if there are no lines
    /// - [`RawStockError::DyingUnitRequired`] for an issued lot without a unit
    /// - [`RawStockError::WarehouseNotAllowed`] for an issued lot line with a warehouse
    /// - [`RawStockError::WarehouseRequired`] for a stocked lot line without one
    /// - [`RawStockError::InvalidQuantity`] / [`RawStockError::NegativeRate`]
    pub fn validate_purchase(
        lot_number: i64,
        issued: bool,
        has_dying_unit: bool,
        lines: &[PricedLine],
    ) -> Result<(), RawStockError> {
        if lines.is_empty() {
            return Err(RawStockError::EmptyBatch);
        }
        if issued && !has_dying_unit {
            return Err(RawStockError::DyingUnitRequired(lot_number));
        }
        for priced in lines {
            match (issued, priced.line.warehouse_id) {
                (true, Some(_)) => return Err(RawStockError::WarehouseNotAllowed(lot_number)),
                (false, None) => return Err(RawStockError::WarehouseRequired(lot_number)),
                _ => {}
            }
        }
        Self::validate_priced(lines)
    }

    /// Validates positive quantities and non-negative rates.
    ///
    /// # Errors
    ///
    /// - [`RawStockError::EmptyBatch`] if there are no lines
    /// - [`RawStockError::InvalidQuantity`] / [`RawStockError::NegativeRate`]
    pub fn validate_priced(lines: &[PricedLine]) -> Result<(), RawStockError> {
        if lines.is_empty() {
            return Err(RawStockError::EmptyBatch);
        }
        for priced in lines {
            if priced.line.quantity <= Decimal::ZERO {
                return Err(RawStockError::InvalidQuantity(priced.line.quantity));
            }
            if priced.rate < Decimal::ZERO {
                return Err(RawStockError::NegativeRate(priced.rate));
            }
        }
        Ok(())
    }

    /// Validates the lines of a warehouse transfer.
    ///
    /// # Errors
    ///
    /// - [`RawStockError::EmptyBatch`] / [`RawStockError::InvalidQuantity`]
    /// - [`RawStockError::SameWarehouse`] if a line moves to where it already is
    pub fn validate_transfer(
        lines: &[LotLine],
        to_warehouse_id: WarehouseId,
    ) -> Result<(), RawStockError> {
        Self::validate_quantities(lines)?;
        match lines.iter().find(|l| l.warehouse_id == Some(to_warehouse_id)) {
            Some(line) => Err(RawStockError::SameWarehouse(line.lot_number)),
            None => Ok(()),
        }
    }

    /// Checks that every dye line names a raw product the lot was bought with.
    ///
    /// `lot_products` maps each lot number to the raw products on its purchase.
    ///
    /// # Errors
    ///
    /// - [`RawStockError::EmptyBatch`] / [`RawStockError::InvalidQuantity`]
    /// - [`RawStockError::UnknownLot`] if the lot has no purchase
    /// - [`RawStockError::ProductNotInLot`] if the product is foreign to the lot
    pub fn validate_lot_products(
        lines: &[LotLine],
        lot_products: &HashMap<i64, HashSet<RawProductId>>,
    ) -> Result<(), RawStockError> {
        Self::validate_quantities(lines)?;
        for line in lines {
            let products = lot_products
                .get(&line.lot_number)
                .ok_or(RawStockError::UnknownLot(line.lot_number))?;
            if !products.contains(&line.raw_product_id) {
                return Err(RawStockError::ProductNotInLot {
                    lot_number: line.lot_number,
                    raw_product_id: line.raw_product_id.into_inner(),
                });
            }
        }
        Ok(())
    }

    /// Σ `quantity * rate` of a batch.
    #[must_use]
    pub fn batch_amount(lines: &[PricedLine]) -> Decimal {
        lines.iter().map(PricedLine::amount).sum()
    }

    fn validate_quantities(lines: &[LotLine]) -> Result<(), RawStockError> {
        if lines.is_empty() {
            return Err(RawStockError::EmptyBatch);
        }
        match lines.iter().find(|l| l.quantity <= Decimal::ZERO) {
            Some(line) => Err(RawStockError::InvalidQuantity(line.quantity)),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raw::types::{DebitLine, TransferLine};
    use loomledger_shared::types::FormulaId;
    use rust_decimal_macros::dec;

    struct Fixture {
        product: RawProductId,
        formula: FormulaId,
        w1: WarehouseId,
        w2: WarehouseId,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                product: RawProductId::new(),
                formula: FormulaId::new(),
                w1: WarehouseId::new(),
                w2: WarehouseId::new(),
            }
        }

        fn line(&self, lot: i64, warehouse: WarehouseId, quantity: Decimal) -> LotLine {
            LotLine {
                lot_number: lot,
                raw_product_id: self.product,
                warehouse_id: Some(warehouse),
                actual_gazaana: dec!(36),
                expected_gazaana: dec!(38),
                formula_id: Some(self.formula),
                quantity,
            }
        }
    }

    fn quantity_at(position: &[PositionRow], warehouse: WarehouseId) -> Decimal {
        position
            .iter()
            .filter(|r| r.key.warehouse_id == Some(warehouse))
            .map(|r| r.quantity)
            .sum()
    }

    #[test]
    fn test_transfer_moves_quantity_once() {
        let f = Fixture::new();
        let events = RawEvents {
            purchases: vec![f.line(1, f.w1, dec!(100))],
            transfers: vec![TransferLine {
                line: f.line(1, f.w1, dec!(30)),
                to_warehouse_id: f.w2,
            }],
            ..RawEvents::default()
        };

        let movements = RawStockReconciler::normalize(&events);
        assert_eq!(movements.len(), 3);

        let position = RawStockReconciler::current_position(&events, &HashMap::new());
        assert_eq!(quantity_at(&position, f.w1), dec!(70));
        assert_eq!(quantity_at(&position, f.w2), dec!(30));
        let total: Decimal = position.iter().map(|r| r.quantity).sum();
        assert_eq!(total, dec!(100));
    }

    #[test]
    fn test_debit_nature_and_dye_issue() {
        let f = Fixture::new();
        let events = RawEvents {
            purchases: vec![f.line(1, f.w1, dec!(100))],
            debits: vec![
                DebitLine {
                    line: f.line(1, f.w1, dec!(40)),
                    nature: Nature::Debit,
                },
                DebitLine {
                    line: f.line(1, f.w1, dec!(5)),
                    nature: Nature::Credit,
                },
            ],
            dye_issues: vec![f.line(1, f.w1, dec!(15))],
            ..RawEvents::default()
        };
        let position = RawStockReconciler::current_position(&events, &HashMap::new());
        assert_eq!(position.len(), 1);
        assert_eq!(position[0].quantity, dec!(50));
    }

    #[test]
    fn test_gazaana_splits_groups() {
        let f = Fixture::new();
        let mut other = f.line(1, f.w1, dec!(10));
        other.actual_gazaana = dec!(40);
        let events = RawEvents {
            purchases: vec![f.line(1, f.w1, dec!(10)), other],
            ..RawEvents::default()
        };
        let position = RawStockReconciler::current_position(&events, &HashMap::new());
        assert_eq!(position.len(), 2);
    }

    #[test]
    fn test_position_carries_product_attributes() {
        let f = Fixture::new();
        let events = RawEvents {
            purchases: vec![f.line(1, f.w1, dec!(10))],
            ..RawEvents::default()
        };
        let products = HashMap::from([(
            f.product,
            RawProductInfo {
                product_glue: Some("G2".into()),
                product_type: Some("cotton".into()),
            },
        )]);
        let position = RawStockReconciler::current_position(&events, &products);
        assert_eq!(position[0].product_glue.as_deref(), Some("G2"));
        assert_eq!(position[0].product_type.as_deref(), Some("cotton"));
    }

    #[test]
    fn test_validate_inventory_names_lot() {
        let f = Fixture::new();
        let events = RawEvents {
            purchases: vec![f.line(7, f.w1, dec!(10))],
            dye_issues: vec![f.line(7, f.w1, dec!(11))],
            ..RawEvents::default()
        };
        let position = RawStockReconciler::current_position(&events, &HashMap::new());
        let err = RawStockReconciler::validate_inventory(&position).unwrap_err();
        assert_eq!(err.to_string(), "Low stock for lot # 7");

        let status = RawStockReconciler::inventory_status(&position);
        assert!(!status.ok);
        assert_eq!(status.message, "Low stock for lot # 7");
    }

    #[test]
    fn test_check_stock_sums_lines_per_key() {
        let f = Fixture::new();
        let supplier = PersonId::new();
        let events = RawEvents {
            purchases: vec![f.line(3, f.w1, dec!(10))],
            ..RawEvents::default()
        };
        let position = RawStockReconciler::current_position(&events, &HashMap::new());
        let owners = HashMap::from([(3, supplier)]);

        let ok = [f.line(3, f.w1, dec!(4)), f.line(3, f.w1, dec!(6))];
        assert!(RawStockReconciler::check_stock(&ok, &position, &owners, None).is_ok());

        let too_much = [f.line(3, f.w1, dec!(6)), f.line(3, f.w1, dec!(6))];
        match RawStockReconciler::check_stock(&too_much, &position, &owners, None) {
            Err(RawStockError::LowStock {
                lot_number,
                requested,
                available,
            }) => {
                assert_eq!(lot_number, 3);
                assert_eq!(requested, dec!(12));
                assert_eq!(available, dec!(10));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_check_stock_owner_and_unknown_lot() {
        let f = Fixture::new();
        let supplier = PersonId::new();
        let events = RawEvents {
            purchases: vec![f.line(3, f.w1, dec!(10))],
            ..RawEvents::default()
        };
        let position = RawStockReconciler::current_position(&events, &HashMap::new());
        let owners = HashMap::from([(3, supplier)]);

        assert!(matches!(
            RawStockReconciler::check_stock(
                &[f.line(3, f.w1, dec!(1))],
                &position,
                &owners,
                Some(PersonId::new())
            ),
            Err(RawStockError::LotOwnerMismatch { lot_number: 3 })
        ));
        assert!(
            RawStockReconciler::check_stock(
                &[f.line(3, f.w1, dec!(1))],
                &position,
                &owners,
                Some(supplier)
            )
            .is_ok()
        );
        assert!(matches!(
            RawStockReconciler::check_stock(&[f.line(9, f.w1, dec!(1))], &position, &owners, None),
            Err(RawStockError::UnknownLot(9))
        ));
    }

    #[test]
    fn test_check_stock_wrong_warehouse_has_nothing() {
        let f = Fixture::new();
        let events = RawEvents {
            purchases: vec![f.line(3, f.w1, dec!(10))],
            ..RawEvents::default()
        };
        let position = RawStockReconciler::current_position(&events, &HashMap::new());
        let owners = HashMap::from([(3, PersonId::new())]);
        assert!(matches!(
            RawStockReconciler::check_stock(&[f.line(3, f.w2, dec!(1))], &position, &owners, None),
            Err(RawStockError::LowStock { available, .. }) if available == Decimal::ZERO
        ));
    }

    #[test]
    fn test_validate_purchase_warehouse_rules() {
        let f = Fixture::new();
        let stocked = PricedLine {
            line: f.line(1, f.w1, dec!(10)),
            rate: dec!(2),
        };
        let issued = PricedLine {
            line: LotLine {
                warehouse_id: None,
                ..stocked.line
            },
            rate: dec!(2),
        };

        assert!(RawStockReconciler::validate_purchase(1, false, false, &[stocked]).is_ok());
        assert!(RawStockReconciler::validate_purchase(1, true, true, &[issued]).is_ok());
        assert!(matches!(
            RawStockReconciler::validate_purchase(1, true, true, &[stocked]),
            Err(RawStockError::WarehouseNotAllowed(1))
        ));
        assert!(matches!(
            RawStockReconciler::validate_purchase(1, false, false, &[issued]),
            Err(RawStockError::WarehouseRequired(1))
        ));
        assert!(matches!(
            RawStockReconciler::validate_purchase(1, true, false, &[issued]),
            Err(RawStockError::DyingUnitRequired(1))
        ));
        assert_eq!(RawStockReconciler::batch_amount(&[stocked, stocked]), dec!(40));
    }

    #[test]
    fn test_validate_transfer_same_warehouse() {
        let f = Fixture::new();
        assert!(matches!(
            RawStockReconciler::validate_transfer(&[f.line(2, f.w1, dec!(1))], f.w1),
            Err(RawStockError::SameWarehouse(2))
        ));
        assert!(RawStockReconciler::validate_transfer(&[f.line(2, f.w1, dec!(1))], f.w2).is_ok());
    }

    #[test]
    fn test_validate_lot_products() {
        let f = Fixture::new();
        let lot_products = HashMap::from([(1, HashSet::from([f.product]))]);
        assert!(
            RawStockReconciler::validate_lot_products(&[f.line(1, f.w1, dec!(1))], &lot_products)
                .is_ok()
        );

        let mut foreign = f.line(1, f.w1, dec!(1));
        foreign.raw_product_id = RawProductId::new();
        assert!(matches!(
            RawStockReconciler::validate_lot_products(&[foreign], &lot_products),
            Err(RawStockError::ProductNotInLot { lot_number: 1, .. })
        ));
    }
}
