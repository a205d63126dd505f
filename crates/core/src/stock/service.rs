//! Finished-goods stock posting rules.
//!
//! Stock rows are materialized counters. Every post, update and delete is
//! reduced to a list of [`StockChange`]s, one per stock key, which the
//! repository applies under a row lock with [`StockService::apply`].

use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashMap};

use super::error::StockError;
use super::types::{DetailLine, StockChange, StockKey, StockLevel, TransactionInput, TransactionTotals};
use crate::ledger::Nature;

/// Stateless stock rules.
pub struct StockService;

impl StockService {
    /// Validates a transaction and computes its money totals.
    ///
    /// # Errors
    ///
    /// - [`StockError::EmptyTransaction`] if there are no details
    /// - [`StockError::InvalidQuantity`] / [`StockError::NegativeRate`] on a bad line
    /// - [`StockError::NegativeDiscount`] / [`StockError::DiscountExceedsTotal`]
    /// - [`StockError::PaidAccountRequired`] / [`StockError::InvalidPaidAmount`] when paid
    pub fn validate_transaction(input: &TransactionInput) -> Result<TransactionTotals, StockError> {
        if input.details.is_empty() {
            return Err(StockError::EmptyTransaction);
        }
        for line in &input.details {
            if line.quantity <= Decimal::ZERO {
                return Err(StockError::InvalidQuantity(line.quantity));
            }
            if line.rate < Decimal::ZERO {
                return Err(StockError::NegativeRate(line.rate));
            }
        }
        if input.discount < Decimal::ZERO {
            return Err(StockError::NegativeDiscount(input.discount));
        }

        let totals = Self::totals(&input.details, input.discount);
        if totals.discount > totals.gross {
            return Err(StockError::DiscountExceedsTotal {
                discount: totals.discount,
                gross: totals.gross,
            });
        }

        if input.paid {
            if input.paid_account_id.is_none() {
                return Err(StockError::PaidAccountRequired);
            }
            if input.paid_amount <= Decimal::ZERO {
                return Err(StockError::InvalidPaidAmount(input.paid_amount));
            }
        }
        Ok(totals)
    }

    /// Gross, discount and net of a set of details.
    #[must_use]
    pub fn totals(details: &[DetailLine], discount: Decimal) -> TransactionTotals {
        let gross: Decimal = details.iter().map(DetailLine::amount).sum();
        TransactionTotals {
            gross,
            discount,
            net: gross - discount,
        }
    }

    /// Stock effect of one line: credit adds, debit removes.
    #[must_use]
    pub fn signed_effect(nature: Nature, quantity: Decimal) -> Decimal {
        nature.signed(quantity)
    }

    /// Stock change of a kept line whose nature and quantity may both change.
    ///
    /// Same side adjusts by the quantity difference. A flipped side undoes the
    /// old effect and applies the new one, which moves stock by the sum of
    /// both quantities.
    #[must_use]
    pub fn detail_delta(
        old_nature: Nature,
        old_quantity: Decimal,
        new_nature: Nature,
        new_quantity: Decimal,
    ) -> Decimal {
        match (old_nature, new_nature) {
            (Nature::Credit, Nature::Credit) => new_quantity - old_quantity,
            (Nature::Debit, Nature::Debit) => old_quantity - new_quantity,
            (Nature::Credit, Nature::Debit) => -(old_quantity + new_quantity),
            (Nature::Debit, Nature::Credit) => old_quantity + new_quantity,
        }
    }

    /// Stock changes of posting a new transaction.
    #[must_use]
    pub fn plan_post(nature: Nature, details: &[DetailLine]) -> Vec<StockChange> {
        Self::net(
            details
                .iter()
                .map(|d| (d.key, Self::signed_effect(nature, d.quantity))),
        )
    }

    /// Stock changes of deleting a transaction.
    #[must_use]
    pub fn plan_delete(nature: Nature, details: &[DetailLine]) -> Vec<StockChange> {
        Self::net(
            details
                .iter()
                .map(|d| (d.key, -Self::signed_effect(nature, d.quantity))),
        )
    }

    /// Stock changes of replacing a transaction's details.
    ///
    /// New lines carrying an id are kept lines and must match an old line.
    /// Old lines whose id is absent from `new_details` are removed.
    ///
    /// # Errors
    ///
    /// Returns [`StockError::DetailNotFound`] if a kept id is not an old line.
    pub fn plan_update(
        old_nature: Nature,
        old_details: &[DetailLine],
        new_nature: Nature,
        new_details: &[DetailLine],
    ) -> Result<Vec<StockChange>, StockError> {
        let old_by_id: HashMap<_, _> = old_details
            .iter()
            .filter_map(|d| d.id.map(|id| (id, d)))
            .collect();

        let mut changes = Vec::with_capacity(old_details.len() + new_details.len());
        let mut kept = Vec::new();

        for new in new_details {
            match new.id {
                Some(id) => {
                    let old = old_by_id
                        .get(&id)
                        .ok_or(StockError::DetailNotFound(id.into_inner()))?;
                    kept.push(id);
                    if old.key == new.key {
                        changes.push((
                            new.key,
                            Self::detail_delta(old_nature, old.quantity, new_nature, new.quantity),
                        ));
                    } else {
                        changes.push((old.key, -Self::signed_effect(old_nature, old.quantity)));
                        changes.push((new.key, Self::signed_effect(new_nature, new.quantity)));
                    }
                }
                None => changes.push((new.key, Self::signed_effect(new_nature, new.quantity))),
            }
        }

        for old in old_details {
            if old.id.is_none_or(|id| !kept.contains(&id)) {
                changes.push((old.key, -Self::signed_effect(old_nature, old.quantity)));
            }
        }

        Ok(Self::net(changes))
    }

    /// Applies a change to a stock row and returns the new quantity.
    ///
    /// A positive change on a missing row creates it; a negative one fails.
    ///
    /// # Errors
    ///
    /// - [`StockError::StockNotFound`] when consuming from a missing row
    /// - [`StockError::InsufficientStock`] when the row would go negative
    pub fn apply(level: Option<&StockLevel>, change: &StockChange) -> Result<Decimal, StockError> {
        match level {
            None if change.delta < Decimal::ZERO => Err(StockError::StockNotFound {
                product_id: change.key.product_id.into_inner(),
                warehouse_id: change.key.warehouse_id.into_inner(),
            }),
            None => Ok(change.delta),
            Some(level) => {
                let requested = -change.delta;
                if Self::is_low_quantity(level.stock_quantity, requested) {
                    return Err(StockError::InsufficientStock {
                        product_id: change.key.product_id.into_inner(),
                        warehouse_id: change.key.warehouse_id.into_inner(),
                        available: level.stock_quantity,
                        requested,
                    });
                }
                Ok(level.stock_quantity + change.delta)
            }
        }
    }

    /// True when taking `requested` out of `available` would go negative.
    #[must_use]
    pub fn is_low_quantity(available: Decimal, requested: Decimal) -> bool {
        available - requested < Decimal::ZERO
    }

    /// Change to `stock_quantity` when the opening quantity is reset.
    #[must_use]
    pub fn opening_delta(old_opening: Decimal, new_opening: Decimal) -> Decimal {
        new_opening - old_opening
    }

    fn net(changes: impl IntoIterator<Item = (StockKey, Decimal)>) -> Vec<StockChange> {
        let mut grouped: BTreeMap<StockKey, Decimal> = BTreeMap::new();
        for (key, delta) in changes {
            *grouped.entry(key).or_default() += delta;
        }
        grouped
            .into_iter()
            .filter(|(_, delta)| !delta.is_zero())
            .map(|(key, delta)| StockChange { key, delta })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use loomledger_shared::types::{
        AccountTypeId, PersonId, ProductId, StockId, TransactionDetailId, WarehouseId,
    };
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn key() -> StockKey {
        StockKey {
            product_id: ProductId::new(),
            warehouse_id: WarehouseId::new(),
            yards_per_piece: dec!(10),
        }
    }

    fn line(key: StockKey, quantity: Decimal) -> DetailLine {
        DetailLine {
            id: Some(TransactionDetailId::new()),
            key,
            quantity,
            rate: dec!(100),
        }
    }

    fn level(key: StockKey, quantity: Decimal) -> StockLevel {
        StockLevel {
            id: StockId::new(),
            key,
            stock_quantity: quantity,
            opening_stock: Decimal::ZERO,
            opening_stock_rate: Decimal::ZERO,
        }
    }

    fn input(details: Vec<DetailLine>) -> TransactionInput {
        TransactionInput {
            person_id: PersonId::new(),
            nature: Nature::Debit,
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            details,
            discount: Decimal::ZERO,
            paid: false,
            paid_account_id: None,
            paid_amount: Decimal::ZERO,
        }
    }

    #[rstest]
    #[case(Nature::Credit, dec!(5), Nature::Credit, dec!(8), dec!(3))]
    #[case(Nature::Debit, dec!(5), Nature::Debit, dec!(8), dec!(-3))]
    #[case(Nature::Credit, dec!(5), Nature::Debit, dec!(8), dec!(-13))]
    #[case(Nature::Debit, dec!(5), Nature::Credit, dec!(8), dec!(13))]
    fn test_detail_delta_combinations(
        #[case] old_nature: Nature,
        #[case] old_quantity: Decimal,
        #[case] new_nature: Nature,
        #[case] new_quantity: Decimal,
        #[case] expected: Decimal,
    ) {
        assert_eq!(
            StockService::detail_delta(old_nature, old_quantity, new_nature, new_quantity),
            expected
        );
    }

    #[test]
    fn test_sale_consumes_all_then_fails() {
        let k = key();
        let sale = StockService::plan_post(Nature::Debit, &[line(k, dec!(10))]);
        assert_eq!(sale.len(), 1);
        let after = StockService::apply(Some(&level(k, dec!(10))), &sale[0]).unwrap();
        assert_eq!(after, dec!(0));

        let second = StockService::plan_post(Nature::Debit, &[line(k, dec!(1))]);
        assert!(matches!(
            StockService::apply(Some(&level(k, after)), &second[0]),
            Err(StockError::InsufficientStock { .. })
        ));
    }

    #[test]
    fn test_debit_on_missing_row() {
        let k = key();
        let sale = StockService::plan_post(Nature::Debit, &[line(k, dec!(1))]);
        assert!(matches!(
            StockService::apply(None, &sale[0]),
            Err(StockError::StockNotFound { .. })
        ));
        let purchase = StockService::plan_post(Nature::Credit, &[line(k, dec!(4))]);
        assert_eq!(StockService::apply(None, &purchase[0]).unwrap(), dec!(4));
    }

    #[test]
    fn test_post_nets_same_key() {
        let k = key();
        let changes = StockService::plan_post(Nature::Debit, &[line(k, dec!(4)), line(k, dec!(6))]);
        assert_eq!(changes, vec![StockChange { key: k, delta: dec!(-10) }]);
    }

    #[test]
    fn test_update_kept_new_and_removed() {
        let a = key();
        let b = key();
        let kept = line(a, dec!(5));
        let removed = line(b, dec!(2));
        let old = vec![kept, removed];

        let mut kept_new = kept;
        kept_new.quantity = dec!(7);
        let added = DetailLine {
            id: None,
            ..line(b, dec!(3))
        };

        let changes =
            StockService::plan_update(Nature::Debit, &old, Nature::Debit, &[kept_new, added])
                .unwrap();
        let delta_of = |k: StockKey| {
            changes
                .iter()
                .find(|c| c.key == k)
                .map_or(Decimal::ZERO, |c| c.delta)
        };
        assert_eq!(delta_of(a), dec!(-2));
        // removed gives back 2, added takes 3
        assert_eq!(delta_of(b), dec!(-1));
    }

    #[test]
    fn test_update_flip_nature() {
        let a = key();
        let old = line(a, dec!(5));
        let new = DetailLine {
            quantity: dec!(8),
            ..old
        };
        let changes =
            StockService::plan_update(Nature::Credit, &[old], Nature::Debit, &[new]).unwrap();
        assert_eq!(changes, vec![StockChange { key: a, delta: dec!(-13) }]);
    }

    #[test]
    fn test_update_moves_key() {
        let a = key();
        let b = key();
        let old = line(a, dec!(5));
        let new = DetailLine { key: b, ..old };
        let changes =
            StockService::plan_update(Nature::Credit, &[old], Nature::Credit, &[new]).unwrap();
        assert_eq!(changes.len(), 2);
        assert!(changes.contains(&StockChange { key: a, delta: dec!(-5) }));
        assert!(changes.contains(&StockChange { key: b, delta: dec!(5) }));
    }

    #[test]
    fn test_update_unknown_kept_id() {
        let a = key();
        let stranger = line(a, dec!(1));
        assert!(matches!(
            StockService::plan_update(Nature::Debit, &[], Nature::Debit, &[stranger]),
            Err(StockError::DetailNotFound(_))
        ));
    }

    #[test]
    fn test_delete_reverses_post() {
        let a = key();
        let details = [line(a, dec!(3))];
        let post = StockService::plan_post(Nature::Credit, &details);
        let delete = StockService::plan_delete(Nature::Credit, &details);
        assert_eq!(post[0].delta, -delete[0].delta);
    }

    #[test]
    fn test_validate_transaction_totals() {
        let mut tx = input(vec![line(key(), dec!(2)), line(key(), dec!(3))]);
        tx.discount = dec!(50);
        let totals = StockService::validate_transaction(&tx).unwrap();
        assert_eq!(totals.gross, dec!(500));
        assert_eq!(totals.net, dec!(450));
    }

    #[test]
    fn test_validate_transaction_rejections() {
        assert!(matches!(
            StockService::validate_transaction(&input(vec![])),
            Err(StockError::EmptyTransaction)
        ));
        assert!(matches!(
            StockService::validate_transaction(&input(vec![line(key(), dec!(0))])),
            Err(StockError::InvalidQuantity(_))
        ));

        let mut tx = input(vec![line(key(), dec!(1))]);
        tx.discount = dec!(101);
        assert!(matches!(
            StockService::validate_transaction(&tx),
            Err(StockError::DiscountExceedsTotal { .. })
        ));

        let mut tx = input(vec![line(key(), dec!(1))]);
        tx.paid = true;
        assert!(matches!(
            StockService::validate_transaction(&tx),
            Err(StockError::PaidAccountRequired)
        ));
        tx.paid_account_id = Some(AccountTypeId::new());
        assert!(matches!(
            StockService::validate_transaction(&tx),
            Err(StockError::InvalidPaidAmount(_))
        ));
        tx.paid_amount = dec!(100);
        assert!(StockService::validate_transaction(&tx).is_ok());
    }
}
