//! Property-based tests for ledger aggregation.

use chrono::NaiveDate;
use loomledger_shared::types::{BranchId, LedgerEntryId, PersonId};
use proptest::prelude::*;
use rust_decimal::Decimal;
use std::collections::HashMap;

use super::balance::{LedgerBalances, LedgerFilter};
use super::entry::{LedgerEntry, Origin};
use super::types::Nature;

/// Strategy to generate a non-negative amount.
fn amount() -> impl Strategy<Value = Decimal> {
    (0i64..10_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

fn nature() -> impl Strategy<Value = Nature> {
    prop_oneof![Just(Nature::Debit), Just(Nature::Credit)]
}

fn entries(people: Vec<PersonId>) -> impl Strategy<Value = Vec<LedgerEntry>> {
    let count = people.len();
    prop::collection::vec((0..count, nature(), amount(), 1u32..28), 0..40).prop_map(
        move |rows| {
            rows.into_iter()
                .map(|(idx, nature, amount, day)| LedgerEntry {
                    id: LedgerEntryId::new(),
                    branch_id: BranchId::new(),
                    date: NaiveDate::from_ymd_opt(2024, 2, day).unwrap(),
                    amount,
                    nature,
                    person_id: people[idx],
                    account_type_id: None,
                    origin: Origin::Manual,
                    detail: Some("generated".into()),
                    draft: false,
                })
                .collect()
        },
    )
}

fn people() -> Vec<PersonId> {
    (0..4).map(|_| PersonId::new()).collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Per-person nets always add up to the overall net.
    #[test]
    fn prop_person_nets_sum_to_total(rows in entries(people())) {
        let filter = LedgerFilter::default();
        let types = HashMap::new();
        let total = LedgerBalances::totals_by_nature(&rows, &filter, &types);
        let per_person: Decimal = LedgerBalances::by_person(&rows, &filter, &types)
            .iter()
            .map(|b| b.totals.net())
            .sum();
        prop_assert_eq!(total.net(), per_person);
    }

    /// Aggregating twice over the same rows gives the same answer.
    #[test]
    fn prop_aggregation_is_idempotent(rows in entries(people())) {
        let filter = LedgerFilter::default();
        let types = HashMap::new();
        let first = LedgerBalances::by_person(&rows, &filter, &types);
        let second = LedgerBalances::by_person(&rows, &filter, &types);
        prop_assert_eq!(first, second);
    }

    /// The last running balance of a statement equals that person's net.
    #[test]
    fn prop_statement_ends_at_net(rows in entries(people())) {
        prop_assume!(!rows.is_empty());
        let person = rows[0].person_id;
        let filter = LedgerFilter::default();
        let lines = LedgerBalances::statement(&rows, person, &filter);
        let net = LedgerBalances::totals_by_nature(
            &rows,
            &LedgerFilter { person_id: Some(person), ..LedgerFilter::default() },
            &HashMap::new(),
        ).net();
        prop_assert_eq!(lines.last().map(|l| l.balance), Some(net));
    }
}
