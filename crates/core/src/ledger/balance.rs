//! Balance aggregation over ledger rows.
//!
//! Everything here works on rows already loaded for one branch. Net is
//! always `credit_total - debit_total`; a negative net on a customer means
//! they owe us.

use chrono::NaiveDate;
use loomledger_shared::types::{AccountTypeId, LedgerEntryId, PersonId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use super::entry::LedgerEntry;
use super::types::{Nature, PersonType};

/// Row selection for ledger reads and aggregations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerFilter {
    /// Only rows posted against this person.
    pub person_id: Option<PersonId>,
    /// Only rows whose person is of this type.
    pub person_type: Option<PersonType>,
    /// Only rows on this money account.
    pub account_type_id: Option<AccountTypeId>,
    /// Inclusive lower date bound.
    pub date_from: Option<NaiveDate>,
    /// Inclusive upper date bound.
    pub date_to: Option<NaiveDate>,
    /// Only one side.
    pub nature: Option<Nature>,
    /// Include draft rows.
    #[serde(default)]
    pub include_drafts: bool,
}

impl LedgerFilter {
    /// Everything posted on or before `date`.
    #[must_use]
    pub fn as_of(date: NaiveDate) -> Self {
        Self {
            date_to: Some(date),
            ..Self::default()
        }
    }

    /// Returns true if the row passes the filter.
    ///
    /// `person_types` resolves the type of each row's person; rows whose person
    /// is unknown never match a `person_type` filter.
    #[must_use]
    pub fn matches(&self, entry: &LedgerEntry, person_types: &HashMap<PersonId, PersonType>) -> bool {
        if entry.draft && !self.include_drafts {
            return false;
        }
        if self.person_id.is_some_and(|p| p != entry.person_id) {
            return false;
        }
        if self.account_type_id.is_some() && self.account_type_id != entry.account_type_id {
            return false;
        }
        if self.nature.is_some_and(|n| n != entry.nature) {
            return false;
        }
        if self.date_from.is_some_and(|d| entry.date < d) {
            return false;
        }
        if self.date_to.is_some_and(|d| entry.date > d) {
            return false;
        }
        if let Some(wanted) = self.person_type {
            return person_types.get(&entry.person_id) == Some(&wanted);
        }
        true
    }
}

/// Debit and credit totals of a set of rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NatureTotals {
    /// Sum of debit rows.
    pub debit_total: Decimal,
    /// Sum of credit rows.
    pub credit_total: Decimal,
}

impl NatureTotals {
    /// Adds one row.
    pub fn add(&mut self, nature: Nature, amount: Decimal) {
        match nature {
            Nature::Debit => self.debit_total += amount,
            Nature::Credit => self.credit_total += amount,
        }
    }

    /// `credit_total - debit_total`.
    #[must_use]
    pub fn net(&self) -> Decimal {
        self.credit_total - self.debit_total
    }
}

/// Totals for one person.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonBalance {
    /// The person.
    pub person_id: PersonId,
    /// Their totals.
    pub totals: NatureTotals,
}

/// Totals for one money account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountTypeBalance {
    /// The account type.
    pub account_type_id: AccountTypeId,
    /// Its totals.
    pub totals: NatureTotals,
}

/// One line of a person statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementLine {
    /// Source row.
    pub entry_id: LedgerEntryId,
    /// Posting date.
    pub date: NaiveDate,
    /// Row description.
    pub description: String,
    /// Debit amount, zero on credit rows.
    pub debit: Decimal,
    /// Credit amount, zero on debit rows.
    pub credit: Decimal,
    /// Running `credit - debit` after this line.
    pub balance: Decimal,
}

/// Stateless aggregations over ledger rows.
pub struct LedgerBalances;

impl LedgerBalances {
    /// Totals by nature of every matching row.
    #[must_use]
    pub fn totals_by_nature(
        entries: &[LedgerEntry],
        filter: &LedgerFilter,
        person_types: &HashMap<PersonId, PersonType>,
    ) -> NatureTotals {
        entries
            .iter()
            .filter(|e| filter.matches(e, person_types))
            .fold(NatureTotals::default(), |mut acc, e| {
                acc.add(e.nature, e.amount);
                acc
            })
    }

    /// Totals per person, ordered by person id.
    #[must_use]
    pub fn by_person(
        entries: &[LedgerEntry],
        filter: &LedgerFilter,
        person_types: &HashMap<PersonId, PersonType>,
    ) -> Vec<PersonBalance> {
        let mut grouped: BTreeMap<PersonId, NatureTotals> = BTreeMap::new();
        for entry in entries.iter().filter(|e| filter.matches(e, person_types)) {
            grouped.entry(entry.person_id).or_default().add(entry.nature, entry.amount);
        }
        grouped
            .into_iter()
            .map(|(person_id, totals)| PersonBalance { person_id, totals })
            .collect()
    }

    /// Totals per account type. Rows without an account type are skipped.
    #[must_use]
    pub fn by_account_type(
        entries: &[LedgerEntry],
        filter: &LedgerFilter,
        person_types: &HashMap<PersonId, PersonType>,
    ) -> Vec<AccountTypeBalance> {
        let mut grouped: BTreeMap<AccountTypeId, NatureTotals> = BTreeMap::new();
        for entry in entries.iter().filter(|e| filter.matches(e, person_types)) {
            if let Some(account_type_id) = entry.account_type_id {
                grouped.entry(account_type_id).or_default().add(entry.nature, entry.amount);
            }
        }
        grouped
            .into_iter()
            .map(|(account_type_id, totals)| AccountTypeBalance {
                account_type_id,
                totals,
            })
            .collect()
    }

    /// Date-ordered statement for one person with a running balance.
    ///
    /// The filter's `person_id` is overridden by `person_id`.
    #[must_use]
    pub fn statement(
        entries: &[LedgerEntry],
        person_id: PersonId,
        filter: &LedgerFilter,
    ) -> Vec<StatementLine> {
        let filter = LedgerFilter {
            person_id: Some(person_id),
            person_type: None,
            ..filter.clone()
        };
        let no_types = HashMap::new();

        let mut rows: Vec<&LedgerEntry> =
            entries.iter().filter(|e| filter.matches(e, &no_types)).collect();
        rows.sort_by_key(|e| (e.date, e.id));

        let mut balance = Decimal::ZERO;
        rows.into_iter()
            .map(|e| {
                balance += e.signed_amount();
                let (debit, credit) = match e.nature {
                    Nature::Debit => (e.amount, Decimal::ZERO),
                    Nature::Credit => (Decimal::ZERO, e.amount),
                };
                StatementLine {
                    entry_id: e.id,
                    date: e.date,
                    description: e.description(),
                    debit,
                    credit,
                    balance,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::entry::Origin;
    use loomledger_shared::types::BranchId;
    use rust_decimal_macros::dec;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, day).unwrap()
    }

    fn entry(person: PersonId, nature: Nature, amount: Decimal, day: u32) -> LedgerEntry {
        LedgerEntry {
            id: LedgerEntryId::new(),
            branch_id: BranchId::new(),
            date: date(day),
            amount,
            nature,
            person_id: person,
            account_type_id: None,
            origin: Origin::Manual,
            detail: Some("test".into()),
            draft: false,
        }
    }

    #[test]
    fn test_net_is_credit_minus_debit() {
        let p = PersonId::new();
        let entries = vec![
            entry(p, Nature::Credit, dec!(5000), 1),
            entry(p, Nature::Debit, dec!(3000), 2),
        ];
        let totals =
            LedgerBalances::totals_by_nature(&entries, &LedgerFilter::default(), &HashMap::new());
        assert_eq!(totals.credit_total, dec!(5000));
        assert_eq!(totals.debit_total, dec!(3000));
        assert_eq!(totals.net(), dec!(2000));
    }

    #[test]
    fn test_drafts_excluded_by_default() {
        let p = PersonId::new();
        let mut draft = entry(p, Nature::Credit, dec!(100), 1);
        draft.draft = true;
        let entries = vec![draft, entry(p, Nature::Credit, dec!(50), 1)];

        let filter = LedgerFilter::default();
        let totals = LedgerBalances::totals_by_nature(&entries, &filter, &HashMap::new());
        assert_eq!(totals.credit_total, dec!(50));

        let filter = LedgerFilter {
            include_drafts: true,
            ..LedgerFilter::default()
        };
        let totals = LedgerBalances::totals_by_nature(&entries, &filter, &HashMap::new());
        assert_eq!(totals.credit_total, dec!(150));
    }

    #[test]
    fn test_person_type_filter() {
        let customer = PersonId::new();
        let supplier = PersonId::new();
        let types = HashMap::from([
            (customer, PersonType::Customer),
            (supplier, PersonType::Supplier),
        ]);
        let entries = vec![
            entry(customer, Nature::Debit, dec!(10), 1),
            entry(supplier, Nature::Credit, dec!(20), 1),
        ];
        let filter = LedgerFilter {
            person_type: Some(PersonType::Supplier),
            ..LedgerFilter::default()
        };
        let by_person = LedgerBalances::by_person(&entries, &filter, &types);
        assert_eq!(by_person.len(), 1);
        assert_eq!(by_person[0].person_id, supplier);
        assert_eq!(by_person[0].totals.net(), dec!(20));
    }

    #[test]
    fn test_as_of_bounds_inclusive() {
        let p = PersonId::new();
        let entries = vec![
            entry(p, Nature::Credit, dec!(1), 10),
            entry(p, Nature::Credit, dec!(2), 11),
        ];
        let totals =
            LedgerBalances::totals_by_nature(&entries, &LedgerFilter::as_of(date(10)), &HashMap::new());
        assert_eq!(totals.credit_total, dec!(1));
    }

    #[test]
    fn test_statement_running_balance() {
        let p = PersonId::new();
        let other = PersonId::new();
        let entries = vec![
            entry(p, Nature::Debit, dec!(3000), 2),
            entry(p, Nature::Credit, dec!(5000), 1),
            entry(other, Nature::Credit, dec!(999), 1),
        ];
        let lines = LedgerBalances::statement(&entries, p, &LedgerFilter::default());
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].credit, dec!(5000));
        assert_eq!(lines[0].balance, dec!(5000));
        assert_eq!(lines[1].debit, dec!(3000));
        assert_eq!(lines[1].balance, dec!(2000));
    }

    #[test]
    fn test_by_account_type_skips_unassigned() {
        let p = PersonId::new();
        let cash = AccountTypeId::new();
        let mut with_account = entry(p, Nature::Credit, dec!(70), 1);
        with_account.account_type_id = Some(cash);
        let entries = vec![with_account, entry(p, Nature::Credit, dec!(30), 1)];
        let balances =
            LedgerBalances::by_account_type(&entries, &LedgerFilter::default(), &HashMap::new());
        assert_eq!(balances.len(), 1);
        assert_eq!(balances[0].account_type_id, cash);
        assert_eq!(balances[0].totals.credit_total, dec!(70));
    }
}
