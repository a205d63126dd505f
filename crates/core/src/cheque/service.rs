//! Cheque lifecycle rules.
//!
//! The repositories load the cheque, its history chain and the branch's
//! cheque account, ask [`ChequeService`] whether the mutation is allowed,
//! and only then write. Nothing here touches storage.

use loomledger_shared::types::{AccountTypeId, ExternalChequeId, PersonId};
use rust_decimal::Decimal;

use super::error::ChequeError;
use super::types::{
    ChequeHistory, ExternalCheque, ExternalChequeAction, ExternalChequeStatus,
    PersonalChequeAction, PersonalChequeStatus,
};
use crate::ledger::Nature;

/// Stateless cheque rules.
pub struct ChequeService;

impl ChequeService {
    /// Validates a cheque about to be received.
    ///
    /// # Errors
    ///
    /// - [`ChequeError::InvalidAmount`] if the amount is not positive
    /// - [`ChequeError::DuplicateChequeNumber`] if `duplicate` is set
    pub fn validate_new_external(
        amount: Decimal,
        bank: &str,
        cheque_number: &str,
        duplicate: bool,
    ) -> Result<(), ChequeError> {
        if amount <= Decimal::ZERO {
            return Err(ChequeError::InvalidAmount(amount));
        }
        if duplicate {
            return Err(ChequeError::DuplicateChequeNumber {
                bank: bank.to_string(),
                cheque_number: cheque_number.to_string(),
            });
        }
        Ok(())
    }

    /// Walks from a cheque back to the root cheque it was spawned from.
    ///
    /// A cheque that is nobody's return cheque is its own root.
    ///
    /// # Errors
    ///
    /// Returns [`ChequeError::BrokenChain`] if the chain loops.
    pub fn root_parent(
        cheque_id: ExternalChequeId,
        histories: &[ChequeHistory],
    ) -> Result<ExternalChequeId, ChequeError> {
        let mut current = cheque_id;
        for _ in 0..=histories.len() {
            match histories
                .iter()
                .find(|h| h.return_cheque_id == Some(current))
            {
                Some(h) if h.parent_cheque_id != current => current = h.parent_cheque_id,
                Some(_) => return Err(ChequeError::BrokenChain(cheque_id.into_inner())),
                None => return Ok(current),
            }
        }
        Err(ChequeError::BrokenChain(cheque_id.into_inner()))
    }

    /// Parent amount minus history rows not posted to the cheque account.
    #[must_use]
    pub fn remaining_amount(
        parent: &ExternalCheque,
        histories: &[ChequeHistory],
        cheque_account: AccountTypeId,
    ) -> Decimal {
        let recovered: Decimal = histories
            .iter()
            .filter(|h| h.parent_cheque_id == parent.id && h.account_type_id != cheque_account)
            .map(|h| h.amount)
            .sum();
        parent.amount - recovered
    }

    /// Everything handed in against the parent itself, cheque-account rows included.
    ///
    /// Rows recorded against a return cheque only convert value the parent
    /// already counted when that return cheque was taken, so they are left out.
    #[must_use]
    pub fn amount_received(parent_id: ExternalChequeId, histories: &[ChequeHistory]) -> Decimal {
        histories
            .iter()
            .filter(|h| h.parent_cheque_id == parent_id && h.cheque_id == parent_id)
            .map(|h| h.amount)
            .sum()
    }

    /// Most that can still be recorded against `cheque`.
    ///
    /// Recording against the root is capped by what the root has not yet
    /// received. Recording against a return cheque is capped by that cheque's
    /// own face value less what was already recorded against it. Both are
    /// capped by the root's remaining amount.
    #[must_use]
    pub fn available_for_history(
        parent: &ExternalCheque,
        cheque: &ExternalCheque,
        histories: &[ChequeHistory],
        cheque_account: AccountTypeId,
    ) -> Decimal {
        let remaining = Self::remaining_amount(parent, histories, cheque_account);
        let cap = Self::receivable_cap(parent, cheque, histories);
        remaining.min(cap).max(Decimal::ZERO)
    }

    fn receivable_cap(
        parent: &ExternalCheque,
        cheque: &ExternalCheque,
        histories: &[ChequeHistory],
    ) -> Decimal {
        if cheque.id == parent.id {
            parent.amount - Self::amount_received(parent.id, histories)
        } else {
            let recorded: Decimal = histories
                .iter()
                .filter(|h| h.cheque_id == cheque.id)
                .map(|h| h.amount)
                .sum();
            cheque.amount - recorded
        }
    }

    /// Validates a history row recorded against `cheque` (rooted at `parent`).
    ///
    /// # Errors
    ///
    /// - [`ChequeError::InvalidAmount`] if the amount is not positive
    /// - [`ChequeError::ChequeAccountNotAllowed`] if posted to the cheque account
    /// - [`ChequeError::AlreadyTransferred`] if the cheque was transferred
    /// - [`ChequeError::AmountExceedsRemaining`] if the amount is above what is available
    pub fn validate_history(
        parent: &ExternalCheque,
        cheque: &ExternalCheque,
        histories: &[ChequeHistory],
        account_type_id: AccountTypeId,
        amount: Decimal,
        cheque_account: AccountTypeId,
    ) -> Result<(), ChequeError> {
        if amount <= Decimal::ZERO {
            return Err(ChequeError::InvalidAmount(amount));
        }
        if account_type_id == cheque_account {
            return Err(ChequeError::ChequeAccountNotAllowed);
        }
        if cheque.status == ExternalChequeStatus::Transferred {
            return Err(ChequeError::AlreadyTransferred);
        }
        let remaining = Self::available_for_history(parent, cheque, histories, cheque_account);
        if amount > remaining {
            return Err(ChequeError::AmountExceedsRemaining { amount, remaining });
        }
        Ok(())
    }

    /// Validates a history row that hands back a new change cheque.
    ///
    /// The row is posted to the cheque account, so it does not reduce the
    /// remaining amount, but it still counts as received.
    ///
    /// # Errors
    ///
    /// - [`ChequeError::AlreadyTransferred`] if the cheque was transferred
    /// - [`ChequeError::InvalidAmount`] if the new cheque amount is not positive
    /// - [`ChequeError::AmountExceedsRemaining`] if it is above what is unreceived
    pub fn validate_history_with_new_cheque(
        parent: &ExternalCheque,
        cheque: &ExternalCheque,
        histories: &[ChequeHistory],
        new_cheque_amount: Decimal,
    ) -> Result<(), ChequeError> {
        if cheque.status == ExternalChequeStatus::Transferred {
            return Err(ChequeError::AlreadyTransferred);
        }
        if new_cheque_amount <= Decimal::ZERO {
            return Err(ChequeError::InvalidAmount(new_cheque_amount));
        }
        let remaining = Self::receivable_cap(parent, cheque, histories).max(Decimal::ZERO);
        if new_cheque_amount > remaining {
            return Err(ChequeError::AmountExceedsRemaining {
                amount: new_cheque_amount,
                remaining,
            });
        }
        Ok(())
    }

    /// True once the history chain has recovered the full parent amount.
    #[must_use]
    pub fn is_fully_recovered(
        parent: &ExternalCheque,
        histories: &[ChequeHistory],
        cheque_account: AccountTypeId,
    ) -> bool {
        Self::remaining_amount(parent, histories, cheque_account) <= Decimal::ZERO
    }

    /// True once everything owed on the parent has been received in some form.
    #[must_use]
    pub fn is_fully_received(parent: &ExternalCheque, histories: &[ChequeHistory]) -> bool {
        Self::amount_received(parent.id, histories) >= parent.amount
    }

    /// Validates endorsing a cheque over to `new_person`.
    ///
    /// # Errors
    ///
    /// - [`ChequeError::AlreadyInState`] if already transferred
    /// - [`ChequeError::InvalidStatus`] if cleared
    /// - [`ChequeError::HasHistory`] if any history row references it
    /// - [`ChequeError::SamePerson`] if `new_person` already holds it
    pub fn validate_transfer(
        cheque: &ExternalCheque,
        new_person: PersonId,
        has_history: bool,
    ) -> Result<(), ChequeError> {
        match cheque.status {
            ExternalChequeStatus::Transferred => {
                return Err(ChequeError::AlreadyInState {
                    status: cheque.status.to_string(),
                });
            }
            ExternalChequeStatus::Cleared => {
                return Err(ChequeError::InvalidStatus {
                    status: cheque.status.to_string(),
                    action: "transfer",
                });
            }
            _ => {}
        }
        if has_history {
            return Err(ChequeError::HasHistory);
        }
        if new_person == cheque.person_id {
            return Err(ChequeError::SamePerson);
        }
        Ok(())
    }

    /// Applies a clear/return transition to a received cheque.
    ///
    /// # Errors
    ///
    /// Returns [`ChequeError::AlreadyInState`] unless the cheque is pending.
    pub fn transition_external(
        status: ExternalChequeStatus,
        action: ExternalChequeAction,
    ) -> Result<ExternalChequeStatus, ChequeError> {
        match (status, action) {
            (ExternalChequeStatus::Pending, ExternalChequeAction::Clear) => {
                Ok(ExternalChequeStatus::Cleared)
            }
            (ExternalChequeStatus::Pending, ExternalChequeAction::Return) => {
                Ok(ExternalChequeStatus::Returned)
            }
            (status, _) => Err(ChequeError::AlreadyInState {
                status: status.to_string(),
            }),
        }
    }

    /// Validates a personal cheque about to be issued.
    ///
    /// # Errors
    ///
    /// - [`ChequeError::InvalidAmount`] if the amount is not positive
    /// - [`ChequeError::ChequeAccountNotAllowed`] if drawn on the cheque account
    pub fn validate_personal_issue(
        amount: Decimal,
        account_type_id: AccountTypeId,
        cheque_account: Option<AccountTypeId>,
    ) -> Result<(), ChequeError> {
        if amount <= Decimal::ZERO {
            return Err(ChequeError::InvalidAmount(amount));
        }
        if cheque_account == Some(account_type_id) {
            return Err(ChequeError::ChequeAccountNotAllowed);
        }
        Ok(())
    }

    /// Applies a transition to a personal cheque.
    ///
    /// # Errors
    ///
    /// Returns [`ChequeError::AlreadyInState`] with the current status when
    /// the action is not allowed from it.
    pub fn transition_personal(
        status: PersonalChequeStatus,
        action: PersonalChequeAction,
    ) -> Result<PersonalChequeStatus, ChequeError> {
        use PersonalChequeAction as A;
        use PersonalChequeStatus as S;

        match (status, action) {
            (S::Pending, A::Return) => Ok(S::Returned),
            (S::Pending, A::Pass) => Ok(S::Cleared),
            (S::Returned, A::Reissue) => Ok(S::Pending),
            (S::Returned, A::Cancel) => Ok(S::Cancelled),
            (status, _) => Err(ChequeError::AlreadyInState {
                status: status.to_string(),
            }),
        }
    }

    /// Ledger side posted by a personal cheque transition, if any.
    #[must_use]
    pub const fn personal_posting(action: PersonalChequeAction) -> Option<Nature> {
        match action {
            PersonalChequeAction::Return => Some(Nature::Credit),
            PersonalChequeAction::Reissue => Some(Nature::Debit),
            PersonalChequeAction::Pass | PersonalChequeAction::Cancel => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use loomledger_shared::types::{BranchId, ChequeHistoryId};
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    fn cheque(amount: Decimal) -> ExternalCheque {
        ExternalCheque {
            id: ExternalChequeId::new(),
            branch_id: BranchId::new(),
            serial: 1,
            person_id: PersonId::new(),
            bank: "X".into(),
            cheque_number: "0001".into(),
            date: date(),
            due_date: date(),
            amount,
            status: ExternalChequeStatus::Pending,
            is_passed_with_history: false,
        }
    }

    fn history(
        parent: &ExternalCheque,
        against: ExternalChequeId,
        account: AccountTypeId,
        amount: Decimal,
        return_cheque: Option<ExternalChequeId>,
    ) -> ChequeHistory {
        ChequeHistory {
            id: ChequeHistoryId::new(),
            parent_cheque_id: parent.id,
            cheque_id: against,
            account_type_id: account,
            amount,
            return_cheque_id: return_cheque,
            date: date(),
        }
    }

    #[test]
    fn test_history_cannot_exceed_remaining() {
        let cash = AccountTypeId::new();
        let cheque_account = AccountTypeId::new();
        let parent = cheque(dec!(1000));
        let histories = vec![history(&parent, parent.id, cash, dec!(600), None)];

        let err = ChequeService::validate_history(
            &parent,
            &parent,
            &histories,
            cash,
            dec!(500),
            cheque_account,
        )
        .unwrap_err();
        match err {
            ChequeError::AmountExceedsRemaining { amount, remaining } => {
                assert_eq!(amount, dec!(500));
                assert_eq!(remaining, dec!(400));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(
            ChequeService::validate_history(
                &parent,
                &parent,
                &histories,
                cash,
                dec!(400),
                cheque_account
            )
            .is_ok()
        );
    }

    #[test]
    fn test_history_rejects_cheque_account_and_transferred() {
        let cheque_account = AccountTypeId::new();
        let mut parent = cheque(dec!(1000));
        assert!(matches!(
            ChequeService::validate_history(
                &parent,
                &parent,
                &[],
                cheque_account,
                dec!(1),
                cheque_account
            ),
            Err(ChequeError::ChequeAccountNotAllowed)
        ));

        parent.status = ExternalChequeStatus::Transferred;
        assert!(matches!(
            ChequeService::validate_history(
                &parent,
                &parent,
                &[],
                AccountTypeId::new(),
                dec!(1),
                cheque_account
            ),
            Err(ChequeError::AlreadyTransferred)
        ));
    }

    #[test]
    fn test_recovery_with_change_cheque_scenario() {
        let cash = AccountTypeId::new();
        let cheque_account = AccountTypeId::new();
        let parent = cheque(dec!(5000));
        let mut histories = vec![history(&parent, parent.id, cash, dec!(2000), None)];
        assert_eq!(
            ChequeService::remaining_amount(&parent, &histories, cheque_account),
            dec!(3000)
        );

        ChequeService::validate_history_with_new_cheque(&parent, &parent, &histories, dec!(3000))
            .unwrap();
        let change = ExternalCheque {
            id: ExternalChequeId::new(),
            amount: dec!(3000),
            ..parent.clone()
        };
        histories.push(history(
            &parent,
            parent.id,
            cheque_account,
            dec!(3000),
            Some(change.id),
        ));

        assert_eq!(ChequeService::amount_received(parent.id, &histories), dec!(5000));
        assert_eq!(
            ChequeService::remaining_amount(&parent, &histories, cheque_account),
            dec!(3000)
        );
        assert!(!ChequeService::is_fully_recovered(&parent, &histories, cheque_account));

        let err = ChequeService::validate_history(
            &parent,
            &parent,
            &histories,
            cash,
            dec!(1),
            cheque_account,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ChequeError::AmountExceedsRemaining { remaining, .. } if remaining == dec!(0)
        ));

        // Recovery continues against the change cheque.
        assert_eq!(
            ChequeService::root_parent(change.id, &histories).unwrap(),
            parent.id
        );
        ChequeService::validate_history(
            &parent,
            &change,
            &histories,
            cash,
            dec!(3000),
            cheque_account,
        )
        .unwrap();
        histories.push(history(&parent, change.id, cash, dec!(3000), None));
        assert!(ChequeService::is_fully_recovered(&parent, &histories, cheque_account));
    }

    #[test]
    fn test_chained_change_cheques_never_exceed_face_value() {
        let cash = AccountTypeId::new();
        let cheque_account = AccountTypeId::new();
        let parent = cheque(dec!(5000));
        let first = ExternalCheque {
            id: ExternalChequeId::new(),
            ..parent.clone()
        };
        let mut histories = vec![history(
            &parent,
            parent.id,
            cheque_account,
            dec!(5000),
            Some(first.id),
        )];
        assert!(ChequeService::is_fully_received(&parent, &histories));

        ChequeService::validate_history_with_new_cheque(&parent, &first, &histories, dec!(5000))
            .unwrap();
        let second = ExternalCheque {
            id: ExternalChequeId::new(),
            ..parent.clone()
        };
        histories.push(history(
            &parent,
            first.id,
            cheque_account,
            dec!(5000),
            Some(second.id),
        ));
        assert_eq!(ChequeService::amount_received(parent.id, &histories), dec!(5000));

        assert!(matches!(
            ChequeService::validate_history_with_new_cheque(&parent, &first, &histories, dec!(1)),
            Err(ChequeError::AmountExceedsRemaining { .. })
        ));
        assert!(matches!(
            ChequeService::validate_history_with_new_cheque(&parent, &parent, &histories, dec!(1)),
            Err(ChequeError::AmountExceedsRemaining { .. })
        ));

        histories.push(history(&parent, second.id, cash, dec!(5000), None));
        assert_eq!(ChequeService::amount_received(parent.id, &histories), dec!(5000));
        assert!(ChequeService::is_fully_recovered(&parent, &histories, cheque_account));
    }

    #[test]
    fn test_root_parent_of_unlinked_cheque_is_itself() {
        let parent = cheque(dec!(10));
        assert_eq!(ChequeService::root_parent(parent.id, &[]).unwrap(), parent.id);
    }

    #[test]
    fn test_root_parent_detects_loop() {
        let a = cheque(dec!(10));
        let b = cheque(dec!(10));
        let account = AccountTypeId::new();
        let histories = vec![
            history(&a, a.id, account, dec!(1), Some(b.id)),
            history(&b, b.id, account, dec!(1), Some(a.id)),
        ];
        assert!(matches!(
            ChequeService::root_parent(a.id, &histories),
            Err(ChequeError::BrokenChain(_))
        ));
    }

    #[test]
    fn test_transfer_rules() {
        let c = cheque(dec!(100));
        let other = PersonId::new();

        assert!(matches!(
            ChequeService::validate_transfer(&c, other, true),
            Err(ChequeError::HasHistory)
        ));
        assert!(matches!(
            ChequeService::validate_transfer(&c, c.person_id, false),
            Err(ChequeError::SamePerson)
        ));

        let mut cleared = c.clone();
        cleared.status = ExternalChequeStatus::Cleared;
        assert!(matches!(
            ChequeService::validate_transfer(&cleared, other, false),
            Err(ChequeError::InvalidStatus { .. })
        ));

        let mut transferred = c.clone();
        transferred.status = ExternalChequeStatus::Transferred;
        assert!(matches!(
            ChequeService::validate_transfer(&transferred, other, false),
            Err(ChequeError::AlreadyInState { .. })
        ));

        assert!(ChequeService::validate_transfer(&c, other, false).is_ok());
    }

    #[rstest]
    #[case(PersonalChequeStatus::Pending, PersonalChequeAction::Return, Some(PersonalChequeStatus::Returned))]
    #[case(PersonalChequeStatus::Pending, PersonalChequeAction::Pass, Some(PersonalChequeStatus::Cleared))]
    #[case(PersonalChequeStatus::Returned, PersonalChequeAction::Reissue, Some(PersonalChequeStatus::Pending))]
    #[case(PersonalChequeStatus::Returned, PersonalChequeAction::Cancel, Some(PersonalChequeStatus::Cancelled))]
    #[case(PersonalChequeStatus::Pending, PersonalChequeAction::Cancel, None)]
    #[case(PersonalChequeStatus::Cleared, PersonalChequeAction::Return, None)]
    #[case(PersonalChequeStatus::Cancelled, PersonalChequeAction::Reissue, None)]
    #[case(PersonalChequeStatus::Returned, PersonalChequeAction::Pass, None)]
    fn test_personal_transitions(
        #[case] from: PersonalChequeStatus,
        #[case] action: PersonalChequeAction,
        #[case] expected: Option<PersonalChequeStatus>,
    ) {
        let result = ChequeService::transition_personal(from, action);
        match expected {
            Some(to) => assert_eq!(result.unwrap(), to),
            None => match result.unwrap_err() {
                ChequeError::AlreadyInState { status } => assert_eq!(status, from.as_str()),
                other => panic!("unexpected error: {other:?}"),
            },
        }
    }

    #[test]
    fn test_personal_issue_rejects_cheque_account() {
        let cheque_account = AccountTypeId::new();
        assert!(matches!(
            ChequeService::validate_personal_issue(dec!(10), cheque_account, Some(cheque_account)),
            Err(ChequeError::ChequeAccountNotAllowed)
        ));
        assert!(
            ChequeService::validate_personal_issue(dec!(10), AccountTypeId::new(), Some(cheque_account))
                .is_ok()
        );
        assert!(ChequeService::validate_personal_issue(dec!(10), cheque_account, None).is_ok());
    }

    #[test]
    fn test_external_transitions() {
        assert_eq!(
            ChequeService::transition_external(
                ExternalChequeStatus::Pending,
                ExternalChequeAction::Clear
            )
            .unwrap(),
            ExternalChequeStatus::Cleared
        );
        assert!(matches!(
            ChequeService::transition_external(
                ExternalChequeStatus::Cleared,
                ExternalChequeAction::Return
            ),
            Err(ChequeError::AlreadyInState { .. })
        ));
    }

    #[test]
    fn test_personal_postings() {
        assert_eq!(
            ChequeService::personal_posting(PersonalChequeAction::Return),
            Some(Nature::Credit)
        );
        assert_eq!(
            ChequeService::personal_posting(PersonalChequeAction::Reissue),
            Some(Nature::Debit)
        );
        assert_eq!(ChequeService::personal_posting(PersonalChequeAction::Pass), None);
    }
}
