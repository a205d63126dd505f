//! External (received) cheque repository.
//!
//! Issue, partial recovery through history rows, change cheques, transfer
//! to another person, clear/return and cascading deletes. Every rule is
//! decided by [`ChequeService`]; this module loads state, writes rows and
//! posts the ledger side effects inside one transaction per operation.

use std::collections::HashSet;

use chrono::NaiveDate;
use loomledger_core::cheque::{
    ChequeError, ChequeHistory, ChequeService, ChequeSummary, ExternalCheque,
    ExternalChequeAction, ExternalChequeStatus,
};
use loomledger_core::ledger::{Nature, NewLedgerEntry, Origin};
use loomledger_shared::types::{
    AccountTypeId, BranchId, ChequeHistoryId, ChequeTransferId, ExternalChequeId, PersonId,
};
use loomledger_shared::{Permission, RequestContext};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection,
    DatabaseTransaction, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use tracing::info;
use uuid::Uuid;

use super::common::{
    authorize, cleanup, for_update, linked_account, require_account_type, require_person,
};
use super::directory::LinkedAccountKind;
use super::ledger::insert_entry;
use super::serial::{SerialKind, next_serial};
use crate::entities::{
    external_cheque_histories, external_cheque_transfers, external_cheques, ledger_entries,
};
use crate::error::RepoError;

/// Face details of a cheque being received.
#[derive(Debug, Clone)]
pub struct ChequeDetails {
    /// Drawee bank.
    pub bank: String,
    /// Number printed on the cheque.
    pub cheque_number: String,
    /// Date received.
    pub date: NaiveDate,
    /// Date the cheque can be presented.
    pub due_date: NaiveDate,
    /// Face value.
    pub amount: Decimal,
}

/// Input for recording a partial recovery against a cheque.
#[derive(Debug, Clone)]
pub struct RecordHistoryInput {
    /// Cheque the money was recovered against (the root or one of its return cheques).
    pub cheque_id: ExternalChequeId,
    /// Account the money came into.
    pub account_type_id: AccountTypeId,
    /// Amount recovered.
    pub amount: Decimal,
    /// Date recovered.
    pub date: NaiveDate,
}

/// A change cheque together with the history row that produced it.
#[derive(Debug, Clone)]
pub struct ChangeCheque {
    /// The newly received cheque.
    pub cheque: ExternalCheque,
    /// History row linking it to the cheque it replaces.
    pub history: ChequeHistory,
}

/// External cheque repository.
#[derive(Debug, Clone)]
pub struct ExternalChequeRepository {
    db: DatabaseConnection,
}

impl ExternalChequeRepository {
    /// Creates a new external cheque repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Receives a cheque from `person_id`.
    ///
    /// Assigns the next cheque serial and posts one Credit row against the
    /// person on the branch's cheque account.
    ///
    /// # Errors
    ///
    /// - [`ChequeError::ChequeAccountNotConfigured`] if the branch has no cheque account
    /// - [`ChequeError::InvalidAmount`] / [`ChequeError::DuplicateChequeNumber`]
    pub async fn issue_external(
        &self,
        ctx: &RequestContext,
        person_id: PersonId,
        details: ChequeDetails,
    ) -> Result<ExternalCheque, RepoError> {
        authorize(ctx, Permission::ManageExternalCheques)?;

        let txn = self.db.begin().await?;
        require_person(&txn, ctx.branch_id, person_id).await?;
        let cheque_account = require_cheque_account(&txn, ctx.branch_id).await?;

        let cheque = insert_cheque(&txn, ctx.branch_id, person_id, &details).await?;
        insert_entry(
            &txn,
            ctx.branch_id,
            &NewLedgerEntry::posted(
                details.date,
                details.amount,
                Nature::Credit,
                person_id,
                Some(cheque_account),
                Origin::ExternalCheque {
                    id: cheque.id,
                    serial: cheque.serial,
                },
            ),
        )
        .await?;
        txn.commit().await?;

        info!(branch = %ctx.branch_id, cheque = %cheque.id, serial = cheque.serial, "external cheque issued");
        Ok(cheque)
    }

    /// Records money recovered against a cheque or one of its return cheques.
    ///
    /// The history row is always attached to the root cheque. Once the root's
    /// remaining amount reaches zero it becomes `completed_history`.
    ///
    /// # Errors
    ///
    /// - [`ChequeError::ChequeAccountNotAllowed`] if posted to the cheque account
    /// - [`ChequeError::AlreadyTransferred`] if the cheque was transferred
    /// - [`ChequeError::AmountExceedsRemaining`] above the remaining amount
    pub async fn record_history(
        &self,
        ctx: &RequestContext,
        input: RecordHistoryInput,
    ) -> Result<ChequeHistory, RepoError> {
        authorize(ctx, Permission::ManageExternalCheques)?;

        let txn = self.db.begin().await?;
        let cheque_account = require_cheque_account(&txn, ctx.branch_id).await?;
        require_account_type(&txn, ctx.branch_id, input.account_type_id).await?;

        let cheque = load_cheque(&txn, ctx.branch_id, input.cheque_id, true).await?;
        let mut histories = load_histories(&txn, ctx.branch_id).await?;
        let parent = load_root(&txn, ctx.branch_id, &cheque, &histories).await?;

        ChequeService::validate_history(
            &parent,
            &cheque,
            &histories,
            input.account_type_id,
            input.amount,
            cheque_account,
        )?;

        let history = insert_history(
            &txn,
            ctx.branch_id,
            &ChequeHistory {
                id: ChequeHistoryId::new(),
                parent_cheque_id: parent.id,
                cheque_id: cheque.id,
                account_type_id: input.account_type_id,
                amount: input.amount,
                return_cheque_id: None,
                date: input.date,
            },
        )
        .await?;
        histories.push(history.clone());

        if ChequeService::is_fully_recovered(&parent, &histories, cheque_account) {
            set_status(&txn, parent.id, ExternalChequeStatus::CompletedHistory, Some(true)).await?;
            info!(cheque = %parent.id, "cheque fully recovered");
        }
        txn.commit().await?;

        info!(
            branch = %ctx.branch_id,
            parent = %parent.id,
            cheque = %cheque.id,
            amount = %input.amount,
            "cheque history recorded"
        );
        Ok(history)
    }

    /// Takes a new cheque from the same person as change for `cheque_id`.
    ///
    /// The history row is posted to the cheque account, so it counts as
    /// received without reducing the remaining amount.
    ///
    /// # Errors
    ///
    /// - [`ChequeError::AlreadyTransferred`] if the original was transferred
    /// - [`ChequeError::AmountExceedsRemaining`] above what is still unreceived
    pub async fn create_history_with_new_cheque(
        &self,
        ctx: &RequestContext,
        cheque_id: ExternalChequeId,
        details: ChequeDetails,
    ) -> Result<ChangeCheque, RepoError> {
        authorize(ctx, Permission::ManageExternalCheques)?;

        let txn = self.db.begin().await?;
        let cheque_account = require_cheque_account(&txn, ctx.branch_id).await?;
        let original = load_cheque(&txn, ctx.branch_id, cheque_id, true).await?;
        let histories = load_histories(&txn, ctx.branch_id).await?;
        let parent = load_root(&txn, ctx.branch_id, &original, &histories).await?;

        ChequeService::validate_history_with_new_cheque(
            &parent,
            &original,
            &histories,
            details.amount,
        )?;

        let cheque = insert_cheque(&txn, ctx.branch_id, original.person_id, &details).await?;
        let history = insert_history(
            &txn,
            ctx.branch_id,
            &ChequeHistory {
                id: ChequeHistoryId::new(),
                parent_cheque_id: parent.id,
                cheque_id: original.id,
                account_type_id: cheque_account,
                amount: cheque.amount,
                return_cheque_id: Some(cheque.id),
                date: details.date,
            },
        )
        .await?;
        txn.commit().await?;

        info!(
            branch = %ctx.branch_id,
            parent = %parent.id,
            change_cheque = %cheque.id,
            serial = cheque.serial,
            "change cheque received"
        );
        Ok(ChangeCheque { cheque, history })
    }

    /// Endorses a cheque over to another person.
    ///
    /// Posts one Debit row against the new holder on the cheque account. When
    /// a return cheque is transferred and its root has been fully received,
    /// the root becomes `completed_transfer`.
    ///
    /// # Errors
    ///
    /// - [`ChequeError::HasHistory`] if any history row references the cheque
    /// - [`ChequeError::SamePerson`] if `new_person` already holds it
    /// - [`ChequeError::InvalidStatus`] if cleared, [`ChequeError::AlreadyInState`] if transferred
    pub async fn transfer(
        &self,
        ctx: &RequestContext,
        cheque_id: ExternalChequeId,
        new_person: PersonId,
        date: NaiveDate,
    ) -> Result<external_cheque_transfers::Model, RepoError> {
        authorize(ctx, Permission::ManageExternalCheques)?;

        let txn = self.db.begin().await?;
        let cheque_account = require_cheque_account(&txn, ctx.branch_id).await?;
        require_person(&txn, ctx.branch_id, new_person).await?;
        let cheque = load_cheque(&txn, ctx.branch_id, cheque_id, true).await?;
        let histories = load_histories(&txn, ctx.branch_id).await?;

        let has_history = histories
            .iter()
            .any(|h| h.cheque_id == cheque.id || h.parent_cheque_id == cheque.id);
        ChequeService::validate_transfer(&cheque, new_person, has_history)?;

        let transfer = external_cheque_transfers::ActiveModel {
            id: Set(ChequeTransferId::new().into_inner()),
            branch_id: Set(ctx.branch_id.into_inner()),
            cheque_id: Set(cheque.id.into_inner()),
            from_person_id: Set(cheque.person_id.into_inner()),
            to_person_id: Set(new_person.into_inner()),
            date: Set(date),
        }
        .insert(&txn)
        .await?;

        insert_entry(
            &txn,
            ctx.branch_id,
            &NewLedgerEntry::posted(
                date,
                cheque.amount,
                Nature::Debit,
                new_person,
                Some(cheque_account),
                Origin::ExternalCheque {
                    id: cheque.id,
                    serial: cheque.serial,
                },
            )
            .with_detail("Cheque transfer"),
        )
        .await?;
        set_status(&txn, cheque.id, ExternalChequeStatus::Transferred, None).await?;

        let root = load_root(&txn, ctx.branch_id, &cheque, &histories).await?;
        if root.id != cheque.id && ChequeService::is_fully_received(&root, &histories) {
            set_status(&txn, root.id, ExternalChequeStatus::CompletedTransfer, None).await?;
        }
        txn.commit().await?;

        info!(
            branch = %ctx.branch_id,
            cheque = %cheque.id,
            to = %new_person,
            "external cheque transferred"
        );
        Ok(transfer)
    }

    /// Marks a pending cheque as cleared by the bank.
    ///
    /// # Errors
    ///
    /// Returns [`ChequeError::AlreadyInState`] unless the cheque is pending.
    pub async fn clear_external(
        &self,
        ctx: &RequestContext,
        cheque_id: ExternalChequeId,
    ) -> Result<ExternalCheque, RepoError> {
        self.transition(ctx, cheque_id, ExternalChequeAction::Clear).await
    }

    /// Marks a pending cheque as returned unpaid.
    ///
    /// # Errors
    ///
    /// Returns [`ChequeError::AlreadyInState`] unless the cheque is pending.
    pub async fn return_external(
        &self,
        ctx: &RequestContext,
        cheque_id: ExternalChequeId,
    ) -> Result<ExternalCheque, RepoError> {
        self.transition(ctx, cheque_id, ExternalChequeAction::Return).await
    }

    async fn transition(
        &self,
        ctx: &RequestContext,
        cheque_id: ExternalChequeId,
        action: ExternalChequeAction,
    ) -> Result<ExternalCheque, RepoError> {
        authorize(ctx, Permission::ManageExternalCheques)?;

        let txn = self.db.begin().await?;
        let cheque = load_cheque(&txn, ctx.branch_id, cheque_id, true).await?;
        let status = ChequeService::transition_external(cheque.status, action)?;
        set_status(&txn, cheque.id, status, None).await?;
        txn.commit().await?;

        info!(branch = %ctx.branch_id, cheque = %cheque.id, %status, "external cheque status changed");
        Ok(ExternalCheque { status, ..cheque })
    }

    /// Deletes a cheque with its ledger rows, transfer and history.
    ///
    /// History rows take their return cheques with them. Dependent cleanup
    /// is best-effort; only the cheque row itself must be deleted.
    ///
    /// # Errors
    ///
    /// Returns [`ChequeError::ChequeNotFound`] if the cheque is not in the branch.
    pub async fn delete_external_cheque(
        &self,
        ctx: &RequestContext,
        cheque_id: ExternalChequeId,
    ) -> Result<(), RepoError> {
        authorize(ctx, Permission::DeleteDocuments)?;

        let txn = self.db.begin().await?;
        let cheque = load_cheque(&txn, ctx.branch_id, cheque_id, true).await?;
        cascade_dependents(&txn, ctx.branch_id, cheque.id.into_inner()).await?;
        external_cheques::Entity::delete_by_id(cheque.id.into_inner())
            .exec(&txn)
            .await?;
        txn.commit().await?;

        info!(branch = %ctx.branch_id, cheque = %cheque.id, serial = cheque.serial, "external cheque deleted");
        Ok(())
    }

    /// Deletes a history row and the return cheque it produced.
    ///
    /// A root left with a remaining amount goes back from
    /// `completed_history` to `pending`.
    ///
    /// # Errors
    ///
    /// Returns [`ChequeError::HistoryNotFound`] if the row is not in the branch.
    pub async fn delete_history(
        &self,
        ctx: &RequestContext,
        history_id: ChequeHistoryId,
    ) -> Result<(), RepoError> {
        authorize(ctx, Permission::DeleteDocuments)?;

        let txn = self.db.begin().await?;
        let history = external_cheque_histories::Entity::find_by_id(history_id.into_inner())
            .filter(external_cheque_histories::Column::BranchId.eq(ctx.branch_id.into_inner()))
            .one(&txn)
            .await?
            .ok_or(ChequeError::HistoryNotFound(history_id.into_inner()))?;

        external_cheque_histories::Entity::delete_by_id(history.id)
            .exec(&txn)
            .await?;

        if let Some(return_cheque) = history.return_cheque_id {
            cascade_dependents(&txn, ctx.branch_id, return_cheque).await?;
            cleanup(
                &txn,
                "return cheque",
                return_cheque,
                external_cheques::Entity::delete_many()
                    .filter(external_cheques::Column::Id.eq(return_cheque)),
            )
            .await;
        }

        let parent_id = ExternalChequeId::from(history.parent_cheque_id);
        let parent = load_cheque(&txn, ctx.branch_id, parent_id, true).await?;
        if parent.status == ExternalChequeStatus::CompletedHistory
            && let Some(cheque_account) =
                linked_account(&txn, ctx.branch_id, LinkedAccountKind::ChequeAccount).await?
        {
            let histories = load_histories(&txn, ctx.branch_id).await?;
            if !ChequeService::is_fully_recovered(&parent, &histories, cheque_account) {
                set_status(&txn, parent.id, ExternalChequeStatus::Pending, Some(false)).await?;
            }
        }
        txn.commit().await?;

        info!(branch = %ctx.branch_id, history = %history_id, "cheque history deleted");
        Ok(())
    }

    /// Root cheque of `cheque_id` with its recovery figures and history.
    ///
    /// # Errors
    ///
    /// - [`ChequeError::ChequeNotFound`] if the cheque is not in the branch
    /// - [`ChequeError::ChequeAccountNotConfigured`] if the branch has no cheque account
    pub async fn cheque_summary(
        &self,
        ctx: &RequestContext,
        cheque_id: ExternalChequeId,
    ) -> Result<ChequeSummary, RepoError> {
        authorize(ctx, Permission::ViewLedger)?;

        let cheque_account = require_cheque_account(&self.db, ctx.branch_id).await?;
        let cheque = load_cheque(&self.db, ctx.branch_id, cheque_id, false).await?;
        let histories = load_histories(&self.db, ctx.branch_id).await?;
        let parent = load_root(&self.db, ctx.branch_id, &cheque, &histories).await?;

        Ok(ChequeSummary {
            remaining_amount: ChequeService::remaining_amount(&parent, &histories, cheque_account),
            amount_received: ChequeService::amount_received(parent.id, &histories),
            history: histories
                .into_iter()
                .filter(|h| h.parent_cheque_id == parent.id)
                .collect(),
            parent,
        })
    }

    /// Loads one cheque of the caller's branch.
    ///
    /// # Errors
    ///
    /// Returns [`ChequeError::ChequeNotFound`] if the cheque is not in the branch.
    pub async fn get(
        &self,
        ctx: &RequestContext,
        cheque_id: ExternalChequeId,
    ) -> Result<ExternalCheque, RepoError> {
        authorize(ctx, Permission::ViewLedger)?;
        load_cheque(&self.db, ctx.branch_id, cheque_id, false).await
    }

    /// Cheques of the branch, newest serial first.
    pub async fn list(&self, ctx: &RequestContext) -> Result<Vec<ExternalCheque>, RepoError> {
        authorize(ctx, Permission::ViewLedger)?;
        Ok(external_cheques::Entity::find()
            .filter(external_cheques::Column::BranchId.eq(ctx.branch_id.into_inner()))
            .order_by_desc(external_cheques::Column::Serial)
            .all(&self.db)
            .await?
            .into_iter()
            .map(to_cheque)
            .collect())
    }
}

async fn require_cheque_account<C: ConnectionTrait>(
    conn: &C,
    branch_id: BranchId,
) -> Result<AccountTypeId, RepoError> {
    linked_account(conn, branch_id, LinkedAccountKind::ChequeAccount)
        .await?
        .ok_or_else(|| ChequeError::ChequeAccountNotConfigured.into())
}

async fn insert_cheque(
    txn: &DatabaseTransaction,
    branch_id: BranchId,
    person_id: PersonId,
    details: &ChequeDetails,
) -> Result<ExternalCheque, RepoError> {
    let duplicates = external_cheques::Entity::find()
        .filter(external_cheques::Column::BranchId.eq(branch_id.into_inner()))
        .filter(external_cheques::Column::Bank.eq(details.bank.as_str()))
        .filter(external_cheques::Column::ChequeNumber.eq(details.cheque_number.as_str()))
        .count(txn)
        .await?;
    ChequeService::validate_new_external(
        details.amount,
        &details.bank,
        &details.cheque_number,
        duplicates > 0,
    )?;

    let serial = next_serial(txn, branch_id, SerialKind::ExternalCheque).await?;
    let model = external_cheques::ActiveModel {
        id: Set(ExternalChequeId::new().into_inner()),
        branch_id: Set(branch_id.into_inner()),
        serial: Set(serial),
        person_id: Set(person_id.into_inner()),
        bank: Set(details.bank.clone()),
        cheque_number: Set(details.cheque_number.clone()),
        date: Set(details.date),
        due_date: Set(details.due_date),
        amount: Set(details.amount),
        status: Set(ExternalChequeStatus::Pending.into()),
        is_passed_with_history: Set(false),
    }
    .insert(txn)
    .await?;
    Ok(to_cheque(model))
}

async fn insert_history(
    txn: &DatabaseTransaction,
    branch_id: BranchId,
    history: &ChequeHistory,
) -> Result<ChequeHistory, RepoError> {
    let model = external_cheque_histories::ActiveModel {
        id: Set(history.id.into_inner()),
        branch_id: Set(branch_id.into_inner()),
        parent_cheque_id: Set(history.parent_cheque_id.into_inner()),
        cheque_id: Set(history.cheque_id.into_inner()),
        account_type_id: Set(history.account_type_id.into_inner()),
        amount: Set(history.amount),
        return_cheque_id: Set(history.return_cheque_id.map(ExternalChequeId::into_inner)),
        date: Set(history.date),
    }
    .insert(txn)
    .await?;
    Ok(to_history(model))
}

async fn set_status(
    txn: &DatabaseTransaction,
    cheque_id: ExternalChequeId,
    status: ExternalChequeStatus,
    passed_with_history: Option<bool>,
) -> Result<(), RepoError> {
    let mut active = external_cheques::ActiveModel {
        id: Set(cheque_id.into_inner()),
        status: Set(status.into()),
        ..Default::default()
    };
    if let Some(passed) = passed_with_history {
        active.is_passed_with_history = Set(passed);
    }
    active.update(txn).await?;
    Ok(())
}

async fn load_cheque<C: ConnectionTrait>(
    conn: &C,
    branch_id: BranchId,
    cheque_id: ExternalChequeId,
    lock: bool,
) -> Result<ExternalCheque, RepoError> {
    let mut query = external_cheques::Entity::find_by_id(cheque_id.into_inner())
        .filter(external_cheques::Column::BranchId.eq(branch_id.into_inner()));
    if lock {
        query = for_update(query, conn);
    }
    query
        .one(conn)
        .await?
        .map(to_cheque)
        .ok_or_else(|| ChequeError::ChequeNotFound(cheque_id.into_inner()).into())
}

async fn load_root<C: ConnectionTrait>(
    conn: &C,
    branch_id: BranchId,
    cheque: &ExternalCheque,
    histories: &[ChequeHistory],
) -> Result<ExternalCheque, RepoError> {
    let root_id = ChequeService::root_parent(cheque.id, histories)?;
    if root_id == cheque.id {
        Ok(cheque.clone())
    } else {
        load_cheque(conn, branch_id, root_id, true).await
    }
}

async fn load_histories<C: ConnectionTrait>(
    conn: &C,
    branch_id: BranchId,
) -> Result<Vec<ChequeHistory>, RepoError> {
    Ok(external_cheque_histories::Entity::find()
        .filter(external_cheque_histories::Column::BranchId.eq(branch_id.into_inner()))
        .order_by_asc(external_cheque_histories::Column::Date)
        .all(conn)
        .await?
        .into_iter()
        .map(to_history)
        .collect())
}

/// Removes everything hanging off a cheque, following return cheques down
/// the chain. The cheque row itself is left to the caller.
async fn cascade_dependents(
    txn: &DatabaseTransaction,
    branch_id: BranchId,
    cheque_id: Uuid,
) -> Result<(), RepoError> {
    let mut visited = HashSet::new();
    let mut pending = vec![cheque_id];

    while let Some(current) = pending.pop() {
        if !visited.insert(current) {
            continue;
        }

        cleanup(
            txn,
            "ledger rows",
            current,
            ledger_entries::Entity::delete_many()
                .filter(ledger_entries::Column::ExternalChequeId.eq(current)),
        )
        .await;
        cleanup(
            txn,
            "cheque transfer",
            current,
            external_cheque_transfers::Entity::delete_many()
                .filter(external_cheque_transfers::Column::ChequeId.eq(current)),
        )
        .await;

        let touching = Condition::any()
            .add(external_cheque_histories::Column::ChequeId.eq(current))
            .add(external_cheque_histories::Column::ParentChequeId.eq(current))
            .add(external_cheque_histories::Column::ReturnChequeId.eq(current));
        let histories = external_cheque_histories::Entity::find()
            .filter(external_cheque_histories::Column::BranchId.eq(branch_id.into_inner()))
            .filter(touching.clone())
            .all(txn)
            .await?;
        let spawned: Vec<Uuid> = histories
            .iter()
            .filter_map(|h| h.return_cheque_id)
            .filter(|id| *id != current)
            .collect();

        cleanup(
            txn,
            "cheque history",
            current,
            external_cheque_histories::Entity::delete_many()
                .filter(external_cheque_histories::Column::BranchId.eq(branch_id.into_inner()))
                .filter(touching),
        )
        .await;

        if current != cheque_id {
            cleanup(
                txn,
                "return cheque",
                current,
                external_cheques::Entity::delete_many()
                    .filter(external_cheques::Column::Id.eq(current)),
            )
            .await;
        }
        pending.extend(spawned);
    }
    Ok(())
}

fn to_cheque(model: external_cheques::Model) -> ExternalCheque {
    ExternalCheque {
        id: model.id.into(),
        branch_id: model.branch_id.into(),
        serial: model.serial,
        person_id: model.person_id.into(),
        bank: model.bank,
        cheque_number: model.cheque_number,
        date: model.date,
        due_date: model.due_date,
        amount: model.amount,
        status: model.status.into(),
        is_passed_with_history: model.is_passed_with_history,
    }
}

fn to_history(model: external_cheque_histories::Model) -> ChequeHistory {
    ChequeHistory {
        id: model.id.into(),
        parent_cheque_id: model.parent_cheque_id.into(),
        cheque_id: model.cheque_id.into(),
        account_type_id: model.account_type_id.into(),
        amount: model.amount,
        return_cheque_id: model.return_cheque_id.map(Into::into),
        date: model.date,
    }
}
