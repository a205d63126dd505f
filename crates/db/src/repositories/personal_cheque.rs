//! Personal (issued) cheque repository.

use chrono::NaiveDate;
use loomledger_core::cheque::{
    ChequeError, ChequeService, PersonalCheque, PersonalChequeAction, PersonalChequeStatus,
};
use loomledger_core::ledger::{Nature, NewLedgerEntry, Origin};
use loomledger_shared::types::{AccountTypeId, BranchId, PersonId, PersonalChequeId};
use loomledger_shared::{Permission, RequestContext};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction,
    EntityTrait, QueryFilter, Set, TransactionTrait,
};
use tracing::info;

use super::common::{
    authorize, cleanup, for_update, linked_account, require_account_type, require_person,
};
use super::directory::LinkedAccountKind;
use super::ledger::insert_entry;
use super::serial::{SerialKind, next_serial};
use crate::entities::{ledger_entries, personal_cheques};
use crate::error::RepoError;

/// Input for issuing a personal cheque.
#[derive(Debug, Clone)]
pub struct IssuePersonalChequeInput {
    /// Payee.
    pub person_id: PersonId,
    /// Bank account the cheque is drawn on.
    pub account_type_id: AccountTypeId,
    /// Drawee bank.
    pub bank: String,
    /// Number printed on the cheque.
    pub cheque_number: String,
    /// Date issued.
    pub date: NaiveDate,
    /// Date the cheque can be presented.
    pub due_date: NaiveDate,
    /// Face value.
    pub amount: Decimal,
}

/// Personal cheque repository.
#[derive(Debug, Clone)]
pub struct PersonalChequeRepository {
    db: DatabaseConnection,
}

impl PersonalChequeRepository {
    /// Creates a new personal cheque repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Issues a cheque and posts a Debit row against the payee.
    ///
    /// # Errors
    ///
    /// - [`ChequeError::InvalidAmount`] if the amount is not positive
    /// - [`ChequeError::ChequeAccountNotAllowed`] if drawn on the cheque account
    pub async fn issue_personal(
        &self,
        ctx: &RequestContext,
        input: IssuePersonalChequeInput,
    ) -> Result<PersonalCheque, RepoError> {
        authorize(ctx, Permission::ManagePersonalCheques)?;

        let txn = self.db.begin().await?;
        require_person(&txn, ctx.branch_id, input.person_id).await?;
        require_account_type(&txn, ctx.branch_id, input.account_type_id).await?;
        let cheque_account =
            linked_account(&txn, ctx.branch_id, LinkedAccountKind::ChequeAccount).await?;
        ChequeService::validate_personal_issue(input.amount, input.account_type_id, cheque_account)?;

        let serial = next_serial(&txn, ctx.branch_id, SerialKind::PersonalCheque).await?;
        let model = personal_cheques::ActiveModel {
            id: Set(PersonalChequeId::new().into_inner()),
            branch_id: Set(ctx.branch_id.into_inner()),
            serial: Set(serial),
            person_id: Set(input.person_id.into_inner()),
            account_type_id: Set(input.account_type_id.into_inner()),
            bank: Set(input.bank),
            cheque_number: Set(input.cheque_number),
            date: Set(input.date),
            due_date: Set(input.due_date),
            amount: Set(input.amount),
            status: Set(PersonalChequeStatus::Pending.into()),
        }
        .insert(&txn)
        .await?;
        let cheque = to_cheque(model);

        post(&txn, ctx.branch_id, &cheque, Nature::Debit, input.date).await?;
        txn.commit().await?;

        info!(branch = %ctx.branch_id, cheque = %cheque.id, serial, "personal cheque issued");
        Ok(cheque)
    }

    /// Takes back a pending cheque and posts a Credit row.
    pub async fn return_personal(
        &self,
        ctx: &RequestContext,
        cheque_id: PersonalChequeId,
        date: NaiveDate,
    ) -> Result<PersonalCheque, RepoError> {
        self.transition(ctx, cheque_id, PersonalChequeAction::Return, None, date)
            .await
    }

    /// Gives a returned cheque to `new_person` and posts a Debit row against them.
    pub async fn reissue_personal(
        &self,
        ctx: &RequestContext,
        cheque_id: PersonalChequeId,
        new_person: PersonId,
        date: NaiveDate,
    ) -> Result<PersonalCheque, RepoError> {
        self.transition(
            ctx,
            cheque_id,
            PersonalChequeAction::Reissue,
            Some(new_person),
            date,
        )
        .await
    }

    /// Marks a pending cheque as cleared.
    pub async fn pass_personal(
        &self,
        ctx: &RequestContext,
        cheque_id: PersonalChequeId,
        date: NaiveDate,
    ) -> Result<PersonalCheque, RepoError> {
        self.transition(ctx, cheque_id, PersonalChequeAction::Pass, None, date)
            .await
    }

    /// Cancels a returned cheque.
    pub async fn cancel_personal(
        &self,
        ctx: &RequestContext,
        cheque_id: PersonalChequeId,
        date: NaiveDate,
    ) -> Result<PersonalCheque, RepoError> {
        self.transition(ctx, cheque_id, PersonalChequeAction::Cancel, None, date)
            .await
    }

    async fn transition(
        &self,
        ctx: &RequestContext,
        cheque_id: PersonalChequeId,
        action: PersonalChequeAction,
        new_person: Option<PersonId>,
        date: NaiveDate,
    ) -> Result<PersonalCheque, RepoError> {
        authorize(ctx, Permission::ManagePersonalCheques)?;

        let txn = self.db.begin().await?;
        let cheque = load_cheque(&txn, ctx.branch_id, cheque_id, true).await?;
        let status = ChequeService::transition_personal(cheque.status, action)?;
        if let Some(person) = new_person {
            require_person(&txn, ctx.branch_id, person).await?;
        }

        let mut active = personal_cheques::ActiveModel {
            id: Set(cheque.id.into_inner()),
            status: Set(status.into()),
            ..Default::default()
        };
        if let Some(person) = new_person {
            active.person_id = Set(person.into_inner());
        }
        let cheque = to_cheque(active.update(&txn).await?);

        if let Some(nature) = ChequeService::personal_posting(action) {
            post(&txn, ctx.branch_id, &cheque, nature, date).await?;
        }
        txn.commit().await?;

        info!(branch = %ctx.branch_id, cheque = %cheque.id, %status, "personal cheque status changed");
        Ok(cheque)
    }

    /// Deletes a cheque and, best-effort, its ledger rows.
    ///
    /// # Errors
    ///
    /// Returns [`ChequeError::ChequeNotFound`] if the cheque is not in the branch.
    pub async fn delete_personal_cheque(
        &self,
        ctx: &RequestContext,
        cheque_id: PersonalChequeId,
    ) -> Result<(), RepoError> {
        authorize(ctx, Permission::DeleteDocuments)?;

        let txn = self.db.begin().await?;
        let cheque = load_cheque(&txn, ctx.branch_id, cheque_id, true).await?;
        cleanup(
            &txn,
            "ledger rows",
            cheque.id.into_inner(),
            ledger_entries::Entity::delete_many()
                .filter(ledger_entries::Column::PersonalChequeId.eq(cheque.id.into_inner())),
        )
        .await;
        personal_cheques::Entity::delete_by_id(cheque.id.into_inner())
            .exec(&txn)
            .await?;
        txn.commit().await?;

        info!(branch = %ctx.branch_id, cheque = %cheque.id, serial = cheque.serial, "personal cheque deleted");
        Ok(())
    }

    /// Loads one cheque of the caller's branch.
    pub async fn get(
        &self,
        ctx: &RequestContext,
        cheque_id: PersonalChequeId,
    ) -> Result<PersonalCheque, RepoError> {
        authorize(ctx, Permission::ViewLedger)?;
        load_cheque(&self.db, ctx.branch_id, cheque_id, false).await
    }
}

async fn post(
    txn: &DatabaseTransaction,
    branch_id: BranchId,
    cheque: &PersonalCheque,
    nature: Nature,
    date: NaiveDate,
) -> Result<(), RepoError> {
    insert_entry(
        txn,
        branch_id,
        &NewLedgerEntry::posted(
            date,
            cheque.amount,
            nature,
            cheque.person_id,
            Some(cheque.account_type_id),
            Origin::PersonalCheque {
                id: cheque.id,
                serial: cheque.serial,
            },
        ),
    )
    .await?;
    Ok(())
}

async fn load_cheque<C: ConnectionTrait>(
    conn: &C,
    branch_id: BranchId,
    cheque_id: PersonalChequeId,
    lock: bool,
) -> Result<PersonalCheque, RepoError> {
    let mut query = personal_cheques::Entity::find_by_id(cheque_id.into_inner())
        .filter(personal_cheques::Column::BranchId.eq(branch_id.into_inner()));
    if lock {
        query = for_update(query, conn);
    }
    query
        .one(conn)
        .await?
        .map(to_cheque)
        .ok_or_else(|| ChequeError::ChequeNotFound(cheque_id.into_inner()).into())
}

fn to_cheque(model: personal_cheques::Model) -> PersonalCheque {
    PersonalCheque {
        id: model.id.into(),
        branch_id: model.branch_id.into(),
        serial: model.serial,
        person_id: model.person_id.into(),
        account_type_id: model.account_type_id.into(),
        bank: model.bank,
        cheque_number: model.cheque_number,
        date: model.date,
        due_date: model.due_date,
        amount: model.amount,
        status: model.status.into(),
    }
}
