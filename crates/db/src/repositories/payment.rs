//! Payment repository: cash and bank receipts or payouts.

use chrono::NaiveDate;
use loomledger_core::ledger::{LedgerError, Nature, NewLedgerEntry, Origin};
use loomledger_shared::types::{AccountTypeId, PaymentId, PersonId};
use loomledger_shared::{Permission, RequestContext};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
    TransactionTrait,
};
use tracing::info;

use super::common::{authorize, cleanup, require_account_type, require_person};
use super::ledger::insert_entry;
use super::serial::{SerialKind, next_serial};
use crate::entities::{ledger_entries, payments};
use crate::error::RepoError;

/// Input for recording a payment.
#[derive(Debug, Clone)]
pub struct RecordPaymentInput {
    /// Party paid or paying.
    pub person_id: PersonId,
    /// Credit for money received from the person, Debit for money paid out.
    pub nature: Nature,
    /// Cash or bank account used.
    pub account_type_id: AccountTypeId,
    /// Amount.
    pub amount: Decimal,
    /// Date of payment.
    pub date: NaiveDate,
    /// Free text.
    pub description: Option<String>,
}

/// Payment repository.
#[derive(Debug, Clone)]
pub struct PaymentRepository {
    db: DatabaseConnection,
}

impl PaymentRepository {
    /// Creates a new payment repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Records a payment and its single ledger row.
    ///
    /// # Errors
    ///
    /// - [`RepoError::NotFound`] if the person or account is not in the branch
    /// - [`LedgerError::NegativeAmount`] for a negative amount
    pub async fn record_payment(
        &self,
        ctx: &RequestContext,
        input: RecordPaymentInput,
    ) -> Result<payments::Model, RepoError> {
        authorize(ctx, Permission::PostLedger)?;
        if input.amount < Decimal::ZERO {
            return Err(LedgerError::NegativeAmount.into());
        }

        let txn = self.db.begin().await?;
        require_person(&txn, ctx.branch_id, input.person_id).await?;
        require_account_type(&txn, ctx.branch_id, input.account_type_id).await?;

        let serial = next_serial(&txn, ctx.branch_id, SerialKind::Payment).await?;
        let payment = payments::ActiveModel {
            id: Set(PaymentId::new().into_inner()),
            branch_id: Set(ctx.branch_id.into_inner()),
            serial: Set(serial),
            person_id: Set(input.person_id.into_inner()),
            account_type_id: Set(input.account_type_id.into_inner()),
            nature: Set(input.nature.into()),
            amount: Set(input.amount),
            date: Set(input.date),
            description: Set(input.description.clone()),
        }
        .insert(&txn)
        .await?;

        let mut entry = NewLedgerEntry::posted(
            input.date,
            input.amount,
            input.nature,
            input.person_id,
            Some(input.account_type_id),
            Origin::Payment {
                id: payment.id.into(),
                serial,
            },
        );
        entry.detail = input.description;
        insert_entry(&txn, ctx.branch_id, &entry).await?;
        txn.commit().await?;

        info!(branch = %ctx.branch_id, payment = %payment.id, serial, "payment recorded");
        Ok(payment)
    }

    /// Deletes a payment and, best-effort, its ledger rows.
    pub async fn delete_payment(
        &self,
        ctx: &RequestContext,
        payment_id: PaymentId,
    ) -> Result<(), RepoError> {
        authorize(ctx, Permission::DeleteDocuments)?;

        let txn = self.db.begin().await?;
        let payment = payments::Entity::find_by_id(payment_id.into_inner())
            .filter(payments::Column::BranchId.eq(ctx.branch_id.into_inner()))
            .one(&txn)
            .await?
            .ok_or_else(|| RepoError::not_found("payment", payment_id))?;

        cleanup(
            &txn,
            "ledger rows",
            payment.id,
            ledger_entries::Entity::delete_many()
                .filter(ledger_entries::Column::PaymentId.eq(payment.id)),
        )
        .await;
        payments::Entity::delete_by_id(payment.id).exec(&txn).await?;
        txn.commit().await?;

        info!(branch = %ctx.branch_id, payment = %payment.id, serial = payment.serial, "payment deleted");
        Ok(())
    }
}
