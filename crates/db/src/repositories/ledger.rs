//! Ledger repository: posting rows and reading balances.
//!
//! Every other repository posts through [`insert_entry`] inside its own
//! transaction. Reads push the [`LedgerFilter`] into SQL, then hand the
//! matching rows to [`LedgerBalances`], so the figures a report shows are
//! computed by the same code the unit tests exercise.

use chrono::Utc;
use loomledger_core::ledger::{
    AccountTypeBalance, LedgerBalances, LedgerEntry, LedgerFilter, LedgerService, NatureTotals,
    NewLedgerEntry, Origin, OriginLinks, PersonBalance, StatementLine,
};
use loomledger_shared::types::{AccountTypeId, BranchId, LedgerEntryId, PersonId};
use loomledger_shared::{Permission, RequestContext};
use sea_orm::sea_query::Query;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction,
    EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use std::collections::HashMap;
use tracing::{debug, info};

use super::common::{authorize, require_person};
use crate::entities::sea_orm_active_enums::{NatureDb, PersonTypeDb};
use crate::entities::{ledger_entries, persons};
use crate::error::RepoError;

/// Ledger repository.
#[derive(Debug, Clone)]
pub struct LedgerRepository {
    db: DatabaseConnection,
}

impl LedgerRepository {
    /// Creates a new ledger repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Posts one row typed in by hand (or any row the caller builds).
    ///
    /// # Errors
    ///
    /// - [`RepoError::Forbidden`] without `PostLedger`
    /// - [`RepoError::NotFound`] if the person is not in the branch
    /// - ledger validation errors (negative amount, manual row without detail)
    pub async fn post(
        &self,
        ctx: &RequestContext,
        entry: NewLedgerEntry,
    ) -> Result<LedgerEntry, RepoError> {
        authorize(ctx, Permission::PostLedger)?;

        let txn = self.db.begin().await?;
        require_person(&txn, ctx.branch_id, entry.person_id).await?;
        let posted = insert_entry(&txn, ctx.branch_id, &entry).await?;
        txn.commit().await?;

        Ok(posted)
    }

    /// Rows matching `filter`, in date order.
    ///
    /// # Errors
    ///
    /// Returns [`RepoError::Forbidden`] without `ViewLedger`.
    pub async fn list(
        &self,
        ctx: &RequestContext,
        filter: &LedgerFilter,
    ) -> Result<Vec<LedgerEntry>, RepoError> {
        authorize(ctx, Permission::ViewLedger)?;
        load_entries(&self.db, ctx.branch_id, filter).await
    }

    /// Credit and debit totals of the rows matching `filter`.
    ///
    /// # Errors
    ///
    /// Returns [`RepoError::Forbidden`] without `ViewLedger`.
    pub async fn totals_by_nature(
        &self,
        ctx: &RequestContext,
        filter: &LedgerFilter,
    ) -> Result<NatureTotals, RepoError> {
        authorize(ctx, Permission::ViewLedger)?;
        let entries = load_entries(&self.db, ctx.branch_id, filter).await?;
        let totals =
            LedgerBalances::totals_by_nature(&entries, &already_filtered(), &HashMap::new());
        debug!(branch = %ctx.branch_id, net = %totals.net(), "ledger totals computed");
        Ok(totals)
    }

    /// Totals per person.
    ///
    /// # Errors
    ///
    /// Returns [`RepoError::Forbidden`] without `ViewLedger`.
    pub async fn balances_by_person(
        &self,
        ctx: &RequestContext,
        filter: &LedgerFilter,
    ) -> Result<Vec<PersonBalance>, RepoError> {
        authorize(ctx, Permission::ViewLedger)?;
        let entries = load_entries(&self.db, ctx.branch_id, filter).await?;
        Ok(LedgerBalances::by_person(&entries, &already_filtered(), &HashMap::new()))
    }

    /// Totals per account type.
    ///
    /// # Errors
    ///
    /// Returns [`RepoError::Forbidden`] without `ViewLedger`.
    pub async fn balances_by_account_type(
        &self,
        ctx: &RequestContext,
        filter: &LedgerFilter,
    ) -> Result<Vec<AccountTypeBalance>, RepoError> {
        authorize(ctx, Permission::ViewLedger)?;
        let entries = load_entries(&self.db, ctx.branch_id, filter).await?;
        Ok(LedgerBalances::by_account_type(&entries, &already_filtered(), &HashMap::new()))
    }

    /// Statement of one person with a running balance.
    ///
    /// # Errors
    ///
    /// - [`RepoError::Forbidden`] without `ViewLedger`
    /// - [`RepoError::NotFound`] if the person is not in the branch
    pub async fn statement(
        &self,
        ctx: &RequestContext,
        person_id: PersonId,
        filter: &LedgerFilter,
    ) -> Result<Vec<StatementLine>, RepoError> {
        authorize(ctx, Permission::ViewLedger)?;
        require_person(&self.db, ctx.branch_id, person_id).await?;
        let filter = LedgerFilter {
            person_id: Some(person_id),
            person_type: None,
            ..filter.clone()
        };
        let entries = load_entries(&self.db, ctx.branch_id, &filter).await?;
        Ok(LedgerBalances::statement(&entries, person_id, &filter))
    }
}

/// Validates and writes one row inside the caller's transaction.
pub(crate) async fn insert_entry(
    txn: &DatabaseTransaction,
    branch_id: BranchId,
    entry: &NewLedgerEntry,
) -> Result<LedgerEntry, RepoError> {
    LedgerService::validate_new_entry(entry)?;

    let links = entry.origin.links();
    let model = ledger_entries::ActiveModel {
        id: Set(LedgerEntryId::new().into_inner()),
        branch_id: Set(branch_id.into_inner()),
        date: Set(entry.date),
        amount: Set(entry.amount),
        nature: Set(entry.nature.into()),
        person_id: Set(entry.person_id.into_inner()),
        account_type_id: Set(entry.account_type_id.map(AccountTypeId::into_inner)),
        transaction_id: Set(links.transaction_id),
        external_cheque_id: Set(links.external_cheque_id),
        personal_cheque_id: Set(links.personal_cheque_id),
        payment_id: Set(links.payment_id),
        raw_transaction_id: Set(links.raw_transaction_id),
        raw_debit_id: Set(links.raw_debit_id),
        source_serial: Set(links.source_serial),
        detail: Set(entry.detail.clone()),
        draft: Set(entry.draft),
        created_at: Set(Utc::now().into()),
    }
    .insert(txn)
    .await?;

    info!(
        branch = %branch_id,
        origin = entry.origin.kind(),
        serial = ?links.source_serial,
        nature = %entry.nature,
        amount = %entry.amount,
        "ledger row posted"
    );
    to_entry(model)
}

/// Rows of the branch matching `filter`, oldest first.
pub(crate) async fn load_entries<C: ConnectionTrait>(
    conn: &C,
    branch_id: BranchId,
    filter: &LedgerFilter,
) -> Result<Vec<LedgerEntry>, RepoError> {
    let mut query = ledger_entries::Entity::find()
        .filter(ledger_entries::Column::BranchId.eq(branch_id.into_inner()));
    if !filter.include_drafts {
        query = query.filter(ledger_entries::Column::Draft.eq(false));
    }
    if let Some(person_id) = filter.person_id {
        query = query.filter(ledger_entries::Column::PersonId.eq(person_id.into_inner()));
    }
    if let Some(account_type_id) = filter.account_type_id {
        query =
            query.filter(ledger_entries::Column::AccountTypeId.eq(account_type_id.into_inner()));
    }
    if let Some(nature) = filter.nature {
        query = query.filter(ledger_entries::Column::Nature.eq(NatureDb::from(nature)));
    }
    if let Some(from) = filter.date_from {
        query = query.filter(ledger_entries::Column::Date.gte(from));
    }
    if let Some(to) = filter.date_to {
        query = query.filter(ledger_entries::Column::Date.lte(to));
    }
    if let Some(person_type) = filter.person_type {
        query = query.filter(
            ledger_entries::Column::PersonId.in_subquery(
                Query::select()
                    .column(persons::Column::Id)
                    .from(persons::Entity)
                    .and_where(persons::Column::BranchId.eq(branch_id.into_inner()))
                    .and_where(persons::Column::PersonType.eq(PersonTypeDb::from(person_type)))
                    .to_owned(),
            ),
        );
    }

    query
        .order_by_asc(ledger_entries::Column::Date)
        .order_by_asc(ledger_entries::Column::Id)
        .all(conn)
        .await?
        .into_iter()
        .map(to_entry)
        .collect()
}

/// Filter for rows [`load_entries`] already selected.
fn already_filtered() -> LedgerFilter {
    LedgerFilter {
        include_drafts: true,
        ..LedgerFilter::default()
    }
}

/// Rows generated by one source document.
pub(crate) async fn entries_for_origin<C: ConnectionTrait>(
    conn: &C,
    branch_id: BranchId,
    origin: Origin,
) -> Result<Vec<LedgerEntry>, RepoError> {
    let links = origin.links();
    let mut query = ledger_entries::Entity::find()
        .filter(ledger_entries::Column::BranchId.eq(branch_id.into_inner()));
    query = match origin {
        Origin::Transaction { id, .. } => {
            query.filter(ledger_entries::Column::TransactionId.eq(id.into_inner()))
        }
        Origin::ExternalCheque { id, .. } => {
            query.filter(ledger_entries::Column::ExternalChequeId.eq(id.into_inner()))
        }
        Origin::PersonalCheque { id, .. } => {
            query.filter(ledger_entries::Column::PersonalChequeId.eq(id.into_inner()))
        }
        Origin::Payment { id, .. } => {
            query.filter(ledger_entries::Column::PaymentId.eq(id.into_inner()))
        }
        Origin::RawTransaction { id, .. } => {
            query.filter(ledger_entries::Column::RawTransactionId.eq(id.into_inner()))
        }
        Origin::RawDebit { id, .. } => {
            query.filter(ledger_entries::Column::RawDebitId.eq(id.into_inner()))
        }
        Origin::Manual => query
            .filter(ledger_entries::Column::TransactionId.is_null())
            .filter(ledger_entries::Column::ExternalChequeId.is_null())
            .filter(ledger_entries::Column::PersonalChequeId.is_null())
            .filter(ledger_entries::Column::PaymentId.is_null())
            .filter(ledger_entries::Column::RawTransactionId.is_null())
            .filter(ledger_entries::Column::RawDebitId.is_null()),
    };
    debug!(origin = origin.kind(), serial = ?links.source_serial, "loading ledger rows");

    query
        .order_by_asc(ledger_entries::Column::Date)
        .all(conn)
        .await?
        .into_iter()
        .map(to_entry)
        .collect()
}

fn to_entry(model: ledger_entries::Model) -> Result<LedgerEntry, RepoError> {
    let links = OriginLinks {
        transaction_id: model.transaction_id,
        external_cheque_id: model.external_cheque_id,
        personal_cheque_id: model.personal_cheque_id,
        payment_id: model.payment_id,
        raw_transaction_id: model.raw_transaction_id,
        raw_debit_id: model.raw_debit_id,
        source_serial: model.source_serial,
    };
    let origin = Origin::from_links(&links, model.detail.as_deref())?;

    Ok(LedgerEntry {
        id: model.id.into(),
        branch_id: model.branch_id.into(),
        date: model.date,
        amount: model.amount,
        nature: model.nature.into(),
        person_id: model.person_id.into(),
        account_type_id: model.account_type_id.map(Into::into),
        origin,
        detail: model.detail,
        draft: model.draft,
    })
}
