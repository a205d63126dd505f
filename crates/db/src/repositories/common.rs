//! Helpers shared by the repositories.

use std::collections::HashMap;

use loomledger_core::ledger::PersonType;
use loomledger_shared::types::{AccountTypeId, BranchId, PersonId};
use loomledger_shared::{Permission, RequestContext};
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseTransaction, DbBackend, DbErr, DeleteMany, EntityTrait,
    QueryFilter, QuerySelect, Select, TransactionTrait,
};
use tracing::{debug, warn};
use uuid::Uuid;

use super::directory::LinkedAccountKind;
use crate::entities::{account_types, linked_accounts, persons};
use crate::error::RepoError;

/// Fails with [`RepoError::Forbidden`] unless the caller holds `permission`.
pub(crate) fn authorize(ctx: &RequestContext, permission: Permission) -> Result<(), RepoError> {
    ctx.require(permission).map_err(RepoError::from)
}

/// Adds `FOR UPDATE` on backends with row locks.
///
/// SQLite serializes writers on its own.
pub(crate) fn for_update<E, C>(select: Select<E>, conn: &C) -> Select<E>
where
    E: EntityTrait,
    C: ConnectionTrait,
{
    if conn.get_database_backend() == DbBackend::Postgres {
        select.lock_exclusive()
    } else {
        select
    }
}

/// Runs a dependent-row delete inside a savepoint, logging and swallowing failure.
///
/// The outer transaction stays usable whatever happens here.
pub(crate) async fn cleanup<E>(
    txn: &DatabaseTransaction,
    what: &'static str,
    document_id: Uuid,
    delete: DeleteMany<E>,
) where
    E: EntityTrait,
{
    let result: Result<u64, DbErr> = async {
        let savepoint = txn.begin().await?;
        let rows = delete.exec(&savepoint).await?.rows_affected;
        savepoint.commit().await?;
        Ok(rows)
    }
    .await;

    match result {
        Ok(rows) => debug!(%document_id, what, rows, "dependent rows removed"),
        Err(err) => warn!(%document_id, what, error = %err, "cascade cleanup failed"),
    }
}

/// Loads a person of the branch.
pub(crate) async fn require_person<C: ConnectionTrait>(
    conn: &C,
    branch_id: BranchId,
    person_id: PersonId,
) -> Result<persons::Model, RepoError> {
    persons::Entity::find_by_id(person_id.into_inner())
        .filter(persons::Column::BranchId.eq(branch_id.into_inner()))
        .one(conn)
        .await?
        .ok_or_else(|| RepoError::not_found("person", person_id))
}

/// Loads an account type of the branch.
pub(crate) async fn require_account_type<C: ConnectionTrait>(
    conn: &C,
    branch_id: BranchId,
    account_type_id: AccountTypeId,
) -> Result<account_types::Model, RepoError> {
    account_types::Entity::find_by_id(account_type_id.into_inner())
        .filter(account_types::Column::BranchId.eq(branch_id.into_inner()))
        .one(conn)
        .await?
        .ok_or_else(|| RepoError::not_found("account type", account_type_id))
}

/// Person type of every person in the branch.
pub(crate) async fn person_types<C: ConnectionTrait>(
    conn: &C,
    branch_id: BranchId,
) -> Result<HashMap<PersonId, PersonType>, RepoError> {
    let rows = persons::Entity::find()
        .filter(persons::Column::BranchId.eq(branch_id.into_inner()))
        .all(conn)
        .await?;
    Ok(rows
        .into_iter()
        .map(|p| (PersonId::from(p.id), PersonType::from(p.person_type)))
        .collect())
}

/// Account type linked to `kind` for the branch, if configured.
pub(crate) async fn linked_account<C: ConnectionTrait>(
    conn: &C,
    branch_id: BranchId,
    kind: LinkedAccountKind,
) -> Result<Option<AccountTypeId>, RepoError> {
    let row = linked_accounts::Entity::find_by_id((branch_id.into_inner(), kind.as_str().to_string()))
        .one(conn)
        .await?;
    Ok(row.map(|r| AccountTypeId::from(r.account_type_id)))
}
