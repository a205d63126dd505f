//! Branch-scoped document serials.
//!
//! Each `(branch, kind)` pair owns one counter row. The row is locked and
//! bumped inside the caller's transaction, so two writers can never hand out
//! the same number and a rolled-back operation leaves at most a gap.

use loomledger_shared::types::BranchId;
use sea_orm::{ActiveModelTrait, DatabaseTransaction, EntityTrait, Set};

use super::common::for_update;
use crate::entities::serial_counters;
use crate::error::RepoError;

/// Document kinds that draw from a serial counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SerialKind {
    /// Finished-goods transaction.
    Transaction,
    /// Received cheque.
    ExternalCheque,
    /// Issued cheque.
    PersonalCheque,
    /// Raw purchase lot number.
    RawLot,
    /// Raw sale or return.
    RawDebit,
    /// Raw warehouse transfer.
    RawTransfer,
    /// Dye issue.
    DyingIssue,
    /// Cash or bank payment.
    Payment,
}

impl SerialKind {
    /// Key stored in `serial_counters.kind`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Transaction => "transaction",
            Self::ExternalCheque => "external_cheque",
            Self::PersonalCheque => "personal_cheque",
            Self::RawLot => "raw_lot",
            Self::RawDebit => "raw_debit",
            Self::RawTransfer => "raw_transfer",
            Self::DyingIssue => "dying_issue",
            Self::Payment => "payment",
        }
    }
}

/// Hands out the next serial for `kind`.
pub(crate) async fn next_serial(
    txn: &DatabaseTransaction,
    branch_id: BranchId,
    kind: SerialKind,
) -> Result<i64, RepoError> {
    advance(txn, branch_id, kind, None).await
}

/// Moves the counter past a serial chosen by the caller (import path).
///
/// Later calls to [`next_serial`] continue after `used`.
pub(crate) async fn reserve_serial(
    txn: &DatabaseTransaction,
    branch_id: BranchId,
    kind: SerialKind,
    used: i64,
) -> Result<(), RepoError> {
    advance(txn, branch_id, kind, Some(used)).await.map(|_| ())
}

async fn advance(
    txn: &DatabaseTransaction,
    branch_id: BranchId,
    kind: SerialKind,
    used: Option<i64>,
) -> Result<i64, RepoError> {
    let key = (branch_id.into_inner(), kind.as_str().to_string());
    let current = for_update(serial_counters::Entity::find_by_id(key.clone()), txn)
        .one(txn)
        .await?;

    match current {
        Some(row) => {
            let next = used.map_or(row.last_value + 1, |u| u.max(row.last_value));
            let mut active: serial_counters::ActiveModel = row.into();
            active.last_value = Set(next);
            active.update(txn).await?;
            Ok(next)
        }
        None => {
            let next = used.unwrap_or(1);
            serial_counters::ActiveModel {
                branch_id: Set(key.0),
                kind: Set(key.1),
                last_value: Set(next),
            }
            .insert(txn)
            .await?;
            Ok(next)
        }
    }
}
