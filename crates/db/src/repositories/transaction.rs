//! Finished-goods transaction repository.
//!
//! A transaction writes its header, its detail lines, the stock changes
//! planned by [`StockService`] and its ledger rows in one database
//! transaction. Stock rows are locked before they are read so two sales of
//! the same key cannot both pass the low-stock check.

use std::collections::HashMap;

use chrono::Utc;
use loomledger_core::ledger::{NewLedgerEntry, Origin};
use loomledger_core::reports::{FactLine, TransactionFact};
use loomledger_core::stock::{
    DetailLine, StockChange, StockError, StockKey, StockLevel, StockService, TransactionInput,
    TransactionKind, TransactionTotals,
};
use loomledger_shared::types::{
    AccountTypeId, BranchId, PersonId, StockId, TransactionDetailId, TransactionId,
};
use loomledger_shared::{Permission, RequestContext};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction,
    EntityTrait, IntoActiveModel, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use serde::Serialize;
use tracing::{debug, info};

use super::common::{authorize, cleanup, for_update, person_types, require_account_type, require_person};
use super::ledger::insert_entry;
use super::serial::{SerialKind, next_serial};
use crate::entities::{ledger_entries, stocks, transaction_details, transactions};
use crate::error::RepoError;

/// A transaction header with its lines.
#[derive(Debug, Clone, Serialize)]
pub struct TransactionWithDetails {
    /// Header row.
    pub header: transactions::Model,
    /// Sale, purchase or return.
    pub kind: TransactionKind,
    /// Gross, discount and net.
    pub totals: TransactionTotals,
    /// Detail rows.
    pub details: Vec<transaction_details::Model>,
}

/// Input for resetting a stock row's opening values.
#[derive(Debug, Clone, Copy)]
pub struct SetOpeningStockInput {
    /// Product, warehouse and yards per piece.
    pub key: StockKey,
    /// Opening quantity.
    pub quantity: Decimal,
    /// Opening rate, used to value inventory.
    pub rate: Decimal,
}

/// Finished-goods transaction repository.
#[derive(Debug, Clone)]
pub struct TransactionRepository {
    db: DatabaseConnection,
}

impl TransactionRepository {
    /// Creates a new transaction repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Posts a sale, purchase or return.
    ///
    /// # Errors
    ///
    /// - validation errors from [`StockService::validate_transaction`]
    /// - [`StockError::InsufficientStock`] / [`StockError::StockNotFound`] on a debit line
    /// - [`RepoError::NotFound`] for an unknown person or paid account
    pub async fn post_transaction(
        &self,
        ctx: &RequestContext,
        input: TransactionInput,
    ) -> Result<TransactionWithDetails, RepoError> {
        authorize(ctx, Permission::PostTransactions)?;
        let totals = StockService::validate_transaction(&input)?;

        let txn = self.db.begin().await?;
        let person = require_person(&txn, ctx.branch_id, input.person_id).await?;
        let paid_account = paid_account_name(&txn, ctx.branch_id, &input).await?;
        let kind = TransactionKind::from_parts(input.nature, person.person_type.into());

        let serial = next_serial(&txn, ctx.branch_id, SerialKind::Transaction).await?;
        let header = transactions::ActiveModel {
            id: Set(TransactionId::new().into_inner()),
            branch_id: Set(ctx.branch_id.into_inner()),
            serial: Set(serial),
            person_id: Set(input.person_id.into_inner()),
            nature: Set(input.nature.into()),
            date: Set(input.date),
            discount: Set(input.discount),
            paid: Set(input.paid),
            paid_account_id: Set(input.paid_account_id.map(AccountTypeId::into_inner)),
            paid_amount: Set(input.paid_amount),
            created_at: Set(Utc::now().into()),
        }
        .insert(&txn)
        .await?;

        apply_changes(&txn, ctx.branch_id, &StockService::plan_post(input.nature, &input.details)).await?;
        let details = insert_details(&txn, header.id, &input.details).await?;
        post_ledger(&txn, ctx.branch_id, &header, &input, &totals, paid_account).await?;
        txn.commit().await?;

        info!(
            branch = %ctx.branch_id,
            serial,
            %kind,
            net = %totals.net,
            lines = details.len(),
            "transaction posted"
        );
        Ok(TransactionWithDetails {
            header,
            kind,
            totals,
            details,
        })
    }

    /// Replaces a transaction's header fields and detail lines.
    ///
    /// Lines carrying the id of an existing line are kept; the rest are new.
    /// Old lines not mentioned are removed. Stock is adjusted by the netted
    /// difference and the ledger rows are posted again.
    ///
    /// # Errors
    ///
    /// - [`StockError::TransactionNotFound`] if the transaction is not in the branch
    /// - [`StockError::DetailNotFound`] if a kept id belongs to another transaction
    /// - [`StockError::InsufficientStock`] if the new effect takes stock below zero
    pub async fn update_transaction(
        &self,
        ctx: &RequestContext,
        id: TransactionId,
        input: TransactionInput,
    ) -> Result<TransactionWithDetails, RepoError> {
        authorize(ctx, Permission::PostTransactions)?;
        let totals = StockService::validate_transaction(&input)?;

        let txn = self.db.begin().await?;
        let header = load_header(&txn, ctx.branch_id, id, true).await?;
        let person = require_person(&txn, ctx.branch_id, input.person_id).await?;
        let paid_account = paid_account_name(&txn, ctx.branch_id, &input).await?;
        let kind = TransactionKind::from_parts(input.nature, person.person_type.into());

        let old_details: Vec<DetailLine> = load_details(&txn, header.id)
            .await?
            .into_iter()
            .map(to_detail_line)
            .collect();
        let changes = StockService::plan_update(
            header.nature.into(),
            &old_details,
            input.nature,
            &input.details,
        )?;
        apply_changes(&txn, ctx.branch_id, &changes).await?;

        transaction_details::Entity::delete_many()
            .filter(transaction_details::Column::TransactionId.eq(header.id))
            .exec(&txn)
            .await?;
        let details = insert_details(&txn, header.id, &input.details).await?;

        let mut active = header.into_active_model();
        active.person_id = Set(input.person_id.into_inner());
        active.nature = Set(input.nature.into());
        active.date = Set(input.date);
        active.discount = Set(input.discount);
        active.paid = Set(input.paid);
        active.paid_account_id = Set(input.paid_account_id.map(AccountTypeId::into_inner));
        active.paid_amount = Set(input.paid_amount);
        let header = active.update(&txn).await?;

        ledger_entries::Entity::delete_many()
            .filter(ledger_entries::Column::TransactionId.eq(header.id))
            .exec(&txn)
            .await?;
        post_ledger(&txn, ctx.branch_id, &header, &input, &totals, paid_account).await?;
        txn.commit().await?;

        info!(
            branch = %ctx.branch_id,
            serial = header.serial,
            %kind,
            stock_changes = changes.len(),
            "transaction updated"
        );
        Ok(TransactionWithDetails {
            header,
            kind,
            totals,
            details,
        })
    }

    /// Deletes a transaction, reversing its stock effect.
    ///
    /// Ledger rows are removed best-effort.
    ///
    /// # Errors
    ///
    /// Returns [`StockError::InsufficientStock`] if a purchase being deleted
    /// has already been sold.
    pub async fn delete_transaction(
        &self,
        ctx: &RequestContext,
        id: TransactionId,
    ) -> Result<(), RepoError> {
        authorize(ctx, Permission::DeleteDocuments)?;

        let txn = self.db.begin().await?;
        let header = load_header(&txn, ctx.branch_id, id, true).await?;
        let details: Vec<DetailLine> = load_details(&txn, header.id)
            .await?
            .into_iter()
            .map(to_detail_line)
            .collect();
        apply_changes(
            &txn,
            ctx.branch_id,
            &StockService::plan_delete(header.nature.into(), &details),
        )
        .await?;

        cleanup(
            &txn,
            "ledger rows",
            header.id,
            ledger_entries::Entity::delete_many()
                .filter(ledger_entries::Column::TransactionId.eq(header.id)),
        )
        .await;
        transaction_details::Entity::delete_many()
            .filter(transaction_details::Column::TransactionId.eq(header.id))
            .exec(&txn)
            .await?;
        transactions::Entity::delete_by_id(header.id).exec(&txn).await?;
        txn.commit().await?;

        info!(branch = %ctx.branch_id, serial = header.serial, "transaction deleted");
        Ok(())
    }

    /// Loads one transaction with its lines.
    pub async fn get_transaction(
        &self,
        ctx: &RequestContext,
        id: TransactionId,
    ) -> Result<TransactionWithDetails, RepoError> {
        authorize(ctx, Permission::ViewLedger)?;

        let header = load_header(&self.db, ctx.branch_id, id, false).await?;
        let person = require_person(&self.db, ctx.branch_id, header.person_id.into()).await?;
        let details = load_details(&self.db, header.id).await?;
        let lines: Vec<DetailLine> = details.iter().cloned().map(to_detail_line).collect();

        Ok(TransactionWithDetails {
            kind: TransactionKind::from_parts(header.nature.into(), person.person_type.into()),
            totals: StockService::totals(&lines, header.discount),
            header,
            details,
        })
    }

    /// Creates or resets the opening values of a stock row.
    ///
    /// `stock_quantity` moves by the change in opening quantity.
    ///
    /// # Errors
    ///
    /// - [`StockError::InvalidQuantity`] / [`StockError::NegativeRate`] on negative input
    /// - [`StockError::InsufficientStock`] if lowering the opening would go below zero
    pub async fn set_opening_stock(
        &self,
        ctx: &RequestContext,
        input: SetOpeningStockInput,
    ) -> Result<StockLevel, RepoError> {
        authorize(ctx, Permission::ManageStock)?;
        if input.quantity < Decimal::ZERO {
            return Err(StockError::InvalidQuantity(input.quantity).into());
        }
        if input.rate < Decimal::ZERO {
            return Err(StockError::NegativeRate(input.rate).into());
        }

        let txn = self.db.begin().await?;
        let row = match find_stock(&txn, ctx.branch_id, &input.key).await? {
            Some(row) => {
                let level = to_level(&row);
                let change = StockChange {
                    key: input.key,
                    delta: StockService::opening_delta(level.opening_stock, input.quantity),
                };
                let quantity = StockService::apply(Some(&level), &change)?;
                let mut active = row.into_active_model();
                active.stock_quantity = Set(quantity);
                active.opening_stock = Set(input.quantity);
                active.opening_stock_rate = Set(input.rate);
                active.update(&txn).await?
            }
            None => {
                insert_stock(&txn, ctx.branch_id, &input.key, input.quantity, input.quantity, input.rate)
                    .await?
            }
        };
        txn.commit().await?;

        info!(
            branch = %ctx.branch_id,
            product = %input.key.product_id,
            warehouse = %input.key.warehouse_id,
            opening = %input.quantity,
            "opening stock set"
        );
        Ok(to_level(&row))
    }

    /// Every stock row of the branch.
    pub async fn list_stock(&self, ctx: &RequestContext) -> Result<Vec<StockLevel>, RepoError> {
        authorize(ctx, Permission::ViewReports)?;
        load_stock_levels(&self.db, ctx.branch_id).await
    }
}

/// Every stock row of the branch.
pub(crate) async fn load_stock_levels<C: ConnectionTrait>(
    conn: &C,
    branch_id: BranchId,
) -> Result<Vec<StockLevel>, RepoError> {
    let rows = stocks::Entity::find()
        .filter(stocks::Column::BranchId.eq(branch_id.into_inner()))
        .all(conn)
        .await?;
    Ok(rows.iter().map(to_level).collect())
}

/// Every transaction of the branch reduced to its kind, discount and lines.
pub(crate) async fn load_facts<C: ConnectionTrait>(
    conn: &C,
    branch_id: BranchId,
) -> Result<Vec<TransactionFact>, RepoError> {
    let types = person_types(conn, branch_id).await?;
    let headers = transactions::Entity::find()
        .filter(transactions::Column::BranchId.eq(branch_id.into_inner()))
        .order_by_asc(transactions::Column::Date)
        .all(conn)
        .await?;

    let mut lines: HashMap<uuid::Uuid, Vec<FactLine>> = HashMap::new();
    for detail in transaction_details::Entity::find()
        .filter(transaction_details::Column::TransactionId.is_in(headers.iter().map(|h| h.id)))
        .all(conn)
        .await?
    {
        lines.entry(detail.transaction_id).or_default().push(FactLine {
            product_id: detail.product_id.into(),
            quantity: detail.quantity,
            amount: detail.amount,
        });
    }

    headers
        .into_iter()
        .map(|header| {
            let person_type = types
                .get(&PersonId::from(header.person_id))
                .copied()
                .ok_or_else(|| {
                    RepoError::Corrupt(format!("transaction {} has no person", header.id))
                })?;
            Ok(TransactionFact {
                date: header.date,
                kind: TransactionKind::from_parts(header.nature.into(), person_type),
                discount: header.discount,
                lines: lines.remove(&header.id).unwrap_or_default(),
            })
        })
        .collect()
}

async fn paid_account_name(
    txn: &DatabaseTransaction,
    branch_id: BranchId,
    input: &TransactionInput,
) -> Result<Option<String>, RepoError> {
    match input.paid_account_id {
        Some(account) if input.paid => Ok(Some(
            require_account_type(txn, branch_id, account).await?.name,
        )),
        _ => Ok(None),
    }
}

/// Posts the net row and, when paid, the settling row on the paid account.
async fn post_ledger(
    txn: &DatabaseTransaction,
    branch_id: BranchId,
    header: &transactions::Model,
    input: &TransactionInput,
    totals: &TransactionTotals,
    paid_account: Option<String>,
) -> Result<(), RepoError> {
    let origin = Origin::Transaction {
        id: header.id.into(),
        serial: header.serial,
    };
    insert_entry(
        txn,
        branch_id,
        &NewLedgerEntry::posted(input.date, totals.net, input.nature, input.person_id, None, origin),
    )
    .await?;

    if let (Some(account), Some(name)) = (input.paid_account_id, paid_account) {
        insert_entry(
            txn,
            branch_id,
            &NewLedgerEntry::posted(
                input.date,
                input.paid_amount,
                input.nature.opposite(),
                input.person_id,
                Some(account),
                origin,
            )
            .with_detail(format!("Paid on {name}")),
        )
        .await?;
    }
    Ok(())
}

/// Applies netted stock changes, creating rows for incoming keys.
async fn apply_changes(
    txn: &DatabaseTransaction,
    branch_id: BranchId,
    changes: &[StockChange],
) -> Result<(), RepoError> {
    for change in changes.iter().filter(|c| !c.delta.is_zero()) {
        match find_stock(txn, branch_id, &change.key).await? {
            Some(row) => {
                let quantity = StockService::apply(Some(&to_level(&row)), change)?;
                let mut active = row.into_active_model();
                active.stock_quantity = Set(quantity);
                active.update(txn).await?;
            }
            None => {
                let quantity = StockService::apply(None, change)?;
                insert_stock(txn, branch_id, &change.key, quantity, Decimal::ZERO, Decimal::ZERO)
                    .await?;
            }
        }
        debug!(
            product = %change.key.product_id,
            warehouse = %change.key.warehouse_id,
            delta = %change.delta,
            "stock adjusted"
        );
    }
    Ok(())
}

async fn find_stock(
    txn: &DatabaseTransaction,
    branch_id: BranchId,
    key: &StockKey,
) -> Result<Option<stocks::Model>, RepoError> {
    Ok(for_update(
        stocks::Entity::find()
            .filter(stocks::Column::BranchId.eq(branch_id.into_inner()))
            .filter(stocks::Column::ProductId.eq(key.product_id.into_inner()))
            .filter(stocks::Column::WarehouseId.eq(key.warehouse_id.into_inner()))
            .filter(stocks::Column::YardsPerPiece.eq(key.yards_per_piece)),
        txn,
    )
    .one(txn)
    .await?)
}

async fn insert_stock(
    txn: &DatabaseTransaction,
    branch_id: BranchId,
    key: &StockKey,
    quantity: Decimal,
    opening: Decimal,
    opening_rate: Decimal,
) -> Result<stocks::Model, RepoError> {
    Ok(stocks::ActiveModel {
        id: Set(StockId::new().into_inner()),
        branch_id: Set(branch_id.into_inner()),
        product_id: Set(key.product_id.into_inner()),
        warehouse_id: Set(key.warehouse_id.into_inner()),
        yards_per_piece: Set(key.yards_per_piece),
        stock_quantity: Set(quantity),
        opening_stock: Set(opening),
        opening_stock_rate: Set(opening_rate),
    }
    .insert(txn)
    .await?)
}

async fn insert_details(
    txn: &DatabaseTransaction,
    transaction_id: uuid::Uuid,
    lines: &[DetailLine],
) -> Result<Vec<transaction_details::Model>, RepoError> {
    let mut details = Vec::with_capacity(lines.len());
    for line in lines {
        let detail = transaction_details::ActiveModel {
            id: Set(line.id.unwrap_or_default().into_inner()),
            transaction_id: Set(transaction_id),
            product_id: Set(line.key.product_id.into_inner()),
            warehouse_id: Set(line.key.warehouse_id.into_inner()),
            yards_per_piece: Set(line.key.yards_per_piece),
            quantity: Set(line.quantity),
            rate: Set(line.rate),
            amount: Set(line.amount()),
        }
        .insert(txn)
        .await?;
        details.push(detail);
    }
    Ok(details)
}

async fn load_header<C: ConnectionTrait>(
    conn: &C,
    branch_id: BranchId,
    id: TransactionId,
    lock: bool,
) -> Result<transactions::Model, RepoError> {
    let query = transactions::Entity::find_by_id(id.into_inner())
        .filter(transactions::Column::BranchId.eq(branch_id.into_inner()));
    let query = if lock { for_update(query, conn) } else { query };
    query
        .one(conn)
        .await?
        .ok_or_else(|| StockError::TransactionNotFound(id.into_inner()).into())
}

async fn load_details<C: ConnectionTrait>(
    conn: &C,
    transaction_id: uuid::Uuid,
) -> Result<Vec<transaction_details::Model>, RepoError> {
    Ok(transaction_details::Entity::find()
        .filter(transaction_details::Column::TransactionId.eq(transaction_id))
        .all(conn)
        .await?)
}

fn to_detail_line(model: transaction_details::Model) -> DetailLine {
    DetailLine {
        id: Some(TransactionDetailId::from(model.id)),
        key: StockKey {
            product_id: model.product_id.into(),
            warehouse_id: model.warehouse_id.into(),
            yards_per_piece: model.yards_per_piece,
        },
        quantity: model.quantity,
        rate: model.rate,
    }
}

fn to_level(model: &stocks::Model) -> StockLevel {
    StockLevel {
        id: StockId::from(model.id),
        key: StockKey {
            product_id: model.product_id.into(),
            warehouse_id: model.warehouse_id.into(),
            yards_per_piece: model.yards_per_piece,
        },
        stock_quantity: model.stock_quantity,
        opening_stock: model.opening_stock,
        opening_stock_rate: model.opening_stock_rate,
    }
}
