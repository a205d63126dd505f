//! Raw lot repository.
//!
//! Raw stock is never stored as a running total. Each operation writes its
//! event rows, then the whole branch position is rebuilt from the four event
//! tables and handed to [`RawStockReconciler`]. Sales and transfers are also
//! pre-checked against the touched lots before anything is written, so the
//! error names the offending lot. Any failure drops the transaction and the
//! batch disappears with it.

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use loomledger_core::ledger::{Nature, NewLedgerEntry, Origin};
use loomledger_core::raw::{
    DebitLine, InventoryCheck, LotLine, PositionRow, PricedLine, RawDebitType, RawEvents,
    RawProductInfo, RawStockError, RawStockReconciler, TransferLine,
};
use loomledger_shared::types::{
    BranchId, DyingIssueId, DyingUnitId, FormulaId, PersonId, RawDebitId, RawProductId,
    RawTransactionId, RawTransferId, WarehouseId,
};
use loomledger_shared::{Permission, RequestContext};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction,
    EntityTrait, PaginatorTrait, QueryFilter, Set, TransactionTrait,
};
use tracing::{debug, info};
use uuid::Uuid;

use super::common::{authorize, cleanup, for_update, require_person};
use super::ledger::insert_entry;
use super::serial::{SerialKind, next_serial, reserve_serial};
use crate::entities::{
    dying_issue_details, dying_issues, ledger_entries, raw_debit_lot_details, raw_debits,
    raw_lot_details, raw_products, raw_transactions, raw_transfer_lot_details, raw_transfers,
};
use crate::error::RepoError;

/// One line of a purchase lot.
#[derive(Debug, Clone, Copy)]
pub struct RawLotLineInput {
    /// Raw product bought.
    pub raw_product_id: RawProductId,
    /// Receiving warehouse; must be empty when the lot goes straight to dyeing.
    pub warehouse_id: Option<WarehouseId>,
    /// Measured gazaana.
    pub actual_gazaana: Decimal,
    /// Invoiced gazaana.
    pub expected_gazaana: Decimal,
    /// Dyeing formula, if already known.
    pub formula_id: Option<FormulaId>,
    /// Quantity bought.
    pub quantity: Decimal,
    /// Rate per unit.
    pub rate: Decimal,
}

/// Input for a purchase lot.
#[derive(Debug, Clone)]
pub struct CreateRawLotInput {
    /// Supplier.
    pub person_id: PersonId,
    /// Purchase date.
    pub date: NaiveDate,
    /// Sent straight to dyeing instead of a warehouse.
    pub issued: bool,
    /// Dyeing unit, required when issued.
    pub dying_unit_id: Option<DyingUnitId>,
    /// Explicit lot number (imports); the next lot serial otherwise.
    pub lot_number: Option<i64>,
    /// Lines bought.
    pub lines: Vec<RawLotLineInput>,
}

/// Input for a raw sale or return.
#[derive(Debug, Clone)]
pub struct CreateRawDebitInput {
    /// Customer or supplier.
    pub person_id: PersonId,
    /// Sale, purchase return or sale return.
    pub debit_type: RawDebitType,
    /// Document date.
    pub date: NaiveDate,
    /// Lot lines with their rate.
    pub lines: Vec<PricedLine>,
}

/// Input for moving lot quantities between warehouses.
#[derive(Debug, Clone)]
pub struct CreateRawTransferInput {
    /// Destination warehouse.
    pub to_warehouse_id: WarehouseId,
    /// Document date.
    pub date: NaiveDate,
    /// Lines, each naming the warehouse it leaves.
    pub lines: Vec<LotLine>,
}

/// Input for issuing lot quantities to a dyeing unit.
#[derive(Debug, Clone)]
pub struct CreateDyingIssueInput {
    /// Dyeing unit.
    pub dying_unit_id: DyingUnitId,
    /// Document date.
    pub date: NaiveDate,
    /// Lines consumed.
    pub lines: Vec<LotLine>,
}

/// Raw lot repository.
#[derive(Debug, Clone)]
pub struct RawStockRepository {
    db: DatabaseConnection,
}

impl RawStockRepository {
    /// Creates a new raw lot repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Records a purchase lot and posts a Credit row against the supplier.
    ///
    /// # Errors
    ///
    /// - [`RawStockError::DuplicateLotNumber`] for an explicit number already used
    /// - purchase validation errors (warehouse rules, quantities, rates)
    pub async fn create_raw_lot(
        &self,
        ctx: &RequestContext,
        input: CreateRawLotInput,
    ) -> Result<raw_transactions::Model, RepoError> {
        authorize(ctx, Permission::ManageRawLots)?;

        let txn = self.db.begin().await?;
        require_person(&txn, ctx.branch_id, input.person_id).await?;

        let lot_number = match input.lot_number {
            Some(number) => {
                let taken = raw_transactions::Entity::find()
                    .filter(raw_transactions::Column::BranchId.eq(ctx.branch_id.into_inner()))
                    .filter(raw_transactions::Column::LotNumber.eq(number))
                    .count(&txn)
                    .await?;
                if taken > 0 {
                    return Err(RawStockError::DuplicateLotNumber(number).into());
                }
                reserve_serial(&txn, ctx.branch_id, SerialKind::RawLot, number).await?;
                number
            }
            None => next_serial(&txn, ctx.branch_id, SerialKind::RawLot).await?,
        };

        let priced: Vec<PricedLine> = input
            .lines
            .iter()
            .map(|l| PricedLine {
                line: LotLine {
                    lot_number,
                    raw_product_id: l.raw_product_id,
                    warehouse_id: l.warehouse_id,
                    actual_gazaana: l.actual_gazaana,
                    expected_gazaana: l.expected_gazaana,
                    formula_id: l.formula_id,
                    quantity: l.quantity,
                },
                rate: l.rate,
            })
            .collect();
        RawStockReconciler::validate_purchase(
            lot_number,
            input.issued,
            input.dying_unit_id.is_some(),
            &priced,
        )?;

        let lot = raw_transactions::ActiveModel {
            id: Set(RawTransactionId::new().into_inner()),
            branch_id: Set(ctx.branch_id.into_inner()),
            lot_number: Set(lot_number),
            person_id: Set(input.person_id.into_inner()),
            date: Set(input.date),
            issued: Set(input.issued),
            dying_unit_id: Set(input.dying_unit_id.map(DyingUnitId::into_inner)),
        }
        .insert(&txn)
        .await?;

        for p in &priced {
            raw_lot_details::ActiveModel {
                id: Set(Uuid::now_v7()),
                raw_transaction_id: Set(lot.id),
                raw_product_id: Set(p.line.raw_product_id.into_inner()),
                warehouse_id: Set(p.line.warehouse_id.map(WarehouseId::into_inner)),
                actual_gazaana: Set(p.line.actual_gazaana),
                expected_gazaana: Set(p.line.expected_gazaana),
                formula_id: Set(p.line.formula_id.map(FormulaId::into_inner)),
                quantity: Set(p.line.quantity),
                rate: Set(p.rate),
            }
            .insert(&txn)
            .await?;
        }

        insert_entry(
            &txn,
            ctx.branch_id,
            &NewLedgerEntry::posted(
                input.date,
                RawStockReconciler::batch_amount(&priced),
                Nature::Credit,
                input.person_id,
                None,
                Origin::RawTransaction {
                    id: lot.id.into(),
                    lot_number,
                },
            ),
        )
        .await?;
        txn.commit().await?;

        info!(branch = %ctx.branch_id, lot_number, lines = priced.len(), "raw lot purchased");
        Ok(lot)
    }

    /// Records a raw sale or return and posts its ledger row.
    ///
    /// Outgoing types are checked line by line against the touched lots
    /// before writing; a purchase return must come from the lot's supplier.
    ///
    /// # Errors
    ///
    /// - [`RawStockError::LowStock`] / [`RawStockError::UnknownLot`] / [`RawStockError::LotOwnerMismatch`]
    /// - [`RawStockError::NegativeStock`] if the branch position goes negative afterwards
    pub async fn create_raw_debit(
        &self,
        ctx: &RequestContext,
        input: CreateRawDebitInput,
    ) -> Result<raw_debits::Model, RepoError> {
        authorize(ctx, Permission::ManageRawLots)?;
        RawStockReconciler::validate_priced(&input.lines)?;

        let txn = self.db.begin().await?;
        require_person(&txn, ctx.branch_id, input.person_id).await?;

        let nature = input.debit_type.nature();
        let proposed: Vec<LotLine> = input.lines.iter().map(|p| p.line).collect();
        let owners = lock_lots(&txn, ctx.branch_id, &proposed).await?;

        if nature == Nature::Debit {
            let position = position(&txn, ctx.branch_id).await?;
            let required_owner = input
                .debit_type
                .requires_same_person()
                .then_some(input.person_id);
            RawStockReconciler::check_stock(&proposed, &position, &owners, required_owner)?;
        } else if let Some(line) = proposed.iter().find(|l| !owners.contains_key(&l.lot_number)) {
            return Err(RawStockError::UnknownLot(line.lot_number).into());
        }

        let serial = next_serial(&txn, ctx.branch_id, SerialKind::RawDebit).await?;
        let debit = raw_debits::ActiveModel {
            id: Set(RawDebitId::new().into_inner()),
            branch_id: Set(ctx.branch_id.into_inner()),
            serial: Set(serial),
            person_id: Set(input.person_id.into_inner()),
            debit_type: Set(input.debit_type.into()),
            date: Set(input.date),
        }
        .insert(&txn)
        .await?;

        for p in &input.lines {
            raw_debit_lot_details::ActiveModel {
                id: Set(Uuid::now_v7()),
                raw_debit_id: Set(debit.id),
                lot_number: Set(p.line.lot_number),
                raw_product_id: Set(p.line.raw_product_id.into_inner()),
                warehouse_id: Set(p.line.warehouse_id.map(WarehouseId::into_inner)),
                actual_gazaana: Set(p.line.actual_gazaana),
                expected_gazaana: Set(p.line.expected_gazaana),
                formula_id: Set(p.line.formula_id.map(FormulaId::into_inner)),
                quantity: Set(p.line.quantity),
                rate: Set(p.rate),
                nature: Set(nature.into()),
            }
            .insert(&txn)
            .await?;
        }

        insert_entry(
            &txn,
            ctx.branch_id,
            &NewLedgerEntry::posted(
                input.date,
                RawStockReconciler::batch_amount(&input.lines),
                nature,
                input.person_id,
                None,
                Origin::RawDebit {
                    id: debit.id.into(),
                    serial,
                },
            ),
        )
        .await?;

        ensure_inventory(&txn, ctx.branch_id).await?;
        txn.commit().await?;

        info!(
            branch = %ctx.branch_id,
            serial,
            debit_type = %input.debit_type,
            lines = input.lines.len(),
            "raw debit recorded"
        );
        Ok(debit)
    }

    /// Moves lot quantities to another warehouse.
    ///
    /// # Errors
    ///
    /// - [`RawStockError::WarehouseRequired`] if a line has no source warehouse
    /// - [`RawStockError::SameWarehouse`] if a line already sits in the destination
    /// - [`RawStockError::LowStock`] if a source group holds too little
    pub async fn create_raw_transfer(
        &self,
        ctx: &RequestContext,
        input: CreateRawTransferInput,
    ) -> Result<raw_transfers::Model, RepoError> {
        authorize(ctx, Permission::ManageRawLots)?;
        RawStockReconciler::validate_transfer(&input.lines, input.to_warehouse_id)?;
        let sources = input
            .lines
            .iter()
            .map(|l| {
                l.warehouse_id
                    .map(|from| (*l, from))
                    .ok_or(RawStockError::WarehouseRequired(l.lot_number))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let txn = self.db.begin().await?;
        let owners = lock_lots(&txn, ctx.branch_id, &input.lines).await?;
        let position = position(&txn, ctx.branch_id).await?;
        RawStockReconciler::check_stock(&input.lines, &position, &owners, None)?;

        let serial = next_serial(&txn, ctx.branch_id, SerialKind::RawTransfer).await?;
        let transfer = raw_transfers::ActiveModel {
            id: Set(RawTransferId::new().into_inner()),
            branch_id: Set(ctx.branch_id.into_inner()),
            serial: Set(serial),
            to_warehouse_id: Set(input.to_warehouse_id.into_inner()),
            date: Set(input.date),
        }
        .insert(&txn)
        .await?;

        for (line, from) in &sources {
            raw_transfer_lot_details::ActiveModel {
                id: Set(Uuid::now_v7()),
                raw_transfer_id: Set(transfer.id),
                lot_number: Set(line.lot_number),
                raw_product_id: Set(line.raw_product_id.into_inner()),
                from_warehouse_id: Set(from.into_inner()),
                to_warehouse_id: Set(input.to_warehouse_id.into_inner()),
                actual_gazaana: Set(line.actual_gazaana),
                expected_gazaana: Set(line.expected_gazaana),
                formula_id: Set(line.formula_id.map(FormulaId::into_inner)),
                quantity: Set(line.quantity),
            }
            .insert(&txn)
            .await?;
        }

        ensure_inventory(&txn, ctx.branch_id).await?;
        txn.commit().await?;

        info!(branch = %ctx.branch_id, serial, to = %input.to_warehouse_id, "raw transfer recorded");
        Ok(transfer)
    }

    /// Issues lot quantities to a dyeing unit.
    ///
    /// Each line's raw product must be one the lot was purchased with.
    ///
    /// # Errors
    ///
    /// - [`RawStockError::UnknownLot`] / [`RawStockError::ProductNotInLot`]
    /// - [`RawStockError::NegativeStock`] if the branch position goes negative afterwards
    pub async fn create_dying_issue(
        &self,
        ctx: &RequestContext,
        input: CreateDyingIssueInput,
    ) -> Result<dying_issues::Model, RepoError> {
        authorize(ctx, Permission::ManageRawLots)?;

        let txn = self.db.begin().await?;
        lock_lots(&txn, ctx.branch_id, &input.lines).await?;
        let lot_products = lot_products(&txn, ctx.branch_id).await?;
        RawStockReconciler::validate_lot_products(&input.lines, &lot_products)?;

        let serial = next_serial(&txn, ctx.branch_id, SerialKind::DyingIssue).await?;
        let issue = dying_issues::ActiveModel {
            id: Set(DyingIssueId::new().into_inner()),
            branch_id: Set(ctx.branch_id.into_inner()),
            serial: Set(serial),
            dying_unit_id: Set(input.dying_unit_id.into_inner()),
            date: Set(input.date),
        }
        .insert(&txn)
        .await?;

        for line in &input.lines {
            dying_issue_details::ActiveModel {
                id: Set(Uuid::now_v7()),
                dying_issue_id: Set(issue.id),
                lot_number: Set(line.lot_number),
                raw_product_id: Set(line.raw_product_id.into_inner()),
                warehouse_id: Set(line.warehouse_id.map(WarehouseId::into_inner)),
                actual_gazaana: Set(line.actual_gazaana),
                expected_gazaana: Set(line.expected_gazaana),
                formula_id: Set(line.formula_id.map(FormulaId::into_inner)),
                quantity: Set(line.quantity),
            }
            .insert(&txn)
            .await?;
        }

        ensure_inventory(&txn, ctx.branch_id).await?;
        txn.commit().await?;

        info!(branch = %ctx.branch_id, serial, unit = %input.dying_unit_id, "dye issue recorded");
        Ok(issue)
    }

    /// Deletes a purchase lot with its lines and ledger rows.
    ///
    /// # Errors
    ///
    /// Returns [`RawStockError::NegativeStock`] if later documents still consume the lot.
    pub async fn delete_raw_lot(
        &self,
        ctx: &RequestContext,
        id: RawTransactionId,
    ) -> Result<(), RepoError> {
        authorize(ctx, Permission::DeleteDocuments)?;

        let txn = self.db.begin().await?;
        let lot = for_update(
            raw_transactions::Entity::find_by_id(id.into_inner())
                .filter(raw_transactions::Column::BranchId.eq(ctx.branch_id.into_inner())),
            &txn,
        )
        .one(&txn)
        .await?
        .ok_or(RawStockError::NotFound(id.into_inner()))?;

        cleanup(
            &txn,
            "ledger rows",
            lot.id,
            ledger_entries::Entity::delete_many()
                .filter(ledger_entries::Column::RawTransactionId.eq(lot.id)),
        )
        .await;
        raw_lot_details::Entity::delete_many()
            .filter(raw_lot_details::Column::RawTransactionId.eq(lot.id))
            .exec(&txn)
            .await?;
        raw_transactions::Entity::delete_by_id(lot.id).exec(&txn).await?;

        ensure_inventory(&txn, ctx.branch_id).await?;
        txn.commit().await?;

        info!(branch = %ctx.branch_id, lot_number = lot.lot_number, "raw lot deleted");
        Ok(())
    }

    /// Deletes a raw sale or return with its lines and ledger rows.
    ///
    /// # Errors
    ///
    /// Returns [`RawStockError::NegativeStock`] if removing a sale return leaves a lot short.
    pub async fn delete_raw_debit(
        &self,
        ctx: &RequestContext,
        id: RawDebitId,
    ) -> Result<(), RepoError> {
        authorize(ctx, Permission::DeleteDocuments)?;

        let txn = self.db.begin().await?;
        let debit = raw_debits::Entity::find_by_id(id.into_inner())
            .filter(raw_debits::Column::BranchId.eq(ctx.branch_id.into_inner()))
            .one(&txn)
            .await?
            .ok_or(RawStockError::NotFound(id.into_inner()))?;

        cleanup(
            &txn,
            "ledger rows",
            debit.id,
            ledger_entries::Entity::delete_many()
                .filter(ledger_entries::Column::RawDebitId.eq(debit.id)),
        )
        .await;
        raw_debit_lot_details::Entity::delete_many()
            .filter(raw_debit_lot_details::Column::RawDebitId.eq(debit.id))
            .exec(&txn)
            .await?;
        raw_debits::Entity::delete_by_id(debit.id).exec(&txn).await?;

        ensure_inventory(&txn, ctx.branch_id).await?;
        txn.commit().await?;

        info!(branch = %ctx.branch_id, serial = debit.serial, "raw debit deleted");
        Ok(())
    }

    /// Deletes a warehouse transfer.
    ///
    /// # Errors
    ///
    /// Returns [`RawStockError::NegativeStock`] if the destination already used the quantity.
    pub async fn delete_raw_transfer(
        &self,
        ctx: &RequestContext,
        id: RawTransferId,
    ) -> Result<(), RepoError> {
        authorize(ctx, Permission::DeleteDocuments)?;

        let txn = self.db.begin().await?;
        let transfer = raw_transfers::Entity::find_by_id(id.into_inner())
            .filter(raw_transfers::Column::BranchId.eq(ctx.branch_id.into_inner()))
            .one(&txn)
            .await?
            .ok_or(RawStockError::NotFound(id.into_inner()))?;

        raw_transfer_lot_details::Entity::delete_many()
            .filter(raw_transfer_lot_details::Column::RawTransferId.eq(transfer.id))
            .exec(&txn)
            .await?;
        raw_transfers::Entity::delete_by_id(transfer.id).exec(&txn).await?;

        ensure_inventory(&txn, ctx.branch_id).await?;
        txn.commit().await?;

        info!(branch = %ctx.branch_id, serial = transfer.serial, "raw transfer deleted");
        Ok(())
    }

    /// Deletes a dye issue, returning its quantities to the lots.
    pub async fn delete_dying_issue(
        &self,
        ctx: &RequestContext,
        id: DyingIssueId,
    ) -> Result<(), RepoError> {
        authorize(ctx, Permission::DeleteDocuments)?;

        let txn = self.db.begin().await?;
        let issue = dying_issues::Entity::find_by_id(id.into_inner())
            .filter(dying_issues::Column::BranchId.eq(ctx.branch_id.into_inner()))
            .one(&txn)
            .await?
            .ok_or(RawStockError::NotFound(id.into_inner()))?;

        dying_issue_details::Entity::delete_many()
            .filter(dying_issue_details::Column::DyingIssueId.eq(issue.id))
            .exec(&txn)
            .await?;
        dying_issues::Entity::delete_by_id(issue.id).exec(&txn).await?;

        ensure_inventory(&txn, ctx.branch_id).await?;
        txn.commit().await?;

        info!(branch = %ctx.branch_id, serial = issue.serial, "dye issue deleted");
        Ok(())
    }

    /// Current signed position of every lot group in the branch.
    pub async fn current_position(
        &self,
        ctx: &RequestContext,
    ) -> Result<Vec<PositionRow>, RepoError> {
        authorize(ctx, Permission::ViewRawStock)?;
        position(&self.db, ctx.branch_id).await
    }

    /// Position of one lot.
    pub async fn lot_position(
        &self,
        ctx: &RequestContext,
        lot_number: i64,
    ) -> Result<Vec<PositionRow>, RepoError> {
        authorize(ctx, Permission::ViewRawStock)?;
        let position = position(&self.db, ctx.branch_id).await?;
        Ok(RawStockReconciler::lot_position(&position, lot_number))
    }

    /// Whether any lot group of the branch is negative, with the first offender.
    pub async fn validate_inventory(
        &self,
        ctx: &RequestContext,
    ) -> Result<InventoryCheck, RepoError> {
        authorize(ctx, Permission::ViewRawStock)?;
        let position = position(&self.db, ctx.branch_id).await?;
        Ok(RawStockReconciler::inventory_status(&position))
    }

    /// Pre-checks lines that are about to leave stock without writing anything.
    ///
    /// # Errors
    ///
    /// The same errors [`RawStockReconciler::check_stock`] reports.
    pub async fn check_stock(
        &self,
        ctx: &RequestContext,
        lines: &[LotLine],
        required_owner: Option<PersonId>,
    ) -> Result<(), RepoError> {
        authorize(ctx, Permission::ViewRawStock)?;
        let position = position(&self.db, ctx.branch_id).await?;
        let owners = lot_owners(&self.db, ctx.branch_id, None).await?;
        RawStockReconciler::check_stock(lines, &position, &owners, required_owner)?;
        Ok(())
    }
}

/// Rebuilds the branch position and fails on the first negative group.
async fn ensure_inventory(txn: &DatabaseTransaction, branch_id: BranchId) -> Result<(), RepoError> {
    let position = position(txn, branch_id).await?;
    RawStockReconciler::validate_inventory(&position)?;
    debug!(branch = %branch_id, groups = position.len(), "raw inventory consistent");
    Ok(())
}

async fn position<C: ConnectionTrait>(
    conn: &C,
    branch_id: BranchId,
) -> Result<Vec<PositionRow>, RepoError> {
    let events = load_events(conn, branch_id).await?;
    let products = raw_products::Entity::find()
        .filter(raw_products::Column::BranchId.eq(branch_id.into_inner()))
        .all(conn)
        .await?
        .into_iter()
        .map(|p| {
            (
                RawProductId::from(p.id),
                RawProductInfo {
                    product_glue: p.product_glue,
                    product_type: p.product_type,
                },
            )
        })
        .collect::<HashMap<_, _>>();
    Ok(RawStockReconciler::current_position(&events, &products))
}

/// Locks the purchase rows of the touched lots and returns their suppliers.
async fn lock_lots(
    txn: &DatabaseTransaction,
    branch_id: BranchId,
    lines: &[LotLine],
) -> Result<HashMap<i64, PersonId>, RepoError> {
    let numbers: HashSet<i64> = lines.iter().map(|l| l.lot_number).collect();
    lot_owners(txn, branch_id, Some(numbers)).await
}

async fn lot_owners<C: ConnectionTrait>(
    conn: &C,
    branch_id: BranchId,
    only: Option<HashSet<i64>>,
) -> Result<HashMap<i64, PersonId>, RepoError> {
    let mut query = raw_transactions::Entity::find()
        .filter(raw_transactions::Column::BranchId.eq(branch_id.into_inner()));
    if let Some(numbers) = only {
        query = for_update(
            query.filter(raw_transactions::Column::LotNumber.is_in(numbers)),
            conn,
        );
    }
    Ok(query
        .all(conn)
        .await?
        .into_iter()
        .map(|lot| (lot.lot_number, PersonId::from(lot.person_id)))
        .collect())
}

async fn lot_products<C: ConnectionTrait>(
    conn: &C,
    branch_id: BranchId,
) -> Result<HashMap<i64, HashSet<RawProductId>>, RepoError> {
    let mut products: HashMap<i64, HashSet<RawProductId>> = HashMap::new();
    for line in load_purchases(conn, branch_id).await? {
        products
            .entry(line.lot_number)
            .or_default()
            .insert(line.raw_product_id);
    }
    Ok(products)
}

async fn load_events<C: ConnectionTrait>(
    conn: &C,
    branch_id: BranchId,
) -> Result<RawEvents, RepoError> {
    let purchases = load_purchases(conn, branch_id).await?;

    let debit_ids: Vec<Uuid> = raw_debits::Entity::find()
        .filter(raw_debits::Column::BranchId.eq(branch_id.into_inner()))
        .all(conn)
        .await?
        .into_iter()
        .map(|d| d.id)
        .collect();
    let debits = raw_debit_lot_details::Entity::find()
        .filter(raw_debit_lot_details::Column::RawDebitId.is_in(debit_ids))
        .all(conn)
        .await?
        .into_iter()
        .map(|d| DebitLine {
            line: LotLine {
                lot_number: d.lot_number,
                raw_product_id: d.raw_product_id.into(),
                warehouse_id: d.warehouse_id.map(Into::into),
                actual_gazaana: d.actual_gazaana,
                expected_gazaana: d.expected_gazaana,
                formula_id: d.formula_id.map(Into::into),
                quantity: d.quantity,
            },
            nature: d.nature.into(),
        })
        .collect();

    let transfer_ids: Vec<Uuid> = raw_transfers::Entity::find()
        .filter(raw_transfers::Column::BranchId.eq(branch_id.into_inner()))
        .all(conn)
        .await?
        .into_iter()
        .map(|t| t.id)
        .collect();
    let transfers = raw_transfer_lot_details::Entity::find()
        .filter(raw_transfer_lot_details::Column::RawTransferId.is_in(transfer_ids))
        .all(conn)
        .await?
        .into_iter()
        .map(|t| TransferLine {
            line: LotLine {
                lot_number: t.lot_number,
                raw_product_id: t.raw_product_id.into(),
                warehouse_id: Some(t.from_warehouse_id.into()),
                actual_gazaana: t.actual_gazaana,
                expected_gazaana: t.expected_gazaana,
                formula_id: t.formula_id.map(Into::into),
                quantity: t.quantity,
            },
            to_warehouse_id: t.to_warehouse_id.into(),
        })
        .collect();

    let issue_ids: Vec<Uuid> = dying_issues::Entity::find()
        .filter(dying_issues::Column::BranchId.eq(branch_id.into_inner()))
        .all(conn)
        .await?
        .into_iter()
        .map(|i| i.id)
        .collect();
    let dye_issues = dying_issue_details::Entity::find()
        .filter(dying_issue_details::Column::DyingIssueId.is_in(issue_ids))
        .all(conn)
        .await?
        .into_iter()
        .map(|d| LotLine {
            lot_number: d.lot_number,
            raw_product_id: d.raw_product_id.into(),
            warehouse_id: d.warehouse_id.map(Into::into),
            actual_gazaana: d.actual_gazaana,
            expected_gazaana: d.expected_gazaana,
            formula_id: d.formula_id.map(Into::into),
            quantity: d.quantity,
        })
        .collect();

    Ok(RawEvents {
        purchases,
        debits,
        transfers,
        dye_issues,
    })
}

async fn load_purchases<C: ConnectionTrait>(
    conn: &C,
    branch_id: BranchId,
) -> Result<Vec<LotLine>, RepoError> {
    let lots: HashMap<Uuid, i64> = raw_transactions::Entity::find()
        .filter(raw_transactions::Column::BranchId.eq(branch_id.into_inner()))
        .all(conn)
        .await?
        .into_iter()
        .map(|lot| (lot.id, lot.lot_number))
        .collect();

    let details = raw_lot_details::Entity::find()
        .filter(raw_lot_details::Column::RawTransactionId.is_in(lots.keys().copied()))
        .all(conn)
        .await?;

    details
        .into_iter()
        .map(|d| {
            let lot_number = *lots
                .get(&d.raw_transaction_id)
                .ok_or_else(|| RepoError::Corrupt(format!("lot line {} has no lot", d.id)))?;
            Ok(LotLine {
                lot_number,
                raw_product_id: d.raw_product_id.into(),
                warehouse_id: d.warehouse_id.map(Into::into),
                actual_gazaana: d.actual_gazaana,
                expected_gazaana: d.expected_gazaana,
                formula_id: d.formula_id.map(Into::into),
                quantity: d.quantity,
            })
        })
        .collect()
}
