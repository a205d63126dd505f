//! Report repository: loads branch rows and hands them to [`ReportService`].

use chrono::NaiveDate;
use futures::try_join;
use loomledger_core::ledger::LedgerFilter;
use loomledger_core::reports::{
    AccountBalanceLine, AssetRecord, BalanceSheetReport, ExpenseRecord, IncomeStatementReport,
    PayableReceivable, ReportService,
};
use loomledger_shared::types::{AccountTypeId, BranchId};
use loomledger_shared::{Permission, RequestContext};
use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use tracing::debug;

use super::common::{authorize, person_types};
use super::ledger::load_entries;
use super::transaction::{load_facts, load_stock_levels};
use crate::entities::{account_types, assets, expenses};
use crate::error::RepoError;

/// Report repository.
#[derive(Debug, Clone)]
pub struct ReportRepository {
    db: DatabaseConnection,
}

impl ReportRepository {
    /// Creates a new report repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Balance of every money account as of `as_of`, net of expenses paid from it.
    pub async fn account_balances(
        &self,
        ctx: &RequestContext,
        as_of: NaiveDate,
    ) -> Result<Vec<AccountBalanceLine>, RepoError> {
        authorize(ctx, Permission::ViewReports)?;
        account_lines(&self.db, ctx.branch_id, as_of).await
    }

    /// Σ of every money account balance as of `as_of`.
    pub async fn total_account_balance(
        &self,
        ctx: &RequestContext,
        as_of: NaiveDate,
    ) -> Result<Decimal, RepoError> {
        authorize(ctx, Permission::ViewReports)?;
        let lines = account_lines(&self.db, ctx.branch_id, as_of).await?;
        Ok(ReportService::total_account_balance(&lines))
    }

    /// Receivables from customers and payables to suppliers as of `as_of`.
    pub async fn payable_receivable(
        &self,
        ctx: &RequestContext,
        as_of: NaiveDate,
    ) -> Result<PayableReceivable, RepoError> {
        authorize(ctx, Permission::ViewReports)?;
        let filter = LedgerFilter::as_of(as_of);
        let (entries, types) = try_join!(
            load_entries(&self.db, ctx.branch_id, &filter),
            person_types(&self.db, ctx.branch_id),
        )?;
        Ok(ReportService::payable_receivable(&entries, &types, as_of))
    }

    /// Balance sheet as of `as_of`.
    pub async fn balance_sheet(
        &self,
        ctx: &RequestContext,
        as_of: NaiveDate,
    ) -> Result<BalanceSheetReport, RepoError> {
        authorize(ctx, Permission::ViewReports)?;

        let filter = LedgerFilter::as_of(as_of);
        let (entries, types, accounts, stocks, assets) = try_join!(
            load_entries(&self.db, ctx.branch_id, &filter),
            person_types(&self.db, ctx.branch_id),
            account_lines(&self.db, ctx.branch_id, as_of),
            load_stock_levels(&self.db, ctx.branch_id),
            load_assets(&self.db, ctx.branch_id),
        )?;

        let report = ReportService::generate_balance_sheet(
            as_of,
            accounts,
            ReportService::payable_receivable(&entries, &types, as_of),
            ReportService::inventory_value(&stocks),
            ReportService::fixed_assets(&assets, as_of),
        );
        debug!(branch = %ctx.branch_id, %as_of, equity = %report.owners_equity, "balance sheet built");
        Ok(report)
    }

    /// Total assets less total liabilities as of `as_of`.
    pub async fn owners_equity(
        &self,
        ctx: &RequestContext,
        as_of: NaiveDate,
    ) -> Result<Decimal, RepoError> {
        Ok(self.balance_sheet(ctx, as_of).await?.owners_equity)
    }

    /// Income statement for `[start, end]`.
    ///
    /// # Errors
    ///
    /// Returns [`loomledger_core::reports::ReportError::InvalidDateRange`] if `start > end`.
    pub async fn income_statement(
        &self,
        ctx: &RequestContext,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<IncomeStatementReport, RepoError> {
        authorize(ctx, Permission::ViewReports)?;

        let (facts, stocks, expenses) = try_join!(
            load_facts(&self.db, ctx.branch_id),
            load_stock_levels(&self.db, ctx.branch_id),
            load_expenses(&self.db, ctx.branch_id),
        )?;

        let report =
            ReportService::generate_income_statement(start, end, &facts, &stocks, &expenses)?;
        debug!(branch = %ctx.branch_id, %start, %end, net_income = %report.net_income, "income statement built");
        Ok(report)
    }
}

async fn account_lines<C: ConnectionTrait>(
    conn: &C,
    branch_id: BranchId,
    as_of: NaiveDate,
) -> Result<Vec<AccountBalanceLine>, RepoError> {
    let filter = LedgerFilter::as_of(as_of);
    let (entries, expenses) = try_join!(
        load_entries(conn, branch_id, &filter),
        load_expenses(conn, branch_id),
    )?;
    let accounts: Vec<(AccountTypeId, String)> = account_types::Entity::find()
        .filter(account_types::Column::BranchId.eq(branch_id.into_inner()))
        .order_by_asc(account_types::Column::Name)
        .all(conn)
        .await?
        .into_iter()
        .map(|a| (AccountTypeId::from(a.id), a.name))
        .collect();
    Ok(ReportService::account_balances(&entries, &accounts, &expenses, as_of))
}

async fn load_expenses<C: ConnectionTrait>(
    conn: &C,
    branch_id: BranchId,
) -> Result<Vec<ExpenseRecord>, RepoError> {
    Ok(expenses::Entity::find()
        .filter(expenses::Column::BranchId.eq(branch_id.into_inner()))
        .all(conn)
        .await?
        .into_iter()
        .map(|e| ExpenseRecord {
            account_type_id: e.account_type_id.into(),
            amount: e.amount,
            date: e.date,
            category: e.category,
        })
        .collect())
}

async fn load_assets<C: ConnectionTrait>(
    conn: &C,
    branch_id: BranchId,
) -> Result<Vec<AssetRecord>, RepoError> {
    Ok(assets::Entity::find()
        .filter(assets::Column::BranchId.eq(branch_id.into_inner()))
        .all(conn)
        .await?
        .into_iter()
        .map(|a| AssetRecord {
            name: a.name,
            value: a.value,
            date: a.date,
        })
        .collect())
}
