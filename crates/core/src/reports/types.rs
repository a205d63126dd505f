//! Report types.

use chrono::NaiveDate;
use loomledger_shared::types::{AccountTypeId, ProductId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::stock::TransactionKind;

/// Balance of one money account on the balance sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountBalanceLine {
    /// Account type.
    pub account_type_id: AccountTypeId,
    /// Account name.
    pub name: String,
    /// Σ debit rows up to the report date.
    pub debit_total: Decimal,
    /// Σ credit rows up to the report date.
    pub credit_total: Decimal,
    /// Expenses paid from the account up to the report date.
    pub expenses: Decimal,
    /// `credit_total - debit_total - expenses`.
    pub balance: Decimal,
}

/// Money owed to us and by us.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayableReceivable {
    /// Σ(debit - credit) over customer rows.
    pub receivable: Decimal,
    /// Σ(credit - debit) over supplier rows.
    pub payable: Decimal,
}

/// An expense paid from a money account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseRecord {
    /// Account it was paid from.
    pub account_type_id: AccountTypeId,
    /// Amount.
    pub amount: Decimal,
    /// Date paid.
    pub date: NaiveDate,
    /// Free-form category.
    pub category: String,
}

/// A fixed asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetRecord {
    /// Name.
    pub name: String,
    /// Book value.
    pub value: Decimal,
    /// Valuation date.
    pub date: NaiveDate,
}

/// One detail line of a transaction, as the income statement needs it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactLine {
    /// Product.
    pub product_id: ProductId,
    /// Pieces.
    pub quantity: Decimal,
    /// `quantity * rate`.
    pub amount: Decimal,
}

/// A transaction reduced to what the income statement needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionFact {
    /// Transaction date.
    pub date: NaiveDate,
    /// Sale, purchase or return.
    pub kind: TransactionKind,
    /// Discount given or received.
    pub discount: Decimal,
    /// Detail lines.
    pub lines: Vec<FactLine>,
}

/// Balance sheet report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalanceSheetReport {
    /// Report type identifier.
    pub report_type: String,
    /// As of date.
    pub as_of: NaiveDate,
    /// Money accounts.
    pub accounts: Vec<AccountBalanceLine>,
    /// Σ account balances.
    pub total_account_balance: Decimal,
    /// Owed to us.
    pub receivable: Decimal,
    /// Σ `stock_quantity * opening_stock_rate`.
    pub inventory_value: Decimal,
    /// Σ asset values.
    pub fixed_assets: Decimal,
    /// Accounts + receivable + inventory + fixed assets.
    pub total_assets: Decimal,
    /// Owed by us.
    pub payable: Decimal,
    /// Total liabilities.
    pub total_liabilities: Decimal,
    /// Assets minus liabilities.
    pub owners_equity: Decimal,
}

/// Income statement report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncomeStatementReport {
    /// Report type identifier.
    pub report_type: String,
    /// Period start date.
    pub period_start: NaiveDate,
    /// Period end date.
    pub period_end: NaiveDate,
    /// Σ sale detail amounts.
    pub gross_sales: Decimal,
    /// Σ sale return detail amounts.
    pub sale_returns: Decimal,
    /// Σ sale discounts.
    pub discounts_allowed: Decimal,
    /// Gross sales less returns and discounts.
    pub net_revenue: Decimal,
    /// Cost of goods sold at weighted-average purchase rate.
    pub cost_of_goods_sold: Decimal,
    /// Net revenue less COGS.
    pub gross_profit: Decimal,
    /// Expenses in the period.
    pub expenses: Decimal,
    /// Gross profit less expenses.
    pub net_income: Decimal,
}
