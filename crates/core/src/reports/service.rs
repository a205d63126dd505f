//! Report generation service.
//!
//! Balance sheet figures come from the ledger. Income statement figures come
//! from transaction details so discounts are not counted twice.

use chrono::NaiveDate;
use loomledger_shared::types::{AccountTypeId, PersonId, ProductId};
use rust_decimal::Decimal;
use std::collections::HashMap;

use super::error::ReportError;
use super::types::{
    AccountBalanceLine, AssetRecord, BalanceSheetReport, ExpenseRecord, IncomeStatementReport,
    PayableReceivable, TransactionFact,
};
use crate::ledger::{LedgerBalances, LedgerEntry, LedgerFilter, PersonType};
use crate::stock::{StockLevel, TransactionKind};

/// Service for generating financial reports.
pub struct ReportService;

impl ReportService {
    /// Balance of each listed money account as of `as_of`.
    #[must_use]
    pub fn account_balances(
        entries: &[LedgerEntry],
        accounts: &[(AccountTypeId, String)],
        expenses: &[ExpenseRecord],
        as_of: NaiveDate,
    ) -> Vec<AccountBalanceLine> {
        let by_account =
            LedgerBalances::by_account_type(entries, &LedgerFilter::as_of(as_of), &HashMap::new());

        accounts
            .iter()
            .map(|(account_type_id, name)| {
                let totals = by_account
                    .iter()
                    .find(|b| b.account_type_id == *account_type_id)
                    .map(|b| b.totals)
                    .unwrap_or_default();
                let spent: Decimal = expenses
                    .iter()
                    .filter(|e| e.account_type_id == *account_type_id && e.date <= as_of)
                    .map(|e| e.amount)
                    .sum();
                AccountBalanceLine {
                    account_type_id: *account_type_id,
                    name: name.clone(),
                    debit_total: totals.debit_total,
                    credit_total: totals.credit_total,
                    expenses: spent,
                    balance: totals.net() - spent,
                }
            })
            .collect()
    }

    /// Σ of account balances.
    #[must_use]
    pub fn total_account_balance(lines: &[AccountBalanceLine]) -> Decimal {
        lines.iter().map(|l| l.balance).sum()
    }

    /// Receivables from customers and payables to suppliers as of `as_of`.
    #[must_use]
    pub fn payable_receivable(
        entries: &[LedgerEntry],
        person_types: &HashMap<PersonId, PersonType>,
        as_of: NaiveDate,
    ) -> PayableReceivable {
        let side = |person_type| {
            let filter = LedgerFilter {
                person_type: Some(person_type),
                ..LedgerFilter::as_of(as_of)
            };
            LedgerBalances::totals_by_nature(entries, &filter, person_types)
        };
        let customers = side(PersonType::Customer);
        let suppliers = side(PersonType::Supplier);
        PayableReceivable {
            receivable: customers.debit_total - customers.credit_total,
            payable: suppliers.credit_total - suppliers.debit_total,
        }
    }

    /// Σ `stock_quantity * opening_stock_rate`.
    #[must_use]
    pub fn inventory_value(stocks: &[StockLevel]) -> Decimal {
        stocks
            .iter()
            .map(|s| s.stock_quantity * s.opening_stock_rate)
            .sum()
    }

    /// Σ asset values dated on or before `as_of`.
    #[must_use]
    pub fn fixed_assets(assets: &[AssetRecord], as_of: NaiveDate) -> Decimal {
        assets
            .iter()
            .filter(|a| a.date <= as_of)
            .map(|a| a.value)
            .sum()
    }

    /// Assembles the balance sheet.
    #[must_use]
    pub fn generate_balance_sheet(
        as_of: NaiveDate,
        accounts: Vec<AccountBalanceLine>,
        payable_receivable: PayableReceivable,
        inventory_value: Decimal,
        fixed_assets: Decimal,
    ) -> BalanceSheetReport {
        let total_account_balance = Self::total_account_balance(&accounts);
        let total_assets = total_account_balance
            + payable_receivable.receivable
            + inventory_value
            + fixed_assets;
        let total_liabilities = payable_receivable.payable;

        BalanceSheetReport {
            report_type: "balance_sheet".to_string(),
            as_of,
            accounts,
            total_account_balance,
            receivable: payable_receivable.receivable,
            inventory_value,
            fixed_assets,
            total_assets,
            payable: payable_receivable.payable,
            total_liabilities,
            owners_equity: total_assets - total_liabilities,
        }
    }

    /// Weighted-average purchase rate per product.
    ///
    /// Opening stock plus every purchase dated on or before `up_to`.
    /// Products with no quantity get no entry.
    #[must_use]
    pub fn weighted_average_rates(
        transactions: &[TransactionFact],
        stocks: &[StockLevel],
        up_to: NaiveDate,
    ) -> HashMap<ProductId, Decimal> {
        let mut pools: HashMap<ProductId, (Decimal, Decimal)> = HashMap::new();

        for stock in stocks {
            let pool = pools.entry(stock.key.product_id).or_default();
            pool.0 += stock.opening_stock;
            pool.1 += stock.opening_stock * stock.opening_stock_rate;
        }
        for fact in transactions
            .iter()
            .filter(|t| t.kind == TransactionKind::Purchase && t.date <= up_to)
        {
            for line in &fact.lines {
                let pool = pools.entry(line.product_id).or_default();
                pool.0 += line.quantity;
                pool.1 += line.amount;
            }
        }

        pools
            .into_iter()
            .filter(|(_, (quantity, _))| !quantity.is_zero())
            .map(|(product, (quantity, value))| (product, value / quantity))
            .collect()
    }

    /// Generates the income statement for `[start, end]`.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::InvalidDateRange`] if `start > end`.
    pub fn generate_income_statement(
        start: NaiveDate,
        end: NaiveDate,
        transactions: &[TransactionFact],
        stocks: &[StockLevel],
        expenses: &[ExpenseRecord],
    ) -> Result<IncomeStatementReport, ReportError> {
        if start > end {
            return Err(ReportError::InvalidDateRange { start, end });
        }

        let rates = Self::weighted_average_rates(transactions, stocks, end);
        let cost = |product: &ProductId, quantity: Decimal| {
            rates.get(product).copied().unwrap_or_default() * quantity
        };

        let mut gross_sales = Decimal::ZERO;
        let mut sale_returns = Decimal::ZERO;
        let mut discounts_allowed = Decimal::ZERO;
        let mut cogs = Decimal::ZERO;

        for fact in transactions
            .iter()
            .filter(|t| t.date >= start && t.date <= end)
        {
            match fact.kind {
                TransactionKind::Sale => {
                    discounts_allowed += fact.discount;
                    for line in &fact.lines {
                        gross_sales += line.amount;
                        cogs += cost(&line.product_id, line.quantity);
                    }
                }
                TransactionKind::SaleReturn => {
                    for line in &fact.lines {
                        sale_returns += line.amount;
                        cogs -= cost(&line.product_id, line.quantity);
                    }
                }
                TransactionKind::Purchase | TransactionKind::PurchaseReturn => {}
            }
        }

        let cost_of_goods_sold = cogs.round_dp(2);
        let net_revenue = gross_sales - sale_returns - discounts_allowed;
        let gross_profit = net_revenue - cost_of_goods_sold;
        let expenses: Decimal = expenses
            .iter()
            .filter(|e| e.date >= start && e.date <= end)
            .map(|e| e.amount)
            .sum();

        Ok(IncomeStatementReport {
            report_type: "income_statement".to_string(),
            period_start: start,
            period_end: end,
            gross_sales,
            sale_returns,
            discounts_allowed,
            net_revenue,
            cost_of_goods_sold,
            gross_profit,
            expenses,
            net_income: gross_profit - expenses,
        })
    }
}
