//! Tests for the reports module.

use chrono::NaiveDate;
use loomledger_shared::types::{
    AccountTypeId, BranchId, LedgerEntryId, PersonId, ProductId, StockId, WarehouseId,
};
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::HashMap;

use super::service::ReportService;
use super::types::{AssetRecord, ExpenseRecord, FactLine, PayableReceivable, TransactionFact};
use crate::ledger::{LedgerEntry, Nature, Origin, PersonType};
use crate::stock::{StockKey, StockLevel, TransactionKind};

fn date(month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, month, day).unwrap()
}

fn entry(
    person: PersonId,
    account: Option<AccountTypeId>,
    nature: Nature,
    amount: Decimal,
    on: NaiveDate,
) -> LedgerEntry {
    LedgerEntry {
        id: LedgerEntryId::new(),
        branch_id: BranchId::new(),
        date: on,
        amount,
        nature,
        person_id: person,
        account_type_id: account,
        origin: Origin::Manual,
        detail: Some("test".into()),
        draft: false,
    }
}

fn stock(product: ProductId, quantity: Decimal, opening: Decimal, rate: Decimal) -> StockLevel {
    StockLevel {
        id: StockId::new(),
        key: StockKey {
            product_id: product,
            warehouse_id: WarehouseId::new(),
            yards_per_piece: dec!(10),
        },
        stock_quantity: quantity,
        opening_stock: opening,
        opening_stock_rate: rate,
    }
}

fn fact(kind: TransactionKind, on: NaiveDate, discount: Decimal, lines: Vec<FactLine>) -> TransactionFact {
    TransactionFact {
        date: on,
        kind,
        discount,
        lines,
    }
}

#[test]
fn test_account_balances_subtract_expenses() {
    let cash = AccountTypeId::new();
    let bank = AccountTypeId::new();
    let p = PersonId::new();
    let entries = vec![
        entry(p, Some(cash), Nature::Credit, dec!(1000), date(1, 5)),
        entry(p, Some(cash), Nature::Debit, dec!(200), date(1, 6)),
        entry(p, Some(cash), Nature::Credit, dec!(999), date(2, 1)),
        entry(p, Some(bank), Nature::Credit, dec!(50), date(1, 7)),
    ];
    let expenses = vec![
        ExpenseRecord {
            account_type_id: cash,
            amount: dec!(100),
            date: date(1, 10),
            category: "rent".into(),
        },
        ExpenseRecord {
            account_type_id: cash,
            amount: dec!(40),
            date: date(3, 1),
            category: "rent".into(),
        },
    ];
    let accounts = vec![(cash, "Cash".to_string()), (bank, "Bank".to_string())];

    let lines = ReportService::account_balances(&entries, &accounts, &expenses, date(1, 31));
    assert_eq!(lines[0].credit_total, dec!(1000));
    assert_eq!(lines[0].debit_total, dec!(200));
    assert_eq!(lines[0].expenses, dec!(100));
    assert_eq!(lines[0].balance, dec!(700));
    assert_eq!(lines[1].balance, dec!(50));
    assert_eq!(ReportService::total_account_balance(&lines), dec!(750));
}

#[test]
fn test_payable_receivable_by_person_type() {
    let customer = PersonId::new();
    let supplier = PersonId::new();
    let types = HashMap::from([
        (customer, PersonType::Customer),
        (supplier, PersonType::Supplier),
    ]);
    let entries = vec![
        entry(customer, None, Nature::Debit, dec!(900), date(1, 1)),
        entry(customer, None, Nature::Credit, dec!(300), date(1, 2)),
        entry(supplier, None, Nature::Credit, dec!(500), date(1, 3)),
        entry(supplier, None, Nature::Debit, dec!(100), date(1, 4)),
    ];
    let pr = ReportService::payable_receivable(&entries, &types, date(1, 31));
    assert_eq!(pr.receivable, dec!(600));
    assert_eq!(pr.payable, dec!(400));
}

#[test]
fn test_balance_sheet_equity() {
    let product = ProductId::new();
    let stocks = vec![stock(product, dec!(10), dec!(10), dec!(25))];
    let assets = vec![
        AssetRecord {
            name: "Loom".into(),
            value: dec!(5000),
            date: date(1, 1),
        },
        AssetRecord {
            name: "Later".into(),
            value: dec!(1),
            date: date(12, 1),
        },
    ];
    let inventory = ReportService::inventory_value(&stocks);
    let fixed = ReportService::fixed_assets(&assets, date(6, 30));
    assert_eq!(inventory, dec!(250));
    assert_eq!(fixed, dec!(5000));

    let report = ReportService::generate_balance_sheet(
        date(6, 30),
        vec![],
        PayableReceivable {
            receivable: dec!(600),
            payable: dec!(400),
        },
        inventory,
        fixed,
    );
    assert_eq!(report.total_assets, dec!(5850));
    assert_eq!(report.total_liabilities, dec!(400));
    assert_eq!(report.owners_equity, dec!(5450));
}

#[test]
fn test_income_statement_weighted_cogs() {
    let product = ProductId::new();
    // opening 10 @ 20, purchase 10 @ 40 -> average 30
    let stocks = vec![stock(product, dec!(0), dec!(10), dec!(20))];
    let transactions = vec![
        fact(
            TransactionKind::Purchase,
            date(1, 2),
            dec!(0),
            vec![FactLine {
                product_id: product,
                quantity: dec!(10),
                amount: dec!(400),
            }],
        ),
        fact(
            TransactionKind::Sale,
            date(1, 10),
            dec!(50),
            vec![FactLine {
                product_id: product,
                quantity: dec!(5),
                amount: dec!(250),
            }],
        ),
        fact(
            TransactionKind::SaleReturn,
            date(1, 11),
            dec!(0),
            vec![FactLine {
                product_id: product,
                quantity: dec!(1),
                amount: dec!(50),
            }],
        ),
        fact(
            TransactionKind::Sale,
            date(3, 1),
            dec!(0),
            vec![FactLine {
                product_id: product,
                quantity: dec!(100),
                amount: dec!(9999),
            }],
        ),
    ];
    let expenses = vec![ExpenseRecord {
        account_type_id: AccountTypeId::new(),
        amount: dec!(20),
        date: date(1, 15),
        category: "transport".into(),
    }];

    let report = ReportService::generate_income_statement(
        date(1, 1),
        date(1, 31),
        &transactions,
        &stocks,
        &expenses,
    )
    .unwrap();

    assert_eq!(report.gross_sales, dec!(250));
    assert_eq!(report.sale_returns, dec!(50));
    assert_eq!(report.discounts_allowed, dec!(50));
    assert_eq!(report.net_revenue, dec!(150));
    assert_eq!(report.cost_of_goods_sold, dec!(120));
    assert_eq!(report.gross_profit, dec!(30));
    assert_eq!(report.expenses, dec!(20));
    assert_eq!(report.net_income, dec!(10));
}

#[test]
fn test_income_statement_rejects_inverted_range() {
    let err = ReportService::generate_income_statement(date(2, 1), date(1, 1), &[], &[], &[])
        .unwrap_err();
    assert_eq!(err.error_code(), "INVALID_DATE_RANGE");
    assert_eq!(err.http_status_code(), 400);
}

#[test]
fn test_unknown_product_costs_nothing() {
    let transactions = vec![fact(
        TransactionKind::Sale,
        date(1, 2),
        dec!(0),
        vec![FactLine {
            product_id: ProductId::new(),
            quantity: dec!(3),
            amount: dec!(30),
        }],
    )];
    let report =
        ReportService::generate_income_statement(date(1, 1), date(1, 31), &transactions, &[], &[])
            .unwrap();
    assert_eq!(report.cost_of_goods_sold, dec!(0));
    assert_eq!(report.gross_profit, dec!(30));
}

proptest! {
    /// Owners' equity always equals total assets minus total liabilities.
    #[test]
    fn prop_balance_sheet_equation(
        receivable in -1_000_000i64..1_000_000,
        payable in -1_000_000i64..1_000_000,
        inventory in 0i64..1_000_000,
        fixed in 0i64..1_000_000,
        balances in prop::collection::vec(-1_000_000i64..1_000_000, 0..6),
    ) {
        let accounts = balances
            .iter()
            .map(|b| super::types::AccountBalanceLine {
                account_type_id: AccountTypeId::new(),
                name: "acct".into(),
                debit_total: Decimal::ZERO,
                credit_total: Decimal::new(*b, 2),
                expenses: Decimal::ZERO,
                balance: Decimal::new(*b, 2),
            })
            .collect();
        let report = ReportService::generate_balance_sheet(
            date(1, 1),
            accounts,
            PayableReceivable {
                receivable: Decimal::new(receivable, 2),
                payable: Decimal::new(payable, 2),
            },
            Decimal::new(inventory, 2),
            Decimal::new(fixed, 2),
        );
        prop_assert_eq!(report.owners_equity, report.total_assets - report.total_liabilities);
        prop_assert_eq!(
            report.total_assets,
            report.total_account_balance + report.receivable + report.inventory_value + report.fixed_assets
        );
    }
}
