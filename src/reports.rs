// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Read-only summaries over one user's ledger. Nothing here writes, and
//! "no matching rows" always yields zero or an empty list.

use std::collections::{BTreeMap, HashMap};

use chrono::{Datelike, Local, NaiveDate};
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::error::{LedgerError, LedgerResult};
use crate::models::{Account, Period, PopulatedTransaction, Transaction, TransactionType};
use crate::persona::{PersonaTier, financial_persona};
use crate::store::ledger::{self, ListOrder};
use crate::store::{accounts, categories};
use crate::utils::month_bounds;

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorySpend {
    pub category_id: i64,
    pub title: String,
    pub color: String,
    pub icon: String,
    pub total_amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryBreakdown {
    #[serde(flatten)]
    pub category: CategorySpend,
    pub transactions: Vec<Transaction>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyChange {
    pub year: i32,
    pub month: &'static str,
    pub month_number: u32,
    pub expenses: Decimal,
    pub incomes: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub period: Period,
    pub total_balance: Decimal,
    pub period_earnings: Decimal,
    pub period_expenses: Decimal,
    pub period_change: Decimal,
    pub total_spend_this_month: Decimal,
    pub recent_transactions: Vec<PopulatedTransaction>,
    pub monthly_changes: Vec<MonthlyChange>,
    pub categories: Vec<CategoryBreakdown>,
    pub accounts: Vec<Account>,
    pub total_transactions_count: i64,
    pub category_with_most_spent: Option<CategorySpend>,
    pub savings_rate: Decimal,
    pub persona: &'static PersonaTier,
}

/// Adds `values` without panicking; overflow is reported as `Inconsistent`.
fn checked_total(values: impl IntoIterator<Item = Decimal>, what: &str) -> LedgerResult<Decimal> {
    values.into_iter().try_fold(Decimal::ZERO, |acc, v| {
        acc.checked_add(v)
            .ok_or_else(|| LedgerError::Inconsistent(format!("{} overflowed", what)))
    })
}

fn sum_amounts(txs: &[Transaction]) -> LedgerResult<Decimal> {
    checked_total(txs.iter().map(|t| t.amount), "transaction total")
}

pub fn total_balance(conn: &Connection, owner: &str) -> LedgerResult<Decimal> {
    let accounts = accounts::list_accounts(conn, owner)?;
    checked_total(accounts.iter().map(|a| a.balance), "total balance")
}

pub fn period_earnings(conn: &Connection, owner: &str, period: &Period) -> LedgerResult<Decimal> {
    let rows = ledger::in_period(conn, owner, period, Some(TransactionType::Income))?;
    sum_amounts(&rows)
}

/// Signed sum of expenses in the window, so normally zero or negative.
pub fn period_expenses(conn: &Connection, owner: &str, period: &Period) -> LedgerResult<Decimal> {
    let rows = ledger::in_period(conn, owner, period, Some(TransactionType::Expense))?;
    sum_amounts(&rows)
}

/// Net flow over the window: earnings plus the (negative) expenses.
pub fn period_change(conn: &Connection, owner: &str, period: &Period) -> LedgerResult<Decimal> {
    let earnings = period_earnings(conn, owner, period)?;
    let expenses = period_expenses(conn, owner, period)?;
    checked_total([earnings, expenses], "period change")
}

/// Expenses in the window grouped by category, ordered by signed total
/// descending. Expense totals are negative, so the largest spend comes last.
/// Groups whose category no longer exists are left out.
pub fn categories_breakdown(
    conn: &Connection,
    owner: &str,
    period: &Period,
) -> LedgerResult<Vec<CategoryBreakdown>> {
    let cats: HashMap<i64, _> = categories::list_categories(conn, owner)?
        .into_iter()
        .map(|c| (c.id, c))
        .collect();

    let mut groups: BTreeMap<i64, Vec<Transaction>> = BTreeMap::new();
    for t in ledger::in_period(conn, owner, period, Some(TransactionType::Expense))? {
        groups.entry(t.category_id).or_default().push(t);
    }

    let mut out = Vec::with_capacity(groups.len());
    for (category_id, transactions) in groups {
        let Some(cat) = cats.get(&category_id) else {
            continue;
        };
        out.push(CategoryBreakdown {
            category: CategorySpend {
                category_id,
                title: cat.title.clone(),
                color: cat.color.clone(),
                icon: cat.icon.clone(),
                total_amount: sum_amounts(&transactions)?,
            },
            transactions,
        });
    }
    out.sort_by(|a, b| b.category.total_amount.cmp(&a.category.total_amount));
    Ok(out)
}

/// Income and expense totals per calendar month, oldest month first.
pub fn monthly_changes(
    conn: &Connection,
    owner: &str,
    period: &Period,
) -> LedgerResult<Vec<MonthlyChange>> {
    let mut buckets: BTreeMap<(i32, u32), (Decimal, Decimal)> = BTreeMap::new();
    for t in ledger::in_period(conn, owner, period, None)? {
        let entry = buckets
            .entry((t.date.year(), t.date.month()))
            .or_insert((Decimal::ZERO, Decimal::ZERO));
        let slot = match t.r#type {
            TransactionType::Expense => &mut entry.0,
            TransactionType::Income => &mut entry.1,
        };
        *slot = checked_total([*slot, t.amount], "monthly total")?;
    }
    Ok(buckets
        .into_iter()
        .map(|((year, month), (expenses, incomes))| MonthlyChange {
            year,
            month: MONTH_NAMES[(month - 1) as usize],
            month_number: month,
            expenses,
            incomes,
        })
        .collect())
}

/// Newest-dated transactions first, joined with their category. `None`
/// returns everything.
pub fn recent_transactions(
    conn: &Connection,
    owner: &str,
    limit: Option<usize>,
) -> LedgerResult<Vec<PopulatedTransaction>> {
    Ok(ledger::list_populated(
        conn,
        owner,
        &Period::all_time(),
        ListOrder::NewestDate,
        limit,
    )?)
}

/// Raw listing for the window, most recently recorded first.
pub fn list_transactions(
    conn: &Connection,
    owner: &str,
    period: &Period,
) -> LedgerResult<Vec<PopulatedTransaction>> {
    Ok(ledger::list_populated(
        conn,
        owner,
        period,
        ListOrder::NewestCreated,
        None,
    )?)
}

/// Expenses dated in the calendar month containing `today`.
pub fn total_spend_in_month(conn: &Connection, owner: &str, today: NaiveDate) -> LedgerResult<Decimal> {
    let (first, last) = month_bounds(today);
    period_expenses(conn, owner, &Period::new(Some(first), Some(last))?)
}

pub fn total_spend_this_month(conn: &Connection, owner: &str) -> LedgerResult<Decimal> {
    total_spend_in_month(conn, owner, Local::now().date_naive())
}

/// Share of all-time income not spent, in percent with two decimals.
/// Zero when no income has been recorded.
pub fn savings_rate(conn: &Connection, owner: &str) -> LedgerResult<Decimal> {
    let all = Period::all_time();
    let income = period_earnings(conn, owner, &all)?;
    let spent = period_expenses(conn, owner, &all)?.abs();
    if income.is_zero() {
        return Ok(Decimal::ZERO);
    }
    let rate = (income - spent)
        .checked_div(income)
        .and_then(|r| r.checked_mul(Decimal::ONE_HUNDRED))
        .ok_or_else(|| LedgerError::Inconsistent("savings rate overflowed".into()))?;
    Ok(rate.round_dp(2))
}

pub fn total_transactions_count(conn: &Connection, owner: &str) -> LedgerResult<i64> {
    Ok(ledger::count_for_owner(conn, owner)?)
}

/// The category with the most negative all-time expense total.
pub fn category_with_most_spent(conn: &Connection, owner: &str) -> LedgerResult<Option<CategorySpend>> {
    Ok(categories_breakdown(conn, owner, &Period::all_time())?
        .into_iter()
        .map(|b| b.category)
        .min_by_key(|c| c.total_amount))
}

pub fn account_details(conn: &Connection, owner: &str) -> LedgerResult<Vec<Account>> {
    Ok(accounts::list_accounts(conn, owner)?)
}

/// Everything the home screen shows, for `period` and the month of `today`.
/// `recent_limit` caps the recent feed; `None` includes every transaction.
pub fn dashboard(
    conn: &Connection,
    owner: &str,
    period: &Period,
    today: NaiveDate,
    recent_limit: Option<usize>,
) -> LedgerResult<Dashboard> {
    let earnings = period_earnings(conn, owner, period)?;
    let expenses = period_expenses(conn, owner, period)?;
    let rate = savings_rate(conn, owner)?;
    Ok(Dashboard {
        period: *period,
        total_balance: total_balance(conn, owner)?,
        period_earnings: earnings,
        period_expenses: expenses,
        period_change: checked_total([earnings, expenses], "period change")?,
        total_spend_this_month: total_spend_in_month(conn, owner, today)?,
        recent_transactions: recent_transactions(conn, owner, recent_limit)?,
        monthly_changes: monthly_changes(conn, owner, period)?,
        categories: categories_breakdown(conn, owner, period)?,
        accounts: account_details(conn, owner)?,
        total_transactions_count: total_transactions_count(conn, owner)?,
        category_with_most_spent: category_with_most_spent(conn, owner)?,
        savings_rate: rate,
        persona: financial_persona(rate),
    })
}
