// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use moneytrail::models::{Period, TransactionDraft, TransactionType};
use moneytrail::store::{accounts, categories};
use moneytrail::{db, reports, sync};
use rusqlite::Connection;
use rust_decimal::Decimal;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn dec(n: i64) -> Decimal {
    Decimal::from(n)
}

fn record(conn: &mut Connection, account: i64, category: i64, amount: i64, date: NaiveDate) -> i64 {
    let draft = TransactionDraft {
        title: "Entry".into(),
        description: "note".into(),
        amount: dec(amount),
        r#type: if amount < 0 {
            TransactionType::Expense
        } else {
            TransactionType::Income
        },
        account_id: account,
        category_id: category,
        date,
    };
    sync::create_transaction(conn, "alice", draft)
        .unwrap()
        .transaction
        .id
}

struct Ledger {
    conn: Connection,
    account: i64,
    food: i64,
    rent: i64,
    fun: i64,
    salary: i64,
}

fn setup() -> Ledger {
    let conn = db::open_in_memory().unwrap();
    let account = accounts::insert_account(&conn, "alice", "Main", "bank", dec(500)).unwrap();
    let food = categories::insert_category(&conn, "alice", "Food", "fork", "#f00", false).unwrap();
    let rent = categories::insert_category(&conn, "alice", "Rent", "home", "#0f0", false).unwrap();
    let fun = categories::insert_category(&conn, "alice", "Fun", "star", "#00f", false).unwrap();
    let salary = categories::insert_category(&conn, "alice", "Salary", "cash", "#ff0", true).unwrap();
    Ledger {
        conn,
        account,
        food,
        rent,
        fun,
        salary,
    }
}

#[test]
fn empty_ledger_reports_zeroes() {
    let l = setup();
    let all = Period::all_time();
    assert_eq!(reports::period_earnings(&l.conn, "alice", &all).unwrap(), Decimal::ZERO);
    assert_eq!(reports::period_expenses(&l.conn, "alice", &all).unwrap(), Decimal::ZERO);
    assert!(reports::categories_breakdown(&l.conn, "alice", &all).unwrap().is_empty());
    assert!(reports::monthly_changes(&l.conn, "alice", &all).unwrap().is_empty());
    assert_eq!(reports::savings_rate(&l.conn, "alice").unwrap(), Decimal::ZERO);
    assert_eq!(reports::total_balance(&l.conn, "alice").unwrap(), dec(500));
    assert!(reports::category_with_most_spent(&l.conn, "alice").unwrap().is_none());
}

#[test]
fn earnings_and_expenses_respect_inclusive_period() {
    let mut l = setup();
    let (a, sal, food) = (l.account, l.salary, l.food);
    record(&mut l.conn, a, sal, 200, d(2025, 1, 31));
    record(&mut l.conn, a, sal, 300, d(2025, 2, 1));
    record(&mut l.conn, a, food, -40, d(2025, 1, 15));

    let jan = Period::new(Some(d(2025, 1, 1)), Some(d(2025, 1, 31))).unwrap();
    assert_eq!(reports::period_earnings(&l.conn, "alice", &jan).unwrap(), dec(200));
    assert_eq!(reports::period_expenses(&l.conn, "alice", &jan).unwrap(), dec(-40));
    assert_eq!(reports::period_change(&l.conn, "alice", &jan).unwrap(), dec(160));

    let from_feb = Period::new(Some(d(2025, 2, 1)), None).unwrap();
    assert_eq!(reports::period_earnings(&l.conn, "alice", &from_feb).unwrap(), dec(300));

    let empty = Period::new(Some(d(2030, 1, 1)), Some(d(2030, 1, 31))).unwrap();
    assert_eq!(reports::period_earnings(&l.conn, "alice", &empty).unwrap(), Decimal::ZERO);
}

#[test]
fn other_users_are_invisible() {
    let mut l = setup();
    let (a, sal) = (l.account, l.salary);
    record(&mut l.conn, a, sal, 100, d(2025, 3, 3));
    let all = Period::all_time();
    assert_eq!(reports::period_earnings(&l.conn, "bob", &all).unwrap(), Decimal::ZERO);
    assert_eq!(reports::total_transactions_count(&l.conn, "bob").unwrap(), 0);
    assert_eq!(reports::total_transactions_count(&l.conn, "alice").unwrap(), 1);
}

#[test]
fn breakdown_orders_by_signed_total_descending() {
    let mut l = setup();
    let (a, food, rent, fun, sal) = (l.account, l.food, l.rent, l.fun, l.salary);
    record(&mut l.conn, a, fun, -10, d(2025, 4, 1));
    record(&mut l.conn, a, food, -50, d(2025, 4, 2));
    record(&mut l.conn, a, rent, -30, d(2025, 4, 3));
    record(&mut l.conn, a, food, -40, d(2025, 4, 4));
    record(&mut l.conn, a, sal, 1000, d(2025, 4, 5));

    let out = reports::categories_breakdown(&l.conn, "alice", &Period::all_time()).unwrap();
    let totals: Vec<Decimal> = out.iter().map(|b| b.category.total_amount).collect();
    assert_eq!(totals, vec![dec(-10), dec(-30), dec(-90)]);
    assert_eq!(out[0].category.title, "Fun");
    assert_eq!(out[2].category.title, "Food");
    assert_eq!(out[2].transactions.len(), 2);

    let top = reports::category_with_most_spent(&l.conn, "alice").unwrap().unwrap();
    assert_eq!(top.category_id, food);
}

#[test]
fn breakdown_drops_deleted_categories() {
    let mut l = setup();
    let (a, food, fun) = (l.account, l.food, l.fun);
    record(&mut l.conn, a, food, -50, d(2025, 4, 2));
    record(&mut l.conn, a, fun, -10, d(2025, 4, 1));
    categories::delete_category(&l.conn, "alice", food).unwrap();

    let out = reports::categories_breakdown(&l.conn, "alice", &Period::all_time()).unwrap();
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].category.category_id, fun);
}

#[test]
fn monthly_changes_group_by_calendar_month() {
    let mut l = setup();
    let (a, food, sal) = (l.account, l.food, l.salary);
    record(&mut l.conn, a, sal, 100, d(2025, 1, 10));
    record(&mut l.conn, a, food, -20, d(2025, 1, 20));
    record(&mut l.conn, a, food, -5, d(2025, 3, 2));
    record(&mut l.conn, a, sal, 7, d(2024, 12, 31));

    let out = reports::monthly_changes(&l.conn, "alice", &Period::all_time()).unwrap();
    let keys: Vec<(i32, &str)> = out.iter().map(|m| (m.year, m.month)).collect();
    assert_eq!(
        keys,
        vec![(2024, "December"), (2025, "January"), (2025, "March")]
    );
    assert_eq!(out[1].incomes, dec(100));
    assert_eq!(out[1].expenses, dec(-20));
    assert_eq!(out[2].incomes, Decimal::ZERO);
    assert_eq!(out[2].month_number, 3);
}

#[test]
fn savings_rate_and_persona() {
    let mut l = setup();
    let (a, food, sal) = (l.account, l.food, l.salary);
    record(&mut l.conn, a, sal, 1000, d(2025, 5, 1));
    record(&mut l.conn, a, food, -400, d(2025, 5, 2));
    let rate = reports::savings_rate(&l.conn, "alice").unwrap();
    assert_eq!(rate, dec(60));
    assert_eq!(moneytrail::persona::financial_persona(rate).label, "Wealth Builder");

    record(&mut l.conn, a, food, -700, d(2025, 5, 3));
    let rate = reports::savings_rate(&l.conn, "alice").unwrap();
    assert_eq!(rate, dec(-10));
    assert_eq!(moneytrail::persona::financial_persona(rate).label, "Overspender");
}

#[test]
fn savings_rate_rounds_to_two_places() {
    let mut l = setup();
    let (a, food, sal) = (l.account, l.food, l.salary);
    record(&mut l.conn, a, sal, 3, d(2025, 5, 1));
    record(&mut l.conn, a, food, -1, d(2025, 5, 2));
    assert_eq!(
        reports::savings_rate(&l.conn, "alice").unwrap(),
        Decimal::new(6667, 2)
    );
}

#[test]
fn spend_in_month_uses_given_day() {
    let mut l = setup();
    let (a, food) = (l.account, l.food);
    record(&mut l.conn, a, food, -12, d(2024, 2, 29));
    record(&mut l.conn, a, food, -8, d(2024, 2, 1));
    record(&mut l.conn, a, food, -100, d(2024, 3, 1));
    assert_eq!(
        reports::total_spend_in_month(&l.conn, "alice", d(2024, 2, 14)).unwrap(),
        dec(-20)
    );
}

#[test]
fn recent_transactions_are_newest_first_and_limited() {
    let mut l = setup();
    let (a, food) = (l.account, l.food);
    let old = record(&mut l.conn, a, food, -1, d(2025, 1, 1));
    let newest = record(&mut l.conn, a, food, -2, d(2025, 3, 1));
    let middle = record(&mut l.conn, a, food, -3, d(2025, 2, 1));

    let all = reports::recent_transactions(&l.conn, "alice", None).unwrap();
    let ids: Vec<i64> = all.iter().map(|r| r.transaction.id).collect();
    assert_eq!(ids, vec![newest, middle, old]);

    let two = reports::recent_transactions(&l.conn, "alice", Some(2)).unwrap();
    assert_eq!(two.len(), 2);
    assert_eq!(two[0].category.as_ref().unwrap().title, "Food");
}

#[test]
fn dashboard_combines_summaries_and_reads_are_repeatable() {
    let mut l = setup();
    let (a, food, sal) = (l.account, l.food, l.salary);
    record(&mut l.conn, a, sal, 1000, d(2025, 6, 1));
    record(&mut l.conn, a, food, -250, d(2025, 6, 10));
    record(&mut l.conn, a, food, -50, d(2025, 5, 10));

    let june = Period::new(Some(d(2025, 6, 1)), Some(d(2025, 6, 30))).unwrap();
    let first = reports::dashboard(&l.conn, "alice", &june, d(2025, 6, 15), None).unwrap();
    assert_eq!(first.total_balance, dec(1200));
    assert_eq!(first.period_earnings, dec(1000));
    assert_eq!(first.period_expenses, dec(-250));
    assert_eq!(first.period_change, dec(750));
    assert_eq!(first.total_spend_this_month, dec(-250));
    assert_eq!(first.total_transactions_count, 3);
    assert_eq!(first.monthly_changes.len(), 1);
    assert_eq!(first.accounts.len(), 1);
    assert_eq!(first.savings_rate, dec(70));
    assert_eq!(first.persona.label, "Wealth Builder");
    assert_eq!(first.recent_transactions.len(), 3);

    let second = reports::dashboard(&l.conn, "alice", &june, d(2025, 6, 15), None).unwrap();
    assert_eq!(first, second);
}

#[test]
fn dashboard_recent_feed_is_uncapped_unless_asked() {
    let mut l = setup();
    let (a, food) = (l.account, l.food);
    for day in 1..=12 {
        record(&mut l.conn, a, food, -1, d(2025, 7, day));
    }
    let all = Period::all_time();
    let full = reports::dashboard(&l.conn, "alice", &all, d(2025, 7, 20), None).unwrap();
    assert_eq!(full.recent_transactions.len(), 12);
    assert_eq!(full.recent_transactions[0].transaction.date, d(2025, 7, 12));

    let capped = reports::dashboard(&l.conn, "alice", &all, d(2025, 7, 20), Some(5)).unwrap();
    assert_eq!(capped.recent_transactions.len(), 5);
}
