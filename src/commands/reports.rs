// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::period_from_args;
use super::transactions::table_row;
use crate::models::Period;
use crate::persona::financial_persona;
use crate::reports as agg;
use crate::utils::{fmt_money, maybe_print_json, month_bounds, pretty_table};
use anyhow::Result;
use chrono::Local;
use rusqlite::Connection;
use serde_json::json;

pub fn handle(conn: &Connection, owner: &str, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("balance", sub)) => balance(conn, owner, sub)?,
        Some(("period", sub)) => period(conn, owner, sub)?,
        Some(("categories", sub)) => categories(conn, owner, sub)?,
        Some(("monthly", sub)) => monthly(conn, owner, sub)?,
        Some(("recent", sub)) => recent(conn, owner, sub)?,
        Some(("persona", sub)) => persona(conn, owner, sub)?,
        Some(("dashboard", sub)) => dashboard(conn, owner, sub)?,
        _ => {}
    }
    Ok(())
}

fn balance(conn: &Connection, owner: &str, sub: &clap::ArgMatches) -> Result<()> {
    let accounts = agg::account_details(conn, owner)?;
    let total = agg::total_balance(conn, owner)?;
    let out = json!({ "total_balance": total, "accounts": accounts });
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &out)? {
        let mut rows: Vec<Vec<String>> = accounts
            .iter()
            .map(|a| vec![a.title.clone(), fmt_money(&a.balance)])
            .collect();
        rows.push(vec!["Total".into(), fmt_money(&total)]);
        println!("{}", pretty_table(&["Account", "Balance"], rows));
    }
    Ok(())
}

fn period(conn: &Connection, owner: &str, sub: &clap::ArgMatches) -> Result<()> {
    let window = period_from_args(sub)?;
    let earnings = agg::period_earnings(conn, owner, &window)?;
    let expenses = agg::period_expenses(conn, owner, &window)?;
    let change = agg::period_change(conn, owner, &window)?;
    let out = json!({
        "period": window,
        "earnings": earnings,
        "expenses": expenses,
        "change": change,
    });
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &out)? {
        let rows = vec![
            vec!["Earnings".into(), fmt_money(&earnings)],
            vec!["Expenses".into(), fmt_money(&expenses)],
            vec!["Change".into(), fmt_money(&change)],
        ];
        println!("{}", pretty_table(&["", "Amount"], rows));
    }
    Ok(())
}

fn categories(conn: &Connection, owner: &str, sub: &clap::ArgMatches) -> Result<()> {
    let window = period_from_args(sub)?;
    let data = agg::categories_breakdown(conn, owner, &window)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows = data
            .iter()
            .map(|b| {
                vec![
                    b.category.title.clone(),
                    fmt_money(&b.category.total_amount),
                    b.transactions.len().to_string(),
                ]
            })
            .collect();
        println!("{}", pretty_table(&["Category", "Spent", "Transactions"], rows));
    }
    Ok(())
}

fn monthly(conn: &Connection, owner: &str, sub: &clap::ArgMatches) -> Result<()> {
    let window = period_from_args(sub)?;
    let data = agg::monthly_changes(conn, owner, &window)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows = data
            .iter()
            .map(|m| {
                vec![
                    format!("{} {}", m.month, m.year),
                    fmt_money(&m.incomes),
                    fmt_money(&m.expenses),
                ]
            })
            .collect();
        println!("{}", pretty_table(&["Month", "Income", "Expense"], rows));
    }
    Ok(())
}

fn recent(conn: &Connection, owner: &str, sub: &clap::ArgMatches) -> Result<()> {
    let limit = sub.get_one::<usize>("limit").copied();
    let data = agg::recent_transactions(conn, owner, limit)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows: Vec<Vec<String>> = data.iter().map(table_row).collect();
        println!(
            "{}",
            pretty_table(
                &["ID", "Date", "Title", "Type", "Amount", "Account", "Category", "Description"],
                rows,
            )
        );
    }
    Ok(())
}

fn persona(conn: &Connection, owner: &str, sub: &clap::ArgMatches) -> Result<()> {
    let rate = agg::savings_rate(conn, owner)?;
    let tier = financial_persona(rate);
    let out = json!({ "savings_rate": rate, "persona": tier });
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &out)? {
        println!("Savings rate: {}%", rate);
        println!("{}: {}", tier.label, tier.summary);
    }
    Ok(())
}

fn dashboard(conn: &Connection, owner: &str, sub: &clap::ArgMatches) -> Result<()> {
    let today = Local::now().date_naive();
    let window = if sub.get_flag("all") {
        Period::all_time()
    } else {
        let requested = period_from_args(sub)?;
        if requested.is_all_time() {
            let (first, last) = month_bounds(today);
            Period::new(Some(first), Some(last))?
        } else {
            requested
        }
    };
    let recent_limit = sub.get_one::<usize>("recent-limit").copied();
    let data = agg::dashboard(conn, owner, &window, today, recent_limit)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        return Ok(());
    }

    let label = |d: Option<chrono::NaiveDate>| d.map(|d| d.to_string()).unwrap_or_else(|| "…".into());
    println!("Period {} to {}", label(window.start), label(window.end));
    let summary = vec![
        vec!["Total balance".into(), fmt_money(&data.total_balance)],
        vec!["Earnings".into(), fmt_money(&data.period_earnings)],
        vec!["Expenses".into(), fmt_money(&data.period_expenses)],
        vec!["Change".into(), fmt_money(&data.period_change)],
        vec!["Spent this month".into(), fmt_money(&data.total_spend_this_month)],
        vec!["Transactions".into(), data.total_transactions_count.to_string()],
        vec![
            "Top category".into(),
            data.category_with_most_spent
                .as_ref()
                .map(|c| format!("{} ({})", c.title, fmt_money(&c.total_amount)))
                .unwrap_or_else(|| "-".into()),
        ],
        vec!["Savings rate".into(), format!("{}%", data.savings_rate)],
        vec!["Persona".into(), data.persona.label.to_string()],
    ];
    println!("{}", pretty_table(&["", "Value"], summary));

    let rows: Vec<Vec<String>> = data.recent_transactions.iter().map(table_row).collect();
    println!(
        "{}",
        pretty_table(
            &["ID", "Date", "Title", "Type", "Amount", "Account", "Category", "Description"],
            rows,
        )
    );
    Ok(())
}
