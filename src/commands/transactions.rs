// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::{period_from_args, required};
use crate::error::LedgerError;
use crate::models::{PopulatedTransaction, TransactionDraft, TransactionType, parse_amount};
use crate::reports;
use crate::sync;
use crate::utils::{fmt_money, maybe_print_json, parse_date, parse_id_list, pretty_table};
use anyhow::{Context, Result};
use rusqlite::Connection;

pub fn handle(conn: &mut Connection, owner: &str, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, owner, sub)?,
        Some(("edit", sub)) => edit(conn, owner, sub)?,
        Some(("rm", sub)) => rm(conn, owner, sub)?,
        Some(("rm-many", sub)) => rm_many(conn, owner, sub)?,
        Some(("list", sub)) => list(conn, owner, sub)?,
        _ => {}
    }
    Ok(())
}

/// Builds a draft from CLI fields. Amounts are typed as non-negative
/// magnitudes; the sign comes from `--type`.
pub fn draft_from_args(sub: &clap::ArgMatches) -> Result<TransactionDraft> {
    let kind: TransactionType = required(sub, "type")?.parse()?;
    let magnitude = parse_amount(required(sub, "amount")?)?;
    if magnitude.is_sign_negative() && !magnitude.is_zero() {
        return Err(LedgerError::validation(format!(
            "amount must be a non-negative magnitude (got {}); use --type to choose expense or income",
            magnitude
        ))
        .into());
    }
    let amount = match kind {
        TransactionType::Expense => -magnitude,
        TransactionType::Income => magnitude,
    };
    Ok(TransactionDraft {
        title: required(sub, "title")?.to_string(),
        description: required(sub, "description")?.to_string(),
        amount,
        r#type: kind,
        account_id: *sub.get_one::<i64>("account").context("--account is required")?,
        category_id: *sub.get_one::<i64>("category").context("--category is required")?,
        date: parse_date(required(sub, "date")?)?,
    })
}

fn add(conn: &mut Connection, owner: &str, sub: &clap::ArgMatches) -> Result<()> {
    let draft = draft_from_args(sub)?;
    let record = sync::create_transaction(conn, owner, draft)?;
    let tx = &record.transaction;
    println!(
        "Recorded {} {} on {} (id {}, account {})",
        tx.r#type,
        fmt_money(&tx.amount),
        tx.date,
        tx.id,
        record.account_title.as_deref().unwrap_or("?")
    );
    Ok(())
}

fn edit(conn: &mut Connection, owner: &str, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").context("--id is required")?;
    let draft = draft_from_args(sub)?;
    let record = sync::update_transaction(conn, owner, id, draft)?;
    println!(
        "Updated transaction {}: {} on {}",
        id,
        fmt_money(&record.transaction.amount),
        record.transaction.date
    );
    Ok(())
}

fn rm(conn: &mut Connection, owner: &str, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").context("--id is required")?;
    let removed = sync::delete_transaction(conn, owner, id)?;
    println!("Deleted transaction {} ({})", id, fmt_money(&removed.amount));
    Ok(())
}

fn rm_many(conn: &mut Connection, owner: &str, sub: &clap::ArgMatches) -> Result<()> {
    let ids = parse_id_list(required(sub, "ids")?)?;
    let deleted = sync::delete_transactions(conn, owner, &ids)?;
    println!(
        "Deleted {} of {} requested transactions",
        deleted.len(),
        ids.len()
    );
    Ok(())
}

fn list(conn: &Connection, owner: &str, sub: &clap::ArgMatches) -> Result<()> {
    let data = query_rows(conn, owner, sub)?;
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

pub fn query_rows(
    conn: &Connection,
    owner: &str,
    sub: &clap::ArgMatches,
) -> Result<Vec<PopulatedTransaction>> {
    let period = period_from_args(sub)?;
    Ok(reports::list_transactions(conn, owner, &period)?)
}

pub(crate) fn table_row(r: &PopulatedTransaction) -> Vec<String> {
    let t = &r.transaction;
    vec![
        t.id.to_string(),
        t.date.to_string(),
        t.title.clone(),
        t.r#type.to_string(),
        fmt_money(&t.amount),
        r.account_title.clone().unwrap_or_default(),
        r.category
            .as_ref()
            .map(|c| c.title.clone())
            .unwrap_or_default(),
        t.description.clone(),
    ]
}
