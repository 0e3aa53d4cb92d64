// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::{period_from_args, required};
use crate::models::PopulatedTransaction;
use crate::reports;
use anyhow::{Result, bail};
use rusqlite::Connection;
use serde_json::json;
use std::path::Path;

pub fn handle(conn: &Connection, owner: &str, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("transactions", sub)) => export_transactions(conn, owner, sub),
        _ => Ok(()),
    }
}

fn export_transactions(conn: &Connection, owner: &str, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = required(sub, "format")?.to_lowercase();
    let out = required(sub, "out")?;
    let period = period_from_args(sub)?;

    let mut rows = reports::list_transactions(conn, owner, &period)?;
    rows.sort_by_key(|r| (r.transaction.date, r.transaction.id));

    match fmt.as_str() {
        "csv" => write_csv(Path::new(out), &rows)?,
        "json" => {
            let items: Vec<_> = rows.iter().map(json_row).collect();
            std::fs::write(out, serde_json::to_string_pretty(&items)?)?;
        }
        other => bail!("Unknown format: {} (use csv|json)", other),
    }
    tracing::info!(owner, count = rows.len(), format = %fmt, "transactions exported");
    println!("Exported {} transactions to {}", rows.len(), out);
    Ok(())
}

pub fn write_csv(path: &Path, rows: &[PopulatedTransaction]) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    wtr.write_record([
        "id",
        "date",
        "title",
        "description",
        "type",
        "amount",
        "account",
        "category",
    ])?;
    for r in rows {
        let t = &r.transaction;
        wtr.write_record([
            t.id.to_string(),
            t.date.to_string(),
            t.title.clone(),
            t.description.clone(),
            t.r#type.to_string(),
            t.amount.to_string(),
            r.account_title.clone().unwrap_or_default(),
            r.category
                .as_ref()
                .map(|c| c.title.clone())
                .unwrap_or_default(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

fn json_row(r: &PopulatedTransaction) -> serde_json::Value {
    let t = &r.transaction;
    json!({
        "id": t.id,
        "date": t.date,
        "title": t.title,
        "description": t.description,
        "type": t.r#type,
        "amount": t.amount,
        "account": r.account_title,
        "category": r.category.as_ref().map(|c| &c.title),
    })
}
