// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::required;
use crate::models::check_opening_balance;
use crate::store::accounts;
use crate::utils::{fmt_money, maybe_print_json, parse_decimal, pretty_table};
use anyhow::{Result, bail};
use rusqlite::Connection;

pub fn handle(conn: &Connection, owner: &str, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let title = required(sub, "title")?.trim();
            if title.is_empty() {
                bail!("Account title is required");
            }
            let icon = required(sub, "icon")?.trim();
            let opening = check_opening_balance(parse_decimal(required(sub, "opening")?)?)?;
            let id = accounts::insert_account(conn, owner, title, icon, opening)?;
            tracing::info!(id, owner, opening = %opening, "account added");
            println!("Added account '{}' (id {}, opening {})", title, id, fmt_money(&opening));
        }
        Some(("list", sub)) => {
            let data = accounts::list_accounts(conn, owner)?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
                let rows = data
                    .iter()
                    .map(|a| {
                        vec![
                            a.id.to_string(),
                            a.title.clone(),
                            a.icon.clone(),
                            fmt_money(&a.balance),
                            a.transaction_count.to_string(),
                        ]
                    })
                    .collect();
                println!(
                    "{}",
                    pretty_table(&["ID", "Title", "Icon", "Balance", "Transactions"], rows)
                );
            }
        }
        Some(("rm", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap_or(&0);
            // Transactions that still point at the account are left as they are.
            if accounts::delete_account(conn, owner, id)? == 0 {
                bail!("Account {} not found", id);
            }
            println!("Removed account {}", id);
        }
        _ => {}
    }
    Ok(())
}
