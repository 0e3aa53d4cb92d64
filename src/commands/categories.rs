// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::required;
use crate::store::categories;
use crate::utils::{maybe_print_json, pretty_table};
use anyhow::{Result, bail};
use rusqlite::Connection;

pub fn handle(conn: &Connection, owner: &str, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let title = required(sub, "title")?.trim();
            if title.is_empty() {
                bail!("Category title is required");
            }
            let icon = required(sub, "icon")?.trim();
            let color = required(sub, "color")?.trim();
            let is_income = sub.get_flag("income");
            let id = categories::insert_category(conn, owner, title, icon, color, is_income)?;
            println!("Added category '{}' (id {})", title, id);
        }
        Some(("list", sub)) => {
            let data = categories::list_categories(conn, owner)?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
                let rows = data
                    .iter()
                    .map(|c| {
                        vec![
                            c.id.to_string(),
                            c.title.clone(),
                            c.icon.clone(),
                            c.color.clone(),
                            if c.is_income { "yes".into() } else { "no".into() },
                        ]
                    })
                    .collect();
                println!(
                    "{}",
                    pretty_table(&["ID", "Category", "Icon", "Color", "Income"], rows)
                );
            }
        }
        Some(("rm", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap_or(&0);
            if categories::delete_category(conn, owner, id)? == 0 {
                bail!("Category {} not found", id);
            }
            println!("Removed category {}", id);
        }
        _ => {}
    }
    Ok(())
}
