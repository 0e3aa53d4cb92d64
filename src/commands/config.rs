// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::required;
use crate::db;
use crate::utils::{get_default_user, set_default_user};
use anyhow::{Result, bail};
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("set-user", sub)) => {
            let id = required(sub, "id")?.trim();
            if id.is_empty() {
                bail!("User id must not be empty");
            }
            set_default_user(conn, id)?;
            println!("Default user set to {}", id);
        }
        Some(("show", _)) => {
            let user = get_default_user(conn)?;
            println!("default_user = {}", user.as_deref().unwrap_or("(unset)"));
            match conn.path() {
                Some(p) if !p.is_empty() => println!("database = {}", p),
                _ => println!("database = {}", db::db_path()?.display()),
            }
        }
        _ => {}
    }
    Ok(())
}
