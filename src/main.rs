// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use std::path::Path;

use moneytrail::{cli, commands, db, utils};

fn main() -> Result<()> {
    utils::init_tracing();

    let cli = cli::build_cli();
    let matches = cli.get_matches();

    let db_arg = matches.get_one::<String>("db").map(Path::new);
    let mut conn = db::open_or_init(db_arg)?;

    match matches.subcommand() {
        Some(("init", _)) => {
            let shown = match db_arg {
                Some(p) => p.to_path_buf(),
                None => db::db_path()?,
            };
            println!("Database initialized at {}", shown.display());
            return Ok(());
        }
        Some(("config", sub)) => return commands::config::handle(&conn, sub),
        None => {
            cli::build_cli().print_help()?;
            println!();
            return Ok(());
        }
        _ => {}
    }

    let user = utils::resolve_user(&conn, matches.get_one::<String>("user").map(String::as_str))?;
    tracing::debug!(user = %user, "acting as");

    match matches.subcommand() {
        Some(("account", sub)) => commands::accounts::handle(&conn, &user, sub)?,
        Some(("category", sub)) => commands::categories::handle(&conn, &user, sub)?,
        Some(("tx", sub)) => commands::transactions::handle(&mut conn, &user, sub)?,
        Some(("report", sub)) => commands::reports::handle(&conn, &user, sub)?,
        Some(("export", sub)) => commands::exporter::handle(&conn, &user, sub)?,
        Some(("doctor", sub)) => commands::doctor::handle(&mut conn, &user, sub)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
