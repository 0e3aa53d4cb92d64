// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::sync::{self, Drift};
use crate::utils::{fmt_money, maybe_print_json, pretty_table};
use anyhow::Result;
use rusqlite::{Connection, params};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Orphan {
    pub transaction_id: i64,
    pub missing: &'static str,
    pub reference: i64,
}

#[derive(Debug, Serialize)]
struct Report {
    drift: Vec<Drift>,
    repaired: bool,
    orphans: Vec<Orphan>,
}

pub fn handle(conn: &mut Connection, owner: &str, m: &clap::ArgMatches) -> Result<()> {
    let fix = m.get_flag("fix");
    let drift = if fix {
        sync::reconcile(conn, owner)?
    } else {
        sync::find_drift(conn, owner)?
    };
    let orphans = find_orphans(conn, owner)?;

    let report = Report {
        drift,
        repaired: fix,
        orphans,
    };
    if maybe_print_json(m.get_flag("json"), m.get_flag("jsonl"), &report)? {
        return Ok(());
    }

    let drift_label = if fix { "balance_repaired" } else { "balance_drift" };
    let mut rows = Vec::new();
    for d in &report.drift {
        rows.push(vec![
            drift_label.to_string(),
            format!(
                "account {} '{}': cached {} ({} txns), ledger {} ({} txns)",
                d.account_id,
                d.title,
                fmt_money(&d.cached_balance),
                d.cached_count,
                fmt_money(&d.expected_balance),
                d.expected_count
            ),
        ]);
    }
    for o in &report.orphans {
        rows.push(vec![
            format!("missing_{}", o.missing),
            format!("transaction {} -> {} {}", o.transaction_id, o.missing, o.reference),
        ]);
    }

    if rows.is_empty() {
        println!("doctor: no issues found");
    } else {
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}

/// Transactions of `owner` pointing at an account or category that no
/// longer exists.
pub fn find_orphans(conn: &Connection, owner: &str) -> Result<Vec<Orphan>> {
    let mut out = Vec::new();
    let checks = [
        (
            "account",
            "SELECT t.id, t.account_id FROM transactions t
             LEFT JOIN accounts a ON t.account_id=a.id
             WHERE t.owner_id=?1 AND a.id IS NULL ORDER BY t.id",
        ),
        (
            "category",
            "SELECT t.id, t.category_id FROM transactions t
             LEFT JOIN categories c ON t.category_id=c.id
             WHERE t.owner_id=?1 AND c.id IS NULL ORDER BY t.id",
        ),
    ];
    for (missing, sql) in checks {
        let mut stmt = conn.prepare(sql)?;
        let mut cur = stmt.query(params![owner])?;
        while let Some(r) = cur.next()? {
            out.push(Orphan {
                transaction_id: r.get(0)?,
                missing,
                reference: r.get(1)?,
            });
        }
    }
    Ok(out)
}
