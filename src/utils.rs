// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result, anyhow};
use chrono::{Datelike, Months, NaiveDate};
use comfy_table::{Cell, Table, presets::UTF8_FULL};
use rusqlite::{Connection, OptionalExtension, params};
use rust_decimal::Decimal;
use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Installs the global subscriber once. Filter comes from `MONEYTRAIL_LOG`,
/// defaulting to `moneytrail=info`. Output goes to stderr so `--json` on
/// stdout stays machine-readable.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{EnvFilter, fmt};

        let filter = EnvFilter::try_from_env("MONEYTRAIL_LOG")
            .unwrap_or_else(|_| EnvFilter::new("moneytrail=info"));

        fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    });
}

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", s))
}

pub fn parse_decimal(s: &str) -> Result<Decimal> {
    s.trim()
        .parse::<Decimal>()
        .with_context(|| format!("Invalid decimal '{}'", s))
}

/// Accepts ids separated by commas, whitespace or `&`.
pub fn parse_id_list(s: &str) -> Result<Vec<i64>> {
    s.split(|c: char| c == ',' || c == '&' || c.is_whitespace())
        .filter(|p| !p.is_empty())
        .map(|p| {
            p.parse::<i64>()
                .with_context(|| format!("Invalid transaction id '{}'", p))
        })
        .collect()
}

pub fn fmt_money(d: &Decimal) -> String {
    format!("{:.2}", d.round_dp(2))
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

pub fn maybe_print_json<T: serde::Serialize>(
    json_flag: bool,
    jsonl_flag: bool,
    v: &T,
) -> Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    if jsonl_flag {
        // If v is an array, stream each element; else stream single line
        let val = serde_json::to_value(v)?;
        if let Some(arr) = val.as_array() {
            for item in arr {
                println!("{}", serde_json::to_string(item)?);
            }
        } else {
            println!("{}", serde_json::to_string(&val)?);
        }
        return Ok(true);
    }
    Ok(false)
}

/// First and last day of the calendar month containing `date`.
pub fn month_bounds(date: NaiveDate) -> (NaiveDate, NaiveDate) {
    let first = date.with_day(1).unwrap_or(date);
    let last = first
        .checked_add_months(Months::new(1))
        .and_then(|d| d.pred_opt())
        .unwrap_or(date);
    (first, last)
}

// Default user settings
pub fn get_default_user(conn: &Connection) -> Result<Option<String>> {
    let v: Option<String> = conn
        .query_row(
            "SELECT value FROM settings WHERE key='default_user'",
            [],
            |r| r.get(0),
        )
        .optional()?;
    Ok(v)
}

pub fn set_default_user(conn: &Connection, user: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO settings(key, value) VALUES('default_user', ?1)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        params![user],
    )?;
    Ok(())
}

/// The identity every command acts for: `--user` / `MONEYTRAIL_USER` first,
/// then the stored default.
pub fn resolve_user(conn: &Connection, explicit: Option<&str>) -> Result<String> {
    if let Some(u) = explicit.map(str::trim).filter(|u| !u.is_empty()) {
        return Ok(u.to_string());
    }
    get_default_user(conn)?.ok_or_else(|| {
        anyhow!("No user selected; pass --user <id> or run `moneytrail config set-user <id>`")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_bounds_handles_leap_february() {
        let d = NaiveDate::from_ymd_opt(2024, 2, 10).unwrap();
        let (first, last) = month_bounds(d);
        assert_eq!(first, NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
        assert_eq!(last, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());

        let d = NaiveDate::from_ymd_opt(2025, 12, 31).unwrap();
        assert_eq!(month_bounds(d).1, d);
    }

    #[test]
    fn id_list_accepts_mixed_separators() {
        assert_eq!(parse_id_list("1, 2&3 4").unwrap(), vec![1, 2, 3, 4]);
        assert!(parse_id_list("1,x").is_err());
    }

    #[test]
    fn resolve_user_prefers_explicit_then_setting() {
        let conn = crate::db::open_in_memory().unwrap();
        assert!(resolve_user(&conn, None).is_err());
        set_default_user(&conn, "alice").unwrap();
        assert_eq!(resolve_user(&conn, None).unwrap(), "alice");
        assert_eq!(resolve_user(&conn, Some(" bob ")).unwrap(), "bob");
        assert_eq!(resolve_user(&conn, Some("  ")).unwrap(), "alice");
    }
}
