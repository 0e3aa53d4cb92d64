// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::{Connection, OptionalExtension, Row, params};
use rust_decimal::Decimal;

use super::decimal_at;
use crate::models::Account;

const SELECT_ACCOUNT: &str = "SELECT id, owner_id, title, icon, opening_balance, balance, transaction_count FROM accounts";

fn account_from_row(r: &Row<'_>) -> rusqlite::Result<Account> {
    Ok(Account {
        id: r.get(0)?,
        owner_id: r.get(1)?,
        title: r.get(2)?,
        icon: r.get(3)?,
        opening_balance: decimal_at(r, 4)?,
        balance: decimal_at(r, 5)?,
        transaction_count: r.get(6)?,
    })
}

pub fn get_account(conn: &Connection, id: i64) -> rusqlite::Result<Option<Account>> {
    conn.query_row(
        &format!("{} WHERE id=?1", SELECT_ACCOUNT),
        params![id],
        account_from_row,
    )
    .optional()
}

pub fn list_accounts(conn: &Connection, owner: &str) -> rusqlite::Result<Vec<Account>> {
    let mut stmt = conn.prepare(&format!("{} WHERE owner_id=?1 ORDER BY title, id", SELECT_ACCOUNT))?;
    let rows = stmt.query_map(params![owner], account_from_row)?;
    rows.collect()
}

/// A new account starts with its opening balance as its balance and no
/// attached transactions.
pub fn insert_account(
    conn: &Connection,
    owner: &str,
    title: &str,
    icon: &str,
    opening_balance: Decimal,
) -> rusqlite::Result<i64> {
    conn.execute(
        "INSERT INTO accounts(owner_id, title, icon, opening_balance, balance, transaction_count)
         VALUES (?1, ?2, ?3, ?4, ?4, 0)",
        params![owner, title, icon, opening_balance.to_string()],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Overwrites the cached balance and count. Callers hold the write lock.
pub fn set_cached_totals(
    conn: &Connection,
    id: i64,
    balance: Decimal,
    transaction_count: i64,
) -> rusqlite::Result<usize> {
    conn.execute(
        "UPDATE accounts SET balance=?1, transaction_count=?2 WHERE id=?3",
        params![balance.to_string(), transaction_count, id],
    )
}

pub fn delete_account(conn: &Connection, owner: &str, id: i64) -> rusqlite::Result<usize> {
    conn.execute(
        "DELETE FROM accounts WHERE id=?1 AND owner_id=?2",
        params![id, owner],
    )
}
