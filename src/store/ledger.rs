// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, Row, ToSql, params};

use super::{decimal_at, placeholders};
use crate::models::{
    Category, Period, PopulatedTransaction, Transaction, TransactionDraft, TransactionType,
};

const SELECT_TX: &str = "SELECT t.id, t.owner_id, t.title, t.description, t.amount, t.type, \
     t.is_income, t.account_id, t.category_id, t.date, t.created_at FROM transactions t";

const SELECT_POPULATED: &str = "SELECT t.id, t.owner_id, t.title, t.description, t.amount, t.type, \
     t.is_income, t.account_id, t.category_id, t.date, t.created_at, \
     a.title, c.id, c.owner_id, c.title, c.icon, c.color, c.is_income \
     FROM transactions t \
     LEFT JOIN accounts a ON a.id=t.account_id \
     LEFT JOIN categories c ON c.id=t.category_id";

/// Sort order for raw listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListOrder {
    /// Most recent transaction date first.
    NewestDate,
    /// Most recently recorded first.
    NewestCreated,
}

impl ListOrder {
    fn sql(&self) -> &'static str {
        match self {
            ListOrder::NewestDate => " ORDER BY t.date DESC, t.id DESC",
            ListOrder::NewestCreated => " ORDER BY t.created_at DESC, t.id DESC",
        }
    }
}

fn transaction_from_row(r: &Row<'_>) -> rusqlite::Result<Transaction> {
    Ok(Transaction {
        id: r.get(0)?,
        owner_id: r.get(1)?,
        title: r.get(2)?,
        description: r.get(3)?,
        amount: decimal_at(r, 4)?,
        r#type: r.get(5)?,
        is_income: r.get(6)?,
        account_id: r.get(7)?,
        category_id: r.get(8)?,
        date: r.get(9)?,
        created_at: r.get(10)?,
    })
}

fn populated_from_row(r: &Row<'_>) -> rusqlite::Result<PopulatedTransaction> {
    let transaction = transaction_from_row(r)?;
    let account_title: Option<String> = r.get(11)?;
    let category = match r.get::<_, Option<i64>>(12)? {
        Some(id) => Some(Category {
            id,
            owner_id: r.get(13)?,
            title: r.get(14)?,
            icon: r.get(15)?,
            color: r.get(16)?,
            is_income: r.get(17)?,
        }),
        None => None,
    };
    Ok(PopulatedTransaction {
        transaction,
        account_title,
        category,
    })
}

/// Appends the owner and period filters. Dates are stored as `YYYY-MM-DD`
/// so text comparison orders them correctly.
fn push_filters(sql: &mut String, params_vec: &mut Vec<String>, owner: &str, period: &Period) {
    sql.push_str(" WHERE t.owner_id=?");
    params_vec.push(owner.to_string());
    if let Some(start) = period.start {
        sql.push_str(" AND t.date>=?");
        params_vec.push(start.to_string());
    }
    if let Some(end) = period.end {
        sql.push_str(" AND t.date<=?");
        params_vec.push(end.to_string());
    }
}

pub fn get_transaction(conn: &Connection, id: i64) -> rusqlite::Result<Option<Transaction>> {
    conn.query_row(
        &format!("{} WHERE t.id=?1", SELECT_TX),
        params![id],
        transaction_from_row,
    )
    .optional()
}

pub fn get_populated(conn: &Connection, id: i64) -> rusqlite::Result<Option<PopulatedTransaction>> {
    conn.query_row(
        &format!("{} WHERE t.id=?1", SELECT_POPULATED),
        params![id],
        populated_from_row,
    )
    .optional()
}

/// Returns the transactions among `ids` that exist, in id order. Unknown
/// ids are ignored.
pub fn find_transactions(conn: &Connection, ids: &[i64]) -> rusqlite::Result<Vec<Transaction>> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    let sql = format!(
        "{} WHERE t.id IN ({}) ORDER BY t.id",
        SELECT_TX,
        placeholders(ids.len())
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(rusqlite::params_from_iter(ids.iter()), transaction_from_row)?;
    rows.collect()
}

/// Ids among `ids` that exist and belong to someone other than `owner`.
pub fn foreign_owned_ids(conn: &Connection, ids: &[i64], owner: &str) -> rusqlite::Result<Vec<i64>> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    let sql = format!(
        "SELECT id FROM transactions WHERE id IN ({}) AND owner_id != ? ORDER BY id",
        placeholders(ids.len())
    );
    let mut params: Vec<&dyn ToSql> = ids.iter().map(|id| id as &dyn ToSql).collect();
    params.push(&owner);
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(rusqlite::params_from_iter(params), |r| r.get(0))?;
    rows.collect()
}

pub fn insert_transaction(
    conn: &Connection,
    owner: &str,
    draft: &TransactionDraft,
    created_at: DateTime<Utc>,
) -> rusqlite::Result<i64> {
    conn.execute(
        "INSERT INTO transactions(owner_id, title, description, amount, type, is_income, account_id, category_id, date, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            owner,
            draft.title,
            draft.description,
            draft.amount.to_string(),
            draft.r#type,
            draft.is_income(),
            draft.account_id,
            draft.category_id,
            draft.date,
            created_at,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Replaces every user-editable field; `owner_id` and `created_at` stay.
pub fn update_transaction(
    conn: &Connection,
    id: i64,
    draft: &TransactionDraft,
) -> rusqlite::Result<usize> {
    conn.execute(
        "UPDATE transactions SET title=?1, description=?2, amount=?3, type=?4, is_income=?5,
         account_id=?6, category_id=?7, date=?8 WHERE id=?9",
        params![
            draft.title,
            draft.description,
            draft.amount.to_string(),
            draft.r#type,
            draft.is_income(),
            draft.account_id,
            draft.category_id,
            draft.date,
            id,
        ],
    )
}

pub fn delete_transaction(conn: &Connection, id: i64) -> rusqlite::Result<usize> {
    conn.execute("DELETE FROM transactions WHERE id=?1", params![id])
}

pub fn delete_transactions(conn: &Connection, ids: &[i64]) -> rusqlite::Result<usize> {
    if ids.is_empty() {
        return Ok(0);
    }
    let sql = format!(
        "DELETE FROM transactions WHERE id IN ({})",
        placeholders(ids.len())
    );
    conn.execute(&sql, rusqlite::params_from_iter(ids.iter()))
}

/// Transactions of `owner` dated inside `period`, optionally restricted to
/// one type, oldest first.
pub fn in_period(
    conn: &Connection,
    owner: &str,
    period: &Period,
    kind: Option<TransactionType>,
) -> rusqlite::Result<Vec<Transaction>> {
    let mut sql = String::from(SELECT_TX);
    let mut params_vec: Vec<String> = Vec::new();
    push_filters(&mut sql, &mut params_vec, owner, period);
    if let Some(kind) = kind {
        sql.push_str(" AND t.type=?");
        params_vec.push(kind.as_str().to_string());
    }
    sql.push_str(" ORDER BY t.date, t.id");

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(rusqlite::params_from_iter(params_vec.iter()), transaction_from_row)?;
    rows.collect()
}

pub fn list_populated(
    conn: &Connection,
    owner: &str,
    period: &Period,
    order: ListOrder,
    limit: Option<usize>,
) -> rusqlite::Result<Vec<PopulatedTransaction>> {
    let mut sql = String::from(SELECT_POPULATED);
    let mut params_vec: Vec<String> = Vec::new();
    push_filters(&mut sql, &mut params_vec, owner, period);
    sql.push_str(order.sql());
    if let Some(limit) = limit {
        sql.push_str(&format!(" LIMIT {}", limit));
    }

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(rusqlite::params_from_iter(params_vec.iter()), populated_from_row)?;
    rows.collect()
}

pub fn count_for_owner(conn: &Connection, owner: &str) -> rusqlite::Result<i64> {
    conn.query_row(
        "SELECT COUNT(*) FROM transactions WHERE owner_id=?1",
        params![owner],
        |r| r.get(0),
    )
}
