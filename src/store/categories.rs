// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::{Connection, OptionalExtension, Row, params};

use crate::models::Category;

const SELECT_CATEGORY: &str = "SELECT id, owner_id, title, icon, color, is_income FROM categories";

fn category_from_row(r: &Row<'_>) -> rusqlite::Result<Category> {
    Ok(Category {
        id: r.get(0)?,
        owner_id: r.get(1)?,
        title: r.get(2)?,
        icon: r.get(3)?,
        color: r.get(4)?,
        is_income: r.get(5)?,
    })
}

pub fn get_category(conn: &Connection, id: i64) -> rusqlite::Result<Option<Category>> {
    conn.query_row(
        &format!("{} WHERE id=?1", SELECT_CATEGORY),
        params![id],
        category_from_row,
    )
    .optional()
}

pub fn list_categories(conn: &Connection, owner: &str) -> rusqlite::Result<Vec<Category>> {
    let mut stmt = conn.prepare(&format!("{} WHERE owner_id=?1 ORDER BY title, id", SELECT_CATEGORY))?;
    let rows = stmt.query_map(params![owner], category_from_row)?;
    rows.collect()
}

pub fn insert_category(
    conn: &Connection,
    owner: &str,
    title: &str,
    icon: &str,
    color: &str,
    is_income: bool,
) -> rusqlite::Result<i64> {
    conn.execute(
        "INSERT INTO categories(owner_id, title, icon, color, is_income) VALUES (?1, ?2, ?3, ?4, ?5)",
        params![owner, title, icon, color, is_income],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn delete_category(conn: &Connection, owner: &str, id: i64) -> rusqlite::Result<usize> {
    conn.execute(
        "DELETE FROM categories WHERE id=?1 AND owner_id=?2",
        params![id, owner],
    )
}
