// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Row-level access to the three tables. Functions take `&Connection` so
//! they work both on a plain connection and inside a write transaction.
//! Nothing here keeps balances in step with the ledger; that is the job of
//! [`crate::sync`].

pub mod accounts;
pub mod categories;
pub mod ledger;

use rusqlite::Row;
use rusqlite::types::Type;
use rust_decimal::Decimal;

/// Amounts are stored as decimal text and never pass through `f64`.
pub(crate) fn decimal_at(row: &Row<'_>, idx: usize) -> rusqlite::Result<Decimal> {
    let s: String = row.get(idx)?;
    s.parse::<Decimal>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

pub(crate) fn placeholders(n: usize) -> String {
    vec!["?"; n].join(",")
}
