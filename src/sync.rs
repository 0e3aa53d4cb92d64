// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Ledger mutations that keep cached account totals in step with the
//! transactions attached to each account.
//!
//! For every account `A`:
//!
//! ```text
//! A.balance           == A.opening_balance + sum(t.amount for t attached to A)
//! A.transaction_count == count(t attached to A)
//! ```
//!
//! Each operation runs in one `BEGIN IMMEDIATE` transaction. The account
//! step is applied before the ledger step, and a failure anywhere rolls both
//! back, so callers only ever see "all applied" or "nothing changed".

use std::collections::HashMap;

use chrono::Utc;
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::db;
use crate::error::{Entity, LedgerError, LedgerResult};
use crate::guard;
use crate::models::{Account, Period, PopulatedTransaction, Transaction, TransactionDraft};
use crate::store::{accounts, categories, ledger};

/// Change to one account's cached totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BalanceDelta {
    pub account_id: i64,
    pub amount: Decimal,
    pub count: i64,
}

impl BalanceDelta {
    /// A transaction of `amount` becomes attached to the account.
    pub fn attach(account_id: i64, amount: Decimal) -> Self {
        BalanceDelta {
            account_id,
            amount,
            count: 1,
        }
    }

    /// A transaction of `amount` stops being attached to the account.
    pub fn detach(account_id: i64, amount: Decimal) -> Self {
        BalanceDelta {
            account_id,
            amount: -amount,
            count: -1,
        }
    }

    /// In-place amount change; attachment is unchanged.
    pub fn adjust(account_id: i64, amount: Decimal) -> Self {
        BalanceDelta {
            account_id,
            amount,
            count: 0,
        }
    }
}

/// Deltas needed to move `old` to `new_account_id` with `new_amount`, in the
/// order they are applied.
pub fn plan_update(old: &Transaction, new_account_id: i64, new_amount: Decimal) -> Vec<BalanceDelta> {
    if old.account_id == new_account_id {
        vec![BalanceDelta::adjust(new_account_id, new_amount - old.amount)]
    } else {
        vec![
            BalanceDelta::detach(old.account_id, old.amount),
            BalanceDelta::attach(new_account_id, new_amount),
        ]
    }
}

/// Applies `delta` to the account's cached totals and returns the updated
/// account, or `None` when the account does not exist. Must run under the
/// write lock.
pub fn apply_delta(conn: &Connection, delta: &BalanceDelta) -> LedgerResult<Option<Account>> {
    let Some(mut account) = accounts::get_account(conn, delta.account_id)? else {
        return Ok(None);
    };
    let count = account.transaction_count + delta.count;
    if count < 0 {
        return Err(LedgerError::Inconsistent(format!(
            "account {} would have {} attached transactions",
            account.id, count
        )));
    }
    let balance = account.balance.checked_add(delta.amount).ok_or_else(|| {
        LedgerError::Inconsistent(format!("balance overflow on account {}", account.id))
    })?;
    accounts::set_cached_totals(conn, account.id, balance, count)?;
    debug!(
        account = account.id,
        delta = %delta.amount,
        count_delta = delta.count,
        balance = %balance,
        "balance delta applied"
    );
    account.balance = balance;
    account.transaction_count = count;
    Ok(Some(account))
}

fn apply_required(conn: &Connection, delta: &BalanceDelta) -> LedgerResult<Account> {
    apply_delta(conn, delta)?.ok_or(LedgerError::not_found(Entity::Account, delta.account_id))
}

/// Detaches `record` from its account. A missing account is skipped so the
/// transaction can still be removed.
fn detach(conn: &Connection, record: &Transaction) -> LedgerResult<()> {
    let delta = BalanceDelta::detach(record.account_id, record.amount);
    if apply_delta(conn, &delta)?.is_none() {
        warn!(
            transaction = record.id,
            account = record.account_id,
            "account missing; balance step skipped"
        );
    }
    Ok(())
}

fn commit(tx: rusqlite::Transaction<'_>, op: &'static str) -> LedgerResult<()> {
    tx.commit().map_err(|e| {
        error!(op, error = %e, "commit failed; ledger and balances rolled back");
        LedgerError::from(e)
    })
}

fn load_populated(conn: &Connection, id: i64) -> LedgerResult<PopulatedTransaction> {
    ledger::get_populated(conn, id)?.ok_or(LedgerError::not_found(Entity::Transaction, id))
}

/// Records a new transaction for `owner` and attaches it to its account.
/// The account and category must exist and belong to `owner`.
pub fn create_transaction(
    conn: &mut Connection,
    owner: &str,
    draft: TransactionDraft,
) -> LedgerResult<PopulatedTransaction> {
    let draft = draft.validated()?;
    let tx = db::begin_write(conn)?;

    let account = guard::resolve_owned(
        accounts::get_account(&tx, draft.account_id)?,
        draft.account_id,
        owner,
    )?;
    guard::resolve_owned(
        categories::get_category(&tx, draft.category_id)?,
        draft.category_id,
        owner,
    )?;

    apply_required(&tx, &BalanceDelta::attach(account.id, draft.amount))?;
    let id = ledger::insert_transaction(&tx, owner, &draft, Utc::now())?;
    let record = load_populated(&tx, id)?;
    commit(tx, "create")?;

    info!(id, owner, account = account.id, amount = %draft.amount, "transaction created");
    Ok(record)
}

/// Replaces the editable fields of transaction `id`, moving its monetary
/// effect when the amount or account changes.
pub fn update_transaction(
    conn: &mut Connection,
    owner: &str,
    id: i64,
    draft: TransactionDraft,
) -> LedgerResult<PopulatedTransaction> {
    let draft = draft.validated()?;
    let tx = db::begin_write(conn)?;

    let old = guard::verify_owner(ledger::get_transaction(&tx, id)?, id, owner)?;
    // Both ends of a reassignment must resolve before anything is written.
    if accounts::get_account(&tx, old.account_id)?.is_none() {
        return Err(LedgerError::not_found(Entity::Account, old.account_id));
    }
    guard::resolve_owned(
        accounts::get_account(&tx, draft.account_id)?,
        draft.account_id,
        owner,
    )?;
    guard::resolve_owned(
        categories::get_category(&tx, draft.category_id)?,
        draft.category_id,
        owner,
    )?;

    for delta in plan_update(&old, draft.account_id, draft.amount) {
        apply_required(&tx, &delta)?;
    }
    ledger::update_transaction(&tx, id, &draft)?;
    let record = load_populated(&tx, id)?;
    commit(tx, "update")?;

    info!(
        id,
        owner,
        from_account = old.account_id,
        to_account = draft.account_id,
        old_amount = %old.amount,
        new_amount = %draft.amount,
        "transaction updated"
    );
    Ok(record)
}

/// Removes transaction `id` and takes its amount back out of its account.
pub fn delete_transaction(conn: &mut Connection, owner: &str, id: i64) -> LedgerResult<Transaction> {
    let tx = db::begin_write(conn)?;

    let record = guard::verify_owner(ledger::get_transaction(&tx, id)?, id, owner)?;
    detach(&tx, &record)?;
    ledger::delete_transaction(&tx, id)?;
    commit(tx, "delete")?;

    info!(id, owner, account = record.account_id, amount = %record.amount, "transaction deleted");
    Ok(record)
}

/// Removes every transaction in `ids` owned by `owner`. Ids that do not
/// resolve are skipped; if any id belongs to another user the whole batch
/// is rejected. Returns the ids actually deleted.
pub fn delete_transactions(
    conn: &mut Connection,
    owner: &str,
    ids: &[i64],
) -> LedgerResult<Vec<i64>> {
    let tx = db::begin_write(conn)?;

    guard::ensure_batch_owned(&tx, ids, owner)?;
    let found = ledger::find_transactions(&tx, ids)?;
    for record in &found {
        detach(&tx, record)?;
    }
    let deleted: Vec<i64> = found.iter().map(|t| t.id).collect();
    ledger::delete_transactions(&tx, &deleted)?;
    commit(tx, "delete_many")?;

    info!(
        owner,
        requested = ids.len(),
        deleted = deleted.len(),
        "transactions deleted"
    );
    Ok(deleted)
}

/// An account whose cached totals disagree with the ledger.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Drift {
    pub account_id: i64,
    pub title: String,
    pub cached_balance: Decimal,
    pub expected_balance: Decimal,
    pub cached_count: i64,
    pub expected_count: i64,
}

/// Lists `owner`'s accounts whose cached balance or count no longer match
/// the transactions attached to them.
pub fn find_drift(conn: &Connection, owner: &str) -> LedgerResult<Vec<Drift>> {
    let mut totals: HashMap<i64, (Decimal, i64)> = HashMap::new();
    for t in ledger::in_period(conn, owner, &Period::all_time(), None)? {
        let entry = totals.entry(t.account_id).or_insert((Decimal::ZERO, 0));
        entry.0 += t.amount;
        entry.1 += 1;
    }

    let drift = accounts::list_accounts(conn, owner)?
        .into_iter()
        .filter_map(|a| {
            let (sum, count) = totals.get(&a.id).copied().unwrap_or((Decimal::ZERO, 0));
            let expected_balance = a.opening_balance + sum;
            if expected_balance == a.balance && count == a.transaction_count {
                return None;
            }
            Some(Drift {
                account_id: a.id,
                title: a.title,
                cached_balance: a.balance,
                expected_balance,
                cached_count: a.transaction_count,
                expected_count: count,
            })
        })
        .collect();
    Ok(drift)
}

/// Rewrites drifted cached totals from the ledger and returns what changed.
pub fn reconcile(conn: &mut Connection, owner: &str) -> LedgerResult<Vec<Drift>> {
    let tx = db::begin_write(conn)?;
    let drift = find_drift(&tx, owner)?;
    for d in &drift {
        accounts::set_cached_totals(&tx, d.account_id, d.expected_balance, d.expected_count)?;
    }
    commit(tx, "reconcile")?;

    if !drift.is_empty() {
        warn!(owner, accounts = drift.len(), "repaired drifted account totals");
    }
    Ok(drift)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TransactionType;
    use chrono::NaiveDate;

    fn stored(account_id: i64, amount: i64) -> Transaction {
        Transaction {
            id: 1,
            owner_id: "alice".into(),
            title: "t".into(),
            description: "d".into(),
            amount: Decimal::from(amount),
            r#type: TransactionType::Income,
            is_income: true,
            account_id,
            category_id: 1,
            date: NaiveDate::from_ymd_opt(2025, 5, 1).unwrap(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn same_account_update_is_one_adjustment() {
        let deltas = plan_update(&stored(1, 100), 1, Decimal::from(40));
        assert_eq!(deltas, vec![BalanceDelta::adjust(1, Decimal::from(-60))]);
    }

    #[test]
    fn reassignment_detaches_then_attaches() {
        let deltas = plan_update(&stored(1, 100), 2, Decimal::from(40));
        assert_eq!(
            deltas,
            vec![
                BalanceDelta {
                    account_id: 1,
                    amount: Decimal::from(-100),
                    count: -1
                },
                BalanceDelta {
                    account_id: 2,
                    amount: Decimal::from(40),
                    count: 1
                },
            ]
        );
    }

    #[test]
    fn apply_delta_refuses_negative_count() {
        let conn = db::open_in_memory().unwrap();
        let id = accounts::insert_account(&conn, "alice", "Cash", "", Decimal::ZERO).unwrap();
        let err = apply_delta(&conn, &BalanceDelta::detach(id, Decimal::ONE)).unwrap_err();
        assert!(matches!(err, LedgerError::Inconsistent(_)));

        let untouched = accounts::get_account(&conn, id).unwrap().unwrap();
        assert_eq!(untouched.balance, Decimal::ZERO);
    }

    #[test]
    fn apply_delta_on_missing_account_is_none() {
        let conn = db::open_in_memory().unwrap();
        let res = apply_delta(&conn, &BalanceDelta::attach(99, Decimal::ONE)).unwrap();
        assert!(res.is_none());
    }
}
