// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Ownership checks run before any mutation.
//!
//! Single-record operations use [`verify_owner`]. Batches use
//! [`ensure_batch_owned`], which rejects the whole batch and names the
//! offending ids rather than quietly dropping them.

use rusqlite::Connection;

use crate::error::{Entity, LedgerError, LedgerResult};
use crate::models::{Account, Category, Transaction};
use crate::store::ledger;

/// Records that belong to exactly one user.
pub trait Owned {
    const ENTITY: Entity;

    fn owner_id(&self) -> &str;
}

impl Owned for Transaction {
    const ENTITY: Entity = Entity::Transaction;

    fn owner_id(&self) -> &str {
        &self.owner_id
    }
}

impl Owned for Account {
    const ENTITY: Entity = Entity::Account;

    fn owner_id(&self) -> &str {
        &self.owner_id
    }
}

impl Owned for Category {
    const ENTITY: Entity = Entity::Category;

    fn owner_id(&self) -> &str {
        &self.owner_id
    }
}

/// `NotFound` when the lookup came back empty, `Unauthorized` when the record
/// belongs to someone else.
pub fn verify_owner<T: Owned>(entity: Option<T>, id: i64, requester: &str) -> LedgerResult<T> {
    let entity = entity.ok_or(LedgerError::NotFound {
        entity: T::ENTITY,
        id,
    })?;
    if entity.owner_id() != requester {
        let kind = T::ENTITY;
        tracing::warn!(entity = %kind, id, requester, "ownership check failed");
        return Err(LedgerError::Unauthorized {
            entity: T::ENTITY,
            id,
        });
    }
    Ok(entity)
}

/// Like [`verify_owner`], but reports another user's record as missing so
/// callers cannot probe for ids they do not own. Used for references such as
/// the account or category a transaction points at.
pub fn resolve_owned<T: Owned>(entity: Option<T>, id: i64, requester: &str) -> LedgerResult<T> {
    match entity {
        Some(e) if e.owner_id() == requester => Ok(e),
        _ => Err(LedgerError::not_found(T::ENTITY, id)),
    }
}

/// Subset of `ids` that exist and belong to other users.
pub fn filter_unauthorized(
    conn: &Connection,
    ids: &[i64],
    requester: &str,
) -> LedgerResult<Vec<i64>> {
    Ok(ledger::foreign_owned_ids(conn, ids, requester)?)
}

pub fn ensure_batch_owned(conn: &Connection, ids: &[i64], requester: &str) -> LedgerResult<()> {
    let foreign = filter_unauthorized(conn, ids, requester)?;
    if foreign.is_empty() {
        return Ok(());
    }
    tracing::warn!(?foreign, requester, "batch rejected: foreign transactions");
    Err(LedgerError::UnauthorizedBatch { ids: foreign })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use rust_decimal::Decimal;

    fn account(owner: &str) -> Account {
        Account {
            id: 3,
            owner_id: owner.into(),
            title: "Cash".into(),
            icon: String::new(),
            opening_balance: Decimal::ZERO,
            balance: Decimal::ZERO,
            transaction_count: 0,
        }
    }

    #[test]
    fn verify_owner_distinguishes_missing_and_foreign() {
        let missing = verify_owner::<Account>(None, 3, "alice").unwrap_err();
        assert_eq!(missing.kind(), ErrorKind::NotFound);

        let foreign = verify_owner(Some(account("bob")), 3, "alice").unwrap_err();
        assert_eq!(foreign.kind(), ErrorKind::Unauthorized);

        assert!(verify_owner(Some(account("alice")), 3, "alice").is_ok());
    }

    #[test]
    fn resolve_owned_hides_foreign_records() {
        let err = resolve_owned(Some(account("bob")), 3, "alice").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }
}
