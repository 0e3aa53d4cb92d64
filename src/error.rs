// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Error taxonomy for ledger mutations and reports.
//!
//! Every mutating operation runs inside a single SQLite write transaction,
//! so any `LedgerError` returned from a mutation means nothing was changed.

use std::fmt;

use thiserror::Error;

/// Which kind of record an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Transaction,
    Account,
    Category,
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Entity::Transaction => "transaction",
            Entity::Account => "account",
            Entity::Category => "category",
        };
        f.write_str(s)
    }
}

/// Coarse classification of a [`LedgerError`], stable for callers that map
/// errors onto status codes or exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    NotFound,
    Unauthorized,
    Inconsistent,
    Unavailable,
}

#[derive(Debug, Error)]
pub enum LedgerError {
    /// Missing or malformed input field.
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("{entity} {id} not found")]
    NotFound { entity: Entity, id: i64 },

    /// The record exists but belongs to another user.
    #[error("{entity} {id} belongs to another user")]
    Unauthorized { entity: Entity, id: i64 },

    /// A batch contained records owned by other users; the batch was rejected as a whole.
    #[error("Batch rejected: transactions {ids:?} belong to another user")]
    UnauthorizedBatch { ids: Vec<i64> },

    /// Cached account state disagrees with what the operation requires.
    #[error("Inconsistent ledger state: {0}")]
    Inconsistent(String),

    #[error("Store unavailable: {0}")]
    Unavailable(#[from] rusqlite::Error),
}

impl LedgerError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            LedgerError::Validation(_) => ErrorKind::Validation,
            LedgerError::NotFound { .. } => ErrorKind::NotFound,
            LedgerError::Unauthorized { .. } | LedgerError::UnauthorizedBatch { .. } => {
                ErrorKind::Unauthorized
            }
            LedgerError::Inconsistent(_) => ErrorKind::Inconsistent,
            LedgerError::Unavailable(_) => ErrorKind::Unavailable,
        }
    }

    pub fn not_found(entity: Entity, id: i64) -> Self {
        LedgerError::NotFound { entity, id }
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        LedgerError::Validation(msg.into())
    }
}

pub type LedgerResult<T> = Result<T, LedgerError>;
