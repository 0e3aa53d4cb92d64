// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{LedgerError, LedgerResult};

pub const TITLE_MAX_CHARS: usize = 50;
pub const DESCRIPTION_MAX_CHARS: usize = 50;
/// Largest magnitude a single transaction may carry.
pub const AMOUNT_LIMIT: i64 = 9_999_999;
/// Largest magnitude an account's opening balance may carry.
pub const OPENING_BALANCE_LIMIT: i64 = 999_999_999_999;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionType {
    Expense,
    Income,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Expense => "Expense",
            TransactionType::Income => "Income",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "expense" => Ok(TransactionType::Expense),
            "income" => Ok(TransactionType::Income),
            other => Err(LedgerError::validation(format!(
                "unknown transaction type '{}', expected Expense or Income",
                other
            ))),
        }
    }
}

impl ToSql for TransactionType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for TransactionType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|e| FromSqlError::Other(Box::new(e)))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: i64,
    pub owner_id: String,
    pub title: String,
    pub icon: String,
    pub opening_balance: Decimal,
    pub balance: Decimal,
    pub transaction_count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub owner_id: String,
    pub title: String,
    pub icon: String,
    pub color: String,
    pub is_income: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub owner_id: String,
    pub title: String,
    pub description: String,
    pub amount: Decimal,
    pub r#type: TransactionType,
    pub is_income: bool,
    pub account_id: i64,
    pub category_id: i64,
    pub date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

/// A transaction joined with the records it references. Either side may be
/// missing when the account or category was removed after the fact.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PopulatedTransaction {
    #[serde(flatten)]
    pub transaction: Transaction,
    pub account_title: Option<String>,
    pub category: Option<Category>,
}

/// User-supplied fields for creating or replacing a transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionDraft {
    pub title: String,
    pub description: String,
    pub amount: Decimal,
    pub r#type: TransactionType,
    pub account_id: i64,
    pub category_id: i64,
    pub date: NaiveDate,
}

impl TransactionDraft {
    /// Trims text fields and checks lengths, amount bounds, and that the
    /// sign of `amount` agrees with `type`.
    pub fn validated(mut self) -> LedgerResult<Self> {
        self.title = self.title.trim().to_string();
        self.description = self.description.trim().to_string();
        check_text("title", &self.title, TITLE_MAX_CHARS)?;
        check_text("description", &self.description, DESCRIPTION_MAX_CHARS)?;

        if self.amount.abs() > Decimal::from(AMOUNT_LIMIT) {
            return Err(LedgerError::validation(format!(
                "amount {} exceeds the limit of {}",
                self.amount, AMOUNT_LIMIT
            )));
        }
        match self.r#type {
            TransactionType::Expense if self.amount.is_sign_positive() && !self.amount.is_zero() => {
                return Err(LedgerError::validation(format!(
                    "expense amount must not be positive (got {})",
                    self.amount
                )));
            }
            TransactionType::Income if self.amount.is_sign_negative() && !self.amount.is_zero() => {
                return Err(LedgerError::validation(format!(
                    "income amount must not be negative (got {})",
                    self.amount
                )));
            }
            _ => {}
        }
        Ok(self)
    }

    pub fn is_income(&self) -> bool {
        self.r#type == TransactionType::Income
    }
}

fn check_text(field: &str, value: &str, max: usize) -> LedgerResult<()> {
    let len = value.chars().count();
    if len == 0 {
        return Err(LedgerError::validation(format!("{} is required", field)));
    }
    if len > max {
        return Err(LedgerError::validation(format!(
            "{} must be at most {} characters",
            field, max
        )));
    }
    Ok(())
}

/// Checks an account's opening balance against [`OPENING_BALANCE_LIMIT`].
pub fn check_opening_balance(opening: Decimal) -> LedgerResult<Decimal> {
    if opening.abs() > Decimal::from(OPENING_BALANCE_LIMIT) {
        return Err(LedgerError::validation(format!(
            "opening balance {} exceeds the limit of {}",
            opening, OPENING_BALANCE_LIMIT
        )));
    }
    Ok(opening)
}

/// Parses a money amount supplied as text.
pub fn parse_amount(s: &str) -> LedgerResult<Decimal> {
    s.trim()
        .parse::<Decimal>()
        .map_err(|_| LedgerError::validation(format!("amount '{}' is not a number", s.trim())))
}

/// Inclusive reporting window by calendar day. Either bound may be open;
/// both open means all time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Period {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl Period {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> LedgerResult<Self> {
        if let (Some(s), Some(e)) = (start, end) {
            if s > e {
                return Err(LedgerError::validation(format!(
                    "period start {} is after end {}",
                    s, e
                )));
            }
        }
        Ok(Period { start, end })
    }

    pub fn all_time() -> Self {
        Period::default()
    }

    pub fn is_all_time(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    /// `end` covers its whole day, so a date equal to `end` is inside.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start.is_none_or(|s| date >= s) && self.end.is_none_or(|e| date <= e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> TransactionDraft {
        TransactionDraft {
            title: "  Groceries ".into(),
            description: "weekly shop".into(),
            amount: Decimal::new(-4550, 2),
            r#type: TransactionType::Expense,
            account_id: 1,
            category_id: 1,
            date: NaiveDate::from_ymd_opt(2025, 3, 14).unwrap(),
        }
    }

    #[test]
    fn validated_trims_title() {
        let d = draft().validated().unwrap();
        assert_eq!(d.title, "Groceries");
    }

    #[test]
    fn rejects_blank_and_long_text() {
        let mut d = draft();
        d.title = "   ".into();
        assert!(d.validated().is_err());

        let mut d = draft();
        d.description = "x".repeat(51);
        assert!(d.validated().is_err());

        let mut d = draft();
        d.description = "é".repeat(50);
        assert!(d.validated().is_ok());
    }

    #[test]
    fn sign_must_match_type() {
        let mut d = draft();
        d.amount = Decimal::new(10, 0);
        assert!(d.validated().is_err());

        let mut d = draft();
        d.r#type = TransactionType::Income;
        assert!(d.validated().is_err());

        let mut d = draft();
        d.amount = Decimal::ZERO;
        assert!(d.validated().is_ok());
    }

    #[test]
    fn amount_bound() {
        let mut d = draft();
        d.amount = Decimal::from(-10_000_000);
        assert!(d.validated().is_err());
    }

    #[test]
    fn opening_balance_bound() {
        let limit = Decimal::from(OPENING_BALANCE_LIMIT);
        assert!(check_opening_balance(-limit).is_ok());
        assert!(check_opening_balance(limit + Decimal::ONE).is_err());
        assert!(check_opening_balance(Decimal::from_i128_with_scale(
            50_000_000_000_000_000_000_000_000_000,
            0
        )).is_err());
    }

    #[test]
    fn parse_amount_rejects_words() {
        assert!(parse_amount("ten").is_err());
        assert_eq!(parse_amount(" -12.30 ").unwrap(), Decimal::new(-1230, 2));
    }

    #[test]
    fn transaction_type_parses_case_insensitively() {
        assert_eq!("income".parse::<TransactionType>().unwrap(), TransactionType::Income);
        assert_eq!("Expense".parse::<TransactionType>().unwrap(), TransactionType::Expense);
        assert!("transfer".parse::<TransactionType>().is_err());
    }

    #[test]
    fn period_end_is_inclusive() {
        let d = |day| NaiveDate::from_ymd_opt(2025, 1, day).unwrap();
        let p = Period::new(Some(d(1)), Some(d(31))).unwrap();
        assert!(p.contains(d(31)));
        assert!(p.contains(d(1)));
        assert!(!p.contains(NaiveDate::from_ymd_opt(2025, 2, 1).unwrap()));
        assert!(Period::all_time().contains(d(5)));
        assert!(Period::new(Some(d(5)), Some(d(4))).is_err());
    }
}
