// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2025 Daniel Negri
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Transaction records and their validation.
//!
//! A [`Transaction`] can only be built by validating a [`RawFields`], so every
//! value of the type already satisfies the record invariants: all five
//! business fields present, text trimmed and non-empty, amount strictly
//! positive.
//!
//! # Example
//!
//! ```
//! use expense_tracker_rs::{RawFields, TransactionKind};
//! use rust_decimal_macros::dec;
//!
//! let fields = RawFields::new("expense", "2024-01-15", "Groceries", "Food", "50");
//! let transaction = fields.validate().unwrap();
//! assert_eq!(transaction.kind(), TransactionKind::Expense);
//! assert_eq!(transaction.signed_amount(), dec!(-50));
//! ```

use crate::base::TransactionId;
use crate::error::{Field, FieldErrors};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Calendar date format used in forms, files and the persistence slot.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Largest accepted amount.
///
/// Keeps every stored amount, and any sum over a ledger of up to 10^16
/// records, well inside [`Decimal::MAX`], so totals never overflow.
pub const MAX_AMOUNT: Decimal = dec!(1_000_000_000_000);

/// Direction of a transaction. Amounts are always stored positive.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    /// Wire name, as stored in JSON.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Income => f.write_str("Income"),
            Self::Expense => f.write_str("Expense"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown transaction type '{0}' (expected income or expense)")]
pub struct ParseKindError(String);

impl FromStr for TransactionKind {
    type Err = ParseKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("income") {
            Ok(Self::Income)
        } else if s.eq_ignore_ascii_case("expense") {
            Ok(Self::Expense)
        } else {
            Err(ParseKindError(s.to_owned()))
        }
    }
}

/// A validated ledger entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Transaction {
    id: TransactionId,
    #[serde(rename = "type")]
    kind: TransactionKind,
    date: NaiveDate,
    description: String,
    category: String,
    #[serde(serialize_with = "rust_decimal::serde::arbitrary_precision::serialize")]
    amount: Decimal,
}

impl Transaction {
    pub fn id(&self) -> &TransactionId {
        &self.id
    }

    pub fn kind(&self) -> TransactionKind {
        self.kind
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    /// Always in `(0, MAX_AMOUNT]`.
    pub fn amount(&self) -> Decimal {
        self.amount
    }

    /// Amount with the sign implied by the kind: negative for expenses.
    pub fn signed_amount(&self) -> Decimal {
        match self.kind {
            TransactionKind::Income => self.amount,
            TransactionKind::Expense => -self.amount,
        }
    }

    /// Converts back to form input, keeping the ID so that a later
    /// [`RawFields::validate`] replaces this record instead of adding one.
    pub fn to_raw_fields(&self) -> RawFields {
        RawFields {
            id: Some(self.id.to_string()),
            kind: Some(self.kind.as_str().to_owned()),
            date: Some(self.date.format(DATE_FORMAT).to_string()),
            description: Some(self.description.clone()),
            category: Some(self.category.clone()),
            amount: Some(self.amount.to_string()),
        }
    }
}

/// Unvalidated transaction input, as typed into a form or read from a file.
///
/// `None` and blank strings are both treated as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawFields {
    /// Set when editing an existing record.
    pub id: Option<String>,
    pub kind: Option<String>,
    pub date: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub amount: Option<String>,
}

impl RawFields {
    /// Fields for a new record (no ID).
    pub fn new(
        kind: impl Into<String>,
        date: impl Into<String>,
        description: impl Into<String>,
        category: impl Into<String>,
        amount: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            kind: Some(kind.into()),
            date: Some(date.into()),
            description: Some(description.into()),
            category: Some(category.into()),
            amount: Some(amount.into()),
        }
    }

    /// Targets the record with `id`.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Checks every field and builds a [`Transaction`].
    ///
    /// All failing fields are reported together. When no ID was supplied a
    /// fresh one is minted.
    ///
    /// # Errors
    ///
    /// Returns [`FieldErrors`] naming each field that is missing or invalid.
    pub fn validate(&self) -> Result<Transaction, FieldErrors> {
        let mut errors = FieldErrors::new();

        let kind = present(&self.kind).and_then(|s| s.parse::<TransactionKind>().ok());
        if kind.is_none() {
            errors.insert(Field::Type, "Select type");
        }

        let date = match present(&self.date) {
            None => {
                errors.insert(Field::Date, "Pick a date");
                None
            }
            Some(text) => {
                let parsed = NaiveDate::parse_from_str(text, DATE_FORMAT).ok();
                if parsed.is_none() {
                    errors.insert(Field::Date, "Enter a date as YYYY-MM-DD");
                }
                parsed
            }
        };

        let description = present(&self.description);
        if description.is_none() {
            errors.insert(Field::Description, "Enter description");
        }

        let category = present(&self.category);
        if category.is_none() {
            errors.insert(Field::Category, "Select category");
        }

        let amount = match present(&self.amount).and_then(parse_amount) {
            Some(amount) if amount > MAX_AMOUNT => {
                errors.insert(Field::Amount, "Enter amount up to 1,000,000,000,000");
                None
            }
            Some(amount) if amount > Decimal::ZERO => Some(amount),
            _ => {
                errors.insert(Field::Amount, "Enter amount > 0");
                None
            }
        };

        match (kind, date, description, category, amount) {
            (Some(kind), Some(date), Some(description), Some(category), Some(amount)) => {
                let id = present(&self.id)
                    .map(TransactionId::from)
                    .unwrap_or_else(TransactionId::generate);
                Ok(Transaction {
                    id,
                    kind,
                    date,
                    description: description.to_owned(),
                    category: category.to_owned(),
                    amount: amount.normalize(),
                })
            }
            _ => Err(errors),
        }
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Accepts plain (`12.50`) and scientific (`1.25e1`) notation.
fn parse_amount(text: &str) -> Option<Decimal> {
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn groceries() -> RawFields {
        RawFields::new("expense", "2024-01-15", "Groceries", "Food", "50")
    }

    #[test]
    fn valid_fields_produce_transaction() {
        let tx = groceries().validate().unwrap();
        assert_eq!(tx.kind(), TransactionKind::Expense);
        assert_eq!(tx.date(), NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
        assert_eq!(tx.description(), "Groceries");
        assert_eq!(tx.category(), "Food");
        assert_eq!(tx.amount(), dec!(50));
    }

    #[test]
    fn text_fields_are_trimmed() {
        let fields = RawFields::new(" Income ", "2024-02-01", "  Salary  ", " Work ", " 1200.50 ");
        let tx = fields.validate().unwrap();
        assert_eq!(tx.kind(), TransactionKind::Income);
        assert_eq!(tx.description(), "Salary");
        assert_eq!(tx.category(), "Work");
        assert_eq!(tx.amount(), dec!(1200.5));
    }

    #[test]
    fn missing_id_mints_one_and_supplied_id_is_kept() {
        let minted = groceries().validate().unwrap();
        assert!(!minted.id().as_str().is_empty());

        let kept = groceries().with_id("abc").validate().unwrap();
        assert_eq!(kept.id().as_str(), "abc");

        let blank = groceries().with_id("   ").validate().unwrap();
        assert_ne!(blank.id().as_str().trim(), "");
    }

    #[test]
    fn all_errors_are_collected() {
        let errors = RawFields::default().validate().unwrap_err();
        assert_eq!(errors.len(), 5);
        assert_eq!(errors.get(Field::Type), Some("Select type"));
        assert_eq!(errors.get(Field::Date), Some("Pick a date"));
        assert_eq!(errors.get(Field::Description), Some("Enter description"));
        assert_eq!(errors.get(Field::Category), Some("Select category"));
        assert_eq!(errors.get(Field::Amount), Some("Enter amount > 0"));
    }

    #[test]
    fn whitespace_only_description_is_rejected() {
        let mut fields = groceries();
        fields.description = Some("   ".to_string());
        let errors = fields.validate().unwrap_err();
        assert!(errors.contains(Field::Description));
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn unknown_type_is_rejected() {
        let mut fields = groceries();
        fields.kind = Some("transfer".to_string());
        let errors = fields.validate().unwrap_err();
        assert!(errors.contains(Field::Type));
    }

    #[test]
    fn unparseable_date_is_rejected() {
        let mut fields = groceries();
        fields.date = Some("15/01/2024".to_string());
        let errors = fields.validate().unwrap_err();
        assert_eq!(errors.get(Field::Date), Some("Enter a date as YYYY-MM-DD"));

        fields.date = Some("2024-02-30".to_string());
        assert!(fields.validate().unwrap_err().contains(Field::Date));
    }

    #[test]
    fn non_positive_or_non_numeric_amounts_are_rejected() {
        for amount in ["0", "-5", "0.00", "abc", "NaN", "inf", ""] {
            let mut fields = groceries();
            fields.amount = Some(amount.to_string());
            let errors = fields.validate().unwrap_err();
            assert!(errors.contains(Field::Amount), "accepted amount {amount:?}");
        }
    }

    #[test]
    fn amounts_above_cap_are_rejected() {
        for amount in ["1000000000000.01", "79228162514264337593543950335", "5e28"] {
            let mut fields = groceries();
            fields.amount = Some(amount.to_string());
            let errors = fields.validate().unwrap_err();
            assert_eq!(
                errors.get(Field::Amount),
                Some("Enter amount up to 1,000,000,000,000"),
                "accepted amount {amount:?}"
            );
        }
    }

    #[test]
    fn amount_at_cap_is_accepted() {
        let mut fields = groceries();
        fields.amount = Some("1000000000000".to_string());
        assert_eq!(fields.validate().unwrap().amount(), MAX_AMOUNT);
    }

    #[test]
    fn high_precision_amount_is_kept_exactly() {
        let mut fields = groceries();
        fields.amount = Some("1234567890.123456789".to_string());
        assert_eq!(fields.validate().unwrap().amount(), dec!(1234567890.123456789));
    }

    #[test]
    fn scientific_amounts_are_accepted() {
        let mut fields = groceries();
        fields.amount = Some("1.5e2".to_string());
        assert_eq!(fields.validate().unwrap().amount(), dec!(150));
    }

    #[test]
    fn signed_amount_follows_kind() {
        let expense = groceries().validate().unwrap();
        assert_eq!(expense.signed_amount(), dec!(-50));

        let income = RawFields::new("income", "2024-01-01", "Salary", "Work", "10")
            .validate()
            .unwrap();
        assert_eq!(income.signed_amount(), dec!(10));
    }

    #[test]
    fn raw_fields_round_trip_keeps_id() {
        let tx = groceries().validate().unwrap();
        let again = tx.to_raw_fields().validate().unwrap();
        assert_eq!(tx, again);
    }

    #[test]
    fn kind_parses_case_insensitively() {
        assert_eq!("EXPENSE".parse::<TransactionKind>(), Ok(TransactionKind::Expense));
        assert_eq!("income".parse::<TransactionKind>(), Ok(TransactionKind::Income));
        assert!("refund".parse::<TransactionKind>().is_err());
    }

    #[test]
    fn amount_serializes_as_exact_json_number() {
        let mut fields = groceries();
        fields.amount = Some("1234567890.123456789".to_string());
        let json = serde_json::to_string(&fields.validate().unwrap()).unwrap();
        assert!(json.contains(r#""amount":1234567890.123456789"#), "{json}");
    }

    #[test]
    fn serializes_with_wire_field_names() {
        let tx = groceries().with_id("t1").validate().unwrap();
        let json = serde_json::to_value(&tx).unwrap();
        assert_eq!(json["id"], "t1");
        assert_eq!(json["type"], "expense");
        assert_eq!(json["date"], "2024-01-15");
        assert_eq!(json["description"], "Groceries");
        assert_eq!(json["category"], "Food");
        assert_eq!(json["amount"].to_string(), "50");
    }
}
