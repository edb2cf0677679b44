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

//! JSON import and export.
//!
//! Export writes the transaction list as a bare JSON array of objects with the
//! fields `id`, `type`, `date`, `description`, `category` and `amount`. Import
//! accepts the same shape and rejects the whole input if any element is off:
//! there is no partial import.
//!
//! Besides the structural check (fields present, `amount` numeric), every
//! imported element goes through [`RawFields::validate`], so imported records
//! obey the same rules as records entered by hand.

use crate::error::ImportError;
use crate::transaction::{DATE_FORMAT, RawFields, Transaction};
use chrono::NaiveDate;
use serde_json::{Map, Value};

/// Pretty-printed JSON array, suitable for a file a person may diff.
pub fn export(transactions: &[Transaction]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(transactions)
}

/// Compact JSON array, as written to the persistence slot.
pub fn encode(transactions: &[Transaction]) -> serde_json::Result<String> {
    serde_json::to_string(transactions)
}

/// `transactions-<YYYY-MM-DD>.json`
pub fn export_file_name(date: NaiveDate) -> String {
    format!("transactions-{}.json", date.format(DATE_FORMAT))
}

/// Parses exported JSON back into transactions.
///
/// # Errors
///
/// - [`ImportError::Malformed`] - Input is not JSON.
/// - [`ImportError::NotAnArray`] - Top-level value is not an array.
/// - [`ImportError::InvalidRecord`] - First offending element and why.
pub fn import(text: &str) -> Result<Vec<Transaction>, ImportError> {
    let value: Value =
        serde_json::from_str(text).map_err(|e| ImportError::Malformed(e.to_string()))?;
    let Value::Array(items) = value else {
        return Err(ImportError::NotAnArray);
    };

    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            decode_record(item).map_err(|reason| ImportError::InvalidRecord { index, reason })
        })
        .collect()
}

fn decode_record(item: &Value) -> Result<Transaction, String> {
    let Value::Object(object) = item else {
        return Err("expected an object".to_string());
    };

    let amount = match object.get("amount") {
        // Exact source digits; numbers are never routed through f64.
        Some(Value::Number(number)) => number.to_string(),
        Some(_) => return Err("field `amount` must be a number".to_string()),
        None => return Err("missing field `amount`".to_string()),
    };

    let fields = RawFields {
        id: Some(required_text(object, "id")?),
        kind: Some(required_text(object, "type")?),
        date: Some(required_text(object, "date")?),
        description: Some(required_text(object, "description")?),
        category: Some(required_text(object, "category")?),
        amount: Some(amount),
    };

    fields.validate().map_err(|errors| errors.to_string())
}

fn required_text(object: &Map<String, Value>, name: &str) -> Result<String, String> {
    match object.get(name) {
        Some(Value::String(text)) if !text.trim().is_empty() => Ok(text.clone()),
        Some(Value::String(_)) | Some(Value::Null) | None => Err(format!("missing field `{name}`")),
        Some(_) => Err(format!("field `{name}` must be a string")),
    }
}
