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

//! Error types for validation, import and persistence.

use crate::base::TransactionId;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::io;
use thiserror::Error;

/// A business field of a transaction, as named in forms and files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Type,
    Date,
    Description,
    Category,
    Amount,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Type => "type",
            Self::Date => "date",
            Self::Description => "description",
            Self::Category => "category",
            Self::Amount => "amount",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Every field that failed validation, mapped to a human-readable message.
///
/// Returned (never panicked) by validation so a form can be re-rendered with
/// all of its errors at once.
#[derive(Error, Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[error("{}", describe(.0))]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<Field, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a message for `field`, replacing any earlier one.
    pub fn insert(&mut self, field: Field, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn contains(&self, field: Field) -> bool {
        self.0.contains_key(&field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.0.iter().map(|(field, message)| (*field, message.as_str()))
    }
}

fn describe(errors: &BTreeMap<Field, String>) -> String {
    errors
        .iter()
        .map(|(field, message)| format!("{field}: {message}"))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Structural problems with imported JSON.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ImportError {
    /// Input is not valid JSON
    #[error("malformed JSON: {0}")]
    Malformed(String),

    /// Top-level value is not an array
    #[error("not an array")]
    NotAnArray,

    /// An element is missing fields or holds values of the wrong kind
    #[error("invalid record at index {index}: {reason}")]
    InvalidRecord { index: usize, reason: String },
}

/// Store operation errors.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Submitted fields failed validation; nothing was written
    #[error("invalid transaction: {0}")]
    Validation(#[from] FieldErrors),

    /// Imported data was rejected; nothing was written
    #[error("could not import: {0}")]
    Import(#[from] ImportError),

    /// A replacement list holds the same ID twice
    #[error("duplicate transaction ID {0}")]
    DuplicateId(TransactionId),

    /// The transaction list could not be serialized
    #[error("failed to encode transactions: {0}")]
    Encode(#[from] serde_json::Error),

    /// The durable slot could not be written
    #[error("failed to persist '{key}': {source}")]
    Persistence {
        key: &'static str,
        #[source]
        source: io::Error,
    },
}
