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

//! Transaction store.
//!
//! The [`Store`] owns the authoritative list of transactions and is the only
//! way to change it. Every mutation is persisted to the durable slot
//! [`TRANSACTIONS_KEY`] before it becomes visible in memory, so a failed write
//! leaves the store exactly as it was.
//!
//! # Example
//!
//! ```
//! use expense_tracker_rs::{MemoryStorage, RawFields, Store, query};
//! use rust_decimal_macros::dec;
//!
//! let mut store = Store::open(MemoryStorage::new());
//! store
//!     .upsert(RawFields::new("expense", "2024-01-15", "Groceries", "Food", "50"))
//!     .unwrap();
//!
//! let summary = query::summarize(store.list());
//! assert_eq!(summary.net, dec!(-50));
//! ```

use crate::base::TransactionId;
use crate::codec;
use crate::error::StoreError;
use crate::storage::Storage;
use crate::transaction::{RawFields, Transaction};
use std::collections::HashSet;
use tracing::{debug, info, warn};

/// Name of the slot holding the serialized transaction list.
pub const TRANSACTIONS_KEY: &str = "transactions";

/// In-memory transaction list backed by a durable slot.
///
/// # Invariants
///
/// - At most one transaction per ID.
/// - The slot always holds the list as of the last successful mutation.
#[derive(Debug)]
pub struct Store<S: Storage> {
    storage: S,
    transactions: Vec<Transaction>,
}

impl<S: Storage> Store<S> {
    /// Loads the transaction list from `storage`.
    ///
    /// A missing, unreadable or corrupt slot yields an empty store: there is
    /// no earlier session worth failing for.
    pub fn open(storage: S) -> Self {
        let transactions = match storage.read(TRANSACTIONS_KEY) {
            Ok(Some(text)) => match codec::import(&text) {
                Ok(transactions) if has_unique_ids(&transactions) => transactions,
                Ok(_) => {
                    warn!("Slot '{}' holds duplicate IDs, starting empty", TRANSACTIONS_KEY);
                    Vec::new()
                }
                Err(e) => {
                    warn!("Slot '{}' is corrupt ({}), starting empty", TRANSACTIONS_KEY, e);
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!("Could not read slot '{}' ({}), starting empty", TRANSACTIONS_KEY, e);
                Vec::new()
            }
        };

        debug!("Loaded {} transactions", transactions.len());
        Self {
            storage,
            transactions,
        }
    }

    /// All transactions in insertion order.
    pub fn list(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn get(&self, id: &TransactionId) -> Option<&Transaction> {
        self.transactions.iter().find(|tx| tx.id() == id)
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Validates `fields` and inserts or replaces the record.
    ///
    /// A supplied ID that matches an existing record replaces it in place;
    /// anything else is appended under the supplied or a freshly minted ID.
    ///
    /// # Errors
    ///
    /// - [`StoreError::Validation`] - A field is missing or invalid.
    /// - [`StoreError::Persistence`] - The slot could not be written.
    pub fn upsert(&mut self, fields: RawFields) -> Result<Transaction, StoreError> {
        let transaction = fields.validate()?;

        let mut next = self.transactions.clone();
        match next.iter().position(|tx| tx.id() == transaction.id()) {
            Some(index) => {
                debug!("Replacing transaction {}", transaction.id());
                next[index] = transaction.clone();
            }
            None => {
                debug!("Adding transaction {}", transaction.id());
                next.push(transaction.clone());
            }
        }

        self.commit(next)?;
        Ok(transaction)
    }

    /// Removes the record with `id`. Returns whether one was removed.
    ///
    /// An unknown ID is not an error.
    pub fn delete(&mut self, id: &TransactionId) -> Result<bool, StoreError> {
        let next: Vec<Transaction> = self
            .transactions
            .iter()
            .filter(|tx| tx.id() != id)
            .cloned()
            .collect();
        let removed = next.len() != self.transactions.len();

        self.commit(next)?;
        debug!("Delete {}: removed={}", id, removed);
        Ok(removed)
    }

    /// Removes every record. Callers are expected to confirm with the user
    /// first; the store does not.
    pub fn clear(&mut self) -> Result<(), StoreError> {
        let count = self.transactions.len();
        self.commit(Vec::new())?;
        info!("Cleared {} transactions", count);
        Ok(())
    }

    /// Swaps in a whole new list.
    ///
    /// # Errors
    ///
    /// - [`StoreError::DuplicateId`] - Two records share an ID.
    /// - [`StoreError::Persistence`] - The slot could not be written.
    pub fn replace_all(&mut self, transactions: Vec<Transaction>) -> Result<(), StoreError> {
        let mut seen = HashSet::new();
        if let Some(duplicate) = transactions.iter().find(|tx| !seen.insert(tx.id())) {
            return Err(StoreError::DuplicateId(duplicate.id().clone()));
        }

        self.commit(transactions)
    }

    /// Parses exported JSON and replaces the whole list with it.
    /// Returns the number of records imported.
    pub fn import(&mut self, text: &str) -> Result<usize, StoreError> {
        let transactions = codec::import(text)?;
        let count = transactions.len();
        self.replace_all(transactions)?;
        info!("Imported {} transactions", count);
        Ok(count)
    }

    /// Pretty JSON of the full list.
    pub fn export(&self) -> Result<String, StoreError> {
        Ok(codec::export(&self.transactions)?)
    }

    fn commit(&mut self, next: Vec<Transaction>) -> Result<(), StoreError> {
        let payload = codec::encode(&next)?;
        self.storage
            .write(TRANSACTIONS_KEY, &payload)
            .map_err(|source| StoreError::Persistence {
                key: TRANSACTIONS_KEY,
                source,
            })?;
        self.transactions = next;
        Ok(())
    }
}

fn has_unique_ids(transactions: &[Transaction]) -> bool {
    let mut seen = HashSet::new();
    transactions.iter().all(|tx| seen.insert(tx.id()))
}
