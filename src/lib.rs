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

//! # Expense Tracker
//!
//! This library provides the core of a single-user income and expense ledger:
//! a validated transaction store with durable persistence, a query layer for
//! filtering, summaries and category breakdowns, and a JSON import/export
//! codec.
//!
//! ## Core Components
//!
//! - [`Store`]: Owns the transaction list and persists it on every change
//! - [`RawFields`]: Unvalidated form input, turned into a [`Transaction`] by validation
//! - [`query`]: Filtering, display ordering, totals and per-category breakdowns
//! - [`codec`]: JSON export and wholesale-or-nothing import
//! - [`Storage`]: The durable slot behind the store ([`FileStorage`], [`MemoryStorage`])
//!
//! ## Example
//!
//! ```
//! use expense_tracker_rs::query::{self, Filter};
//! use expense_tracker_rs::{MemoryStorage, RawFields, Store};
//! use rust_decimal_macros::dec;
//!
//! let mut store = Store::open(MemoryStorage::new());
//! store
//!     .upsert(RawFields::new("income", "2024-01-01", "Salary", "Work", "1000"))
//!     .unwrap();
//! store
//!     .upsert(RawFields::new("expense", "2024-01-15", "Groceries", "Food", "50"))
//!     .unwrap();
//!
//! // The summary covers everything, the table only what the filter lets through.
//! let summary = query::summarize(store.list());
//! assert_eq!(summary.net, dec!(950));
//!
//! let filter = Filter { search: "groc".to_string(), ..Filter::all() };
//! let rows = query::sort_for_display(query::filter(store.list(), &filter));
//! assert_eq!(rows.len(), 1);
//! ```

mod base;
pub mod codec;
pub mod error;
pub mod format;
pub mod query;
pub mod storage;
mod store;
mod transaction;

pub use base::TransactionId;
pub use error::{Field, FieldErrors, ImportError, StoreError};
pub use storage::{FileStorage, MemoryStorage, Storage};
pub use store::{Store, TRANSACTIONS_KEY};
pub use transaction::{DATE_FORMAT, MAX_AMOUNT, ParseKindError, RawFields, Transaction, TransactionKind};
