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

//! Store public API integration tests.

use expense_tracker_rs::{
    Field, FileStorage, ImportError, MAX_AMOUNT, MemoryStorage, RawFields, Store, StoreError, TRANSACTIONS_KEY,
    TransactionId, query,
};
use rust_decimal_macros::dec;
use tempfile::TempDir;

fn expense(date: &str, description: &str, category: &str, amount: &str) -> RawFields {
    RawFields::new("expense", date, description, category, amount)
}

fn income(date: &str, description: &str, category: &str, amount: &str) -> RawFields {
    RawFields::new("income", date, description, category, amount)
}

#[test]
fn upsert_appends_new_record() {
    let mut store = Store::open(MemoryStorage::new());
    let tx = store
        .upsert(expense("2024-01-15", "Groceries", "Food", "50"))
        .unwrap();

    assert_eq!(store.list(), &[tx.clone()]);
    assert_eq!(tx.amount(), dec!(50));
}

#[test]
fn groceries_scenario() {
    let mut store = Store::open(MemoryStorage::new());
    store
        .upsert(expense("2024-01-15", "Groceries", "Food", "50"))
        .unwrap();

    let summary = query::summarize(store.list());
    assert_eq!(summary.total_income, dec!(0));
    assert_eq!(summary.total_expense, dec!(50));
    assert_eq!(summary.net, dec!(-50));

    let breakdown = query::aggregate_by_category(store.list());
    assert_eq!(breakdown.len(), 1);
    assert_eq!(breakdown[0].category, "Food");
    assert_eq!(breakdown[0].amount, dec!(50));
}

#[test]
fn upsert_with_existing_id_replaces_in_place() {
    let mut store = Store::open(MemoryStorage::new());
    let first = store
        .upsert(expense("2024-01-10", "Bus", "Transport", "3"))
        .unwrap();
    let second = store
        .upsert(expense("2024-01-11", "Lunch", "Food", "12"))
        .unwrap();

    let edited = store
        .upsert(income("2024-01-12", "Refund", "Transport", "3").with_id(first.id().as_str()))
        .unwrap();

    assert_eq!(edited.id(), first.id());
    assert_eq!(store.list(), &[edited, second]);
}

#[test]
fn upsert_with_unknown_id_appends_under_that_id() {
    let mut store = Store::open(MemoryStorage::new());
    let tx = store
        .upsert(expense("2024-01-10", "Bus", "Transport", "3").with_id("imported-7"))
        .unwrap();

    assert_eq!(tx.id().as_str(), "imported-7");
    assert_eq!(store.list().len(), 1);
}

#[test]
fn invalid_upsert_does_not_mutate() {
    let mut store = Store::open(MemoryStorage::new());
    store
        .upsert(expense("2024-01-10", "Bus", "Transport", "3"))
        .unwrap();
    let before = store.list().to_vec();

    for amount in ["0", "-10", "ten"] {
        let result = store.upsert(expense("2024-01-11", "Lunch", "Food", amount));
        match result {
            Err(StoreError::Validation(errors)) => assert!(errors.contains(Field::Amount)),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    assert_eq!(store.list(), before.as_slice());
}

#[test]
fn delete_removes_record() {
    let mut store = Store::open(MemoryStorage::new());
    let bus = store
        .upsert(expense("2024-01-10", "Bus", "Transport", "3"))
        .unwrap();
    let lunch = store
        .upsert(expense("2024-01-11", "Lunch", "Food", "12"))
        .unwrap();

    assert!(store.delete(bus.id()).unwrap());
    assert_eq!(store.list(), &[lunch]);
}

#[test]
fn delete_unknown_id_is_noop() {
    let mut store = Store::open(MemoryStorage::new());
    store
        .upsert(expense("2024-01-10", "Bus", "Transport", "3"))
        .unwrap();
    let before = store.list().to_vec();

    assert!(!store.delete(&TransactionId::from("missing")).unwrap());
    assert_eq!(store.list(), before.as_slice());
}

#[test]
fn clear_removes_everything_and_persists() {
    let mut store = Store::open(MemoryStorage::new());
    store
        .upsert(expense("2024-01-10", "Bus", "Transport", "3"))
        .unwrap();

    store.clear().unwrap();
    assert!(store.list().is_empty());
    assert_eq!(store.storage().get(TRANSACTIONS_KEY), Some("[]"));
}

#[test]
fn import_replaces_all_records() {
    let mut store = Store::open(MemoryStorage::new());
    store
        .upsert(expense("2024-01-10", "Bus", "Transport", "3"))
        .unwrap();

    let text = r#"[
        {"id": "a", "type": "income", "date": "2024-02-01", "description": "Pay", "category": "Work", "amount": 900},
        {"id": "b", "type": "expense", "date": "2024-02-02", "description": "Rent", "category": "Home", "amount": 400.25}
    ]"#;
    assert_eq!(store.import(text).unwrap(), 2);

    let ids: Vec<_> = store.list().iter().map(|tx| tx.id().as_str()).collect();
    assert_eq!(ids, ["a", "b"]);
    assert_eq!(query::summarize(store.list()).net, dec!(499.75));
}

#[test]
fn rejected_import_leaves_store_unchanged() {
    let mut store = Store::open(MemoryStorage::new());
    store
        .upsert(expense("2024-01-10", "Bus", "Transport", "3"))
        .unwrap();
    let before = store.list().to_vec();
    let slot_before = store.storage().get(TRANSACTIONS_KEY).map(str::to_owned);

    let result = store.import(r#"{"not":"an array"}"#);
    assert!(matches!(
        result,
        Err(StoreError::Import(ImportError::NotAnArray))
    ));

    let partial = r#"[
        {"id": "a", "type": "income", "date": "2024-02-01", "description": "Pay", "category": "Work", "amount": 900},
        {"id": "b", "type": "expense", "date": "2024-02-02", "description": "Rent", "category": "Home"}
    ]"#;
    assert!(matches!(
        store.import(partial),
        Err(StoreError::Import(ImportError::InvalidRecord { index: 1, .. }))
    ));

    assert_eq!(store.list(), before.as_slice());
    assert_eq!(
        store.storage().get(TRANSACTIONS_KEY).map(str::to_owned),
        slot_before
    );
}

#[test]
fn import_with_duplicate_ids_is_rejected() {
    let mut store = Store::open(MemoryStorage::new());
    let text = r#"[
        {"id": "a", "type": "income", "date": "2024-02-01", "description": "Pay", "category": "Work", "amount": 900},
        {"id": "a", "type": "expense", "date": "2024-02-02", "description": "Rent", "category": "Home", "amount": 400}
    ]"#;

    match store.import(text) {
        Err(StoreError::DuplicateId(id)) => assert_eq!(id.as_str(), "a"),
        other => panic!("expected duplicate ID error, got {other:?}"),
    }
    assert!(store.list().is_empty());
}

#[test]
fn file_backed_store_survives_reopen() {
    let temp_dir = TempDir::new().unwrap();

    let tx = {
        let mut store = Store::open(FileStorage::new(temp_dir.path()));
        store
            .upsert(expense("2024-01-15", "Groceries", "Food", "50.75"))
            .unwrap()
    };

    let reopened = Store::open(FileStorage::new(temp_dir.path()));
    assert_eq!(reopened.list(), &[tx]);
}

#[test]
fn corrupt_file_reopens_empty() {
    let temp_dir = TempDir::new().unwrap();
    std::fs::write(temp_dir.path().join("transactions.json"), "not json at all").unwrap();

    let store = Store::open(FileStorage::new(temp_dir.path()));
    assert!(store.list().is_empty());
}

#[test]
fn high_precision_amount_survives_reopen() {
    let mut store = Store::open(MemoryStorage::new());
    let tx = store
        .upsert(expense("2024-01-15", "Bond", "Invest", "1234567890.123456789"))
        .unwrap();
    assert_eq!(tx.amount(), dec!(1234567890.123456789));

    let reopened = Store::open(store.storage().clone());
    assert_eq!(reopened.list(), &[tx]);
}

#[test]
fn amount_at_cap_survives_reopen() {
    let mut store = Store::open(MemoryStorage::new());
    let tx = store
        .upsert(income("2024-01-15", "Windfall", "Luck", &MAX_AMOUNT.to_string()))
        .unwrap();

    let reopened = Store::open(store.storage().clone());
    assert_eq!(reopened.list(), &[tx]);
}

#[test]
fn amount_above_cap_never_reaches_the_slot() {
    let mut store = Store::open(MemoryStorage::new());
    store
        .upsert(expense("2024-01-10", "Bus", "Transport", "3"))
        .unwrap();

    let result = store.upsert(income(
        "2024-01-15",
        "Overflow",
        "Luck",
        "79228162514264337593543950335",
    ));
    assert!(matches!(result, Err(StoreError::Validation(_))));

    let reopened = Store::open(store.storage().clone());
    assert_eq!(reopened.list().len(), 1);
}
