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

//! Filtering, ordering and aggregation over transaction lists.
//!
//! Everything here is a pure function of its input. Filtering and summarizing
//! are deliberately independent: a front end typically lists the filtered
//! subset while summarizing the full set.

use crate::transaction::{Transaction, TransactionKind};
use rust_decimal::Decimal;
use std::borrow::Borrow;

/// Table filter. `None` fields and blank search text match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filter {
    pub kind: Option<TransactionKind>,
    pub category: Option<String>,
    /// Case-insensitive substring of the description.
    pub search: String,
}

impl Filter {
    /// Matches every transaction.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn matches(&self, transaction: &Transaction) -> bool {
        if self.kind.is_some_and(|kind| kind != transaction.kind()) {
            return false;
        }
        if self
            .category
            .as_deref()
            .is_some_and(|category| category != transaction.category())
        {
            return false;
        }

        let needle = self.search.trim().to_lowercase();
        needle.is_empty() || transaction.description().to_lowercase().contains(&needle)
    }
}

/// Transactions matching `filter`, in their original order.
pub fn filter<'a>(transactions: &'a [Transaction], filter: &Filter) -> Vec<&'a Transaction> {
    transactions.iter().filter(|tx| filter.matches(tx)).collect()
}

/// Newest first. Transactions on the same date keep their relative order.
pub fn sort_for_display<T: Borrow<Transaction>>(mut transactions: Vec<T>) -> Vec<T> {
    // `sort_by` is stable.
    transactions.sort_by(|a, b| b.borrow().date().cmp(&a.borrow().date()));
    transactions
}

/// Income and expense totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub total_income: Decimal,
    pub total_expense: Decimal,
    /// `total_income - total_expense`
    pub net: Decimal,
}

/// Amounts are capped at [`MAX_AMOUNT`](crate::MAX_AMOUNT), so the totals
/// cannot overflow for any ledger this store can hold.
pub fn summarize<'a>(transactions: impl IntoIterator<Item = &'a Transaction>) -> Summary {
    let (total_income, total_expense) = transactions.into_iter().fold(
        (Decimal::ZERO, Decimal::ZERO),
        |(income, expense), tx| match tx.kind() {
            TransactionKind::Income => (income + tx.amount(), expense),
            TransactionKind::Expense => (income, expense + tx.amount()),
        },
    );

    Summary {
        total_income,
        total_expense,
        net: total_income - total_expense,
    }
}

/// Expense total for one category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryTotal {
    pub category: String,
    pub amount: Decimal,
}

impl CategoryTotal {
    /// Fraction of `total` this category accounts for, or zero when `total`
    /// is zero.
    pub fn share(&self, total: Decimal) -> Decimal {
        if total.is_zero() {
            Decimal::ZERO
        } else {
            self.amount / total
        }
    }
}

/// Sums expense amounts per category. Income is ignored.
///
/// Categories appear in order of first occurrence.
pub fn aggregate_by_category<'a>(
    transactions: impl IntoIterator<Item = &'a Transaction>,
) -> Vec<CategoryTotal> {
    let mut totals: Vec<CategoryTotal> = Vec::new();

    for tx in transactions
        .into_iter()
        .filter(|tx| tx.kind() == TransactionKind::Expense)
    {
        match totals.iter_mut().find(|total| total.category == tx.category()) {
            Some(total) => total.amount += tx.amount(),
            None => totals.push(CategoryTotal {
                category: tx.category().to_owned(),
                amount: tx.amount(),
            }),
        }
    }

    totals
}

/// Distinct categories in order of first occurrence.
pub fn categories<'a>(transactions: impl IntoIterator<Item = &'a Transaction>) -> Vec<&'a str> {
    let mut seen: Vec<&str> = Vec::new();
    for tx in transactions {
        if !seen.contains(&tx.category()) {
            seen.push(tx.category());
        }
    }
    seen
}
