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

use chrono::{Local, NaiveDate};
use clap::{Args as ClapArgs, Parser, Subcommand};
use csv::Writer;
use expense_tracker_rs::format::format_amount;
use expense_tracker_rs::query::{self, Filter};
use expense_tracker_rs::{
    DATE_FORMAT, FileStorage, RawFields, Storage, Store, StoreError, Transaction, TransactionId,
    TransactionKind, codec,
};
use rust_decimal::Decimal;
use serde::Serialize;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process;
use thiserror::Error;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Expense Tracker - Record income and expenses from the command line
///
/// Transactions are kept in a JSON file inside the data directory and saved
/// after every change.
#[derive(Parser, Debug)]
#[command(name = "expense-tracker")]
#[command(about = "Record, filter, summarize and export income and expenses", long_about = None)]
struct Args {
    /// Directory holding the transactions file
    #[arg(
        long,
        value_name = "DIR",
        env = "EXPENSE_TRACKER_DATA_DIR",
        default_value = ".expense-tracker"
    )]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Record a new transaction
    Add(TransactionArgs),
    /// Replace an existing transaction; omitted fields keep their current value
    Edit {
        id: String,
        #[command(flatten)]
        fields: TransactionArgs,
    },
    /// Delete a transaction
    Delete { id: String },
    /// Delete every transaction
    Clear {
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
    /// List transactions as CSV, newest first
    List(FilterArgs),
    /// Show total income, total expense and net balance
    Summary,
    /// Show expenses per category as CSV
    Breakdown,
    /// Write all transactions to a JSON file
    Export {
        /// Defaults to transactions-<today>.json
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
    /// Replace all transactions with the contents of a JSON file
    Import {
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },
}

/// Form fields. Left as text so the ledger can report every invalid field.
#[derive(ClapArgs, Debug, Default)]
struct TransactionArgs {
    /// income or expense
    #[arg(long = "type", value_name = "TYPE")]
    kind: Option<String>,
    /// YYYY-MM-DD, defaults to today for new transactions
    #[arg(long)]
    date: Option<String>,
    #[arg(long)]
    description: Option<String>,
    #[arg(long)]
    category: Option<String>,
    #[arg(long, allow_hyphen_values = true)]
    amount: Option<String>,
}

impl TransactionArgs {
    /// Overlays the supplied flags onto `base`.
    fn apply_to(self, mut base: RawFields) -> RawFields {
        base.kind = self.kind.or(base.kind);
        base.date = self.date.or(base.date);
        base.description = self.description.or(base.description);
        base.category = self.category.or(base.category);
        base.amount = self.amount.or(base.amount);
        base
    }
}

#[derive(ClapArgs, Debug, Default)]
struct FilterArgs {
    /// Only income or only expense
    #[arg(long = "type", value_name = "TYPE")]
    kind: Option<TransactionKind>,
    /// Exact category
    #[arg(long)]
    category: Option<String>,
    /// Case-insensitive text to look for in descriptions
    #[arg(long, default_value = "")]
    search: String,
}

impl From<FilterArgs> for Filter {
    fn from(args: FilterArgs) -> Self {
        Filter {
            kind: args.kind,
            category: args.category,
            search: args.search,
        }
    }
}

#[derive(Error, Debug)]
enum CliError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("failed to write output: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to write output: {0}")]
    Io(#[from] io::Error),

    #[error("failed to access '{path}': {source}")]
    File {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("no transaction with ID {0}")]
    NotFound(TransactionId),

    #[error("refusing to delete {0} transactions without --yes")]
    Unconfirmed(usize),
}

fn main() {
    // Parse command line arguments
    let args = Args::parse();
    init_logging();

    let mut store = Store::open(FileStorage::new(&args.data_dir));
    let today = Local::now().date_naive();

    if let Err(e) = execute(&mut store, args.command, today, io::stdout().lock()) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Logs go to stderr so stdout stays machine-readable. Level comes from
/// `RUST_LOG`, defaulting to warnings only.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Runs one command against `store`, writing results to `out`.
fn execute<S: Storage, W: Write>(
    store: &mut Store<S>,
    command: Command,
    today: NaiveDate,
    mut out: W,
) -> Result<(), CliError> {
    debug!("Executing {:?}", command);

    match command {
        Command::Add(fields) => {
            let base = RawFields {
                date: Some(today.format(DATE_FORMAT).to_string()),
                ..RawFields::default()
            };
            let tx = store.upsert(fields.apply_to(base))?;
            writeln!(out, "Added {}", tx.id())?;
        }
        Command::Edit { id, fields } => {
            let id = TransactionId::from(id);
            let current = store
                .get(&id)
                .map(Transaction::to_raw_fields)
                .ok_or_else(|| CliError::NotFound(id.clone()))?;
            let tx = store.upsert(fields.apply_to(current))?;
            writeln!(out, "Updated {}", tx.id())?;
        }
        Command::Delete { id } => {
            let id = TransactionId::from(id);
            if store.delete(&id)? {
                writeln!(out, "Deleted {}", id)?;
            } else {
                writeln!(out, "No transaction with ID {}", id)?;
            }
        }
        Command::Clear { yes } => {
            if !yes {
                return Err(CliError::Unconfirmed(store.list().len()));
            }
            let count = store.list().len();
            store.clear()?;
            writeln!(out, "Deleted {} transactions", count)?;
        }
        Command::List(filter_args) => {
            let filter = Filter::from(filter_args);
            let rows = query::sort_for_display(query::filter(store.list(), &filter));
            write_transactions(&rows, out)?;
        }
        Command::Summary => {
            // Totals always cover the full list, never a filtered view.
            let summary = query::summarize(store.list());
            writeln!(out, "Total income:  {}", format_amount(summary.total_income))?;
            writeln!(out, "Total expense: {}", format_amount(summary.total_expense))?;
            writeln!(out, "Net balance:   {}", format_amount(summary.net))?;
        }
        Command::Breakdown => {
            write_breakdown(store.list(), out)?;
        }
        Command::Export { output } => {
            let path = output.unwrap_or_else(|| PathBuf::from(codec::export_file_name(today)));
            let json = store.export()?;
            fs::write(&path, json).map_err(|source| CliError::File {
                path: path.clone(),
                source,
            })?;
            writeln!(
                out,
                "Exported {} transactions to {}",
                store.list().len(),
                path.display()
            )?;
        }
        Command::Import { input } => {
            let text = fs::read_to_string(&input).map_err(|source| CliError::File {
                path: input.clone(),
                source,
            })?;
            let count = store.import(&text)?;
            writeln!(out, "Imported {} transactions from {}", count, input.display())?;
        }
    }

    Ok(())
}

/// Table row: amounts are signed (expenses negative) and formatted.
#[derive(Debug, Serialize)]
struct TransactionRow<'a> {
    id: &'a str,
    date: String,
    #[serde(rename = "type")]
    kind: String,
    description: &'a str,
    category: &'a str,
    amount: String,
}

impl<'a> From<&'a Transaction> for TransactionRow<'a> {
    fn from(tx: &'a Transaction) -> Self {
        Self {
            id: tx.id().as_str(),
            date: tx.date().format(DATE_FORMAT).to_string(),
            kind: tx.kind().to_string(),
            description: tx.description(),
            category: tx.category(),
            amount: format_amount(tx.signed_amount()),
        }
    }
}

/// Write transactions to a CSV writer.
///
/// # CSV Format
///
/// Columns: `id, date, type, description, category, amount`
///
/// # Example
///
/// ```csv
/// id,date,type,description,category,amount
/// 0190f1c2...,2024-01-15,Expense,Groceries,Food,₹-50.00
/// ```
fn write_transactions<W: Write>(rows: &[&Transaction], writer: W) -> Result<(), csv::Error> {
    let mut wtr = Writer::from_writer(writer);

    if rows.is_empty() {
        wtr.write_record(["id", "date", "type", "description", "category", "amount"])?;
    }
    for tx in rows {
        wtr.serialize(TransactionRow::from(*tx))?;
    }

    wtr.flush()?;
    Ok(())
}

#[derive(Debug, Serialize)]
struct CategoryRow<'a> {
    category: &'a str,
    amount: String,
    share: String,
}

/// Write per-category expense totals to a CSV writer.
///
/// Columns: `category, amount, share` where `share` is a percentage of all
/// expenses.
fn write_breakdown<W: Write>(transactions: &[Transaction], writer: W) -> Result<(), csv::Error> {
    let totals = query::aggregate_by_category(transactions);
    let total_expense = query::summarize(transactions).total_expense;
    let mut wtr = Writer::from_writer(writer);

    if totals.is_empty() {
        wtr.write_record(["category", "amount", "share"])?;
    }
    for total in &totals {
        let percent = (total.share(total_expense) * Decimal::ONE_HUNDRED).round_dp(2);
        wtr.serialize(CategoryRow {
            category: &total.category,
            amount: format_amount(total.amount),
            share: format!("{:.2}%", percent),
        })?;
    }

    wtr.flush()?;
    Ok(())
}
