#![allow(dead_code)]

use std::{path::PathBuf, sync::Mutex};

use budget_forecast::{
    ledger::{Budget, Category, PeriodKind, Transaction},
    storage::{save_snapshot_to_path, LedgerSnapshot},
};
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use once_cell::sync::Lazy;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Creates an isolated directory that outlives the calling test.
pub fn temp_base() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    base
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

pub fn at(year: i32, month: u32, day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, 0, 0)
        .single()
        .expect("valid timestamp")
}

pub fn monthly_budget(category: &Category, limit: f64) -> Budget {
    Budget::new(category.id, PeriodKind::Monthly, limit, date(2024, 1, 1))
}

/// Snapshot with one monthly groceries budget and the given expenses.
pub fn groceries_snapshot(limit: f64, expenses: &[(f64, DateTime<Utc>)]) -> LedgerSnapshot {
    let groceries = Category::new("Groceries");
    LedgerSnapshot {
        budgets: vec![monthly_budget(&groceries, limit)],
        transactions: expenses
            .iter()
            .map(|(amount, when)| Transaction::expense(groceries.id, *amount, *when))
            .collect(),
        categories: vec![groceries],
    }
}

/// Writes `snapshot` into a fresh temp directory and returns the file path.
pub fn write_snapshot(snapshot: &LedgerSnapshot) -> PathBuf {
    let path = temp_base().join("snapshot.json");
    save_snapshot_to_path(snapshot, &path).expect("write snapshot");
    path
}
