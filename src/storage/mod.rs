//! JSON snapshots of the records a forecast run consumes.
//!
//! The engine never reads storage itself; these helpers back the caller-side
//! [`crate::core::prediction_store::PredictionStore`] and the CLI.

use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::errors::{ForecastError, Result};
use crate::ledger::{Budget, Category, Transaction};
use crate::utils::ensure_dir;

const TMP_SUFFIX: &str = "tmp";

/// Budgets, transactions, and categories materialized in memory.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct LedgerSnapshot {
    #[serde(default)]
    pub budgets: Vec<Budget>,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    #[serde(default)]
    pub categories: Vec<Category>,
}

/// Supplies fresh snapshots to a prediction store. Fetching may fail; callers retry.
pub trait SnapshotSource: Send + Sync {
    fn fetch(&self) -> Result<LedgerSnapshot>;
}

/// Reads a snapshot file on every fetch.
#[derive(Debug, Clone)]
pub struct JsonSnapshotSource {
    path: PathBuf,
}

impl JsonSnapshotSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SnapshotSource for JsonSnapshotSource {
    fn fetch(&self) -> Result<LedgerSnapshot> {
        load_snapshot_from_path(&self.path)
    }
}

pub fn load_snapshot_from_path(path: &Path) -> Result<LedgerSnapshot> {
    if !path.exists() {
        return Err(ForecastError::InvalidInput(format!(
            "snapshot `{}` not found",
            path.display()
        )));
    }
    let data = fs::read_to_string(path)?;
    let snapshot = serde_json::from_str(&data)?;
    Ok(snapshot)
}

pub fn save_snapshot_to_path(snapshot: &LedgerSnapshot, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    let json = serde_json::to_string_pretty(snapshot)?;
    let mut tmp = path.to_path_buf();
    tmp.set_extension(TMP_SUFFIX);
    {
        let mut file = File::create(&tmp)?;
        file.write_all(json.as_bytes())?;
        file.flush()?;
    }
    fs::rename(&tmp, path)?;
    Ok(())
}
