use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single ledger movement as seen by the forecast engine.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    pub id: Uuid,
    pub category_id: Option<Uuid>,
    pub amount: f64,
    pub kind: TransactionType,
    pub occurred_at: DateTime<Utc>,
}

impl Transaction {
    pub fn new(
        category_id: Option<Uuid>,
        amount: f64,
        kind: TransactionType,
        occurred_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            category_id,
            amount,
            kind,
            occurred_at,
        }
    }

    /// Convenience constructor for categorised spending.
    pub fn expense(category_id: Uuid, amount: f64, occurred_at: DateTime<Utc>) -> Self {
        Self::new(
            Some(category_id),
            amount,
            TransactionType::Expense,
            occurred_at,
        )
    }

    pub fn is_expense(&self) -> bool {
        matches!(self.kind, TransactionType::Expense)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    Expense,
    Transfer,
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TransactionType::Income => "Income",
            TransactionType::Expense => "Expense",
            TransactionType::Transfer => "Transfer",
        };
        f.write_str(label)
    }
}
