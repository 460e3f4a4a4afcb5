use uuid::Uuid;

use crate::ledger::{Period, Transaction};

/// Expense total for one category inside one period.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SpendTotals {
    pub current_spend: f64,
    pub transaction_count: usize,
}

pub struct SpendService;

impl SpendService {
    /// Sums expense transactions of `category_id` whose instant falls inside `[start, end)`.
    ///
    /// Non-finite or negative amounts cannot come from a healthy ledger and are ignored.
    pub fn aggregate(transactions: &[Transaction], category_id: Uuid, period: &Period) -> SpendTotals {
        Self::aggregate_until(transactions, category_id, period, period.end)
    }

    /// Same as [`SpendService::aggregate`] but stops at `cutoff` (exclusive) when it is earlier
    /// than the period end.
    pub fn aggregate_until(
        transactions: &[Transaction],
        category_id: Uuid,
        period: &Period,
        cutoff: chrono::DateTime<chrono::Utc>,
    ) -> SpendTotals {
        let mut totals = SpendTotals::default();
        for txn in transactions {
            if !txn.is_expense()
                || txn.category_id != Some(category_id)
                || !period.contains(txn.occurred_at)
                || txn.occurred_at >= cutoff
            {
                continue;
            }
            if !txn.amount.is_finite() || txn.amount < 0.0 {
                tracing::warn!(
                    transaction_id = %txn.id,
                    amount = txn.amount,
                    "ignoring expense with invalid amount"
                );
                continue;
            }
            totals.current_spend += txn.amount;
            totals.transaction_count += 1;
        }
        totals
    }
}
