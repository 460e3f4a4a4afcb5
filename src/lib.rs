#![doc(test(attr(deny(warnings))))]

//! Budget Forecast projects end-of-period spending for category budgets, classifies
//! overrun risk, and recommends a daily spending ceiling.
//!
//! The pipeline is a pure function of budgets, transactions, and a reference instant:
//!
//! ```
//! use budget_forecast::core::services::PredictionService;
//! use chrono::Utc;
//!
//! let report = PredictionService::compute_predictions(&[], &[], Utc::now());
//! assert!(report.predictions.is_empty());
//! assert!(report.overall_risk.is_none());
//! ```

pub mod cli;
pub mod config;
pub mod core;
pub mod errors;
pub mod ledger;
pub mod storage;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Budget Forecast tracing initialized.");
    });
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_does_not_panic() {
        super::init();
    }
}
