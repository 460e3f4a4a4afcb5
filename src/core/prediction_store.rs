//! Caller-side state around the pure prediction pipeline.
//!
//! The store owns snapshot fetching, memoizes results while inputs stay the same,
//! and exposes loading/refreshing/error flags plus change subscriptions for a UI.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use chrono::NaiveDate;

use super::{
    clock::Clock,
    format::{AmountFormatter, PlainAmountFormatter},
    services::{PredictionOptions, PredictionReport, PredictionService},
};
use crate::config::ForecastConfig;
use crate::errors::{ForecastError, Result};
use crate::storage::{LedgerSnapshot, SnapshotSource};

/// Observable state published to subscribers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PredictionState {
    pub report: Option<PredictionReport>,
    pub is_loading: bool,
    pub is_refreshing: bool,
    pub error: Option<String>,
}

/// Cancels an in-flight refresh when triggered from any thread.
#[derive(Debug, Clone, Default)]
pub struct RefreshToken {
    cancelled: Arc<AtomicBool>,
}

impl RefreshToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn Fn(&PredictionState) + Send + Sync>;

// Predictions depend on `now` only through its calendar day.
struct Memo {
    snapshot: LedgerSnapshot,
    day: NaiveDate,
}

pub struct PredictionStore<S: SnapshotSource> {
    source: S,
    config: ForecastConfig,
    formatter: Box<dyn AmountFormatter>,
    state: PredictionState,
    memo: Option<Memo>,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
    computations: u64,
}

impl<S: SnapshotSource> PredictionStore<S> {
    pub fn new(source: S, config: ForecastConfig) -> Self {
        let formatter = Box::new(PlainAmountFormatter::from_config(&config));
        Self::with_formatter(source, config, formatter)
    }

    pub fn with_formatter(
        source: S,
        config: ForecastConfig,
        formatter: Box<dyn AmountFormatter>,
    ) -> Self {
        Self {
            source,
            config,
            formatter,
            state: PredictionState::default(),
            memo: None,
            listeners: Vec::new(),
            next_subscription: 0,
            computations: 0,
        }
    }

    pub fn report(&self) -> Option<&PredictionReport> {
        self.state.report.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.state.is_loading
    }

    pub fn is_refreshing(&self) -> bool {
        self.state.is_refreshing
    }

    pub fn error(&self) -> Option<&str> {
        self.state.error.as_deref()
    }

    /// Number of times the pipeline actually ran; memoized refreshes do not count.
    pub fn computation_count(&self) -> u64 {
        self.computations
    }

    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: Fn(&PredictionState) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| *existing != id);
        self.listeners.len() != before
    }

    /// Forces the next refresh to recompute even if inputs look unchanged.
    pub fn invalidate(&mut self) {
        self.memo = None;
    }

    pub fn refresh(&mut self, clock: &dyn Clock) -> Result<&PredictionReport> {
        self.refresh_with(&RefreshToken::new(), clock)
    }

    /// Fetches a snapshot and recomputes predictions when inputs changed.
    ///
    /// A failed fetch keeps the previous report and records a retryable error. A token
    /// cancelled before or during the fetch leaves the current state untouched.
    pub fn refresh_with(
        &mut self,
        token: &RefreshToken,
        clock: &dyn Clock,
    ) -> Result<&PredictionReport> {
        if token.is_cancelled() {
            return Err(ForecastError::Cancelled);
        }

        let first_load = self.state.report.is_none();
        self.state.is_loading = first_load;
        self.state.is_refreshing = !first_load;
        self.notify();

        let outcome = match self.source.fetch() {
            Err(err) => {
                tracing::warn!(error = %err, "snapshot fetch failed");
                self.state.error = Some(err.to_string());
                Err(err)
            }
            Ok(_) if token.is_cancelled() => {
                tracing::debug!("refresh cancelled; discarding fetched snapshot");
                Err(ForecastError::Cancelled)
            }
            Ok(snapshot) => {
                self.apply(snapshot, clock);
                self.state.error = None;
                Ok(())
            }
        };

        self.state.is_loading = false;
        self.state.is_refreshing = false;
        self.notify();

        outcome?;
        self.state
            .report
            .as_ref()
            .ok_or_else(|| ForecastError::InvalidInput("no predictions available".into()))
    }

    fn apply(&mut self, snapshot: LedgerSnapshot, clock: &dyn Clock) {
        let now = clock.now();
        let day = now.date_naive();
        let unchanged = self
            .memo
            .as_ref()
            .map(|memo| memo.day == day && memo.snapshot == snapshot)
            .unwrap_or(false);
        if unchanged && self.state.report.is_some() {
            tracing::debug!("inputs unchanged; reusing memoized predictions");
            return;
        }

        let options = PredictionOptions {
            config: &self.config,
            categories: &snapshot.categories,
            formatter: self.formatter.as_ref(),
        };
        let report = PredictionService::compute_with(
            &snapshot.budgets,
            &snapshot.transactions,
            now,
            &options,
        );
        self.computations += 1;
        tracing::info!(
            predictions = report.predictions.len(),
            skipped = report.skipped.len(),
            overall_risk = ?report.overall_risk,
            "predictions refreshed"
        );
        self.state.report = Some(report);
        self.memo = Some(Memo { snapshot, day });
    }

    fn notify(&self) {
        for (_, listener) in &self.listeners {
            listener(&self.state);
        }
    }
}
