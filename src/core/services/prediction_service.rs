//! Runs the forecast pipeline for every budget and aggregates the outcome.

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{
    confidence_service::ConfidenceService,
    projection_service::ProjectionService,
    recommendation_service::{InsightContext, RecommendationService},
    risk_service::{RiskLevel, RiskService},
    spend_service::SpendService,
};
use crate::config::ForecastConfig;
use crate::core::{
    clock::Clock,
    format::{AmountFormatter, PlainAmountFormatter},
};
use crate::errors::ValidationError;
use crate::ledger::{Budget, CategoryDirectory, NoCategories, Period, Transaction};

static DEFAULT_CONFIG: Lazy<ForecastConfig> = Lazy::new(ForecastConfig::default);
static DEFAULT_FORMATTER: Lazy<PlainAmountFormatter> = Lazy::new(PlainAmountFormatter::default);

/// Forecast for one budget over its current period.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BudgetPrediction {
    pub budget_id: Uuid,
    pub category_id: Uuid,
    pub period: Period,
    pub current_spend: f64,
    pub projected_spend: f64,
    pub budget_limit: f64,
    pub overrun_amount: f64,
    pub risk_level: RiskLevel,
    pub confidence: f64,
    pub days_remaining: u32,
    pub recommended_daily_limit: f64,
    pub transaction_count: usize,
    pub insight: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seasonal_note: Option<String>,
}

/// A budget left out of the batch together with the reason.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SkippedBudget {
    pub budget_id: Uuid,
    pub category_id: Uuid,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct PredictionReport {
    pub predictions: Vec<BudgetPrediction>,
    pub overall_risk: Option<RiskLevel>,
    pub summary: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<SkippedBudget>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PredictionReport {
    /// Predictions ordered from highest to lowest risk, input order kept within a level.
    pub fn by_risk(&self) -> Vec<&BudgetPrediction> {
        let mut ordered: Vec<&BudgetPrediction> = self.predictions.iter().collect();
        ordered.sort_by(|a, b| b.risk_level.cmp(&a.risk_level));
        ordered
    }

    pub fn prediction_for(&self, category_id: Uuid) -> Option<&BudgetPrediction> {
        self.predictions
            .iter()
            .find(|prediction| prediction.category_id == category_id)
    }
}

/// Collaborators and parameters for a pipeline run.
#[derive(Clone, Copy)]
pub struct PredictionOptions<'a> {
    pub config: &'a ForecastConfig,
    pub categories: &'a dyn CategoryDirectory,
    pub formatter: &'a dyn AmountFormatter,
}

impl Default for PredictionOptions<'static> {
    fn default() -> Self {
        Self {
            config: &*DEFAULT_CONFIG,
            categories: &NoCategories,
            formatter: &*DEFAULT_FORMATTER,
        }
    }
}

pub struct PredictionService;

impl PredictionService {
    /// Forecasts every budget with the default configuration.
    pub fn compute_predictions(
        budgets: &[Budget],
        transactions: &[Transaction],
        now: DateTime<Utc>,
    ) -> PredictionReport {
        Self::compute_with(budgets, transactions, now, &PredictionOptions::default())
    }

    /// Forecasts every budget at the instant reported by `clock`.
    pub fn compute_now(
        budgets: &[Budget],
        transactions: &[Transaction],
        clock: &dyn Clock,
        options: &PredictionOptions<'_>,
    ) -> PredictionReport {
        Self::compute_with(budgets, transactions, clock.now(), options)
    }

    /// Forecasts every budget in input order.
    ///
    /// Invalid budgets are reported in `skipped` and never abort the batch.
    pub fn compute_with(
        budgets: &[Budget],
        transactions: &[Transaction],
        now: DateTime<Utc>,
        options: &PredictionOptions<'_>,
    ) -> PredictionReport {
        let mut predictions = Vec::with_capacity(budgets.len());
        let mut skipped = Vec::new();

        for budget in budgets {
            match Self::predict(budget, transactions, now, options) {
                Ok(prediction) => predictions.push(prediction),
                Err(err) => {
                    tracing::warn!(
                        budget_id = %budget.id,
                        category_id = %budget.category_id,
                        error = %err,
                        "skipping budget"
                    );
                    skipped.push(SkippedBudget {
                        budget_id: budget.id,
                        category_id: budget.category_id,
                        reason: err.to_string(),
                    });
                }
            }
        }

        let overall_risk = predictions
            .iter()
            .map(|prediction| prediction.risk_level)
            .max();
        let summary = summarize(&predictions, skipped.len());
        let error = describe_skipped(&skipped);

        PredictionReport {
            predictions,
            overall_risk,
            summary,
            skipped,
            error,
        }
    }

    /// Runs the pipeline for a single budget.
    pub fn predict(
        budget: &Budget,
        transactions: &[Transaction],
        now: DateTime<Utc>,
        options: &PredictionOptions<'_>,
    ) -> Result<BudgetPrediction, ValidationError> {
        budget.validate()?;
        let config = options.config;
        let period = Period::resolve(&budget.period, budget.anchor_date, now)?;

        let spend = SpendService::aggregate(transactions, budget.category_id, &period);
        let projection = ProjectionService::project_period(spend.current_spend, &period);
        let overrun_amount = (projection.projected_spend - budget.limit_amount).max(0.0);
        let risk_level = RiskService::classify(
            projection.projected_spend,
            spend.current_spend,
            budget.limit_amount,
            &config.risk,
        );
        let confidence = ConfidenceService::estimate(
            period.elapsed_days,
            period.total_days,
            spend.transaction_count,
            &config.confidence,
        );

        let days_remaining = period.days_remaining();
        let recommended_daily_limit = RecommendationService::recommended_daily_limit(
            budget.limit_amount,
            spend.current_spend,
            days_remaining,
        );
        let category_name = options
            .categories
            .find_by_id(budget.category_id)
            .map(|category| category.name.as_str());
        let insight = RecommendationService::insight(
            &InsightContext {
                category_name,
                risk_level,
                budget_limit: budget.limit_amount,
                current_spend: spend.current_spend,
                overrun_amount,
                recommended_daily_limit,
                days_remaining,
            },
            options.formatter,
        );
        let seasonal_note = RecommendationService::seasonal_note(
            transactions,
            budget.category_id,
            &period,
            projection.elapsed_fraction,
            spend.current_spend,
            &config.seasonal,
        );

        tracing::debug!(
            category_id = %budget.category_id,
            risk = %risk_level,
            projected = projection.projected_spend,
            confidence,
            "computed budget prediction"
        );

        Ok(BudgetPrediction {
            budget_id: budget.id,
            category_id: budget.category_id,
            period,
            current_spend: spend.current_spend,
            projected_spend: projection.projected_spend,
            budget_limit: budget.limit_amount,
            overrun_amount,
            risk_level,
            confidence,
            days_remaining,
            recommended_daily_limit,
            transaction_count: spend.transaction_count,
            insight,
            seasonal_note,
        })
    }
}

fn summarize(predictions: &[BudgetPrediction], skipped: usize) -> String {
    if predictions.is_empty() {
        return if skipped == 0 {
            "No budgets to forecast.".to_string()
        } else {
            format!("No budgets could be forecast; {skipped} skipped as invalid.")
        };
    }
    let count = |level: RiskLevel| {
        predictions
            .iter()
            .filter(|prediction| prediction.risk_level == level)
            .count()
    };
    let total = predictions.len();
    let noun = if total == 1 { "budget" } else { "budgets" };
    format!(
        "{total} {noun} forecast: {} at high risk, {} approaching the limit, {} on track.",
        count(RiskLevel::High),
        count(RiskLevel::Medium),
        count(RiskLevel::Low),
    )
}

fn describe_skipped(skipped: &[SkippedBudget]) -> Option<String> {
    if skipped.is_empty() {
        return None;
    }
    let details: Vec<String> = skipped
        .iter()
        .map(|entry| format!("{} ({})", entry.budget_id, entry.reason))
        .collect();
    let noun = if skipped.len() == 1 { "budget" } else { "budgets" };
    Some(format!(
        "Skipped {} {noun}: {}",
        skipped.len(),
        details.join("; ")
    ))
}
