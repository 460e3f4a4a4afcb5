//! Daily spending ceilings and the narrative attached to each prediction.

use uuid::Uuid;

use super::{risk_service::RiskLevel, spend_service::SpendService};
use crate::config::SeasonalSettings;
use crate::core::format::AmountFormatter;
use crate::ledger::{Period, Transaction};

const FALLBACK_NAME: &str = "This budget";

/// Inputs needed to phrase the insight for one budget.
#[derive(Debug, Clone, Copy)]
pub struct InsightContext<'a> {
    pub category_name: Option<&'a str>,
    pub risk_level: RiskLevel,
    pub budget_limit: f64,
    pub current_spend: f64,
    pub overrun_amount: f64,
    pub recommended_daily_limit: f64,
    pub days_remaining: u32,
}

pub struct RecommendationService;

impl RecommendationService {
    pub fn remaining_budget(budget_limit: f64, current_spend: f64) -> f64 {
        (budget_limit - current_spend).max(0.0)
    }

    /// Even split of what is left over the remaining days; the whole remainder when none are left.
    pub fn recommended_daily_limit(budget_limit: f64, current_spend: f64, days_remaining: u32) -> f64 {
        let remaining = Self::remaining_budget(budget_limit, current_spend);
        if days_remaining > 0 {
            remaining / f64::from(days_remaining)
        } else {
            remaining
        }
    }

    pub fn insight(ctx: &InsightContext<'_>, formatter: &dyn AmountFormatter) -> String {
        let name = ctx.category_name.unwrap_or(FALLBACK_NAME);
        let daily = formatter.format_amount(ctx.recommended_daily_limit);
        match ctx.risk_level {
            RiskLevel::Low => format!(
                "{name} is on track. You can spend up to {daily}/day for the rest of the period."
            ),
            RiskLevel::Medium => format!(
                "{name} is approaching its limit. Keep spending under {daily}/day to stay within budget."
            ),
            RiskLevel::High
                if Self::remaining_budget(ctx.budget_limit, ctx.current_spend) <= 0.0 =>
            {
                format!("{name} is over budget. Avoid further spending this period.")
            }
            RiskLevel::High => {
                let cut = ctx.overrun_amount / f64::from(ctx.days_remaining.max(1));
                format!(
                    "{name} is projected to go over budget by {}. Reduce spend by {}/day and keep it under {daily}/day.",
                    formatter.format_amount(ctx.overrun_amount),
                    formatter.format_amount(cut),
                )
            }
        }
    }

    /// Compares the current pace with the prior same-kind period at the same elapsed fraction.
    ///
    /// Returns `None` when the prior period has no spending for the category or the pace
    /// difference stays inside the configured band.
    pub fn seasonal_note(
        transactions: &[Transaction],
        category_id: Uuid,
        period: &Period,
        elapsed_fraction: f64,
        current_spend: f64,
        settings: &SeasonalSettings,
    ) -> Option<String> {
        let previous = period.previous().ok()?;
        let prior_total = SpendService::aggregate(transactions, category_id, &previous);
        if prior_total.transaction_count == 0 {
            return None;
        }
        let cutoff = previous.instant_at(elapsed_fraction);
        let prior_pace =
            SpendService::aggregate_until(transactions, category_id, &previous, cutoff).current_spend;
        let noun = period.kind.noun();

        if prior_pace <= 0.0 {
            return (current_spend > 0.0).then(|| {
                format!(
                    "Spending is ahead of last {noun}'s pace; nothing had been spent at this point last {noun}."
                )
            });
        }

        let deviation = (current_spend - prior_pace) / prior_pace;
        let percent = (deviation.abs() * 100.0).round();
        if deviation >= settings.deviation_threshold {
            Some(format!("Spending is {percent:.0}% ahead of last {noun}'s pace."))
        } else if deviation <= -settings.deviation_threshold {
            Some(format!("Spending is {percent:.0}% behind last {noun}'s pace."))
        } else {
            None
        }
    }
}
