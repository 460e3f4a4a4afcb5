use crate::ledger::Period;

/// Run-rate extrapolation of the spend seen so far to the whole period.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    pub elapsed_fraction: f64,
    pub projected_spend: f64,
}

pub struct ProjectionService;

impl ProjectionService {
    /// Share of the period that has elapsed, floored at one day so day zero stays finite.
    pub fn elapsed_fraction(elapsed_days: u32, total_days: u32) -> f64 {
        let total = total_days.max(1);
        let elapsed = elapsed_days.clamp(1, total);
        if elapsed == total {
            1.0
        } else {
            f64::from(elapsed) / f64::from(total)
        }
    }

    pub fn project(current_spend: f64, elapsed_days: u32, total_days: u32) -> Projection {
        let elapsed_fraction = Self::elapsed_fraction(elapsed_days, total_days);
        let projected_spend = if elapsed_fraction >= 1.0 {
            current_spend
        } else {
            current_spend / elapsed_fraction
        };
        Projection {
            elapsed_fraction,
            projected_spend,
        }
    }

    pub fn project_period(current_spend: f64, period: &Period) -> Projection {
        Self::project(current_spend, period.elapsed_days, period.total_days)
    }
}
