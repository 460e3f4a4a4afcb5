use crate::config::ConfidenceSettings;

// Absorbs representation error in `total_days * maturity_ratio` (30 * 0.1 > 3.0).
const HORIZON_TOLERANCE: f64 = 1e-9;

pub struct ConfidenceService;

impl ConfidenceService {
    /// Reliability of a projection in `[0, 1]`.
    ///
    /// Maturity ramps linearly until `max(min_days, total_days * maturity_ratio)` days have
    /// elapsed. The data weight scales it down to `empty_data_floor` when no transactions back
    /// the projection and saturates at `min_transactions`.
    pub fn estimate(
        elapsed_days: u32,
        total_days: u32,
        transaction_count: usize,
        settings: &ConfidenceSettings,
    ) -> f64 {
        let horizon = f64::from(settings.min_days.max(1))
            .max(f64::from(total_days) * settings.maturity_ratio);
        let elapsed = f64::from(elapsed_days);
        let maturity = if elapsed + HORIZON_TOLERANCE >= horizon {
            1.0
        } else {
            elapsed / horizon
        };

        let data_weight =
            (transaction_count as f64 / f64::from(settings.min_transactions.max(1))).min(1.0);
        let floor = settings.empty_data_floor.clamp(0.0, 1.0);
        let confidence = maturity * (floor + (1.0 - floor) * data_weight);
        if confidence.is_finite() {
            confidence.clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}
