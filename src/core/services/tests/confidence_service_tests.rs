use crate::config::ConfidenceSettings;
use crate::core::services::ConfidenceService;

fn settings() -> ConfidenceSettings {
    ConfidenceSettings::default()
}

#[test]
fn day_zero_has_no_confidence() {
    assert_eq!(ConfidenceService::estimate(0, 30, 10, &settings()), 0.0);
}

#[test]
fn mature_period_with_data_is_fully_confident() {
    // 10% of 30 days is 3 days, matching the minimum.
    assert_eq!(ConfidenceService::estimate(3, 30, 3, &settings()), 1.0);
    assert_eq!(ConfidenceService::estimate(29, 30, 40, &settings()), 1.0);
}

#[test]
fn long_periods_need_ten_percent_elapsed() {
    let partial = ConfidenceService::estimate(18, 365, 10, &settings());
    assert!((partial - 18.0 / 36.5).abs() < 1e-12);
    assert_eq!(ConfidenceService::estimate(37, 365, 10, &settings()), 1.0);
}

#[test]
fn short_periods_need_the_minimum_days() {
    let one_day = ConfidenceService::estimate(1, 7, 5, &settings());
    assert!((one_day - 1.0 / 3.0).abs() < 1e-12);
}

#[test]
fn missing_transactions_cap_confidence() {
    assert_eq!(ConfidenceService::estimate(20, 30, 0, &settings()), 0.5);
    let sparse = ConfidenceService::estimate(20, 30, 1, &settings());
    assert!(sparse > 0.5 && sparse < 1.0);
}

#[test]
fn confidence_rises_with_elapsed_days() {
    let mut previous = 0.0;
    for elapsed in 0..=30 {
        let value = ConfidenceService::estimate(elapsed, 30, 2, &settings());
        assert!((0.0..=1.0).contains(&value));
        assert!(value >= previous);
        previous = value;
    }
}
