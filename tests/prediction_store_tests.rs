mod common;

use std::fs;

use budget_forecast::{
    config::ForecastConfig,
    core::{FixedClock, PredictionStore},
    errors::ForecastError,
    storage::{save_snapshot_to_path, JsonSnapshotSource},
};
use common::{at, groceries_snapshot, write_snapshot};

#[test]
fn unchanged_inputs_on_the_same_day_reuse_the_report() {
    let path = write_snapshot(&groceries_snapshot(500.0, &[(50.0, at(2024, 6, 3, 9))]));
    let mut store = PredictionStore::new(JsonSnapshotSource::new(&path), ForecastConfig::default());

    store.refresh(&FixedClock(at(2024, 6, 16, 9))).expect("first refresh");
    store.refresh(&FixedClock(at(2024, 6, 16, 21))).expect("same day refresh");
    assert_eq!(store.computation_count(), 1);

    store.refresh(&FixedClock(at(2024, 6, 17, 8))).expect("next day refresh");
    assert_eq!(store.computation_count(), 2);
}

#[test]
fn changed_snapshot_triggers_recompute() {
    let path = write_snapshot(&groceries_snapshot(500.0, &[(50.0, at(2024, 6, 3, 9))]));
    let mut store = PredictionStore::new(JsonSnapshotSource::new(&path), ForecastConfig::default());
    let clock = FixedClock(at(2024, 6, 16, 9));

    let before = store.refresh(&clock).expect("refresh").predictions[0].current_spend;
    assert_eq!(before, 50.0);

    save_snapshot_to_path(
        &groceries_snapshot(500.0, &[(50.0, at(2024, 6, 3, 9)), (70.0, at(2024, 6, 8, 9))]),
        &path,
    )
    .expect("rewrite snapshot");
    let after = store.refresh(&clock).expect("refresh").predictions[0].current_spend;
    assert_eq!(after, 120.0);
    assert_eq!(store.computation_count(), 2);

    store.invalidate();
    store.refresh(&clock).expect("forced refresh");
    assert_eq!(store.computation_count(), 3);
}

#[test]
fn unreadable_snapshot_keeps_last_report() {
    let path = write_snapshot(&groceries_snapshot(500.0, &[]));
    let mut store = PredictionStore::new(JsonSnapshotSource::new(&path), ForecastConfig::default());
    let clock = FixedClock(at(2024, 6, 16, 9));
    store.refresh(&clock).expect("initial refresh");

    fs::write(&path, "{ not json").expect("corrupt snapshot");
    let err = store.refresh(&clock).expect_err("corrupt snapshot");
    assert!(matches!(err, ForecastError::Serde(_)));
    assert!(store.report().is_some());
    assert!(store.error().is_some());
    assert!(!store.is_loading());
    assert!(!store.is_refreshing());
}
