//! Resolves the accounting window a budget is currently running in.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use super::budget::PeriodKind;
use crate::errors::ValidationError;

const WEEK_DAYS: i64 = 7;

/// Half-open window `[start, end)` with elapsed-day bookkeeping relative to a reference instant.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Period {
    pub kind: PeriodKind,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub total_days: u32,
    pub elapsed_days: u32,
}

impl Period {
    /// Resolves the period of `kind` that contains `now`.
    ///
    /// Weekly windows step in seven-day strides from `anchor`, so they start on the
    /// anchor's weekday. Monthly and yearly windows follow the calendar of `now`.
    pub fn resolve(
        kind: &PeriodKind,
        anchor: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        let today = now.date_naive();
        let (start, end) = match kind {
            PeriodKind::Weekly => {
                let start = cycle_start_linear(anchor, today, WEEK_DAYS);
                (start, start + Duration::days(WEEK_DAYS))
            }
            PeriodKind::Monthly => {
                let start = first_of_month(today.year(), today.month())?;
                (start, shift_months(start, 1)?)
            }
            PeriodKind::Yearly => {
                let start = first_of_month(today.year(), 1)?;
                (start, first_of_month(today.year() + 1, 1)?)
            }
            PeriodKind::Unsupported(raw) => {
                return Err(ValidationError::UnsupportedPeriod(raw.clone()))
            }
        };
        Ok(Self::from_bounds(kind.clone(), midnight(start), midnight(end), now))
    }

    /// Builds a period from explicit bounds, measuring elapsed days at `now`.
    ///
    /// `elapsed_days` counts whole days since `start`, clamped to `[0, total_days]`.
    /// `total_days` is at least one even for degenerate bounds.
    pub fn from_bounds(
        kind: PeriodKind,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Self {
        let total_days = (end - start).num_days().max(1);
        let elapsed_days = (now - start).num_days().clamp(0, total_days);
        Self {
            kind,
            start,
            end,
            total_days: total_days as u32,
            elapsed_days: elapsed_days as u32,
        }
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        instant >= self.start && instant < self.end
    }

    /// Days left in the window, the current partial day included.
    pub fn days_remaining(&self) -> u32 {
        self.total_days.saturating_sub(self.elapsed_days)
    }

    pub fn is_complete(&self) -> bool {
        self.elapsed_days >= self.total_days
    }

    /// The same-kind window immediately before this one, measured as fully elapsed.
    pub fn previous(&self) -> Result<Self, ValidationError> {
        let start_date = self.start.date_naive();
        let previous_start = match self.kind {
            PeriodKind::Weekly => start_date - Duration::days(WEEK_DAYS),
            PeriodKind::Monthly => shift_months(start_date, -1)?,
            PeriodKind::Yearly => first_of_month(start_date.year() - 1, 1)?,
            PeriodKind::Unsupported(ref raw) => {
                return Err(ValidationError::UnsupportedPeriod(raw.clone()))
            }
        };
        Ok(Self::from_bounds(
            self.kind.clone(),
            midnight(previous_start),
            self.start,
            self.start,
        ))
    }

    /// Instant reached after `fraction` of the window has passed.
    pub fn instant_at(&self, fraction: f64) -> DateTime<Utc> {
        let span = (self.end - self.start).num_seconds() as f64;
        let offset = (span * fraction.clamp(0.0, 1.0)).round() as i64;
        self.start + Duration::seconds(offset)
    }
}

fn midnight(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN))
}

fn cycle_start_linear(anchor: NaiveDate, reference: NaiveDate, interval_days: i64) -> NaiveDate {
    let diff = reference - anchor;
    let steps = diff.num_days().div_euclid(interval_days);
    anchor + Duration::days(steps * interval_days)
}

fn first_of_month(year: i32, month: u32) -> Result<NaiveDate, ValidationError> {
    NaiveDate::from_ymd_opt(year, month, 1).ok_or(ValidationError::DateOutOfRange)
}

fn shift_months(first: NaiveDate, months: i32) -> Result<NaiveDate, ValidationError> {
    let index = first.year() * 12 + first.month0() as i32 + months;
    first_of_month(index.div_euclid(12), index.rem_euclid(12) as u32 + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    #[test]
    fn monthly_period_follows_calendar_month() {
        let period = Period::resolve(&PeriodKind::Monthly, date(2023, 1, 17), at(2024, 2, 10, 9))
            .expect("monthly period");
        assert_eq!(period.start, at(2024, 2, 1, 0));
        assert_eq!(period.end, at(2024, 3, 1, 0));
        assert_eq!(period.total_days, 29);
        assert_eq!(period.elapsed_days, 9);
        assert_eq!(period.days_remaining(), 20);
    }

    #[test]
    fn december_rolls_into_next_year() {
        let period = Period::resolve(&PeriodKind::Monthly, date(2024, 1, 1), at(2024, 12, 31, 23))
            .expect("monthly period");
        assert_eq!(period.end, at(2025, 1, 1, 0));
        assert_eq!(period.total_days, 31);
        assert_eq!(period.elapsed_days, 30);
    }

    #[test]
    fn weekly_period_starts_on_anchor_weekday() {
        // 2024-03-06 is a Wednesday.
        let period = Period::resolve(&PeriodKind::Weekly, date(2024, 3, 6), at(2024, 4, 1, 12))
            .expect("weekly period");
        assert_eq!(period.start, at(2024, 3, 27, 0));
        assert_eq!(period.end, at(2024, 4, 3, 0));
        assert_eq!(period.total_days, 7);
        assert_eq!(period.elapsed_days, 5);
    }

    #[test]
    fn weekly_anchor_in_the_future_still_contains_now() {
        let now = at(2024, 3, 1, 8);
        let period =
            Period::resolve(&PeriodKind::Weekly, date(2024, 5, 15), now).expect("weekly period");
        assert!(period.contains(now));
        assert_eq!(period.total_days, 7);
    }

    #[test]
    fn yearly_period_covers_calendar_year() {
        let period = Period::resolve(&PeriodKind::Yearly, date(2020, 6, 1), at(2024, 7, 1, 0))
            .expect("yearly period");
        assert_eq!(period.start, at(2024, 1, 1, 0));
        assert_eq!(period.end, at(2025, 1, 1, 0));
        assert_eq!(period.total_days, 366);
        assert_eq!(period.elapsed_days, 182);
    }

    #[test]
    fn clock_skew_clamps_elapsed_days_to_zero() {
        let period = Period::from_bounds(
            PeriodKind::Monthly,
            at(2024, 5, 1, 0),
            at(2024, 6, 1, 0),
            at(2024, 4, 28, 0),
        );
        assert_eq!(period.elapsed_days, 0);
        assert_eq!(period.days_remaining(), 31);
    }

    #[test]
    fn elapsed_days_never_exceed_total() {
        let period = Period::from_bounds(
            PeriodKind::Weekly,
            at(2024, 5, 1, 0),
            at(2024, 5, 8, 0),
            at(2024, 6, 1, 0),
        );
        assert_eq!(period.elapsed_days, 7);
        assert!(period.is_complete());
    }

    #[test]
    fn previous_period_is_adjacent_and_complete() {
        let current = Period::resolve(&PeriodKind::Monthly, date(2024, 1, 1), at(2024, 3, 15, 0))
            .expect("monthly period");
        let previous = current.previous().expect("previous period");
        assert_eq!(previous.start, at(2024, 2, 1, 0));
        assert_eq!(previous.end, current.start);
        assert!(previous.is_complete());
    }

    #[test]
    fn unsupported_kind_is_rejected() {
        let err = Period::resolve(
            &PeriodKind::Unsupported("daily".into()),
            date(2024, 1, 1),
            at(2024, 1, 2, 0),
        )
        .expect_err("unsupported period");
        assert_eq!(err, ValidationError::UnsupportedPeriod("daily".into()));
    }

    #[test]
    fn instant_at_interpolates_within_window() {
        let period = Period::from_bounds(
            PeriodKind::Weekly,
            at(2024, 5, 1, 0),
            at(2024, 5, 8, 0),
            at(2024, 5, 2, 0),
        );
        assert_eq!(period.instant_at(0.5), at(2024, 5, 4, 12));
        assert_eq!(period.instant_at(2.0), period.end);
    }
}
