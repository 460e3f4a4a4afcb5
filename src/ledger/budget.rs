use std::{convert::Infallible, fmt, str::FromStr};

use chrono::NaiveDate;
use serde::{
    de::{self, Deserializer},
    Deserialize, Serialize, Serializer,
};
use uuid::Uuid;

use crate::errors::ValidationError;

/// A spending guardrail for a single category over a recurring period.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Budget {
    pub id: Uuid,
    pub category_id: Uuid,
    pub period: PeriodKind,
    pub limit_amount: f64,
    pub anchor_date: NaiveDate,
}

impl Budget {
    pub fn new(
        category_id: Uuid,
        period: PeriodKind,
        limit_amount: f64,
        anchor_date: NaiveDate,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            category_id,
            period,
            limit_amount,
            anchor_date,
        }
    }

    /// Checks the record before it is fed into the forecast pipeline.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.limit_amount.is_finite() {
            return Err(ValidationError::NonFiniteLimit);
        }
        if self.limit_amount < 0.0 {
            return Err(ValidationError::NegativeLimit);
        }
        if let PeriodKind::Unsupported(raw) = &self.period {
            return Err(ValidationError::UnsupportedPeriod(raw.clone()));
        }
        Ok(())
    }
}

/// Budgeting cadences understood by the period resolver.
///
/// Stored records may carry kinds this engine does not know about; those
/// deserialize into [`PeriodKind::Unsupported`] so a single bad record never
/// prevents the rest of a batch from loading.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PeriodKind {
    Weekly,
    Monthly,
    Yearly,
    Unsupported(String),
}

/// Parsing never fails; unrecognised text becomes [`PeriodKind::Unsupported`].
impl FromStr for PeriodKind {
    type Err = Infallible;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Ok(match value.trim().to_ascii_lowercase().as_str() {
            "weekly" | "week" => PeriodKind::Weekly,
            "monthly" | "month" => PeriodKind::Monthly,
            "yearly" | "year" | "annual" => PeriodKind::Yearly,
            _ => PeriodKind::Unsupported(value.trim().to_string()),
        })
    }
}

impl PeriodKind {

    pub fn as_str(&self) -> &str {
        match self {
            PeriodKind::Weekly => "weekly",
            PeriodKind::Monthly => "monthly",
            PeriodKind::Yearly => "yearly",
            PeriodKind::Unsupported(raw) => raw.as_str(),
        }
    }

    /// Noun used in narrative text, e.g. "last month's pace".
    pub fn noun(&self) -> &str {
        match self {
            PeriodKind::Weekly => "week",
            PeriodKind::Monthly => "month",
            PeriodKind::Yearly => "year",
            PeriodKind::Unsupported(_) => "period",
        }
    }
}

impl fmt::Display for PeriodKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PeriodKind::Weekly => "Weekly",
            PeriodKind::Monthly => "Monthly",
            PeriodKind::Yearly => "Yearly",
            PeriodKind::Unsupported(raw) => return write!(f, "Unsupported({raw})"),
        };
        f.write_str(label)
    }
}

impl Serialize for PeriodKind {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for PeriodKind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        value.parse().map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn budget(limit: f64, period: PeriodKind) -> Budget {
        Budget::new(
            Uuid::new_v4(),
            period,
            limit,
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        )
    }

    #[test]
    fn unknown_period_kind_deserializes_as_unsupported() {
        let kind: PeriodKind = serde_json::from_str("\"fortnightly\"").unwrap();
        assert_eq!(kind, PeriodKind::Unsupported("fortnightly".into()));
        let kind: PeriodKind = serde_json::from_str("\"Monthly\"").unwrap();
        assert_eq!(kind, PeriodKind::Monthly);
    }

    #[test]
    fn parsing_accepts_aliases_and_keeps_unknown_text() {
        assert_eq!("Week".parse::<PeriodKind>(), Ok(PeriodKind::Weekly));
        assert_eq!(" annual ".parse::<PeriodKind>(), Ok(PeriodKind::Yearly));
        assert_eq!(
            "Fortnightly".parse::<PeriodKind>(),
            Ok(PeriodKind::Unsupported("Fortnightly".into()))
        );
    }

    #[test]
    fn validation_rejects_malformed_budgets() {
        assert_eq!(
            budget(-1.0, PeriodKind::Monthly).validate(),
            Err(ValidationError::NegativeLimit)
        );
        assert_eq!(
            budget(f64::NAN, PeriodKind::Weekly).validate(),
            Err(ValidationError::NonFiniteLimit)
        );
        assert_eq!(
            budget(10.0, PeriodKind::Unsupported("daily".into())).validate(),
            Err(ValidationError::UnsupportedPeriod("daily".into()))
        );
        assert!(budget(0.0, PeriodKind::Yearly).validate().is_ok());
    }
}
