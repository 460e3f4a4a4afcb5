//! Presentation helpers used when rendering narrative text.

use crate::config::ForecastConfig;

/// Formats currency amounts for presentation.
pub trait AmountFormatter: Send + Sync {
    fn format_amount(&self, amount: f64) -> String;
}

/// Fixed-precision formatter with comma thousands separators and a trailing currency code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlainAmountFormatter {
    pub currency: String,
    pub precision: usize,
}

impl PlainAmountFormatter {
    pub fn new(currency: impl Into<String>, precision: usize) -> Self {
        Self {
            currency: currency.into(),
            precision,
        }
    }

    pub fn from_config(config: &ForecastConfig) -> Self {
        Self::new(config.currency.clone(), config.currency_precision as usize)
    }
}

impl Default for PlainAmountFormatter {
    fn default() -> Self {
        Self::from_config(&ForecastConfig::default())
    }
}

impl AmountFormatter for PlainAmountFormatter {
    fn format_amount(&self, amount: f64) -> String {
        let raw = format!("{:.prec$}", amount.abs(), prec = self.precision);
        let (whole, fraction) = match raw.split_once('.') {
            Some((whole, fraction)) => (whole, Some(fraction)),
            None => (raw.as_str(), None),
        };
        let mut grouped = String::with_capacity(raw.len() + whole.len() / 3 + 1);
        if amount < 0.0 && raw.chars().any(|ch| ch != '0' && ch != '.') {
            grouped.push('-');
        }
        for (idx, ch) in whole.chars().enumerate() {
            if idx > 0 && (whole.len() - idx) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(ch);
        }
        if let Some(fraction) = fraction {
            grouped.push('.');
            grouped.push_str(fraction);
        }
        if self.currency.is_empty() {
            grouped
        } else {
            format!("{} {}", grouped, self.currency)
        }
    }
}
