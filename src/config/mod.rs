//! Tunable forecast parameters and their on-disk persistence.

use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::errors::ForecastError;
use crate::utils::{app_data_dir, ensure_dir};

const CONFIG_FILE: &str = "config.json";
const TMP_SUFFIX: &str = "tmp";

/// Engine settings. Every field falls back to its default when absent from the file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ForecastConfig {
    pub currency: String,
    pub currency_precision: u8,
    pub risk: RiskThresholds,
    pub confidence: ConfidenceSettings,
    pub seasonal: SeasonalSettings,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            currency: "USD".into(),
            currency_precision: 2,
            risk: RiskThresholds::default(),
            confidence: ConfidenceSettings::default(),
            seasonal: SeasonalSettings::default(),
        }
    }
}

impl ForecastConfig {
    pub fn validate(&self) -> Result<(), ForecastError> {
        let risk = &self.risk;
        if !risk.medium.is_finite() || !risk.high.is_finite() {
            return Err(ForecastError::Config(
                "risk thresholds must be finite".into(),
            ));
        }
        if risk.medium <= 0.0 || risk.medium > risk.high {
            return Err(ForecastError::Config(format!(
                "risk thresholds must satisfy 0 < medium <= high (got {} / {})",
                risk.medium, risk.high
            )));
        }
        let confidence = &self.confidence;
        if confidence.min_days == 0 || confidence.min_transactions == 0 {
            return Err(ForecastError::Config(
                "confidence minimums must be at least 1".into(),
            ));
        }
        if !(0.0..=1.0).contains(&confidence.maturity_ratio)
            || !(0.0..=1.0).contains(&confidence.empty_data_floor)
        {
            return Err(ForecastError::Config(
                "confidence ratios must lie within [0, 1]".into(),
            ));
        }
        let deviation = self.seasonal.deviation_threshold;
        if !deviation.is_finite() || deviation <= 0.0 {
            return Err(ForecastError::Config(
                "seasonal deviation threshold must be positive".into(),
            ));
        }
        Ok(())
    }
}

/// Projected-to-limit ratios at which a budget enters each risk band.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RiskThresholds {
    pub medium: f64,
    pub high: f64,
}

impl Default for RiskThresholds {
    fn default() -> Self {
        Self {
            medium: 0.85,
            high: 1.0,
        }
    }
}

/// Constants for the data-maturity confidence score.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ConfidenceSettings {
    /// Lower bound on the number of days needed for full maturity.
    pub min_days: u32,
    /// Share of the period that must elapse for full maturity.
    pub maturity_ratio: f64,
    /// Transactions needed before the data weight saturates.
    pub min_transactions: u32,
    /// Weight kept by a projection with no transactions behind it.
    pub empty_data_floor: f64,
}

impl Default for ConfidenceSettings {
    fn default() -> Self {
        Self {
            min_days: 3,
            maturity_ratio: 0.1,
            min_transactions: 3,
            empty_data_floor: 0.5,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SeasonalSettings {
    /// Relative pace difference against the prior period that triggers a note.
    pub deviation_threshold: f64,
}

impl Default for SeasonalSettings {
    fn default() -> Self {
        Self {
            deviation_threshold: 0.2,
        }
    }
}

/// Loads and saves [`ForecastConfig`] as JSON.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    /// Manager rooted at the application data directory.
    pub fn new() -> Result<Self, ForecastError> {
        Self::with_base_dir(app_data_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self, ForecastError> {
        ensure_dir(&base)?;
        Ok(Self {
            path: base.join(CONFIG_FILE),
        })
    }

    /// Reads the config, returning defaults when no file exists yet.
    pub fn load(&self) -> Result<ForecastConfig, ForecastError> {
        if !self.path.exists() {
            return Ok(ForecastConfig::default());
        }
        let data = fs::read_to_string(&self.path)?;
        let config: ForecastConfig = serde_json::from_str(&data)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, config: &ForecastConfig) -> Result<(), ForecastError> {
        config.validate()?;
        if let Some(parent) = self.path.parent() {
            ensure_dir(parent)?;
        }
        let json = serde_json::to_string_pretty(config)?;
        let tmp = tmp_path(&self.path);
        write_atomic(&tmp, &json)?;
        fs::rename(&tmp, &self.path)?;
        tracing::debug!(path = %self.path.display(), "saved forecast config");
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<(), ForecastError> {
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempdir().expect("tempdir");
        let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).unwrap();
        assert_eq!(manager.load().unwrap(), ForecastConfig::default());
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempdir().expect("tempdir");
        let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).unwrap();
        fs::write(manager.path(), r#"{"currency":"EUR","risk":{"medium":0.8}}"#).unwrap();
        let config = manager.load().expect("load partial config");
        assert_eq!(config.currency, "EUR");
        assert_eq!(config.risk.medium, 0.8);
        assert_eq!(config.risk.high, 1.0);
        assert_eq!(config.confidence, ConfidenceSettings::default());
    }

    #[test]
    fn legacy_locale_key_is_ignored_and_not_written_back() {
        let dir = tempdir().expect("tempdir");
        let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).unwrap();
        fs::write(manager.path(), r#"{"locale":"pt-PT","currency":"EUR"}"#).unwrap();
        let config = manager.load().expect("load config with stale key");
        assert_eq!(config.currency, "EUR");

        manager.save(&config).expect("save");
        let written = fs::read_to_string(manager.path()).unwrap();
        assert!(!written.contains("locale"));
    }

    #[test]
    fn inverted_thresholds_are_rejected() {
        let mut config = ForecastConfig::default();
        config.risk = RiskThresholds {
            medium: 1.2,
            high: 1.0,
        };
        let err = config.validate().expect_err("inverted thresholds");
        assert!(format!("{err}").contains("medium <= high"));
    }

    #[test]
    fn save_leaves_no_temp_file_behind() {
        let dir = tempdir().expect("tempdir");
        let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).unwrap();
        manager.save(&ForecastConfig::default()).expect("save");
        assert!(manager.path().exists());
        assert!(!tmp_path(manager.path()).exists());
    }
}
