use thiserror::Error;

/// Error type for the failures that can reach a caller of the forecast engine.
///
/// The prediction pipeline itself never returns this type; it is raised by the
/// surrounding layers (configuration, snapshot loading, the prediction store).
#[derive(Debug, Error)]
pub enum ForecastError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Snapshot source failed: {0}")]
    Source(String),
    #[error("Refresh cancelled")]
    Cancelled,
}

pub type Result<T> = std::result::Result<T, ForecastError>;

/// Reasons a budget record is rejected before it enters the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("budget limit must not be negative")]
    NegativeLimit,
    #[error("budget limit must be a finite number")]
    NonFiniteLimit,
    #[error("unsupported budget period `{0}`")]
    UnsupportedPeriod(String),
    #[error("period boundaries fall outside the supported calendar range")]
    DateOutOfRange,
}
