//! Forecast pipeline services and the caller-side state that wraps them.

pub mod clock;
pub mod format;
pub mod prediction_store;
pub mod services;

pub use clock::{Clock, FixedClock, SystemClock};
pub use format::{AmountFormatter, PlainAmountFormatter};
pub use prediction_store::{PredictionState, PredictionStore, RefreshToken, SubscriptionId};
