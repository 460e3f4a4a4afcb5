pub mod confidence_service;
pub mod prediction_service;
pub mod projection_service;
pub mod recommendation_service;
pub mod risk_service;
pub mod spend_service;

pub use confidence_service::ConfidenceService;
pub use prediction_service::{
    BudgetPrediction, PredictionOptions, PredictionReport, PredictionService, SkippedBudget,
};
pub use projection_service::{Projection, ProjectionService};
pub use recommendation_service::{InsightContext, RecommendationService};
pub use risk_service::{RiskLevel, RiskService};
pub use spend_service::{SpendService, SpendTotals};

#[cfg(test)]
mod tests;
