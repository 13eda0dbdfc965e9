pub mod analytics;
pub mod features;
pub mod recommendations;
pub mod similarity;

pub use analytics::AnalyticsService;
pub use recommendations::{RecommendationService, DEFAULT_RECOMMENDATIONS};
