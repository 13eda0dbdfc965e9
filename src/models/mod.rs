use serde::{Deserialize, Serialize};

pub mod movie;

pub use movie::Movie;

// ============================================================================
// Analytics Responses
// ============================================================================

/// Movies released in a given month, across all years
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MonthCount {
    pub month: String,
    pub count: usize,
}

/// Movies released on a given weekday, across all years
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WeekdayCount {
    pub day: String,
    pub count: usize,
}

/// Movies produced in a country
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CountryCount {
    pub country: String,
    pub count: usize,
}

/// Aggregate figures for one franchise
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FranchiseSummary {
    pub franchise: String,
    pub count: usize,
    pub total_revenue: f64,
    pub average_revenue: f64,
}

/// Aggregate figures for one production company
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CompanySummary {
    pub company: String,
    pub total_revenue: f64,
    pub count: usize,
}

/// Investment and return for a single title
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReturnSummary {
    pub title: String,
    pub budget: f64,
    pub revenue: f64,
    #[serde(rename = "return")]
    pub return_ratio: f64,
    pub year: Option<i32>,
}

// ============================================================================
// Recommendation Responses
// ============================================================================

/// Ranked list of titles similar to the requested one
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecommendationResponse {
    pub title: String,
    pub recommendations: Vec<String>,
}
