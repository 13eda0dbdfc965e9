use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// One catalog row
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Movie {
    /// Display title, used as the lookup key
    pub title: String,
    /// Genre labels, possibly empty
    pub genres: Vec<String>,
    pub production_companies: Vec<String>,
    pub production_countries: Vec<String>,
    /// Production budget (non-negative)
    pub budget: f64,
    /// Box office revenue (non-negative)
    pub revenue: f64,
    pub release_date: Option<NaiveDate>,
    pub release_year: Option<i32>,
    /// Franchise name; `None` means standalone
    pub collection: Option<String>,
}

impl Movie {
    /// Creates a movie with only a title and genres, everything else empty
    pub fn new(title: impl Into<String>, genres: &[&str]) -> Self {
        Self {
            title: title.into(),
            genres: genres.iter().map(|g| g.to_string()).collect(),
            ..Default::default()
        }
    }

    pub fn with_companies(mut self, companies: &[&str]) -> Self {
        self.production_companies = companies.iter().map(|c| c.to_string()).collect();
        self
    }

    pub fn with_countries(mut self, countries: &[&str]) -> Self {
        self.production_countries = countries.iter().map(|c| c.to_string()).collect();
        self
    }

    pub fn with_financials(mut self, budget: f64, revenue: f64) -> Self {
        self.budget = budget;
        self.revenue = revenue;
        self
    }

    pub fn with_release_date(mut self, date: NaiveDate) -> Self {
        self.release_date = Some(date);
        self.release_year = Some(date.year());
        self
    }

    pub fn with_collection(mut self, collection: impl Into<String>) -> Self {
        self.collection = Some(collection.into());
        self
    }

    /// Release year, falling back to the release date's year
    pub fn year(&self) -> Option<i32> {
        self.release_year
            .or_else(|| self.release_date.map(|d| d.year()))
    }

    /// Revenue over budget; 0 when there is no budget to divide by
    pub fn return_ratio(&self) -> f64 {
        if self.budget > 0.0 {
            self.revenue / self.budget
        } else {
            0.0
        }
    }
}
