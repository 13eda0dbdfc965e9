//! Aggregate queries over the catalog
//!
//! Names of countries, companies and franchises match whole list entries
//! (trimmed, ASCII case-insensitive); there is no substring matching.

use chrono::{Datelike, Month, Weekday};
use std::sync::Arc;

use crate::{
    catalog::CatalogStore,
    error::{AppError, AppResult},
    models::{CompanySummary, CountryCount, FranchiseSummary, Movie, MonthCount, ReturnSummary, WeekdayCount},
};

const SPANISH_MONTHS: [&str; 12] = [
    "enero",
    "febrero",
    "marzo",
    "abril",
    "mayo",
    "junio",
    "julio",
    "agosto",
    "septiembre",
    "octubre",
    "noviembre",
    "diciembre",
];

const SPANISH_WEEKDAYS: [(&str, Weekday); 7] = [
    ("lunes", Weekday::Mon),
    ("martes", Weekday::Tue),
    ("miercoles", Weekday::Wed),
    ("jueves", Weekday::Thu),
    ("viernes", Weekday::Fri),
    ("sabado", Weekday::Sat),
    ("domingo", Weekday::Sun),
];

/// Parses `1`–`12`, an English month name or abbreviation, or a Spanish month name
pub fn parse_month(input: &str) -> AppResult<Month> {
    let value = input.trim().to_lowercase();

    if let Ok(number) = value.parse::<u8>() {
        return Month::try_from(number)
            .map_err(|_| AppError::InvalidInput(format!("Month must be between 1 and 12, got {}", number)));
    }

    if let Some(position) = SPANISH_MONTHS.iter().position(|m| *m == value) {
        return Month::try_from(position as u8 + 1)
            .map_err(|_| AppError::Internal(format!("invalid month position {}", position)));
    }

    value
        .parse::<Month>()
        .map_err(|_| AppError::InvalidInput(format!("Unknown month '{}'", input)))
}

/// Parses an English weekday name or abbreviation, or a Spanish weekday name
/// (accents optional)
pub fn parse_weekday(input: &str) -> AppResult<Weekday> {
    let value = strip_spanish_accents(&input.trim().to_lowercase());

    if let Some((_, weekday)) = SPANISH_WEEKDAYS.iter().find(|(name, _)| *name == value) {
        return Ok(*weekday);
    }

    value
        .parse::<Weekday>()
        .map_err(|_| AppError::InvalidInput(format!("Unknown weekday '{}'", input)))
}

fn strip_spanish_accents(value: &str) -> String {
    value
        .chars()
        .map(|c| match c {
            'á' => 'a',
            'é' => 'e',
            'í' => 'i',
            'ó' => 'o',
            'ú' => 'u',
            other => other,
        })
        .collect()
}

fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

fn same_name(a: &str, b: &str) -> bool {
    a.trim().eq_ignore_ascii_case(b.trim())
}

fn lists(values: &[String], name: &str) -> bool {
    values.iter().any(|value| same_name(value, name))
}

fn require_name<'a>(name: &'a str, what: &str) -> AppResult<&'a str> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::InvalidInput(format!("{} cannot be empty", what)));
    }
    Ok(name)
}

/// Counting and revenue aggregates over the movie catalog
#[derive(Clone)]
pub struct AnalyticsService {
    catalog: Arc<dyn CatalogStore>,
}

impl AnalyticsService {
    pub fn new(catalog: Arc<dyn CatalogStore>) -> Self {
        Self { catalog }
    }

    fn movies(&self) -> &[Movie] {
        self.catalog.movies()
    }

    /// Movies released in `month` across all years
    pub fn movies_in_month(&self, month: &str) -> AppResult<MonthCount> {
        let month = parse_month(month)?;
        let count = self
            .movies()
            .iter()
            .filter_map(|m| m.release_date)
            .filter(|d| d.month() == month.number_from_month())
            .count();

        tracing::debug!(month = month.name(), count, "Counted movies by month");
        Ok(MonthCount {
            month: month.name().to_string(),
            count,
        })
    }

    /// Movies released on `day` of the week across all years
    pub fn movies_on_weekday(&self, day: &str) -> AppResult<WeekdayCount> {
        let weekday = parse_weekday(day)?;
        let count = self
            .movies()
            .iter()
            .filter_map(|m| m.release_date)
            .filter(|d| d.weekday() == weekday)
            .count();

        tracing::debug!(weekday = %weekday, count, "Counted movies by weekday");
        Ok(WeekdayCount {
            day: weekday_name(weekday).to_string(),
            count,
        })
    }

    /// Movie count, total and average revenue of a franchise
    pub fn franchise(&self, name: &str) -> AppResult<FranchiseSummary> {
        let name = require_name(name, "Franchise")?;
        let members: Vec<&Movie> = self
            .movies()
            .iter()
            .filter(|m| m.collection.as_deref().is_some_and(|c| same_name(c, name)))
            .collect();

        if members.is_empty() {
            return Err(AppError::NotFound(format!("Franchise '{}' not found", name)));
        }

        let total_revenue: f64 = members.iter().map(|m| m.revenue).sum();
        Ok(FranchiseSummary {
            franchise: name.to_string(),
            count: members.len(),
            total_revenue,
            average_revenue: total_revenue / members.len() as f64,
        })
    }

    /// Movies produced in `country`
    pub fn movies_in_country(&self, country: &str) -> AppResult<CountryCount> {
        let country = require_name(country, "Country")?;
        let count = self
            .movies()
            .iter()
            .filter(|m| lists(&m.production_countries, country))
            .count();

        Ok(CountryCount {
            country: country.to_string(),
            count,
        })
    }

    /// Total revenue and movie count of a production company
    pub fn production_company(&self, company: &str) -> AppResult<CompanySummary> {
        let company = require_name(company, "Production company")?;
        let (count, total_revenue) = self
            .movies()
            .iter()
            .filter(|m| lists(&m.production_companies, company))
            .fold((0, 0.0), |(count, total), m| (count + 1, total + m.revenue));

        Ok(CompanySummary {
            company: company.to_string(),
            total_revenue,
            count,
        })
    }

    /// Budget, revenue and return of a title (first catalog occurrence)
    pub fn movie_return(&self, title: &str) -> AppResult<ReturnSummary> {
        let movie = self
            .catalog
            .index_of_title(title)
            .and_then(|row| self.catalog.movie(row))
            .ok_or_else(|| AppError::NotFound(format!("Movie '{}' not found", title)))?;

        Ok(ReturnSummary {
            title: movie.title.clone(),
            budget: movie.budget,
            revenue: movie.revenue,
            return_ratio: movie.return_ratio(),
            year: movie.year(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::InMemoryCatalog;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn analytics() -> AnalyticsService {
        let movies = vec![
            Movie::new("Toy Story", &["Animation"])
                .with_release_date(date(1995, 10, 30)) // Monday
                .with_companies(&["Pixar Animation Studios"])
                .with_countries(&["United States of America"])
                .with_financials(30_000_000.0, 373_554_033.0)
                .with_collection("Toy Story Collection"),
            Movie::new("Toy Story 2", &["Animation"])
                .with_release_date(date(1999, 10, 30)) // Saturday
                .with_companies(&["Pixar Animation Studios"])
                .with_countries(&["United States of America"])
                .with_financials(90_000_000.0, 497_366_869.0)
                .with_collection("Toy Story Collection"),
            Movie::new("Amelie", &["Romance"])
                .with_release_date(date(2001, 4, 25)) // Wednesday
                .with_companies(&["Canal+"])
                .with_countries(&["France", "Germany"])
                .with_financials(10_000_000.0, 33_225_499.0),
            Movie::new("Lost Reel", &["Drama"]),
        ];
        AnalyticsService::new(Arc::new(InMemoryCatalog::new(movies)))
    }

    #[test]
    fn test_parse_month() {
        assert_eq!(parse_month("10").unwrap(), Month::October);
        assert_eq!(parse_month("octubre").unwrap(), Month::October);
        assert_eq!(parse_month("October").unwrap(), Month::October);
        assert_eq!(parse_month(" ABRIL ").unwrap(), Month::April);
        assert!(matches!(parse_month("13"), Err(AppError::InvalidInput(_))));
        assert!(matches!(parse_month("brumaire"), Err(AppError::InvalidInput(_))));
    }

    #[test]
    fn test_parse_weekday() {
        assert_eq!(parse_weekday("lunes").unwrap(), Weekday::Mon);
        assert_eq!(parse_weekday("Miércoles").unwrap(), Weekday::Wed);
        assert_eq!(parse_weekday("sabado").unwrap(), Weekday::Sat);
        assert_eq!(parse_weekday("Friday").unwrap(), Weekday::Fri);
        assert!(matches!(parse_weekday("someday"), Err(AppError::InvalidInput(_))));
    }

    #[test]
    fn test_movies_in_month() {
        let analytics = analytics();
        assert_eq!(analytics.movies_in_month("octubre").unwrap().count, 2);
        assert_eq!(analytics.movies_in_month("4").unwrap().count, 1);
        assert_eq!(analytics.movies_in_month("January").unwrap().count, 0);
        assert_eq!(analytics.movies_in_month("oct").unwrap().month, "October");
    }

    #[test]
    fn test_movies_on_weekday() {
        let analytics = analytics();
        assert_eq!(analytics.movies_on_weekday("lunes").unwrap().count, 1);
        assert_eq!(analytics.movies_on_weekday("saturday").unwrap().count, 1);
        assert_eq!(analytics.movies_on_weekday("domingo").unwrap().count, 0);
        assert_eq!(analytics.movies_on_weekday("mie").unwrap_err().to_string(), "Invalid input: Unknown weekday 'mie'");
        assert_eq!(analytics.movies_on_weekday("wed").unwrap().day, "Wednesday");
    }

    #[test]
    fn test_franchise() {
        let summary = analytics().franchise("toy story collection").unwrap();
        assert_eq!(summary.count, 2);
        assert_eq!(summary.total_revenue, 870_920_902.0);
        assert_eq!(summary.average_revenue, 435_460_451.0);
    }

    #[test]
    fn test_franchise_requires_exact_name() {
        let result = analytics().franchise("Toy Story");
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[test]
    fn test_movies_in_country_matches_whole_entries() {
        let analytics = analytics();
        assert_eq!(analytics.movies_in_country("France").unwrap().count, 1);
        assert_eq!(analytics.movies_in_country("united states of america").unwrap().count, 2);
        assert_eq!(analytics.movies_in_country("United States").unwrap().count, 0);
        assert!(matches!(analytics.movies_in_country("  "), Err(AppError::InvalidInput(_))));
    }

    #[test]
    fn test_production_company() {
        let summary = analytics().production_company("Pixar Animation Studios").unwrap();
        assert_eq!(summary.count, 2);
        assert_eq!(summary.total_revenue, 870_920_902.0);

        let none = analytics().production_company("Pixar").unwrap();
        assert_eq!(none.count, 0);
        assert_eq!(none.total_revenue, 0.0);
    }

    #[test]
    fn test_movie_return() {
        let analytics = analytics();
        let summary = analytics.movie_return("Amelie").unwrap();
        assert_eq!(summary.budget, 10_000_000.0);
        assert!((summary.return_ratio - 3.3225499).abs() < 1e-9);
        assert_eq!(summary.year, Some(2001));

        let no_budget = analytics.movie_return("Lost Reel").unwrap();
        assert_eq!(no_budget.return_ratio, 0.0);
        assert_eq!(no_budget.year, None);

        assert!(matches!(analytics.movie_return("amelie"), Err(AppError::NotFound(_))));
    }
}
