use chrono::{Datelike, NaiveDate};
use serde::Deserialize;
use std::{io::Read, path::Path};

use super::InMemoryCatalog;
use crate::{error::AppResult, models::Movie};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Raw CSV row; every column except `title` may be missing or empty
#[derive(Debug, Deserialize)]
struct MovieRecord {
    title: Option<String>,
    #[serde(default)]
    genres: Option<String>,
    #[serde(default)]
    production_companies: Option<String>,
    #[serde(default)]
    production_countries: Option<String>,
    #[serde(default)]
    budget: Option<String>,
    #[serde(default)]
    revenue: Option<String>,
    #[serde(default)]
    release_date: Option<String>,
    #[serde(default)]
    release_year: Option<String>,
    #[serde(default)]
    collection: Option<String>,
}

impl From<MovieRecord> for Movie {
    fn from(record: MovieRecord) -> Self {
        let release_date = record.release_date.as_deref().and_then(parse_date);

        Movie {
            title: record.title.map(|t| t.trim().to_string()).unwrap_or_default(),
            genres: parse_list(record.genres.as_deref()),
            production_companies: parse_list(record.production_companies.as_deref()),
            production_countries: parse_list(record.production_countries.as_deref()),
            budget: non_negative(record.budget.as_deref().and_then(|v| parse_number(v, "budget"))),
            revenue: non_negative(record.revenue.as_deref().and_then(|v| parse_number(v, "revenue"))),
            release_date,
            release_year: record
                .release_year
                .as_deref()
                .and_then(parse_year)
                .or_else(|| release_date.map(|d| d.year())),
            collection: record
                .collection
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty()),
        }
    }
}

/// Loads the catalog from a CSV file
pub fn load_catalog(path: impl AsRef<Path>) -> AppResult<InMemoryCatalog> {
    let path = path.as_ref();
    tracing::info!(path = %path.display(), "Loading movie catalog");

    let file = std::fs::File::open(path)?;
    let catalog = InMemoryCatalog::from_reader(file)?;

    tracing::info!(rows = catalog.movies.len(), "Movie catalog loaded");
    Ok(catalog)
}

impl InMemoryCatalog {
    /// Reads a headed CSV catalog from any reader, keeping row order
    pub fn from_reader<R: Read>(reader: R) -> AppResult<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::Headers)
            .flexible(true)
            .from_reader(reader);

        let mut movies = Vec::new();
        for result in reader.deserialize::<MovieRecord>() {
            movies.push(Movie::from(result?));
        }

        Ok(Self::new(movies))
    }
}

/// Parses a list cell: either `A|B|C` or a Python-style literal `['A', 'B']`
fn parse_list(raw: Option<&str>) -> Vec<String> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Vec::new();
    };

    let (body, separator) = match raw.strip_prefix('[').and_then(|s| s.strip_suffix(']')) {
        Some(inner) => (inner, ','),
        None => (raw, '|'),
    };

    body.split(separator)
        .map(|item| item.trim().trim_matches(|c| c == '\'' || c == '"').trim())
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    match NaiveDate::parse_from_str(raw, DATE_FORMAT) {
        Ok(date) => Some(date),
        Err(e) => {
            tracing::warn!(value = %raw, error = %e, "Ignoring unparsable release date");
            None
        }
    }
}

fn parse_number(raw: &str, column: &str) -> Option<f64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    match raw.parse::<f64>() {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(column, value = %raw, error = %e, "Ignoring unparsable number");
            None
        }
    }
}

/// Accepts `1995` as well as float exports such as `1995.0`
fn parse_year(raw: &str) -> Option<i32> {
    let value = parse_number(raw, "release_year")?;
    if value.fract() != 0.0 || value < i32::MIN as f64 || value > i32::MAX as f64 {
        tracing::warn!(value = %raw.trim(), "Ignoring invalid release year");
        return None;
    }
    Some(value as i32)
}

fn non_negative(value: Option<f64>) -> f64 {
    value.filter(|v| v.is_finite()).unwrap_or(0.0).max(0.0)
}
