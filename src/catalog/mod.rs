use chrono::NaiveDate;
use std::collections::HashMap;

use crate::models::Movie;

pub mod loader;

pub use loader::load_catalog;

/// Named catalog columns available for bulk access
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Title,
    Genres,
    ProductionCompanies,
    ProductionCountries,
    Budget,
    Revenue,
    ReleaseDate,
    ReleaseYear,
    Collection,
}

/// Column values aligned to catalog order
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData<'a> {
    Text(Vec<&'a str>),
    OptionalText(Vec<Option<&'a str>>),
    Labels(Vec<&'a [String]>),
    Number(Vec<f64>),
    Date(Vec<Option<NaiveDate>>),
    Year(Vec<Option<i32>>),
}

impl<'a> ColumnData<'a> {
    pub fn into_text(self) -> Option<Vec<&'a str>> {
        match self {
            ColumnData::Text(values) => Some(values),
            _ => None,
        }
    }

    pub fn into_labels(self) -> Option<Vec<&'a [String]>> {
        match self {
            ColumnData::Labels(values) => Some(values),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ColumnData::Text(v) => v.len(),
            ColumnData::OptionalText(v) => v.len(),
            ColumnData::Labels(v) => v.len(),
            ColumnData::Number(v) => v.len(),
            ColumnData::Date(v) => v.len(),
            ColumnData::Year(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Read-only access to the movie catalog
///
/// Row indices are positions in catalog order, which is fixed at load time.
/// Everything derived from the catalog (feature matrices, similarity indexes)
/// is aligned to that order.
pub trait CatalogStore: Send + Sync {
    /// All rows in catalog order
    fn movies(&self) -> &[Movie];

    /// Row index of the first movie whose title matches exactly (case-sensitive)
    fn index_of_title(&self, title: &str) -> Option<usize>;

    fn row_count(&self) -> usize {
        self.movies().len()
    }

    fn movie(&self, row: usize) -> Option<&Movie> {
        self.movies().get(row)
    }

    /// Bulk access to one column
    fn column(&self, column: Column) -> ColumnData<'_> {
        let movies = self.movies();
        match column {
            Column::Title => ColumnData::Text(movies.iter().map(|m| m.title.as_str()).collect()),
            Column::Genres => ColumnData::Labels(movies.iter().map(|m| m.genres.as_slice()).collect()),
            Column::ProductionCompanies => ColumnData::Labels(
                movies.iter().map(|m| m.production_companies.as_slice()).collect(),
            ),
            Column::ProductionCountries => ColumnData::Labels(
                movies.iter().map(|m| m.production_countries.as_slice()).collect(),
            ),
            Column::Budget => ColumnData::Number(movies.iter().map(|m| m.budget).collect()),
            Column::Revenue => ColumnData::Number(movies.iter().map(|m| m.revenue).collect()),
            Column::ReleaseDate => ColumnData::Date(movies.iter().map(|m| m.release_date).collect()),
            Column::ReleaseYear => ColumnData::Year(movies.iter().map(|m| m.year()).collect()),
            Column::Collection => ColumnData::OptionalText(
                movies.iter().map(|m| m.collection.as_deref()).collect(),
            ),
        }
    }
}

/// Catalog held entirely in memory
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    movies: Vec<Movie>,
    title_index: HashMap<String, usize>,
}

impl InMemoryCatalog {
    /// Creates a catalog, indexing the first occurrence of every title
    pub fn new(movies: Vec<Movie>) -> Self {
        let mut title_index = HashMap::with_capacity(movies.len());
        for (row, movie) in movies.iter().enumerate() {
            title_index.entry(movie.title.clone()).or_insert(row);
        }

        let duplicates = movies.len() - title_index.len();
        if duplicates > 0 {
            tracing::debug!(duplicates, "Catalog contains duplicate titles; lookups use the first row");
        }

        Self {
            movies,
            title_index,
        }
    }
}

impl CatalogStore for InMemoryCatalog {
    fn movies(&self) -> &[Movie] {
        &self.movies
    }

    fn index_of_title(&self, title: &str) -> Option<usize> {
        self.title_index.get(title).copied()
    }
}
