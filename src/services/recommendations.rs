use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;

use crate::{
    catalog::CatalogStore,
    error::{AppError, AppResult},
    services::{
        features::{FeatureStrategy, RowMapping},
        similarity::{IndexStrategy, Neighbor, SimilarityIndex},
    },
};

/// Number of recommendations returned when the caller does not ask for a count
pub const DEFAULT_RECOMMENDATIONS: usize = 5;

/// Content-based "similar movies" recommendations
///
/// Built once from a catalog: every movie is encoded into a feature vector
/// and the vectors are indexed for cosine similarity search. The result is
/// immutable, so a single instance can be shared across request handlers
/// without locking.
pub struct RecommendationService {
    catalog: Arc<dyn CatalogStore>,
    mapping: RowMapping,
    index: Box<dyn SimilarityIndex>,
}

impl RecommendationService {
    /// Encodes the catalog and builds the similarity index
    ///
    /// Fails with `EmptyCorpus` when the encoder finds no usable rows.
    pub fn build(
        catalog: Arc<dyn CatalogStore>,
        features: FeatureStrategy,
        index: IndexStrategy,
    ) -> AppResult<Self> {
        let start = Instant::now();
        let encoder = features.encoder();

        let encoded = encoder.encode(catalog.as_ref())?;
        let similarity = index.build(&encoded.matrix);

        tracing::info!(
            encoder = encoder.name(),
            index = similarity.name(),
            catalog_rows = catalog.row_count(),
            indexed_rows = similarity.len(),
            dim = encoded.matrix.dim(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Recommendation engine ready"
        );

        Ok(Self::from_parts(catalog, encoded.mapping, similarity))
    }

    /// Assembles a service from prebuilt parts
    ///
    /// `mapping` must describe the same catalog the index was built from.
    pub fn from_parts(
        catalog: Arc<dyn CatalogStore>,
        mapping: RowMapping,
        index: Box<dyn SimilarityIndex>,
    ) -> Self {
        Self {
            catalog,
            mapping,
            index,
        }
    }

    /// Number of movies that can be queried or recommended
    pub fn indexed_movies(&self) -> usize {
        self.index.len()
    }

    /// Up to `k` titles most similar to `title`, most similar first
    ///
    /// The query title never appears in its own results and no title appears
    /// twice, even when the catalog repeats titles. A small catalog yields a
    /// short list rather than an error.
    #[tracing::instrument(skip(self))]
    pub fn recommend(&self, title: &str, k: usize) -> AppResult<Vec<String>> {
        let catalog_row = self
            .catalog
            .index_of_title(title)
            .ok_or_else(|| AppError::NotFound(format!("Movie '{}' not found", title)))?;

        let feature_row = self.mapping.feature_row(catalog_row).ok_or_else(|| {
            AppError::NotFound(format!(
                "Movie '{}' has no usable features for recommendations",
                title
            ))
        })?;

        if k == 0 {
            return Ok(Vec::new());
        }
        let k = k.min(self.index.len());

        // Duplicate titles can swallow candidates, so widen the request until
        // k distinct titles are found or the index runs out
        let mut wanted = k;
        loop {
            let neighbors = self.index.nearest(feature_row, wanted);
            let exhausted = neighbors.len() < wanted;
            let titles = self.distinct_titles(title, neighbors.iter().map(|n| n.row), k);

            if titles.len() == k || exhausted {
                tracing::debug!(
                    results = titles.len(),
                    candidates = neighbors.len(),
                    closest_distance = neighbors.first().map(Neighbor::distance),
                    "Recommendations computed"
                );
                return Ok(titles);
            }

            wanted = wanted.saturating_mul(2).min(self.index.len());
        }
    }

    /// Maps feature rows to titles in rank order, skipping the query title and repeats
    fn distinct_titles(
        &self,
        query: &str,
        feature_rows: impl Iterator<Item = usize>,
        limit: usize,
    ) -> Vec<String> {
        let mut seen: HashSet<&str> = HashSet::from([query]);
        let mut titles = Vec::new();

        for feature_row in feature_rows {
            let Some(movie) = self
                .mapping
                .catalog_row(feature_row)
                .and_then(|row| self.catalog.movie(row))
            else {
                continue;
            };

            if seen.insert(movie.title.as_str()) {
                titles.push(movie.title.clone());
                if titles.len() == limit {
                    break;
                }
            }
        }

        titles
    }
}
