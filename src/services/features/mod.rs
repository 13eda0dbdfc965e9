//! Feature encoding
//!
//! Turns catalog rows into fixed-length numeric vectors for similarity search.
//! Two encoders are available and the choice is made once, at build time:
//!
//! - [`TextEncoder`]: TF-IDF over each movie's title and genres
//! - [`CategoricalEncoder`]: one-hot genres concatenated with one-hot production companies
//!
//! Vectors are stored sparse since both encodings are almost entirely zeros.

use serde::Deserialize;

use crate::{catalog::CatalogStore, error::AppResult};

pub mod categorical;
pub mod stopwords;
pub mod text;

pub use categorical::CategoricalEncoder;
pub use text::TextEncoder;

/// Sparse vector with strictly increasing indices
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseVector {
    indices: Vec<usize>,
    values: Vec<f64>,
}

impl SparseVector {
    /// Builds a vector from `(index, value)` pairs, summing repeated indices and
    /// dropping zeros
    pub fn from_pairs(mut pairs: Vec<(usize, f64)>) -> Self {
        pairs.sort_by_key(|(index, _)| *index);

        let mut indices: Vec<usize> = Vec::with_capacity(pairs.len());
        let mut values: Vec<f64> = Vec::with_capacity(pairs.len());
        for (index, value) in pairs {
            match indices.last() {
                Some(&last) if last == index => {
                    if let Some(v) = values.last_mut() {
                        *v += value;
                    }
                }
                _ => {
                    indices.push(index);
                    values.push(value);
                }
            }
        }

        let (indices, values) = indices
            .into_iter()
            .zip(values)
            .filter(|(_, v)| *v != 0.0)
            .unzip();

        Self { indices, values }
    }

    /// Number of stored (non-zero) entries
    pub fn nnz(&self) -> usize {
        self.indices.len()
    }

    pub fn is_zero(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.indices.iter().copied().zip(self.values.iter().copied())
    }

    /// Value at `index`, zero when not stored
    pub fn get(&self, index: usize) -> f64 {
        self.indices
            .binary_search(&index)
            .map(|pos| self.values[pos])
            .unwrap_or(0.0)
    }

    pub fn dot(&self, other: &SparseVector) -> f64 {
        let (mut i, mut j) = (0, 0);
        let mut sum = 0.0;
        while i < self.indices.len() && j < other.indices.len() {
            match self.indices[i].cmp(&other.indices[j]) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    sum += self.values[i] * other.values[j];
                    i += 1;
                    j += 1;
                }
            }
        }
        sum
    }

    pub fn norm(&self) -> f64 {
        self.values.iter().map(|v| v * v).sum::<f64>().sqrt()
    }

    /// Scales to unit L2 norm; a zero vector stays zero
    pub fn normalized(&self) -> SparseVector {
        let norm = self.norm();
        if norm == 0.0 {
            return self.clone();
        }
        SparseVector {
            indices: self.indices.clone(),
            values: self.values.iter().map(|v| v / norm).collect(),
        }
    }
}

/// One vector per encoded row, all of the same dimensionality
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureMatrix {
    dim: usize,
    rows: Vec<SparseVector>,
}

impl FeatureMatrix {
    pub fn new(dim: usize, rows: Vec<SparseVector>) -> Self {
        debug_assert!(rows
            .iter()
            .all(|row| row.indices.last().map_or(true, |&last| last < dim)));
        Self { dim, rows }
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row(&self, index: usize) -> Option<&SparseVector> {
        self.rows.get(index)
    }

    pub fn rows(&self) -> &[SparseVector] {
        &self.rows
    }
}

/// Translation between catalog rows and feature-matrix rows
///
/// Identity for encoders that keep every row; the text encoder drops rows
/// without usable text, so those catalog rows have no feature row.
#[derive(Debug, Clone, PartialEq)]
pub struct RowMapping {
    catalog_to_feature: Vec<Option<usize>>,
    feature_to_catalog: Vec<usize>,
}

impl RowMapping {
    pub fn identity(rows: usize) -> Self {
        Self {
            catalog_to_feature: (0..rows).map(Some).collect(),
            feature_to_catalog: (0..rows).collect(),
        }
    }

    /// Mapping for a catalog of `catalog_rows` rows where only `kept`
    /// (ascending catalog indices) were encoded
    pub fn from_kept(catalog_rows: usize, kept: Vec<usize>) -> Self {
        let mut catalog_to_feature = vec![None; catalog_rows];
        for (feature_row, &catalog_row) in kept.iter().enumerate() {
            catalog_to_feature[catalog_row] = Some(feature_row);
        }
        Self {
            catalog_to_feature,
            feature_to_catalog: kept,
        }
    }

    pub fn feature_row(&self, catalog_row: usize) -> Option<usize> {
        self.catalog_to_feature.get(catalog_row).copied().flatten()
    }

    pub fn catalog_row(&self, feature_row: usize) -> Option<usize> {
        self.feature_to_catalog.get(feature_row).copied()
    }

    /// Number of encoded rows
    pub fn len(&self) -> usize {
        self.feature_to_catalog.len()
    }

    pub fn is_empty(&self) -> bool {
        self.feature_to_catalog.is_empty()
    }
}

/// Output of an encoder: the matrix plus its alignment to the catalog
#[derive(Debug, Clone)]
pub struct EncodedFeatures {
    pub matrix: FeatureMatrix,
    pub mapping: RowMapping,
}

/// Turns a whole catalog into a feature matrix
pub trait FeatureEncoder: Send + Sync {
    /// Encodes every usable row; fails with `EmptyCorpus` when none are usable
    fn encode(&self, catalog: &dyn CatalogStore) -> AppResult<EncodedFeatures>;

    /// Encoder name for logging
    fn name(&self) -> &'static str;
}

/// Encoder selection, fixed for the lifetime of the process
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureStrategy {
    /// TF-IDF over title and genres
    Text,
    /// One-hot genres and production companies
    #[default]
    Categorical,
}

impl FeatureStrategy {
    pub fn encoder(self) -> Box<dyn FeatureEncoder> {
        match self {
            FeatureStrategy::Text => Box::new(TextEncoder::new()),
            FeatureStrategy::Categorical => Box::new(CategoricalEncoder::new()),
        }
    }
}
