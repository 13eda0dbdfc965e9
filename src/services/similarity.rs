//! Similarity search over a feature matrix
//!
//! Both index types answer the same question: the `k` rows other than the
//! query with the highest cosine similarity, most similar first, ties broken
//! by ascending row index. They differ only in when the work happens:
//! [`PairwiseIndex`] computes every score up front, [`NearestNeighborIndex`]
//! scans the rows on each query.
//!
//! Rows are scaled to unit length at build time, so cosine similarity is a dot
//! product. A zero vector stays zero and scores 0 against everything,
//! including itself.

use serde::Deserialize;
use std::cmp::Ordering;

use super::features::{FeatureMatrix, SparseVector};

/// A candidate row and its cosine similarity to the query row
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    pub row: usize,
    pub score: f64,
}

impl Neighbor {
    /// Cosine distance, `1 - similarity`
    pub fn distance(&self) -> f64 {
        1.0 - self.score
    }
}

/// Immutable "k most similar rows" lookup
#[cfg_attr(test, mockall::automock)]
pub trait SimilarityIndex: Send + Sync {
    /// Number of indexed rows
    fn len(&self) -> usize;

    /// Up to `k` rows most similar to `row`, excluding `row` itself.
    /// Returns fewer when the index is small and nothing for an unknown row.
    fn nearest(&self, row: usize, k: usize) -> Vec<Neighbor>;

    /// Index name for logging
    fn name(&self) -> &'static str;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Index selection, fixed for the lifetime of the process
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndexStrategy {
    /// Precomputed n×n similarity matrix
    Pairwise,
    /// Exact brute-force scan per query
    #[default]
    NearestNeighbor,
}

impl IndexStrategy {
    pub fn build(self, matrix: &FeatureMatrix) -> Box<dyn SimilarityIndex> {
        match self {
            IndexStrategy::Pairwise => Box::new(PairwiseIndex::build(matrix)),
            IndexStrategy::NearestNeighbor => Box::new(NearestNeighborIndex::build(matrix)),
        }
    }
}

/// Descending score, then ascending row
fn rank(a: &Neighbor, b: &Neighbor) -> Ordering {
    b.score.total_cmp(&a.score).then(a.row.cmp(&b.row))
}

/// Full pairwise cosine similarity matrix
///
/// Memory grows with the square of the row count, so this suits small
/// catalogs where query latency matters more than startup cost.
#[derive(Debug, Clone)]
pub struct PairwiseIndex {
    n: usize,
    scores: Vec<f64>,
}

impl PairwiseIndex {
    pub fn build(matrix: &FeatureMatrix) -> Self {
        let rows: Vec<SparseVector> = matrix.rows().iter().map(SparseVector::normalized).collect();
        let n = rows.len();

        let mut scores = vec![0.0; n * n];
        for i in 0..n {
            for j in i..n {
                let score = rows[i].dot(&rows[j]);
                scores[i * n + j] = score;
                scores[j * n + i] = score;
            }
        }

        tracing::info!(rows = n, entries = scores.len(), "Built pairwise similarity matrix");
        Self { n, scores }
    }

}

impl SimilarityIndex for PairwiseIndex {
    fn len(&self) -> usize {
        self.n
    }

    fn nearest(&self, row: usize, k: usize) -> Vec<Neighbor> {
        if row >= self.n || k == 0 {
            return Vec::new();
        }

        let scores = &self.scores[row * self.n..(row + 1) * self.n];
        let mut neighbors: Vec<Neighbor> = scores
            .iter()
            .enumerate()
            .filter(|(candidate, _)| *candidate != row)
            .map(|(candidate, &score)| Neighbor {
                row: candidate,
                score,
            })
            .collect();

        neighbors.sort_by(rank);
        neighbors.truncate(k);
        neighbors
    }

    fn name(&self) -> &'static str {
        "pairwise"
    }
}

/// Exact nearest-neighbor search by cosine distance
///
/// Rows are normalised once at build time; each query is a linear scan.
#[derive(Debug, Clone)]
pub struct NearestNeighborIndex {
    rows: Vec<SparseVector>,
}

impl NearestNeighborIndex {
    pub fn build(matrix: &FeatureMatrix) -> Self {
        let rows: Vec<SparseVector> = matrix.rows().iter().map(SparseVector::normalized).collect();
        tracing::info!(rows = rows.len(), dim = matrix.dim(), "Built nearest-neighbor index");
        Self { rows }
    }

    /// Top `k` rows for an already normalised query
    fn scan(&self, query: &SparseVector, k: usize) -> Vec<Neighbor> {
        let mut neighbors: Vec<Neighbor> = self
            .rows
            .iter()
            .enumerate()
            .map(|(row, candidate)| Neighbor {
                row,
                score: candidate.dot(query),
            })
            .collect();

        if k < neighbors.len() {
            neighbors.select_nth_unstable_by(k, rank);
            neighbors.truncate(k);
        }
        neighbors.sort_by(rank);
        neighbors
    }
}

impl SimilarityIndex for NearestNeighborIndex {
    fn len(&self) -> usize {
        self.rows.len()
    }

    fn nearest(&self, row: usize, k: usize) -> Vec<Neighbor> {
        let Some(query) = self.rows.get(row) else {
            return Vec::new();
        };
        if k == 0 {
            return Vec::new();
        }

        // The query row is normally the first hit; drop it by identity since
        // duplicate vectors can rank ahead of it
        let mut neighbors = self.scan(query, k.saturating_add(1));
        neighbors.retain(|n| n.row != row);
        neighbors.truncate(k);
        neighbors
    }

    fn name(&self) -> &'static str {
        "nearest_neighbor"
    }
}
