use regex::Regex;
use std::collections::{BTreeMap, HashMap};
use std::sync::LazyLock;

use super::{stopwords, EncodedFeatures, FeatureEncoder, FeatureMatrix, RowMapping, SparseVector};
use crate::{
    catalog::{CatalogStore, Column},
    error::{AppError, AppResult},
};

/// Word tokens of two or more characters
static TOKEN_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\w\w+\b").expect("token pattern is valid"));

/// TF-IDF encoder over `title + genres`
///
/// Each usable row becomes one document. Weights are
/// `tf(t, d) * (ln((1 + n) / (1 + df(t))) + 1)` and every row is scaled to
/// unit length. Rows with an empty title or no genres are left out of the
/// corpus entirely, so they can neither be queried nor recommended.
#[derive(Debug, Clone, Default)]
pub struct TextEncoder;

impl TextEncoder {
    pub fn new() -> Self {
        Self
    }

    /// Lowercased, stop-word-free tokens of a document
    fn tokenize(document: &str) -> Vec<String> {
        let lowered = document.to_lowercase();
        TOKEN_PATTERN
            .find_iter(&lowered)
            .map(|m| m.as_str())
            .filter(|token| !stopwords::is_stop_word(token))
            .map(str::to_string)
            .collect()
    }
}

impl FeatureEncoder for TextEncoder {
    fn encode(&self, catalog: &dyn CatalogStore) -> AppResult<EncodedFeatures> {
        let titles = catalog
            .column(Column::Title)
            .into_text()
            .ok_or_else(|| AppError::Internal("title column is not text".to_string()))?;
        let genres = catalog
            .column(Column::Genres)
            .into_labels()
            .ok_or_else(|| AppError::Internal("genres column is not a label list".to_string()))?;

        let mut kept = Vec::new();
        let mut documents: Vec<Vec<String>> = Vec::new();
        for (row, (title, labels)) in titles.iter().zip(&genres).enumerate() {
            let labels: Vec<&str> = labels
                .iter()
                .map(|g| g.trim())
                .filter(|g| !g.is_empty())
                .collect();
            if title.trim().is_empty() || labels.is_empty() {
                continue;
            }

            kept.push(row);
            documents.push(Self::tokenize(&format!("{} {}", title, labels.join(" "))));
        }

        if documents.is_empty() {
            return Err(AppError::EmptyCorpus(
                "no movie has both a title and genres".to_string(),
            ));
        }

        // Document frequency per term; BTreeMap keeps the vocabulary sorted
        let mut doc_freq: BTreeMap<&str, usize> = BTreeMap::new();
        for tokens in &documents {
            let mut seen: Vec<&str> = tokens.iter().map(String::as_str).collect();
            seen.sort_unstable();
            seen.dedup();
            for term in seen {
                *doc_freq.entry(term).or_insert(0) += 1;
            }
        }

        if doc_freq.is_empty() {
            return Err(AppError::EmptyCorpus(
                "no terms left after stop-word removal".to_string(),
            ));
        }

        let n_docs = documents.len() as f64;
        let vocabulary: HashMap<&str, usize> = doc_freq
            .keys()
            .enumerate()
            .map(|(index, term)| (*term, index))
            .collect();
        let idf: Vec<f64> = doc_freq
            .values()
            .map(|&df| ((1.0 + n_docs) / (1.0 + df as f64)).ln() + 1.0)
            .collect();

        let rows: Vec<SparseVector> = documents
            .iter()
            .map(|tokens| {
                let pairs = tokens
                    .iter()
                    .filter_map(|t| vocabulary.get(t.as_str()))
                    .map(|&index| (index, idf[index]))
                    .collect();
                SparseVector::from_pairs(pairs).normalized()
            })
            .collect();

        tracing::info!(
            encoder = self.name(),
            documents = rows.len(),
            excluded = catalog.row_count() - rows.len(),
            vocabulary = idf.len(),
            "Encoded TF-IDF features"
        );

        Ok(EncodedFeatures {
            matrix: FeatureMatrix::new(idf.len(), rows),
            mapping: RowMapping::from_kept(catalog.row_count(), kept),
        })
    }

    fn name(&self) -> &'static str {
        "text"
    }
}
