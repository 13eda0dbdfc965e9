use std::collections::{BTreeSet, HashMap};

use super::{EncodedFeatures, FeatureEncoder, FeatureMatrix, RowMapping, SparseVector};
use crate::{
    catalog::{CatalogStore, Column},
    error::{AppError, AppResult},
};

/// One-hot encoder over genres and production companies
///
/// Produces `[genre block | company block]` per row, one column per distinct
/// label seen anywhere in the catalog (sorted, trimmed). Every row is encoded,
/// including rows with empty lists, which are all-zero in that block.
#[derive(Debug, Clone, Default)]
pub struct CategoricalEncoder;

/// Column layout of one one-hot block
struct OneHotBlock<'a> {
    offset: usize,
    columns: HashMap<&'a str, usize>,
}

impl<'a> OneHotBlock<'a> {
    fn fit(values: &[&'a [String]], offset: usize) -> Self {
        let distinct: BTreeSet<&str> = values
            .iter()
            .copied()
            .flat_map(|labels| labels.iter())
            .map(|label| label.trim())
            .filter(|label| !label.is_empty())
            .collect();

        let columns = distinct
            .into_iter()
            .enumerate()
            .map(|(index, label)| (label, offset + index))
            .collect();

        Self { offset, columns }
    }

    fn width(&self) -> usize {
        self.columns.len()
    }

    fn end(&self) -> usize {
        self.offset + self.width()
    }

    /// Column indices set for one row; repeated labels are set once
    fn active(&self, labels: &[String]) -> BTreeSet<usize> {
        labels
            .iter()
            .filter_map(|label| self.columns.get(label.trim()).copied())
            .collect()
    }
}

impl CategoricalEncoder {
    pub fn new() -> Self {
        Self
    }

    fn labels<'a>(catalog: &'a dyn CatalogStore, column: Column) -> AppResult<Vec<&'a [String]>> {
        catalog
            .column(column)
            .into_labels()
            .ok_or_else(|| AppError::Internal(format!("{:?} column is not a label list", column)))
    }
}

impl FeatureEncoder for CategoricalEncoder {
    fn encode(&self, catalog: &dyn CatalogStore) -> AppResult<EncodedFeatures> {
        if catalog.row_count() == 0 {
            return Err(AppError::EmptyCorpus("catalog has no movies".to_string()));
        }

        let genres = Self::labels(catalog, Column::Genres)?;
        let companies = Self::labels(catalog, Column::ProductionCompanies)?;

        let genre_block = OneHotBlock::fit(&genres, 0);
        let company_block = OneHotBlock::fit(&companies, genre_block.end());

        let rows: Vec<SparseVector> = genres
            .iter()
            .zip(&companies)
            .map(|(g, c)| {
                let pairs = genre_block
                    .active(g)
                    .into_iter()
                    .chain(company_block.active(c))
                    .map(|index| (index, 1.0))
                    .collect();
                SparseVector::from_pairs(pairs)
            })
            .collect();

        let zero_rows = rows.iter().filter(|row| row.is_zero()).count();
        tracing::info!(
            encoder = self.name(),
            rows = rows.len(),
            genres = genre_block.width(),
            companies = company_block.width(),
            zero_rows,
            "Encoded one-hot features"
        );

        Ok(EncodedFeatures {
            matrix: FeatureMatrix::new(company_block.end(), rows),
            mapping: RowMapping::identity(catalog.row_count()),
        })
    }

    fn name(&self) -> &'static str {
        "categorical"
    }
}
