use indexmap::IndexSet;
use num::Num;
use serde::{Deserialize, Serialize};

use crate::{error::{Error, Result}, utils::math::vector::SparseVec};

/// TF-IDF feature matrix
/// row `i` is the L2-normalized TF-IDF vector of document `i`;
/// column `j` is the `j`-th term of the (sorted) vocabulary.
/// Immutable once built.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureMatrix<N = f32> {
    rows: Vec<SparseVec<N>>,
    vocabulary: IndexSet<Box<str>>,
    idf: Vec<N>,
}

impl<N> FeatureMatrix<N>
where
    N: Num + Copy,
{
    pub(crate) fn new(rows: Vec<SparseVec<N>>, vocabulary: IndexSet<Box<str>>, idf: Vec<N>) -> Self {
        debug_assert_eq!(vocabulary.len(), idf.len());
        debug_assert!(rows.iter().all(|r| r.len() == vocabulary.len()));
        Self { rows, vocabulary, idf }
    }

    /// number of documents
    #[inline]
    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    /// vocabulary size
    #[inline]
    pub fn n_cols(&self) -> usize {
        self.vocabulary.len()
    }

    pub fn row(&self, index: usize) -> Result<&SparseVec<N>> {
        self.rows.get(index).ok_or(Error::OutOfRange {
            index,
            len: self.rows.len(),
        })
    }

    pub fn vocabulary(&self) -> &IndexSet<Box<str>> {
        &self.vocabulary
    }

    pub fn idf(&self) -> &[N] {
        &self.idf
    }

    /// column index of `term`, if it is in the vocabulary
    pub fn term_index(&self, term: &str) -> Option<usize> {
        self.vocabulary.get_index_of(term)
    }

    /// The `k` highest weighted terms of row `index`, heaviest first.
    /// Ties are broken by vocabulary order.
    pub fn top_terms(&self, index: usize, k: usize) -> Result<Vec<(&str, f64)>>
    where
        N: Into<f64>,
    {
        let row = self.row(index)?;
        let mut weighted: Vec<(usize, f64)> = row.iter().map(|(idx, val)| (idx, val.into())).collect();
        weighted.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
        Ok(weighted
            .into_iter()
            .take(k)
            .filter_map(|(idx, w)| self.vocabulary.get_index(idx).map(|t| (&**t, w)))
            .collect())
    }
}
