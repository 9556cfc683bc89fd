pub mod corpus;
pub mod matrix;
pub mod stop_words;
pub mod tfidf;
pub mod token;

use std::{marker::PhantomData, ops::MulAssign};

use num::Float;
use rayon::prelude::*;
use tracing::debug;

use crate::vectorizer::{corpus::CorpusStats, matrix::FeatureMatrix, tfidf::{DefaultTfidfEngine, TfidfEngine}, token::TokenFrequency};

/// Fits a vocabulary on a whole corpus and turns it into a `FeatureMatrix`.
///
/// `TfidfVectorizer<N, E>` has the following generic parameters:
/// - `N`: matrix value type (`f32` or `f64`)
/// - `E`: TF-IDF calculation engine (e.g. `DefaultTfidfEngine`)
///
/// Work is spread over the current rayon pool; run it inside
/// `ThreadPool::install` to bound the number of workers.
#[derive(Debug, Clone, Copy, Default)]
pub struct TfidfVectorizer<N = f32, E = DefaultTfidfEngine>
where
    N: Float,
    E: TfidfEngine<N>,
{
    _marker: PhantomData<(N, E)>,
}

impl<N, E> TfidfVectorizer<N, E>
where
    N: Float + MulAssign + Send + Sync,
    E: TfidfEngine<N>,
{
    pub fn new() -> Self {
        Self { _marker: PhantomData }
    }

    /// Build the vocabulary from `docs` and vectorize every document.
    /// Row `i` of the result corresponds to `docs[i]`.
    pub fn fit_transform<S>(&self, docs: &[S]) -> FeatureMatrix<N>
    where
        S: AsRef<str> + Sync,
    {
        let freqs: Vec<TokenFrequency> = docs
            .par_iter()
            .map(|doc| TokenFrequency::from_text(doc.as_ref()))
            .collect();

        let stats = freqs
            .par_iter()
            .fold(CorpusStats::new, |mut stats, freq| {
                stats.add_freq(freq);
                stats
            })
            .reduce(CorpusStats::new, CorpusStats::merge_corpus);

        let vocabulary = stats.sorted_vocabulary();
        let idf = E::idf_vec(&stats, &vocabulary);
        debug!(docs = stats.get_doc_num(), vocab = vocabulary.len(), "vocabulary fitted");

        let rows = freqs
            .par_iter()
            .map(|freq| {
                let mut row = E::tf_vec(freq, &vocabulary);
                row.hadamard_dense(&idf);
                row.normalize_l2();
                row.shrink_to_fit();
                row
            })
            .collect();

        FeatureMatrix::new(rows, vocabulary, idf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_are_unit_length_or_zero() {
        let docs = ["cat dog cat", "dog bird", "the of and", "zebra"];
        let matrix = TfidfVectorizer::<f64>::new().fit_transform(&docs);
        assert_eq!(matrix.n_rows(), 4);
        assert_eq!(matrix.n_cols(), 4);
        for i in [0, 1, 3] {
            let sq: f64 = matrix.row(i).unwrap().norm_sq();
            assert!((sq - 1.0).abs() < 1e-9, "row {i} norm^2 = {sq}");
        }
        assert!(matrix.row(2).unwrap().is_zero());
    }

    #[test]
    fn rarer_terms_weigh_more() {
        let docs = ["cat dog", "cat", "cat"];
        let matrix = TfidfVectorizer::<f32>::new().fit_transform(&docs);
        let top = matrix.top_terms(0, 2).unwrap();
        assert_eq!(top[0].0, "dog");
        assert_eq!(top[1].0, "cat");
        assert!(top[0].1 > top[1].1);
    }

    #[test]
    fn out_of_range_row() {
        let matrix = TfidfVectorizer::<f32>::new().fit_transform(&["cat"]);
        assert!(matches!(
            matrix.row(1),
            Err(crate::Error::OutOfRange { index: 1, len: 1 })
        ));
    }
}
