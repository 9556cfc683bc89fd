use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

use crate::TokenFrequency;

/// keep document count and per-term document frequency
///
/// Built with rayon `fold`/`reduce`: every worker fills its own
/// `CorpusStats` and the partial results are merged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CorpusStats {
    /// number of documents added
    doc_num: u64,
    /// number of documents each term appears in
    term_counts: IndexMap<Box<str>, u64>,
}

impl CorpusStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one document's unique terms
    pub fn add_set<T>(&mut self, terms: &[T]) -> &mut Self
    where
        T: AsRef<str>,
    {
        self.doc_num += 1;
        for term in terms {
            *self.term_counts.entry(term.as_ref().into()).or_insert(0) += 1;
        }
        self
    }

    /// Add a document from its term frequencies
    pub fn add_freq(&mut self, freq: &TokenFrequency) -> &mut Self {
        self.add_set(&freq.token_set_ref_str())
    }

    /// Merge another partial result into self
    pub fn merge_corpus(mut self, other: CorpusStats) -> Self {
        self.doc_num += other.doc_num;
        for (term, count) in other.term_counts {
            *self.term_counts.entry(term).or_insert(0) += count;
        }
        self
    }

    /// Get the number of documents in the corpus
    #[inline]
    pub fn get_doc_num(&self) -> u64 {
        self.doc_num
    }

    /// Get the number of documents containing `term`
    #[inline]
    pub fn get_term_count(&self, term: &str) -> u64 {
        self.term_counts.get(term).copied().unwrap_or(0)
    }

    /// Get the current vocabulary size (number of unique terms)
    #[inline]
    pub fn vocab_size(&self) -> usize {
        self.term_counts.len()
    }

    /// All terms in lexicographic order; position = feature column
    pub fn sorted_vocabulary(&self) -> IndexSet<Box<str>> {
        let mut terms: Vec<Box<str>> = self.term_counts.keys().cloned().collect();
        terms.sort_unstable();
        terms.into_iter().collect()
    }
}
