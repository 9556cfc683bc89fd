use indexmap::IndexSet;
use num::Num;

use crate::{utils::math::vector::SparseVec, vectorizer::{corpus::CorpusStats, token::TokenFrequency}};

pub trait TfidfEngine<N>
where
    N: Num + Copy,
{
    /// IDFベクトルを生成するメソッド
    /// # Arguments
    /// * `corpus` - コーパスの文書頻度
    /// * `vocab` - 語彙 (位置 = 次元)
    /// # Returns
    /// * `Vec<N>` - IDFベクトル
    fn idf_vec(corpus: &CorpusStats, vocab: &IndexSet<Box<str>>) -> Vec<N>;
    /// TFベクトルを生成するメソッド
    /// 語彙に無い token は無視されます
    fn tf_vec(freq: &TokenFrequency, vocab: &IndexSet<Box<str>>) -> SparseVec<N>;
}

/// デフォルトのTF-IDFエンジン
/// tf = 出現回数, idf = ln((1 + n) / (1 + df)) + 1
/// `f32`、`f64`の型に対応
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultTfidfEngine;

impl DefaultTfidfEngine {
    #[inline]
    fn smooth_idf(doc_num: u64, doc_freq: u64) -> f64 {
        ((1.0 + doc_num as f64) / (1.0 + doc_freq as f64)).ln() + 1.0
    }

    fn raw_counts(freq: &TokenFrequency, vocab: &IndexSet<Box<str>>) -> Vec<(usize, u32)> {
        freq.iter()
            .filter_map(|(token, count)| vocab.get_index_of(token).map(|idx| (idx, count)))
            .collect()
    }
}

impl TfidfEngine<f32> for DefaultTfidfEngine {
    fn idf_vec(corpus: &CorpusStats, vocab: &IndexSet<Box<str>>) -> Vec<f32> {
        let doc_num = corpus.get_doc_num();
        vocab
            .iter()
            .map(|term| Self::smooth_idf(doc_num, corpus.get_term_count(term)) as f32)
            .collect()
    }

    fn tf_vec(freq: &TokenFrequency, vocab: &IndexSet<Box<str>>) -> SparseVec<f32> {
        let pairs = Self::raw_counts(freq, vocab)
            .into_iter()
            .map(|(idx, count)| (idx, count as f32));
        SparseVec::from_pairs(vocab.len(), pairs)
    }
}

impl TfidfEngine<f64> for DefaultTfidfEngine {
    fn idf_vec(corpus: &CorpusStats, vocab: &IndexSet<Box<str>>) -> Vec<f64> {
        let doc_num = corpus.get_doc_num();
        vocab
            .iter()
            .map(|term| Self::smooth_idf(doc_num, corpus.get_term_count(term)))
            .collect()
    }

    fn tf_vec(freq: &TokenFrequency, vocab: &IndexSet<Box<str>>) -> SparseVec<f64> {
        let pairs = Self::raw_counts(freq, vocab)
            .into_iter()
            .map(|(idx, count)| (idx, count as f64));
        SparseVec::from_pairs(vocab.len(), pairs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (CorpusStats, IndexSet<Box<str>>) {
        let mut stats = CorpusStats::new();
        stats.add_set(&["cat", "dog"]);
        stats.add_set(&["cat"]);
        stats.add_set(&["fish"]);
        let vocab = stats.sorted_vocabulary();
        (stats, vocab)
    }

    #[test]
    fn idf_is_smoothed() {
        let (stats, vocab) = setup();
        let idf: Vec<f64> = DefaultTfidfEngine::idf_vec(&stats, &vocab);
        // vocab = [cat, dog, fish]
        assert!((idf[0] - ((4.0_f64 / 3.0).ln() + 1.0)).abs() < 1e-12);
        assert!((idf[1] - ((4.0_f64 / 2.0).ln() + 1.0)).abs() < 1e-12);
        assert!(idf[1] > idf[0]);
        assert_eq!(idf[1], idf[2]);
    }

    #[test]
    fn tf_is_raw_count_and_ignores_unknown_terms() {
        let (_, vocab) = setup();
        let freq = TokenFrequency::from_text("dog cat dog parrot");
        let tf: SparseVec<f32> = DefaultTfidfEngine::tf_vec(&freq, &vocab);
        assert_eq!(tf.len(), 3);
        assert_eq!(tf.iter().collect::<Vec<_>>(), vec![(0, 1.0), (1, 2.0)]);
    }
}
