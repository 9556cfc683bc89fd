//! This crate compares documents of a labelled text corpus (20 Newsgroups)
//! using TF-IDF vectors and cosine similarity.

pub mod config;
pub mod dataset;
pub mod display;
pub mod error;
pub mod prepare;
pub mod similarity;
pub mod utils;
pub mod vectorizer;

/// Crate error and result types
/// - `DataUnavailable`: the dataset source could not be read (fatal, no retry)
/// - `OutOfRange`: a document id outside the corpus
pub use error::{Error, Result};

/// Settings
/// Plain configuration struct with defaults; builds the dataset source and
/// the `Preparer` from it.
pub use config::Settings;

/// Dataset sources
/// `DatasetSource` is the seam where the corpus comes from.
/// - `NewsgroupsDir`: the "bydate" directory layout of 20 Newsgroups, with
///   optional header / footer / quote stripping
/// - `InMemorySource`: texts and labels already in memory
pub use dataset::{DatasetSource, InMemorySource, NewsgroupsDir, RawDataset, StripOptions, Subset};

/// Corpus Preparer
/// Loads the dataset once, cleans every document on a bounded rayon pool
/// and builds the TF-IDF feature matrix.
///
/// The result is memoized inside the `Preparer` value and handed out as
/// `Arc<Prepared>`; there is no process-wide cache.
///
/// `Preparer<S, N, E>` has the following generic parameters:
/// - `S`: dataset source
/// - `N`: matrix value type (`f32` or `f64`)
/// - `E`: TF-IDF calculation engine (e.g. `DefaultTfidfEngine`)
pub use prepare::{Prepared, Preparer};

/// Corpus and Document
/// `Corpus` keeps the documents in load order (id = index) and an ordered
/// category name -> ids index.
pub use prepare::corpus::{Corpus, Document};

/// Text cleaner
/// trim, collapse newlines, collapse whitespace, drop disallowed characters,
/// then optionally squeeze repeated punctuation and collapse again.
pub use prepare::clean::{CleanOptions, Cleaner};

/// Similarity Lookup
/// Cosine similarity of two rows of the feature matrix, in `[0, 1]`,
/// memoized per unordered pair in a bounded LRU cache.
pub use similarity::SimilarityLookup;

/// Feature matrix and vectorizer
/// - `FeatureMatrix`: one L2-normalized sparse TF-IDF row per document
/// - `TfidfVectorizer`: fits the vocabulary and builds the matrix
/// - `TfidfEngine`: pluggable IDF / TF weighting, `DefaultTfidfEngine` uses
///   raw counts and smoothed IDF
pub use vectorizer::{matrix::FeatureMatrix, tfidf::{DefaultTfidfEngine, TfidfEngine}, TfidfVectorizer};

/// Token Frequency structure
/// Token counts of a single document, the input of TF calculation.
pub use vectorizer::token::TokenFrequency;

/// Sparse vector used for matrix rows
pub use utils::math::vector::SparseVec;
