pub mod clean;
pub mod corpus;
pub mod snapshot;

use std::{marker::PhantomData, ops::MulAssign, path::PathBuf, sync::Arc, time::Instant};

use num::Float;
use once_cell::sync::OnceCell;
use rayon::{prelude::*, ThreadPoolBuilder};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::{info, instrument, warn};

use crate::{
    dataset::DatasetSource,
    error::{Error, Result},
    prepare::{clean::Cleaner, corpus::Corpus},
    vectorizer::{matrix::FeatureMatrix, tfidf::{DefaultTfidfEngine, TfidfEngine}, TfidfVectorizer},
};

/// Output of the preparation step: the corpus and its feature matrix.
/// Row `i` of `matrix` belongs to document `i` of `corpus`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prepared<N = f32> {
    pub corpus: Corpus,
    pub matrix: FeatureMatrix<N>,
}

/// Loads, cleans and vectorizes the corpus once.
///
/// The first successful `prepare` call builds the result; every later call
/// returns the same `Arc`. A failed build is not remembered, so the caller
/// may call `prepare` again.
pub struct Preparer<S, N = f32, E = DefaultTfidfEngine> {
    source: S,
    cleaner: Cleaner,
    /// 0 = one worker per core
    workers: usize,
    snapshot: Option<PathBuf>,
    prepared: OnceCell<Arc<Prepared<N>>>,
    _engine: PhantomData<fn() -> E>,
}

impl<S, N, E> Preparer<S, N, E>
where
    S: DatasetSource,
    N: Float + MulAssign + Send + Sync + Serialize + DeserializeOwned,
    E: TfidfEngine<N>,
{
    pub fn new(source: S) -> Self {
        Self {
            source,
            cleaner: Cleaner::default(),
            workers: 0,
            snapshot: None,
            prepared: OnceCell::new(),
            _engine: PhantomData,
        }
    }

    pub fn with_cleaner(mut self, cleaner: Cleaner) -> Self {
        self.cleaner = cleaner;
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Read the prepared data from `path` when it holds a snapshot of the
    /// same source and cleaner, and write it there after a fresh build.
    /// A failed write is logged; the built data is still returned.
    pub fn with_snapshot(mut self, path: impl Into<PathBuf>) -> Self {
        self.snapshot = Some(path.into());
        self
    }

    pub fn is_prepared(&self) -> bool {
        self.prepared.get().is_some()
    }

    pub fn prepare(&self) -> Result<Arc<Prepared<N>>> {
        self.prepared.get_or_try_init(|| self.build()).map(Arc::clone)
    }

    fn build(&self) -> Result<Arc<Prepared<N>>> {
        let fingerprint = self.source.fingerprint();
        if let Some(path) = &self.snapshot {
            match snapshot::load::<N>(path, &fingerprint, self.cleaner) {
                Ok(Some(prepared)) => {
                    info!(
                        path = %path.display(),
                        documents = prepared.corpus.len(),
                        "prepared data loaded from snapshot"
                    );
                    return Ok(Arc::new(prepared));
                }
                Ok(None) => {}
                Err(e) => warn!(path = %path.display(), error = %e, "unusable snapshot, rebuilding"),
            }
        }

        let prepared = self.build_fresh()?;

        if let Some(path) = &self.snapshot {
            match snapshot::save(path, &fingerprint, self.cleaner, &prepared) {
                Ok(()) => info!(path = %path.display(), "snapshot saved"),
                Err(e) => warn!(path = %path.display(), error = %e, "snapshot not saved"),
            }
        }
        Ok(Arc::new(prepared))
    }

    #[instrument(skip(self), fields(workers = self.workers))]
    fn build_fresh(&self) -> Result<Prepared<N>> {
        let started = Instant::now();
        let raw = self.source.load()?;
        raw.validate()?;

        let pool = ThreadPoolBuilder::new()
            .num_threads(self.workers)
            .thread_name(|i| format!("prepare-{i}"))
            .build()
            .map_err(|e| Error::WorkerPool(e.to_string()))?;

        let cleaner = self.cleaner;
        let (cleaned, matrix) = pool.install(|| {
            let cleaned: Vec<String> = raw.texts.par_iter().map(|text| cleaner.clean(text)).collect();
            let matrix = TfidfVectorizer::<N, E>::new().fit_transform(&cleaned);
            (cleaned, matrix)
        });

        let corpus = Corpus::from_parts(raw, cleaned);
        info!(
            documents = corpus.len(),
            categories = corpus.category_count(),
            vocabulary = matrix.n_cols(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "corpus prepared"
        );
        Ok(Prepared { corpus, matrix })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::dataset::{InMemorySource, RawDataset};

    struct CountingSource {
        inner: InMemorySource,
        loads: AtomicUsize,
    }

    impl DatasetSource for CountingSource {
        fn load(&self) -> Result<RawDataset> {
            self.loads.fetch_add(1, Ordering::SeqCst);
            self.inner.load()
        }

        fn fingerprint(&self) -> String {
            self.inner.fingerprint()
        }
    }

    struct Unreachable;

    impl DatasetSource for Unreachable {
        fn load(&self) -> Result<RawDataset> {
            Err(Error::unavailable("/nowhere", "unreachable"))
        }

        fn fingerprint(&self) -> String {
            "unreachable".to_string()
        }
    }

    fn source() -> InMemorySource {
        InMemorySource::new(
            ["rec.autos", "sci.space"],
            vec![
                ("Engines\n\nand  tires!!".to_string(), 0),
                ("Orbit, launch & rockets".to_string(), 1),
                ("Rockets reach orbit".to_string(), 1),
            ],
        )
    }

    #[test]
    fn prepare_builds_once() {
        let counting = CountingSource {
            inner: source(),
            loads: AtomicUsize::new(0),
        };
        let preparer: Preparer<_> = Preparer::new(counting).with_workers(2);
        assert!(!preparer.is_prepared());
        let first = preparer.prepare().unwrap();
        let second = preparer.prepare().unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert!(preparer.is_prepared());
        assert_eq!(preparer.source.loads.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn cleaned_text_matches_input_order() {
        let preparer: Preparer<_> = Preparer::new(source()).with_workers(3);
        let prepared = preparer.prepare().unwrap();
        let docs = prepared.corpus.documents();
        assert_eq!(docs[0].cleaned, "Engines and tires!");
        assert_eq!(docs[1].cleaned, "Orbit, launch   rockets");
        assert_eq!(docs[2].raw, "Rockets reach orbit");
        assert_eq!(prepared.matrix.n_rows(), 3);
    }

    #[test]
    fn unavailable_source_fails_and_is_not_memoized() {
        let preparer: Preparer<_> = Preparer::new(Unreachable);
        assert!(matches!(preparer.prepare(), Err(Error::DataUnavailable { .. })));
        assert!(!preparer.is_prepared());
    }

    #[test]
    fn invalid_dataset_is_rejected() {
        let bad = InMemorySource::new(["only"], vec![("text".to_string(), 4)]);
        let preparer: Preparer<_> = Preparer::new(bad);
        assert!(matches!(preparer.prepare(), Err(Error::InvalidDataset(_))));
    }

    #[test]
    fn snapshot_is_written_and_reused() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("prepared.cbor");

        let first: Preparer<_> = Preparer::new(source()).with_snapshot(&path);
        let built = first.prepare().unwrap();
        assert!(path.exists());

        let counting = CountingSource {
            inner: source(),
            loads: AtomicUsize::new(0),
        };
        let second: Preparer<_> = Preparer::new(counting).with_snapshot(&path);
        let loaded = second.prepare().unwrap();
        assert_eq!(second.source.loads.load(Ordering::SeqCst), 0);
        assert_eq!(loaded.corpus.documents(), built.corpus.documents());
        assert_eq!(loaded.matrix.n_cols(), built.matrix.n_cols());
    }

    #[test]
    fn snapshot_with_other_cleaner_is_ignored() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("prepared.cbor");
        let first: Preparer<_> = Preparer::new(source()).with_snapshot(&path);
        first.prepare().unwrap();

        let counting = CountingSource {
            inner: source(),
            loads: AtomicUsize::new(0),
        };
        let cleaner = Cleaner::new(clean::CleanOptions {
            squeeze_punctuation: false,
            recollapse_whitespace: true,
        });
        let second: Preparer<_> = Preparer::new(counting).with_cleaner(cleaner).with_snapshot(&path);
        second.prepare().unwrap();
        assert_eq!(second.source.loads.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn snapshot_of_other_source_is_ignored() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("prepared.cbor");
        let first: Preparer<_> = Preparer::new(source()).with_snapshot(&path);
        assert_eq!(first.prepare().unwrap().corpus.len(), 3);

        let smaller = InMemorySource::new(
            ["rec.autos", "sci.space"],
            vec![("Engines and tires".to_string(), 0), ("Rockets reach orbit".to_string(), 1)],
        );
        let counting = CountingSource {
            inner: smaller,
            loads: AtomicUsize::new(0),
        };
        let second: Preparer<_> = Preparer::new(counting).with_snapshot(&path);
        assert_eq!(second.prepare().unwrap().corpus.len(), 2);
        assert_eq!(second.source.loads.load(Ordering::SeqCst), 1);

        // the snapshot now belongs to the smaller source
        let third: Preparer<_> = Preparer::new(source()).with_snapshot(&path);
        assert_eq!(third.prepare().unwrap().corpus.len(), 3);
    }

    #[test]
    fn failed_snapshot_write_keeps_built_data() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("missing-dir").join("prepared.cbor");
        let preparer: Preparer<_> = Preparer::new(source()).with_snapshot(&path);
        let prepared = preparer.prepare().unwrap();
        assert_eq!(prepared.corpus.len(), 3);
        assert!(preparer.is_prepared());
        assert!(!path.exists());
    }

    #[test]
    fn corrupt_snapshot_is_rebuilt() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("prepared.cbor");
        std::fs::write(&path, b"not cbor at all").unwrap();
        let preparer: Preparer<_> = Preparer::new(source()).with_snapshot(&path);
        let prepared = preparer.prepare().unwrap();
        assert_eq!(prepared.corpus.len(), 3);
    }
}
