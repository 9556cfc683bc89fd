use std::{num::NonZeroUsize, sync::Arc};

use lru::LruCache;
use num::Num;
use parking_lot::Mutex;
use tracing::trace;

use crate::{error::{Error, Result}, prepare::Prepared};

pub const DEFAULT_CACHE_CAPACITY: usize = 4096;

/// Cosine similarity between two documents of a prepared corpus.
///
/// Results are memoized under the unordered pair `(min, max)` in an LRU
/// cache; the least recently used pair is evicted once `capacity` pairs are
/// held. A capacity of 0 disables the cache.
///
/// The matrix is read-only, so one lookup can be shared between threads.
pub struct SimilarityLookup<N = f32> {
    prepared: Arc<Prepared<N>>,
    cache: Option<Mutex<LruCache<(usize, usize), f64>>>,
}

impl<N> SimilarityLookup<N>
where
    N: Num + Copy + Into<f64>,
{
    pub fn new(prepared: Arc<Prepared<N>>) -> Self {
        Self::with_capacity(prepared, DEFAULT_CACHE_CAPACITY)
    }

    pub fn with_capacity(prepared: Arc<Prepared<N>>, capacity: usize) -> Self {
        let cache = NonZeroUsize::new(capacity).map(|cap| Mutex::new(LruCache::new(cap)));
        Self { prepared, cache }
    }

    pub fn prepared(&self) -> &Arc<Prepared<N>> {
        &self.prepared
    }

    /// Similarity of documents `id1` and `id2`, in `[0, 1]`.
    /// 0 when either document has no terms.
    pub fn similarity(&self, id1: usize, id2: usize) -> Result<f64> {
        let len = self.prepared.matrix.n_rows();
        for index in [id1, id2] {
            if index >= len {
                return Err(Error::OutOfRange { index, len });
            }
        }
        let key = (id1.min(id2), id1.max(id2));

        if let Some(cache) = &self.cache {
            if let Some(score) = cache.lock().get(&key).copied() {
                trace!(?key, score, "similarity cache hit");
                return Ok(score);
            }
        }

        let score = self.compute(key.0, key.1)?;

        if let Some(cache) = &self.cache {
            cache.lock().put(key, score);
        }
        Ok(score)
    }

    fn compute(&self, id1: usize, id2: usize) -> Result<f64> {
        let matrix = &self.prepared.matrix;
        let a = matrix.row(id1)?;
        let b = matrix.row(id2)?;
        Ok(a.cosine_similarity(b).clamp(0.0, 1.0))
    }

    /// Number of memoized pairs.
    pub fn cached_pairs(&self) -> usize {
        self.cache.as_ref().map_or(0, |cache| cache.lock().len())
    }

    pub fn clear_cache(&self) {
        if let Some(cache) = &self.cache {
            cache.lock().clear();
        }
    }
}
