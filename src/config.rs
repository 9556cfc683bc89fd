use std::path::PathBuf;

use crate::{
    dataset::{NewsgroupsDir, StripOptions, Subset},
    display::DEFAULT_PREVIEW_CHARS,
    prepare::{clean::{CleanOptions, Cleaner}, Preparer},
    similarity::DEFAULT_CACHE_CAPACITY,
};

/// Everything needed to build a `Preparer` and a `SimilarityLookup`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// root of the 20 Newsgroups "bydate" directories
    pub data_dir: PathBuf,
    pub subset: Subset,
    pub strip: StripOptions,
    pub clean: CleanOptions,
    /// 0 = one per core
    pub workers: usize,
    /// 0 disables the pair cache
    pub cache_capacity: usize,
    pub snapshot: Option<PathBuf>,
    pub preview_chars: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./20news"),
            subset: Subset::All,
            strip: StripOptions::default(),
            clean: CleanOptions::default(),
            workers: 0,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            snapshot: None,
            preview_chars: DEFAULT_PREVIEW_CHARS,
        }
    }
}

impl Settings {
    pub fn source(&self) -> NewsgroupsDir {
        NewsgroupsDir::new(&self.data_dir)
            .with_subset(self.subset)
            .with_strip(self.strip)
    }

    pub fn preparer(&self) -> Preparer<NewsgroupsDir> {
        let preparer = Preparer::new(self.source())
            .with_cleaner(Cleaner::new(self.clean))
            .with_workers(self.workers);
        match &self.snapshot {
            Some(path) => preparer.with_snapshot(path),
            None => preparer,
        }
    }
}
