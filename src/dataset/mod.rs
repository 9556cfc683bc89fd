pub mod newsgroups;

use std::{collections::hash_map::DefaultHasher, hash::{Hash, Hasher}};

use crate::error::{Error, Result};

pub use newsgroups::{NewsgroupsDir, StripOptions, Subset};

/// A labelled text corpus as handed over by a source.
/// `labels[i]` is the category of `texts[i]`; `category_names[label]` its display name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct RawDataset {
    pub texts: Vec<String>,
    pub labels: Vec<usize>,
    pub category_names: Vec<String>,
}

impl RawDataset {
    pub fn len(&self) -> usize {
        self.texts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.texts.is_empty()
    }

    /// texts and labels line up, and every label names a category
    pub fn validate(&self) -> Result<()> {
        if self.texts.len() != self.labels.len() {
            return Err(Error::InvalidDataset(format!(
                "{} texts but {} labels",
                self.texts.len(),
                self.labels.len()
            )));
        }
        if let Some((pos, label)) = self
            .labels
            .iter()
            .enumerate()
            .find(|(_, label)| **label >= self.category_names.len())
        {
            return Err(Error::InvalidDataset(format!(
                "document {pos} has label {label} but only {} categories exist",
                self.category_names.len()
            )));
        }
        Ok(())
    }
}

/// Where the corpus comes from.
pub trait DatasetSource {
    /// Load the whole corpus. A source that cannot be reached fails with
    /// `Error::DataUnavailable`; there is no retry.
    fn load(&self) -> Result<RawDataset>;

    /// Identifies what `load` would return, without loading it.
    /// Prepared data built under another fingerprint is never reused.
    fn fingerprint(&self) -> String;
}

impl<T> DatasetSource for &T
where
    T: DatasetSource + ?Sized,
{
    fn load(&self) -> Result<RawDataset> {
        (**self).load()
    }

    fn fingerprint(&self) -> String {
        (**self).fingerprint()
    }
}

/// A corpus held in memory, mostly for tests and embedding.
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    dataset: RawDataset,
}

impl InMemorySource {
    pub fn new<C, T>(category_names: C, docs: T) -> Self
    where
        C: IntoIterator,
        C::Item: Into<String>,
        T: IntoIterator<Item = (String, usize)>,
    {
        let (texts, labels) = docs.into_iter().unzip();
        Self {
            dataset: RawDataset {
                texts,
                labels,
                category_names: category_names.into_iter().map(Into::into).collect(),
            },
        }
    }
}

impl From<RawDataset> for InMemorySource {
    fn from(dataset: RawDataset) -> Self {
        Self { dataset }
    }
}

impl DatasetSource for InMemorySource {
    fn load(&self) -> Result<RawDataset> {
        Ok(self.dataset.clone())
    }

    /// hash of the held texts, labels and names
    fn fingerprint(&self) -> String {
        let mut hasher = DefaultHasher::new();
        self.dataset.hash(&mut hasher);
        format!("memory:{}:{:016x}", self.dataset.len(), hasher.finish())
    }
}
