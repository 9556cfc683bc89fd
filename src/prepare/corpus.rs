use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::{dataset::RawDataset, error::{Error, Result}};

/// One document of the corpus. Never mutated after preparation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// row index in the corpus and in the feature matrix
    pub id: usize,
    pub raw: String,
    pub cleaned: String,
    pub label: usize,
    pub category: String,
}

/// Ordered documents plus a category -> ids index.
/// Every document is listed under exactly one category; ids are ascending.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Corpus {
    documents: Vec<Document>,
    categories: IndexMap<String, Vec<usize>>,
}

impl Corpus {
    /// `cleaned[i]` must be the cleaned form of `raw.texts[i]`.
    pub(crate) fn from_parts(raw: RawDataset, cleaned: Vec<String>) -> Self {
        debug_assert_eq!(raw.texts.len(), cleaned.len());
        let RawDataset { texts, labels, category_names } = raw;
        let mut categories: IndexMap<String, Vec<usize>> = category_names
            .iter()
            .map(|name| (name.clone(), Vec::new()))
            .collect();

        let documents = texts
            .into_iter()
            .zip(cleaned)
            .zip(labels)
            .enumerate()
            .map(|(id, ((text, cleaned), label))| {
                if let Some((_, ids)) = categories.get_index_mut(label) {
                    ids.push(id);
                }
                Document {
                    id,
                    raw: text,
                    cleaned,
                    label,
                    category: category_names.get(label).cloned().unwrap_or_default(),
                }
            })
            .collect();

        Self { documents, categories }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn document(&self, id: usize) -> Result<&Document> {
        self.documents.get(id).ok_or(Error::OutOfRange {
            index: id,
            len: self.documents.len(),
        })
    }

    /// Category names in label order.
    pub fn category_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.categories.keys().map(String::as_str)
    }

    pub fn category_count(&self) -> usize {
        self.categories.len()
    }

    /// Ids of the documents in `category`, ascending. `None` if no such category.
    pub fn documents_in(&self, category: &str) -> Option<&[usize]> {
        self.categories.get(category).map(Vec::as_slice)
    }
}
