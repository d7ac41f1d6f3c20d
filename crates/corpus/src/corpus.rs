use std::collections::BTreeMap;
use std::sync::Arc;

use fxhash::FxHashMap;
use serde_json::Value;
use tracing::debug;

use crate::error::CorpusError;
use crate::types::{DocId, Document, Metadata};

/// Insertion-ordered collection of documents with unique ids.
///
/// Documents are reference-counted, so [`subset`](Corpus::subset) and
/// [`group`](Corpus::group) return cheap views that share them.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    name: Option<String>,
    docs: Vec<Arc<Document>>,
    index: FxHashMap<DocId, usize>,
}

impl Corpus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Builds a corpus from bare texts, naming them `text1`, `text2`, ...
    pub fn from_texts<I, S>(texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut corpus = Self::new();
        for (idx, text) in texts.into_iter().enumerate() {
            corpus.push(Arc::new(Document::new(format!("text{}", idx + 1), text)));
        }
        corpus
    }

    pub fn from_documents<I>(docs: I) -> Result<Self, CorpusError>
    where
        I: IntoIterator<Item = Document>,
    {
        let mut corpus = Self::new();
        for doc in docs {
            corpus.add(doc)?;
        }
        Ok(corpus)
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = Some(name.into());
    }

    /// Appends a document; its id must not already be present.
    pub fn add(&mut self, doc: Document) -> Result<(), CorpusError> {
        if self.index.contains_key(doc.id()) {
            return Err(CorpusError::DuplicateId(doc.id().clone()));
        }
        self.push(Arc::new(doc));
        Ok(())
    }

    fn push(&mut self, doc: Arc<Document>) {
        self.index.insert(doc.id().clone(), self.docs.len());
        self.docs.push(doc);
    }

    pub fn get(&self, id: impl Into<DocId>) -> Result<&Document, CorpusError> {
        let id = id.into();
        self.index
            .get(&id)
            .map(|&idx| self.docs[idx].as_ref())
            .ok_or_else(|| CorpusError::NotFound(format!("document '{id}'")))
    }

    pub fn contains(&self, id: impl Into<DocId>) -> bool {
        self.index.contains_key(&id.into())
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = &Document> + '_ {
        self.docs.iter().map(Arc::as_ref)
    }

    pub fn documents(&self) -> &[Arc<Document>] {
        &self.docs
    }

    pub fn ids(&self) -> impl Iterator<Item = &DocId> + '_ {
        self.docs.iter().map(|d| d.id())
    }

    /// Document names as strings, in corpus order.
    pub fn docnames(&self) -> Vec<String> {
        self.ids().map(ToString::to_string).collect()
    }

    /// True when at least one document carries `field`.
    pub fn has_field(&self, field: &str) -> bool {
        self.docs.iter().any(|d| d.metadata().contains_key(field))
    }

    /// Sorted union of metadata field names.
    pub fn fields(&self) -> Vec<&str> {
        let mut fields: Vec<&str> = self
            .docs
            .iter()
            .flat_map(|d| d.metadata().keys().map(String::as_str))
            .collect();
        fields.sort_unstable();
        fields.dedup();
        fields
    }

    /// Documents whose metadata satisfies `predicate`, order preserved.
    pub fn subset<F>(&self, predicate: F) -> Corpus
    where
        F: Fn(&Metadata) -> bool,
    {
        let mut out = Corpus {
            name: self.name.clone(),
            ..Corpus::default()
        };
        for doc in self.docs.iter().filter(|d| predicate(d.metadata())) {
            out.push(Arc::clone(doc));
        }
        debug!(kept = out.len(), total = self.len(), "corpus_subset");
        out
    }

    /// Documents where `field == value`. Fails when no document has `field`.
    pub fn subset_where(
        &self,
        field: &str,
        value: impl Into<Value>,
    ) -> Result<Corpus, CorpusError> {
        self.require_field(field)?;
        let value = value.into();
        Ok(self.subset(|meta| meta.get(field) == Some(&value)))
    }

    /// Partitions documents by `key_fn`; `None` leaves a document out.
    ///
    /// Groups are keyed (and therefore ordered) by name; each group keeps
    /// corpus order and is named after its key.
    pub fn group<F>(&self, key_fn: F) -> BTreeMap<String, Corpus>
    where
        F: Fn(&Document) -> Option<String>,
    {
        let mut groups: BTreeMap<String, Corpus> = BTreeMap::new();
        for doc in &self.docs {
            if let Some(key) = key_fn(doc.as_ref()) {
                groups
                    .entry(key)
                    .or_insert_with_key(|k| Corpus::named(k.clone()))
                    .push(Arc::clone(doc));
            }
        }
        groups
    }

    /// Groups on a metadata field. Documents without the field (or with a
    /// `null` value) are left out.
    pub fn group_by_field(&self, field: &str) -> Result<BTreeMap<String, Corpus>, CorpusError> {
        self.require_field(field)?;
        Ok(self.group(|doc| doc.meta_label(field)))
    }

    fn require_field(&self, field: &str) -> Result<(), CorpusError> {
        if self.has_field(field) {
            Ok(())
        } else {
            Err(CorpusError::NotFound(format!("metadata field '{field}'")))
        }
    }
}

impl<'a> IntoIterator for &'a Corpus {
    type Item = &'a Document;
    type IntoIter =
        std::iter::Map<std::slice::Iter<'a, Arc<Document>>, fn(&'a Arc<Document>) -> &'a Document>;

    fn into_iter(self) -> Self::IntoIter {
        let deref: fn(&'a Arc<Document>) -> &'a Document = |doc| &**doc;
        self.docs.iter().map(deref)
    }
}
