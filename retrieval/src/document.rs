use crate::error::{Result, RetrievalError};
use crate::source::{CorpusSource, RecordSchema};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}

impl Document {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self { id: id.into(), text: text.into(), metadata: BTreeMap::new() }
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

/// The immutable corpus. Positions are stable and used to break ranking ties.
#[derive(Debug, Default)]
pub struct DocumentStore {
    docs: Vec<Document>,
    by_id: HashMap<String, usize>,
}

impl DocumentStore {
    pub fn from_documents(docs: Vec<Document>) -> Self {
        let mut by_id = HashMap::with_capacity(docs.len());
        for (pos, doc) in docs.iter().enumerate() {
            // first occurrence wins for lookup
            by_id.entry(doc.id.clone()).or_insert(pos);
        }
        Self { docs, by_id }
    }

    /// Read every record from `source` and map it through `schema`.
    pub fn load(source: &dyn CorpusSource, schema: &RecordSchema) -> Result<Self> {
        let origin = source.describe();
        let records = source.records()?;
        let docs = records
            .into_iter()
            .enumerate()
            .map(|(pos, record)| {
                schema
                    .to_document(pos, record)
                    .map_err(|reason| RetrievalError::corpus_load(&origin, format!("record {pos}: {reason}")))
            })
            .collect::<Result<Vec<_>>>()?;
        tracing::info!(source = %origin, num_docs = docs.len(), "loaded corpus");
        Ok(Self::from_documents(docs))
    }

    pub fn get_by_id(&self, id: &str) -> Result<&Document> {
        self.by_id
            .get(id)
            .map(|&pos| &self.docs[pos])
            .ok_or_else(|| RetrievalError::NotFound(id.to_string()))
    }

    pub fn get(&self, position: usize) -> Option<&Document> {
        self.docs.get(position)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Document> {
        self.docs.iter()
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_by_id() {
        let store = DocumentStore::from_documents(vec![
            Document::new("Alice", "Alice is a keynote speaker"),
            Document::new("Bob", "Bob is a sponsor"),
        ]);
        assert_eq!(store.len(), 2);
        assert_eq!(store.get_by_id("Bob").unwrap().text, "Bob is a sponsor");
        assert!(matches!(store.get_by_id("Carol"), Err(RetrievalError::NotFound(id)) if id == "Carol"));
    }

    #[test]
    fn duplicate_ids_resolve_to_first() {
        let store = DocumentStore::from_documents(vec![
            Document::new("dup", "first"),
            Document::new("dup", "second"),
        ]);
        assert_eq!(store.len(), 2);
        assert_eq!(store.get_by_id("dup").unwrap().text, "first");
        assert_eq!(store.get(1).unwrap().text, "second");
    }
}
