use crate::document::{Document, DocumentStore};
use crate::error::{Result, RetrievalError};
use crate::index::RelevanceIndex;
use crate::rank::{self, Bm25Params, ScoredDocument};

pub const DEFAULT_TOP_K: usize = 3;

/// Returned instead of an empty string when nothing scores above zero, so an
/// agent can tell "no match" apart from a broken tool.
pub const NO_MATCH: &str = "No matching guest information found.";

/// A corpus and the index built from it. Both are immutable, so a
/// `Retriever` can be shared across threads without locking.
#[derive(Debug)]
pub struct Retriever {
    store: DocumentStore,
    index: RelevanceIndex,
    params: Bm25Params,
}

impl Retriever {
    pub fn new(store: DocumentStore) -> Self {
        Self::with_params(store, Bm25Params::default())
    }

    pub fn with_params(store: DocumentStore, params: Bm25Params) -> Self {
        let index = RelevanceIndex::build(&store);
        Self { store, index, params }
    }

    /// Up to `k` documents with a positive score, best first.
    pub fn search(&self, query: &str, k: usize) -> Result<Vec<ScoredDocument<'_>>> {
        if k == 0 {
            return Err(RetrievalError::InvalidArgument("k must be at least 1".into()));
        }
        if query.trim().is_empty() {
            return Err(RetrievalError::InvalidArgument("query must not be empty".into()));
        }
        let hits: Vec<_> = rank::score(query, &self.store, &self.index, self.params)
            .into_iter()
            .take_while(|s| s.score > 0.0)
            .take(k)
            .collect();
        tracing::debug!(query, k, hits = hits.len(), "search complete");
        Ok(hits)
    }

    /// The top `k` matching documents' text joined by blank lines, or
    /// [`NO_MATCH`].
    pub fn retrieve(&self, query: &str, k: usize) -> Result<String> {
        let hits = self.search(query, k)?;
        if hits.is_empty() {
            return Ok(NO_MATCH.to_string());
        }
        Ok(hits.iter().map(|h| h.document.text.as_str()).collect::<Vec<_>>().join("\n\n"))
    }

    pub fn lookup(&self, id: &str) -> Result<&Document> {
        self.store.get_by_id(id)
    }

    pub fn store(&self) -> &DocumentStore {
        &self.store
    }

    pub fn index(&self) -> &RelevanceIndex {
        &self.index
    }

    pub fn params(&self) -> Bm25Params {
        self.params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_hits_with_blank_line() {
        let r = Retriever::new(DocumentStore::from_documents(vec![
            Document::new("a", "rust rust"),
            Document::new("b", "python"),
            Document::new("c", "rust"),
        ]));
        assert_eq!(r.retrieve("rust", 3).unwrap(), "rust rust\n\nrust");
        assert_eq!(r.retrieve("rust", 1).unwrap(), "rust rust");
    }

    #[test]
    fn validates_arguments() {
        let r = Retriever::new(DocumentStore::from_documents(vec![Document::new("a", "x")]));
        assert!(matches!(r.retrieve("x", 0), Err(RetrievalError::InvalidArgument(_))));
        assert!(matches!(r.retrieve(" \n", 3), Err(RetrievalError::InvalidArgument(_))));
        // punctuation-only queries are valid input that simply match nothing
        assert_eq!(r.retrieve("?!", 3).unwrap(), NO_MATCH);
    }

    #[test]
    fn lookup_delegates_to_store() {
        let r = Retriever::new(DocumentStore::from_documents(vec![Document::new("Alice", "speaker")]));
        assert_eq!(r.lookup("Alice").unwrap().text, "speaker");
        assert!(matches!(r.lookup("Bob"), Err(RetrievalError::NotFound(_))));
    }
}
