use crate::document::DocumentStore;
use crate::tokenizer::tokenize;
use std::collections::HashMap;

/// Term statistics for one corpus, built once and never mutated.
#[derive(Debug, Default)]
pub struct RelevanceIndex {
    /// position -> term -> raw term frequency
    term_stats: Vec<HashMap<String, u32>>,
    /// position -> number of tokens
    doc_lengths: Vec<u32>,
    /// term -> number of documents containing it
    df: HashMap<String, u32>,
    num_docs: u32,
    avg_doc_len: f64,
}

impl RelevanceIndex {
    pub fn build(store: &DocumentStore) -> Self {
        let mut term_stats = Vec::with_capacity(store.len());
        let mut doc_lengths = Vec::with_capacity(store.len());
        let mut df: HashMap<String, u32> = HashMap::new();
        let mut total_len: u64 = 0;

        for doc in store.iter() {
            let tokens = tokenize(&doc.text);
            let mut tf: HashMap<String, u32> = HashMap::new();
            doc_lengths.push(tokens.len() as u32);
            total_len += tokens.len() as u64;
            for term in tokens {
                *tf.entry(term).or_insert(0) += 1;
            }
            for term in tf.keys() {
                *df.entry(term.clone()).or_insert(0) += 1;
            }
            term_stats.push(tf);
        }

        let num_docs = store.len() as u32;
        let avg_doc_len = if num_docs == 0 { 0.0 } else { total_len as f64 / num_docs as f64 };
        tracing::info!(num_docs, num_terms = df.len(), avg_doc_len, "built relevance index");
        Self { term_stats, doc_lengths, df, num_docs, avg_doc_len }
    }

    pub fn num_docs(&self) -> u32 {
        self.num_docs
    }

    pub fn avg_doc_len(&self) -> f64 {
        self.avg_doc_len
    }

    pub fn vocabulary_len(&self) -> usize {
        self.df.len()
    }

    pub fn doc_len(&self, position: usize) -> u32 {
        self.doc_lengths.get(position).copied().unwrap_or(0)
    }

    pub fn term_freq(&self, position: usize, term: &str) -> u32 {
        self.term_stats
            .get(position)
            .and_then(|tf| tf.get(term))
            .copied()
            .unwrap_or(0)
    }

    pub fn doc_freq(&self, term: &str) -> u32 {
        self.df.get(term).copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;

    fn store(texts: &[&str]) -> DocumentStore {
        DocumentStore::from_documents(
            texts.iter().enumerate().map(|(i, t)| Document::new(i.to_string(), *t)).collect(),
        )
    }

    #[test]
    fn collects_term_and_document_frequencies() {
        let idx = RelevanceIndex::build(&store(&["hello hello world", "hello rust"]));
        assert_eq!(idx.num_docs(), 2);
        assert_eq!(idx.term_freq(0, "hello"), 2);
        assert_eq!(idx.term_freq(1, "world"), 0);
        assert_eq!(idx.doc_freq("hello"), 2);
        assert_eq!(idx.doc_freq("world"), 1);
        assert_eq!(idx.doc_freq("python"), 0);
        assert_eq!(idx.vocabulary_len(), 3);
        assert_eq!(idx.doc_len(0), 3);
        assert!((idx.avg_doc_len() - 2.5).abs() < 1e-12);
    }

    #[test]
    fn empty_documents_are_kept() {
        let idx = RelevanceIndex::build(&store(&["", "one two"]));
        assert_eq!(idx.num_docs(), 2);
        assert_eq!(idx.doc_len(0), 0);
        assert!((idx.avg_doc_len() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn empty_corpus() {
        let idx = RelevanceIndex::build(&DocumentStore::default());
        assert_eq!(idx.num_docs(), 0);
        assert_eq!(idx.avg_doc_len(), 0.0);
    }
}
