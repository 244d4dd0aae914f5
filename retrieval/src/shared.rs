use crate::retriever::Retriever;
use parking_lot::RwLock;
use std::sync::Arc;

/// Holds the current [`Retriever`] and swaps in replacements whole.
///
/// Readers take an `Arc` snapshot and never observe a partially built index;
/// a replacement is built outside the lock and installed in one step.
#[derive(Clone)]
pub struct SharedRetriever {
    inner: Arc<RwLock<Current>>,
}

struct Current {
    retriever: Arc<Retriever>,
    generation: u64,
}

impl SharedRetriever {
    pub fn new(retriever: Retriever) -> Self {
        Self { inner: Arc::new(RwLock::new(Current { retriever: Arc::new(retriever), generation: 1 })) }
    }

    pub fn snapshot(&self) -> Arc<Retriever> {
        self.inner.read().retriever.clone()
    }

    pub fn generation(&self) -> u64 {
        self.inner.read().generation
    }

    /// Install `retriever` and return the new generation number.
    pub fn replace(&self, retriever: Retriever) -> u64 {
        let next = Arc::new(retriever);
        let mut cur = self.inner.write();
        cur.retriever = next;
        cur.generation += 1;
        tracing::info!(generation = cur.generation, num_docs = cur.retriever.store().len(), "retriever replaced");
        cur.generation
    }
}
