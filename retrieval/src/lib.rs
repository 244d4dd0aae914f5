//! Lexical guest-profile retrieval: an immutable document store, a BM25
//! relevance index built from it, and the `retrieve` façade handed to agents.

pub mod document;
pub mod error;
pub mod index;
pub mod rank;
pub mod retriever;
pub mod shared;
pub mod source;
pub mod tokenizer;

pub use document::{Document, DocumentStore};
pub use error::{Result, RetrievalError};
pub use index::RelevanceIndex;
pub use rank::{Bm25Params, ScoredDocument};
pub use retriever::{Retriever, DEFAULT_TOP_K, NO_MATCH};
pub use shared::SharedRetriever;
pub use source::{open_source, CorpusSource, Record, RecordSchema};
