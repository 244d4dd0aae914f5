//! BM25 (Okapi) scoring over a [`RelevanceIndex`].

use crate::document::{Document, DocumentStore};
use crate::error::{Result, RetrievalError};
use crate::index::RelevanceIndex;
use crate::tokenizer::tokenize;
use serde::Serialize;
use std::collections::HashMap;

pub const DEFAULT_K1: f64 = 1.5;
pub const DEFAULT_B: f64 = 0.75;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bm25Params {
    /// Term-frequency saturation.
    pub k1: f64,
    /// Length normalization, 0 disables it.
    pub b: f64,
}

impl Default for Bm25Params {
    fn default() -> Self {
        Self { k1: DEFAULT_K1, b: DEFAULT_B }
    }
}

impl Bm25Params {
    pub fn new(k1: f64, b: f64) -> Result<Self> {
        if !k1.is_finite() || k1 < 0.0 {
            return Err(RetrievalError::InvalidArgument(format!("k1 must be a finite non-negative number, got {k1}")));
        }
        if !b.is_finite() || !(0.0..=1.0).contains(&b) {
            return Err(RetrievalError::InvalidArgument(format!("b must be within [0, 1], got {b}")));
        }
        Ok(Self { k1, b })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ScoredDocument<'a> {
    pub document: &'a Document,
    /// Position in the corpus.
    pub position: usize,
    pub score: f64,
}

/// IDF(t) = ln((N - df + 0.5) / (df + 0.5) + 1)
pub fn idf(num_docs: u32, df: u32) -> f64 {
    let n = num_docs as f64;
    let df = df as f64;
    ((n - df + 0.5) / (df + 0.5) + 1.0).ln()
}

/// Score every document in `store` against `query`.
///
/// Results are ordered by descending score; equal scores keep corpus order.
/// A query without tokens scores every document zero, and an empty corpus
/// yields an empty vector.
pub fn score<'a>(query: &str, store: &'a DocumentStore, index: &RelevanceIndex, params: Bm25Params) -> Vec<ScoredDocument<'a>> {
    let q_tokens = tokenize(query);

    // idf per distinct query term that occurs in the corpus
    let mut idfs: HashMap<&str, f64> = HashMap::new();
    for term in &q_tokens {
        let df_t = index.doc_freq(term);
        if df_t > 0 {
            idfs.entry(term.as_str()).or_insert_with(|| idf(index.num_docs(), df_t));
        }
    }

    let avgdl = index.avg_doc_len();
    let mut scored: Vec<ScoredDocument<'a>> = store
        .iter()
        .enumerate()
        .map(|(position, document)| {
            let mut s = 0.0;
            if avgdl > 0.0 {
                let dl = index.doc_len(position) as f64;
                let norm = params.k1 * (1.0 - params.b + params.b * dl / avgdl);
                for term in &q_tokens {
                    let Some(idf_t) = idfs.get(term.as_str()) else { continue };
                    let tf = index.term_freq(position, term) as f64;
                    if tf == 0.0 { continue; }
                    s += idf_t * (tf * (params.k1 + 1.0)) / (tf + norm);
                }
            }
            ScoredDocument { document, position, score: s }
        })
        .collect();

    // stable: ties stay in ascending corpus position
    scored.sort_by(|a, b| b.score.total_cmp(&a.score));
    tracing::debug!(query, num_terms = q_tokens.len(), matched_terms = idfs.len(), "scored corpus");
    scored
}
