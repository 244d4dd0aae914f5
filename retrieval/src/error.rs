use thiserror::Error;

pub type Result<T> = std::result::Result<T, RetrievalError>;

#[derive(Debug, Error)]
pub enum RetrievalError {
    /// The corpus source could not be read, or produced a record that does
    /// not map to a document. Fatal at startup.
    #[error("failed to load corpus from {origin}: {reason}")]
    CorpusLoad { origin: String, reason: String },

    #[error("no document with id {0:?}")]
    NotFound(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl RetrievalError {
    pub(crate) fn corpus_load(origin: impl Into<String>, reason: impl ToString) -> Self {
        RetrievalError::CorpusLoad { origin: origin.into(), reason: reason.to_string() }
    }
}
