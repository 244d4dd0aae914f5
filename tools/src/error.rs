use retrieval::RetrievalError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("unknown tool {0:?}")]
    UnknownTool(String),

    #[error("tool {0:?} is already registered")]
    Duplicate(String),

    /// A remote service or data source failed.
    #[error("upstream failure: {0}")]
    Upstream(String),
}

impl ToolError {
    /// Stable machine-readable name for the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            ToolError::InvalidArgument(_) => "invalid_argument",
            ToolError::NotFound(_) => "not_found",
            ToolError::UnknownTool(_) => "unknown_tool",
            ToolError::Duplicate(_) => "duplicate",
            ToolError::Upstream(_) => "upstream",
        }
    }
}

impl From<RetrievalError> for ToolError {
    fn from(err: RetrievalError) -> Self {
        match err {
            RetrievalError::InvalidArgument(msg) => ToolError::InvalidArgument(msg),
            RetrievalError::NotFound(id) => ToolError::NotFound(id),
            e @ RetrievalError::CorpusLoad { .. } => ToolError::Upstream(e.to_string()),
        }
    }
}

impl From<reqwest::Error> for ToolError {
    fn from(err: reqwest::Error) -> Self {
        ToolError::Upstream(err.to_string())
    }
}
