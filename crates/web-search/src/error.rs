//! Error Types for Web Search

use agent_core::AgentError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, SearchError>;

#[derive(Error, Debug)]
pub enum SearchError {
    #[error("Search API error: {0}")]
    Api(String),

    #[error("Search authentication failed: {0}")]
    Auth(String),

    #[error("Search quota exceeded: {0}")]
    Quota(String),

    #[error("Search request failed with status {status}: {message}")]
    Http { status: u16, message: String },

    #[error("Search request timed out: {0}")]
    Timeout(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<SearchError> for AgentError {
    fn from(err: SearchError) -> Self {
        match err {
            SearchError::Auth(msg) => Self::Auth(format!("search provider: {msg}")),
            SearchError::Quota(msg) => Self::RateLimited(format!("search provider: {msg}")),
            SearchError::Timeout(msg) => Self::Timeout(msg),
            SearchError::Config(msg) => Self::Config(msg),
            other => Self::ToolExecution(other.to_string()),
        }
    }
}
