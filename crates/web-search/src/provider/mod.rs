//! Search Provider Integration
//!
//! Abstraction over keyword-search APIs and its implementations.

mod mock;
mod serpapi;

pub use mock::MockSearchClient;
pub use serpapi::{SerpApiClient, SerpApiConfig, flatten_results, NO_RESULTS};

use async_trait::async_trait;

use crate::error::Result;

/// Search client trait (Strategy pattern)
///
/// Implementations return the provider's results flattened to prompt-ready text.
#[async_trait]
pub trait SearchClient: Send + Sync {
    /// Run a keyword search
    async fn search(&self, query: &str) -> Result<String>;

    /// Provider name
    fn name(&self) -> &str;
}
