//! Search Tool
//!
//! Exposes a `SearchClient` to the reasoning loop as the `Search` action.

use std::sync::Arc;

use async_trait::async_trait;

use agent_core::{Result as CoreResult, Tool, ToolSchema};

use crate::provider::SearchClient;

/// Name the model uses to request a search
pub const SEARCH_TOOL_NAME: &str = "Search";

const DEFAULT_DESCRIPTION: &str = "Useful for searching information on the internet";

/// Tool for running web searches
pub struct SearchTool {
    client: Arc<dyn SearchClient>,
    description: String,
}

impl SearchTool {
    pub fn new(client: Arc<dyn SearchClient>) -> Self {
        Self {
            client,
            description: DEFAULT_DESCRIPTION.into(),
        }
    }

    /// Describe the tool as focused on one topic
    pub fn for_topic(client: Arc<dyn SearchClient>, topic: &str) -> Self {
        Self {
            client,
            description: format!("Useful for searching current information about {topic} on the web."),
        }
    }
}

#[async_trait]
impl Tool for SearchTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: SEARCH_TOOL_NAME.into(),
            description: self.description.clone(),
            category: Some("web".into()),
        }
    }

    async fn run(&self, input: &str) -> CoreResult<String> {
        let query = input.trim();
        if query.is_empty() {
            return Ok("No search query was provided. Give a non-empty Action Input.".into());
        }

        tracing::info!(query, provider = self.client.name(), "Running web search");
        let text = self.client.search(query).await?;
        tracing::debug!(chars = text.len(), "Search results received");
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SearchError;
    use crate::provider::MockSearchClient;
    use agent_core::AgentError;

    #[tokio::test]
    async fn test_search_tool_returns_results() {
        let client = Arc::new(MockSearchClient::with_results("Rust 1.83 released"));
        let tool = SearchTool::new(client.clone());

        assert_eq!(tool.schema().name, "Search");
        assert_eq!(tool.run("  rust release ").await.unwrap(), "Rust 1.83 released");
        assert_eq!(client.calls(), 1);
    }

    #[tokio::test]
    async fn test_empty_input_skips_provider() {
        let client = Arc::new(MockSearchClient::with_results("unused"));
        let tool = SearchTool::new(client.clone());

        let observation = tool.run("   ").await.unwrap();
        assert!(observation.contains("No search query"));
        assert_eq!(client.calls(), 0);
    }

    #[tokio::test]
    async fn test_provider_error_is_typed() {
        let client = Arc::new(MockSearchClient::failing(|| SearchError::Auth("Invalid API key".into())));
        let tool = SearchTool::new(client);

        let err = tool.run("anything").await.unwrap_err();
        assert!(matches!(err, AgentError::Auth(m) if m.contains("Invalid API key")));
    }

    #[test]
    fn test_topic_description() {
        let tool = SearchTool::for_topic(Arc::new(MockSearchClient::with_results("")), "Grok 3");
        assert_eq!(
            tool.schema().description,
            "Useful for searching current information about Grok 3 on the web."
        );
    }
}
