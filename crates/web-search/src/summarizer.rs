//! Search Result Summarizer
//!
//! Condenses an agent's search output into a short answer with one model call.

use std::sync::Arc;

use agent_core::{GenerationOptions, LlmProvider, PromptTemplate, Result};

/// Default word limit for summaries
pub const DEFAULT_WORD_LIMIT: usize = 150;

const SUMMARY_TEMPLATE: &str = "User query: {query}

Search results: {results}

Please provide a concise summary of the relevant information about {topic} based on the search results. Focus on key details and recent developments. Limit the response to {word_limit} words or less.";

/// Single-call summarization stage
pub struct Summarizer {
    provider: Arc<dyn LlmProvider>,
    template: PromptTemplate,
    options: GenerationOptions,
    topic: String,
    word_limit: usize,
}

impl Summarizer {
    pub fn new(provider: Arc<dyn LlmProvider>, options: GenerationOptions) -> Result<Self> {
        Ok(Self {
            provider,
            template: PromptTemplate::new(SUMMARY_TEMPLATE)?,
            options,
            topic: "the query".into(),
            word_limit: DEFAULT_WORD_LIMIT,
        })
    }

    /// Name the topic the summary should focus on
    #[must_use]
    pub fn with_topic(mut self, topic: impl Into<String>) -> Self {
        self.topic = topic.into();
        self
    }

    #[must_use]
    pub fn with_word_limit(mut self, word_limit: usize) -> Self {
        self.word_limit = word_limit;
        self
    }

    pub fn render_prompt(&self, query: &str, results: &str) -> Result<String> {
        let word_limit = self.word_limit.to_string();
        self.template.render_with(&[
            ("query", query),
            ("results", results),
            ("topic", self.topic.as_str()),
            ("word_limit", word_limit.as_str()),
        ])
    }

    /// Summarize `results` in the context of the user's `query`
    pub async fn summarize(&self, query: &str, results: &str) -> Result<String> {
        let prompt = self.render_prompt(query, results)?;
        tracing::debug!(provider = self.provider.name(), "Requesting summary");

        let text = self.provider.complete_prompt(&prompt, &self.options).await?;
        Ok(text.trim().to_string())
    }
}
