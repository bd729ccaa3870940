//! Query Pipelines
//!
//! Wires config, providers and tools into the two front-end flows. Both
//! pipelines return printable text and never propagate errors.

use std::sync::Arc;

use agent_core::{
    Agent, AgentBuilder, AgentError, AgentResult, ConversationMemory, GenerationOptions,
    LlmProvider, Result,
};
use agent_runtime::OpenAiProvider;
use web_search::tools::SearchTool;
use web_search::{SearchClient, SerpApiClient, Summarizer};

use crate::config::Config;

/// Prefix for every rendered failure
pub const ERROR_PREFIX: &str = "An error occurred: ";

/// Sampling temperature of the one-shot program
pub const ONE_SHOT_TEMPERATURE: f32 = 0.0;

/// Sampling temperature of the summarizing program
pub const SUMMARIZE_TEMPERATURE: f32 = 0.5;

pub fn build_provider(config: &Config) -> Result<Arc<dyn LlmProvider>> {
    Ok(Arc::new(OpenAiProvider::from_config(config.openai_config())?))
}

pub fn build_search_client(config: &Config) -> Result<Arc<dyn SearchClient>> {
    Ok(Arc::new(SerpApiClient::new(config.serpapi_config())?))
}

/// Agent with the search tool registered
pub fn build_agent(
    provider: Arc<dyn LlmProvider>,
    tool: SearchTool,
    config: &Config,
    temperature: f32,
) -> Result<Agent> {
    AgentBuilder::new()
        .provider(provider)
        .tool(tool)
        .model(config.model.clone())
        .temperature(temperature)
        .max_iterations(config.max_iterations)
        .build()
}

pub fn render_error(err: &AgentError) -> String {
    format!("{ERROR_PREFIX}{err}")
}

/// Human-readable reasoning trace of a finished run
pub fn format_trace(result: &AgentResult) -> String {
    let mut out = String::new();
    for (i, step) in result.steps.iter().enumerate() {
        out.push_str(&format!(
            "[step {}] {}\nObservation: {}\n",
            i + 1,
            step.log.trim(),
            step.observation
        ));
    }
    out.push_str(&format!("Final Answer: {}\n", result.output));
    out
}

fn print_trace(result: &AgentResult) {
    eprintln!("\n> Reasoning trace ({} iterations)\n{}", result.iterations, format_trace(result));
}

/// One-shot search: agent answer for a single query
pub struct QueryPipeline {
    agent: Agent,
    verbose: bool,
}

impl QueryPipeline {
    pub const fn new(agent: Agent, verbose: bool) -> Self {
        Self { agent, verbose }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let provider = build_provider(config)?;
        let tool = SearchTool::new(build_search_client(config)?);
        let agent = build_agent(provider, tool, config, ONE_SHOT_TEMPERATURE)?;
        Ok(Self::new(agent, config.verbose))
    }

    /// Agent input for a raw user query
    pub fn agent_input(query: &str) -> String {
        format!("Search for information about: {query}. Provide a concise summary.")
    }

    pub async fn process_query(&self, query: &str) -> String {
        match self.agent.run(&Self::agent_input(query)).await {
            Ok(result) => {
                if self.verbose {
                    print_trace(&result);
                }
                result.output
            }
            Err(e) => {
                tracing::error!(error = %e, retryable = e.is_retryable(), "Query failed");
                render_error(&e)
            }
        }
    }
}

/// Interactive search: agent with memory, then a summarization pass
pub struct SearchSummarizer {
    agent: Agent,
    summarizer: Summarizer,
    memory: ConversationMemory,
    topic: Option<String>,
    verbose: bool,
}

impl SearchSummarizer {
    pub fn new(agent: Agent, summarizer: Summarizer, topic: Option<String>) -> Self {
        Self {
            agent,
            summarizer,
            memory: ConversationMemory::new(),
            topic,
            verbose: false,
        }
    }

    #[must_use]
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let provider = build_provider(config)?;
        let client = build_search_client(config)?;
        let tool = match config.topic.as_deref() {
            Some(topic) => SearchTool::for_topic(client, topic),
            None => SearchTool::new(client),
        };
        let agent = build_agent(provider.clone(), tool, config, SUMMARIZE_TEMPERATURE)?;

        let options = GenerationOptions {
            model: config.model.clone(),
            temperature: SUMMARIZE_TEMPERATURE,
            ..GenerationOptions::default()
        };
        let mut summarizer = Summarizer::new(provider, options)?;
        if let Some(topic) = &config.topic {
            summarizer = summarizer.with_topic(topic.clone());
        }

        Ok(Self::new(agent, summarizer, config.topic.clone()).with_verbose(config.verbose))
    }

    pub fn topic(&self) -> Option<&str> {
        self.topic.as_deref()
    }

    pub const fn memory(&self) -> &ConversationMemory {
        &self.memory
    }

    /// Agent input for a raw user query
    pub fn agent_input(&self, query: &str) -> String {
        match &self.topic {
            Some(topic) => format!("Search for current information about {topic}: {query}"),
            None => format!("Search for current information: {query}"),
        }
    }

    pub async fn search_and_summarize(&mut self, query: &str) -> String {
        match self.try_search_and_summarize(query).await {
            Ok(summary) => summary,
            Err(e) => {
                tracing::error!(error = %e, retryable = e.is_retryable(), "Search and summarize failed");
                render_error(&e)
            }
        }
    }

    async fn try_search_and_summarize(&mut self, query: &str) -> Result<String> {
        let input = self.agent_input(query);
        let result = self.agent.run_with_memory(&input, &mut self.memory).await?;
        if self.verbose {
            print_trace(&result);
        }
        self.summarizer.summarize(query, &result.output).await
    }
}
