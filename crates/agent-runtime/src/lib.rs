//! # agent-runtime
//!
//! Runtime providers for the search agent.
//!
//! ## Providers
//!
//! - **OpenAI**: any OpenAI-compatible chat-completions endpoint
//!
//! ## Usage
//!
//! ```rust,ignore
//! use agent_runtime::openai::{OpenAiConfig, OpenAiProvider};
//!
//! let provider = OpenAiProvider::from_config(OpenAiConfig::new(api_key))?;
//! let agent = AgentBuilder::new()
//!     .provider(Arc::new(provider))
//!     .build()?;
//! ```

pub mod openai;

pub use openai::{OpenAiConfig, OpenAiProvider};

// Re-export core types for convenience
pub use agent_core::{
    Agent, AgentError, GenerationOptions, LlmProvider, Message, Result, Role, Tool, ToolRegistry,
};
