//! # agent-core
//!
//! Provider-agnostic agent primitives and the bounded ReAct loop.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Agent                                 │
//! │  ┌─────────────┐  ┌─────────────┐  ┌─────────────────────┐  │
//! │  │  Reasoning  │  │    Tools    │  │   LlmProvider       │  │
//! │  │    Loop     │──│   Registry  │──│   (Strategy)        │  │
//! │  └─────────────┘  └─────────────┘  └─────────────────────┘  │
//! │         │                                                    │
//! │  ┌─────────────┐  ┌──────────────────┐                      │
//! │  │   Prompt    │  │   Conversation   │                      │
//! │  │  Template   │  │     Memory       │                      │
//! │  └─────────────┘  └──────────────────┘                      │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! The `LlmProvider` trait keeps the loop independent of the completion
//! backend; `mock::ScriptedProvider` stands in for it in tests.

pub mod error;
pub mod memory;
pub mod message;
pub mod mock;
pub mod prompt;
pub mod provider;
pub mod reasoning;
pub mod tool;

pub use error::{AgentError, Result};
pub use memory::ConversationMemory;
pub use message::{Message, Role};
pub use prompt::PromptTemplate;
pub use provider::{Completion, GenerationOptions, LlmProvider};
pub use reasoning::{Agent, AgentBuilder, AgentResult, AgentStep, ToolErrorPolicy};
pub use tool::{Tool, ToolCall, ToolRegistry, ToolResult, ToolSchema};
