//! # web-search
//!
//! Keyword web search for the agent, plus the summarization stage that
//! condenses what the agent found.
//!
//! ## Flow
//!
//! ```text
//! ┌──────────┐   Action: Search    ┌────────────┐   GET /search.json   ┌─────────┐
//! │  Agent   │ ──────────────────▶ │ SearchTool │ ───────────────────▶ │ SerpAPI │
//! └──────────┘                     └────────────┘                      └─────────┘
//!      │        Observation: text        │      flatten_results(json)       │
//!      │ ◀────────────────────────────── │ ◀──────────────────────────────── │
//!      ▼
//! ┌────────────┐
//! │ Summarizer │  one model call, 150 words or less
//! └────────────┘
//! ```

pub mod error;
pub mod provider;
pub mod summarizer;
pub mod svckit;

pub use error::{Result, SearchError};
pub use provider::{MockSearchClient, SearchClient, SerpApiClient, SerpApiConfig};
pub use summarizer::Summarizer;

/// Re-export tools for easy registration
pub mod tools {
    pub use crate::svckit::SearchTool;
}
