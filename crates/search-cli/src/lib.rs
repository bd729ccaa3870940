//! # search-cli
//!
//! Terminal front-ends for the web search agent.
//!
//! - `search-agent`: asks once, runs the agent, prints the answer
//! - `search-summarize`: query loop with conversation memory and a
//!   summarization pass after every agent run
//!
//! ## Environment
//!
//! | Variable | Default |
//! |----------|---------|
//! | `SERPAPI_API_KEY` | required |
//! | `OPENAI_API_KEY` | required |
//! | `OPENAI_BASE_URL` | `https://api.openai.com/v1` |
//! | `OPENAI_MODEL` | `gpt-3.5-turbo` |
//! | `SERPAPI_BASE_URL` | `https://serpapi.com` |
//! | `SEARCH_ENGINE` / `SEARCH_GOOGLE_DOMAIN` / `SEARCH_GL` / `SEARCH_HL` | `google` / `google.com` / `us` / `en` |
//! | `AGENT_MAX_ITERATIONS` | `15` |
//! | `HTTP_TIMEOUT_SECS` | `60` |
//! | `SEARCH_TOPIC` | unset |
//! | `AGENT_VERBOSE` | unset |

pub mod config;
pub mod logging;
pub mod pipeline;
pub mod repl;

pub use config::Config;
pub use pipeline::{QueryPipeline, SearchSummarizer};
