//! Runtime Configuration
//!
//! Built once at start-up from the process environment (after `.env`) and
//! passed by reference to every component builder.

use std::str::FromStr;

use agent_core::provider::DEFAULT_MODEL;
use agent_core::reasoning::DEFAULT_MAX_ITERATIONS;
use agent_core::{AgentError, Result};
use agent_runtime::openai::DEFAULT_BASE_URL as OPENAI_BASE_URL;
use agent_runtime::OpenAiConfig;
use web_search::SerpApiConfig;

const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Search agent configuration
#[derive(Clone)]
pub struct Config {
    pub serpapi_api_key: String,
    pub openai_api_key: String,
    pub openai_base_url: String,
    pub model: String,
    pub serpapi_base_url: String,
    pub engine: String,
    pub google_domain: String,
    pub gl: String,
    pub hl: String,
    pub max_iterations: usize,
    pub timeout_secs: u64,
    /// Focus topic for the summarizing front-end
    pub topic: Option<String>,
    /// Print the reasoning trace of each run
    pub verbose: bool,
}

impl Config {
    /// Load `.env` if present, then read the process environment
    pub fn from_env() -> Result<Self> {
        if let Err(e) = dotenvy::dotenv() {
            if !e.not_found() {
                tracing::warn!(error = %e, "Ignoring unreadable .env file");
            }
        }
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let required = |name: &str| var(name).ok_or_else(|| AgentError::Config(format!("{name} not set")));
        let or_default = |name: &str, default: &str| var(name).unwrap_or_else(|| default.to_string());

        let serpapi_api_key = required("SERPAPI_API_KEY")?;
        let openai_api_key = required("OPENAI_API_KEY")?;

        let max_iterations = parse_or(var("AGENT_MAX_ITERATIONS"), "AGENT_MAX_ITERATIONS", DEFAULT_MAX_ITERATIONS)?;
        if max_iterations == 0 {
            return Err(AgentError::Config("AGENT_MAX_ITERATIONS must be at least 1".into()));
        }
        let timeout_secs = parse_or(var("HTTP_TIMEOUT_SECS"), "HTTP_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?;
        if timeout_secs == 0 {
            return Err(AgentError::Config("HTTP_TIMEOUT_SECS must be at least 1".into()));
        }

        let verbose = var("AGENT_VERBOSE")
            .is_some_and(|v| v == "1" || v.eq_ignore_ascii_case("true"));

        Ok(Self {
            serpapi_api_key,
            openai_api_key,
            openai_base_url: or_default("OPENAI_BASE_URL", OPENAI_BASE_URL),
            model: or_default("OPENAI_MODEL", DEFAULT_MODEL),
            serpapi_base_url: or_default("SERPAPI_BASE_URL", "https://serpapi.com"),
            engine: or_default("SEARCH_ENGINE", "google"),
            google_domain: or_default("SEARCH_GOOGLE_DOMAIN", "google.com"),
            gl: or_default("SEARCH_GL", "us"),
            hl: or_default("SEARCH_HL", "en"),
            max_iterations,
            timeout_secs,
            topic: var("SEARCH_TOPIC"),
            verbose,
        })
    }

    pub fn openai_config(&self) -> OpenAiConfig {
        OpenAiConfig::new(self.openai_api_key.clone())
            .with_base_url(self.openai_base_url.clone())
            .with_timeout_secs(self.timeout_secs)
    }

    pub fn serpapi_config(&self) -> SerpApiConfig {
        SerpApiConfig {
            api_key: self.serpapi_api_key.clone(),
            base_url: self.serpapi_base_url.clone(),
            engine: self.engine.clone(),
            google_domain: self.google_domain.clone(),
            gl: self.gl.clone(),
            hl: self.hl.clone(),
            timeout_secs: self.timeout_secs,
        }
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("serpapi_api_key", &"<redacted>")
            .field("openai_api_key", &"<redacted>")
            .field("openai_base_url", &self.openai_base_url)
            .field("model", &self.model)
            .field("serpapi_base_url", &self.serpapi_base_url)
            .field("engine", &self.engine)
            .field("max_iterations", &self.max_iterations)
            .field("timeout_secs", &self.timeout_secs)
            .field("topic", &self.topic)
            .field("verbose", &self.verbose)
            .finish_non_exhaustive()
    }
}

fn parse_or<T: FromStr>(value: Option<String>, name: &str, default: T) -> Result<T> {
    value.map_or(Ok(default), |raw| {
        raw.parse()
            .map_err(|_| AgentError::Config(format!("{name} must be a positive integer, got '{raw}'")))
    })
}
