//! SerpAPI Search Client
//!
//! Google search through serpapi.com, flattened to plain text.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value;

use super::SearchClient;
use crate::error::{Result, SearchError};

/// Text returned when a response carries nothing usable
pub const NO_RESULTS: &str = "No good search result found";

/// SerpAPI client configuration
#[derive(Clone)]
pub struct SerpApiConfig {
    pub api_key: String,
    pub base_url: String,
    pub engine: String,
    pub google_domain: String,
    /// Country code
    pub gl: String,
    /// Interface language
    pub hl: String,
    pub timeout_secs: u64,
}

impl SerpApiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: "https://serpapi.com".into(),
            engine: "google".into(),
            google_domain: "google.com".into(),
            gl: "us".into(),
            hl: "en".into(),
            timeout_secs: 60,
        }
    }

    fn search_url(&self) -> String {
        format!("{}/search.json", self.base_url.trim_end_matches('/'))
    }
}

impl std::fmt::Debug for SerpApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerpApiConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("engine", &self.engine)
            .field("google_domain", &self.google_domain)
            .field("gl", &self.gl)
            .field("hl", &self.hl)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// SerpAPI-backed search client
#[derive(Debug)]
pub struct SerpApiClient {
    client: reqwest::Client,
    config: SerpApiConfig,
}

impl SerpApiClient {
    pub fn new(config: SerpApiConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| SearchError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    fn query_params<'a>(&'a self, query: &'a str) -> [(&'static str, &'a str); 6] {
        [
            ("q", query),
            ("engine", self.config.engine.as_str()),
            ("google_domain", self.config.google_domain.as_str()),
            ("gl", self.config.gl.as_str()),
            ("hl", self.config.hl.as_str()),
            ("api_key", self.config.api_key.as_str()),
        ]
    }
}

#[async_trait]
impl SearchClient for SerpApiClient {
    async fn search(&self, query: &str) -> Result<String> {
        tracing::debug!(query, engine = %self.config.engine, "Sending search request");

        let response = self
            .client
            .get(self.config.search_url())
            .query(&self.query_params(query))
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        let body = response.text().await.map_err(transport_error)?;

        if !status.is_success() {
            let err = status_error(status, &body);
            tracing::warn!(%status, error = %err, "Search request failed");
            return Err(err);
        }

        let json: Value = serde_json::from_str(&body)?;
        flatten_results(&json)
    }

    fn name(&self) -> &str {
        "SerpAPI"
    }
}

fn transport_error(err: reqwest::Error) -> SearchError {
    if err.is_timeout() {
        SearchError::Timeout(err.to_string())
    } else {
        SearchError::Network(err)
    }
}

fn status_error(status: StatusCode, body: &str) -> SearchError {
    let message = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("error").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string());

    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        SearchError::Auth(message)
    } else if status == StatusCode::TOO_MANY_REQUESTS {
        SearchError::Quota(message)
    } else {
        SearchError::Http {
            status: status.as_u16(),
            message,
        }
    }
}

fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn highlighted_words(value: &Value) -> Option<String> {
    let words: Vec<&str> = value
        .get("snippet_highlighted_words")?
        .as_array()?
        .iter()
        .filter_map(Value::as_str)
        .collect();
    (!words.is_empty()).then(|| words.join(", "))
}

/// Flatten a SerpAPI response body to prompt-ready text
///
/// First match wins: answer box, sports spotlight, then knowledge graph plus
/// organic snippets.
pub fn flatten_results(body: &Value) -> Result<String> {
    if let Some(err) = body.get("error").and_then(Value::as_str) {
        return Err(SearchError::Api(err.to_string()));
    }

    let answer_box = body
        .get("answer_box_list")
        .and_then(|list| list.get(0))
        .or_else(|| body.get("answer_box"))
        .map(|ab| ab.get(0).unwrap_or(ab));

    if let Some(ab) = answer_box {
        let direct = ["result", "answer", "snippet"]
            .iter()
            .find_map(|key| ab.get(*key).and_then(value_text));
        if let Some(text) = direct.or_else(|| highlighted_words(ab)) {
            return Ok(text);
        }
    }

    if let Some(spotlight) = body.pointer("/sports_results/game_spotlight") {
        return Ok(spotlight.to_string());
    }

    let mut snippets = Vec::new();

    if let Some(kg) = body.get("knowledge_graph") {
        let title = kg.get("title").and_then(Value::as_str);
        let kind = kg.get("type").and_then(Value::as_str);
        if let (Some(title), Some(kind)) = (title, kind) {
            snippets.push(format!("{title} {kind}."));
        }
        if let Some(description) = kg.get("description").and_then(value_text) {
            snippets.push(description);
        }
    }

    if let Some(results) = body.get("organic_results").and_then(Value::as_array) {
        snippets.extend(results.iter().filter_map(|result| {
            result
                .get("snippet")
                .and_then(value_text)
                .or_else(|| highlighted_words(result))
        }));
    }

    if snippets.is_empty() {
        Ok(NO_RESULTS.to_string())
    } else {
        Ok(snippets.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_query_params() {
        let client = SerpApiClient::new(SerpApiConfig::new("key-123")).unwrap();
        let params = client.query_params("grok 3");
        assert_eq!(params[0], ("q", "grok 3"));
        assert!(params.contains(&("engine", "google")));
        assert!(params.contains(&("google_domain", "google.com")));
        assert!(params.contains(&("gl", "us")));
        assert!(params.contains(&("hl", "en")));
        assert_eq!(client.config.search_url(), "https://serpapi.com/search.json");
        assert!(!format!("{client:?}").contains("key-123"));
    }

    #[test]
    fn test_error_field_is_api_error() {
        let body = json!({"error": "Invalid API key. Your API key should be here: https://serpapi.com/manage-api-key"});
        assert!(matches!(flatten_results(&body), Err(SearchError::Api(m)) if m.starts_with("Invalid API key")));
    }

    #[test]
    fn test_answer_box_wins() {
        let body = json!({
            "answer_box": {"answer": "1,024", "snippet": "ignored"},
            "organic_results": [{"snippet": "also ignored"}]
        });
        assert_eq!(flatten_results(&body).unwrap(), "1,024");

        let list = json!({"answer_box_list": [{"snippet": "from list"}], "answer_box": {"answer": "no"}});
        assert_eq!(flatten_results(&list).unwrap(), "from list");

        let words = json!({"answer_box": {"snippet_highlighted_words": ["Rust", "2015"]}});
        assert_eq!(flatten_results(&words).unwrap(), "Rust, 2015");
    }

    #[test]
    fn test_knowledge_graph_and_organic_snippets() {
        let body = json!({
            "knowledge_graph": {"title": "Grok", "type": "Chatbot", "description": "Grok is a chatbot by xAI."},
            "organic_results": [
                {"title": "a", "snippet": "Grok 3 was released in February 2025."},
                {"title": "b"},
                {"title": "c", "snippet_highlighted_words": ["reasoning"]}
            ]
        });
        assert_eq!(
            flatten_results(&body).unwrap(),
            "Grok Chatbot.\nGrok is a chatbot by xAI.\nGrok 3 was released in February 2025.\nreasoning"
        );
    }

    #[test]
    fn test_sports_spotlight() {
        let body = json!({"sports_results": {"game_spotlight": {"score": "3-1"}}});
        assert_eq!(flatten_results(&body).unwrap(), r#"{"score":"3-1"}"#);
    }

    #[test]
    fn test_empty_response() {
        assert_eq!(flatten_results(&json!({"search_metadata": {}})).unwrap(), NO_RESULTS);
    }

    #[test]
    fn test_status_error_mapping() {
        let body = r#"{"error": "Your account has run out of searches."}"#;
        assert!(matches!(
            status_error(StatusCode::TOO_MANY_REQUESTS, body),
            SearchError::Quota(m) if m.contains("run out")
        ));
        assert!(matches!(status_error(StatusCode::UNAUTHORIZED, "{}"), SearchError::Auth(_)));
        assert!(matches!(
            status_error(StatusCode::SERVICE_UNAVAILABLE, "down"),
            SearchError::Http { status: 503, .. }
        ));
    }
}
