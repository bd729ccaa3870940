//! Scripted LLM provider for tests.
//!
//! Replies are served in order; a repeating reply (text or error) takes over
//! once the script runs out. Every rendered prompt is recorded so tests can
//! assert on what the model was shown.

use std::collections::VecDeque;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::error::{AgentError, Result};
use crate::message::Message;
use crate::provider::{Completion, FinishReason, GenerationOptions, LlmProvider};

#[derive(Clone, Debug)]
enum Reply {
    Text(String),
    Error(String),
}

/// Mock provider returning canned replies
#[derive(Debug)]
pub struct ScriptedProvider {
    script: Mutex<VecDeque<Reply>>,
    fallback: Option<Reply>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedProvider {
    /// Serve these replies once each, in order
    pub fn new<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            script: Mutex::new(replies.into_iter().map(|r| Reply::Text(r.into())).collect()),
            fallback: None,
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Return the same reply on every call
    pub fn repeating(reply: impl Into<String>) -> Self {
        Self {
            fallback: Some(Reply::Text(reply.into())),
            ..Self::new(Vec::<String>::new())
        }
    }

    /// Fail every call with a provider error
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            fallback: Some(Reply::Error(message.into())),
            ..Self::new(Vec::<String>::new())
        }
    }

    /// Prompts received so far, oldest first
    pub async fn prompts(&self) -> Vec<String> {
        self.prompts.lock().await.clone()
    }

    /// Number of completion calls made
    pub async fn calls(&self) -> usize {
        self.prompts.lock().await.len()
    }
}

#[async_trait]
impl LlmProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn complete(
        &self,
        messages: &[Message],
        options: &GenerationOptions,
    ) -> Result<Completion> {
        let prompt = messages
            .iter()
            .map(|m| m.content.as_str())
            .collect::<Vec<_>>()
            .join("\n");
        self.prompts.lock().await.push(prompt);

        let reply = self
            .script
            .lock()
            .await
            .pop_front()
            .or_else(|| self.fallback.clone())
            .ok_or_else(|| AgentError::Provider("scripted replies exhausted".into()))?;

        match reply {
            Reply::Text(content) => Ok(Completion {
                content,
                model: options.model.clone(),
                usage: None,
                finish_reason: Some(FinishReason::Stop),
            }),
            Reply::Error(message) => Err(AgentError::Provider(message)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_script_then_exhausted() {
        let provider = ScriptedProvider::new(["one", "two"]);
        let options = GenerationOptions::default();

        assert_eq!(provider.complete_prompt("a", &options).await.unwrap(), "one");
        assert_eq!(provider.complete_prompt("b", &options).await.unwrap(), "two");
        assert!(provider.complete_prompt("c", &options).await.is_err());
        assert_eq!(provider.prompts().await, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_failing_provider() {
        let provider = ScriptedProvider::failing("quota exceeded");
        let err = provider
            .complete_prompt("x", &GenerationOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AgentError::Provider(m) if m == "quota exceeded"));
    }
}
