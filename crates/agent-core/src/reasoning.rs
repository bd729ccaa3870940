//! Reasoning Loop
//!
//! Implements the ReAct (Reason + Act) pattern over a plain-text protocol.
//! Each iteration renders the prompt, asks the model for the next step,
//! parses either an `Action`/`Action Input` pair or a `Final Answer`, and
//! runs the chosen tool. The loop is bounded by `max_iterations`.

use std::collections::HashMap;
use std::sync::{Arc, LazyLock};

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::Instrument;
use uuid::Uuid;

use crate::error::{AgentError, Result};
use crate::memory::ConversationMemory;
use crate::prompt::PromptTemplate;
use crate::provider::{GenerationOptions, LlmProvider};
use crate::tool::{Tool, ToolCall, ToolRegistry, ToolResult};

/// Iteration bound used when none is configured
pub const DEFAULT_MAX_ITERATIONS: usize = 15;

/// Stop sequence that keeps the model from inventing its own observations
pub const OBSERVATION_STOP: &str = "\nObservation:";

/// Pseudo-action recorded when model output could not be parsed
pub const EXCEPTION_ACTION: &str = "_Exception";

const FINAL_ANSWER_MARKER: &str = "Final Answer:";

/// ReAct prompt. Placeholders: `tools`, `tool_names`, `chat_history`, `input`, `agent_scratchpad`.
pub const DEFAULT_REACT_PROMPT: &str = r"Answer the following questions as best you can. You have access to the following tools:

{tools}

Use the following format:

Question: the input question you must answer
Thought: you should always think about what to do
Action: the action to take, should be one of [{tool_names}]
Action Input: the input to the action
Observation: the result of the action
... (this Thought/Action/Action Input/Observation can repeat N times)
Thought: I now know the final answer
Final Answer: the final answer to the original input question

{chat_history}Begin!

Question: {input}
Thought:{agent_scratchpad}";

static ACTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)Action\s*\d*\s*:[\s]*(.*?)[\s]*Action\s*\d*\s*Input\s*\d*\s*:[\s]*(.*)")
        .expect("action regex is valid")
});
static ACTION_ONLY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Action\s*\d*\s*:").expect("action regex is valid"));
static ACTION_INPUT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Action\s*\d*\s*Input\s*\d*\s*:").expect("action input regex is valid")
});

/// What to do when a tool returns an error
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ToolErrorPolicy {
    /// Abort the run with the tool's error
    #[default]
    Fail,
    /// Feed the error text back to the model as the observation
    Observe,
}

/// Agent configuration
#[derive(Clone, Debug)]
pub struct AgentConfig {
    /// ReAct prompt template body
    pub prompt: String,

    /// Maximum reasoning iterations before giving up
    pub max_iterations: usize,

    /// Generation options
    pub generation: GenerationOptions,

    /// Handling of tool failures
    pub tool_error_policy: ToolErrorPolicy,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            prompt: DEFAULT_REACT_PROMPT.into(),
            max_iterations: DEFAULT_MAX_ITERATIONS,
            generation: GenerationOptions::default(),
            tool_error_policy: ToolErrorPolicy::default(),
        }
    }
}

/// Tool invocation chosen by the model
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentAction {
    pub tool: String,
    pub input: String,
}

/// One thought/action/observation step of the trace
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AgentStep {
    pub thought: String,
    pub action: AgentAction,
    pub observation: String,
    /// Raw model output for this step
    pub log: String,
}

/// Outcome of a completed run
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AgentResult {
    /// Final answer text
    pub output: String,
    /// Reasoning trace, oldest first
    pub steps: Vec<AgentStep>,
    /// Model calls made, including the final one
    pub iterations: usize,
}

/// Parsed model output
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReactOutput {
    Action { thought: String, tool: String, input: String },
    Finish { thought: String, answer: String },
}

/// Parse one model reply against the ReAct grammar
pub fn parse_react_output(text: &str) -> Result<ReactOutput> {
    let includes_answer = text.contains(FINAL_ANSWER_MARKER);

    if let Some(caps) = ACTION_RE.captures(text) {
        if includes_answer {
            return Err(AgentError::Parse(
                "Parsing LLM output produced both a final answer and a parse-able action".into(),
            ));
        }
        let start = caps.get(0).map_or(0, |m| m.start());
        let tool = caps.get(1).map_or("", |m| m.as_str()).trim().to_string();
        let raw_input = caps.get(2).map_or("", |m| m.as_str());
        let raw_input = raw_input
            .split_once(OBSERVATION_STOP.trim_start())
            .map_or(raw_input, |(head, _)| head);
        let input = raw_input.trim().trim_matches('"').to_string();

        return Ok(ReactOutput::Action {
            thought: clean_thought(&text[..start]),
            tool,
            input,
        });
    }

    if let Some((head, answer)) = text.rsplit_once(FINAL_ANSWER_MARKER) {
        return Ok(ReactOutput::Finish {
            thought: clean_thought(head),
            answer: answer.trim().to_string(),
        });
    }

    if !ACTION_ONLY_RE.is_match(text) {
        return Err(AgentError::Parse(
            "Invalid Format: Missing 'Action:' after 'Thought:'".into(),
        ));
    }
    if !ACTION_INPUT_RE.is_match(text) {
        return Err(AgentError::Parse(
            "Invalid Format: Missing 'Action Input:' after 'Action:'".into(),
        ));
    }
    Err(AgentError::Parse(format!("Could not parse LLM output: `{text}`")))
}

fn clean_thought(text: &str) -> String {
    let text = text.trim();
    text.strip_prefix("Thought:").unwrap_or(text).trim().to_string()
}

/// The main Agent struct
pub struct Agent {
    provider: Arc<dyn LlmProvider>,
    tools: Arc<ToolRegistry>,
    prompt: PromptTemplate,
    config: AgentConfig,
}

impl std::fmt::Debug for Agent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Agent")
            .field("provider", &self.provider.name())
            .field("tools", &self.tools.names())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Agent {
    /// Create a new agent, validating the prompt and iteration bound
    pub fn new(
        provider: Arc<dyn LlmProvider>,
        tools: Arc<ToolRegistry>,
        mut config: AgentConfig,
    ) -> Result<Self> {
        if config.max_iterations == 0 {
            return Err(AgentError::Config("max_iterations must be at least 1".into()));
        }

        let prompt = PromptTemplate::new(config.prompt.clone())?;
        for required in ["input", "agent_scratchpad"] {
            if !prompt.placeholders().contains(required) {
                return Err(AgentError::Config(format!(
                    "agent prompt must contain a {{{required}}} placeholder"
                )));
            }
        }

        if !config.generation.stop_sequences.iter().any(|s| s == OBSERVATION_STOP) {
            config.generation.stop_sequences.push(OBSERVATION_STOP.into());
        }

        Ok(Self {
            provider,
            tools,
            prompt,
            config,
        })
    }

    /// Answer a single input with no conversation history
    pub async fn run(&self, input: &str) -> Result<AgentResult> {
        self.execute(input, "").await
    }

    /// Answer with the memory transcript in context, then record the exchange
    ///
    /// Memory is only touched when the run succeeds.
    pub async fn run_with_memory(
        &self,
        input: &str,
        memory: &mut ConversationMemory,
    ) -> Result<AgentResult> {
        let history = if memory.is_empty() {
            String::new()
        } else {
            format!("Previous conversation:\n{}\n\n", memory.render())
        };

        let result = self.execute(input, &history).await?;
        memory.record(input, result.output.clone());
        Ok(result)
    }

    async fn execute(&self, input: &str, history: &str) -> Result<AgentResult> {
        let run_id = Uuid::new_v4();
        let span = tracing::info_span!("agent_run", %run_id, provider = self.provider.name());

        async move {
            let mut steps: Vec<AgentStep> = Vec::new();

            for iteration in 1..=self.config.max_iterations {
                let prompt = self.render_prompt(input, history, &steps)?;
                let text = self
                    .provider
                    .complete_prompt(&prompt, &self.config.generation)
                    .await?;

                match parse_react_output(&text) {
                    Ok(ReactOutput::Finish { answer, .. }) => {
                        tracing::debug!(iteration, "Agent finished");
                        return Ok(AgentResult {
                            output: answer,
                            steps,
                            iterations: iteration,
                        });
                    }
                    Ok(ReactOutput::Action { thought, tool, input: tool_input }) => {
                        let call = ToolCall::new(tool, tool_input);
                        let result = self.execute_tool(&call).await?;
                        tracing::debug!(iteration, tool = %call.name, success = result.success, "Observation recorded");
                        steps.push(AgentStep {
                            thought,
                            action: AgentAction {
                                tool: call.name,
                                input: call.input,
                            },
                            observation: result.output,
                            log: text,
                        });
                    }
                    Err(AgentError::Parse(notice)) => {
                        tracing::warn!(iteration, %notice, "Unparseable model output, re-prompting");
                        steps.push(AgentStep {
                            thought: String::new(),
                            action: AgentAction {
                                tool: EXCEPTION_ACTION.into(),
                                input: text.clone(),
                            },
                            observation: notice,
                            log: text,
                        });
                    }
                    Err(e) => return Err(e),
                }
            }

            tracing::warn!(max = self.config.max_iterations, "Agent hit iteration bound");
            Err(AgentError::MaxIterations(self.config.max_iterations))
        }
        .instrument(span)
        .await
    }

    /// Render the full reasoning prompt for the current trace
    pub fn render_prompt(&self, input: &str, history: &str, steps: &[AgentStep]) -> Result<String> {
        let scratchpad: String = steps
            .iter()
            .map(|step| format!("{}\nObservation: {}\nThought: ", step.log, step.observation))
            .collect();

        let vars: HashMap<&str, String> = HashMap::from([
            ("tools", self.tools.generate_prompt_section()),
            ("tool_names", self.tools.names().join(", ")),
            ("chat_history", history.to_string()),
            ("input", input.to_string()),
            ("agent_scratchpad", scratchpad),
        ]);
        self.prompt.render(&vars)
    }

    /// Execute a tool call, turning recoverable failures into observations
    async fn execute_tool(&self, call: &ToolCall) -> Result<ToolResult> {
        tracing::info!(tool = %call.name, input = %call.input, "Executing tool");

        match self.tools.execute(call).await {
            Ok(result) => Ok(result),
            Err(AgentError::ToolNotFound(name)) => Ok(ToolResult::failure(
                &name,
                format!(
                    "{name} is not a valid tool, try one of [{}].",
                    self.tools.names().join(", ")
                ),
            )),
            Err(e) => match self.config.tool_error_policy {
                ToolErrorPolicy::Fail => Err(e),
                ToolErrorPolicy::Observe => {
                    tracing::warn!(tool = %call.name, error = %e, "Tool failed, continuing");
                    Ok(ToolResult::failure(&call.name, format!("Error: {e}")))
                }
            },
        }
    }

    /// Get configuration
    pub const fn config(&self) -> &AgentConfig {
        &self.config
    }
}

/// Builder for Agent configuration
pub struct AgentBuilder {
    provider: Option<Arc<dyn LlmProvider>>,
    tools: ToolRegistry,
    config: AgentConfig,
}

impl Default for AgentBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl AgentBuilder {
    pub fn new() -> Self {
        Self {
            provider: None,
            tools: ToolRegistry::new(),
            config: AgentConfig::default(),
        }
    }

    #[must_use]
    pub fn provider(mut self, provider: Arc<dyn LlmProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    #[must_use]
    pub fn tool<T: Tool + 'static>(mut self, tool: T) -> Self {
        self.tools.register(tool);
        self
    }

    #[must_use]
    pub fn tools(mut self, tools: ToolRegistry) -> Self {
        self.tools = tools;
        self
    }

    #[must_use]
    pub fn prompt(mut self, prompt: impl Into<String>) -> Self {
        self.config.prompt = prompt.into();
        self
    }

    #[must_use]
    pub fn generation(mut self, generation: GenerationOptions) -> Self {
        self.config.generation = generation;
        self
    }

    #[must_use]
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.generation.model = model.into();
        self
    }

    #[must_use]
    pub fn temperature(mut self, temp: f32) -> Self {
        self.config.generation.temperature = temp;
        self
    }

    #[must_use]
    pub fn max_iterations(mut self, max: usize) -> Self {
        self.config.max_iterations = max;
        self
    }

    #[must_use]
    pub fn tool_error_policy(mut self, policy: ToolErrorPolicy) -> Self {
        self.config.tool_error_policy = policy;
        self
    }

    pub fn build(self) -> Result<Agent> {
        let provider = self
            .provider
            .ok_or_else(|| AgentError::Config("Provider is required".into()))?;

        Agent::new(provider, Arc::new(self.tools), self.config)
    }
}
