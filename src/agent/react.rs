// ABOUTME: Per-turn agent — streams one model conversation, executing requested tool calls.
// ABOUTME: Built fresh each turn by an AgentFactory; sees only the current question.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use futures::StreamExt;
use tokio::sync::mpsc;

use crate::config::Config;
use crate::llm::{
    ApiMessage, ChatRequest, FunctionCall, GroqClient, LlmClient, StreamChunk, ToolCall,
};
use crate::prompt::build_system_prompt;
use crate::tools::{ToolResult, Toolbox};
use crate::tui::state::AgentEvent;

/// A stateless invocation handle for one turn: given the user's question it
/// produces a final answer, possibly calling tools along the way.
#[async_trait]
pub trait TurnAgent: Send + Sync {
    async fn answer(
        &self,
        question: &str,
        events: &mpsc::Sender<AgentEvent>,
    ) -> anyhow::Result<String>;
}

/// Pure factory: (secret, model, toolset) → agent. Called once per turn so
/// every turn gets a freshly constructed client and toolbox; nothing is
/// cached across turns.
pub trait AgentFactory: Send + Sync {
    fn build(&self, api_key: &str) -> anyhow::Result<Box<dyn TurnAgent>>;
}

/// Factory for the real Groq-backed agent.
pub struct GroqAgentFactory {
    config: Config,
}

impl GroqAgentFactory {
    pub fn new(config: Config) -> Self {
        Self { config }
    }
}

impl AgentFactory for GroqAgentFactory {
    fn build(&self, api_key: &str) -> anyhow::Result<Box<dyn TurnAgent>> {
        let client = GroqClient::new(api_key, &self.config.llm.base_url)?;
        let toolbox = Toolbox::builtin(&self.config.tools)?;
        Ok(Box::new(ReactAgent::new(
            Arc::new(client),
            toolbox,
            &self.config,
        )))
    }
}

/// Metadata tracked for a tool call being assembled from streaming deltas.
struct PendingToolCall {
    id: String,
    name: String,
    arguments: String,
}

/// The tool-calling loop: stream a response, run any requested tools, feed
/// the results back, and repeat until the model answers in plain text or the
/// step budget runs out.
pub struct ReactAgent {
    client: Arc<dyn LlmClient>,
    toolbox: Toolbox,
    model: String,
    max_tokens: u32,
    temperature: f32,
    max_steps: usize,
}

impl ReactAgent {
    pub fn new(client: Arc<dyn LlmClient>, toolbox: Toolbox, config: &Config) -> Self {
        Self {
            client,
            toolbox,
            model: config.llm.model.clone(),
            max_tokens: config.llm.max_tokens,
            temperature: config.llm.temperature,
            max_steps: config.agent.max_steps,
        }
    }

    /// Stream one model response, forwarding text deltas and assembling tool
    /// calls. Returns the accumulated text and completed tool calls.
    async fn stream_round(
        &self,
        request: &ChatRequest,
        events: &mpsc::Sender<AgentEvent>,
    ) -> anyhow::Result<(String, Vec<ToolCall>)> {
        let mut stream = self.client.stream_chat(request);

        let mut text = String::new();
        let mut pending: BTreeMap<usize, PendingToolCall> = BTreeMap::new();

        while let Some(chunk) = stream.next().await {
            match chunk? {
                StreamChunk::TextDelta(delta) => {
                    text.push_str(&delta);
                    let _ = events.send(AgentEvent::TextDelta(delta)).await;
                }
                StreamChunk::ToolCallDelta {
                    index,
                    id,
                    name,
                    arguments,
                } => {
                    let call = pending.entry(index).or_insert_with(|| PendingToolCall {
                        id: String::new(),
                        name: String::new(),
                        arguments: String::new(),
                    });
                    if let Some(id) = id {
                        call.id = id;
                    }
                    if let Some(name) = name {
                        call.name = name;
                    }
                    call.arguments.push_str(&arguments);
                }
                StreamChunk::FinishReason(_) => {}
                StreamChunk::Usage {
                    prompt_tokens,
                    completion_tokens,
                } => {
                    let _ = events
                        .send(AgentEvent::Usage {
                            prompt_tokens,
                            completion_tokens,
                        })
                        .await;
                }
            }
        }

        let tool_calls = pending
            .into_values()
            .map(|call| ToolCall {
                id: call.id,
                kind: "function".to_string(),
                function: FunctionCall {
                    name: call.name,
                    arguments: call.arguments,
                },
            })
            .collect();

        Ok((text, tool_calls))
    }

    /// Execute a single tool call. Failures — unknown tool, arguments that
    /// don't parse as JSON, execution errors — become error-flagged results
    /// that go back to the model, which gets a chance to correct itself.
    async fn run_tool(&self, call: &ToolCall) -> ToolResult {
        let Some(tool) = self.toolbox.get(&call.function.name) else {
            return ToolResult::error(format!("Tool '{}' not found", call.function.name));
        };

        let params: serde_json::Value = match serde_json::from_str(&call.function.arguments) {
            Ok(params) => params,
            Err(e) => {
                return ToolResult::error(format!("Invalid tool arguments: {}", e));
            }
        };

        match tool.execute(params).await {
            Ok(result) => result,
            Err(e) => ToolResult::error(format!("Tool execution error: {}", e)),
        }
    }
}

#[async_trait]
impl TurnAgent for ReactAgent {
    async fn answer(
        &self,
        question: &str,
        events: &mpsc::Sender<AgentEvent>,
    ) -> anyhow::Result<String> {
        let mut messages = vec![
            ApiMessage::system(build_system_prompt(&self.toolbox.names())),
            ApiMessage::user(question),
        ];

        for _ in 0..self.max_steps {
            let request = ChatRequest {
                model: self.model.clone(),
                messages: messages.clone(),
                temperature: self.temperature,
                max_tokens: self.max_tokens,
                stream: true,
                tools: Some(self.toolbox.to_specs()),
            };

            let (text, tool_calls) = self.stream_round(&request, events).await?;

            if tool_calls.is_empty() {
                let _ = events.send(AgentEvent::TextDone).await;
                return Ok(text);
            }

            // Record the assistant's round, then answer each tool call.
            messages.push(ApiMessage::assistant(
                if text.is_empty() { None } else { Some(text) },
                tool_calls.clone(),
            ));

            for call in &tool_calls {
                let _ = events
                    .send(AgentEvent::ToolCallStarted {
                        tool_name: call.function.name.clone(),
                        params_summary: summarize_params(&call.function.arguments),
                    })
                    .await;

                let result = self.run_tool(call).await;

                let _ = events
                    .send(AgentEvent::ToolResult {
                        tool_name: call.function.name.clone(),
                        content: result.content.clone(),
                        is_error: result.is_error,
                    })
                    .await;

                messages.push(ApiMessage::tool_result(&call.id, &result.content));
            }
        }

        anyhow::bail!(
            "agent stopped after {} tool rounds without a final answer",
            self.max_steps
        )
    }
}

/// Summarize tool arguments for display, truncating to 80 characters.
fn summarize_params(arguments: &str) -> String {
    let truncated: String = arguments.chars().take(80).collect();
    if truncated.len() < arguments.len() {
        format!("{}...", truncated)
    } else {
        arguments.to_string()
    }
}
