// ABOUTME: Model client abstraction — OpenAI-compatible chat types and the LlmClient trait.
// ABOUTME: Requests carry messages plus tool specs; responses arrive as a stream of chunks.

pub mod groq;

use std::pin::Pin;

use futures::Stream;
use serde::{Deserialize, Serialize};

pub use groq::GroqClient;

/// One message on the wire. `content` is absent for assistant messages that
/// carry only tool calls; `tool_call_id` is set only on tool-result messages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiMessage {
    pub role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<ToolCall>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

impl ApiMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: Some(content.into()),
            tool_calls: None,
            tool_call_id: None,
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: Some(content.into()),
            tool_calls: None,
            tool_call_id: None,
        }
    }

    /// An assistant message echoing what the model produced in one round:
    /// optional text plus the tool calls it requested.
    pub fn assistant(content: Option<String>, tool_calls: Vec<ToolCall>) -> Self {
        Self {
            role: "assistant".to_string(),
            content,
            tool_calls: if tool_calls.is_empty() {
                None
            } else {
                Some(tool_calls)
            },
            tool_call_id: None,
        }
    }

    /// The result of executing one tool call, addressed by its id.
    pub fn tool_result(tool_call_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: "tool".to_string(),
            content: Some(content.into()),
            tool_calls: None,
            tool_call_id: Some(tool_call_id.into()),
        }
    }
}

/// A completed tool call requested by the model. `arguments` is the raw JSON
/// string exactly as the model produced it — parsing happens at execution
/// time so malformed arguments can be reported back to the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCall {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub function: FunctionCall,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionCall {
    pub name: String,
    pub arguments: String,
}

/// A tool made available to the model for one request.
#[derive(Debug, Clone, Serialize)]
pub struct ToolSpec {
    #[serde(rename = "type")]
    pub kind: String,
    pub function: FunctionSpec,
}

#[derive(Debug, Clone, Serialize)]
pub struct FunctionSpec {
    pub name: String,
    pub description: String,
    pub parameters: serde_json::Value,
}

impl ToolSpec {
    pub fn function(name: &str, description: &str, parameters: serde_json::Value) -> Self {
        Self {
            kind: "function".to_string(),
            function: FunctionSpec {
                name: name.to_string(),
                description: description.to_string(),
                parameters,
            },
        }
    }
}

/// One streaming chat-completion request.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ApiMessage>,
    pub temperature: f32,
    pub max_tokens: u32,
    pub stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<ToolSpec>>,
}

/// Incremental events decoded from the model's response stream.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamChunk {
    /// A fragment of assistant text.
    TextDelta(String),
    /// A fragment of a tool call. `id` and `name` arrive on the first
    /// fragment for an index; `arguments` accumulates across fragments.
    ToolCallDelta {
        index: usize,
        id: Option<String>,
        name: Option<String>,
        arguments: String,
    },
    /// The model's reason for stopping ("stop", "tool_calls", "length", ...).
    FinishReason(String),
    /// Token usage reported at the end of the stream.
    Usage {
        prompt_tokens: u32,
        completion_tokens: u32,
    },
}

pub type ChunkStream = Pin<Box<dyn Stream<Item = anyhow::Result<StreamChunk>> + Send>>;

/// A streaming chat-completion client.
pub trait LlmClient: Send + Sync {
    fn stream_chat(&self, request: &ChatRequest) -> ChunkStream;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_message_serializes_minimal_fields() {
        let msg = ApiMessage::user("hello");
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["role"], "user");
        assert_eq!(json["content"], "hello");
        assert!(json.get("tool_calls").is_none());
        assert!(json.get("tool_call_id").is_none());
    }

    #[test]
    fn assistant_message_with_tool_calls() {
        let call = ToolCall {
            id: "call-1".to_string(),
            kind: "function".to_string(),
            function: FunctionCall {
                name: "search".to_string(),
                arguments: r#"{"query":"rust"}"#.to_string(),
            },
        };
        let msg = ApiMessage::assistant(None, vec![call]);
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["role"], "assistant");
        assert!(json.get("content").is_none());
        assert_eq!(json["tool_calls"][0]["function"]["name"], "search");
        assert_eq!(json["tool_calls"][0]["type"], "function");
    }

    #[test]
    fn assistant_message_without_tool_calls_omits_field() {
        let msg = ApiMessage::assistant(Some("done".to_string()), vec![]);
        let json = serde_json::to_value(&msg).unwrap();
        assert!(json.get("tool_calls").is_none());
        assert_eq!(json["content"], "done");
    }

    #[test]
    fn tool_result_message_carries_call_id() {
        let msg = ApiMessage::tool_result("call-7", "result text");
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["role"], "tool");
        assert_eq!(json["tool_call_id"], "call-7");
        assert_eq!(json["content"], "result text");
    }

    #[test]
    fn tool_spec_serializes_as_function() {
        let spec = ToolSpec::function(
            "wikipedia",
            "Look things up",
            serde_json::json!({"type": "object"}),
        );
        let json = serde_json::to_value(&spec).unwrap();
        assert_eq!(json["type"], "function");
        assert_eq!(json["function"]["name"], "wikipedia");
        assert_eq!(json["function"]["parameters"]["type"], "object");
    }

    #[test]
    fn request_omits_tools_when_none() {
        let request = ChatRequest {
            model: "llama3-8b-8192".to_string(),
            messages: vec![ApiMessage::user("hi")],
            temperature: 0.7,
            max_tokens: 1024,
            stream: true,
            tools: None,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert!(json.get("tools").is_none());
        assert_eq!(json["stream"], true);
    }
}
