// ABOUTME: Tool abstraction and the fixed three-tool toolbox.
// ABOUTME: Every agent is built over exactly: web search, Wikipedia, arXiv.

pub mod arxiv;
pub mod search;
pub mod wikipedia;

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::ToolsConfig;
use crate::llm::ToolSpec;

pub use arxiv::ArxivTool;
pub use search::SearchTool;
pub use wikipedia::WikipediaTool;

/// The outcome of executing one tool call. Errors are data, not panics —
/// they flow back to the model as an error-flagged result.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolResult {
    pub content: String,
    pub is_error: bool,
}

impl ToolResult {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            is_error: false,
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            is_error: true,
        }
    }
}

/// A named capability the model may invoke.
#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    /// JSON Schema for the tool's arguments object.
    fn schema(&self) -> serde_json::Value;

    async fn execute(&self, params: serde_json::Value) -> anyhow::Result<ToolResult>;
}

/// The fixed set of tools handed to the agent. Built fresh per turn along
/// with the agent itself; membership never depends on the prompt.
pub struct Toolbox {
    tools: Vec<Arc<dyn Tool>>,
}

impl Toolbox {
    /// Wrap an explicit tool list (used by tests to inject mocks).
    pub fn new(tools: Vec<Arc<dyn Tool>>) -> Self {
        Self { tools }
    }

    /// The three built-in tools, sharing one HTTP client.
    pub fn builtin(config: &ToolsConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("scout/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self::new(vec![
            Arc::new(SearchTool::new(http.clone())),
            Arc::new(ArxivTool::new(
                http.clone(),
                config.top_k_results,
                config.max_result_chars,
            )),
            Arc::new(WikipediaTool::new(
                http,
                config.top_k_results,
                config.max_result_chars,
            )),
        ]))
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.iter().find(|t| t.name() == name).cloned()
    }

    pub fn names(&self) -> Vec<String> {
        self.tools.iter().map(|t| t.name().to_string()).collect()
    }

    /// Specs in the shape the chat completions API expects.
    pub fn to_specs(&self) -> Vec<ToolSpec> {
        self.tools
            .iter()
            .map(|t| ToolSpec::function(t.name(), t.description(), t.schema()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

/// Truncate a string to at most `max_chars` characters, respecting UTF-8
/// boundaries, appending an ellipsis when anything was cut.
pub fn truncate_chars(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &s[..idx]),
        None => s.to_string(),
    }
}
