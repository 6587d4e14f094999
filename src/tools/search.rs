// ABOUTME: Web search tool — DuckDuckGo Instant Answer API.
// ABOUTME: Prefers a direct answer, then the abstract, then related topic snippets.

use async_trait::async_trait;
use serde::Deserialize;

use crate::tools::{Tool, ToolResult};

const ENDPOINT: &str = "https://api.duckduckgo.com/";

/// How many related-topic snippets to include when there is no direct
/// answer or abstract.
const MAX_TOPICS: usize = 3;

/// General web search backed by DuckDuckGo's Instant Answer API. No API key
/// required.
pub struct SearchTool {
    http: reqwest::Client,
}

impl SearchTool {
    pub fn new(http: reqwest::Client) -> Self {
        Self { http }
    }
}

#[async_trait]
impl Tool for SearchTool {
    fn name(&self) -> &str {
        "search"
    }

    fn description(&self) -> &str {
        "Search the web for current information. Use for news, recent events, and general lookups."
    }

    fn schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "The search query"
                }
            },
            "required": ["query"]
        })
    }

    async fn execute(&self, params: serde_json::Value) -> anyhow::Result<ToolResult> {
        let Some(query) = params.get("query").and_then(|v| v.as_str()) else {
            return Ok(ToolResult::error("Missing required parameter 'query'"));
        };

        let resp = self
            .http
            .get(ENDPOINT)
            .query(&[
                ("q", query),
                ("format", "json"),
                ("no_html", "1"),
                ("skip_disambig", "1"),
            ])
            .send()
            .await?
            .error_for_status()?
            .json::<DdgResponse>()
            .await?;

        Ok(ToolResult::text(format_results(&resp, query)))
    }
}

#[derive(Debug, Deserialize, Default)]
struct DdgResponse {
    #[serde(rename = "Answer", default)]
    answer: String,
    #[serde(rename = "AbstractText", default)]
    abstract_text: String,
    #[serde(rename = "AbstractSource", default)]
    abstract_source: String,
    #[serde(rename = "RelatedTopics", default)]
    related_topics: Vec<DdgTopic>,
}

/// Related topics are either leaf snippets or nested category groups.
#[derive(Debug, Deserialize, Default)]
struct DdgTopic {
    #[serde(rename = "Text", default)]
    text: String,
    #[serde(rename = "Topics", default)]
    topics: Vec<DdgTopic>,
}

/// Flatten topic groups into leaf snippet texts, depth-first.
fn flatten_topics<'a>(topics: &'a [DdgTopic], out: &mut Vec<&'a str>) {
    for topic in topics {
        if !topic.text.is_empty() {
            out.push(&topic.text);
        }
        flatten_topics(&topic.topics, out);
    }
}

fn format_results(resp: &DdgResponse, query: &str) -> String {
    if !resp.answer.is_empty() {
        return resp.answer.clone();
    }

    if !resp.abstract_text.is_empty() {
        if resp.abstract_source.is_empty() {
            return resp.abstract_text.clone();
        }
        return format!("{} (source: {})", resp.abstract_text, resp.abstract_source);
    }

    let mut snippets = Vec::new();
    flatten_topics(&resp.related_topics, &mut snippets);
    if !snippets.is_empty() {
        return snippets
            .iter()
            .take(MAX_TOPICS)
            .map(|s| format!("- {}", s))
            .collect::<Vec<_>>()
            .join("\n");
    }

    format!("No results found for '{}'.", query)
}
