// ABOUTME: Wikipedia lookup tool — MediaWiki search with plain-text intro extracts.
// ABOUTME: Capped at top_k pages, each summary truncated to max_chars characters.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::Deserialize;

use crate::tools::{Tool, ToolResult, truncate_chars};

const ENDPOINT: &str = "https://en.wikipedia.org/w/api.php";

/// Encyclopedia lookup against the English Wikipedia. One API round-trip:
/// generator=search drives prop=extracts so search hits come back with
/// their intro text already attached.
pub struct WikipediaTool {
    http: reqwest::Client,
    top_k: usize,
    max_chars: usize,
}

impl WikipediaTool {
    pub fn new(http: reqwest::Client, top_k: usize, max_chars: usize) -> Self {
        Self {
            http,
            top_k,
            max_chars,
        }
    }
}

#[async_trait]
impl Tool for WikipediaTool {
    fn name(&self) -> &str {
        "wikipedia"
    }

    fn description(&self) -> &str {
        "Look up encyclopedic facts on Wikipedia. Returns a short summary of the best-matching page."
    }

    fn schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "Topic or phrase to look up"
                }
            },
            "required": ["query"]
        })
    }

    async fn execute(&self, params: serde_json::Value) -> anyhow::Result<ToolResult> {
        let Some(query) = params.get("query").and_then(|v| v.as_str()) else {
            return Ok(ToolResult::error("Missing required parameter 'query'"));
        };

        let limit = self.top_k.to_string();
        let resp = self
            .http
            .get(ENDPOINT)
            .query(&[
                ("action", "query"),
                ("format", "json"),
                ("generator", "search"),
                ("gsrsearch", query),
                ("gsrlimit", limit.as_str()),
                ("prop", "extracts"),
                ("exintro", "1"),
                ("explaintext", "1"),
            ])
            .send()
            .await?
            .error_for_status()?
            .json::<QueryResponse>()
            .await?;

        Ok(ToolResult::text(format_pages(
            &resp,
            query,
            self.top_k,
            self.max_chars,
        )))
    }
}

#[derive(Debug, Deserialize, Default)]
struct QueryResponse {
    #[serde(default)]
    query: Option<QueryPages>,
}

#[derive(Debug, Deserialize, Default)]
struct QueryPages {
    #[serde(default)]
    pages: HashMap<String, Page>,
}

#[derive(Debug, Deserialize)]
struct Page {
    title: String,
    #[serde(default)]
    extract: Option<String>,
    /// Search rank of the page within the result set.
    #[serde(default)]
    index: Option<i64>,
}

fn format_pages(resp: &QueryResponse, query: &str, top_k: usize, max_chars: usize) -> String {
    let Some(query_pages) = &resp.query else {
        return format!("No Wikipedia results for '{}'.", query);
    };

    let mut pages: Vec<&Page> = query_pages.pages.values().collect();
    pages.sort_by_key(|p| p.index.unwrap_or(i64::MAX));

    let formatted: Vec<String> = pages
        .iter()
        .take(top_k)
        .map(|page| {
            let summary = page
                .extract
                .as_deref()
                .filter(|e| !e.is_empty())
                .map(|e| truncate_chars(e, max_chars))
                .unwrap_or_else(|| "(no summary available)".to_string());
            format!("Page: {}\nSummary: {}", page.title, summary)
        })
        .collect();

    if formatted.is_empty() {
        return format!("No Wikipedia results for '{}'.", query);
    }

    formatted.join("\n\n")
}
