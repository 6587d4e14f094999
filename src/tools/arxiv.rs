// ABOUTME: arXiv lookup tool — queries the arXiv Atom API for paper metadata.
// ABOUTME: Extracts title/published/summary per entry, capped at top_k results.

use async_trait::async_trait;

use crate::tools::{Tool, ToolResult, truncate_chars};

const ENDPOINT: &str = "https://export.arxiv.org/api/query";

/// Academic paper lookup against the arXiv Atom API. The feed is a small,
/// fixed XML dialect; entries are extracted with a local tag scanner since
/// nothing else in the crate needs XML.
pub struct ArxivTool {
    http: reqwest::Client,
    top_k: usize,
    max_chars: usize,
}

impl ArxivTool {
    pub fn new(http: reqwest::Client, top_k: usize, max_chars: usize) -> Self {
        Self {
            http,
            top_k,
            max_chars,
        }
    }
}

#[async_trait]
impl Tool for ArxivTool {
    fn name(&self) -> &str {
        "arxiv"
    }

    fn description(&self) -> &str {
        "Search arXiv for academic papers. Returns title, publication date, and a short abstract."
    }

    fn schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "Paper topic, title keywords, or author to search for"
                }
            },
            "required": ["query"]
        })
    }

    async fn execute(&self, params: serde_json::Value) -> anyhow::Result<ToolResult> {
        let Some(query) = params.get("query").and_then(|v| v.as_str()) else {
            return Ok(ToolResult::error("Missing required parameter 'query'"));
        };

        let search_query = format!("all:{}", query);
        let max_results = self.top_k.to_string();
        let body = self
            .http
            .get(ENDPOINT)
            .query(&[
                ("search_query", search_query.as_str()),
                ("start", "0"),
                ("max_results", max_results.as_str()),
            ])
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let entries = parse_entries(&body);
        Ok(ToolResult::text(format_entries(
            &entries,
            query,
            self.top_k,
            self.max_chars,
        )))
    }
}

/// One paper pulled out of the Atom feed.
#[derive(Debug, PartialEq)]
pub struct ArxivEntry {
    pub title: String,
    pub published: String,
    pub summary: String,
}

/// Extract entries from an arXiv Atom feed.
pub fn parse_entries(xml: &str) -> Vec<ArxivEntry> {
    let mut entries = Vec::new();
    let mut rest = xml;

    while let Some(start) = rest.find("<entry>") {
        let after = &rest[start + "<entry>".len()..];
        let Some(end) = after.find("</entry>") else {
            break;
        };
        let entry = &after[..end];
        entries.push(ArxivEntry {
            title: tag_text(entry, "title").unwrap_or_default(),
            published: tag_text(entry, "published").unwrap_or_default(),
            summary: tag_text(entry, "summary").unwrap_or_default(),
        });
        rest = &after[end + "</entry>".len()..];
    }

    entries
}

/// Pull the text of the first `<tag ...>...</tag>` occurrence, with
/// whitespace collapsed and XML entities unescaped.
fn tag_text(xml: &str, tag: &str) -> Option<String> {
    let open = format!("<{}", tag);
    let close = format!("</{}>", tag);

    let start = xml.find(&open)?;
    let after_open = &xml[start + open.len()..];
    // Skip attributes up to the closing '>' of the opening tag.
    let content_start = after_open.find('>')? + 1;
    let content = &after_open[content_start..];
    let end = content.find(&close)?;

    let raw = &content[..end];
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    Some(unescape(&collapsed))
}

/// Decode the five predefined XML entities.
fn unescape(s: &str) -> String {
    s.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

fn format_entries(entries: &[ArxivEntry], query: &str, top_k: usize, max_chars: usize) -> String {
    if entries.is_empty() {
        return format!("No arXiv results for '{}'.", query);
    }

    entries
        .iter()
        .take(top_k)
        .map(|entry| {
            // The feed's timestamp is RFC 3339; the date part is enough.
            let date = entry.published.split('T').next().unwrap_or_default();
            format!(
                "Published: {}\nTitle: {}\nSummary: {}",
                date,
                entry.title,
                truncate_chars(&entry.summary, max_chars)
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}
