// ABOUTME: Groq chat client — streams OpenAI-compatible completions over SSE.
// ABOUTME: Decodes data lines into StreamChunks, carrying partial lines across network chunks.

use futures::StreamExt;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::Deserialize;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;

use crate::llm::{ChatRequest, ChunkStream, LlmClient, StreamChunk};

/// Streaming client for the Groq chat completions endpoint.
pub struct GroqClient {
    http: reqwest::Client,
    base_url: String,
}

impl GroqClient {
    /// Build a client bound to the given API key and base URL. The key goes
    /// into a default Authorization header and is not stored separately.
    pub fn new(api_key: &str, base_url: &str) -> anyhow::Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", api_key))
            .map_err(|e| anyhow::anyhow!("invalid API key format: {}", e))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(concat!("scout/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

impl LlmClient for GroqClient {
    fn stream_chat(&self, request: &ChatRequest) -> ChunkStream {
        let url = format!("{}/chat/completions", self.base_url);
        let client = self.http.clone();
        let request = request.clone();

        let (tx, rx) = mpsc::channel::<anyhow::Result<StreamChunk>>(32);

        tokio::spawn(async move {
            let resp = match client.post(&url).json(&request).send().await {
                Ok(resp) => resp,
                Err(e) => {
                    let _ = tx.send(Err(anyhow::anyhow!("request failed: {}", e))).await;
                    return;
                }
            };

            let status = resp.status();
            if !status.is_success() {
                let body = resp.text().await.unwrap_or_default();
                let _ = tx
                    .send(Err(anyhow::anyhow!(
                        "Groq API error {}: {}",
                        status,
                        body.trim()
                    )))
                    .await;
                return;
            }

            let mut lines = SseLineBuffer::new();
            let mut stream = resp.bytes_stream();

            while let Some(chunk_result) = stream.next().await {
                let bytes = match chunk_result {
                    Ok(bytes) => bytes,
                    Err(e) => {
                        let _ = tx.send(Err(anyhow::anyhow!("stream error: {}", e))).await;
                        return;
                    }
                };

                for line in lines.push(&bytes) {
                    let Some(data) = line.strip_prefix("data: ") else {
                        continue;
                    };
                    if data == "[DONE]" {
                        return;
                    }
                    match decode_data(data) {
                        Ok(chunks) => {
                            for chunk in chunks {
                                if tx.send(Ok(chunk)).await.is_err() {
                                    return;
                                }
                            }
                        }
                        Err(e) => {
                            let _ = tx.send(Err(e)).await;
                            return;
                        }
                    }
                }
            }
        });

        Box::pin(ReceiverStream::new(rx))
    }
}

/// Accumulates raw network bytes and yields complete lines, keeping any
/// trailing partial line for the next push.
struct SseLineBuffer {
    buf: String,
}

impl SseLineBuffer {
    fn new() -> Self {
        Self { buf: String::new() }
    }

    fn push(&mut self, bytes: &[u8]) -> Vec<String> {
        self.buf.push_str(&String::from_utf8_lossy(bytes));
        let mut lines = Vec::new();
        while let Some(pos) = self.buf.find('\n') {
            let line: String = self.buf.drain(..=pos).collect();
            lines.push(line.trim_end_matches(['\n', '\r']).to_string());
        }
        lines
    }
}

#[derive(Deserialize)]
struct StreamResponse {
    #[serde(default)]
    choices: Vec<StreamChoice>,
    #[serde(default)]
    x_groq: Option<XGroq>,
}

#[derive(Deserialize)]
struct StreamChoice {
    #[serde(default)]
    delta: Delta,
    finish_reason: Option<String>,
}

#[derive(Deserialize, Default)]
struct Delta {
    content: Option<String>,
    tool_calls: Option<Vec<ToolCallChunk>>,
}

#[derive(Deserialize)]
struct ToolCallChunk {
    index: usize,
    id: Option<String>,
    function: Option<FunctionChunk>,
}

#[derive(Deserialize)]
struct FunctionChunk {
    name: Option<String>,
    arguments: Option<String>,
}

#[derive(Deserialize)]
struct XGroq {
    usage: Option<UsageInfo>,
}

#[derive(Deserialize)]
struct UsageInfo {
    #[serde(default)]
    prompt_tokens: u32,
    #[serde(default)]
    completion_tokens: u32,
}

/// Decode one SSE data payload into stream chunks.
fn decode_data(data: &str) -> anyhow::Result<Vec<StreamChunk>> {
    let resp: StreamResponse = serde_json::from_str(data)
        .map_err(|e| anyhow::anyhow!("malformed stream payload: {} ({})", e, data))?;

    let mut chunks = Vec::new();
    for choice in resp.choices {
        if let Some(text) = choice.delta.content
            && !text.is_empty()
        {
            chunks.push(StreamChunk::TextDelta(text));
        }
        if let Some(tool_calls) = choice.delta.tool_calls {
            for call in tool_calls {
                let (name, arguments) = match call.function {
                    Some(f) => (f.name, f.arguments.unwrap_or_default()),
                    None => (None, String::new()),
                };
                chunks.push(StreamChunk::ToolCallDelta {
                    index: call.index,
                    id: call.id,
                    name,
                    arguments,
                });
            }
        }
        if let Some(reason) = choice.finish_reason {
            chunks.push(StreamChunk::FinishReason(reason));
        }
    }

    if let Some(usage) = resp.x_groq.and_then(|x| x.usage) {
        chunks.push(StreamChunk::Usage {
            prompt_tokens: usage.prompt_tokens,
            completion_tokens: usage.completion_tokens,
        });
    }

    Ok(chunks)
}
