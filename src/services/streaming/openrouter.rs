//! OpenRouter SSE Adapter
//!
//! Decodes the `data: `-prefixed server-sent-event lines of an OpenRouter
//! streaming completion. The `[DONE]` sentinel terminates the stream; every
//! other data line carries a JSON chunk with delta content and, on the final
//! chunks, usage accounting.

use outreach_core::streaming::{AdapterError, StreamAdapter, StreamEvent};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct StreamChunk {
    #[serde(default)]
    choices: Vec<StreamChoice>,
    usage: Option<ChunkUsage>,
}

#[derive(Debug, Deserialize)]
struct StreamChoice {
    #[serde(default)]
    delta: Delta,
}

#[derive(Debug, Default, Deserialize)]
struct Delta {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChunkUsage {
    #[serde(default)]
    prompt_tokens: u32,
    #[serde(default)]
    completion_tokens: u32,
}

/// Stateless adapter for OpenRouter's chat completion stream.
#[derive(Debug, Default)]
pub struct OpenRouterAdapter;

impl OpenRouterAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl StreamAdapter for OpenRouterAdapter {
    fn provider_name(&self) -> &'static str {
        "openrouter"
    }

    fn adapt(&mut self, line: &str) -> Result<Vec<StreamEvent>, AdapterError> {
        // SSE comments, event names and blank keep-alives carry no data
        let Some(data) = line.strip_prefix("data: ") else {
            return Ok(Vec::new());
        };

        if data.trim() == "[DONE]" {
            return Ok(vec![StreamEvent::Done]);
        }

        let chunk: StreamChunk = serde_json::from_str(data)
            .map_err(|e| AdapterError::Parse(format!("bad stream chunk: {}", e)))?;

        let mut events = Vec::new();
        for choice in chunk.choices {
            if let Some(content) = choice.delta.content {
                if !content.is_empty() {
                    events.push(StreamEvent::TextDelta { content });
                }
            }
        }
        if let Some(usage) = chunk.usage {
            events.push(StreamEvent::Usage {
                prompt_tokens: usage.prompt_tokens,
                completion_tokens: usage.completion_tokens,
            });
        }
        Ok(events)
    }
}
