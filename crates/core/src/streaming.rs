//! Unified Stream Event Types
//!
//! Provider-agnostic event types, the adapter trait for decoding chunked
//! stream protocols, and the carry-over line buffer that reassembles complete
//! lines across network read boundaries.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unified streaming event emitted while decoding an incremental chat
/// response. This gives callers a consistent view regardless of the wire
/// format of the provider.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamEvent {
    /// Text content delta from the model
    TextDelta { content: String },

    /// Token usage information
    Usage {
        prompt_tokens: u32,
        completion_tokens: u32,
    },

    /// The stream terminated cleanly (terminal sentinel received)
    Done,
}

/// Errors that can occur while adapting a single stream line.
///
/// These are per-line failures: the stream loop logs them and moves on, they
/// never abort the stream.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum AdapterError {
    /// Line had the data marker but the payload was not valid JSON
    #[error("parse error: {0}")]
    Parse(String),

    /// Line shape that the adapter cannot interpret
    #[error("invalid format: {0}")]
    InvalidFormat(String),
}

/// Trait for adapting provider-specific stream lines to unified events.
///
/// A single input line may produce zero, one, or multiple events.
pub trait StreamAdapter: Send + Sync {
    /// Provider name for logging and identification.
    fn provider_name(&self) -> &'static str;

    /// Adapt one complete line to unified events.
    fn adapt(&mut self, line: &str) -> Result<Vec<StreamEvent>, AdapterError>;

    /// Reset adapter state for a new stream.
    fn reset(&mut self) {}
}

/// Carry-over buffer for newline-delimited stream protocols.
///
/// Network reads do not respect line boundaries, so each chunk is appended to
/// the buffer and only complete lines are released; the trailing partial line
/// stays buffered for the next read.
#[derive(Debug, Default)]
pub struct LineBuffer {
    buf: String,
}

impl LineBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a chunk and drain every complete line it closes.
    ///
    /// Returned lines have their trailing `\r\n` / `\n` stripped.
    pub fn push(&mut self, chunk: &str) -> Vec<String> {
        self.buf.push_str(chunk);
        let mut lines = Vec::new();
        while let Some(pos) = self.buf.find('\n') {
            let line: String = self.buf.drain(..=pos).collect();
            lines.push(line.trim_end_matches(['\n', '\r']).to_string());
        }
        lines
    }

    /// Whether a partial line is still pending.
    pub fn has_remainder(&self) -> bool {
        !self.buf.is_empty()
    }
}
