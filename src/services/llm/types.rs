//! Chat Completion Types
//!
//! Conversation messages, task-type model routing, sampling options and the
//! OpenRouter wire shapes. Message roles serialize lowercase and task types
//! snake_case, matching the JSON contract shared with the frontend.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::services::transport::TransportError;

/// Role of a chat message author.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

/// One turn of a chat conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
        }
    }
}

/// Kind of work a completion request performs. Drives model selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskType {
    CompanyResearch,
    IcpConversation,
    DocumentAnalysis,
    QuickResponse,
    Synthesis,
    DataExtraction,
}

impl TaskType {
    /// Every task type, for exhaustive routing-table checks.
    pub const ALL: [TaskType; 6] = [
        TaskType::CompanyResearch,
        TaskType::IcpConversation,
        TaskType::DocumentAnalysis,
        TaskType::QuickResponse,
        TaskType::Synthesis,
        TaskType::DataExtraction,
    ];
}

/// Static task-to-model routing table.
///
/// Deep reasoning tasks go to the stronger (and slower) model; interactive
/// and extraction tasks to the mid tier; quick replies to the cheapest one.
#[derive(Debug, Clone)]
pub struct ModelRouting {
    pub company_research: String,
    pub icp_conversation: String,
    pub document_analysis: String,
    pub quick_response: String,
    pub synthesis: String,
    pub data_extraction: String,
}

impl Default for ModelRouting {
    fn default() -> Self {
        Self {
            company_research: "anthropic/claude-3.5-sonnet".to_string(),
            icp_conversation: "openai/gpt-4-turbo".to_string(),
            document_analysis: "anthropic/claude-3.5-sonnet".to_string(),
            quick_response: "openai/gpt-4o-mini".to_string(),
            synthesis: "anthropic/claude-3.5-sonnet".to_string(),
            data_extraction: "openai/gpt-4-turbo".to_string(),
        }
    }
}

impl ModelRouting {
    /// Resolve the model identifier for a task type. `None` falls back to the
    /// quick-response model.
    pub fn model_for(&self, task: Option<TaskType>) -> &str {
        match task {
            Some(TaskType::CompanyResearch) => &self.company_research,
            Some(TaskType::IcpConversation) => &self.icp_conversation,
            Some(TaskType::DocumentAnalysis) => &self.document_analysis,
            Some(TaskType::QuickResponse) => &self.quick_response,
            Some(TaskType::Synthesis) => &self.synthesis,
            Some(TaskType::DataExtraction) => &self.data_extraction,
            None => &self.quick_response,
        }
    }
}

/// Optional sampling parameters forwarded verbatim to the provider.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ChatOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency_penalty: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub presence_penalty: Option<f64>,
}

/// Token accounting reported by the provider.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct ChatUsage {
    #[serde(default)]
    pub prompt_tokens: u64,
    #[serde(default)]
    pub completion_tokens: u64,
    #[serde(default)]
    pub total_tokens: u64,
}

impl ChatUsage {
    /// Build from stream-reported counts. Widens each operand before summing
    /// so untrusted provider counts cannot overflow the total.
    pub fn from_stream_counts(prompt_tokens: u32, completion_tokens: u32) -> Self {
        let prompt_tokens = u64::from(prompt_tokens);
        let completion_tokens = u64::from(completion_tokens);
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens + completion_tokens,
        }
    }
}

/// Non-streaming completion response body.
#[derive(Debug, Deserialize)]
pub(crate) struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
    pub usage: Option<ChatUsage>,
    pub error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatChoice {
    pub message: ChatMessage,
}

/// Error object OpenRouter embeds in otherwise-200 responses.
#[derive(Debug, Deserialize)]
pub(crate) struct ApiError {
    #[serde(default)]
    pub code: i64,
    pub message: String,
}

/// Chat completion errors.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("OpenRouter API key not configured")]
    MissingApiKey,

    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("provider error {code}: {message}")]
    Provider { code: i64, message: String },

    #[error("failed to parse provider response: {0}")]
    Parse(String),

    #[error("stream error: {0}")]
    Stream(String),
}
