//! LLM Services
//!
//! Chat completion against the OpenRouter gateway, with task-type model
//! routing, bounded retry on the non-streaming path, and incremental SSE
//! delivery on the streaming path.

pub mod openrouter;
pub mod types;

pub use openrouter::{OpenRouterConfig, OpenRouterService};
pub use types::{
    ChatMessage, ChatOptions, ChatUsage, LlmError, MessageRole, ModelRouting, TaskType,
};
