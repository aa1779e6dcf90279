//! Outreach Desktop - Rust Backend Library
//!
//! Backend services for the Outreach B2B platform desktop application:
//! - Workflow dispatch to external automation backends (n8n, MindPal)
//! - Result convergence over a durable store and its change feed
//! - Chat completions (one-shot and streamed) through OpenRouter
//! - Speech-to-text session management over a recognition backend
//!
//! The UI layer, CRUD screens, and rendering live elsewhere; this crate only
//! exposes the orchestration and streaming core they call into.

pub mod services;
pub mod storage;

pub use services::llm::{ChatMessage, ChatOptions, LlmError, MessageRole, OpenRouterService, TaskType};
pub use services::speech::{RecordingState, SpeechToTextService};
pub use services::transport::{HttpSend, RetryableTransport, TransportError};
pub use services::webhook::{ResultConvergence, WorkflowDispatcher, WorkflowOutcome};
pub use storage::config::EnvConfig;
pub use storage::results::{ResultRecord, ResultStore, StoreError};
