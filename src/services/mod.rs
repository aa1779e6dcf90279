//! Services
//!
//! Business logic services for the application. Each service is an explicitly
//! constructed instance with its configuration and collaborators injected at
//! construction, so tests can substitute doubles for the transport and the
//! durable store.

pub mod llm;
pub mod speech;
pub mod streaming;
pub mod transport;
pub mod webhook;

pub use llm::OpenRouterService;
pub use speech::SpeechToTextService;
pub use transport::{ReqwestSend, RetryableTransport};
pub use webhook::{ResultConvergence, WorkflowDispatcher};
