//! Stream Adapters
//!
//! Provider-specific decoders that turn raw SSE lines into neutral
//! [`StreamEvent`](outreach_core::StreamEvent)s. Chunk reassembly lives in
//! [`LineBuffer`](outreach_core::LineBuffer); adapters only ever see whole
//! lines.

pub mod openrouter;

pub use openrouter::OpenRouterAdapter;
