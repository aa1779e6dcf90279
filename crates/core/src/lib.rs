//! Outreach Core
//!
//! Shared foundation types for the Outreach backend workspace: the bounded
//! retry policy applied to every outbound HTTP call, and the unified stream
//! event model used to decode incrementally streamed chat responses.
//!
//! These types are dependency-light (serde + thiserror + std) so both the
//! service layer and future crates can build on them without pulling in the
//! network stack.

pub mod retry;
pub mod streaming;

pub use retry::RetryPolicy;
pub use streaming::{AdapterError, LineBuffer, StreamAdapter, StreamEvent};
