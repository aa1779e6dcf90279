//! Integration Tests Module
//!
//! End-to-end tests over the public crate API. External calls are served by
//! in-memory doubles wired through the same seams production uses: the
//! `HttpSend` transport trait and the `ResultStore` contract.

// Workflow dispatch and result convergence tests
mod workflow_flow_test;

// Chat completion and stream decoding tests
mod chat_flow_test;
