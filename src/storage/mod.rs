//! Storage
//!
//! Environment-provided configuration and the contract this crate consumes
//! from the durable store (point lookups on `workflow_results` plus its
//! change feed). The store itself lives behind the `ResultStore` trait so the
//! backing service can be swapped and tests can inject doubles.

pub mod config;
pub mod results;

pub use config::EnvConfig;
pub use results::{ResultRecord, ResultStore, StoreError};
