//! Workflow Webhooks
//!
//! Dispatch of long-running work to the external automation backends and
//! convergence on their asynchronous results. Triggering is synchronous from
//! the caller's point of view (a `WorkflowOutcome` comes back immediately);
//! the actual result lands later in the durable `workflow_results` collection
//! and is picked up by [`ResultConvergence`].

pub mod convergence;
pub mod dispatcher;
pub mod types;

pub use convergence::{ResultConvergence, ResultSubscription};
pub use dispatcher::{AutomationConfig, WorkflowDispatcher};
pub use types::{WorkflowOutcome, WorkflowTrigger};
