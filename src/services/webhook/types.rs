//! Workflow Trigger Types
//!
//! Core data types for workflow dispatch. Outcomes serialize camelCase to
//! match the wire contract the frontend and the automation backends share.

use serde::{Deserialize, Serialize};

/// Predefined workflow names hosted on the automation backend.
pub const WORKFLOW_COMPANY_RESEARCH: &str = "company-research";
pub const WORKFLOW_DOCUMENT_ANALYSIS: &str = "analyze-document";
pub const WORKFLOW_ICP_ENRICHMENT: &str = "enrich-icp";
pub const WORKFLOW_LEAD_SOURCING: &str = "source-leads";

/// A dispatch request as it leaves this core. Constructed per trigger and
/// logged; persistence of the eventual outcome is the durable store's job.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowTrigger {
    pub workflow_name: String,
    pub payload: serde_json::Value,
    pub created_at: String,
}

impl WorkflowTrigger {
    pub fn new(workflow_name: impl Into<String>, payload: serde_json::Value) -> Self {
        Self {
            workflow_name: workflow_name.into(),
            payload,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Uniform result contract for every provider backend.
///
/// `task_id` correlates the trigger with its eventual `workflow_results` row;
/// when the provider does not assign one, the dispatcher synthesizes a fresh
/// uuid so convergence always has a key to wait on.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowOutcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_seconds: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl WorkflowOutcome {
    /// Successful dispatch acknowledged by the provider.
    pub fn succeeded(data: serde_json::Value, task_id: String, estimated_seconds: u64) -> Self {
        Self {
            success: true,
            data: Some(data),
            task_id: Some(task_id),
            estimated_seconds: Some(estimated_seconds),
            error: None,
        }
    }

    /// Caller-visible failure; never raised as an error.
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            ..Default::default()
        }
    }
}
