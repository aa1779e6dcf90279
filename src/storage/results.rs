//! Workflow Result Store Contract
//!
//! Read-only view of the durable `workflow_results` collection: point lookup
//! by webhook id, plus a change-feed subscription filtered to one owner
//! scope. The core never writes to this collection; completed workflows are
//! inserted by the automation backends themselves.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::mpsc;

/// One row of the `workflow_results` collection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResultRecord {
    /// Task identifier correlating the row with the triggering dispatch.
    pub webhook_id: String,
    /// Owner scope the change feed filters on.
    pub user_id: String,
    /// Result payload produced by the workflow.
    pub data: serde_json::Value,
    pub created_at: String,
}

/// Errors surfaced by the durable store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store query failed: {0}")]
    Query(String),

    #[error("change feed unavailable: {0}")]
    Subscription(String),
}

/// Contract consumed from the durable store.
#[async_trait]
pub trait ResultStore: Send + Sync {
    /// Point lookup by task identifier.
    async fn find_result(&self, webhook_id: &str) -> Result<Option<ResultRecord>, StoreError>;

    /// Live change-feed subscription for inserts/updates visible to
    /// `user_id`. Returns `None` when the backing service offers no live
    /// channel; callers then rely on polling alone.
    async fn subscribe(&self, user_id: &str) -> Option<mpsc::Receiver<ResultRecord>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_record_serialization_roundtrip() {
        let record = ResultRecord {
            webhook_id: "wh-123".to_string(),
            user_id: "user-1".to_string(),
            data: serde_json::json!({"report": "done"}),
            created_at: "2026-08-30T12:00:00Z".to_string(),
        };
        let json = serde_json::to_string(&record).unwrap();
        let parsed: ResultRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(record, parsed);
    }

    #[test]
    fn test_store_error_display() {
        let err = StoreError::Query("connection refused".to_string());
        assert_eq!(err.to_string(), "store query failed: connection refused");
    }
}
