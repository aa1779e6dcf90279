//! Workflow Flow Integration Tests
//!
//! Trigger a workflow against a scripted automation backend, then converge on
//! the asynchronous result through a fake durable store.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use outreach_desktop::services::transport::{HttpRequest, HttpResponse};
use outreach_desktop::services::webhook::dispatcher::AutomationConfig;
use outreach_desktop::{
    HttpSend, ResultConvergence, ResultRecord, ResultStore, StoreError, TransportError,
    WorkflowDispatcher,
};
use tokio::sync::mpsc;

/// Automation backend double: acknowledges every trigger with a fixed task id.
struct FakeBackend {
    webhook_id: String,
}

#[async_trait]
impl HttpSend for FakeBackend {
    async fn send(&self, _request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        Ok(HttpResponse {
            status: 200,
            body: format!(r#"{{"webhookId":"{}"}}"#, self.webhook_id),
        })
    }
}

/// Durable store double backed by a shared vector.
#[derive(Clone, Default)]
struct MemoryStore {
    records: Arc<Mutex<Vec<ResultRecord>>>,
}

impl MemoryStore {
    fn insert(&self, record: ResultRecord) {
        self.records.lock().unwrap().push(record);
    }
}

#[async_trait]
impl ResultStore for MemoryStore {
    async fn find_result(&self, webhook_id: &str) -> Result<Option<ResultRecord>, StoreError> {
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.webhook_id == webhook_id)
            .cloned())
    }

    async fn subscribe(&self, _user_id: &str) -> Option<mpsc::Receiver<ResultRecord>> {
        None
    }
}

fn config() -> AutomationConfig {
    AutomationConfig {
        n8n_base_url: Some("https://n8n.example.com/webhook".to_string()),
        n8n_api_key: Some("key".to_string()),
        mindpal_api_key: None,
    }
}

#[tokio::test(start_paused = true)]
async fn test_trigger_then_converge_on_polled_result() {
    let dispatcher = WorkflowDispatcher::with_transport(
        config(),
        FakeBackend {
            webhook_id: "wh-research-1".to_string(),
        },
    );

    let outcome = dispatcher
        .trigger(
            "company-research",
            serde_json::json!({"domain": "acme.io"}),
        )
        .await;
    assert!(outcome.success);
    let task_id = outcome.task_id.unwrap();
    assert_eq!(task_id, "wh-research-1");

    // The backend finishes while we are waiting; the result lands in the
    // store between poll ticks.
    let store = MemoryStore::default();
    let writer = store.clone();
    let result_id = task_id.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(8)).await;
        writer.insert(ResultRecord {
            webhook_id: result_id,
            user_id: "user-1".to_string(),
            data: serde_json::json!({"summary": "Acme builds rockets"}),
            created_at: "2026-08-30T12:00:00Z".to_string(),
        });
    });

    let convergence = ResultConvergence::new(Arc::new(store), "user-1");
    let result = convergence.await_result(&task_id, None).await;

    assert!(result.success);
    assert_eq!(result.task_id.as_deref(), Some("wh-research-1"));
    let data = result.data.unwrap();
    assert_eq!(data["data"]["summary"], "Acme builds rockets");
}

#[tokio::test(start_paused = true)]
async fn test_convergence_times_out_when_no_result_arrives() {
    let convergence = ResultConvergence::new(Arc::new(MemoryStore::default()), "user-1");

    let result = convergence
        .await_result("wh-never", Some(Duration::from_secs(20)))
        .await;

    assert!(!result.success);
    assert_eq!(result.error.as_deref(), Some("Timeout waiting for result"));
}

#[tokio::test]
async fn test_unconfigured_dispatcher_reports_failure_outcome() {
    let dispatcher = WorkflowDispatcher::with_transport(
        AutomationConfig::default(),
        FakeBackend {
            webhook_id: String::new(),
        },
    );

    let outcome = dispatcher.trigger("company-research", serde_json::json!({})).await;
    assert!(!outcome.success);
    assert!(outcome.error.unwrap().contains("Configuration error"));
}
