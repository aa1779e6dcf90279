//! Chat Flow Integration Tests
//!
//! Non-streaming completion through the retryable transport, and SSE decoding
//! through the line buffer and adapter, exercised over the public API.

use async_trait::async_trait;
use outreach_core::streaming::{LineBuffer, StreamAdapter, StreamEvent};
use outreach_desktop::services::llm::{OpenRouterConfig, OpenRouterService};
use outreach_desktop::services::streaming::OpenRouterAdapter;
use outreach_desktop::services::transport::{HttpRequest, HttpResponse};
use outreach_desktop::{ChatMessage, ChatOptions, HttpSend, RetryableTransport, TaskType, TransportError};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Gateway double: fails with a server error until `failures` runs out, then
/// answers with a fixed completion.
struct FlakyGateway {
    failures: AtomicUsize,
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl HttpSend for FlakyGateway {
    async fn send(&self, _request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self
            .failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
        {
            return Ok(HttpResponse {
                status: 503,
                body: "overloaded".to_string(),
            });
        }
        Ok(HttpResponse {
            status: 200,
            body: r#"{
                "choices": [{"message": {"role": "assistant", "content": "Done."}}],
                "usage": {"prompt_tokens": 10, "completion_tokens": 2, "total_tokens": 12}
            }"#
            .to_string(),
        })
    }
}

#[tokio::test(start_paused = true)]
async fn test_completion_survives_transient_gateway_errors() {
    let calls = Arc::new(AtomicUsize::new(0));
    let gateway = FlakyGateway {
        failures: AtomicUsize::new(2),
        calls: calls.clone(),
    };
    let service = OpenRouterService::with_transport(
        OpenRouterConfig {
            api_key: Some("sk-or-test".to_string()),
            ..Default::default()
        },
        RetryableTransport::new(gateway),
    );

    let message = service
        .complete(
            &[ChatMessage::user("summarize")],
            Some(TaskType::Synthesis),
            &ChatOptions::default(),
        )
        .await
        .unwrap()
        .unwrap();

    assert_eq!(message.content, "Done.");
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[test]
fn test_sse_stream_decodes_across_chunk_boundaries() {
    // Network chunks split mid-line; the buffer reassembles and the adapter
    // decodes, with malformed interleaved lines skipped by the caller.
    let chunks = [
        "data: {\"choices\":[{\"delta\":{\"con",
        "tent\":\"The \"}}]}\ndata: {\"choices\":[{\"delta\":{\"content\":\"answer.\"}}]}\n",
        "data: {broken\n",
        "data: [DONE]\n",
    ];

    let mut buffer = LineBuffer::new();
    let mut adapter = OpenRouterAdapter::new();
    let mut text = String::new();
    let mut done = false;

    for chunk in chunks {
        for line in buffer.push(chunk) {
            let Ok(events) = adapter.adapt(&line) else {
                continue;
            };
            for event in events {
                match event {
                    StreamEvent::TextDelta { content } => text.push_str(&content),
                    StreamEvent::Done => done = true,
                    StreamEvent::Usage { .. } => {}
                }
            }
        }
    }

    assert_eq!(text, "The answer.");
    assert!(done);
    assert!(!buffer.has_remainder());
}
