//! OpenRouter Chat Completion Service
//!
//! Single gateway for every model the platform talks to. Non-streaming
//! completions go through the retryable transport; streaming completions hold
//! one connection open and decode SSE lines incrementally, so they get a
//! single attempt.

use futures_util::StreamExt;
use outreach_core::retry::RetryPolicy;
use outreach_core::streaming::{LineBuffer, StreamAdapter, StreamEvent};

use crate::services::streaming::OpenRouterAdapter;
use crate::services::transport::{HttpRequest, HttpSend, ReqwestSend, RetryableTransport};
use crate::storage::config::EnvConfig;

use super::types::{ChatMessage, ChatOptions, ChatResponse, ChatUsage, LlmError, ModelRouting, TaskType};

const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";

/// Connection settings for the OpenRouter gateway.
#[derive(Debug, Clone)]
pub struct OpenRouterConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    /// Sent as `HTTP-Referer`, required for OpenRouter app attribution.
    pub referer: String,
    /// Sent as `X-Title`.
    pub title: String,
}

impl Default for OpenRouterConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            referer: "https://outreach-platform.app".to_string(),
            title: "Outreach B2B Platform".to_string(),
        }
    }
}

/// Chat completion service with task-type model routing.
pub struct OpenRouterService<S = ReqwestSend> {
    config: OpenRouterConfig,
    routing: ModelRouting,
    transport: RetryableTransport<S>,
    client: reqwest::Client,
    retry: RetryPolicy,
}

impl OpenRouterService<ReqwestSend> {
    pub fn new(config: OpenRouterConfig) -> Self {
        Self::with_transport(config, RetryableTransport::new(ReqwestSend::new()))
    }

    pub fn from_env(env: &EnvConfig) -> Self {
        Self::new(OpenRouterConfig {
            api_key: env.openrouter_api_key.clone(),
            ..Default::default()
        })
    }
}

impl<S: HttpSend> OpenRouterService<S> {
    pub fn with_transport(config: OpenRouterConfig, transport: RetryableTransport<S>) -> Self {
        Self {
            config,
            routing: ModelRouting::default(),
            transport,
            client: reqwest::Client::new(),
            retry: RetryPolicy::default(),
        }
    }

    /// Resolve the model a task type routes to.
    pub fn select_model(&self, task: Option<TaskType>) -> &str {
        self.routing.model_for(task)
    }

    /// Run a completion to the end and return the assistant message, or
    /// `None` when the provider answers with no choices.
    pub async fn complete(
        &self,
        messages: &[ChatMessage],
        task: Option<TaskType>,
        options: &ChatOptions,
    ) -> Result<Option<ChatMessage>, LlmError> {
        let api_key = self.api_key()?;
        let model = self.select_model(task);
        tracing::info!(model, task = ?task, "chat completion request");

        let body = request_body(model, messages, options, false)?;
        let request = self
            .authorized(HttpRequest::post(self.completions_url(), body), api_key);

        let response = self.transport.execute(&request, &self.retry).await?;
        let parsed: ChatResponse = serde_json::from_str(&response.body)
            .map_err(|e| match response.is_success() {
                true => LlmError::Parse(e.to_string()),
                false => LlmError::Provider {
                    code: i64::from(response.status),
                    message: format!("HTTP {}", response.status),
                },
            })?;

        if let Some(error) = parsed.error {
            return Err(LlmError::Provider {
                code: error.code,
                message: error.message,
            });
        }
        if !response.is_success() {
            return Err(LlmError::Provider {
                code: i64::from(response.status),
                message: format!("HTTP {}", response.status),
            });
        }

        if let Some(usage) = parsed.usage {
            self.track_usage(model, &usage);
        }

        Ok(parsed.choices.into_iter().next().map(|c| c.message))
    }

    /// Stream a completion, invoking `on_delta` for each content fragment as
    /// it arrives. Returns once the terminal sentinel is received or the
    /// connection closes.
    ///
    /// Streaming holds one live connection, so there is no retry here;
    /// malformed interleaved lines are logged and skipped rather than
    /// aborting a stream that is already delivering text.
    pub async fn stream_complete(
        &self,
        messages: &[ChatMessage],
        task: Option<TaskType>,
        options: &ChatOptions,
        mut on_delta: impl FnMut(&str),
    ) -> Result<(), LlmError> {
        let api_key = self.api_key()?;
        let model = self.select_model(task);
        tracing::info!(model, task = ?task, "chat completion stream");

        let body = request_body(model, messages, options, true)?;
        let response = self
            .client
            .post(self.completions_url())
            .bearer_auth(api_key)
            .header("HTTP-Referer", &self.config.referer)
            .header("X-Title", &self.config.title)
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::Stream(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), body, "stream request rejected");
            return Err(LlmError::Provider {
                code: i64::from(status.as_u16()),
                message: format!("HTTP {}", status.as_u16()),
            });
        }

        let mut stream = response.bytes_stream();
        let mut buffer = LineBuffer::new();
        let mut adapter = OpenRouterAdapter::new();

        while let Some(chunk) = stream.next().await {
            let bytes = chunk.map_err(|e| LlmError::Stream(e.to_string()))?;
            let text = String::from_utf8_lossy(&bytes);
            for line in buffer.push(&text) {
                let events = match adapter.adapt(&line) {
                    Ok(events) => events,
                    Err(e) => {
                        tracing::warn!(provider = adapter.provider_name(), error = %e, "skipping undecodable stream line");
                        continue;
                    }
                };
                for event in events {
                    match event {
                        StreamEvent::TextDelta { content } => on_delta(&content),
                        StreamEvent::Usage {
                            prompt_tokens,
                            completion_tokens,
                        } => self.track_usage(
                            model,
                            &ChatUsage::from_stream_counts(prompt_tokens, completion_tokens),
                        ),
                        StreamEvent::Done => return Ok(()),
                    }
                }
            }
        }

        // Connection closed without the sentinel; everything received was
        // already delivered, so treat it as a clean end.
        tracing::debug!(model, "stream closed without terminal sentinel");
        Ok(())
    }

    fn api_key(&self) -> Result<&str, LlmError> {
        self.config
            .api_key
            .as_deref()
            .ok_or(LlmError::MissingApiKey)
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'))
    }

    fn authorized(&self, request: HttpRequest, api_key: &str) -> HttpRequest {
        request
            .header("Authorization", format!("Bearer {}", api_key))
            .header("HTTP-Referer", self.config.referer.clone())
            .header("X-Title", self.config.title.clone())
            .header("Content-Type", "application/json")
    }

    fn track_usage(&self, model: &str, usage: &ChatUsage) {
        tracing::info!(
            model,
            prompt_tokens = usage.prompt_tokens,
            completion_tokens = usage.completion_tokens,
            total_tokens = usage.total_tokens,
            "token usage"
        );
    }

    #[cfg(test)]
    pub(crate) fn transport(&self) -> &RetryableTransport<S> {
        &self.transport
    }
}

fn request_body(
    model: &str,
    messages: &[ChatMessage],
    options: &ChatOptions,
    stream: bool,
) -> Result<serde_json::Value, LlmError> {
    let mut body = serde_json::json!({
        "model": model,
        "messages": messages,
        "stream": stream,
    });
    let opts = serde_json::to_value(options).map_err(|e| LlmError::Parse(e.to_string()))?;
    if let (Some(body_map), Some(opts_map)) = (body.as_object_mut(), opts.as_object()) {
        for (key, value) in opts_map {
            body_map.insert(key.clone(), value.clone());
        }
    }
    Ok(body)
}
