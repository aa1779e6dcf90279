//! Retryable HTTP Transport
//!
//! Generic bounded-retry request executor. Server errors (5xx) and
//! connection-level failures are retried with exponential backoff; anything
//! below 500 — including client errors — is terminal and returned to the
//! caller as-is.

use async_trait::async_trait;
use outreach_core::retry::RetryPolicy;
use thiserror::Error;

/// A JSON POST request to an external endpoint.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: serde_json::Value,
}

impl HttpRequest {
    /// Build a POST request with a JSON body.
    pub fn post(url: impl Into<String>, body: serde_json::Value) -> Self {
        Self {
            url: url.into(),
            headers: Vec::new(),
            body,
        }
    }

    /// Attach a header.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

/// Status and body of a completed HTTP exchange.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    /// Whether the status is in the 2xx range.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Parse the body as a JSON value, tolerating an empty body as `{}`.
    pub fn json(&self) -> Result<serde_json::Value, serde_json::Error> {
        if self.body.trim().is_empty() {
            Ok(serde_json::json!({}))
        } else {
            serde_json::from_str(&self.body)
        }
    }
}

/// Transport-level errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The request never produced a response (DNS, TLS, connection reset, ...)
    #[error("connection failed: {0}")]
    Connection(String),

    /// The server answered with a 5xx status
    #[error("server error: HTTP {status}")]
    ServerError { status: u16, body: String },

    /// Every attempt failed; carries the final failure for diagnostics
    #[error("all {attempts} attempts failed")]
    Exhausted {
        attempts: u32,
        #[source]
        last: Box<TransportError>,
    },
}

/// Seam for issuing a single HTTP exchange. Production uses [`ReqwestSend`];
/// tests script responses through a double.
#[async_trait]
pub trait HttpSend: Send + Sync {
    async fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// [`HttpSend`] implementation backed by a shared `reqwest::Client`.
pub struct ReqwestSend {
    client: reqwest::Client,
}

impl ReqwestSend {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

impl Default for ReqwestSend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpSend for ReqwestSend {
    async fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let mut builder = self.client.post(&request.url).json(&request.body);
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| TransportError::Connection(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| TransportError::Connection(e.to_string()))?;

        Ok(HttpResponse { status, body })
    }
}

/// Bounded-retry request executor.
pub struct RetryableTransport<S> {
    sender: S,
}

impl<S: HttpSend> RetryableTransport<S> {
    pub fn new(sender: S) -> Self {
        Self { sender }
    }

    /// Test access to the injected sender double.
    #[cfg(test)]
    pub(crate) fn sender(&self) -> &S {
        &self.sender
    }

    /// Execute the request, retrying 5xx responses and connection failures
    /// according to `policy`. Backoff delays are non-blocking suspensions and
    /// apply only between attempts, never after the last.
    pub async fn execute(
        &self,
        request: &HttpRequest,
        policy: &RetryPolicy,
    ) -> Result<HttpResponse, TransportError> {
        let max_attempts = policy.max_attempts.max(1);
        let mut last: Option<TransportError> = None;

        for attempt in 1..=max_attempts {
            match self.sender.send(request).await {
                Ok(response) if response.status < 500 => {
                    if attempt > 1 {
                        tracing::debug!(attempt, url = %request.url, "request succeeded after retry");
                    }
                    return Ok(response);
                }
                Ok(response) => {
                    tracing::warn!(
                        attempt,
                        max_attempts,
                        status = response.status,
                        url = %request.url,
                        "server error response"
                    );
                    last = Some(TransportError::ServerError {
                        status: response.status,
                        body: response.body,
                    });
                }
                Err(e) => {
                    tracing::warn!(attempt, max_attempts, error = %e, url = %request.url, "request failed");
                    last = Some(e);
                }
            }

            if attempt < max_attempts {
                tokio::time::sleep(policy.delay_before(attempt)).await;
            }
        }

        let last =
            last.unwrap_or_else(|| TransportError::Connection("no attempts executed".to_string()));
        Err(TransportError::Exhausted {
            attempts: max_attempts,
            last: Box::new(last),
        })
    }
}
