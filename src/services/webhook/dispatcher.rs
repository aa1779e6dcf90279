//! Workflow Dispatcher
//!
//! Triggers named workflows on the external automation backends and
//! normalizes their heterogeneous responses into one [`WorkflowOutcome`]
//! contract. Two provider variants exist — n8n (configured base URL, static
//! header key) and MindPal (fixed endpoint template, bearer token) — tagged
//! by configuration rather than by a type hierarchy.

use crate::services::transport::{HttpRequest, HttpSend, ReqwestSend, RetryableTransport};
use crate::storage::config::EnvConfig;
use outreach_core::retry::RetryPolicy;

use super::types::{WorkflowOutcome, WorkflowTrigger};

/// MindPal trigger endpoint; `{}` is replaced with the agent id.
const MINDPAL_TRIGGER_URL: &str = "https://api.mindpal.io/v1/agents/{}/trigger";

/// Default completion estimate when the provider does not supply one.
const N8N_DEFAULT_ESTIMATE_SECS: u64 = 30;
const MINDPAL_DEFAULT_ESTIMATE_SECS: u64 = 60;

/// Automation backend credentials and endpoints.
#[derive(Debug, Clone, Default)]
pub struct AutomationConfig {
    pub n8n_base_url: Option<String>,
    pub n8n_api_key: Option<String>,
    pub mindpal_api_key: Option<String>,
}

impl From<&EnvConfig> for AutomationConfig {
    fn from(env: &EnvConfig) -> Self {
        Self {
            n8n_base_url: env.n8n_base_url.clone(),
            n8n_api_key: env.n8n_api_key.clone(),
            mindpal_api_key: env.mindpal_api_key.clone(),
        }
    }
}

/// Per-provider dispatch parameters. Providers differ only in endpoint,
/// auth header, which body fields carry the remote task id, and the default
/// completion estimate — the outcome contract stays uniform.
struct ProviderRequest {
    provider: &'static str,
    url: String,
    auth_header: Option<(&'static str, String)>,
    id_fields: &'static [&'static str],
    default_estimate_secs: u64,
}

/// Dispatches workflow triggers through the retryable transport.
pub struct WorkflowDispatcher<S = ReqwestSend> {
    transport: RetryableTransport<S>,
    config: AutomationConfig,
    retry: RetryPolicy,
}

impl WorkflowDispatcher<ReqwestSend> {
    /// Production dispatcher over a fresh reqwest client.
    pub fn new(config: AutomationConfig) -> Self {
        Self::with_transport(config, ReqwestSend::new())
    }

    /// Dispatcher configured from process environment variables.
    pub fn from_env() -> Self {
        Self::new(AutomationConfig::from(&EnvConfig::from_env()))
    }
}

impl<S: HttpSend> WorkflowDispatcher<S> {
    /// Construct with an injected sender (tests pass a scripted double).
    pub fn with_transport(config: AutomationConfig, sender: S) -> Self {
        Self {
            transport: RetryableTransport::new(sender),
            config,
            retry: RetryPolicy::default(),
        }
    }

    /// Trigger an n8n workflow.
    ///
    /// `POST {base_url}/{workflow_name}` with the payload as JSON body.
    /// Missing base URL is a caller-visible configuration failure, reported
    /// without issuing a network call.
    pub async fn trigger(&self, workflow_name: &str, payload: serde_json::Value) -> WorkflowOutcome {
        let Some(base_url) = self.config.n8n_base_url.as_deref() else {
            tracing::error!("N8N_BASE_URL is not configured");
            return WorkflowOutcome::failed("Configuration error: N8N URL missing");
        };

        let url = format!("{}/{}", base_url.trim_end_matches('/'), workflow_name);
        let auth = self
            .config
            .n8n_api_key
            .as_ref()
            .map(|key| ("X-N8N-API-KEY", key.clone()));

        self.dispatch(
            WorkflowTrigger::new(workflow_name, payload),
            ProviderRequest {
                provider: "n8n",
                url,
                auth_header: auth,
                id_fields: &["webhookId"],
                default_estimate_secs: N8N_DEFAULT_ESTIMATE_SECS,
            },
        )
        .await
    }

    /// Trigger a MindPal agent.
    ///
    /// Same contract shape as [`trigger`](Self::trigger), different endpoint
    /// template and bearer-token auth.
    pub async fn trigger_agent(&self, agent_id: &str, payload: serde_json::Value) -> WorkflowOutcome {
        let Some(api_key) = self.config.mindpal_api_key.as_deref() else {
            tracing::error!("MINDPAL_API_KEY is not configured");
            return WorkflowOutcome::failed("Configuration error: MindPal API Key missing");
        };

        self.dispatch(
            WorkflowTrigger::new(agent_id, payload),
            ProviderRequest {
                provider: "mindpal",
                url: MINDPAL_TRIGGER_URL.replace("{}", agent_id),
                auth_header: Some(("Authorization", format!("Bearer {}", api_key))),
                id_fields: &["executionId", "id"],
                default_estimate_secs: MINDPAL_DEFAULT_ESTIMATE_SECS,
            },
        )
        .await
    }

    /// Shared dispatch path: send through the retryable transport and fold
    /// the provider response into the uniform outcome contract. Transport
    /// exhaustion and terminal non-2xx responses become failure outcomes,
    /// never errors.
    async fn dispatch(&self, trigger: WorkflowTrigger, provider: ProviderRequest) -> WorkflowOutcome {
        tracing::info!(
            provider = provider.provider,
            workflow = %trigger.workflow_name,
            created_at = %trigger.created_at,
            "triggering workflow"
        );

        let mut request = HttpRequest::post(&provider.url, trigger.payload)
            .header("Content-Type", "application/json");
        if let Some((name, value)) = provider.auth_header {
            request = request.header(name, value);
        }

        let response = match self.transport.execute(&request, &self.retry).await {
            Ok(response) => response,
            Err(e) => {
                tracing::error!(provider = provider.provider, error = %e, "workflow trigger failed");
                return WorkflowOutcome::failed(e.to_string());
            }
        };

        if !response.is_success() {
            tracing::error!(
                provider = provider.provider,
                status = response.status,
                "workflow trigger rejected"
            );
            return WorkflowOutcome::failed(format!(
                "{} request failed: HTTP {}",
                provider.provider, response.status
            ));
        }

        // Providers are inconsistent about response bodies; anything that
        // does not parse is treated as an empty map.
        let data = response.json().unwrap_or_else(|_| serde_json::json!({}));

        let task_id = provider
            .id_fields
            .iter()
            .find_map(|field| data.get(field).and_then(|v| v.as_str()))
            .map(str::to_string)
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

        let estimated_seconds = data
            .get("estimatedSeconds")
            .and_then(|v| v.as_u64())
            .unwrap_or(provider.default_estimate_secs);

        WorkflowOutcome::succeeded(data, task_id, estimated_seconds)
    }
}
