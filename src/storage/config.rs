//! Environment Configuration
//!
//! Reads the deployment-provided settings once at startup. A missing or empty
//! variable becomes `None`; services degrade to a structured configuration
//! error instead of crashing when a required value is absent.

/// Environment-provided configuration surface.
#[derive(Debug, Clone, Default)]
pub struct EnvConfig {
    /// Base URL of the n8n automation instance (`N8N_BASE_URL`).
    pub n8n_base_url: Option<String>,
    /// Optional static API key sent as `X-N8N-API-KEY` (`N8N_API_KEY`).
    pub n8n_api_key: Option<String>,
    /// Bearer token for the MindPal agent backend (`MINDPAL_API_KEY`).
    pub mindpal_api_key: Option<String>,
    /// Bearer token for OpenRouter chat completions (`OPENROUTER_API_KEY`).
    pub openrouter_api_key: Option<String>,
}

impl EnvConfig {
    /// Load the configuration from process environment variables.
    pub fn from_env() -> Self {
        Self {
            n8n_base_url: non_empty_var("N8N_BASE_URL"),
            n8n_api_key: non_empty_var("N8N_API_KEY"),
            mindpal_api_key: non_empty_var("MINDPAL_API_KEY"),
            openrouter_api_key: non_empty_var("OPENROUTER_API_KEY"),
        }
    }
}

/// Read a variable, treating unset and empty values the same way.
fn non_empty_var(name: &str) -> Option<String> {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => Some(value),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_value_treated_as_absent() {
        // Process-global env, so use a name no other test touches.
        std::env::set_var("OUTREACH_TEST_EMPTY_VAR", "   ");
        assert_eq!(non_empty_var("OUTREACH_TEST_EMPTY_VAR"), None);
        std::env::remove_var("OUTREACH_TEST_EMPTY_VAR");
    }

    #[test]
    fn test_set_value_is_read() {
        std::env::set_var("OUTREACH_TEST_SET_VAR", "https://n8n.example.com");
        assert_eq!(
            non_empty_var("OUTREACH_TEST_SET_VAR"),
            Some("https://n8n.example.com".to_string())
        );
        std::env::remove_var("OUTREACH_TEST_SET_VAR");
    }

    #[test]
    fn test_default_is_all_absent() {
        let config = EnvConfig::default();
        assert!(config.n8n_base_url.is_none());
        assert!(config.openrouter_api_key.is_none());
    }
}
