//! Generation flows
//!
//! Each flow validates its input, resolves the upstream credentials, builds
//! a prompt, calls the provider and shapes the reply. Validation always
//! happens before any network call.

pub mod conversation;
pub mod electrical_analysis;
pub mod error_code;
pub mod prompts;
pub mod schematic;
pub mod technical_data;

use crate::core::config::Config;
use crate::core::error::{FlowError, FlowResult};
use crate::core::model_manager::{ModelManager, ModelTier};
use crate::core::provider::{Credentials, Provider};
use crate::models::flows::ApiSettings;
use crate::models::generation::{GenerateRequest, GenerateResponse};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info};

/// Everything a flow needs to reach the backend
pub struct FlowContext {
    provider: Arc<dyn Provider>,
    models: ModelManager,
    default_api_key: Option<String>,
    max_history_messages: usize,
    max_output_tokens: u32,
    temperature: f32,
}

impl FlowContext {
    pub fn new(config: &Config, provider: Arc<dyn Provider>) -> Self {
        Self {
            provider,
            models: ModelManager::new(config),
            default_api_key: config.default_api_key.clone(),
            max_history_messages: config.max_history_messages as usize,
            max_output_tokens: config.max_output_tokens,
            temperature: config.temperature,
        }
    }

    pub fn provider(&self) -> &Arc<dyn Provider> {
        &self.provider
    }

    pub fn max_history_messages(&self) -> usize {
        self.max_history_messages
    }

    /// Resolve the key and endpoint for a call
    ///
    /// The client's key wins over the configured default. A blank endpoint
    /// means "not set"; anything else must be an absolute http(s) URL.
    pub fn credentials(&self, settings: &ApiSettings) -> FlowResult<Credentials> {
        let endpoint = match settings.api_endpoint.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => {
                let parsed = url::Url::parse(raw).map_err(|_| {
                    FlowError::validation("api_endpoint", "must be a valid URL")
                })?;
                if !matches!(parsed.scheme(), "http" | "https") {
                    return Err(FlowError::validation(
                        "api_endpoint",
                        "must use http or https",
                    ));
                }
                Some(raw.to_string())
            }
        };

        let api_key = settings
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .or(self.default_api_key.as_deref())
            .ok_or(FlowError::MissingApiKey)?;

        Ok(Credentials::new(api_key, endpoint))
    }

    /// Start a request for the given tier with the configured limits
    pub fn request(&self, tier: ModelTier, prompt: impl Into<String>) -> GenerateRequest {
        GenerateRequest::new(self.models.model_for(tier), prompt)
            .with_limits(self.max_output_tokens, self.temperature)
    }

    /// Send a request to the provider, logging the round trip
    pub async fn generate(
        &self,
        flow: &str,
        credentials: &Credentials,
        request: &GenerateRequest,
    ) -> FlowResult<GenerateResponse> {
        let request_id = uuid::Uuid::new_v4();
        let started = Instant::now();

        info!(
            "▶ flow={} request_id={} model={} provider={}",
            flow,
            request_id,
            request.model,
            self.provider.provider_name()
        );
        debug!("flow={} request_id={} prompt={:?}", flow, request_id, request.prompt);

        match self.provider.generate(credentials, request).await {
            Ok(response) => {
                info!(
                    "✔ flow={} request_id={} elapsed_ms={} output_tokens={} finish_reason={}",
                    flow,
                    request_id,
                    started.elapsed().as_millis(),
                    response.usage.output_tokens,
                    response.finish_reason.as_deref().unwrap_or("unknown")
                );
                Ok(response)
            }
            Err(e) => {
                error!("✘ flow={} request_id={} error={}", flow, request_id, e);
                Err(e.into())
            }
        }
    }
}


#[cfg(test)]
mod tests {
    use super::testing::FakeProvider;
    use super::*;
    use crate::core::config::test_config;

    fn context() -> FlowContext {
        FlowContext::new(
            &test_config(),
            Arc::new(FakeProvider::replying(GenerateResponse::text("ok"))),
        )
    }

    fn settings(key: Option<&str>, endpoint: Option<&str>) -> ApiSettings {
        ApiSettings {
            api_key: key.map(String::from),
            api_endpoint: endpoint.map(String::from),
        }
    }

    #[test]
    fn test_client_key_overrides_default() {
        let creds = context()
            .credentials(&settings(Some(" AIza-client "), None))
            .unwrap();
        assert_eq!(creds.api_key, "AIza-client");
        assert!(creds.endpoint.is_none());
    }

    #[test]
    fn test_default_key_used_when_client_sends_blank() {
        let creds = context().credentials(&settings(Some(""), Some(""))).unwrap();
        assert_eq!(creds.api_key, "AIza-default");
        assert!(creds.endpoint.is_none());
    }

    #[test]
    fn test_missing_key_without_default() {
        let mut config = test_config();
        config.default_api_key = None;
        let ctx = FlowContext::new(
            &config,
            Arc::new(FakeProvider::replying(GenerateResponse::text("ok"))),
        );
        assert!(matches!(
            ctx.credentials(&settings(None, None)),
            Err(FlowError::MissingApiKey)
        ));
    }

    #[test]
    fn test_endpoint_validation() {
        let ctx = context();
        let creds = ctx
            .credentials(&settings(None, Some("https://openrouter.ai/api/v1")))
            .unwrap();
        assert_eq!(creds.endpoint.as_deref(), Some("https://openrouter.ai/api/v1"));

        assert!(matches!(
            ctx.credentials(&settings(None, Some("not a url"))),
            Err(FlowError::Validation { .. })
        ));
        assert!(matches!(
            ctx.credentials(&settings(None, Some("ftp://files.local"))),
            Err(FlowError::Validation { .. })
        ));
    }

    #[test]
    fn test_request_uses_tier_model_and_limits() {
        let request = context().request(ModelTier::Image, "draw");
        assert_eq!(request.model, "gemini-2.0-flash-preview-image-generation");
        assert_eq!(request.max_output_tokens, Some(1024));
    }
}
