//! OpenAI-compatible provider implementation (OpenAI, OpenRouter and similar gateways)

use crate::conversion::request_converter::convert_to_openai;
use crate::conversion::response_converter::convert_from_openai;
use crate::core::provider::{Credentials, Provider, ProviderError};
use crate::models::generation::{GenerateRequest, GenerateResponse};
use crate::models::openai::OpenAIChatCompletionResponse;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, error};

/// Provider for `/chat/completions` compatible endpoints
pub struct OpenAIProvider {
    client: Client,
    base_url: String,
}

impl OpenAIProvider {
    /// Create a new OpenAI-compatible provider
    ///
    /// # Arguments
    ///
    /// * `base_url` - API base URL, e.g. `https://openrouter.ai/api/v1`
    /// * `timeout` - Request timeout in seconds
    pub fn new(base_url: String, timeout: u64) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout))
            .build()
            .map_err(|e| ProviderError::Unexpected(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, base_url })
    }

    /// Classify OpenAI-style errors and provide helpful messages
    fn classify_error(error_detail: &str) -> String {
        let error_lower = error_detail.to_lowercase();

        if error_lower.contains("invalid_api_key") || error_lower.contains("unauthorized") {
            return "Invalid API key. Please check the API key in your settings.".to_string();
        }

        if error_lower.contains("rate_limit") || error_lower.contains("quota") {
            return "Rate limit exceeded. Please wait and try again, or upgrade your API plan."
                .to_string();
        }

        if error_lower.contains("model")
            && (error_lower.contains("not found") || error_lower.contains("does not exist"))
        {
            return "Model not found. Please check your model configuration.".to_string();
        }

        if error_lower.contains("billing")
            || error_lower.contains("payment")
            || error_lower.contains("insufficient credits")
        {
            return "Billing issue. Please check your account balance.".to_string();
        }

        error_detail.to_string()
    }
}

#[async_trait]
impl Provider for OpenAIProvider {
    async fn generate(
        &self,
        credentials: &Credentials,
        request: &GenerateRequest,
    ) -> Result<GenerateResponse, ProviderError> {
        let body = convert_to_openai(request)?;
        let url = format!("{}/chat/completions", credentials.base_url(&self.base_url));

        debug!("POST {}", url);

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .bearer_auth(&credentials.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::Unexpected(e.to_string()))?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            error!("Chat completion endpoint returned {}: {}", status, error_text);
            return Err(ProviderError::from_status(
                status.as_u16(),
                Self::classify_error(&error_text),
            ));
        }

        let completion: OpenAIChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Unexpected(format!("Failed to parse response: {}", e)))?;

        convert_from_openai(completion)
    }

    fn provider_name(&self) -> &str {
        "OpenAI-compatible"
    }
}
