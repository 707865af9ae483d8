//! Gemini provider implementation

use crate::conversion::request_converter::convert_to_gemini;
use crate::conversion::response_converter::convert_from_gemini;
use crate::core::provider::{Credentials, Provider, ProviderError};
use crate::models::gemini::GeminiResponse;
use crate::models::generation::{GenerateRequest, GenerateResponse};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, error};

/// Google Generative Language API provider for Gemini models
pub struct GeminiProvider {
    client: Client,
    base_url: String,
}

impl GeminiProvider {
    /// Create a new Gemini provider
    ///
    /// # Arguments
    ///
    /// * `base_url` - API base URL, e.g. `https://generativelanguage.googleapis.com/v1beta`
    /// * `timeout` - Request timeout in seconds
    pub fn new(base_url: String, timeout: u64) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout))
            .build()
            .map_err(|e| ProviderError::Unexpected(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, base_url })
    }

    /// Get the endpoint URL for the model
    fn endpoint_url(&self, credentials: &Credentials, model: &str) -> String {
        format!(
            "{}/models/{}:generateContent",
            credentials.base_url(&self.base_url),
            model
        )
    }

    /// Classify Gemini errors and provide helpful messages
    fn classify_error(error_detail: &str) -> String {
        let error_lower = error_detail.to_lowercase();

        if error_lower.contains("api_key_invalid") || error_lower.contains("api key not valid") {
            return "Invalid API key. Please check the Gemini API key in your settings."
                .to_string();
        }

        if error_lower.contains("user location is not supported") {
            return "The Gemini API is not available in your region. Consider setting an API endpoint proxy."
                .to_string();
        }

        if error_lower.contains("resource_exhausted") || error_lower.contains("quota") {
            return "Rate limit or quota exceeded. Please wait and try again.".to_string();
        }

        if error_lower.contains("model")
            && (error_lower.contains("not found") || error_lower.contains("is not supported"))
        {
            return "Model not found or does not support this request. Please check your model configuration."
                .to_string();
        }

        if error_lower.contains("permission_denied") {
            return "Permission denied. Please check that the API key is allowed to use this model."
                .to_string();
        }

        error_detail.to_string()
    }
}

#[async_trait]
impl Provider for GeminiProvider {
    async fn generate(
        &self,
        credentials: &Credentials,
        request: &GenerateRequest,
    ) -> Result<GenerateResponse, ProviderError> {
        let url = self.endpoint_url(credentials, &request.model);
        let body = convert_to_gemini(request);

        debug!("POST {}", url);

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .header("x-goog-api-key", &credentials.api_key)
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
            error!("Gemini API returned {}: {}", status, error_text);
            return Err(ProviderError::from_status(
                status.as_u16(),
                Self::classify_error(&error_text),
            ));
        }

        let gemini_response: GeminiResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Unexpected(format!("Failed to parse response: {}", e)))?;

        convert_from_gemini(gemini_response)
    }

    fn provider_name(&self) -> &str {
        "Gemini"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::generation::OutputMode;
    use httpmock::prelude::*;
    use serde_json::json;

    #[test]
    fn test_classify_key_error() {
        let result = GeminiProvider::classify_error(
            "{\"error\": {\"status\": \"INVALID_ARGUMENT\", \"details\": [{\"reason\": \"API_KEY_INVALID\"}]}}",
        );
        assert!(result.contains("API key"));
    }

    #[test]
    fn test_classify_quota_error() {
        let result = GeminiProvider::classify_error("RESOURCE_EXHAUSTED: quota exceeded");
        assert!(result.contains("quota"));
    }

    #[tokio::test]
    async fn test_generate_text() {
        let server = MockServer::start_async().await;
        let api_mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/v1beta/models/gemini-2.0-flash:generateContent")
                    .header("x-goog-api-key", "AIza-test")
                    .body_contains("\"systemInstruction\"");
                then.status(200)
                    .header("Content-Type", "application/json")
                    .json_body(json!({
                        "candidates": [{
                            "content": {"role": "model", "parts": [{"text": "Kiểm tra cầu chì F5."}]},
                            "finishReason": "STOP"
                        }]
                    }));
            })
            .await;

        let provider = GeminiProvider::new(server.url("/v1beta"), 5).unwrap();
        let request = GenerateRequest::new("gemini-2.0-flash", "Đèn báo không sáng")
            .with_system("Bạn là kỹ thuật viên điện");
        let response = provider
            .generate(&Credentials::new("AIza-test", None), &request)
            .await
            .unwrap();

        api_mock.assert_async().await;
        assert_eq!(response.text, "Kiểm tra cầu chì F5.");
    }

    #[tokio::test]
    async fn test_endpoint_override_replaces_base_url() {
        let server = MockServer::start_async().await;
        let api_mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/proxy/models/gemini-2.0-flash-preview-image-generation:generateContent")
                    .body_contains("responseModalities");
                then.status(200).json_body(json!({
                    "candidates": [{"content": {"parts": [
                        {"text": "Here is the diagram"},
                        {"inlineData": {"mimeType": "image/png", "data": "AAAA"}}
                    ]}}]
                }));
            })
            .await;

        // configured base URL is unreachable; the override must win
        let provider = GeminiProvider::new("http://127.0.0.1:9/v1beta".to_string(), 5).unwrap();
        let request = GenerateRequest::new("gemini-2.0-flash-preview-image-generation", "diagram")
            .with_output(OutputMode::TextAndImage);
        let credentials = Credentials::new("AIza-test", Some(server.url("/proxy/")));
        let response = provider.generate(&credentials, &request).await.unwrap();

        api_mock.assert_async().await;
        assert_eq!(
            response.media.unwrap().data_uri,
            "data:image/png;base64,AAAA"
        );
    }

    #[tokio::test]
    async fn test_authentication_failure() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST);
                then.status(403)
                    .body("{\"error\": {\"message\": \"API key not valid. Please pass a valid API key.\"}}");
            })
            .await;

        let provider = GeminiProvider::new(server.url("/v1beta"), 5).unwrap();
        let result = provider
            .generate(
                &Credentials::new("bad", None),
                &GenerateRequest::new("gemini-2.0-flash", "x"),
            )
            .await;

        assert!(matches!(result, Err(ProviderError::Authentication(msg)) if msg.contains("Invalid API key")));
    }

    #[tokio::test]
    async fn test_rate_limit_and_server_errors() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/v1beta/models/busy:generateContent");
                then.status(429).body("RESOURCE_EXHAUSTED");
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/v1beta/models/broken:generateContent");
                then.status(500).body("internal");
            })
            .await;

        let provider = GeminiProvider::new(server.url("/v1beta"), 5).unwrap();
        let creds = Credentials::new("AIza-test", None);

        let busy = provider
            .generate(&creds, &GenerateRequest::new("busy", "x"))
            .await;
        assert!(matches!(busy, Err(ProviderError::RateLimit(_))));

        let broken = provider
            .generate(&creds, &GenerateRequest::new("broken", "x"))
            .await;
        assert!(matches!(
            broken,
            Err(ProviderError::ApiError { status: 500, .. })
        ));
    }
}
