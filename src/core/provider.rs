//! Provider abstraction layer for generative-AI backends
//!
//! This module defines a common trait for the supported backends (Gemini and
//! OpenAI-compatible gateways) and the per-call credentials flows pass in.

use crate::models::generation::{GenerateRequest, GenerateResponse};
use async_trait::async_trait;
use thiserror::Error;

/// Error types for provider operations
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Rate limit exceeded: {0}")]
    RateLimit(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("API error (status {status}): {message}")]
    ApiError { status: u16, message: String },

    #[error("Unsupported by provider: {0}")]
    Unsupported(String),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl ProviderError {
    /// Map an HTTP error status and classified message to an error variant
    pub fn from_status(status: u16, message: String) -> Self {
        match status {
            401 | 403 => ProviderError::Authentication(message),
            429 => ProviderError::RateLimit(message),
            400 | 404 => ProviderError::BadRequest(message),
            _ => ProviderError::ApiError { status, message },
        }
    }
}

/// Key and optional endpoint override used for a single call
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub api_key: String,
    /// Replaces the provider's configured base URL when set
    pub endpoint: Option<String>,
}

impl Credentials {
    pub fn new(api_key: impl Into<String>, endpoint: Option<String>) -> Self {
        Self {
            api_key: api_key.into(),
            endpoint,
        }
    }

    /// Base URL for this call, trailing slashes removed
    pub fn base_url<'a>(&'a self, default: &'a str) -> &'a str {
        self.endpoint
            .as_deref()
            .unwrap_or(default)
            .trim_end_matches('/')
    }
}

// Keys must never end up in logs.
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"<redacted>")
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

/// Trait for generative-AI providers
#[async_trait]
pub trait Provider: Send + Sync {
    /// Send a single, non-streaming generation request
    async fn generate(
        &self,
        credentials: &Credentials,
        request: &GenerateRequest,
    ) -> Result<GenerateResponse, ProviderError>;

    /// Get the provider name
    fn provider_name(&self) -> &str;
}

/// Supported provider types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderType {
    Gemini,
    OpenAI,
}

impl ProviderType {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "gemini" | "googleai" | "google-ai" | "google_ai" => Some(ProviderType::Gemini),
            "openai" | "openrouter" | "openai-compatible" => Some(ProviderType::OpenAI),
            _ => None,
        }
    }
}
