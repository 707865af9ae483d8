//! Application configuration management
//!
//! This module handles loading and validating configuration from TOML files.
//! All configuration is validated at startup.

use crate::core::provider::ProviderType;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Default Generative Language API base URL
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default OpenAI-compatible base URL
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Default text model
const DEFAULT_TEXT_MODEL: &str = "gemini-2.0-flash";

/// Default image model
const DEFAULT_IMAGE_MODEL: &str = "gemini-2.0-flash-preview-image-generation";

/// Default request timeout in seconds
const DEFAULT_REQUEST_TIMEOUT: u64 = 90;

/// Default number of history messages forwarded to the model
const DEFAULT_MAX_HISTORY_MESSAGES: u32 = 40;

/// Default output token cap
const DEFAULT_MAX_OUTPUT_TOKENS: u32 = 8192;

const DEFAULT_TEMPERATURE: f32 = 0.4;

/// Default server port
const DEFAULT_PORT: u16 = 9002;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct GeminiConfig {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub base_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct OpenAIConfig {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub base_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModelConfig {
    #[serde(default = "default_text_model")]
    pub text_model: String,
    #[serde(default = "default_image_model")]
    pub image_model: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            text_model: default_text_model(),
            image_model: default_image_model(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RequestConfig {
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,
    #[serde(default = "default_max_history_messages")]
    pub max_history_messages: u32,
    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self {
            request_timeout: default_request_timeout(),
            max_history_messages: default_max_history_messages(),
            max_output_tokens: default_max_output_tokens(),
            temperature: default_temperature(),
        }
    }
}

fn default_text_model() -> String {
    DEFAULT_TEXT_MODEL.to_string()
}

fn default_image_model() -> String {
    DEFAULT_IMAGE_MODEL.to_string()
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_request_timeout() -> u64 {
    DEFAULT_REQUEST_TIMEOUT
}

fn default_max_history_messages() -> u32 {
    DEFAULT_MAX_HISTORY_MESSAGES
}

fn default_max_output_tokens() -> u32 {
    DEFAULT_MAX_OUTPUT_TOKENS
}

fn default_temperature() -> f32 {
    DEFAULT_TEMPERATURE
}

fn default_provider() -> String {
    "gemini".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct TomlConfig {
    #[serde(default = "default_provider")]
    pub provider: String,
    #[serde(default)]
    pub gemini: Option<GeminiConfig>,
    #[serde(default)]
    pub openai: Option<OpenAIConfig>,
    #[serde(default)]
    pub models: ModelConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub request: RequestConfig,
}

/// Application configuration loaded from TOML files
///
/// All configuration values are loaded and validated at startup so the
/// service fails fast if misconfigured.
#[derive(Debug, Clone)]
pub struct Config {
    /// Provider type (Gemini or OpenAI-compatible)
    pub provider: ProviderType,

    /// Default upstream API key, used when a client sends none
    pub default_api_key: Option<String>,

    /// Upstream API base URL
    pub base_url: String,

    /// Model for text and structured flows
    pub text_model: String,

    /// Model for image generation flows
    pub image_model: String,

    /// Server host address
    pub host: String,

    /// Server port
    pub port: u16,

    /// Logging level
    pub log_level: String,

    /// Request timeout in seconds
    pub request_timeout: u64,

    /// Conversation history cap for chat flows
    pub max_history_messages: u32,

    pub max_output_tokens: u32,

    pub temperature: f32,
}

impl Config {
    /// Load configuration from TOML file
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - The TOML file cannot be read or parsed
    /// - The provider name is unknown
    /// - Configuration values are invalid
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path).context("Failed to read configuration file")?;
        Self::from_toml_str(&content, std::env::var("GEMINI_API_KEY").ok())
    }

    /// Parse configuration text; `env_gemini_key` fills a missing Gemini key
    pub fn from_toml_str(content: &str, env_gemini_key: Option<String>) -> Result<Self> {
        let config: TomlConfig =
            toml::from_str(content).context("Failed to parse TOML configuration")?;

        let provider = ProviderType::from_str(&config.provider)
            .context("Invalid provider value. Must be one of: gemini, openai")?;

        let (api_key, base_url) = match provider {
            ProviderType::Gemini => {
                let gemini = config.gemini.unwrap_or_default();
                (
                    gemini.api_key.or(env_gemini_key),
                    gemini
                        .base_url
                        .unwrap_or_else(|| DEFAULT_GEMINI_BASE_URL.to_string()),
                )
            }
            ProviderType::OpenAI => {
                let openai = config
                    .openai
                    .context("OpenAI configuration missing for OpenAI provider")?;
                (
                    openai.api_key,
                    openai
                        .base_url
                        .unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_string()),
                )
            }
        };

        url::Url::parse(&base_url)
            .with_context(|| format!("Invalid base_url: {}", base_url))?;

        if config.request.max_history_messages == 0 {
            anyhow::bail!("request.max_history_messages must be greater than zero");
        }
        if !(0.0..=2.0).contains(&config.request.temperature) {
            anyhow::bail!("request.temperature must be between 0.0 and 2.0");
        }

        Ok(Config {
            provider,
            default_api_key: api_key.filter(|k| !k.trim().is_empty()),
            base_url,
            text_model: config.models.text_model,
            image_model: config.models.image_model,
            host: config.server.host,
            port: config.server.port,
            log_level: config.server.log_level,
            request_timeout: config.request.request_timeout,
            max_history_messages: config.request.max_history_messages,
            max_output_tokens: config.request.max_output_tokens,
            temperature: config.request.temperature,
        })
    }

    /// Load configuration from environment and config file
    ///
    /// Looks for config.toml in current directory by default
    pub fn from_env() -> Result<Self> {
        let config_path =
            std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
        Self::from_file(config_path)
    }

    /// Whether a default upstream key is configured
    pub fn has_default_api_key(&self) -> bool {
        self.default_api_key.is_some()
    }
}

#[cfg(test)]
pub(crate) fn test_config() -> Config {
    Config {
        provider: ProviderType::Gemini,
        default_api_key: Some("AIza-default".to_string()),
        base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
        text_model: DEFAULT_TEXT_MODEL.to_string(),
        image_model: DEFAULT_IMAGE_MODEL.to_string(),
        host: "127.0.0.1".to_string(),
        port: DEFAULT_PORT,
        log_level: "info".to_string(),
        request_timeout: 5,
        max_history_messages: 4,
        max_output_tokens: 1024,
        temperature: DEFAULT_TEMPERATURE,
    }
}
