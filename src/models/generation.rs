//! Provider-neutral generation request and response
//!
//! Flows build a [`GenerateRequest`] and receive a [`GenerateResponse`];
//! the conversion layer translates both to and from each provider's wire
//! format.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::constants::role;

/// One text part of a chat message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessagePart {
    pub text: String,
}

/// Author of a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Model,
}

impl ChatRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChatRole::User => role::USER,
            ChatRole::Model => role::MODEL,
        }
    }
}

/// A message in a conversation history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub parts: Vec<MessagePart>,
}

impl ChatMessage {
    #[cfg(test)]
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            parts: vec![MessagePart { text: text.into() }],
        }
    }

    #[cfg(test)]
    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Model,
            parts: vec![MessagePart { text: text.into() }],
        }
    }

    /// Concatenated text of all parts
    pub fn text(&self) -> String {
        self.parts
            .iter()
            .map(|p| p.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Shape of the output requested from the model
#[derive(Debug, Clone, PartialEq)]
pub enum OutputMode {
    /// Free-form text
    Text,
    /// A JSON object matching the given schema (OpenAPI subset)
    Json(Value),
    /// Text and at least one generated image
    TextAndImage,
}

/// A single generation call
#[derive(Debug, Clone)]
pub struct GenerateRequest {
    pub model: String,
    pub system: Option<String>,
    pub history: Vec<ChatMessage>,
    pub prompt: String,
    pub output: OutputMode,
    pub max_output_tokens: Option<u32>,
    pub temperature: Option<f32>,
}

impl GenerateRequest {
    pub fn new(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            system: None,
            history: Vec::new(),
            prompt: prompt.into(),
            output: OutputMode::Text,
            max_output_tokens: None,
            temperature: None,
        }
    }

    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    pub fn with_history(mut self, history: Vec<ChatMessage>) -> Self {
        self.history = history;
        self
    }

    pub fn with_output(mut self, output: OutputMode) -> Self {
        self.output = output;
        self
    }

    pub fn with_limits(mut self, max_output_tokens: u32, temperature: f32) -> Self {
        self.max_output_tokens = Some(max_output_tokens);
        self.temperature = Some(temperature);
        self
    }
}

/// Generated binary content, already encoded as a data URI
#[derive(Debug, Clone, PartialEq)]
pub struct Media {
    pub content_type: String,
    pub data_uri: String,
}

/// Token accounting reported by the provider
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Usage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

/// Result of a generation call
#[derive(Debug, Clone, Default)]
pub struct GenerateResponse {
    pub text: String,
    pub media: Option<Media>,
    pub finish_reason: Option<String>,
    pub usage: Usage,
}

#[cfg(test)]
impl GenerateResponse {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }
}
