//! Provider-neutral request to wire format conversion
//!
//! Translates a [`GenerateRequest`] into the Gemini `generateContent` body
//! or an OpenAI-compatible chat completion body.

use crate::core::constants::{mime, modality, role};
use crate::core::provider::ProviderError;
use crate::models::gemini::{GeminiContent, GeminiGenerationConfig, GeminiPart, GeminiRequest};
use crate::models::generation::{ChatMessage, ChatRole, GenerateRequest, OutputMode};
use crate::models::openai::{OpenAIChatCompletionRequest, OpenAIMessage, OpenAIResponseFormat};
use tracing::debug;

/// Convert a generation request to the Gemini format
///
/// History messages without any text are dropped; the prompt becomes the
/// final user turn.
pub fn convert_to_gemini(request: &GenerateRequest) -> GeminiRequest {
    let mut contents: Vec<GeminiContent> = request
        .history
        .iter()
        .filter(|msg| has_text(msg))
        .map(|msg| GeminiContent {
            role: Some(msg.role.as_str().to_string()),
            parts: msg
                .parts
                .iter()
                .filter(|p| !p.text.is_empty())
                .map(|p| GeminiPart::text(p.text.clone()))
                .collect(),
        })
        .collect();

    contents.push(GeminiContent {
        role: Some(role::USER.to_string()),
        parts: vec![GeminiPart::text(request.prompt.clone())],
    });

    let system_instruction = request
        .system
        .as_ref()
        .filter(|s| !s.trim().is_empty())
        .map(|s| GeminiContent {
            role: None,
            parts: vec![GeminiPart::text(s.trim())],
        });

    let mut generation_config = GeminiGenerationConfig {
        temperature: request.temperature,
        max_output_tokens: request.max_output_tokens,
        ..Default::default()
    };

    match &request.output {
        OutputMode::Text => {}
        OutputMode::Json(schema) => {
            generation_config.response_mime_type = Some(mime::APPLICATION_JSON.to_string());
            generation_config.response_schema = Some(schema.clone());
        }
        OutputMode::TextAndImage => {
            generation_config.response_modalities =
                Some(vec![modality::TEXT.to_string(), modality::IMAGE.to_string()]);
        }
    }

    debug!(
        "Gemini request: model={}, contents={}, system={}",
        request.model,
        contents.len(),
        system_instruction.is_some()
    );

    GeminiRequest {
        contents,
        system_instruction,
        generation_config: Some(generation_config),
    }
}

/// Convert a generation request to the OpenAI chat completion format
///
/// # Errors
///
/// Returns `ProviderError::Unsupported` for image output, which chat
/// completion endpoints cannot produce.
pub fn convert_to_openai(
    request: &GenerateRequest,
) -> Result<OpenAIChatCompletionRequest, ProviderError> {
    let mut system_text = request.system.clone().unwrap_or_default();

    let response_format = match &request.output {
        OutputMode::Text => None,
        OutputMode::Json(schema) => {
            // json_object mode carries no schema; describe it in the system turn instead
            if !system_text.is_empty() {
                system_text.push_str("\n\n");
            }
            system_text.push_str(&format!(
                "Respond with a single JSON object matching this schema:\n{}",
                schema
            ));
            Some(OpenAIResponseFormat {
                format_type: "json_object".to_string(),
            })
        }
        OutputMode::TextAndImage => {
            return Err(ProviderError::Unsupported(
                "image generation is not available on chat completion endpoints".to_string(),
            ));
        }
    };

    let mut messages = Vec::with_capacity(request.history.len() + 2);

    if !system_text.trim().is_empty() {
        messages.push(OpenAIMessage {
            role: role::SYSTEM.to_string(),
            content: Some(system_text.trim().to_string()),
        });
    }

    for msg in request.history.iter().filter(|m| has_text(m)) {
        let role = match msg.role {
            ChatRole::User => role::USER,
            ChatRole::Model => role::ASSISTANT,
        };
        messages.push(OpenAIMessage {
            role: role.to_string(),
            content: Some(msg.text()),
        });
    }

    messages.push(OpenAIMessage {
        role: role::USER.to_string(),
        content: Some(request.prompt.clone()),
    });

    Ok(OpenAIChatCompletionRequest {
        model: request.model.clone(),
        messages,
        max_tokens: request.max_output_tokens,
        temperature: request.temperature,
        response_format,
        stream: false,
    })
}

fn has_text(msg: &ChatMessage) -> bool {
    msg.parts.iter().any(|p| !p.text.trim().is_empty())
}
