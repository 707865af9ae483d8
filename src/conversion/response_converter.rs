//! Wire response to provider-neutral response conversion
//!
//! Also hosts the helpers flows use to shape raw model text: JSON extraction
//! for structured output, SVG extraction and data URI encoding.

use crate::core::constants::mime;
use crate::core::error::{FlowError, FlowResult};
use crate::core::provider::ProviderError;
use crate::models::gemini::GeminiResponse;
use crate::models::generation::{GenerateResponse, Media, Usage};
use crate::models::openai::OpenAIChatCompletionResponse;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

/// Convert a Gemini response to the provider-neutral format
///
/// Text parts of the first candidate are concatenated; the first inline
/// data part becomes the response media.
///
/// # Errors
///
/// A prompt blocked by safety filters is a `BadRequest`; a response without
/// candidates is `Unexpected`.
pub fn convert_from_gemini(response: GeminiResponse) -> Result<GenerateResponse, ProviderError> {
    if let Some(reason) = response
        .prompt_feedback
        .as_ref()
        .and_then(|f| f.block_reason.as_ref())
    {
        return Err(ProviderError::BadRequest(format!(
            "Prompt was blocked by the provider: {}",
            reason
        )));
    }

    let candidate = response
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| ProviderError::Unexpected("Response contained no candidates".into()))?;

    let parts = candidate.content.map(|c| c.parts).unwrap_or_default();

    let text = parts
        .iter()
        .filter_map(|p| p.text.as_deref())
        .collect::<Vec<_>>()
        .concat();

    let media = parts
        .iter()
        .find_map(|p| p.inline_data.as_ref())
        .map(|data| Media {
            content_type: data.mime_type.clone(),
            data_uri: format!("data:{};base64,{}", data.mime_type, data.data),
        });

    let usage = response
        .usage_metadata
        .map(|u| Usage {
            input_tokens: u.prompt_token_count,
            output_tokens: u.candidates_token_count,
        })
        .unwrap_or_default();

    debug!(
        "Gemini response: chars={}, media={}, finish_reason={:?}",
        text.len(),
        media.is_some(),
        candidate.finish_reason
    );

    Ok(GenerateResponse {
        text,
        media,
        finish_reason: candidate.finish_reason,
        usage,
    })
}

/// Convert an OpenAI chat completion response to the provider-neutral format
pub fn convert_from_openai(
    response: OpenAIChatCompletionResponse,
) -> Result<GenerateResponse, ProviderError> {
    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| ProviderError::Unexpected("Response contained no choices".into()))?;

    let usage = response
        .usage
        .map(|u| Usage {
            input_tokens: u.prompt_tokens,
            output_tokens: u.completion_tokens,
        })
        .unwrap_or_default();

    Ok(GenerateResponse {
        text: choice.message.content.unwrap_or_default(),
        media: None,
        finish_reason: choice.finish_reason,
        usage,
    })
}

/// Deserialize structured model output
///
/// Tolerates markdown code fences and chatter around the JSON object.
pub fn parse_json_output<T: DeserializeOwned>(text: &str) -> FlowResult<T> {
    let body = strip_code_fence(text);

    if let Ok(value) = serde_json::from_str::<T>(body) {
        return Ok(value);
    }

    let object = match (body.find('{'), body.rfind('}')) {
        (Some(start), Some(end)) if start < end => &body[start..=end],
        _ => {
            warn!("Model output contained no JSON object");
            return Err(FlowError::MalformedOutput(
                "expected a JSON object".to_string(),
            ));
        }
    };

    serde_json::from_str::<T>(object).map_err(|e| {
        warn!("Failed to parse structured model output: {}", e);
        FlowError::MalformedOutput(e.to_string())
    })
}

/// Return the text inside a surrounding markdown code fence, if any
///
/// Only a fence that wraps the whole text is removed.
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(inner) = trimmed
        .strip_prefix("```")
        .and_then(|rest| rest.strip_suffix("```"))
    else {
        return trimmed;
    };
    // drop the language tag line
    match inner.find('\n') {
        Some(idx) => inner[idx + 1..].trim(),
        None => inner.trim(),
    }
}

/// Extract the first complete `<svg>...</svg>` element from model output
///
/// Nested `<svg>` elements are matched by depth; self-closing `<svg/>`
/// does not open a level.
pub fn extract_svg(text: &str) -> Option<&str> {
    const CLOSE: &str = "</svg>";

    let start = text.find("<svg")?;
    let mut depth = 0usize;
    let mut pos = start;

    while pos < text.len() {
        let rest = &text[pos..];
        if rest.starts_with(CLOSE) {
            depth = depth.checked_sub(1)?;
            pos += CLOSE.len();
            if depth == 0 {
                return Some(&text[start..pos]);
            }
        } else if is_svg_open(rest) {
            let tag_end = rest.find('>')?;
            if !rest[..tag_end].ends_with('/') {
                depth += 1;
            }
            pos += tag_end + 1;
        } else {
            pos += rest.chars().next().map_or(1, char::len_utf8);
        }
    }
    None
}

fn is_svg_open(rest: &str) -> bool {
    rest.strip_prefix("<svg").is_some_and(|after| {
        after
            .chars()
            .next()
            .is_some_and(|c| c == '>' || c == '/' || c.is_whitespace())
    })
}

/// Encode SVG markup as a base64 data URI
pub fn svg_data_uri(svg: &str) -> String {
    format!(
        "data:{};base64,{}",
        mime::IMAGE_SVG,
        STANDARD.encode(svg.as_bytes())
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::flows::ErrorCodeTroubleshootingOutput;
    use serde_json::json;

    #[test]
    fn test_gemini_text_and_image_parts() {
        let response: GeminiResponse = serde_json::from_value(json!({
            "candidates": [{
                "content": {"role": "model", "parts": [
                    {"text": "Sơ đồ "},
                    {"text": "thủy lực"},
                    {"inlineData": {"mimeType": "image/png", "data": "iVBORw0KGgo="}}
                ]},
                "finishReason": "STOP"
            }],
            "usageMetadata": {"promptTokenCount": 12, "candidatesTokenCount": 30, "totalTokenCount": 42}
        }))
        .unwrap();

        let converted = convert_from_gemini(response).unwrap();
        assert_eq!(converted.text, "Sơ đồ thủy lực");
        let media = converted.media.unwrap();
        assert_eq!(media.content_type, "image/png");
        assert_eq!(media.data_uri, "data:image/png;base64,iVBORw0KGgo=");
        assert_eq!(converted.usage.output_tokens, 30);
        assert_eq!(converted.finish_reason.as_deref(), Some("STOP"));
    }

    #[test]
    fn test_gemini_blocked_prompt() {
        let response: GeminiResponse = serde_json::from_value(json!({
            "promptFeedback": {"blockReason": "SAFETY"}
        }))
        .unwrap();
        assert!(matches!(
            convert_from_gemini(response),
            Err(ProviderError::BadRequest(msg)) if msg.contains("SAFETY")
        ));
    }

    #[test]
    fn test_gemini_no_candidates() {
        assert!(matches!(
            convert_from_gemini(GeminiResponse::default()),
            Err(ProviderError::Unexpected(_))
        ));
    }

    #[test]
    fn test_parse_fenced_json() {
        let text = "```json\n{\"potential_causes\": \"- Cảm biến hỏng\", \"troubleshooting_instructions\": \"1. Đo điện trở\"}\n```";
        let out: ErrorCodeTroubleshootingOutput = parse_json_output(text).unwrap();
        assert_eq!(out.potential_causes, "- Cảm biến hỏng");
    }

    #[test]
    fn test_parse_json_with_chatter() {
        let text = "Here you go: {\"potentialCauses\": \"a\", \"troubleshootingInstructions\": \"b\"} Hope it helps";
        let out: ErrorCodeTroubleshootingOutput = parse_json_output(text).unwrap();
        assert_eq!(out.troubleshooting_instructions, "b");
    }

    #[test]
    fn test_parse_json_malformed() {
        let result: FlowResult<ErrorCodeTroubleshootingOutput> =
            parse_json_output("no structure here");
        assert!(matches!(result, Err(FlowError::MalformedOutput(_))));

        let result: FlowResult<ErrorCodeTroubleshootingOutput> =
            parse_json_output("{\"potential_causes\": \"only one field\"}");
        assert!(matches!(result, Err(FlowError::MalformedOutput(_))));
    }

    #[test]
    fn test_extract_svg() {
        let text = "```svg\n<?xml version=\"1.0\"?>\n<svg viewBox=\"0 0 10 10\"><g><svg/></g></svg>\n```";
        assert_eq!(
            extract_svg(text),
            Some("<svg viewBox=\"0 0 10 10\"><g><svg/></g></svg>")
        );
        assert_eq!(extract_svg("no diagram available"), None);
        assert_eq!(extract_svg("<svg width=\"10\">unterminated"), None);
    }

    #[test]
    fn test_svg_data_uri() {
        assert_eq!(svg_data_uri("<svg/>"), "data:image/svg+xml;base64,PHN2Zy8+");
    }

    #[test]
    fn test_strip_code_fence_passthrough() {
        assert_eq!(strip_code_fence("  plain text "), "plain text");
        assert_eq!(strip_code_fence("```\nabc\n```"), "abc");
        assert_eq!(strip_code_fence("```markdown\n| a | b |\n```"), "| a | b |");
    }

    #[test]
    fn test_strip_code_fence_keeps_leading_code_block() {
        let text = "```bash\nkomatsu-diag --read\n```\n\nSau đó kiểm tra cảm biến.";
        assert_eq!(strip_code_fence(text), text);
    }

    #[test]
    fn test_extract_svg_first_of_two_siblings() {
        let text = "<svg id=\"a\"><rect/></svg>\nVà sơ đồ thứ hai:\n<svg id=\"b\"><line/></svg>";
        assert_eq!(extract_svg(text), Some("<svg id=\"a\"><rect/></svg>"));
    }

    #[test]
    fn test_extract_svg_nested_element() {
        let text = "<svg><svg x=\"5\"><circle/></svg><text>Bơm</text></svg> xong";
        assert_eq!(
            extract_svg(text),
            Some("<svg><svg x=\"5\"><circle/></svg><text>Bơm</text></svg>")
        );
    }
}
