//! Conversational flows: the expert chatbot and guided diagnostics
//!
//! Both forward the conversation history plus the latest message and return
//! the model's text unchanged. They differ only in the system instruction.

use super::FlowContext;
use super::prompts;
use crate::core::error::{FlowResult, require};
use crate::core::model_manager::ModelTier;
use crate::models::flows::{ConversationInput, ConversationReply};
use crate::models::generation::{ChatMessage, ChatRole};
use tracing::warn;

/// Continue a free-form conversation with the construction expert assistant
pub async fn continue_conversation(
    ctx: &FlowContext,
    input: ConversationInput,
) -> FlowResult<ConversationReply> {
    converse(ctx, "chatbot", prompts::CHATBOT_SYSTEM, input).await
}

/// Continue an interactive, one-step-at-a-time diagnostic session
pub async fn continue_guided_diagnostic(
    ctx: &FlowContext,
    input: ConversationInput,
) -> FlowResult<ConversationReply> {
    converse(ctx, "guided_diagnostic", prompts::GUIDED_DIAGNOSTIC_SYSTEM, input).await
}

async fn converse(
    ctx: &FlowContext,
    flow: &str,
    system: &str,
    input: ConversationInput,
) -> FlowResult<ConversationReply> {
    require("message", &input.message)?;
    let credentials = ctx.credentials(&input.settings)?;

    let history = truncate_history(input.history, ctx.max_history_messages());
    let request = ctx
        .request(ModelTier::Text, input.message)
        .with_system(system)
        .with_history(history);

    let response = ctx.generate(flow, &credentials, &request).await?;

    Ok(ConversationReply {
        text: response.text,
    })
}

/// Keep the newest `limit` messages, starting on a user turn
fn truncate_history(history: Vec<ChatMessage>, limit: usize) -> Vec<ChatMessage> {
    let original_count = history.len();
    let skip = original_count.saturating_sub(limit);

    let kept: Vec<ChatMessage> = history
        .into_iter()
        .skip(skip)
        .skip_while(|msg| msg.role == ChatRole::Model)
        .collect();

    if kept.len() < original_count {
        warn!(
            "📜 History truncated: {} messages → {} messages",
            original_count,
            kept.len()
        );
    }
    kept
}
