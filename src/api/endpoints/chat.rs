//! Chat endpoints.
//!
//! - `POST /api/chat`: run a message through the chat pipeline
//! - `GET /api/chat/suggestions`: quick-analysis prompts

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::Deserialize;

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, DataEnvelope};
use crate::models::{ClinicalRole, ConversationTurn};
use crate::pipeline::prompt::{quick_prompts, QuickPrompt};
use crate::pipeline::{ChatOutcome, ChatPipeline, ChatRequest};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatBody {
    pub message: String,
    #[serde(default)]
    pub patient_ids: Vec<u32>,
    #[serde(default)]
    pub chat_history: Vec<ConversationTurn>,
    #[serde(default)]
    pub role: ClinicalRole,
}

impl From<ChatBody> for ChatRequest {
    fn from(body: ChatBody) -> Self {
        ChatRequest {
            message: body.message,
            patient_ids: body.patient_ids,
            history: body.chat_history,
            role: body.role,
        }
    }
}

/// `POST /api/chat`
///
/// LLM clients block, so the pipeline runs on the blocking pool.
pub async fn send(
    State(ctx): State<ApiContext>,
    body: Result<Json<ChatBody>, JsonRejection>,
) -> Result<Json<DataEnvelope<ChatOutcome>>, ApiError> {
    let Json(body) = body?;
    let request = ChatRequest::from(body);
    let roster = ctx.roster.clone();
    let chain = ctx.chain.clone();

    let outcome = tokio::task::spawn_blocking(move || {
        ChatPipeline::new(&roster, &chain).respond(&request)
    })
    .await??;

    tracing::info!(
        message_id = %outcome.message_id,
        patients = outcome.patient_ids.len(),
        groups = outcome.grouped.len(),
        fallback_used = outcome.fallback_used,
        "Chat reply ready"
    );
    Ok(Json(DataEnvelope::now(outcome)))
}

/// `GET /api/chat/suggestions`
pub async fn suggestions() -> Json<DataEnvelope<&'static [QuickPrompt]>> {
    Json(DataEnvelope::now(quick_prompts()))
}
