use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use super::grouping::group_by_patient;
use super::llm::{parse_reply, static_fallback_payload, ChainResponse, FallbackChain, LlmError, TokenUsage};
use super::prompt::{build_chat_prompt, classify_analysis, system_prompt};
use super::relevance::{select_relevant_patients, SelectionReason};
use crate::models::{
    AnalysisType, ChatReply, ClinicalRole, ConversationTurn, GroupedInsight, PatientRecord,
};

/// Longest chat message accepted, in characters.
pub const MAX_MESSAGE_CHARS: usize = 2000;

#[derive(Error, Debug)]
pub enum ChatError {
    #[error("Message is empty")]
    EmptyMessage,

    #[error("Message exceeds {max} characters ({0})", max = MAX_MESSAGE_CHARS)]
    MessageTooLong(usize),

    #[error("None of the requested patients are in the roster")]
    NoMatchingPatients,

    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),
}

#[derive(Debug, Clone, Default)]
pub struct ChatRequest {
    pub message: String,
    /// Explicit selection; empty means "let the relevance filter decide".
    pub patient_ids: Vec<u32>,
    pub history: Vec<ConversationTurn>,
    pub role: ClinicalRole,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatOutcome {
    pub message_id: Uuid,
    pub reply: ChatReply,
    pub grouped: Vec<GroupedInsight>,
    pub patient_ids: Vec<u32>,
    pub analysis_type: AnalysisType,
    /// How the patients were chosen; `None` for an explicit selection.
    pub selection: Option<SelectionReason>,
    pub provider: Option<String>,
    pub fallback_used: bool,
    pub usage: Option<TokenUsage>,
}

/// Chat orchestrator.
///
/// Coordinates: validate → select → classify → prompt → generate → parse → group.
pub struct ChatPipeline<'a> {
    roster: &'a [PatientRecord],
    chain: &'a FallbackChain,
}

impl<'a> ChatPipeline<'a> {
    pub fn new(roster: &'a [PatientRecord], chain: &'a FallbackChain) -> Self {
        Self { roster, chain }
    }

    pub fn respond(&self, request: &ChatRequest) -> Result<ChatOutcome, ChatError> {
        let message = request.message.trim();
        if message.is_empty() {
            return Err(ChatError::EmptyMessage);
        }
        let length = message.chars().count();
        if length > MAX_MESSAGE_CHARS {
            return Err(ChatError::MessageTooLong(length));
        }

        let (patients, selection) = self.select(message, &request.patient_ids)?;
        let analysis = classify_analysis(message);
        tracing::info!(
            patients = patients.len(),
            analysis = analysis.as_str(),
            role = request.role.as_str(),
            "Processing chat message"
        );

        let system = system_prompt(request.role);
        let prompt = build_chat_prompt(message, &patients, &request.history, analysis);

        let (reply, provider, usage, fallback_used) = match self.chain.run(&system, &prompt)? {
            ChainResponse::Generated {
                provider,
                completion,
            } => (
                parse_reply(&completion.text),
                Some(provider),
                completion.usage,
                false,
            ),
            ChainResponse::Exhausted => (static_fallback_payload().into(), None, None, true),
        };

        let grouped = group_by_patient(reply.insights());

        Ok(ChatOutcome {
            message_id: Uuid::new_v4(),
            reply,
            grouped,
            patient_ids: patients.iter().map(|p| p.id).collect(),
            analysis_type: analysis,
            selection,
            provider,
            fallback_used,
            usage,
        })
    }

    fn select(
        &self,
        message: &str,
        patient_ids: &[u32],
    ) -> Result<(Vec<&'a PatientRecord>, Option<SelectionReason>), ChatError> {
        if patient_ids.is_empty() {
            let selection = select_relevant_patients(self.roster, message);
            return Ok((selection.patients, Some(selection.reason)));
        }

        let chosen: Vec<&PatientRecord> = self
            .roster
            .iter()
            .filter(|p| patient_ids.contains(&p.id))
            .collect();
        if chosen.is_empty() {
            return Err(ChatError::NoMatchingPatients);
        }
        Ok((chosen, None))
    }
}
