use serde::{Deserialize, Serialize};

use super::enums::{Confidence, InsightType, MessageRole, Priority, Timeframe};

/// A single insight card as produced by the LLM.
///
/// Every field is defaulted so a partially populated card still
/// deserializes; enums degrade to their lowest-precedence value.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct InsightRecord {
    #[serde(rename = "type", default)]
    pub insight_type: InsightType,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub patient: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub recommendation: String,
    #[serde(default)]
    pub reasoning: String,
    #[serde(default)]
    pub confidence: Confidence,
    #[serde(default)]
    pub timeframe: Timeframe,
}

/// Per-patient consolidation of one or more insight cards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupedInsight {
    pub patient: String,
    pub insights: Vec<InsightRecord>,
    pub priority: Priority,
    #[serde(rename = "type")]
    pub insight_type: InsightType,
    pub confidence: Confidence,
    pub timeframe: Timeframe,
    pub title: String,
    pub recommendation: String,
    pub reasoning: String,
}

/// Structured payload the model is asked to return.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsightsPayload {
    pub insights: Vec<InsightRecord>,
    pub summary: String,
}

/// What a chat turn produced: structured insights or plain prose.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "response_type", rename_all = "snake_case")]
pub enum ChatReply {
    Insights {
        insights: Vec<InsightRecord>,
        summary: String,
    },
    Text {
        content: String,
    },
}

impl ChatReply {
    pub fn insights(&self) -> &[InsightRecord] {
        match self {
            ChatReply::Insights { insights, .. } => insights,
            ChatReply::Text { .. } => &[],
        }
    }
}

impl From<InsightsPayload> for ChatReply {
    fn from(payload: InsightsPayload) -> Self {
        ChatReply::Insights {
            insights: payload.insights,
            summary: payload.summary,
        }
    }
}

/// One prior message in the chat, as sent back by the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    #[serde(default)]
    pub role: MessageRole,
    pub content: String,
}
