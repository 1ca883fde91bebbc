use super::{GeminiClient, LlmCompletion, LlmError, LlmGenerate, OpenAiClient};
use crate::config::Config;
use crate::models::{Confidence, InsightRecord, InsightType, InsightsPayload, Priority, Timeframe};

/// Outcome of running a prompt through the provider chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChainResponse {
    Generated {
        provider: String,
        completion: LlmCompletion,
    },
    /// Every provider was unavailable; use the static payload.
    Exhausted,
}

/// Ordered list of providers. Quota, connection and timeout failures move on
/// to the next provider; any other failure is returned as-is.
#[derive(Default)]
pub struct FallbackChain {
    providers: Vec<Box<dyn LlmGenerate>>,
}

impl FallbackChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_provider(mut self, provider: Box<dyn LlmGenerate>) -> Self {
        self.providers.push(provider);
        self
    }

    /// OpenAI first, then Gemini, for whichever keys are configured.
    pub fn from_config(config: &Config) -> Result<Self, LlmError> {
        let mut chain = Self::new();
        if let Some(openai) = &config.openai {
            chain.push(Box::new(OpenAiClient::new(
                &openai.base_url,
                &openai.api_key,
                &openai.model,
                config.llm_timeout_secs,
            )?));
        }
        if let Some(gemini) = &config.gemini {
            chain.push(Box::new(GeminiClient::new(
                &gemini.base_url,
                &gemini.api_key,
                &gemini.model,
                config.llm_timeout_secs,
            )?));
        }
        if chain.is_empty() {
            tracing::warn!("No LLM API keys configured, chat will serve static insights");
        }
        Ok(chain)
    }

    pub fn push(&mut self, provider: Box<dyn LlmGenerate>) {
        self.providers.push(provider);
    }

    pub fn provider_names(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    pub fn run(&self, system: &str, prompt: &str) -> Result<ChainResponse, LlmError> {
        for provider in &self.providers {
            match provider.generate(system, prompt) {
                Ok(completion) => {
                    tracing::info!(provider = provider.name(), "LLM reply received");
                    return Ok(ChainResponse::Generated {
                        provider: provider.name().to_string(),
                        completion,
                    });
                }
                Err(e) if e.is_recoverable() => {
                    tracing::warn!(
                        provider = provider.name(),
                        error = %e,
                        "LLM provider unavailable, trying next"
                    );
                }
                Err(e) => {
                    tracing::error!(provider = provider.name(), error = %e, "LLM provider failed");
                    return Err(e);
                }
            }
        }

        tracing::warn!(
            providers = self.providers.len(),
            "All LLM providers unavailable, serving static insights"
        );
        Ok(ChainResponse::Exhausted)
    }
}

#[allow(clippy::too_many_arguments)]
fn card(
    insight_type: InsightType,
    title: &str,
    patient: &str,
    priority: Priority,
    recommendation: &str,
    reasoning: &str,
    confidence: Confidence,
    timeframe: Timeframe,
) -> InsightRecord {
    InsightRecord {
        insight_type,
        title: title.to_string(),
        patient: patient.to_string(),
        priority,
        recommendation: recommendation.to_string(),
        reasoning: reasoning.to_string(),
        confidence,
        timeframe,
    }
}

/// Canned analysis served when no provider can answer.
pub fn static_fallback_payload() -> InsightsPayload {
    InsightsPayload {
        insights: vec![
            card(
                InsightType::RiskAlert,
                "High Readmission Risk",
                "John Smith",
                Priority::High,
                "Schedule follow-up appointment within 48 hours and assign care coordinator",
                "Patient has multiple comorbidities and history of medication non-compliance",
                Confidence::High,
                Timeframe::Within24h,
            ),
            card(
                InsightType::Medication,
                "Potential Drug Interaction",
                "Sarah Johnson",
                Priority::Medium,
                "Review medication list with pharmacist and adjust warfarin dosage",
                "New antibiotic prescription may interact with existing anticoagulant therapy",
                Confidence::Medium,
                Timeframe::Within24h,
            ),
            card(
                InsightType::FollowUp,
                "Specialist Consultation Needed",
                "Michael Brown",
                Priority::Medium,
                "Refer to cardiologist for post-MI follow-up within 1 week",
                "Patient discharged after myocardial infarction requires specialized cardiac care",
                Confidence::High,
                Timeframe::WithinWeek,
            ),
            card(
                InsightType::CareCoordination,
                "Home Health Services Required",
                "Multiple patients",
                Priority::Medium,
                "Arrange home health nursing for wound care and medication management",
                "Several patients have complex wound care needs and limited mobility",
                Confidence::Medium,
                Timeframe::WithinWeek,
            ),
            card(
                InsightType::General,
                "Social Determinants Assessment",
                "Multiple patients",
                Priority::Low,
                "Conduct social work assessment for transportation and housing needs",
                "Multiple patients may face barriers to follow-up care due to social factors",
                Confidence::Medium,
                Timeframe::Routine,
            ),
        ],
        summary: "Analysis identified 5 key areas requiring attention: high-risk readmission patient, medication interaction, specialist follow-up, home health coordination, and social determinants assessment.".to_string(),
    }
}
