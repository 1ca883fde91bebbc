use serde::Serialize;

use crate::models::{AnalysisType, ClinicalRole, ConversationTurn, MessageRole, PatientRecord};

/// Turns of prior conversation carried into a chat prompt.
pub const MAX_HISTORY_TURNS: usize = 10;

pub const BASE_SYSTEM_PROMPT: &str = r#"You are an expert healthcare AI assistant specializing in care transition management. Your role is to analyze patient discharge summaries and provide actionable insights for healthcare providers.

Key responsibilities:
1. Identify high-risk patients who may need immediate attention
2. Suggest appropriate follow-up care and interventions
3. Flag potential medication issues or drug interactions
4. Recommend care coordination strategies
5. Assess readmission risk factors

When analyzing patient data, consider:
- Medical complexity and comorbidities
- Social determinants of health (living situation, support systems)
- Medication compliance risks
- Follow-up care requirements and timing
- Discharge disposition appropriateness
- Risk factors for readmission

Always provide specific, actionable recommendations with clear clinical reasoning. Format your response as structured insights that can be displayed as cards."#;

pub const RESPONSE_FORMAT: &str = r#"Please analyze the provided patient data and generate actionable insights. Structure your response as JSON with the following format:
{
  "insights": [
    {
      "type": "risk_alert" | "follow_up" | "medication" | "care_coordination" | "general",
      "title": "Brief descriptive title",
      "patient": "Patient name or 'Multiple patients'",
      "priority": "high" | "medium" | "low",
      "recommendation": "Specific actionable recommendation",
      "reasoning": "Clinical reasoning behind the recommendation",
      "confidence": "high" | "medium" | "low",
      "timeframe": "immediate" | "within_24h" | "within_week" | "routine"
    }
  ],
  "summary": "Brief overall summary of key findings and recommendations"
}"#;

/// System prompt for the clinician the answer is written for.
pub fn system_prompt(role: ClinicalRole) -> String {
    let focus = match role {
        ClinicalRole::Physician => {
            "- Clinical decision-making and medical management\n\
             - Medication adjustments and interactions\n\
             - Specialist referrals and follow-up timing\n\
             - Diagnostic considerations and monitoring needs"
        }
        ClinicalRole::Nurse => {
            "- Patient education and self-care management\n\
             - Medication compliance and administration\n\
             - Symptom monitoring and when to seek care\n\
             - Discharge planning and home care needs"
        }
        ClinicalRole::CaseManager => {
            "- Care coordination across providers\n\
             - Resource allocation and utilization\n\
             - Insurance and authorization requirements\n\
             - Social services and community resources"
        }
    };
    format!("{BASE_SYSTEM_PROMPT}\n\nFocus on:\n{focus}")
}

/// Classify a chat message into an analysis type using keyword heuristics.
pub fn classify_analysis(message: &str) -> AnalysisType {
    let lower = message.to_lowercase();

    if has_any(&lower, &["readmission", "risk"]) {
        return AnalysisType::RiskAssessment;
    }

    if has_any(&lower, &["medication", "drug", "interaction"]) {
        return AnalysisType::MedicationReview;
    }

    if has_any(&lower, &["follow up", "follow-up", "appointment", "schedule"]) {
        return AnalysisType::FollowUpPlanning;
    }

    AnalysisType::General
}

fn has_any(text: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| text.contains(n))
}

fn analysis_instructions(analysis: AnalysisType) -> &'static str {
    match analysis {
        AnalysisType::RiskAssessment => {
            "Perform a comprehensive risk assessment focusing on:\n\
             - Readmission risk factors\n\
             - Medication compliance risks\n\
             - Social and environmental factors\n\
             - Clinical complexity and comorbidities\n\
             Prioritize patients by risk level and provide specific interventions."
        }
        AnalysisType::MedicationReview => {
            "Conduct a thorough medication review focusing on:\n\
             - Drug interactions and contraindications\n\
             - Dosing appropriateness for age and kidney function\n\
             - Compliance challenges and simplification opportunities\n\
             - Monitoring requirements and follow-up labs\n\
             Identify medication-related problems and solutions."
        }
        AnalysisType::FollowUpPlanning => {
            "Develop comprehensive follow-up plans focusing on:\n\
             - Timing and urgency of appointments\n\
             - Specialist referrals and care coordination\n\
             - Patient education and self-monitoring\n\
             - Warning signs and when to seek immediate care\n\
             Ensure continuity of care and prevent gaps."
        }
        AnalysisType::General => {
            "Provide a comprehensive analysis covering all aspects of care transition management."
        }
    }
}

/// Build the user message sent alongside the system prompt.
pub fn build_chat_prompt(
    message: &str,
    patients: &[&PatientRecord],
    history: &[ConversationTurn],
    analysis: AnalysisType,
) -> String {
    let mut prompt = String::new();

    prompt.push_str(message);
    prompt.push_str("\n\n");
    prompt.push_str(analysis_instructions(analysis));
    prompt.push_str("\n\nPatient Data Context:\n");
    prompt.push_str(&patient_context(patients));
    prompt.push_str("\n\n");

    let recent = &history[history.len().saturating_sub(MAX_HISTORY_TURNS)..];
    if !recent.is_empty() {
        prompt.push_str("<CONVERSATION_HISTORY>\n");
        for turn in recent {
            let speaker = match turn.role {
                MessageRole::User => "User",
                MessageRole::Assistant => "Assistant",
            };
            prompt.push_str(&format!("{speaker}: {}\n", turn.content));
        }
        prompt.push_str("</CONVERSATION_HISTORY>\n\n");
    }

    prompt.push_str(RESPONSE_FORMAT);
    prompt
}

fn patient_context(patients: &[&PatientRecord]) -> String {
    // PatientRecord serialization cannot fail: string keys, no custom serializers.
    serde_json::to_string_pretty(patients).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Failed to serialize patient context");
        "[]".to_string()
    })
}

/// One-click analysis prompt offered in the chat UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuickPrompt {
    pub key: &'static str,
    pub label: &'static str,
    pub prompt: &'static str,
}

pub fn quick_prompts() -> &'static [QuickPrompt] {
    &[
        QuickPrompt {
            key: "riskAssessment",
            label: "Risk Assessment",
            prompt: "Analyze all patients for readmission risk factors and identify those requiring immediate attention.",
        },
        QuickPrompt {
            key: "medicationReview",
            label: "Medication Review",
            prompt: "Review all patient medications for potential issues, interactions, and compliance risks.",
        },
        QuickPrompt {
            key: "followUpPlanning",
            label: "Follow-up Planning",
            prompt: "Assess follow-up care needs and create prioritized appointment schedules for all patients.",
        },
        QuickPrompt {
            key: "careCoordination",
            label: "Care Coordination",
            prompt: "Identify opportunities for improved care coordination and resource utilization.",
        },
        QuickPrompt {
            key: "complexCases",
            label: "Complex Cases",
            prompt: "Highlight the most complex cases requiring multidisciplinary care team involvement.",
        },
    ]
}
