use serde::{Deserialize, Serialize};

use super::{http_client, LlmCompletion, LlmError, LlmGenerate, TokenUsage};

pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";

/// Keeps the key out of the request URL.
const API_KEY_HEADER: &str = "x-goog-api-key";

const JSON_ONLY_SUFFIX: &str =
    "IMPORTANT: Respond ONLY with valid JSON. Do not include any other text or formatting.";

/// Google Gemini `generateContent` client.
///
/// Gemini has no separate system role here: the system prompt is prepended
/// to the user prompt.
pub struct GeminiClient {
    base_url: String,
    api_key: String,
    model: String,
    client: reqwest::blocking::Client,
    timeout_secs: u64,
}

impl GeminiClient {
    pub fn new(
        base_url: &str,
        api_key: &str,
        model: &str,
        timeout_secs: u64,
    ) -> Result<Self, LlmError> {
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
            client: http_client(timeout_secs)?,
            timeout_secs,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

fn full_prompt(system: &str, prompt: &str) -> String {
    format!("{system}\n\n{prompt}\n\n{JSON_ONLY_SUFFIX}")
}

#[derive(Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    prompt_token_count: u32,
    #[serde(default)]
    candidates_token_count: u32,
    #[serde(default)]
    total_token_count: u32,
}

impl From<UsageMetadata> for TokenUsage {
    fn from(meta: UsageMetadata) -> Self {
        TokenUsage {
            prompt_tokens: meta.prompt_token_count,
            completion_tokens: meta.candidates_token_count,
            total_tokens: meta.total_token_count,
        }
    }
}

impl GenerateContentResponse {
    fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|c| {
                c.parts
                    .iter()
                    .map(|p| p.text.as_str())
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default()
    }
}

impl LlmGenerate for GeminiClient {
    fn name(&self) -> &str {
        "gemini"
    }

    fn generate(&self, system: &str, prompt: &str) -> Result<LlmCompletion, LlmError> {
        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);
        let body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: full_prompt(system, prompt),
                }],
            }],
        };

        let response = self
            .client
            .post(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .json(&body)
            .send()
            .map_err(|e| LlmError::from_transport(&self.base_url, self.timeout_secs, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(LlmError::from_status(self.name(), status.as_u16(), body));
        }

        let parsed: GenerateContentResponse = response.json().map_err(LlmError::from_decode)?;

        let text = parsed.text();
        if text.trim().is_empty() {
            return Err(LlmError::EmptyResponse(self.name().to_string()));
        }

        Ok(LlmCompletion {
            text,
            usage: parsed.usage_metadata.map(TokenUsage::from),
        })
    }
}
