//! Hosted LLM providers behind a single `LlmGenerate` seam.
//!
//! Clients are blocking; callers on the async runtime go through
//! `spawn_blocking`.

pub mod fallback;
pub mod gemini;
pub mod openai;
pub mod parser;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use fallback::{static_fallback_payload, ChainResponse, FallbackChain};
pub use gemini::GeminiClient;
pub use openai::OpenAiClient;
pub use parser::{extract_json_block, parse_reply, validate_insight_response};

#[derive(Error, Debug)]
pub enum LlmError {
    #[error("{provider} quota or rate limit exceeded")]
    QuotaExceeded { provider: String },

    #[error("{provider} rejected the configured API key")]
    Unauthorized { provider: String },

    #[error("Connection to {0} failed")]
    Connection(String),

    #[error("Request timed out after {0}s")]
    Timeout(u64),

    #[error("Provider error ({status}): {body}")]
    Provider { status: u16, body: String },

    #[error("Response parsing error: {0}")]
    ResponseParsing(String),

    #[error("Empty response from {0}")]
    EmptyResponse(String),

    #[error("HTTP client error: {0}")]
    HttpClient(String),
}

impl LlmError {
    /// Failures worth handing to the next provider in a chain.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            LlmError::QuotaExceeded { .. } | LlmError::Connection(_) | LlmError::Timeout(_)
        )
    }

    /// Map a non-success HTTP status (and its body) to an error.
    pub(crate) fn from_status(provider: &str, status: u16, body: String) -> Self {
        let lower = body.to_lowercase();
        if status == 429 {
            return LlmError::QuotaExceeded {
                provider: provider.to_string(),
            };
        }
        if status == 401 || status == 403 {
            return LlmError::Unauthorized {
                provider: provider.to_string(),
            };
        }
        if lower.contains("quota") || lower.contains("rate limit") {
            return LlmError::QuotaExceeded {
                provider: provider.to_string(),
            };
        }
        LlmError::Provider { status, body }
    }

    /// Map a failed send. Dropped connections count as `Connection` so the
    /// chain can move on; the request URL never reaches the message.
    pub(crate) fn from_transport(endpoint: &str, timeout_secs: u64, e: reqwest::Error) -> Self {
        if e.is_timeout() {
            LlmError::Timeout(timeout_secs)
        } else if e.is_connect() || e.is_request() {
            LlmError::Connection(endpoint.to_string())
        } else {
            LlmError::HttpClient(redacted(e))
        }
    }

    pub(crate) fn from_decode(e: reqwest::Error) -> Self {
        LlmError::ResponseParsing(redacted(e))
    }
}

/// Error text without the request URL, which may carry credentials.
fn redacted(e: reqwest::Error) -> String {
    e.without_url().to_string()
}

/// Token accounting reported by the provider, when it reports any.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    #[serde(default)]
    pub prompt_tokens: u32,
    #[serde(default)]
    pub completion_tokens: u32,
    #[serde(default)]
    pub total_tokens: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LlmCompletion {
    pub text: String,
    pub usage: Option<TokenUsage>,
}

/// Text generation seam: one system prompt, one user prompt, one reply.
pub trait LlmGenerate: Send + Sync {
    fn name(&self) -> &str;

    fn generate(&self, system: &str, prompt: &str) -> Result<LlmCompletion, LlmError>;
}

impl<T: LlmGenerate + ?Sized> LlmGenerate for std::sync::Arc<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn generate(&self, system: &str, prompt: &str) -> Result<LlmCompletion, LlmError> {
        (**self).generate(system, prompt)
    }
}

pub(crate) fn http_client(timeout_secs: u64) -> Result<reqwest::blocking::Client, LlmError> {
    reqwest::blocking::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| LlmError::HttpClient(e.to_string()))
}

/// Scripted generator: replays queued results in order, then repeats the
/// last one. Records every prompt it receives.
pub struct MockLlmClient {
    name: String,
    script: std::sync::Mutex<Vec<Result<String, LlmError>>>,
    prompts: std::sync::Mutex<Vec<(String, String)>>,
}

impl MockLlmClient {
    pub fn new(name: &str, response: &str) -> Self {
        Self::scripted(name, vec![Ok(response.to_string())])
    }

    pub fn failing(name: &str, error: LlmError) -> Self {
        Self::scripted(name, vec![Err(error)])
    }

    pub fn scripted(name: &str, script: Vec<Result<String, LlmError>>) -> Self {
        Self {
            name: name.to_string(),
            script: std::sync::Mutex::new(script),
            prompts: std::sync::Mutex::new(Vec::new()),
        }
    }

    /// `(system, prompt)` pairs seen so far.
    pub fn prompts(&self) -> Vec<(String, String)> {
        self.prompts.lock().map(|p| p.clone()).unwrap_or_default()
    }

    fn next(&self) -> Result<String, LlmError> {
        let mut script = self
            .script
            .lock()
            .map_err(|_| LlmError::HttpClient("mock lock poisoned".into()))?;
        match script.len() {
            0 => Err(LlmError::EmptyResponse(self.name.clone())),
            1 => clone_result(&script[0]),
            _ => script.remove(0),
        }
    }
}

fn clone_result(result: &Result<String, LlmError>) -> Result<String, LlmError> {
    match result {
        Ok(text) => Ok(text.clone()),
        Err(LlmError::QuotaExceeded { provider }) => Err(LlmError::QuotaExceeded {
            provider: provider.clone(),
        }),
        Err(LlmError::Unauthorized { provider }) => Err(LlmError::Unauthorized {
            provider: provider.clone(),
        }),
        Err(LlmError::Connection(s)) => Err(LlmError::Connection(s.clone())),
        Err(LlmError::Timeout(s)) => Err(LlmError::Timeout(*s)),
        Err(LlmError::Provider { status, body }) => Err(LlmError::Provider {
            status: *status,
            body: body.clone(),
        }),
        Err(LlmError::ResponseParsing(s)) => Err(LlmError::ResponseParsing(s.clone())),
        Err(LlmError::EmptyResponse(s)) => Err(LlmError::EmptyResponse(s.clone())),
        Err(LlmError::HttpClient(s)) => Err(LlmError::HttpClient(s.clone())),
    }
}

impl LlmGenerate for MockLlmClient {
    fn name(&self) -> &str {
        &self.name
    }

    fn generate(&self, system: &str, prompt: &str) -> Result<LlmCompletion, LlmError> {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push((system.to_string(), prompt.to_string()));
        }
        let text = self.next()?;
        Ok(LlmCompletion { text, usage: None })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_429_is_quota() {
        let err = LlmError::from_status("openai", 429, String::new());
        assert!(matches!(err, LlmError::QuotaExceeded { .. }));
        assert!(err.is_recoverable());
    }

    #[test]
    fn quota_in_body_is_quota() {
        let err = LlmError::from_status(
            "gemini",
            400,
            r#"{"error":{"message":"You exceeded your current quota"}}"#.into(),
        );
        assert!(matches!(err, LlmError::QuotaExceeded { .. }));

        let err = LlmError::from_status("gemini", 500, "Rate limit reached".into());
        assert!(matches!(err, LlmError::QuotaExceeded { .. }));
    }

    #[test]
    fn auth_failures_are_not_recoverable() {
        for status in [401, 403] {
            let err = LlmError::from_status("openai", status, "invalid api key".into());
            assert!(matches!(err, LlmError::Unauthorized { .. }));
            assert!(!err.is_recoverable());
        }
    }

    #[test]
    fn other_statuses_keep_body() {
        let err = LlmError::from_status("openai", 500, "boom".into());
        match err {
            LlmError::Provider { status, body } => {
                assert_eq!(status, 500);
                assert_eq!(body, "boom");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn mock_replays_script_then_repeats_last() {
        let mock = MockLlmClient::scripted(
            "mock",
            vec![Err(LlmError::Timeout(5)), Ok("first".into()), Ok("last".into())],
        );
        assert!(matches!(mock.generate("s", "p"), Err(LlmError::Timeout(5))));
        assert_eq!(mock.generate("s", "p").unwrap().text, "first");
        assert_eq!(mock.generate("s", "p").unwrap().text, "last");
        assert_eq!(mock.generate("s", "p").unwrap().text, "last");
        assert_eq!(mock.prompts().len(), 4);
    }
}
