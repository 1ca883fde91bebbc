//! Chat pipeline: relevance filtering, prompt construction, LLM generation
//! and per-patient grouping of the returned insights.

pub mod chat;
pub mod grouping;
pub mod llm;
pub mod prompt;
pub mod relevance;

pub use chat::{ChatError, ChatOutcome, ChatPipeline, ChatRequest, MAX_MESSAGE_CHARS};
pub use grouping::group_by_patient;
pub use relevance::get_relevant_patients;
