//! Shared types for the HTTP API layer.

use std::sync::Arc;

use serde::Serialize;

use crate::models::PatientRecord;
use crate::pipeline::llm::FallbackChain;

/// Shared context for all API routes.
///
/// The roster is loaded once at startup and never mutated.
#[derive(Clone)]
pub struct ApiContext {
    pub roster: Arc<Vec<PatientRecord>>,
    pub chain: Arc<FallbackChain>,
}

impl ApiContext {
    pub fn new(roster: Vec<PatientRecord>, chain: FallbackChain) -> Self {
        Self {
            roster: Arc::new(roster),
            chain: Arc::new(chain),
        }
    }
}

/// `{data, timestamp}` envelope shared by the data endpoints.
#[derive(Debug, Serialize)]
pub struct DataEnvelope<T: Serialize> {
    pub data: T,
    pub timestamp: String,
}

impl<T: Serialize> DataEnvelope<T> {
    pub fn now(data: T) -> Self {
        Self {
            data,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
