//! `GET /api/insights/summary`: cohort statistics over the whole roster.

use axum::extract::State;
use axum::Json;

use crate::api::types::{ApiContext, DataEnvelope};
use crate::cohort::{extract_key_insights, KeyInsights};

pub async fn summary(State(ctx): State<ApiContext>) -> Json<DataEnvelope<KeyInsights>> {
    Json(DataEnvelope::now(extract_key_insights(&ctx.roster)))
}
