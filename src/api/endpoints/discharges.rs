//! Discharge roster endpoints.
//!
//! - `GET /api/discharges`: filtered list (`patientId`, `diagnosis`, `riskLevel`)
//! - `GET /api/discharges/:id`: a single record

use axum::extract::rejection::{PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Serialize;

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, DataEnvelope};
use crate::models::PatientRecord;
use crate::roster::DischargeFilters;

#[derive(Serialize)]
pub struct DischargeListResponse {
    pub data: Vec<PatientRecord>,
    pub total: usize,
    pub timestamp: String,
}

/// `GET /api/discharges`
pub async fn list(
    State(ctx): State<ApiContext>,
    filters: Result<Query<DischargeFilters>, QueryRejection>,
) -> Result<Json<DischargeListResponse>, ApiError> {
    let Query(filters) = filters?;
    let data: Vec<PatientRecord> = filters.apply(&ctx.roster).into_iter().cloned().collect();
    tracing::debug!(matched = data.len(), "Discharge list served");

    Ok(Json(DischargeListResponse {
        total: data.len(),
        data,
        timestamp: chrono::Utc::now().to_rfc3339(),
    }))
}

/// `GET /api/discharges/:id`
pub async fn detail(
    State(ctx): State<ApiContext>,
    id: Result<Path<u32>, PathRejection>,
) -> Result<Json<DataEnvelope<PatientRecord>>, ApiError> {
    let Path(id) = id?;
    let patient = ctx
        .roster
        .iter()
        .find(|p| p.id == id)
        .cloned()
        .ok_or_else(|| ApiError::NotFound(format!("Patient {id} not found")))?;
    Ok(Json(DataEnvelope::now(patient)))
}
