use serde::Deserialize;

use crate::models::{PatientRecord, RiskTier};

/// Discharge list filters, as accepted on `GET /api/discharges`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DischargeFilters {
    pub patient_id: Option<u32>,
    pub diagnosis: Option<String>,
    pub risk_level: Option<String>,
}

impl DischargeFilters {
    /// Canonical tier requested, if the level names one.
    fn tier(&self) -> Option<RiskTier> {
        self.risk_level
            .as_deref()
            .and_then(|level| level.trim().to_lowercase().parse().ok())
    }

    pub fn matches(&self, patient: &PatientRecord) -> bool {
        if let Some(id) = self.patient_id {
            if patient.id != id {
                return false;
            }
        }

        if let Some(diagnosis) = self.diagnosis.as_deref().filter(|d| !d.trim().is_empty()) {
            let needle = diagnosis.to_lowercase();
            let hit = patient.diagnosis.to_lowercase().contains(&needle)
                || patient
                    .secondary_diagnoses
                    .iter()
                    .any(|d| d.to_lowercase().contains(&needle));
            if !hit {
                return false;
            }
        }

        // Unknown level strings place no constraint.
        self.tier().map_or(true, |tier| patient.risk_tier() == tier)
    }

    pub fn apply<'a>(&self, patients: &'a [PatientRecord]) -> Vec<&'a PatientRecord> {
        patients.iter().filter(|p| self.matches(p)).collect()
    }
}
