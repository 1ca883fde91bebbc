use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::enums::RiskTier;

/// A transformed discharge summary, immutable once the roster is loaded.
///
/// Field names on the wire follow the discharge JSON (`patient`,
/// `secondary_diagnoses`, ...) so records can be embedded into prompts and
/// API responses unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientRecord {
    pub id: u32,
    #[serde(rename = "patient")]
    pub patient_name: String,
    pub age: u32,
    #[serde(default)]
    pub mrn: String,
    #[serde(default)]
    pub admission_date: String,
    #[serde(default)]
    pub discharge_date: String,
    pub diagnosis: String,
    #[serde(default)]
    pub secondary_diagnoses: Vec<String>,
    #[serde(default)]
    pub medications: Vec<String>,
    #[serde(default)]
    pub follow_up: String,
    #[serde(default)]
    pub lab_results: BTreeMap<String, String>,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub risk_factors: Vec<String>,
    #[serde(default)]
    pub discharge_disposition: String,
}

impl PatientRecord {
    /// Canonical risk tier, derived from the risk-factor count.
    pub fn risk_tier(&self) -> RiskTier {
        RiskTier::from_factor_count(self.risk_factors.len())
    }

    /// Lower-cased text searched by keyword matching: name, diagnosis,
    /// follow-up, notes, disposition, secondary diagnoses, medications and
    /// risk-factor tags joined by single spaces.
    pub fn searchable_text(&self) -> String {
        let mut parts: Vec<&str> = vec![
            self.patient_name.as_str(),
            self.diagnosis.as_str(),
            self.follow_up.as_str(),
            self.notes.as_str(),
            self.discharge_disposition.as_str(),
        ];
        parts.extend(self.secondary_diagnoses.iter().map(String::as_str));
        parts.extend(self.medications.iter().map(String::as_str));
        parts.extend(self.risk_factors.iter().map(String::as_str));
        parts.join(" ").to_lowercase()
    }
}
