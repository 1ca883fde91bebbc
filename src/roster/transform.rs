use std::collections::BTreeMap;

use super::raw::{RawLaceScore, RawMedication, RawPatientData};
use crate::models::PatientRecord;

const NOT_SPECIFIED: &str = "Not specified";
const NO_FOLLOW_UP: &str = "No specific follow-up documented";

/// Flatten a raw discharge export into the record the assistant reasons over.
pub fn transform_patient_data(raw: &RawPatientData, id: u32) -> PatientRecord {
    let medications = raw.medications.as_deref().unwrap_or_default();
    let lace = raw.lace_score.clone().unwrap_or_default();

    PatientRecord {
        id,
        patient_name: format!("{} {}", raw.patient.first_name, raw.patient.last_name),
        age: raw.patient.age,
        mrn: raw.encounter.mrn.clone(),
        admission_date: raw.encounter.admission_date.clone(),
        discharge_date: raw.encounter.discharge_date.clone(),
        diagnosis: non_empty_or(&raw.case_summary.primary_diagnoses, NOT_SPECIFIED),
        secondary_diagnoses: raw
            .discharge_diagnoses
            .as_deref()
            .unwrap_or_default()
            .iter()
            .map(|d| d.description.clone())
            .collect(),
        medications: medications.iter().map(describe_medication).collect(),
        follow_up: describe_follow_up(raw),
        lab_results: collect_lab_results(raw, &lace),
        notes: if raw.encounter.discharge_summary.is_empty() {
            raw.case_summary.composite_summary.clone()
        } else {
            raw.encounter.discharge_summary.clone()
        },
        risk_factors: derive_risk_factors(raw, &lace),
        discharge_disposition: non_empty_or(&raw.encounter.discharged_to, NOT_SPECIFIED),
    }
}

/// Risk-factor tags, in a fixed order: age, LACE tier, polypharmacy,
/// emergency admission, then one tag per Charlson comorbidity.
pub fn derive_risk_factors(raw: &RawPatientData, lace: &RawLaceScore) -> Vec<String> {
    let mut factors = Vec::new();

    if raw.patient.age >= 65 {
        factors.push("elderly".to_string());
    }
    if lace.risk_level.eq_ignore_ascii_case("high") {
        factors.push("high_readmission_risk".to_string());
    }
    if lace.risk_level.eq_ignore_ascii_case("moderate") {
        factors.push("moderate_readmission_risk".to_string());
    }
    if raw.medications.as_ref().map_or(0, Vec::len) >= 5 {
        factors.push("polypharmacy".to_string());
    }
    if raw.encounter.encounter_type == "emergency" {
        factors.push("emergency_admission".to_string());
    }

    let comorbidities = lace
        .charlson_comorbidity_index
        .as_ref()
        .map(|cci| cci.comorbidities.as_slice())
        .unwrap_or_default();
    for comorbidity in comorbidities {
        if !comorbidity.cci_mapping.is_empty() {
            factors.push(
                comorbidity
                    .cci_mapping
                    .to_lowercase()
                    .split_whitespace()
                    .collect::<Vec<_>>()
                    .join("_"),
            );
        }
    }

    factors
}

fn describe_medication(med: &RawMedication) -> String {
    let name = if med.generic_name.is_empty() {
        &med.brand_name
    } else {
        &med.generic_name
    };
    let mut text = name.clone();
    if !med.dosage.is_empty() {
        text.push(' ');
        text.push_str(&med.dosage);
    }
    if !med.frequency.is_empty() {
        text.push(' ');
        text.push_str(&med.frequency.to_lowercase());
    }
    text
}

fn describe_follow_up(raw: &RawPatientData) -> String {
    let items: Vec<String> = raw
        .follow_ups
        .as_deref()
        .unwrap_or_default()
        .iter()
        .map(|fu| {
            if fu.timeframe.is_empty() {
                fu.follow_up_item.clone()
            } else {
                format!("{} {}", fu.follow_up_item, fu.timeframe)
            }
        })
        .collect();

    if items.is_empty() {
        NO_FOLLOW_UP.to_string()
    } else {
        items.join(", ")
    }
}

fn collect_lab_results(raw: &RawPatientData, lace: &RawLaceScore) -> BTreeMap<String, String> {
    let mut results = BTreeMap::new();
    for test in raw.lab_tests.as_deref().unwrap_or_default() {
        if !test.test_name.trim().is_empty() {
            let result = test
                .result
                .as_deref()
                .filter(|r| !r.is_empty())
                .unwrap_or("Pending");
            results.insert(test.test_name.clone(), result.to_string());
        }
    }
    if lace.total_score > 0 {
        results.insert(
            "LACE Score".to_string(),
            format!("{} ({})", lace.total_score, lace.risk_level),
        );
    }
    results
}

fn non_empty_or(value: &str, default: &str) -> String {
    if value.is_empty() {
        default.to_string()
    } else {
        value.to_string()
    }
}
