//! Cohort-level statistics over the discharge roster.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::models::{PatientRecord, RiskTier};

/// Follow-ups within this many days count as urgent.
pub const URGENT_FOLLOW_UP_DAYS: u64 = 7;
/// Medication count at which a regimen counts as complex.
pub const COMPLEX_MEDICATION_COUNT: usize = 4;
const TOP_DIAGNOSES: usize = 3;

static FIRST_NUMBER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+").unwrap());

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosisCount {
    pub diagnosis: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyInsights {
    pub total_patients: usize,
    pub high_risk_patients: usize,
    pub average_age: u32,
    pub common_diagnoses: Vec<DiagnosisCount>,
    pub urgent_follow_ups: usize,
    pub complex_medications: usize,
}

pub fn extract_key_insights(patients: &[PatientRecord]) -> KeyInsights {
    let average_age = if patients.is_empty() {
        0
    } else {
        let total: u64 = patients.iter().map(|p| u64::from(p.age)).sum();
        (total as f64 / patients.len() as f64).round() as u32
    };

    KeyInsights {
        total_patients: patients.len(),
        high_risk_patients: patients
            .iter()
            .filter(|p| p.risk_tier() == RiskTier::High)
            .count(),
        average_age,
        common_diagnoses: top_diagnoses(patients, TOP_DIAGNOSES),
        urgent_follow_ups: patients
            .iter()
            .filter(|p| is_urgent_follow_up(&p.follow_up))
            .count(),
        complex_medications: patients
            .iter()
            .filter(|p| p.medications.len() >= COMPLEX_MEDICATION_COUNT)
            .count(),
    }
}

/// "Cardiology in 5 days" is urgent; a day-based follow-up without any
/// number counts as day 0.
pub fn is_urgent_follow_up(follow_up: &str) -> bool {
    if !follow_up.to_lowercase().contains("day") {
        return false;
    }
    let days = match FIRST_NUMBER.find(follow_up) {
        Some(m) => m.as_str().parse::<u64>().unwrap_or(u64::MAX),
        None => 0,
    };
    days <= URGENT_FOLLOW_UP_DAYS
}

/// Most frequent diagnoses, grouped by first word. Ties keep first-seen order.
fn top_diagnoses(patients: &[PatientRecord], limit: usize) -> Vec<DiagnosisCount> {
    let mut counts: Vec<DiagnosisCount> = Vec::new();
    for patient in patients {
        let key = patient.diagnosis.split(' ').next().unwrap_or_default();
        match counts.iter_mut().find(|c| c.diagnosis == key) {
            Some(entry) => entry.count += 1,
            None => counts.push(DiagnosisCount {
                diagnosis: key.to_string(),
                count: 1,
            }),
        }
    }
    // Stable sort keeps first-seen order among equal counts.
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts.truncate(limit);
    counts
}
