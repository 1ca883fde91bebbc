use serde::Serialize;

use super::criteria::{analyze_query, FilterCriteria};
use super::patterns::GENERAL_QUERY_TERMS;
use crate::models::PatientRecord;

/// Patients handed to the model when nothing matches.
pub const FALLBACK_PATIENT_COUNT: usize = 5;

/// Upper bound on patients handed to the model for a narrowing query.
pub const MAX_RELEVANT_PATIENTS: usize = 10;

/// How a relevant subset was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionReason {
    /// Whole-cohort phrase: the roster was returned unfiltered.
    Bypass,
    /// Criteria matched between 1 and the cap.
    Filtered,
    /// Criteria matched nothing; the head of the roster was used.
    Fallback,
    /// Criteria matched more than the cap; the first matches were kept.
    Truncated,
}

#[derive(Debug, Clone)]
pub struct RelevantSelection<'a> {
    pub patients: Vec<&'a PatientRecord>,
    pub reason: SelectionReason,
}

/// Whether a single patient satisfies every constraint in `criteria`.
pub fn matches_criteria(patient: &PatientRecord, criteria: &FilterCriteria) -> bool {
    let text = patient.searchable_text();
    let has_keyword = criteria
        .keywords
        .iter()
        .any(|keyword| text.contains(&keyword.to_lowercase()));
    if !has_keyword {
        return false;
    }

    // Tag-text containment, not the derived tier.
    let has_risk_level = criteria.risk_levels.as_ref().map_or(true, |levels| {
        levels.iter().any(|level| {
            patient
                .risk_factors
                .iter()
                .any(|factor| factor.to_lowercase().contains(level.as_str()))
        })
    });

    let has_diagnosis = criteria.diagnoses.as_ref().map_or(true, |diagnoses| {
        diagnoses.iter().any(|diagnosis| {
            let needle = diagnosis.to_lowercase();
            patient.diagnosis.to_lowercase().contains(&needle)
                || patient
                    .secondary_diagnoses
                    .iter()
                    .any(|secondary| secondary.to_lowercase().contains(&needle))
        })
    });

    let has_medication = criteria.medications.as_ref().map_or(true, |medications| {
        medications.iter().any(|medication| {
            let needle = medication.to_lowercase();
            patient
                .medications
                .iter()
                .any(|med| med.to_lowercase().contains(&needle))
        })
    });

    let has_age = criteria
        .age_range
        .map_or(true, |range| range.contains(patient.age));

    has_risk_level && has_diagnosis && has_medication && has_age
}

/// Patients matching every constraint, in roster order.
pub fn filter_by_criteria<'a>(
    patients: &'a [PatientRecord],
    criteria: &FilterCriteria,
) -> Vec<&'a PatientRecord> {
    patients
        .iter()
        .filter(|patient| matches_criteria(patient, criteria))
        .collect()
}

/// Whether the message asks about the whole cohort.
pub fn is_general_query(message: &str) -> bool {
    let lower = message.to_lowercase();
    GENERAL_QUERY_TERMS.iter().any(|term| lower.contains(term))
}

/// Select the patients relevant to `message` and report how they were chosen.
pub fn select_relevant_patients<'a>(
    all_patients: &'a [PatientRecord],
    message: &str,
) -> RelevantSelection<'a> {
    if is_general_query(message) {
        return RelevantSelection {
            patients: all_patients.iter().collect(),
            reason: SelectionReason::Bypass,
        };
    }

    let criteria = analyze_query(message);
    let mut filtered = filter_by_criteria(all_patients, &criteria);

    if filtered.is_empty() {
        tracing::info!(
            keywords = criteria.keywords.len(),
            "No patients matched query criteria, using first {FALLBACK_PATIENT_COUNT} for analysis"
        );
        return RelevantSelection {
            patients: all_patients.iter().take(FALLBACK_PATIENT_COUNT).collect(),
            reason: SelectionReason::Fallback,
        };
    }

    if filtered.len() > MAX_RELEVANT_PATIENTS {
        tracing::info!(
            matched = filtered.len(),
            "Too many patients matched, limiting to {MAX_RELEVANT_PATIENTS}"
        );
        filtered.truncate(MAX_RELEVANT_PATIENTS);
        return RelevantSelection {
            patients: filtered,
            reason: SelectionReason::Truncated,
        };
    }

    tracing::debug!(matched = filtered.len(), "Patients matched query criteria");
    RelevantSelection {
        patients: filtered,
        reason: SelectionReason::Filtered,
    }
}

/// The subset of the roster handed to the model for `message`.
pub fn get_relevant_patients<'a>(
    all_patients: &'a [PatientRecord],
    message: &str,
) -> Vec<&'a PatientRecord> {
    select_relevant_patients(all_patients, message).patients
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::patient::fixtures::patient;
    use crate::models::RiskTier;
    use crate::pipeline::relevance::patterns::AgeRange;

    fn ids(patients: &[&PatientRecord]) -> Vec<u32> {
        patients.iter().map(|p| p.id).collect()
    }

    fn elderly_roster() -> Vec<PatientRecord> {
        let mut first = patient(1, "Margaret Hill", 70);
        first.risk_factors = vec!["elderly".into(), "polypharmacy".into()];
        let second = patient(2, "Daniel Cruz", 45);
        let mut third = patient(3, "Walter Brooks", 80);
        third.risk_factors = vec!["elderly".into()];
        vec![first, second, third]
    }

    fn roster_of(n: u32) -> Vec<PatientRecord> {
        (1..=n)
            .map(|id| {
                let mut p = patient(id, &format!("Patient {id}"), 50 + id);
                p.notes = "Needs home oxygen".into();
                p
            })
            .collect()
    }

    #[test]
    fn elderly_query_selects_only_older_tagged_patients() {
        let roster = elderly_roster();
        let selected = get_relevant_patients(&roster, "elderly patients");
        assert_eq!(ids(&selected), vec![1, 3]);
    }

    #[test]
    fn overview_returns_entire_roster_in_order() {
        let roster = roster_of(14);
        let selection = select_relevant_patients(&roster, "give me an overview");
        assert_eq!(selection.reason, SelectionReason::Bypass);
        assert_eq!(ids(&selection.patients), (1..=14).collect::<Vec<_>>());
    }

    #[test]
    fn general_terms_are_case_insensitive() {
        assert!(is_general_query("Analyze ALL of them"));
        assert!(is_general_query("What about everyone?"));
        assert!(!is_general_query("elderly patients"));
    }

    #[test]
    fn no_match_falls_back_to_first_five() {
        let roster = roster_of(8);
        let selection = select_relevant_patients(&roster, "dialysis schedule");
        assert_eq!(selection.reason, SelectionReason::Fallback);
        assert_eq!(ids(&selection.patients), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn fallback_on_small_roster_returns_whole_roster() {
        let roster = roster_of(3);
        let selected = get_relevant_patients(&roster, "dialysis schedule");
        assert_eq!(ids(&selected), vec![1, 2, 3]);
    }

    #[test]
    fn stop_word_query_triggers_fallback() {
        let roster = roster_of(7);
        assert!(analyze_query("the and for").keywords.is_empty());
        let selection = select_relevant_patients(&roster, "the and for");
        assert_eq!(selection.reason, SelectionReason::Fallback);
        assert_eq!(selection.patients.len(), FALLBACK_PATIENT_COUNT);
    }

    #[test]
    fn large_match_is_truncated_in_filtered_order() {
        let mut roster = roster_of(15);
        // Patients 2 and 4 do not mention oxygen, so the first ten matches skip them.
        roster[1].notes = "Ambulatory".into();
        roster[3].notes = "Ambulatory".into();

        let selection = select_relevant_patients(&roster, "oxygen");
        assert_eq!(selection.reason, SelectionReason::Truncated);
        assert_eq!(
            ids(&selection.patients),
            vec![1, 3, 5, 6, 7, 8, 9, 10, 11, 12]
        );
    }

    #[test]
    fn exactly_cap_matches_are_kept_whole() {
        let mut roster = roster_of(12);
        roster[10].notes = "Ambulatory".into();
        roster[11].notes = "Ambulatory".into();

        let selection = select_relevant_patients(&roster, "oxygen");
        assert_eq!(selection.reason, SelectionReason::Filtered);
        assert_eq!(selection.patients.len(), MAX_RELEVANT_PATIENTS);
        assert_eq!(ids(&selection.patients), (1..=10).collect::<Vec<u32>>());
    }

    #[test]
    fn moderate_match_is_returned_as_is() {
        let roster = elderly_roster();
        let selection = select_relevant_patients(&roster, "Walter");
        assert_eq!(selection.reason, SelectionReason::Filtered);
        assert_eq!(ids(&selection.patients), vec![3]);
    }

    #[test]
    fn risk_level_matches_tag_text_not_tier() {
        let mut tagged = patient(1, "Ann Lee", 60);
        tagged.risk_factors = vec!["high_readmission_risk".into()];
        let mut untagged = patient(2, "Bo Chan", 60);
        untagged.risk_factors = vec![
            "polypharmacy".into(),
            "emergency_admission".into(),
            "renal_disease".into(),
        ];
        // Canonical tier says the second patient is the high-risk one.
        assert_eq!(untagged.risk_tier(), RiskTier::High);
        assert_eq!(tagged.risk_tier(), RiskTier::Low);

        let criteria = FilterCriteria {
            keywords: vec!["pneumonia".into()],
            risk_levels: Some(vec![RiskTier::High]),
            ..Default::default()
        };
        let roster = vec![tagged, untagged];
        assert_eq!(ids(&filter_by_criteria(&roster, &criteria)), vec![1]);
    }

    #[test]
    fn diagnosis_constraint_checks_secondary_diagnoses() {
        let mut p = patient(1, "Ann Lee", 60);
        p.secondary_diagnoses = vec!["Type 2 Diabetes Mellitus".into()];
        let criteria = FilterCriteria {
            keywords: vec!["ann".into()],
            diagnoses: Some(vec!["DIABETES".into()]),
            ..Default::default()
        };
        assert!(matches_criteria(&p, &criteria));

        let criteria = FilterCriteria {
            diagnoses: Some(vec!["asthma".into()]),
            ..criteria
        };
        assert!(!matches_criteria(&p, &criteria));
    }

    #[test]
    fn medication_constraint_is_case_insensitive() {
        let mut p = patient(1, "Ann Lee", 60);
        p.medications = vec!["Metformin 500mg twice daily".into()];
        let criteria = FilterCriteria {
            keywords: vec!["lee".into()],
            medications: Some(vec!["metformin".into()]),
            ..Default::default()
        };
        assert!(matches_criteria(&p, &criteria));
    }

    #[test]
    fn age_range_is_inclusive() {
        let p = patient(1, "Ann Lee", 65);
        let criteria = FilterCriteria {
            keywords: vec!["ann".into()],
            age_range: Some(AgeRange {
                min: Some(65),
                max: Some(65),
            }),
            ..Default::default()
        };
        assert!(matches_criteria(&p, &criteria));
    }

    #[test]
    fn empty_keywords_match_nothing() {
        let p = patient(1, "Ann Lee", 65);
        assert!(!matches_criteria(&p, &FilterCriteria::default()));
    }

    #[test]
    fn filtering_leaves_roster_untouched() {
        let roster = elderly_roster();
        let before = roster.clone();
        let _ = get_relevant_patients(&roster, "elderly patients");
        assert_eq!(roster, before);
    }
}
