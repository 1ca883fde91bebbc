use serde::Deserialize;

/// Raw discharge export, one file per patient.
///
/// Only `patient`, `encounter` and `case_summary` are required; every
/// collection is optional and treated as empty when absent.
#[derive(Debug, Clone, Deserialize)]
pub struct RawPatientData {
    pub patient: RawDemographics,
    pub encounter: RawEncounter,
    pub case_summary: RawCaseSummary,
    #[serde(default)]
    pub medications: Option<Vec<RawMedication>>,
    #[serde(default)]
    pub follow_ups: Option<Vec<RawFollowUp>>,
    #[serde(default)]
    pub lab_tests: Option<Vec<RawLabTest>>,
    #[serde(default)]
    pub lace_score: Option<RawLaceScore>,
    #[serde(default)]
    pub discharge_diagnoses: Option<Vec<RawDischargeDiagnosis>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawDemographics {
    pub age: u32,
    #[serde(default)]
    pub sex: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub date_of_birth: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawEncounter {
    #[serde(default)]
    pub mrn: String,
    #[serde(default)]
    pub admission_date: String,
    #[serde(default)]
    pub discharge_date: String,
    #[serde(default)]
    pub encounter_type: String,
    #[serde(default)]
    pub reason_for_visit: String,
    #[serde(default)]
    pub discharge_summary: String,
    #[serde(default)]
    pub discharged_to: String,
    #[serde(default)]
    pub facility_name: String,
    #[serde(default)]
    pub provider_name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawCaseSummary {
    #[serde(default)]
    pub disposition: String,
    #[serde(default)]
    pub demographics: String,
    #[serde(default)]
    pub presentation: String,
    #[serde(default)]
    pub primary_diagnoses: String,
    #[serde(default)]
    pub composite_summary: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawMedication {
    #[serde(default)]
    pub generic_name: String,
    #[serde(default)]
    pub brand_name: String,
    #[serde(default)]
    pub dosage: String,
    #[serde(default)]
    pub frequency: String,
    #[serde(default)]
    pub route: String,
    #[serde(default)]
    pub reason: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawFollowUp {
    #[serde(default)]
    pub follow_up_item: String,
    #[serde(default)]
    pub timeframe: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub additional_info: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawLabTest {
    #[serde(default)]
    pub test_name: String,
    #[serde(default)]
    pub result: Option<String>,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub date_completed: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawLaceScore {
    #[serde(default)]
    pub total_score: u32,
    #[serde(default)]
    pub risk_level: String,
    #[serde(default)]
    pub explanation: String,
    #[serde(default)]
    pub charlson_comorbidity_index: Option<RawCharlsonIndex>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawCharlsonIndex {
    #[serde(default)]
    pub comorbidities: Vec<RawComorbidity>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawComorbidity {
    #[serde(default)]
    pub cci_mapping: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub cci_points: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawDischargeDiagnosis {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icd_10_code: String,
}
