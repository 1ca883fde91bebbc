use serde::Serialize;

use crate::models::RiskTier;

/// Inclusive age bounds; an absent bound is unconstrained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct AgeRange {
    pub min: Option<u32>,
    pub max: Option<u32>,
}

impl AgeRange {
    pub fn contains(&self, age: u32) -> bool {
        self.min.map_or(true, |min| age >= min) && self.max.map_or(true, |max| age <= max)
    }
}

/// A named query phrase and the criteria fragment it contributes.
///
/// When a phrase matches, its keywords are appended and every optional
/// field it sets overwrites the criteria built so far. Table order is
/// therefore significant: the last matching pattern that sets a field wins.
#[derive(Debug, Clone, Copy)]
pub struct QueryPattern {
    pub phrase: &'static str,
    pub keywords: &'static [&'static str],
    pub risk_levels: Option<&'static [RiskTier]>,
    pub diagnoses: Option<&'static [&'static str]>,
    pub medications: Option<&'static [&'static str]>,
    pub age_range: Option<AgeRange>,
}

const BLANK: QueryPattern = QueryPattern {
    phrase: "",
    keywords: &[],
    risk_levels: None,
    diagnoses: None,
    medications: None,
    age_range: None,
};

pub const QUERY_PATTERNS: &[QueryPattern] = &[
    QueryPattern {
        phrase: "complex discharge needs",
        keywords: &["complex", "discharge", "needs", "complicated"],
        risk_levels: Some(&[RiskTier::High]),
        ..BLANK
    },
    QueryPattern {
        phrase: "readmission risk",
        keywords: &["readmission", "risk", "readmit"],
        risk_levels: Some(&[RiskTier::High, RiskTier::Medium]),
        ..BLANK
    },
    QueryPattern {
        phrase: "medication",
        keywords: &["medication", "drug", "prescription", "pharmacy"],
        ..BLANK
    },
    QueryPattern {
        phrase: "follow up",
        keywords: &["follow up", "follow-up", "followup", "appointment"],
        ..BLANK
    },
    QueryPattern {
        phrase: "elderly",
        keywords: &["elderly", "senior", "aged", "older"],
        age_range: Some(AgeRange {
            min: Some(65),
            max: None,
        }),
        ..BLANK
    },
    QueryPattern {
        phrase: "cardiology",
        keywords: &["cardiology", "cardiac", "heart", "cardiovascular"],
        diagnoses: Some(&["heart", "cardiac", "cardiovascular", "CHF", "MI", "arrhythmia"]),
        ..BLANK
    },
    QueryPattern {
        phrase: "diabetes",
        keywords: &["diabetes", "diabetic", "glucose", "insulin"],
        diagnoses: Some(&["diabetes", "diabetic"]),
        ..BLANK
    },
    QueryPattern {
        phrase: "immediate attention",
        keywords: &["immediate", "urgent", "emergency", "critical"],
        risk_levels: Some(&[RiskTier::High]),
        ..BLANK
    },
    QueryPattern {
        phrase: "social determinants",
        keywords: &["social", "determinants", "housing", "transportation", "insurance"],
        ..BLANK
    },
    QueryPattern {
        phrase: "medication compliance",
        keywords: &["compliance", "adherence", "medication", "drug"],
        ..BLANK
    },
];

/// Phrases that ask about the whole cohort and bypass filtering.
pub const GENERAL_QUERY_TERMS: &[&str] =
    &["all patients", "everyone", "overview", "summary", "analyze all"];

/// Tokens never promoted to keywords.
pub const STOP_WORDS: &[&str] = &[
    "the", "and", "with", "for", "that", "this", "have", "been", "will", "should", "need",
    "show", "patients", "patient",
];
