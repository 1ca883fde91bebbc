use serde::Serialize;

use super::patterns::{AgeRange, QueryPattern, QUERY_PATTERNS, STOP_WORDS};
use crate::models::RiskTier;

/// Filter derived from a free-text query.
///
/// `None` on an optional field means "no constraint".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterCriteria {
    pub keywords: Vec<String>,
    pub risk_levels: Option<Vec<RiskTier>>,
    pub diagnoses: Option<Vec<String>>,
    pub medications: Option<Vec<String>>,
    pub age_range: Option<AgeRange>,
}

impl FilterCriteria {
    fn add_keyword(&mut self, keyword: &str) {
        let keyword = keyword.to_lowercase();
        if !self.keywords.contains(&keyword) {
            self.keywords.push(keyword);
        }
    }

    /// Merge a matched pattern: keywords accumulate, optional fields the
    /// pattern sets replace whatever an earlier pattern put there.
    fn apply(&mut self, pattern: &QueryPattern) {
        for keyword in pattern.keywords {
            self.add_keyword(keyword);
        }
        if let Some(levels) = pattern.risk_levels {
            self.risk_levels = Some(levels.to_vec());
        }
        if let Some(diagnoses) = pattern.diagnoses {
            self.diagnoses = Some(diagnoses.iter().map(|d| d.to_string()).collect());
        }
        if let Some(medications) = pattern.medications {
            self.medications = Some(medications.iter().map(|m| m.to_string()).collect());
        }
        if let Some(range) = pattern.age_range {
            self.age_range = Some(range);
        }
    }
}

/// Turn a chat message into filter criteria using the pattern table plus
/// the message's own content words.
pub fn analyze_query(message: &str) -> FilterCriteria {
    let lower = message.to_lowercase();
    let mut criteria = FilterCriteria::default();

    for pattern in QUERY_PATTERNS.iter().filter(|p| lower.contains(p.phrase)) {
        criteria.apply(pattern);
    }

    for token in lower.split_whitespace() {
        if token.chars().count() > 3 && !STOP_WORDS.contains(&token) {
            criteria.add_keyword(token);
        }
    }

    criteria
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elderly_pattern_sets_age_floor() {
        let criteria = analyze_query("Elderly patients");
        assert_eq!(
            criteria.age_range,
            Some(AgeRange {
                min: Some(65),
                max: None
            })
        );
        assert!(criteria.keywords.contains(&"senior".to_string()));
        assert!(criteria.keywords.contains(&"elderly".to_string()));
        // "patients" is a stop word
        assert!(!criteria.keywords.contains(&"patients".to_string()));
    }

    #[test]
    fn unmatched_query_keeps_content_words() {
        let criteria = analyze_query("Who needs wound care at home?");
        assert_eq!(criteria.risk_levels, None);
        assert_eq!(criteria.diagnoses, None);
        assert_eq!(criteria.age_range, None);
        assert_eq!(
            criteria.keywords,
            vec!["needs", "wound", "care", "home?"]
        );
    }

    #[test]
    fn stop_words_and_short_tokens_yield_no_keywords() {
        let criteria = analyze_query("the and for");
        assert!(criteria.keywords.is_empty());
        let criteria = analyze_query("show that patient with the bp");
        assert!(criteria.keywords.is_empty());
    }

    #[test]
    fn token_length_counts_characters_not_bytes() {
        // "ééé" is six bytes but three characters; "café" is four characters.
        let criteria = analyze_query("ééé café");
        assert_eq!(criteria.keywords, vec!["café".to_string()]);
    }

    #[test]
    fn later_pattern_overwrites_risk_levels() {
        // "complex discharge needs" sets [high]; "readmission risk" comes later
        // in the table and replaces it.
        let criteria = analyze_query("complex discharge needs and readmission risk");
        assert_eq!(
            criteria.risk_levels,
            Some(vec![RiskTier::High, RiskTier::Medium])
        );

        // Message order is irrelevant; table order decides.
        let criteria = analyze_query("immediate attention for readmission risk");
        assert_eq!(criteria.risk_levels, Some(vec![RiskTier::High]));
    }

    #[test]
    fn cardiology_sets_diagnoses() {
        let criteria = analyze_query("cardiology follow-ups");
        let diagnoses = criteria.diagnoses.unwrap();
        assert!(diagnoses.contains(&"CHF".to_string()));
        assert!(diagnoses.contains(&"arrhythmia".to_string()));
        assert!(criteria.keywords.contains(&"heart".to_string()));
    }

    #[test]
    fn overlapping_patterns_do_not_duplicate_keywords() {
        let criteria = analyze_query("medication compliance");
        let count = criteria
            .keywords
            .iter()
            .filter(|k| k.as_str() == "medication")
            .count();
        assert_eq!(count, 1);
        assert!(criteria.keywords.contains(&"adherence".to_string()));
        assert!(criteria.keywords.contains(&"pharmacy".to_string()));
    }
}
