//! Consolidates the model's insight cards into one card per patient.

use crate::models::{GroupedInsight, InsightRecord, InsightType};

/// Group insights by exact `patient` string.
///
/// Buckets keep first-seen order and members keep arrival order, so the
/// same input always renders the same way.
pub fn group_by_patient(insights: &[InsightRecord]) -> Vec<GroupedInsight> {
    let mut buckets: Vec<(&str, Vec<&InsightRecord>)> = Vec::new();

    for insight in insights {
        match buckets
            .iter_mut()
            .find(|(patient, _)| *patient == insight.patient)
        {
            Some((_, members)) => members.push(insight),
            None => buckets.push((insight.patient.as_str(), vec![insight])),
        }
    }

    buckets
        .into_iter()
        .map(|(patient, members)| consolidate(patient, &members))
        .collect()
}

fn consolidate(patient: &str, members: &[&InsightRecord]) -> GroupedInsight {
    if let [only] = members {
        return GroupedInsight {
            patient: patient.to_string(),
            insights: vec![(*only).clone()],
            priority: only.priority,
            insight_type: only.insight_type,
            confidence: only.confidence,
            timeframe: only.timeframe,
            title: only.title.clone(),
            recommendation: only.recommendation.clone(),
            reasoning: only.reasoning.clone(),
        };
    }

    let recommendation = members
        .iter()
        .map(|i| format!("• {}", i.recommendation))
        .collect::<Vec<_>>()
        .join("\n");
    let reasoning = members
        .iter()
        .map(|i| format!("{}: {}", i.title, i.reasoning))
        .collect::<Vec<_>>()
        .join("\n\n");

    GroupedInsight {
        patient: patient.to_string(),
        insights: members.iter().map(|i| (*i).clone()).collect(),
        priority: members.iter().map(|i| i.priority).max().unwrap_or_default(),
        insight_type: InsightType::General,
        confidence: members.iter().map(|i| i.confidence).max().unwrap_or_default(),
        timeframe: members.iter().map(|i| i.timeframe).max().unwrap_or_default(),
        title: format!("{} Recommendations for {}", members.len(), patient),
        recommendation,
        reasoning,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Confidence, Priority, Timeframe};

    fn insight(patient: &str, title: &str, priority: Priority, timeframe: Timeframe) -> InsightRecord {
        InsightRecord {
            insight_type: InsightType::RiskAlert,
            title: title.to_string(),
            patient: patient.to_string(),
            priority,
            recommendation: format!("Do {title}"),
            reasoning: format!("Because {title}"),
            confidence: Confidence::Medium,
            timeframe,
        }
    }

    #[test]
    fn groups_by_patient_with_urgency_precedence() {
        let insights = vec![
            insight("A", "Labs", Priority::Medium, Timeframe::WithinWeek),
            insight("A", "Cardiology", Priority::High, Timeframe::Immediate),
            insight("B", "Diet", Priority::Low, Timeframe::Routine),
        ];

        let grouped = group_by_patient(&insights);
        assert_eq!(grouped.len(), 2);

        let a = &grouped[0];
        assert_eq!(a.patient, "A");
        assert_eq!(a.insights.len(), 2);
        assert_eq!(a.priority, Priority::High);
        assert_eq!(a.timeframe, Timeframe::Immediate);
        assert_eq!(a.title, "2 Recommendations for A");
        assert_eq!(a.insight_type, InsightType::General);

        let b = &grouped[1];
        assert_eq!(b.patient, "B");
        assert_eq!(b.insights, vec![insights[2].clone()]);
        assert_eq!(b.title, "Diet");
        assert_eq!(b.insight_type, InsightType::RiskAlert);
        assert_eq!(b.priority, Priority::Low);
    }

    #[test]
    fn low_and_high_priority_yield_high() {
        let insights = vec![
            insight("A", "One", Priority::Low, Timeframe::Routine),
            insight("A", "Two", Priority::High, Timeframe::Immediate),
        ];
        let grouped = group_by_patient(&insights);
        assert_eq!(grouped[0].priority, Priority::High);
        assert_eq!(grouped[0].timeframe, Timeframe::Immediate);
    }

    #[test]
    fn confidence_takes_highest_member() {
        let mut first = insight("A", "One", Priority::Low, Timeframe::Routine);
        first.confidence = Confidence::Low;
        let mut second = insight("A", "Two", Priority::Low, Timeframe::Within24h);
        second.confidence = Confidence::High;
        let grouped = group_by_patient(&[first, second]);
        assert_eq!(grouped[0].confidence, Confidence::High);
        assert_eq!(grouped[0].timeframe, Timeframe::Within24h);
    }

    #[test]
    fn single_insight_passes_through() {
        let source = insight("Ann Lee", "Warfarin check", Priority::Medium, Timeframe::Within24h);
        let grouped = group_by_patient(std::slice::from_ref(&source));
        assert_eq!(grouped.len(), 1);
        let g = &grouped[0];
        assert_eq!(g.title, source.title);
        assert_eq!(g.recommendation, source.recommendation);
        assert_eq!(g.reasoning, source.reasoning);
        assert_eq!(g.insight_type, source.insight_type);
        assert_eq!(g.priority, source.priority);
        assert_eq!(g.confidence, source.confidence);
        assert_eq!(g.timeframe, source.timeframe);
    }

    #[test]
    fn combined_text_is_bulleted_and_blank_line_separated() {
        let insights = vec![
            insight("A", "Labs", Priority::Low, Timeframe::Routine),
            insight("A", "Diet", Priority::Low, Timeframe::Routine),
        ];
        let grouped = group_by_patient(&insights);
        assert_eq!(grouped[0].recommendation, "• Do Labs\n• Do Diet");
        assert_eq!(
            grouped[0].reasoning,
            "Labs: Because Labs\n\nDiet: Because Diet"
        );
    }

    #[test]
    fn every_insight_lands_in_exactly_one_group() {
        let insights = vec![
            insight("C", "1", Priority::Low, Timeframe::Routine),
            insight("A", "2", Priority::High, Timeframe::Routine),
            insight("C", "3", Priority::Medium, Timeframe::Immediate),
            insight("B", "4", Priority::Low, Timeframe::WithinWeek),
            insight("A", "5", Priority::Low, Timeframe::Routine),
            insight("C", "6", Priority::Low, Timeframe::Routine),
        ];

        let grouped = group_by_patient(&insights);
        let order: Vec<&str> = grouped.iter().map(|g| g.patient.as_str()).collect();
        assert_eq!(order, vec!["C", "A", "B"]);
        assert!(grouped.iter().all(|g| !g.insights.is_empty()));

        let total: usize = grouped.iter().map(|g| g.insights.len()).sum();
        assert_eq!(total, insights.len());

        for group in &grouped {
            let expected: Vec<InsightRecord> = insights
                .iter()
                .filter(|i| i.patient == group.patient)
                .cloned()
                .collect();
            assert_eq!(group.insights, expected);
        }
    }

    #[test]
    fn names_differing_only_by_case_stay_separate() {
        let insights = vec![
            insight("ann lee", "1", Priority::Low, Timeframe::Routine),
            insight("Ann Lee", "2", Priority::Low, Timeframe::Routine),
        ];
        assert_eq!(group_by_patient(&insights).len(), 2);
    }

    #[test]
    fn empty_input_yields_no_groups() {
        assert!(group_by_patient(&[]).is_empty());
    }
}
