use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::ModelError;

/// Macro to generate enum with as_str + std::str::FromStr pattern.
///
/// Variants are listed from least to most urgent so the derived `Ord`
/// doubles as the precedence order (`max()` is the most urgent value).
/// Deserialization never fails: a missing, null or unknown value becomes
/// the `fallback` variant.
macro_rules! str_enum {
    ($name:ident, fallback = $fallback:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$(Self::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }

            /// Case-insensitive parse that degrades to the fallback variant.
            pub fn parse_lenient(s: &str) -> Self {
                s.trim().to_lowercase().parse().unwrap_or(Self::$fallback)
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::$fallback
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = ModelError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(ModelError::InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
                Ok(match raw {
                    Some(serde_json::Value::String(s)) => Self::parse_lenient(&s),
                    _ => Self::$fallback,
                })
            }
        }
    };
}

str_enum!(InsightType, fallback = General {
    General => "general",
    RiskAlert => "risk_alert",
    FollowUp => "follow_up",
    Medication => "medication",
    CareCoordination => "care_coordination",
});

str_enum!(Priority, fallback = Low {
    Low => "low",
    Medium => "medium",
    High => "high",
});

str_enum!(Confidence, fallback = Low {
    Low => "low",
    Medium => "medium",
    High => "high",
});

str_enum!(Timeframe, fallback = Routine {
    Routine => "routine",
    WithinWeek => "within_week",
    Within24h => "within_24h",
    Immediate => "immediate",
});

str_enum!(RiskTier, fallback = Low {
    Low => "low",
    Medium => "medium",
    High => "high",
});

str_enum!(MessageRole, fallback = User {
    User => "user",
    Assistant => "assistant",
});

str_enum!(ClinicalRole, fallback = Physician {
    Physician => "physician",
    Nurse => "nurse",
    CaseManager => "case_manager",
});

str_enum!(AnalysisType, fallback = General {
    General => "general",
    RiskAssessment => "risk_assessment",
    MedicationReview => "medication_review",
    FollowUpPlanning => "follow_up_planning",
});

impl RiskTier {
    /// Canonical tier from the number of risk-factor tags:
    /// three or more is high, exactly two is medium, otherwise low.
    pub fn from_factor_count(count: usize) -> Self {
        match count {
            0 | 1 => RiskTier::Low,
            2 => RiskTier::Medium,
            _ => RiskTier::High,
        }
    }
}
