//! Severe-condition classification over weather condition codes
//!
//! The code ranges follow the data source's condition-code table. The ranges
//! are inclusive on both ends and disjoint; first match wins.

use serde::{Deserialize, Serialize};

/// Weather condition category derived from a condition code
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum SeverityCategory {
    Thunderstorm,
    Rain,
    Snow,
    AtmosphericCondition,
    ExtremeWeather,
    ClearOrMild,
    Unknown,
}

impl std::fmt::Display for SeverityCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SeverityCategory::Thunderstorm => write!(f, "Thunderstorm"),
            SeverityCategory::Rain => write!(f, "Rain"),
            SeverityCategory::Snow => write!(f, "Snow"),
            SeverityCategory::AtmosphericCondition => write!(f, "Atmospheric Condition"),
            SeverityCategory::ExtremeWeather => write!(f, "Extreme Weather"),
            SeverityCategory::ClearOrMild => write!(f, "Clear or Mild"),
            SeverityCategory::Unknown => write!(f, "Unknown"),
        }
    }
}

/// Result of classifying one condition code
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct SeverityResult {
    /// Whether the condition warrants an alert
    pub is_severe: bool,
    /// Category label for the condition
    pub category: SeverityCategory,
}

impl SeverityResult {
    /// Classify a numeric condition code
    ///
    /// Total over all integers; codes outside every severe range are
    /// `ClearOrMild` and not severe.
    #[must_use]
    pub fn from_code(code: i64) -> Self {
        match code {
            200..=232 => Self::severe(SeverityCategory::Thunderstorm),
            500..=531 => Self::severe(SeverityCategory::Rain),
            600..=622 => Self::severe(SeverityCategory::Snow),
            700..=781 => Self::severe(SeverityCategory::AtmosphericCondition),
            900..=906 => Self::severe(SeverityCategory::ExtremeWeather),
            _ => Self::benign(SeverityCategory::ClearOrMild),
        }
    }

    /// Classify a code that may be absent (non-integer upstream value)
    #[must_use]
    pub fn from_raw_code(code: Option<i64>) -> Self {
        match code {
            Some(code) => Self::from_code(code),
            None => Self::benign(SeverityCategory::Unknown),
        }
    }

    fn severe(category: SeverityCategory) -> Self {
        Self {
            is_severe: true,
            category,
        }
    }

    fn benign(category: SeverityCategory) -> Self {
        Self {
            is_severe: false,
            category,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(200, SeverityCategory::Thunderstorm)]
    #[case(216, SeverityCategory::Thunderstorm)]
    #[case(232, SeverityCategory::Thunderstorm)]
    #[case(500, SeverityCategory::Rain)]
    #[case(511, SeverityCategory::Rain)]
    #[case(531, SeverityCategory::Rain)]
    #[case(600, SeverityCategory::Snow)]
    #[case(622, SeverityCategory::Snow)]
    #[case(700, SeverityCategory::AtmosphericCondition)]
    #[case(741, SeverityCategory::AtmosphericCondition)]
    #[case(781, SeverityCategory::AtmosphericCondition)]
    #[case(900, SeverityCategory::ExtremeWeather)]
    #[case(906, SeverityCategory::ExtremeWeather)]
    fn severe_codes_classify_with_category(#[case] code: i64, #[case] expected: SeverityCategory) {
        let result = SeverityResult::from_code(code);
        assert!(result.is_severe, "code {code} should be severe");
        assert_eq!(result.category, expected);
    }

    #[rstest]
    #[case(199)]
    #[case(233)]
    #[case(499)]
    #[case(532)]
    #[case(599)]
    #[case(623)]
    #[case(699)]
    #[case(782)]
    #[case(800)]
    #[case(899)]
    #[case(907)]
    #[case(0)]
    #[case(-1)]
    #[case(1000)]
    fn benign_codes_are_clear_or_mild(#[case] code: i64) {
        let result = SeverityResult::from_code(code);
        assert!(!result.is_severe, "code {code} should not be severe");
        assert_eq!(result.category, SeverityCategory::ClearOrMild);
    }

    #[test]
    fn missing_code_is_unknown_and_benign() {
        let result = SeverityResult::from_raw_code(None);
        assert!(!result.is_severe);
        assert_eq!(result.category, SeverityCategory::Unknown);
    }

    #[test]
    fn present_code_classifies_through_raw_path() {
        assert_eq!(
            SeverityResult::from_raw_code(Some(201)),
            SeverityResult::from_code(201)
        );
    }

    #[test]
    fn classification_is_idempotent() {
        for code in [-5, 199, 200, 232, 233, 511, 622, 781, 800, 906] {
            assert_eq!(SeverityResult::from_code(code), SeverityResult::from_code(code));
        }
    }

    #[test]
    fn category_display_matches_alert_wording() {
        assert_eq!(SeverityCategory::Thunderstorm.to_string(), "Thunderstorm");
        assert_eq!(
            SeverityCategory::AtmosphericCondition.to_string(),
            "Atmospheric Condition"
        );
        assert_eq!(SeverityCategory::ClearOrMild.to_string(), "Clear or Mild");
    }
}
