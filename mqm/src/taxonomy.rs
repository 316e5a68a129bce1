//! @ai:module:intent Static MQM severity and error-category enumerations
//! @ai:module:layer domain
//! @ai:module:public_api Severity, ErrorCategory
//! @ai:module:stateless true

use serde::{Deserialize, Serialize};

/// @ai:intent Severity level of an annotated error
///
/// Listed in order of increasing impact; the ordering is documentation only
/// and is not enforced anywhere.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Neutral,
    Minor,
    Major,
    Critical,
}

impl Severity {
    pub const ALL: [Severity; 4] = [
        Severity::Neutral,
        Severity::Minor,
        Severity::Major,
        Severity::Critical,
    ];

    /// @ai:intent Get severity name as string
    /// @ai:effects pure
    pub fn name(&self) -> &'static str {
        match self {
            Severity::Neutral => "neutral",
            Severity::Minor => "minor",
            Severity::Major => "major",
            Severity::Critical => "critical",
        }
    }
}

/// @ai:intent Top-level MQM error categories (Level 0)
///
/// Deeper taxonomy levels exist in the MQM standard but only Level 0 is
/// captured on error records.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorCategory {
    Terminology,
    Accuracy,
    Fluency,
    Style,
    LocaleConventions,
    Verity,
    Design,
}

impl ErrorCategory {
    pub const ALL: [ErrorCategory; 7] = [
        ErrorCategory::Terminology,
        ErrorCategory::Accuracy,
        ErrorCategory::Fluency,
        ErrorCategory::Style,
        ErrorCategory::LocaleConventions,
        ErrorCategory::Verity,
        ErrorCategory::Design,
    ];

    /// @ai:intent Get category name as string
    /// @ai:effects pure
    pub fn name(&self) -> &'static str {
        match self {
            ErrorCategory::Terminology => "terminology",
            ErrorCategory::Accuracy => "accuracy",
            ErrorCategory::Fluency => "fluency",
            ErrorCategory::Style => "style",
            ErrorCategory::LocaleConventions => "locale-conventions",
            ErrorCategory::Verity => "verity",
            ErrorCategory::Design => "design",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_serializes_lowercase() {
        let json = serde_json::to_string(&Severity::Major).unwrap();
        assert_eq!(json, "\"major\"");
    }

    #[test]
    fn test_category_serializes_kebab_case() {
        let json = serde_json::to_string(&ErrorCategory::LocaleConventions).unwrap();
        assert_eq!(json, "\"locale-conventions\"");
    }

    #[test]
    fn test_name_matches_serialized_form() {
        for severity in Severity::ALL {
            let json = serde_json::to_string(&severity).unwrap();
            assert_eq!(json, format!("\"{}\"", severity.name()));
        }
        for category in ErrorCategory::ALL {
            let json = serde_json::to_string(&category).unwrap();
            assert_eq!(json, format!("\"{}\"", category.name()));
        }
    }
}
