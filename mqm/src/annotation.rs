//! @ai:module:intent Define data structures for MQM error annotations
//! @ai:module:layer domain
//! @ai:module:public_api MQMAnnotation, MQMError, TokenInfo
//! @ai:module:depends_on taxonomy, error
//! @ai:module:stateless true

use crate::error::{Error, Result};
use crate::taxonomy::{ErrorCategory, Severity};
use serde::{Deserialize, Serialize};

/// @ai:intent Where an error is anchored in a text
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct TokenInfo {
    /// Word offsets of the implicated token(s), 0-indexed
    pub token_index: Option<Vec<usize>>,
    /// Character offsets as (start, end) pairs, 0-indexed
    #[serde(default)]
    pub character_span: Vec<usize>,
    /// The literal token(s) in question
    pub token: Option<String>,
}

impl TokenInfo {
    /// @ai:intent Check the character span invariant: even length, start <= end per pair
    /// @ai:effects pure
    pub fn validate(&self) -> Result<()> {
        if self.character_span.is_empty() {
            return Ok(());
        }

        if self.character_span.len() % 2 != 0 {
            return Err(Error::InvalidSpan(format!(
                "odd length {}",
                self.character_span.len()
            )));
        }

        for pair in self.character_span.chunks(2) {
            if pair[0] > pair[1] {
                return Err(Error::InvalidSpan(format!(
                    "start {} exceeds end {}",
                    pair[0], pair[1]
                )));
            }
        }

        Ok(())
    }
}

/// @ai:intent A single annotated translation issue
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MQMError {
    pub category: ErrorCategory,
    pub severity: Severity,
    pub in_source: TokenInfo,
    pub in_target: TokenInfo,
}

/// @ai:intent Complete MQM annotation for a translation segment or document
///
/// Root object returned by the model in structured mode. An empty error list
/// is valid (no errors found).
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct MQMAnnotation {
    #[serde(default)]
    pub errors: Vec<MQMError>,
}

impl MQMAnnotation {
    /// @ai:intent Parse a model response into an annotation
    /// @ai:post all contained character spans satisfy the span invariant
    /// @ai:effects pure
    pub fn from_json(text: &str) -> Result<Self> {
        let annotation: MQMAnnotation =
            serde_json::from_str(text).map_err(|source| Error::CorruptAnnotation { source })?;
        annotation.validate()?;
        Ok(annotation)
    }

    /// @ai:intent Validate every error's token anchors
    /// @ai:effects pure
    pub fn validate(&self) -> Result<()> {
        for error in &self.errors {
            error.in_source.validate()?;
            error.in_target.validate()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_annotation() {
        let text = r#"{
            "errors": [
                {
                    "category": "fluency",
                    "severity": "minor",
                    "in_source": {"token": "τρέχει", "token_index": [2], "character_span": [10, 16]},
                    "in_target": {"token": "rennt", "token_index": [3], "character_span": [14, 19]}
                }
            ]
        }"#;

        let annotation = MQMAnnotation::from_json(text).unwrap();
        assert_eq!(annotation.errors.len(), 1);
        assert_eq!(annotation.errors[0].category, ErrorCategory::Fluency);
        assert_eq!(annotation.errors[0].severity, Severity::Minor);
        assert_eq!(
            annotation.errors[0].in_source.token.as_deref(),
            Some("τρέχει")
        );
    }

    #[test]
    fn test_parse_empty_errors_is_valid() {
        let annotation = MQMAnnotation::from_json(r#"{"errors": []}"#).unwrap();
        assert!(annotation.errors.is_empty());

        // The errors key itself may be absent
        let annotation = MQMAnnotation::from_json("{}").unwrap();
        assert!(annotation.errors.is_empty());
    }

    #[test]
    fn test_parse_malformed_json_is_corrupt() {
        let result = MQMAnnotation::from_json("not json at all");
        assert!(matches!(result, Err(Error::CorruptAnnotation { .. })));
    }

    #[test]
    fn test_parse_unknown_category_is_corrupt() {
        let text = r#"{"errors": [{"category": "nonsense", "severity": "minor",
            "in_source": {}, "in_target": {}}]}"#;
        let result = MQMAnnotation::from_json(text);
        assert!(matches!(result, Err(Error::CorruptAnnotation { .. })));
    }

    #[test]
    fn test_odd_span_rejected() {
        let info = TokenInfo {
            character_span: vec![10, 16, 20],
            ..Default::default()
        };
        assert!(matches!(info.validate(), Err(Error::InvalidSpan(_))));
    }

    #[test]
    fn test_inverted_span_rejected() {
        let info = TokenInfo {
            character_span: vec![16, 10],
            ..Default::default()
        };
        assert!(matches!(info.validate(), Err(Error::InvalidSpan(_))));
    }

    #[test]
    fn test_empty_span_is_valid() {
        assert!(TokenInfo::default().validate().is_ok());
    }
}
