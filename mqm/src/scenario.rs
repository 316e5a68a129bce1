//! @ai:module:intent Evaluation scenario tags and prompt-based scenario resolution
//! @ai:module:layer domain
//! @ai:module:public_api Scenario
//! @ai:module:depends_on error
//! @ai:module:stateless true

use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// @ai:intent Which combination of text legs was supplied to the evaluation prompt
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Scenario {
    /// Source and translation
    #[serde(rename = "S-T")]
    SourceTarget,
    /// Reference and translation
    #[serde(rename = "R-T")]
    ReferenceTarget,
    /// Source, reference and translation
    #[serde(rename = "S-R-T")]
    SourceReferenceTarget,
}

impl Scenario {
    pub const ALL: [Scenario; 3] = [
        Scenario::SourceTarget,
        Scenario::ReferenceTarget,
        Scenario::SourceReferenceTarget,
    ];

    /// @ai:intent Get the scenario tag as string
    /// @ai:effects pure
    pub fn tag(&self) -> &'static str {
        match self {
            Scenario::SourceTarget => "S-T",
            Scenario::ReferenceTarget => "R-T",
            Scenario::SourceReferenceTarget => "S-R-T",
        }
    }

    /// @ai:intent Whether the scenario carries the source leg
    /// @ai:effects pure
    pub fn has_source(&self) -> bool {
        self.tag().contains("S-")
    }

    /// @ai:intent Whether the scenario carries the translation leg
    /// @ai:effects pure
    pub fn has_target(&self) -> bool {
        self.tag().contains("-T")
    }

    /// @ai:intent Whether the scenario carries the reference leg
    /// @ai:effects pure
    pub fn has_reference(&self) -> bool {
        self.tag().contains("R-")
    }

    /// @ai:intent Infer the scenario from rendered system-prompt text
    ///
    /// Substring heuristic over the rendered prompt, case-sensitive. A
    /// hand-edited prompt that happens to contain or omit these literal
    /// trigger words will change the inferred scenario; sessions that track
    /// an explicitly chosen scenario should prefer it over this fallback.
    /// @ai:example ("EL source: ... DE translation: ...") -> SourceTarget
    /// @ai:effects pure
    pub fn from_prompt(text: &str) -> Scenario {
        if text.contains("reference:") {
            if text.contains("source:") && text.contains("translation:") {
                Scenario::SourceReferenceTarget
            } else {
                Scenario::ReferenceTarget
            }
        } else {
            Scenario::SourceTarget
        }
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Scenario {
    type Err = Error;

    /// @ai:intent Parse a scenario tag, failing loudly on unknown tags
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "S-T" => Ok(Scenario::SourceTarget),
            "R-T" => Ok(Scenario::ReferenceTarget),
            "S-R-T" => Ok(Scenario::SourceReferenceTarget),
            other => Err(Error::UnknownScenario(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_source_target() {
        assert_eq!(Scenario::from_prompt("evaluate this text"), Scenario::SourceTarget);
        assert_eq!(Scenario::from_prompt(""), Scenario::SourceTarget);
    }

    #[test]
    fn test_reference_without_source_is_reference_target() {
        let prompt = "DE reference: \"...\"\n\nDE translation-free text";
        assert_eq!(Scenario::from_prompt(prompt), Scenario::ReferenceTarget);
    }

    #[test]
    fn test_all_three_legs_is_source_reference_target() {
        let prompt = "EL source: \"...\"\n\nDE reference: \"...\"\n\nDE translation: \"...\"";
        assert_eq!(Scenario::from_prompt(prompt), Scenario::SourceReferenceTarget);
    }

    #[test]
    fn test_reference_needs_both_other_triggers_for_srt() {
        // "translation:" without "source:" stays R-T
        let prompt = "DE reference: \"...\"\n\nDE translation: \"...\"";
        assert_eq!(Scenario::from_prompt(prompt), Scenario::ReferenceTarget);
    }

    #[test]
    fn test_triggers_are_case_sensitive() {
        assert_eq!(Scenario::from_prompt("DE Reference: ..."), Scenario::SourceTarget);
    }

    #[test]
    fn test_leg_membership() {
        assert!(Scenario::SourceTarget.has_source());
        assert!(Scenario::SourceTarget.has_target());
        assert!(!Scenario::SourceTarget.has_reference());

        assert!(!Scenario::ReferenceTarget.has_source());
        assert!(Scenario::ReferenceTarget.has_target());
        assert!(Scenario::ReferenceTarget.has_reference());

        assert!(Scenario::SourceReferenceTarget.has_source());
        assert!(Scenario::SourceReferenceTarget.has_target());
        assert!(Scenario::SourceReferenceTarget.has_reference());
    }

    #[test]
    fn test_parse_round_trip() {
        for scenario in Scenario::ALL {
            assert_eq!(scenario.tag().parse::<Scenario>().unwrap(), scenario);
        }
    }

    #[test]
    fn test_parse_unknown_tag_fails() {
        assert!(matches!(
            "S-R".parse::<Scenario>(),
            Err(Error::UnknownScenario(_))
        ));
    }
}
