//! @ai:module:intent Prompt templates for the MQM evaluation scenarios
//! @ai:module:layer domain
//! @ai:module:public_api DEFAULT_SYSTEM_PROMPT, mqm_prompt
//! @ai:module:stateless true

use lexeval_mqm::Scenario;

pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful assistant.";

const MQM_BASE_PROMPT: &str = "You are a professional translator evaluator. You are reviewing texts from Greek to German that are hosted on the Greek Civil Code. The translation should be accurate and fluent. There will be fidelity at syntax level, however, it is more important to preserve the meaning than to translate word-for-word. Be as accurate and picky as possible. Identify the errors in the following translation. Note that Major errors refer to actual translation or grammatical errors, and Minor errors refer to smaller imperfections, and purely subjective opinions about the translation.\n\n";

const MQM_SOURCE_TEXT: &str = "{src_lang} source: \"{source}\"\n\n";
const MQM_TARGET_TEXT: &str = "{tgt_lang} translation: \"{translation}\"\n\n";
const MQM_REF_TEXT: &str = "{tgt_lang} reference: \"{reference}\"\n\n";

/// @ai:intent Compose the evaluation prompt template for a scenario
///
/// Evaluator preamble plus the scenario's text legs, in source, reference,
/// translation order, trimmed of surrounding whitespace.
/// @ai:effects pure
pub fn mqm_prompt(scenario: Scenario) -> String {
    let mut prompt = String::from(MQM_BASE_PROMPT);
    if scenario.has_source() {
        prompt.push_str(MQM_SOURCE_TEXT);
    }
    if scenario.has_reference() {
        prompt.push_str(MQM_REF_TEXT);
    }
    if scenario.has_target() {
        prompt.push_str(MQM_TARGET_TEXT);
    }
    prompt.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use lexeval_mqm::Placeholders;

    #[test]
    fn test_source_target_template() {
        let prompt = mqm_prompt(Scenario::SourceTarget);
        assert!(prompt.starts_with("You are a professional translator evaluator."));
        assert!(prompt.contains("{src_lang} source: \"{source}\""));
        assert!(prompt.contains("{tgt_lang} translation: \"{translation}\""));
        assert!(!prompt.contains("reference"));
    }

    #[test]
    fn test_reference_target_template() {
        let prompt = mqm_prompt(Scenario::ReferenceTarget);
        assert!(prompt.contains("{tgt_lang} reference: \"{reference}\""));
        assert!(!prompt.contains("source:"));
    }

    #[test]
    fn test_full_template_leg_order() {
        let prompt = mqm_prompt(Scenario::SourceReferenceTarget);
        let source_at = prompt.find("source:").unwrap();
        let reference_at = prompt.find("reference:").unwrap();
        let translation_at = prompt.find("translation:").unwrap();
        assert!(source_at < reference_at);
        assert!(reference_at < translation_at);
    }

    #[test]
    fn test_templates_are_trimmed() {
        for scenario in Scenario::ALL {
            let prompt = mqm_prompt(scenario);
            assert_eq!(prompt, prompt.trim());
        }
    }

    #[test]
    fn test_rendered_template_resolves_back_to_its_scenario() {
        for scenario in Scenario::ALL {
            let template = mqm_prompt(scenario);
            let mut placeholders = Placeholders::from_template(&template);
            for name in placeholders.names().map(str::to_string).collect::<Vec<_>>() {
                placeholders.set(&name, "value");
            }
            let rendered = placeholders.render(&template).unwrap();
            assert_eq!(Scenario::from_prompt(&rendered), scenario);
        }
    }

    #[test]
    fn test_template_placeholder_names() {
        let placeholders = Placeholders::from_template(&mqm_prompt(Scenario::SourceReferenceTarget));
        let names: Vec<&str> = placeholders.names().collect();
        assert_eq!(
            names,
            vec!["src_lang", "source", "tgt_lang", "reference", "translation"]
        );
    }
}
