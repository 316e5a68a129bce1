//! @ai:module:intent Flatten parsed annotations into per-error export rows
//! @ai:module:layer domain
//! @ai:module:public_api flatten_annotation, FlatRow
//! @ai:module:depends_on annotation, scenario, placeholders, error
//! @ai:module:stateless true

use crate::annotation::{MQMAnnotation, TokenInfo};
use crate::error::Result;
use crate::placeholders::Placeholders;
use crate::scenario::Scenario;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// @ai:intent One export row per annotated error
///
/// Conditional fields are `None` when the scenario does not carry the
/// corresponding leg; `None` is the explicit missing marker and renders as a
/// blank cell, distinct from an empty string. List-valued columns hold a
/// stable JSON-array string so a table round-trips through CSV unchanged.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FlatRow {
    /// Shared by every row of one annotation
    pub test_id: String,
    pub test_scenario: String,
    /// Unique per row
    pub error_id: String,
    pub source_language: Option<String>,
    pub target_language: Option<String>,
    pub reference_language: Option<String>,
    pub source_text: Option<String>,
    pub target_text: Option<String>,
    pub reference_text: Option<String>,
    pub error_category: String,
    pub severity: String,
    pub source_tokens: Option<String>,
    pub source_tokens_index: Option<String>,
    pub source_character_span: String,
    pub target_tokens: Option<String>,
    pub target_tokens_index: Option<String>,
    pub target_character_span: String,
}

/// @ai:intent Produce one flat row per error, in annotation order
///
/// `test_id` is generated once and shared across the rows; each row gets a
/// fresh `error_id`. Refuses to run while any placeholder value is empty.
/// @ai:post output length equals the annotation's error count
/// @ai:effects pure
pub fn flatten_annotation(
    annotation: &MQMAnnotation,
    scenario: Scenario,
    placeholders: &Placeholders,
) -> Result<Vec<FlatRow>> {
    placeholders.ensure_complete()?;

    let test_id = Uuid::new_v4().to_string();
    let leg = |present: bool, name: &str| -> Option<String> {
        if present {
            placeholders.get(name).map(str::to_string)
        } else {
            None
        }
    };

    let rows = annotation
        .errors
        .iter()
        .map(|error| FlatRow {
            test_id: test_id.clone(),
            test_scenario: scenario.tag().to_string(),
            error_id: Uuid::new_v4().to_string(),
            source_language: leg(scenario.has_source(), "src_lang"),
            target_language: leg(scenario.has_target(), "tgt_lang"),
            // The reference is written in the target language
            reference_language: leg(scenario.has_reference(), "tgt_lang"),
            source_text: leg(scenario.has_source(), "source"),
            target_text: leg(scenario.has_target(), "translation"),
            reference_text: leg(scenario.has_reference(), "reference"),
            error_category: error.category.name().to_string(),
            severity: error.severity.name().to_string(),
            source_tokens: error.in_source.token.clone(),
            source_tokens_index: fmt_index_list(error.in_source.token_index.as_deref()),
            source_character_span: fmt_span(&error.in_source),
            target_tokens: error.in_target.token.clone(),
            target_tokens_index: fmt_index_list(error.in_target.token_index.as_deref()),
            target_character_span: fmt_span(&error.in_target),
        })
        .collect();

    Ok(rows)
}

/// @ai:intent Stable string form of an optional index list
/// @ai:effects pure
fn fmt_index_list(indices: Option<&[usize]>) -> Option<String> {
    indices.map(|values| serde_json::to_string(values).unwrap_or_default())
}

/// @ai:intent Stable string form of a character span
/// @ai:effects pure
fn fmt_span(info: &TokenInfo) -> String {
    serde_json::to_string(&info.character_span).unwrap_or_default()
}
