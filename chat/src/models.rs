//! @ai:module:intent Supported GPT models and their static metadata
//! @ai:module:layer domain
//! @ai:module:public_api GptModel, ModelMeta, cost_usd
//! @ai:module:stateless true

use serde::{Deserialize, Serialize};

/// @ai:intent Static metadata for one supported model
///
/// Costs are USD per one million tokens.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelMeta {
    pub api_name: &'static str,
    pub input_tokens_cost: f64,
    pub output_tokens_cost: f64,
    pub latency: &'static str,
    pub input_types: &'static [&'static str],
    pub output_types: &'static [&'static str],
}

/// @ai:intent Closed set of supported GPT models
///
/// Behavior-free tags; everything a caller needs lives in the side lookup
/// table returned by [`GptModel::meta`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum GptModel {
    #[serde(rename = "gpt-4.1")]
    Gpt41,
    #[serde(rename = "gpt-4o-default")]
    Gpt4oDefault,
    #[serde(rename = "gpt-4o-latest")]
    Gpt4oLatest,
}

impl GptModel {
    pub const ALL: [GptModel; 3] = [GptModel::Gpt41, GptModel::Gpt4oDefault, GptModel::Gpt4oLatest];

    /// @ai:intent Get model name as string
    /// @ai:effects pure
    pub fn name(&self) -> &'static str {
        match self {
            GptModel::Gpt41 => "gpt-4.1",
            GptModel::Gpt4oDefault => "gpt-4o-default",
            GptModel::Gpt4oLatest => "gpt-4o-latest",
        }
    }

    /// @ai:intent Look up the static metadata for this model
    /// @ai:effects pure
    pub fn meta(&self) -> &'static ModelMeta {
        const GPT_4_1: ModelMeta = ModelMeta {
            api_name: "gpt-4.1-2025-04-14",
            input_tokens_cost: 2.0,
            output_tokens_cost: 0.5,
            latency: "high",
            input_types: &["text", "image"],
            output_types: &["text"],
        };
        const GPT_4O_DEFAULT: ModelMeta = ModelMeta {
            api_name: "gpt-4o-2024-08-06",
            input_tokens_cost: 2.5,
            output_tokens_cost: 10.0,
            latency: "medium",
            input_types: &["text"],
            output_types: &["text"],
        };
        const GPT_4O_LATEST: ModelMeta = ModelMeta {
            api_name: "gpt-4o-2024-11-20",
            input_tokens_cost: 2.5,
            output_tokens_cost: 10.0,
            latency: "low",
            input_types: &["text", "code"],
            output_types: &["text", "code"],
        };

        match self {
            GptModel::Gpt41 => &GPT_4_1,
            GptModel::Gpt4oDefault => &GPT_4O_DEFAULT,
            GptModel::Gpt4oLatest => &GPT_4O_LATEST,
        }
    }

    /// @ai:intent Parse a model name chosen on the command line
    /// @ai:effects pure
    pub fn parse(name: &str) -> Option<GptModel> {
        GptModel::ALL.into_iter().find(|m| m.name() == name)
    }
}

/// @ai:intent Cost in USD for a token count at a per-million price
/// @ai:example (1_000_000, 2.5) -> 2.5
/// @ai:effects pure
pub fn cost_usd(n_tokens: u64, cost_per_million: f64) -> f64 {
    n_tokens as f64 * (cost_per_million / 1_000_000.0)
}

/// @ai:intent Render the model metadata table for terminal display
/// @ai:effects pure
pub fn models_table() -> String {
    let mut table = String::new();
    table.push_str(
        "model           api name            input $/1M  output $/1M  latency  input        output\n",
    );

    for model in GptModel::ALL {
        let meta = model.meta();
        table.push_str(&format!(
            "{:<15} {:<19} {:<11} {:<12} {:<8} {:<12} {}\n",
            model.name(),
            meta.api_name,
            meta.input_tokens_cost,
            meta.output_tokens_cost,
            meta.latency,
            meta.input_types.join(", "),
            meta.output_types.join(", "),
        ));
    }

    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_model() {
        assert_eq!(GptModel::parse("gpt-4.1"), Some(GptModel::Gpt41));
        assert_eq!(GptModel::parse("gpt-5"), None);
    }

    #[test]
    fn test_meta_lookup() {
        let meta = GptModel::Gpt4oLatest.meta();
        assert_eq!(meta.api_name, "gpt-4o-2024-11-20");
        assert_eq!(meta.latency, "low");
    }

    #[test]
    fn test_cost_scales_per_million() {
        assert!((cost_usd(1_000_000, 2.5) - 2.5).abs() < f64::EPSILON);
        assert!((cost_usd(500, 2.0) - 0.001).abs() < 1e-12);
        assert_eq!(cost_usd(0, 10.0), 0.0);
    }

    #[test]
    fn test_table_lists_every_model() {
        let table = models_table();
        for model in GptModel::ALL {
            assert!(table.contains(model.name()));
            assert!(table.contains(model.meta().api_name));
        }
    }

    #[test]
    fn test_serde_round_trip() {
        let json = serde_json::to_string(&GptModel::Gpt4oDefault).unwrap();
        assert_eq!(json, "\"gpt-4o-default\"");
        let parsed: GptModel = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, GptModel::Gpt4oDefault);
    }
}
