//! @ai:module:intent OpenAI Responses API client for chat turns
//! @ai:module:layer infrastructure
//! @ai:module:public_api OpenAiClient, MockLlmClient, LlmResponse, ResponseFormat, Usage
//! @ai:module:depends_on config, conversation
//! @ai:module:stateless false

use crate::config::ApiConfig;
use crate::conversation::Message;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// @ai:intent Response-format descriptor sent with every request
///
/// `{"format": {"type": "text"}}` for free text, or a strict JSON-schema
/// envelope for structured annotation mode.
#[derive(Debug, Clone, Serialize)]
pub struct ResponseFormat {
    format: FormatSpec,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum FormatSpec {
    Text,
    JsonSchema {
        name: String,
        strict: bool,
        schema: Value,
    },
}

impl ResponseFormat {
    /// @ai:intent Free-text response format
    /// @ai:effects pure
    pub fn text() -> Self {
        Self {
            format: FormatSpec::Text,
        }
    }

    /// @ai:intent Strict MQM annotation response format
    /// @ai:effects pure
    pub fn mqm_annotation() -> Self {
        Self {
            format: FormatSpec::JsonSchema {
                name: "mqm_annotation".to_string(),
                strict: true,
                schema: lexeval_mqm::strict_schema().clone(),
            },
        }
    }
}

/// @ai:intent Trait for the LLM request collaborator
#[allow(async_fn_in_trait)]
pub trait LlmClientTrait: Send + Sync {
    /// @ai:intent Send one turn and block until the response arrives
    async fn send(
        &self,
        model: &str,
        instructions: &str,
        input: &[Message],
        temperature: f32,
        format: &ResponseFormat,
    ) -> Result<LlmResponse>;
}

/// @ai:intent Token usage reported by the API for one call
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Usage {
    pub input_tokens: u64,
    pub output_tokens: u64,
}

/// @ai:intent Response from the LLM collaborator
#[derive(Debug, Clone)]
pub struct LlmResponse {
    pub output_text: String,
    pub usage: Usage,
}

/// @ai:intent Responses API request body
#[derive(Debug, Serialize)]
struct ApiRequest<'a> {
    model: &'a str,
    instructions: &'a str,
    input: &'a [Message],
    temperature: f32,
    text: &'a ResponseFormat,
}

/// @ai:intent Responses API response body
#[derive(Debug, Deserialize)]
struct ApiResponse {
    #[serde(default)]
    output: Vec<OutputItem>,
    #[serde(default)]
    usage: Usage,
}

#[derive(Debug, Deserialize)]
struct OutputItem {
    #[serde(default)]
    content: Vec<ContentPart>,
}

#[derive(Debug, Deserialize)]
struct ContentPart {
    #[serde(default)]
    text: String,
}

/// @ai:intent OpenAI Responses API client
pub struct OpenAiClient {
    client: reqwest::Client,
    config: ApiConfig,
    api_key: String,
}

impl OpenAiClient {
    /// @ai:intent Create a new client
    /// @ai:pre OPENAI_API_KEY environment variable is set
    /// @ai:effects env
    pub fn new(config: ApiConfig) -> Result<Self> {
        let api_key =
            std::env::var("OPENAI_API_KEY").context("OPENAI_API_KEY not set in environment")?;
        Self::with_api_key(config, api_key)
    }

    /// @ai:intent Create a client with an explicit key (for testing)
    /// @ai:effects pure
    pub fn with_api_key(config: ApiConfig, api_key: String) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            config,
            api_key,
        })
    }
}

impl LlmClientTrait for OpenAiClient {
    /// @ai:intent Send one turn to the Responses API
    /// @ai:effects network
    async fn send(
        &self,
        model: &str,
        instructions: &str,
        input: &[Message],
        temperature: f32,
        format: &ResponseFormat,
    ) -> Result<LlmResponse> {
        let request = ApiRequest {
            model,
            instructions,
            input,
            temperature,
            text: format,
        };

        let response = self
            .client
            .post(format!("{}/responses", self.config.base_url))
            .bearer_auth(&self.api_key)
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await
            .context("Failed to send request to OpenAI API")?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            anyhow::bail!("OpenAI API error ({}): {}", status, error_text);
        }

        let api_response: ApiResponse = response
            .json()
            .await
            .context("Failed to parse OpenAI API response")?;

        let output_text = api_response
            .output
            .into_iter()
            .flat_map(|item| item.content)
            .map(|part| part.text)
            .collect::<Vec<_>>()
            .join("");

        Ok(LlmResponse {
            output_text,
            usage: api_response.usage,
        })
    }
}

/// @ai:intent Mock client for testing and offline runs
pub struct MockLlmClient {
    response: String,
}

impl MockLlmClient {
    /// @ai:intent Create a mock client that returns a fixed response
    /// @ai:effects pure
    pub fn new(response: String) -> Self {
        Self { response }
    }

    /// @ai:intent Mock client returning one minor fluency error annotation
    /// @ai:effects pure
    pub fn with_sample_annotation() -> Self {
        Self::new(
            r#"{"errors":[{"category":"fluency","severity":"minor","in_source":{"token":"τρέχει","token_index":[2],"character_span":[10,16]},"in_target":{"token":"rennt","token_index":[3],"character_span":[14,19]}}]}"#
                .to_string(),
        )
    }
}

impl LlmClientTrait for MockLlmClient {
    /// @ai:intent Return the canned response
    /// @ai:effects pure
    async fn send(
        &self,
        _model: &str,
        _instructions: &str,
        _input: &[Message],
        _temperature: f32,
        _format: &ResponseFormat,
    ) -> Result<LlmResponse> {
        Ok(LlmResponse {
            output_text: self.response.clone(),
            usage: Usage {
                input_tokens: 100,
                output_tokens: 200,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_text_format_descriptor() {
        let format = serde_json::to_value(ResponseFormat::text()).unwrap();
        assert_eq!(format, json!({"format": {"type": "text"}}));
    }

    #[test]
    fn test_json_schema_format_descriptor() {
        let format = serde_json::to_value(ResponseFormat::mqm_annotation()).unwrap();
        assert_eq!(format["format"]["type"], "json_schema");
        assert_eq!(format["format"]["name"], "mqm_annotation");
        assert_eq!(format["format"]["strict"], true);
        assert_eq!(format["format"]["schema"]["type"], "object");
        assert_eq!(
            format["format"]["schema"]["additionalProperties"],
            json!(false)
        );
    }

    #[test]
    fn test_request_body_shape() {
        let input = vec![Message::user("hello")];
        let format = ResponseFormat::text();
        let request = ApiRequest {
            model: "gpt-4o-2024-08-06",
            instructions: "You are a helpful assistant.",
            input: &input,
            temperature: 0.1,
            text: &format,
        };

        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(body["model"], "gpt-4o-2024-08-06");
        assert_eq!(body["input"][0]["role"], "user");
        assert_eq!(body["input"][0]["content"], "hello");
        assert_eq!(body["text"]["format"]["type"], "text");
    }

    #[test]
    fn test_response_parsing_joins_output_parts() {
        let raw = json!({
            "output": [
                {"content": [{"text": "first"}, {"text": " second"}]},
                {"content": [{"text": " third"}]}
            ],
            "usage": {"input_tokens": 12, "output_tokens": 34}
        });

        let parsed: ApiResponse = serde_json::from_value(raw).unwrap();
        let text = parsed
            .output
            .into_iter()
            .flat_map(|item| item.content)
            .map(|part| part.text)
            .collect::<Vec<_>>()
            .join("");
        assert_eq!(text, "first second third");
        assert_eq!(parsed.usage.input_tokens, 12);
    }

    #[tokio::test]
    async fn test_mock_client() {
        let client = MockLlmClient::with_sample_annotation();
        let response = client
            .send("gpt-4o-2024-08-06", "evaluate", &[], 0.1, &ResponseFormat::mqm_annotation())
            .await
            .unwrap();

        assert!(response.output_text.contains("fluency"));
        assert_eq!(response.usage.input_tokens, 100);
        assert_eq!(response.usage.output_tokens, 200);
    }
}
