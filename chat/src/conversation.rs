//! @ai:module:intent Conversation history with token usage and cost accounting
//! @ai:module:layer application
//! @ai:module:public_api ConversationHandler, Message, Role
//! @ai:module:depends_on client, models
//! @ai:module:stateless false

use crate::client::Usage;
use crate::models::{cost_usd, GptModel};
use lexeval_mqm::{export_plain, export_rows, flatten_annotation, ExportArtifact, MQMAnnotation, Placeholders, Scenario};
use serde::{Deserialize, Serialize};

/// @ai:intent Role of a conversation turn
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    /// @ai:intent Get role name as string
    /// @ai:effects pure
    pub fn name(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// @ai:intent One conversation turn
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// @ai:intent Ordered message history for one session, with usage accounting
///
/// Owned by exactly one session; turns are processed strictly sequentially,
/// so no synchronization is needed.
#[derive(Debug, Clone, Default)]
pub struct ConversationHandler {
    history: Vec<Message>,
    input_tokens: u64,
    output_tokens: u64,
}

impl ConversationHandler {
    /// @ai:intent Create an empty conversation
    /// @ai:effects pure
    pub fn new() -> Self {
        Self::default()
    }

    /// @ai:intent Append a turn to the history
    /// @ai:effects state:write
    pub fn add_message(&mut self, message: Message) {
        self.history.push(message);
    }

    /// @ai:intent Get the system prompt turn, if one was recorded
    /// @ai:effects pure
    pub fn system_prompt(&self) -> Option<&Message> {
        self.history.first().filter(|m| m.role == Role::System)
    }

    /// @ai:intent Get the full ordered history
    /// @ai:effects pure
    pub fn history(&self) -> &[Message] {
        &self.history
    }

    /// @ai:intent Get the most recent assistant turn
    /// @ai:effects pure
    pub fn last_assistant(&self) -> Option<&Message> {
        self.history.iter().rev().find(|m| m.role == Role::Assistant)
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    /// @ai:intent Accumulate token usage reported by the API
    /// @ai:effects state:write
    pub fn record_usage(&mut self, usage: &Usage) {
        self.input_tokens += usage.input_tokens;
        self.output_tokens += usage.output_tokens;
    }

    pub fn input_tokens(&self) -> u64 {
        self.input_tokens
    }

    pub fn output_tokens(&self) -> u64 {
        self.output_tokens
    }

    /// @ai:intent Accumulated input cost in USD for the given model
    /// @ai:effects pure
    pub fn input_cost(&self, model: GptModel) -> f64 {
        cost_usd(self.input_tokens, model.meta().input_tokens_cost)
    }

    /// @ai:intent Accumulated output cost in USD for the given model
    /// @ai:effects pure
    pub fn output_cost(&self, model: GptModel) -> f64 {
        cost_usd(self.output_tokens, model.meta().output_tokens_cost)
    }

    /// @ai:intent Export the conversation as plain text
    /// @ai:effects pure
    pub fn export_plain(&self) -> ExportArtifact {
        let turns: Vec<String> = self.history.iter().map(|m| m.content.clone()).collect();
        export_plain(&turns)
    }

    /// @ai:intent Export the latest structured annotation as a CSV table
    ///
    /// Parses the most recent assistant turn as an MQM annotation; a parse
    /// failure surfaces as the corrupt-annotation error so the caller can
    /// decide whether to resubmit the turn.
    /// @ai:effects pure
    pub fn export_structured(
        &self,
        scenario: Scenario,
        placeholders: &Placeholders,
    ) -> anyhow::Result<ExportArtifact> {
        let message = self
            .last_assistant()
            .ok_or_else(|| anyhow::anyhow!("no assistant response to export"))?;

        let annotation = MQMAnnotation::from_json(&message.content)?;
        let rows = flatten_annotation(&annotation, scenario, placeholders)?;
        Ok(export_rows(&rows)?)
    }
}
