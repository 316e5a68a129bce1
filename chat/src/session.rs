//! @ai:module:intent Per-session state: prompt, placeholders, scenario, conversation
//! @ai:module:layer application
//! @ai:module:public_api Session
//! @ai:module:depends_on client, config, conversation, prompt
//! @ai:module:stateless false

use crate::client::{LlmClientTrait, ResponseFormat};
use crate::config::ApiConfig;
use crate::conversation::{ConversationHandler, Message};
use crate::prompt::{mqm_prompt, DEFAULT_SYSTEM_PROMPT};
use anyhow::{bail, Result};
use lexeval_mqm::{ExportArtifact, Placeholders, Scenario};
use uuid::Uuid;

/// @ai:intent All mutable state for one user session
///
/// One instance per session, constructed at session start and torn down at
/// session end. Nothing here is shared across sessions; the compiled
/// response schema is the only cross-session artifact and it is read-only.
#[derive(Debug, Clone)]
pub struct Session {
    id: String,
    structured_output: bool,
    scenario: Option<Scenario>,
    system_prompt: String,
    pub placeholders: Placeholders,
    pub conversation: ConversationHandler,
}

impl Session {
    /// @ai:intent Create a fresh session with a unique identifier
    /// @ai:effects pure
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            structured_output: false,
            scenario: None,
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            placeholders: Placeholders::new(),
            conversation: ConversationHandler::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn structured_output(&self) -> bool {
        self.structured_output
    }

    /// @ai:intent Switch to structured annotation mode for a chosen scenario
    /// @ai:effects state:write
    pub fn enable_structured(&mut self, scenario: Scenario) {
        self.structured_output = true;
        self.scenario = Some(scenario);
        self.set_system_prompt(mqm_prompt(scenario));
    }

    /// @ai:intent Switch back to free-text mode with the default prompt
    /// @ai:effects state:write
    pub fn disable_structured(&mut self) {
        self.structured_output = false;
        self.scenario = None;
        self.set_system_prompt(DEFAULT_SYSTEM_PROMPT);
    }

    /// @ai:intent Replace the system prompt template, re-extracting placeholders
    ///
    /// Values already entered survive the edit; stale names are dropped.
    /// @ai:effects state:write
    pub fn set_system_prompt(&mut self, template: impl Into<String>) {
        self.system_prompt = template.into();
        self.placeholders.sync_with_template(&self.system_prompt);
    }

    /// @ai:intent Get the raw (unrendered) system prompt template
    /// @ai:effects pure
    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    /// @ai:intent Render the final system prompt, refusing while placeholders are empty
    /// @ai:effects pure
    pub fn final_system_prompt(&self) -> Result<String> {
        if self.placeholders.is_empty() {
            return Ok(self.system_prompt.clone());
        }
        Ok(self.placeholders.render(&self.system_prompt)?)
    }

    /// @ai:intent The scenario for flattening: the explicit choice, else inferred
    ///
    /// The explicitly chosen scenario is authoritative; prompt-text
    /// inference is the fallback for hand-edited prompts.
    /// @ai:effects pure
    pub fn effective_scenario(&self) -> Result<Scenario> {
        if let Some(scenario) = self.scenario {
            return Ok(scenario);
        }
        Ok(Scenario::from_prompt(&self.final_system_prompt()?))
    }

    /// @ai:intent Submit one user turn and record the model's reply
    ///
    /// The rendered system prompt is recorded as the first turn of the
    /// conversation. Blocks until the collaborator returns or fails; API
    /// and transport errors propagate to the caller.
    /// @ai:effects network, state:write
    pub async fn submit_turn<C: LlmClientTrait>(
        &mut self,
        client: &C,
        config: &ApiConfig,
        text: &str,
    ) -> Result<String> {
        let instructions = self.final_system_prompt()?;

        if self.conversation.is_empty() {
            self.conversation.add_message(Message::system(instructions.clone()));
            tracing::debug!(session = %self.id, "system prompt added");
        }

        self.conversation.add_message(Message::user(text));

        let format = if self.structured_output {
            ResponseFormat::mqm_annotation()
        } else {
            ResponseFormat::text()
        };

        let response = client
            .send(
                config.model.meta().api_name,
                &instructions,
                self.conversation.history(),
                config.temperature,
                &format,
            )
            .await?;

        self.conversation.record_usage(&response.usage);
        tracing::info!(
            "Sent {} and received {} tokens.",
            response.usage.input_tokens,
            response.usage.output_tokens
        );

        self.conversation
            .add_message(Message::assistant(response.output_text.clone()));

        Ok(response.output_text)
    }

    /// @ai:intent Export the conversation in the mode the session is in
    /// @ai:effects pure
    pub fn export(&self) -> Result<ExportArtifact> {
        if self.conversation.is_empty() {
            bail!("Conversation is empty. Add messages to export it.");
        }

        if self.structured_output {
            self.conversation
                .export_structured(self.effective_scenario()?, &self.placeholders)
        } else {
            Ok(self.conversation.export_plain())
        }
    }

    /// @ai:intent Tear the session down to a fresh state with a new identifier
    /// @ai:effects state:write
    pub fn reset(&mut self) {
        *self = Session::new();
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
