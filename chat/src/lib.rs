//! @ai:module:intent Lexeval chat application library
//! @ai:module:layer application
//! @ai:module:public_api client, config, conversation, models, prompt, session

pub mod client;
pub mod config;
pub mod conversation;
pub mod models;
pub mod prompt;
pub mod session;

pub use client::{LlmClientTrait, LlmResponse, MockLlmClient, OpenAiClient, ResponseFormat, Usage};
pub use config::{ApiConfig, AppConfig, ExportConfig};
pub use conversation::{ConversationHandler, Message, Role};
pub use models::{GptModel, ModelMeta};
pub use session::Session;
