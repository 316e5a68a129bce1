//! @ai:module:intent Define error types for the MQM pipeline
//! @ai:module:layer domain
//! @ai:module:public_api Error, Result
//! @ai:module:stateless true

use thiserror::Error;

/// @ai:intent Unified error type for all MQM pipeline operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("corrupt annotation: {source}")]
    CorruptAnnotation {
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid character span: {0}")]
    InvalidSpan(String),

    #[error("{count} placeholder value(s) still empty")]
    UnresolvedPlaceholders { count: usize },

    #[error("unknown scenario tag: {0}")]
    UnknownScenario(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
