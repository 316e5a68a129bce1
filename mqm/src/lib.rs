//! @ai:module:intent MQM annotation pipeline for translation evaluation
//! @ai:module:layer domain
//! @ai:module:public_api taxonomy, annotation, schema, scenario, placeholders, flatten, export

pub mod annotation;
pub mod error;
pub mod export;
pub mod flatten;
pub mod placeholders;
pub mod scenario;
pub mod schema;
pub mod taxonomy;

pub use annotation::{MQMAnnotation, MQMError, TokenInfo};
pub use error::{Error, Result};
pub use export::{export_plain, export_rows, parse_rows, ExportArtifact};
pub use flatten::{flatten_annotation, FlatRow};
pub use placeholders::Placeholders;
pub use scenario::Scenario;
pub use schema::{annotation_schema, compile_strict, strict_schema};
pub use taxonomy::{ErrorCategory, Severity};
