//! @ai:module:intent Encode conversations and flattened tables into export artifacts
//! @ai:module:layer infrastructure
//! @ai:module:public_api export_plain, export_rows, parse_rows, ExportArtifact
//! @ai:module:depends_on flatten, error
//! @ai:module:stateless true

use crate::error::Result;
use crate::flatten::FlatRow;

/// @ai:intent Raw export bytes with their file-extension and MIME tags
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub bytes: Vec<u8>,
    pub file_type: &'static str,
    pub mime_type: &'static str,
}

/// @ai:intent Encode conversation turns as plain text
///
/// Turn contents are trimmed of surrounding whitespace and joined with one
/// blank line as separator.
/// @ai:effects pure
pub fn export_plain(turns: &[String]) -> ExportArtifact {
    let text = turns
        .iter()
        .map(|turn| turn.trim())
        .collect::<Vec<_>>()
        .join("\n\n");

    ExportArtifact {
        bytes: text.into_bytes(),
        file_type: "txt",
        mime_type: "text/plain",
    }
}

/// @ai:intent Encode a flattened table as CSV
///
/// Every [`FlatRow`] field is one column and every error one record, in the
/// order the flattener produced them. Missing markers render as blank cells.
/// @ai:effects pure
pub fn export_rows(rows: &[FlatRow]) -> Result<ExportArtifact> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for row in rows {
        writer.serialize(row)?;
    }
    let bytes = writer.into_inner().map_err(|e| e.into_error())?;

    Ok(ExportArtifact {
        bytes,
        file_type: "csv",
        mime_type: "text/csv",
    })
}

/// @ai:intent Parse CSV bytes back into flattened rows
/// @ai:effects pure
pub fn parse_rows(bytes: &[u8]) -> Result<Vec<FlatRow>> {
    let mut reader = csv::Reader::from_reader(bytes);
    let mut rows = Vec::new();
    for record in reader.deserialize() {
        rows.push(record?);
    }
    Ok(rows)
}
