//! Protected-data submission flow
//!
//! Linear pipeline from a selected file to a submittable draft: screen the
//! file (extension, size ceiling) before parsing, parse, validate, and
//! normalize. The draft holds the before/after values for preview; it is
//! cleared only after a successful protect call, so a failed submission can
//! be retried without re-selecting the file.

use serde::Serialize;
use serde_json::Value;

use crate::error::ProtectorError;
use crate::transform::arrays_to_objects;
use crate::validate::validate_document;

/// Size ceiling for uploaded files
pub const MAX_FILE_BYTES: u64 = 1024 * 1024;

/// Screen a file selection before its content is read
pub fn check_file(file_name: &str, size_bytes: u64) -> Result<(), ProtectorError> {
    if !file_name.ends_with(".json") {
        return Err(ProtectorError::InvalidFile(
            "Please upload a JSON file".to_string(),
        ));
    }
    if size_bytes > MAX_FILE_BYTES {
        return Err(ProtectorError::InvalidFile(
            "File size must be less than 1MB".to_string(),
        ));
    }
    Ok(())
}

/// A prepared upload: parsed document, its normalized form, and the display
/// name submitted with it
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadDraft {
    /// Display name for the record (the file name)
    pub name: String,
    /// Document as parsed from the file
    pub original: Value,
    /// Document with arrays rewritten for the SDK's schema format
    pub transformed: Value,
}

impl UploadDraft {
    /// Build a draft from a selected file: screen, parse, validate, normalize
    pub fn prepare(file_name: &str, content: &str) -> Result<Self, ProtectorError> {
        check_file(file_name, content.len() as u64)?;

        let original: Value =
            serde_json::from_str(content).map_err(|_| ProtectorError::InvalidJson)?;
        validate_document(&original)?;
        let transformed = arrays_to_objects(&original);

        Ok(UploadDraft {
            name: file_name.to_string(),
            original,
            transformed,
        })
    }
}
