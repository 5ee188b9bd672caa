use crate::document::MapDocument;
use crate::error::{MapError, ValidationWarning};
use macroquad::logging::warn;
use std::path::Path;

/// A best-effort loaded document plus everything the validator dropped or
/// defaulted on the way in.
#[derive(Debug)]
pub struct DecodedDocument {
    pub document: MapDocument,
    pub warnings: Vec<ValidationWarning>,
}

/// Structural JSON decode only; no validation. `source` is the path or URL
/// used in error messages.
pub fn parse_document(json: &str, source: &str) -> Result<MapDocument, MapError> {
    serde_json::from_str(json).map_err(|cause| MapError::MalformedDocument {
        source: source.to_owned(),
        cause,
    })
}

/// Validate a parsed document in place, logging each dropped record.
pub fn validate_document(mut document: MapDocument) -> DecodedDocument {
    let warnings = document.validate();
    for w in &warnings {
        warn!("map validation: {}", w);
    }
    DecodedDocument { document, warnings }
}

/// Parse + validate in one step for synchronous callers.
pub fn decode_document(json: &str, source: &str) -> Result<DecodedDocument, MapError> {
    Ok(validate_document(parse_document(json, source)?))
}

/// Read and decode a `.json` map file. Any other extension is rejected before
/// touching the filesystem.
pub fn decode_document_file(path: &Path) -> Result<DecodedDocument, MapError> {
    if path.extension().and_then(|e| e.to_str()) != Some("json") {
        return Err(MapError::UnsupportedFormat(path.display().to_string()));
    }
    let txt = std::fs::read_to_string(path).map_err(|cause| MapError::SourceUnavailable {
        source: path.display().to_string(),
        cause,
    })?;
    decode_document(&txt, &path.display().to_string())
}
