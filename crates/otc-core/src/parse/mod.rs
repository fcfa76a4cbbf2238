pub mod document;
pub mod operation;
pub mod schema;

use crate::error::ParseError;
use document::ApiDocument;

/// Parse a document from YAML.
pub fn from_yaml(input: &str) -> Result<ApiDocument, ParseError> {
    let document: ApiDocument = serde_yaml_ng::from_str(input)?;
    validate_version(&document)?;
    Ok(document)
}

/// Parse a document from JSON.
pub fn from_json(input: &str) -> Result<ApiDocument, ParseError> {
    let document: ApiDocument = serde_json::from_str(input)?;
    validate_version(&document)?;
    Ok(document)
}

fn validate_version(document: &ApiDocument) -> Result<(), ParseError> {
    if !document.openapi.starts_with("3.") {
        return Err(ParseError::UnsupportedVersion(document.openapi.clone()));
    }
    Ok(())
}
