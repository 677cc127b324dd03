use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde_json::Value;

use crate::domain::{FormDocument, parse_form_document};

use super::DocumentFormat;

/// Parse structured data in any supported format into a `serde_json::Value`.
pub fn parse_document_str(contents: &str, format: DocumentFormat) -> Result<Value> {
    match format {
        DocumentFormat::Json => {
            serde_json::from_str::<Value>(contents).with_context(|| "failed to parse JSON document")
        }
        #[cfg(feature = "yaml")]
        DocumentFormat::Yaml => {
            serde_yaml::from_str::<Value>(contents).with_context(|| "failed to parse YAML document")
        }
        #[cfg(feature = "toml")]
        DocumentFormat::Toml => contents
            .parse::<toml::Value>()
            .with_context(|| "failed to parse TOML document")
            .and_then(|value| {
                serde_json::to_value(value).context("failed to convert TOML to JSON")
            }),
    }
}

/// Parse a descriptor document (`{"title", "fields", "schema"}`) from text.
pub fn load_form_document_str(contents: &str, format: DocumentFormat) -> Result<FormDocument> {
    let value = parse_document_str(contents, format)?;
    parse_form_document(&value).context("invalid form descriptor")
}

/// Read a descriptor document from disk. The format follows the file
/// extension, JSON when there is none.
pub fn load_form_document(path: &Path) -> Result<FormDocument> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let format = DocumentFormat::from_path(path).unwrap_or_default();
    tracing::debug!(path = %path.display(), %format, "loading form document");
    load_form_document_str(&contents, format)
        .with_context(|| format!("failed to load form from {}", path.display()))
}

/// Read any data document (schema, initial values) from disk.
pub fn load_value(path: &Path) -> Result<Value> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let format = DocumentFormat::from_path(path).unwrap_or_default();
    parse_document_str(&contents, format)
        .with_context(|| format!("failed to parse {}", path.display()))
}
