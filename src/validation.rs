//! Input validation for collection names, document ids and payloads
//!
//! Mirrors the limits the document database enforces so that malformed
//! requests fail before they reach the gateway.

use crate::error::{Result, StoreError};
use serde_json::Value;

/// Maximum document id length in bytes
const MAX_DOCUMENT_ID_BYTES: usize = 1500;

/// Maximum allowed size for a document payload (1MB)
const MAX_DOCUMENT_SIZE_BYTES: usize = 1024 * 1024;

/// Maximum nesting depth for document fields
const MAX_DOCUMENT_DEPTH: usize = 20;

pub fn validate_collection_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(StoreError::validation("Collection name must not be empty"));
    }
    if name.contains('/') {
        return Err(StoreError::validation(format!(
            "Collection name must not contain '/': {name}"
        )));
    }
    Ok(())
}

pub fn validate_document_id(id: &str) -> Result<()> {
    if id.trim().is_empty() {
        return Err(StoreError::validation("Document id must not be empty"));
    }
    if id.contains('/') {
        return Err(StoreError::validation(format!(
            "Document id must not contain '/': {id}"
        )));
    }
    if id.len() > MAX_DOCUMENT_ID_BYTES {
        return Err(StoreError::validation(format!(
            "Document id too long: {} bytes (max: {MAX_DOCUMENT_ID_BYTES})",
            id.len()
        )));
    }
    Ok(())
}

/// Validates a document payload: must be an object within size and depth limits
pub fn validate_document_payload(value: &Value) -> Result<()> {
    if !value.is_object() {
        return Err(StoreError::validation("Document payload must be a JSON object"));
    }

    let serialized = serde_json::to_string(value)?;
    if serialized.len() > MAX_DOCUMENT_SIZE_BYTES {
        return Err(StoreError::validation(format!(
            "Document too large: {} bytes (max: {MAX_DOCUMENT_SIZE_BYTES})",
            serialized.len()
        )));
    }

    validate_depth(value, 0)
}

fn validate_depth(value: &Value, depth: usize) -> Result<()> {
    if depth > MAX_DOCUMENT_DEPTH {
        return Err(StoreError::validation(format!(
            "Document nesting too deep: {depth} (max: {MAX_DOCUMENT_DEPTH})"
        )));
    }

    match value {
        Value::Object(map) => map.values().try_for_each(|v| validate_depth(v, depth + 1)),
        Value::Array(items) => items.iter().try_for_each(|v| validate_depth(v, depth + 1)),
        _ => Ok(()),
    }
}
