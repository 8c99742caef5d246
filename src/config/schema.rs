//! JSON Schema validation for the portal configuration document

use crate::error::PortalError;
use jsonschema::{Draft, Validator};
use serde_json::Value;
use std::sync::OnceLock;

/// Raw text of the embedded draft-7 schema
pub const SCHEMA_JSON: &str = include_str!("../../docs/schema.json");

/// Get the compiled schema, compiling it on first use
///
/// # Errors
///
/// Returns a parse error if the embedded schema itself is invalid
pub fn get_schema() -> Result<&'static Validator, PortalError> {
    static SCHEMA: OnceLock<Result<Validator, String>> = OnceLock::new();

    SCHEMA
        .get_or_init(|| {
            let schema: Value = serde_json::from_str(SCHEMA_JSON)
                .map_err(|e| format!("Failed to parse embedded JSON schema: {e}"))?;
            jsonschema::options()
                .with_draft(Draft::Draft7)
                .build(&schema)
                .map_err(|e| format!("Failed to compile JSON schema: {e}"))
        })
        .as_ref()
        .map_err(|message| PortalError::parse(message.clone()))
}

/// Validate a raw configuration value against the schema
///
/// # Errors
///
/// Returns a parse error listing every violation
pub fn validate_against_schema(config: &Value) -> Result<(), PortalError> {
    let schema = get_schema()?;

    if schema.is_valid(config) {
        return Ok(());
    }

    let error_messages: Vec<String> = schema
        .iter_errors(config)
        .map(|e| format!("  - Path '{}': {}", e.instance_path, e))
        .collect();

    Err(PortalError::parse(format!(
        "schema validation failed:\n{}",
        error_messages.join("\n")
    )))
}
