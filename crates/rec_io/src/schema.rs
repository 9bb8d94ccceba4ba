//! JSON Schema (draft 7) shape validation for inputs.
//!
//! Schemas are compiled from files embedded at build time, so validation
//! never touches the filesystem or the network.

use jsonschema::{Draft, JSONSchema};
use serde_json::Value;

use crate::{IoError, IoResult};

const REQUEST_SCHEMA: &str = include_str!("../schemas/recommendation_request.schema.json");
const PARAMS_SCHEMA: &str = include_str!("../schemas/params.schema.json");

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaKind {
    RecommendationRequest,
    Params,
}

impl SchemaKind {
    fn source(self) -> &'static str {
        match self {
            SchemaKind::RecommendationRequest => REQUEST_SCHEMA,
            SchemaKind::Params => PARAMS_SCHEMA,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SchemaKind::RecommendationRequest => "recommendation_request",
            SchemaKind::Params => "params",
        }
    }
}

fn compile(kind: SchemaKind) -> IoResult<JSONSchema> {
    let schema: Value = serde_json::from_str(kind.source()).map_err(|e| IoError::Schema {
        pointer: "/".into(),
        msg: format!("embedded {} schema is not JSON: {e}", kind.label()),
    })?;
    JSONSchema::options()
        .with_draft(Draft::Draft7)
        .compile(&schema)
        .map_err(|e| IoError::Schema {
            pointer: "/".into(),
            msg: format!("embedded {} schema does not compile: {e}", kind.label()),
        })
}

/// Validate `value` against the schema for `kind`.
///
/// On failure reports the violation with the smallest instance pointer, so
/// the same bad document always yields the same message.
pub fn validate_value(kind: SchemaKind, value: &Value) -> IoResult<()> {
    let compiled = compile(kind)?;
    let result = compiled.validate(value);
    if let Err(errors) = result {
        let mut found: Vec<(String, String)> =
            errors.map(|e| (e.instance_path.to_string(), e.to_string())).collect();
        found.sort();
        if let Some((pointer, msg)) = found.into_iter().next() {
            let pointer = if pointer.is_empty() { "/".to_string() } else { pointer };
            return Err(IoError::Schema { pointer, msg });
        }
    }
    Ok(())
}
