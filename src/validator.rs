//! Structural validation of descriptor files against an embedded JSON Schema.

use std::sync::OnceLock;

use serde_json::{json, Value};

use crate::error::{LoadError, SchemaError};

/// JSON Schema every descriptor file must satisfy.
pub fn descriptor_schema() -> &'static Value {
    static SCHEMA: OnceLock<Value> = OnceLock::new();
    SCHEMA.get_or_init(|| {
        json!({
            "$schema": "https://json-schema.org/draft/2020-12/schema",
            "type": "object",
            "required": ["resources"],
            "additionalProperties": false,
            "properties": {
                "resources": {
                    "type": "array",
                    "items": { "$ref": "#/$defs/resource" }
                }
            },
            "$defs": {
                "stringList": {
                    "type": "array",
                    "items": { "type": "string" }
                },
                "doc": {
                    "type": "object",
                    "additionalProperties": false,
                    "properties": {
                        "value": { "$ref": "#/$defs/stringList" },
                        "link": { "type": "string" },
                        "include": { "type": "string" }
                    }
                },
                "hrefVar": {
                    "type": "object",
                    "additionalProperties": false,
                    "properties": {
                        "type": { "enum": ["integer", "string"] },
                        "pattern": { "type": "string" },
                        "doc": { "$ref": "#/$defs/doc" }
                    }
                },
                "hints": {
                    "type": "object",
                    "additionalProperties": false,
                    "properties": {
                        "allow": {
                            "type": "array",
                            "items": {
                                "enum": ["GET", "HEAD", "POST", "PUT", "PATCH", "DELETE", "OPTIONS"]
                            }
                        },
                        "representations": { "$ref": "#/$defs/stringList" },
                        "accept-put": { "$ref": "#/$defs/stringList" },
                        "accept-post": { "$ref": "#/$defs/stringList" },
                        "precondition-req": {
                            "type": "array",
                            "items": { "enum": ["etag", "last-modified"] }
                        },
                        "auth-req": {
                            "type": "array",
                            "items": {
                                "type": "object",
                                "required": ["scheme"],
                                "additionalProperties": false,
                                "properties": {
                                    "scheme": { "type": "string", "minLength": 1 },
                                    "realms": { "$ref": "#/$defs/stringList" }
                                }
                            }
                        },
                        "status": { "enum": ["current", "deprecated", "gone"] }
                    }
                },
                "resource": {
                    "type": "object",
                    "required": ["rel"],
                    "additionalProperties": false,
                    "properties": {
                        "rel": { "type": "string", "minLength": 1 },
                        "href": { "type": "string" },
                        "href-template": { "type": "string" },
                        "href-vars": {
                            "type": "object",
                            "additionalProperties": { "$ref": "#/$defs/hrefVar" }
                        },
                        "hints": { "$ref": "#/$defs/hints" },
                        "doc": { "$ref": "#/$defs/doc" }
                    }
                }
            }
        })
    })
}

/// Check a parsed descriptor document against [`descriptor_schema`].
///
/// # Errors
///
/// Returns `LoadError::Invalid` listing every violation with its JSON Pointer.
pub fn validate_descriptors(document: &Value) -> Result<(), LoadError> {
    let errors = schema_errors(document);
    if errors.is_empty() {
        Ok(())
    } else {
        Err(LoadError::Invalid { errors })
    }
}

/// All schema violations of a descriptor document.
pub fn schema_errors(document: &Value) -> Vec<SchemaError> {
    let validator = match jsonschema::validator_for(descriptor_schema()) {
        Ok(validator) => validator,
        Err(e) => {
            return vec![SchemaError {
                path: "/".to_string(),
                message: format!("descriptor schema failed to compile: {e}"),
            }]
        }
    };

    validator
        .iter_errors(document)
        .map(|e| SchemaError {
            path: e.instance_path.to_string(),
            message: e.to_string(),
        })
        .collect()
}
