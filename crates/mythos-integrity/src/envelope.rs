//! # Envelope Schema
//!
//! A JSON Schema (Draft 7) for the scalar top-level fields of a document:
//! `id`, `name`, `type`, `mythology`, `images` and friends. The schema is
//! embedded in the binary and compiled once per run.
//!
//! Connection-bearing fields (`family`, `relatedEntities`, `allies`,
//! `enemies`, `corpusSearch`, `sources`, `primarySources`) are deliberately
//! absent from the schema. Their dedicated validators produce more precise
//! findings than a generic type mismatch would.

use jsonschema::Validator;
use mythos_core::{Issue, IssueKind, MythosError};
use serde_json::Value;

use crate::document::EntityDocument;
use crate::resolver::ReferenceResolver;
use crate::validators::FieldValidator;

/// The embedded envelope schema source.
pub const ENVELOPE_SCHEMA: &str = include_str!("../schemas/entity-envelope.schema.json");

/// Compiled envelope schema.
pub struct EnvelopeSchema {
    validator: Validator,
}

impl std::fmt::Debug for EnvelopeSchema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnvelopeSchema").finish_non_exhaustive()
    }
}

impl EnvelopeSchema {
    /// Compile the embedded schema.
    ///
    /// # Errors
    ///
    /// Returns [`MythosError::Schema`] if the embedded schema does not parse
    /// or compile.
    pub fn new() -> Result<Self, MythosError> {
        let schema: Value = serde_json::from_str(ENVELOPE_SCHEMA)
            .map_err(|e| MythosError::Schema(format!("envelope schema is not valid JSON: {e}")))?;
        Self::from_value(&schema)
    }

    /// Compile an arbitrary Draft 7 schema.
    pub fn from_value(schema: &Value) -> Result<Self, MythosError> {
        let mut opts = jsonschema::options();
        opts.with_draft(jsonschema::Draft::Draft7);
        let validator = opts
            .build(schema)
            .map_err(|e| MythosError::Schema(format!("envelope schema failed to compile: {e}")))?;
        Ok(Self { validator })
    }

    /// Check a document body, returning one `SCHEMA_VIOLATION` per failure.
    pub fn check(&self, doc: &EntityDocument) -> Vec<Issue> {
        let subject = doc.subject();
        self.validator
            .iter_errors(doc.body())
            .map(|e| {
                let pointer = e.instance_path.to_string();
                Issue::new(
                    IssueKind::SchemaViolation,
                    &subject,
                    field_for_pointer(&pointer),
                    e.to_string(),
                )
                .with_path(pointer)
            })
            .collect()
    }
}

impl FieldValidator for EnvelopeSchema {
    fn name(&self) -> &'static str {
        "envelope"
    }

    fn validate(&self, doc: &EntityDocument, _resolver: &ReferenceResolver<'_>) -> Vec<Issue> {
        self.check(doc)
    }
}

/// `/images/0` becomes `images[0]`; the root pointer becomes `<document>`.
fn field_for_pointer(pointer: &str) -> String {
    let mut field = String::new();
    for segment in pointer.split('/').filter(|s| !s.is_empty()) {
        if segment.bytes().all(|b| b.is_ascii_digit()) {
            field.push('[');
            field.push_str(segment);
            field.push(']');
        } else {
            if !field.is_empty() {
                field.push('.');
            }
            field.push_str(&segment.replace("~1", "/").replace("~0", "~"));
        }
    }
    if field.is_empty() {
        "<document>".to_string()
    } else {
        field
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::document::Provenance;
    use serde_json::json;

    fn doc(value: Value) -> EntityDocument {
        EntityDocument::from_value(
            value,
            Provenance {
                source_path: PathBuf::from("corpus/deities/zeus.json"),
                category: "deities".to_string(),
                tradition_dir: None,
            },
        )
        .unwrap()
    }

    #[test]
    fn embedded_schema_compiles() {
        EnvelopeSchema::new().unwrap();
    }

    #[test]
    fn well_formed_envelope_passes() {
        let schema = EnvelopeSchema::new().unwrap();
        let issues = schema.check(&doc(json!({
            "id": "zeus",
            "name": "Zeus",
            "type": "deity",
            "mythology": "greek",
            "images": [{"url": "zeus.png"}],
            "family": {"children": "whatever"}
        })));
        assert!(issues.is_empty(), "{issues:?}");
    }

    #[test]
    fn wrong_scalar_types_are_violations() {
        let schema = EnvelopeSchema::new().unwrap();
        let issues = schema.check(&doc(json!({
            "id": "zeus",
            "name": 42,
            "images": "zeus.png"
        })));
        assert_eq!(issues.len(), 2);
        assert!(issues.iter().all(|i| i.kind == IssueKind::SchemaViolation));
        let paths: Vec<_> = issues.iter().filter_map(|i| i.path.as_deref()).collect();
        assert!(paths.contains(&"/name"));
        assert!(paths.contains(&"/images"));
        let name = issues.iter().find(|i| i.field == "name").unwrap();
        assert!(name.message.contains("string"));
    }

    #[test]
    fn pointers_become_field_paths() {
        assert_eq!(field_for_pointer(""), "<document>");
        assert_eq!(field_for_pointer("/name"), "name");
        assert_eq!(field_for_pointer("/images/0/url"), "images[0].url");
        assert_eq!(field_for_pointer("/a~1b"), "a/b");
    }

    #[test]
    fn broken_schema_is_an_operational_error() {
        let err = EnvelopeSchema::from_value(&json!({"type": 12})).unwrap_err();
        assert!(matches!(err, MythosError::Schema(_)));
    }
}
