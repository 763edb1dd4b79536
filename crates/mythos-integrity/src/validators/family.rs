//! The `family` object and its six reference-list subfields.

use mythos_core::{Issue, IssueKind};
use serde_json::Value;

use super::FieldValidator;
use crate::document::EntityDocument;
use crate::resolver::ReferenceResolver;

/// Sub-fields of the `family` block. Each holds an array of references.
pub const FAMILY_FIELDS: &[&str] = &[
    "parents",
    "children",
    "siblings",
    "consorts",
    "ancestors",
    "descendants",
];

/// Checks the `family` block.
///
/// A sub-field written as free text is an error: the schema wants an array
/// of references, and a sentence cannot be resolved.
#[derive(Debug, Clone, Copy, Default)]
pub struct FamilyValidator;

impl FieldValidator for FamilyValidator {
    fn name(&self) -> &'static str {
        "family"
    }

    fn validate(&self, doc: &EntityDocument, resolver: &ReferenceResolver<'_>) -> Vec<Issue> {
        let Some(family) = doc.field("family") else {
            return Vec::new();
        };
        let subject = doc.subject();
        let Some(family) = family.as_object() else {
            return vec![Issue::new(
                IssueKind::InvalidFamilyFormat,
                &subject,
                "family",
                "family must be an object of reference arrays",
            )
            .with_value(family.to_string())];
        };

        let mut issues = Vec::new();
        for key in FAMILY_FIELDS {
            let field = format!("family.{key}");
            match family.get(*key) {
                None | Some(Value::Null) => {}
                Some(Value::String(text)) => issues.push(
                    Issue::new(
                        IssueKind::FamilyStringFormat,
                        &subject,
                        &field,
                        format!("{field} is free text; expected an array of references"),
                    )
                    .with_value(text.as_str()),
                ),
                Some(Value::Array(items)) => resolver.check_list(&subject, &field, items, &mut issues),
                Some(other) => issues.push(
                    Issue::new(
                        IssueKind::InvalidFamilyFormat,
                        &subject,
                        &field,
                        format!("{field} must be an array of references"),
                    )
                    .with_value(other.to_string()),
                ),
            }
        }
        issues
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::{doc, index};
    use super::*;
    use mythos_core::Severity;
    use serde_json::json;

    fn run(value: serde_json::Value) -> Vec<Issue> {
        let idx = index(&[json!({"id": "ares", "name": "Ares"})]);
        FamilyValidator.validate(&doc(value), &ReferenceResolver::new(&idx))
    }

    #[test]
    fn absent_family_is_silent() {
        assert!(run(json!({"id": "zeus"})).is_empty());
        assert!(run(json!({"id": "zeus", "family": null})).is_empty());
    }

    #[test]
    fn free_text_subfield_is_an_error() {
        let issues = run(json!({"id": "zeus", "family": {"parents": "Kronos and Rhea"}}));
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].kind, IssueKind::FamilyStringFormat);
        assert_eq!(issues[0].severity, Severity::Error);
        assert_eq!(issues[0].field, "family.parents");
    }

    #[test]
    fn arrays_delegate_to_resolver() {
        let issues = run(json!({"id": "zeus", "family": {
            "children": [{"id": "ares", "name": "Ares"}, "hercules"]
        }}));
        let kinds: Vec<_> = issues.iter().map(|i| i.kind).collect();
        assert_eq!(
            kinds,
            vec![IssueKind::StringReference, IssueKind::UnresolvedStringReference]
        );
        assert!(issues.iter().all(|i| i.field == "family.children[1]"));
        assert!(issues.iter().all(|i| i.severity == Severity::Warning));
    }

    #[test]
    fn wrong_shapes_are_invalid_format() {
        let issues = run(json!({"id": "zeus", "family": ["ares"]}));
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].kind, IssueKind::InvalidFamilyFormat);

        let issues = run(json!({"id": "zeus", "family": {"siblings": {"id": "hera"}}}));
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].field, "family.siblings");
    }
}
