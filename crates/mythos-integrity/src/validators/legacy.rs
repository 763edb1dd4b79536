//! Legacy field detection and resolution of pre-migration flat arrays.

use mythos_core::{Issue, IssueKind, LEGACY_FIELD_MAP};
use serde_json::Value;

use super::FieldValidator;
use crate::document::EntityDocument;
use crate::resolver::ReferenceResolver;

/// One `LEGACY_FIELD` warning per deprecated key present on the document.
///
/// The corpus-wide usage counter is derived from these issues by the
/// aggregator, so exactly one increment happens per occurrence.
#[derive(Debug, Clone, Copy, Default)]
pub struct LegacyFieldDetector;

impl FieldValidator for LegacyFieldDetector {
    fn name(&self) -> &'static str {
        "legacy-fields"
    }

    fn validate(&self, doc: &EntityDocument, _resolver: &ReferenceResolver<'_>) -> Vec<Issue> {
        let subject = doc.subject();
        LEGACY_FIELD_MAP
            .iter()
            .filter(|legacy| doc.has_key(legacy.name))
            .map(|legacy| {
                Issue::new(
                    IssueKind::LegacyField,
                    &subject,
                    legacy.name,
                    format!(
                        "legacy field \"{}\" should be migrated to \"{}\"",
                        legacy.name, legacy.canonical_path
                    ),
                )
                .with_replacement(legacy.canonical_path)
            })
            .collect()
    }
}

/// Resolves the contents of legacy flat arrays against the index.
///
/// Bare strings only raise `UNRESOLVED_STRING_REFERENCE` when neither the
/// normalized id nor a name match finds a document. Objects get the full
/// structured-reference checks.
#[derive(Debug, Clone, Copy, Default)]
pub struct LegacyArrayValidator;

impl FieldValidator for LegacyArrayValidator {
    fn name(&self) -> &'static str {
        "legacy-arrays"
    }

    fn validate(&self, doc: &EntityDocument, resolver: &ReferenceResolver<'_>) -> Vec<Issue> {
        let subject = doc.subject();
        let mut issues = Vec::new();
        for legacy in LEGACY_FIELD_MAP {
            match doc.field(legacy.name) {
                Some(Value::Array(items)) => {
                    for (i, item) in items.iter().enumerate() {
                        let field = format!("{}[{i}]", legacy.name);
                        resolver.check_legacy_value(&subject, &field, item, &mut issues);
                    }
                }
                Some(single @ Value::String(_)) => {
                    resolver.check_legacy_value(&subject, legacy.name, single, &mut issues);
                }
                _ => {}
            }
        }
        issues
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::{doc, index};
    use super::*;
    use serde_json::json;

    #[test]
    fn one_warning_per_legacy_key() {
        let idx = index(&[]);
        let d = doc(json!({
            "id": "zeus",
            "relatedHeroes": [],
            "spouses": null,
            "relatedEntities": {}
        }));
        let issues = LegacyFieldDetector.validate(&d, &ReferenceResolver::new(&idx));
        assert_eq!(issues.len(), 2);
        assert!(issues.iter().all(|i| i.kind == IssueKind::LegacyField));
        let replacements: Vec<_> = issues.iter().filter_map(|i| i.replacement.as_deref()).collect();
        assert_eq!(replacements, vec!["relatedEntities.heroes", "family.consorts"]);
    }

    #[test]
    fn resolvable_legacy_strings_are_silent() {
        let idx = index(&[
            json!({"id": "perseus", "name": "Perseus"}),
            json!({"id": "athena", "name": "Pallas Athena"}),
        ]);
        let d = doc(json!({
            "id": "zeus",
            "relatedHeroes": ["Perseus", "Hercules"],
            "relatedDeities": "athena"
        }));
        let issues = LegacyArrayValidator.validate(&d, &ReferenceResolver::new(&idx));
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].kind, IssueKind::UnresolvedStringReference);
        assert_eq!(issues[0].field, "relatedHeroes[1]");
        assert_eq!(issues[0].attempted_id.as_deref(), Some("hercules"));
    }

    #[test]
    fn partial_name_match_resolves_legacy_strings() {
        let idx = index(&[json!({"id": "pallas-athena", "name": "Pallas Athena"})]);
        let d = doc(json!({"id": "zeus", "relatedDeities": ["Athena"]}));
        assert!(LegacyArrayValidator
            .validate(&d, &ReferenceResolver::new(&idx))
            .is_empty());
    }

    #[test]
    fn structured_legacy_elements_get_full_checks() {
        let idx = index(&[]);
        let d = doc(json!({"id": "zeus", "children": [{"id": "ares", "name": "Ares"}, 7]}));
        let kinds: Vec<_> = LegacyArrayValidator
            .validate(&d, &ReferenceResolver::new(&idx))
            .into_iter()
            .map(|i| i.kind)
            .collect();
        assert_eq!(kinds, vec![IssueKind::BrokenLink, IssueKind::InvalidReference]);
    }
}
