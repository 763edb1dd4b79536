//! `relatedEntities` (flat list or category map) and the `allies` / `enemies` lists.

use mythos_core::{EntityType, Issue, IssueKind};
use serde_json::Value;

use super::FieldValidator;
use crate::document::EntityDocument;
use crate::resolver::ReferenceResolver;

/// Checks `relatedEntities`, either a flat reference array or a map of
/// entity category to reference array.
///
/// Unknown category keys are warnings; their contents are still checked.
#[derive(Debug, Clone, Copy, Default)]
pub struct RelatedEntitiesValidator;

impl FieldValidator for RelatedEntitiesValidator {
    fn name(&self) -> &'static str {
        "related-entities"
    }

    fn validate(&self, doc: &EntityDocument, resolver: &ReferenceResolver<'_>) -> Vec<Issue> {
        let Some(related) = doc.field("relatedEntities") else {
            return Vec::new();
        };
        let subject = doc.subject();
        let mut issues = Vec::new();

        match related {
            Value::Array(items) => resolver.check_list(&subject, "relatedEntities", items, &mut issues),
            Value::Object(buckets) => {
                for (key, value) in buckets {
                    let field = format!("relatedEntities.{key}");
                    if EntityType::from_category_key(key).is_none() {
                        issues.push(
                            Issue::new(
                                IssueKind::UnknownEntityCategory,
                                &subject,
                                &field,
                                format!("\"{key}\" is not a known entity category"),
                            )
                            .with_value(key.as_str()),
                        );
                    }
                    match value {
                        Value::Array(items) => resolver.check_list(&subject, &field, items, &mut issues),
                        Value::Null => {}
                        other => issues.push(
                            Issue::new(
                                IssueKind::InvalidRelatedEntities,
                                &subject,
                                &field,
                                format!("{field} must be an array of references"),
                            )
                            .with_value(other.to_string()),
                        ),
                    }
                }
            }
            other => issues.push(
                Issue::new(
                    IssueKind::InvalidRelatedEntities,
                    &subject,
                    "relatedEntities",
                    "relatedEntities must be an array or a map of category to references",
                )
                .with_value(other.to_string()),
            ),
        }
        issues
    }
}

/// Checks the flat `allies` and `enemies` lists.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllyEnemyValidator;

impl FieldValidator for AllyEnemyValidator {
    fn name(&self) -> &'static str {
        "allies-enemies"
    }

    fn validate(&self, doc: &EntityDocument, resolver: &ReferenceResolver<'_>) -> Vec<Issue> {
        let subject = doc.subject();
        let mut issues = Vec::new();
        for field in ["allies", "enemies"] {
            match doc.field(field) {
                None => {}
                Some(Value::Array(items)) => resolver.check_list(&subject, field, items, &mut issues),
                Some(other) => issues.push(
                    Issue::new(
                        IssueKind::InvalidReferenceList,
                        &subject,
                        field,
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
    use serde_json::json;

    fn kinds(issues: &[Issue]) -> Vec<IssueKind> {
        issues.iter().map(|i| i.kind).collect()
    }

    #[test]
    fn category_map_accepts_singular_and_plural_keys() {
        let idx = index(&[
            json!({"id": "perseus", "name": "Perseus"}),
            json!({"id": "medusa", "name": "Medusa"}),
        ]);
        let d = doc(json!({"id": "athena", "relatedEntities": {
            "heroes": [{"id": "perseus", "name": "Perseus"}],
            "creature": [{"id": "medusa", "name": "Medusa"}]
        }}));
        assert!(RelatedEntitiesValidator
            .validate(&d, &ReferenceResolver::new(&idx))
            .is_empty());
    }

    #[test]
    fn unknown_category_warns_and_still_checks_contents() {
        let idx = index(&[]);
        let d = doc(json!({"id": "athena", "relatedEntities": {
            "weapons": [{"id": "aegis", "name": "Aegis"}]
        }}));
        let issues = RelatedEntitiesValidator.validate(&d, &ReferenceResolver::new(&idx));
        assert_eq!(
            kinds(&issues),
            vec![IssueKind::UnknownEntityCategory, IssueKind::BrokenLink]
        );
        assert_eq!(issues[1].field, "relatedEntities.weapons[0]");
    }

    #[test]
    fn flat_array_form_is_accepted() {
        let idx = index(&[json!({"id": "zeus", "name": "Zeus"})]);
        let d = doc(json!({"id": "athena", "relatedEntities": [{"id": "zeus", "name": "Zeus"}]}));
        assert!(RelatedEntitiesValidator
            .validate(&d, &ReferenceResolver::new(&idx))
            .is_empty());
    }

    #[test]
    fn non_array_bucket_and_scalar_field_are_invalid() {
        let idx = index(&[]);
        let d = doc(json!({"id": "athena", "relatedEntities": {"deities": "zeus", "heroes": null}}));
        let issues = RelatedEntitiesValidator.validate(&d, &ReferenceResolver::new(&idx));
        assert_eq!(kinds(&issues), vec![IssueKind::InvalidRelatedEntities]);
        assert_eq!(issues[0].field, "relatedEntities.deities");

        let d = doc(json!({"id": "athena", "relatedEntities": "zeus"}));
        let issues = RelatedEntitiesValidator.validate(&d, &ReferenceResolver::new(&idx));
        assert_eq!(kinds(&issues), vec![IssueKind::InvalidRelatedEntities]);
    }

    #[test]
    fn scenario_name_without_id_is_not_a_broken_link() {
        let idx = index(&[]);
        let d = doc(json!({"id": "zeus", "allies": [{"name": "poseidon"}]}));
        let issues = AllyEnemyValidator.validate(&d, &ReferenceResolver::new(&idx));
        assert_eq!(kinds(&issues), vec![IssueKind::MissingReferenceId]);
    }

    #[test]
    fn scenario_unindexed_id_is_one_broken_link() {
        let idx = index(&[]);
        let d = doc(json!({"id": "zeus", "allies": [{"id": "poseidon-x", "name": "Poseidon"}]}));
        let issues = AllyEnemyValidator.validate(&d, &ReferenceResolver::new(&idx));
        assert_eq!(kinds(&issues), vec![IssueKind::BrokenLink]);
    }

    #[test]
    fn non_array_lists_are_invalid() {
        let idx = index(&[]);
        let d = doc(json!({"id": "zeus", "enemies": {"id": "typhon"}}));
        let issues = AllyEnemyValidator.validate(&d, &ReferenceResolver::new(&idx));
        assert_eq!(kinds(&issues), vec![IssueKind::InvalidReferenceList]);
        assert_eq!(issues[0].field, "enemies");
    }
}
