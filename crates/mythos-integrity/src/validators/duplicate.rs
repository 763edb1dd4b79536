//! Surfaces identifier collisions recorded while the index was built.

use mythos_core::{Issue, IssueKind};

use super::FieldValidator;
use crate::document::EntityDocument;
use crate::resolver::ReferenceResolver;

/// Flags the surviving document of every identifier collision, once per
/// document that it replaced.
#[derive(Debug, Clone, Copy, Default)]
pub struct DuplicateIdValidator;

impl FieldValidator for DuplicateIdValidator {
    fn name(&self) -> &'static str {
        "duplicate-id"
    }

    fn validate(&self, doc: &EntityDocument, resolver: &ReferenceResolver<'_>) -> Vec<Issue> {
        let subject = doc.subject();
        resolver
            .index()
            .duplicates()
            .iter()
            .filter(|d| d.id == doc.id())
            .map(|d| {
                Issue::new(
                    IssueKind::DuplicateId,
                    &subject,
                    "id",
                    format!(
                        "id \"{}\" is also used by {}; that document was dropped from the index",
                        d.id,
                        d.replaced_path.display()
                    ),
                )
                .with_path(d.replaced_path.display().to_string())
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::document::Provenance;
    use crate::index::CorpusIndexBuilder;
    use serde_json::json;

    fn at(path: &str, name: &str) -> EntityDocument {
        EntityDocument::from_value(
            json!({"id": "zeus", "name": name}),
            Provenance {
                source_path: PathBuf::from(path),
                category: "deities".to_string(),
                tradition_dir: None,
            },
        )
        .unwrap()
    }

    #[test]
    fn survivor_carries_one_warning_per_dropped_document() {
        let mut builder = CorpusIndexBuilder::new();
        builder.insert(at("a/zeus.json", "A"));
        builder.insert(at("b/zeus.json", "B"));
        builder.insert(at("c/zeus.json", "C"));
        let index = builder.build();
        let survivor = index.get("zeus").unwrap();

        let issues = DuplicateIdValidator.validate(survivor, &ReferenceResolver::new(&index));
        assert_eq!(issues.len(), 2);
        assert!(issues.iter().all(|i| i.kind == IssueKind::DuplicateId && i.field == "id"));
        let dropped: Vec<_> = issues.iter().filter_map(|i| i.path.as_deref()).collect();
        assert_eq!(dropped, vec!["a/zeus.json", "b/zeus.json"]);
    }

    #[test]
    fn unique_ids_are_clean() {
        let mut builder = CorpusIndexBuilder::new();
        builder.insert(at("a/zeus.json", "A"));
        let index = builder.build();
        let doc = index.get("zeus").unwrap();
        assert!(DuplicateIdValidator.validate(doc, &ReferenceResolver::new(&index)).is_empty());
    }
}
