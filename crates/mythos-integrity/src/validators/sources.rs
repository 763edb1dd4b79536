//! `sources` and `primarySources` citation entries.

use mythos_core::{Issue, IssueKind};
use serde_json::Value;

use super::urls::is_valid_url;
use super::FieldValidator;
use crate::document::EntityDocument;
use crate::resolver::ReferenceResolver;

/// Keys that identify a citation. At least one must be present.
pub const SOURCE_TITLE_KEYS: &[&str] = &["title", "text", "source", "citation", "work"];

const SOURCE_FIELDS: &[&str] = &["sources", "primarySources"];

/// Checks citation lists in `sources` and `primarySources`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SourcesValidator;

impl FieldValidator for SourcesValidator {
    fn name(&self) -> &'static str {
        "sources"
    }

    fn validate(&self, doc: &EntityDocument, _resolver: &ReferenceResolver<'_>) -> Vec<Issue> {
        let subject = doc.subject();
        let mut issues = Vec::new();

        for field in SOURCE_FIELDS {
            let Some(value) = doc.field(field) else {
                continue;
            };
            let Some(entries) = value.as_array() else {
                issues.push(
                    Issue::new(
                        IssueKind::InvalidSources,
                        &subject,
                        *field,
                        format!("{field} must be an array of citation objects"),
                    )
                    .with_value(value.to_string()),
                );
                continue;
            };

            for (i, entry) in entries.iter().enumerate() {
                let entry_field = format!("{field}[{i}]");
                let Some(citation) = entry.as_object() else {
                    issues.push(
                        Issue::new(
                            IssueKind::InvalidSourceEntry,
                            &subject,
                            &entry_field,
                            "source entry must be an object",
                        )
                        .with_value(entry.to_string()),
                    );
                    continue;
                };

                let titled = SOURCE_TITLE_KEYS
                    .iter()
                    .any(|key| citation.get(*key).is_some_and(has_content));
                if !titled {
                    issues.push(Issue::new(
                        IssueKind::MissingSourceTitle,
                        &subject,
                        &entry_field,
                        "source entry has no title, text or source identifier",
                    ));
                }

                match citation.get("url") {
                    None | Some(Value::Null) => {}
                    Some(Value::String(url)) if is_valid_url(url) => {}
                    Some(other) => {
                        let shown = other.as_str().map_or_else(|| other.to_string(), str::to_string);
                        issues.push(
                            Issue::new(
                                IssueKind::InvalidSourceUrl,
                                &subject,
                                format!("{entry_field}.url"),
                                format!("\"{shown}\" is not a valid source URL"),
                            )
                            .with_value(shown),
                        );
                    }
                }
            }
        }
        issues
    }
}

fn has_content(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.trim().is_empty(),
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::{doc, index};
    use super::*;
    use mythos_core::Severity;
    use serde_json::json;

    fn run(value: serde_json::Value) -> Vec<Issue> {
        let idx = index(&[]);
        SourcesValidator.validate(&doc(value), &ReferenceResolver::new(&idx))
    }

    #[test]
    fn well_formed_citations_pass() {
        let issues = run(json!({"id": "zeus",
            "sources": [{"title": "Theogony", "author": "Hesiod"}, {"citation": "Il. 1.528"}],
            "primarySources": [{"work": "Iliad", "url": "https://www.perseus.tufts.edu/iliad"}]
        }));
        assert!(issues.is_empty(), "{issues:?}");
    }

    #[test]
    fn untitled_entry_is_a_warning() {
        let issues = run(json!({"id": "zeus", "sources": [{"author": "Hesiod", "title": ""}]}));
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].kind, IssueKind::MissingSourceTitle);
        assert_eq!(issues[0].severity, Severity::Warning);
        assert_eq!(issues[0].field, "sources[0]");
    }

    #[test]
    fn bad_url_is_an_error() {
        let issues = run(json!({"id": "zeus", "sources": [{"title": "Theogony", "url": "see library"}]}));
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].kind, IssueKind::InvalidSourceUrl);
        assert_eq!(issues[0].severity, Severity::Error);
        assert_eq!(issues[0].field, "sources[0].url");
    }

    #[test]
    fn wrong_shapes_are_errors() {
        let issues = run(json!({"id": "zeus", "sources": "Hesiod", "primarySources": ["Iliad"]}));
        let kinds: Vec<_> = issues.iter().map(|i| i.kind).collect();
        assert_eq!(kinds, vec![IssueKind::InvalidSources, IssueKind::InvalidSourceEntry]);
    }
}
