//! `corpusSearch` facets and their search terms.

use mythos_core::{CorpusFacet, Issue, IssueKind};
use serde_json::Value;

use super::FieldValidator;
use crate::document::EntityDocument;
use crate::resolver::ReferenceResolver;

/// Checks `corpusSearch`: a map of facet name to an array of non-empty
/// strings. Unknown facets are informational only.
#[derive(Debug, Clone, Copy, Default)]
pub struct CorpusSearchValidator;

impl FieldValidator for CorpusSearchValidator {
    fn name(&self) -> &'static str {
        "corpus-search"
    }

    fn validate(&self, doc: &EntityDocument, _resolver: &ReferenceResolver<'_>) -> Vec<Issue> {
        let Some(search) = doc.field("corpusSearch") else {
            return Vec::new();
        };
        let subject = doc.subject();
        let Some(facets) = search.as_object() else {
            return vec![Issue::new(
                IssueKind::InvalidCorpusSearch,
                &subject,
                "corpusSearch",
                "corpusSearch must be an object of facet to term array",
            )
            .with_value(search.to_string())];
        };

        let mut issues = Vec::new();
        for (facet, terms) in facets {
            let field = format!("corpusSearch.{facet}");
            if CorpusFacet::parse_term(facet).is_none() {
                issues.push(
                    Issue::new(
                        IssueKind::UnknownCorpusFacet,
                        &subject,
                        &field,
                        format!("\"{facet}\" is not a recognized search facet"),
                    )
                    .with_value(facet.as_str()),
                );
            }
            let Some(terms) = terms.as_array() else {
                issues.push(
                    Issue::new(
                        IssueKind::InvalidCorpusFacet,
                        &subject,
                        &field,
                        format!("{field} must be an array of strings"),
                    )
                    .with_value(terms.to_string()),
                );
                continue;
            };
            for (i, term) in terms.iter().enumerate() {
                let term_field = format!("{field}[{i}]");
                match term {
                    Value::String(s) if s.trim().is_empty() => issues.push(Issue::new(
                        IssueKind::EmptyCorpusTerm,
                        &subject,
                        &term_field,
                        "search term is empty",
                    )),
                    Value::String(_) => {}
                    other => issues.push(
                        Issue::new(
                            IssueKind::InvalidCorpusTerm,
                            &subject,
                            &term_field,
                            "search term must be a string",
                        )
                        .with_value(other.to_string()),
                    ),
                }
            }
        }
        issues
    }
}
