//! # Reference Resolver
//!
//! Classifies one reference value found in a connection-bearing field and
//! checks it against the frozen [`CorpusIndex`].
//!
//! Every check appends its own finding and carries on. A single bad
//! reference never hides the other problems in the same document.
//!
//! ## Structured references
//!
//! | condition | issue |
//! |---|---|
//! | none of `id`, `name`, `link` | `MISSING_REFERENCE_FIELDS` (error) |
//! | no `id` | `MISSING_REFERENCE_ID` (warning, with suggested id) |
//! | `id` without `name` | `MISSING_REFERENCE_NAME` (warning) |
//! | `id` outside `[a-z0-9_-]`, empty or not a string | `INVALID_REFERENCE_ID` (error) |
//! | unknown or non-string `relationshipType` | `INVALID_RELATIONSHIP_TYPE` (warning) |
//! | `link` without `id` | `LINK_WITHOUT_ID` (warning) |
//! | `id` not indexed, not `_unverified` | `BROKEN_LINK` (error) |
//!
//! ## Bare strings
//!
//! A bare string in a canonical field gets `STRING_REFERENCE`. It is then
//! resolved through [`CorpusIndex::resolve_string`]; failure adds
//! `UNRESOLVED_STRING_REFERENCE` carrying the attempted identifier. Neither
//! is ever an error: name matching is approximate.

use mythos_core::{
    EntityId, EntityReference, Issue, IssueKind, IssueSubject, RelationshipType,
    StructuredReference,
};
use serde_json::Value;

use crate::index::{CorpusIndex, StringResolution};

/// Resolves references against a fully built index.
#[derive(Debug, Clone, Copy)]
pub struct ReferenceResolver<'a> {
    index: &'a CorpusIndex,
}

impl<'a> ReferenceResolver<'a> {
    /// Create a resolver over a frozen index.
    pub fn new(index: &'a CorpusIndex) -> Self {
        Self { index }
    }

    /// The index references are checked against.
    pub fn index(&self) -> &'a CorpusIndex {
        self.index
    }

    /// Check every element of a reference array. `field` is the array's
    /// path; elements are attributed as `field[i]`.
    pub fn check_list(&self, subject: &IssueSubject, field: &str, items: &[Value], out: &mut Vec<Issue>) {
        for (i, item) in items.iter().enumerate() {
            self.check_value(subject, &format!("{field}[{i}]"), item, out);
        }
    }

    /// Check one reference value in a canonical (non-legacy) field.
    pub fn check_value(&self, subject: &IssueSubject, field: &str, value: &Value, out: &mut Vec<Issue>) {
        match EntityReference::from_value(value) {
            Some(EntityReference::Raw(raw)) => self.check_raw(subject, field, &raw, out),
            Some(EntityReference::Structured(reference)) => {
                self.check_structured(subject, field, &reference, out);
            }
            None => out.push(invalid_reference(subject, field, value)),
        }
    }

    /// Check a bare string reference in a canonical field.
    pub fn check_raw(&self, subject: &IssueSubject, field: &str, raw: &str, out: &mut Vec<Issue>) {
        out.push(
            Issue::new(
                IssueKind::StringReference,
                subject,
                field,
                format!("string reference \"{raw}\" should be a structured object {{id, name}}"),
            )
            .with_reference(raw),
        );
        if let Some(issue) = self.unresolved(subject, field, raw) {
            out.push(issue);
        }
    }

    /// Check one element of a legacy flat array. Strings only raise a
    /// finding when they cannot be resolved; objects get the full
    /// structured checks.
    pub fn check_legacy_value(&self, subject: &IssueSubject, field: &str, value: &Value, out: &mut Vec<Issue>) {
        match EntityReference::from_value(value) {
            Some(EntityReference::Raw(raw)) => {
                if let Some(issue) = self.unresolved(subject, field, &raw) {
                    out.push(issue);
                }
            }
            Some(EntityReference::Structured(reference)) => {
                self.check_structured(subject, field, &reference, out);
            }
            None => out.push(invalid_reference(subject, field, value)),
        }
    }

    /// Check a structured reference.
    pub fn check_structured(
        &self,
        subject: &IssueSubject,
        field: &str,
        reference: &StructuredReference,
        out: &mut Vec<Issue>,
    ) {
        if reference.is_empty() {
            out.push(Issue::new(
                IssueKind::MissingReferenceFields,
                subject,
                field,
                "reference has none of id, name, link",
            ));
            return;
        }

        let label = EntityReference::Structured(reference.clone()).label();

        match (reference.id.as_deref(), &reference.malformed_id) {
            (None, Some(value)) => {
                if reference.name.is_none() {
                    out.push(
                        Issue::new(
                            IssueKind::MissingReferenceName,
                            subject,
                            field,
                            format!("reference \"{label}\" has no name"),
                        )
                        .with_reference(label.as_str()),
                    );
                }
                out.push(
                    Issue::new(
                        IssueKind::InvalidReferenceId,
                        subject,
                        field,
                        format!("reference id must be a non-empty string, found {value}"),
                    )
                    .with_reference(label.as_str())
                    .with_value(value.to_string())
                    .with_suggested_id(reference.suggested_id()),
                );
            }
            (None, None) => {
                let suggested = reference.suggested_id();
                let hint = suggested
                    .as_deref()
                    .map(|id| format!(" (suggested id: \"{id}\")"))
                    .unwrap_or_default();
                out.push(
                    Issue::new(
                        IssueKind::MissingReferenceId,
                        subject,
                        field,
                        format!("reference \"{label}\" has no id{hint}"),
                    )
                    .with_reference(label.as_str())
                    .with_suggested_id(suggested),
                );
            }
            (Some(id), _) => {
                if reference.name.is_none() {
                    out.push(
                        Issue::new(
                            IssueKind::MissingReferenceName,
                            subject,
                            field,
                            format!("reference \"{id}\" has no name"),
                        )
                        .with_reference(id),
                    );
                }
                if let Err(e) = EntityId::new(id) {
                    out.push(
                        Issue::new(IssueKind::InvalidReferenceId, subject, field, e.to_string())
                            .with_reference(id)
                            .with_suggested_id(EntityId::normalized(id).map(EntityId::into_inner)),
                    );
                }
            }
        }

        if let Some(rel) = reference.relationship_type.as_deref() {
            if RelationshipType::parse_term(rel).is_none() {
                out.push(
                    Issue::new(
                        IssueKind::InvalidRelationshipType,
                        subject,
                        field,
                        format!("relationship type \"{rel}\" is not in the registry"),
                    )
                    .with_reference(label.as_str())
                    .with_value(rel),
                );
            }
        }

        if let Some(value) = &reference.malformed_relationship_type {
            out.push(
                Issue::new(
                    IssueKind::InvalidRelationshipType,
                    subject,
                    field,
                    format!("relationship type must be a non-empty string, found {value}"),
                )
                .with_reference(label.as_str())
                .with_value(value.to_string()),
            );
        }

        if let (Some(link), false) = (reference.link.as_deref(), reference.has_id()) {
            out.push(
                Issue::new(
                    IssueKind::LinkWithoutId,
                    subject,
                    field,
                    format!("reference uses link \"{link}\"; extract an id from it"),
                )
                .with_reference(label.as_str())
                .with_suggested_id(mythos_core::id_from_link(link)),
            );
        }

        if let Some(id) = reference.id.as_deref() {
            if !reference.unverified && !self.index.exists(id) {
                out.push(
                    Issue::new(
                        IssueKind::BrokenLink,
                        subject,
                        field,
                        format!("reference \"{id}\" does not match any document in the corpus"),
                    )
                    .with_reference(id),
                );
            }
        }
    }

    fn unresolved(&self, subject: &IssueSubject, field: &str, raw: &str) -> Option<Issue> {
        match self.index.resolve_string(raw) {
            StringResolution::Unresolved { attempted_id } => Some(
                Issue::new(
                    IssueKind::UnresolvedStringReference,
                    subject,
                    field,
                    format!("\"{raw}\" matches no document by id or name (tried \"{attempted_id}\")"),
                )
                .with_reference(raw)
                .with_attempted_id(attempted_id),
            ),
            resolved => {
                tracing::trace!(field, raw, resolved = resolved.resolved_id(), "resolved string reference");
                None
            }
        }
    }
}

fn invalid_reference(subject: &IssueSubject, field: &str, value: &Value) -> Issue {
    Issue::new(
        IssueKind::InvalidReference,
        subject,
        field,
        "reference must be a string or an object",
    )
    .with_value(value.to_string())
}
