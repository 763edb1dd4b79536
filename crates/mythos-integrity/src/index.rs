//! # Corpus Index
//!
//! Built in two steps. [`CorpusIndexBuilder`] accepts documents one at a
//! time during loading; [`CorpusIndexBuilder::build`] consumes it and
//! returns the immutable [`CorpusIndex`] used by every validator.
//!
//! ## Identifier collisions
//!
//! The last document inserted under an `id` wins. Every overwrite is
//! recorded as a [`DuplicateId`] so the report can surface it instead of
//! silently losing a document.
//!
//! ## Name matching
//!
//! [`CorpusIndex::resolve_string`] resolves legacy bare-string references.
//! After an exact identifier lookup it falls back to a case-insensitive name
//! match, first exact, then partial. The partial match is a heuristic: it
//! only ever decides whether a warning is raised, never an error.

use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;

use mythos_core::normalize_id;

use crate::document::EntityDocument;

/// Terms shorter than this never take part in partial name matching.
const MIN_PARTIAL_MATCH_LEN: usize = 3;

/// A document that was replaced in the index by a later one with the same id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateId {
    /// The shared identifier.
    pub id: String,
    /// Source of the document that was dropped.
    pub replaced_path: PathBuf,
    /// Source of the document that took its place.
    pub kept_path: PathBuf,
}

/// Outcome of resolving a bare string reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StringResolution {
    /// The normalized string is an indexed identifier.
    Id(String),
    /// A document name equals the string, ignoring case.
    ExactName(String),
    /// A document name contains the string or is contained in it, ignoring case.
    PartialName(String),
    /// Nothing matched; carries the normalized identifier that was tried.
    Unresolved {
        /// Normalized form of the string.
        attempted_id: String,
    },
}

impl StringResolution {
    /// Identifier of the matched document, if any.
    pub fn resolved_id(&self) -> Option<&str> {
        match self {
            Self::Id(id) | Self::ExactName(id) | Self::PartialName(id) => Some(id),
            Self::Unresolved { .. } => None,
        }
    }
}

/// Mutable index used while the corpus is loading.
#[derive(Debug, Default)]
pub struct CorpusIndexBuilder {
    slots: Vec<Option<EntityDocument>>,
    by_id: HashMap<String, usize>,
    duplicates: Vec<DuplicateId>,
}

impl CorpusIndexBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a document. An existing document with the same `id` is
    /// replaced and the collision recorded.
    pub fn insert(&mut self, doc: EntityDocument) {
        let slot = self.slots.len();
        if let Some(previous) = self.by_id.insert(doc.id().to_string(), slot) {
            if let Some(replaced) = self.slots[previous].take() {
                tracing::debug!(
                    id = doc.id(),
                    replaced = %replaced.source_path().display(),
                    kept = %doc.source_path().display(),
                    "duplicate id, last document wins"
                );
                self.duplicates.push(DuplicateId {
                    id: doc.id().to_string(),
                    replaced_path: replaced.source_path().to_path_buf(),
                    kept_path: doc.source_path().to_path_buf(),
                });
            }
        }
        self.slots.push(Some(doc));
    }

    /// Number of distinct identifiers inserted so far.
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    /// Whether nothing has been inserted.
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    /// Freeze the index. Documents keep their insertion order.
    pub fn build(self) -> CorpusIndex {
        let documents: Vec<EntityDocument> = self.slots.into_iter().flatten().collect();

        let mut by_id = HashMap::with_capacity(documents.len());
        let mut by_type: BTreeMap<String, Vec<usize>> = BTreeMap::new();
        let mut by_mythology: BTreeMap<String, Vec<usize>> = BTreeMap::new();
        let mut names = Vec::new();

        for (pos, doc) in documents.iter().enumerate() {
            by_id.insert(doc.id().to_string(), pos);
            by_type.entry(doc.entity_type().to_string()).or_default().push(pos);
            if let Some(mythology) = doc.mythology() {
                by_mythology.entry(mythology.to_string()).or_default().push(pos);
            }
            if let Some(name) = doc.name() {
                names.push((name.trim().to_lowercase(), pos));
            }
        }

        CorpusIndex {
            documents,
            by_id,
            by_type,
            by_mythology,
            names,
            duplicates: self.duplicates,
        }
    }
}

/// Immutable, fully populated corpus index.
#[derive(Debug)]
pub struct CorpusIndex {
    documents: Vec<EntityDocument>,
    by_id: HashMap<String, usize>,
    by_type: BTreeMap<String, Vec<usize>>,
    by_mythology: BTreeMap<String, Vec<usize>>,
    names: Vec<(String, usize)>,
    duplicates: Vec<DuplicateId>,
}

impl CorpusIndex {
    /// Look up a document by identifier.
    pub fn get(&self, id: &str) -> Option<&EntityDocument> {
        self.by_id.get(id).map(|&pos| &self.documents[pos])
    }

    /// Whether an identifier is indexed.
    pub fn exists(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    /// Number of indexed documents.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Whether the index is empty.
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// All indexed documents in load order.
    pub fn documents(&self) -> &[EntityDocument] {
        &self.documents
    }

    /// Documents of one type, in load order.
    pub fn by_type<'a>(&'a self, entity_type: &str) -> impl Iterator<Item = &'a EntityDocument> + 'a {
        self.lookup(&self.by_type, entity_type)
    }

    /// Documents of one mythology, in load order.
    pub fn by_mythology<'a>(&'a self, mythology: &str) -> impl Iterator<Item = &'a EntityDocument> + 'a {
        self.lookup(&self.by_mythology, mythology)
    }

    /// Every indexed type with its document count, sorted by type.
    pub fn type_counts(&self) -> impl Iterator<Item = (&str, usize)> {
        self.by_type.iter().map(|(k, v)| (k.as_str(), v.len()))
    }

    /// Every indexed mythology with its document count, sorted by name.
    pub fn mythology_counts(&self) -> impl Iterator<Item = (&str, usize)> {
        self.by_mythology.iter().map(|(k, v)| (k.as_str(), v.len()))
    }

    /// Identifier collisions seen while building.
    pub fn duplicates(&self) -> &[DuplicateId] {
        &self.duplicates
    }

    /// First document (in load order) whose name equals `term`, ignoring
    /// case, else the first whose name contains or is contained in `term`.
    pub fn find_by_name(&self, term: &str) -> Option<(&EntityDocument, bool)> {
        let term = term.trim().to_lowercase();
        if term.is_empty() {
            return None;
        }
        if let Some((_, pos)) = self.names.iter().find(|(name, _)| *name == term) {
            return Some((&self.documents[*pos], true));
        }
        if term.len() < MIN_PARTIAL_MATCH_LEN {
            return None;
        }
        self.names
            .iter()
            .find(|(name, _)| {
                name.len() >= MIN_PARTIAL_MATCH_LEN && (name.contains(&term) || term.contains(name.as_str()))
            })
            .map(|(_, pos)| (&self.documents[*pos], false))
    }

    /// Resolve a legacy bare-string reference.
    pub fn resolve_string(&self, raw: &str) -> StringResolution {
        let attempted_id = normalize_id(raw);
        if !attempted_id.is_empty() && self.exists(&attempted_id) {
            return StringResolution::Id(attempted_id);
        }
        match self.find_by_name(raw) {
            Some((doc, true)) => StringResolution::ExactName(doc.id().to_string()),
            Some((doc, false)) => StringResolution::PartialName(doc.id().to_string()),
            None => StringResolution::Unresolved { attempted_id },
        }
    }

    fn lookup<'a>(
        &'a self,
        map: &'a BTreeMap<String, Vec<usize>>,
        key: &str,
    ) -> impl Iterator<Item = &'a EntityDocument> + 'a {
        map.get(key)
            .into_iter()
            .flatten()
            .map(move |&pos| &self.documents[pos])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Provenance;
    use serde_json::json;

    fn doc(value: serde_json::Value, path: &str) -> EntityDocument {
        EntityDocument::from_value(
            value,
            Provenance {
                source_path: PathBuf::from(path),
                category: "deities".to_string(),
                tradition_dir: None,
            },
        )
        .unwrap()
    }

    fn sample_index() -> CorpusIndex {
        let mut builder = CorpusIndexBuilder::new();
        builder.insert(doc(json!({"id": "zeus", "name": "Zeus", "mythology": "greek"}), "a/zeus.json"));
        builder.insert(doc(
            json!({"id": "heracles", "name": "Heracles", "type": "hero", "mythology": "greek"}),
            "a/heracles.json",
        ));
        builder.insert(doc(json!({"id": "odin", "name": "Odin All-Father", "mythology": "norse"}), "a/odin.json"));
        builder.build()
    }

    #[test]
    fn get_and_exists_agree() {
        let index = sample_index();
        assert!(index.exists("zeus"));
        assert_eq!(index.get("zeus").unwrap().name(), Some("Zeus"));
        assert!(!index.exists("hera"));
        assert!(index.get("hera").is_none());
        assert_eq!(index.len(), 3);
    }

    #[test]
    fn multimaps_group_by_type_and_mythology() {
        let index = sample_index();
        let greek: Vec<_> = index.by_mythology("greek").map(|d| d.id()).collect();
        assert_eq!(greek, vec!["zeus", "heracles"]);
        let heroes: Vec<_> = index.by_type("hero").map(|d| d.id()).collect();
        assert_eq!(heroes, vec!["heracles"]);
        assert_eq!(index.by_type("creature").count(), 0);
        let types: Vec<_> = index.type_counts().collect();
        assert_eq!(types, vec![("deities", 2), ("hero", 1)]);
    }

    #[test]
    fn last_write_wins_and_collision_is_recorded() {
        let mut builder = CorpusIndexBuilder::new();
        builder.insert(doc(json!({"id": "zeus", "name": "Old Zeus"}), "a/zeus.json"));
        builder.insert(doc(json!({"id": "hera", "name": "Hera"}), "a/hera.json"));
        builder.insert(doc(json!({"id": "zeus", "name": "New Zeus"}), "b/zeus.json"));
        assert_eq!(builder.len(), 2);
        let index = builder.build();

        assert_eq!(index.len(), 2);
        assert_eq!(index.get("zeus").unwrap().name(), Some("New Zeus"));
        let order: Vec<_> = index.documents().iter().map(|d| d.id()).collect();
        assert_eq!(order, vec!["hera", "zeus"]);
        assert_eq!(
            index.duplicates(),
            &[DuplicateId {
                id: "zeus".to_string(),
                replaced_path: PathBuf::from("a/zeus.json"),
                kept_path: PathBuf::from("b/zeus.json"),
            }]
        );
    }

    #[test]
    fn resolve_string_by_normalized_id() {
        let index = sample_index();
        assert_eq!(index.resolve_string("Zeus"), StringResolution::Id("zeus".to_string()));
        assert_eq!(index.resolve_string("  HERACLES "), StringResolution::Id("heracles".to_string()));
    }

    #[test]
    fn resolve_string_by_exact_then_partial_name() {
        let index = sample_index();
        assert_eq!(
            index.resolve_string("odin all-father"),
            StringResolution::ExactName("odin".to_string())
        );
        assert_eq!(
            index.resolve_string("All-Father"),
            StringResolution::PartialName("odin".to_string())
        );
    }

    #[test]
    fn resolve_string_reports_attempted_id() {
        let index = sample_index();
        assert_eq!(
            index.resolve_string("Hercules"),
            StringResolution::Unresolved {
                attempted_id: "hercules".to_string()
            }
        );
    }

    #[test]
    fn short_terms_never_partially_match() {
        let index = sample_index();
        assert!(index.find_by_name("ze").is_none());
        assert!(index.find_by_name("").is_none());
    }
}
