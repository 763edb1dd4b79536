//! Entity documents as loaded from the corpus.
//!
//! A document is created once at load time and never mutated. The raw JSON
//! body is kept as-is so every field validator sees exactly what was on
//! disk; only the handful of attributes the index needs are lifted out.

use std::path::{Path, PathBuf};

use mythos_core::IssueSubject;
use serde_json::Value;

/// Category assigned to files placed directly in the corpus root.
pub const UNCATEGORIZED: &str = "uncategorized";

/// Where a document came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Provenance {
    /// Path of the source file.
    pub source_path: PathBuf,
    /// First directory under the corpus root.
    pub category: String,
    /// Second directory under the corpus root, when present.
    pub tradition_dir: Option<String>,
}

/// One entity of the corpus.
#[derive(Debug, Clone)]
pub struct EntityDocument {
    id: String,
    name: Option<String>,
    entity_type: String,
    mythology: Option<String>,
    provenance: Provenance,
    body: Value,
}

impl EntityDocument {
    /// Build a document from a parsed JSON value.
    ///
    /// Returns `None` when the value is not an object or carries no usable
    /// `id` (absent, not a string, or empty). Such documents cannot take
    /// part in the reference graph and are skipped.
    pub fn from_value(body: Value, provenance: Provenance) -> Option<Self> {
        let map = body.as_object()?;
        let id = non_empty(map.get("id"))?.to_string();
        let name = ["name", "displayName", "title"]
            .iter()
            .find_map(|k| non_empty(map.get(*k)))
            .map(str::to_string);
        let entity_type = non_empty(map.get("type"))
            .or_else(|| non_empty(map.get("category")))
            .unwrap_or(&provenance.category)
            .to_string();
        let mythology = non_empty(map.get("mythology"))
            .or_else(|| non_empty(map.get("tradition")))
            .map(str::to_string)
            .or_else(|| provenance.tradition_dir.clone());

        Some(Self {
            id,
            name,
            entity_type,
            mythology,
            provenance,
            body,
        })
    }

    /// Document identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Display name (`name`, `displayName` or `title`).
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Declared type, falling back to the containing directory.
    pub fn entity_type(&self) -> &str {
        &self.entity_type
    }

    /// Mythology / tradition tag.
    pub fn mythology(&self) -> Option<&str> {
        self.mythology.as_deref()
    }

    /// Load provenance.
    pub fn provenance(&self) -> &Provenance {
        &self.provenance
    }

    /// Source file path.
    pub fn source_path(&self) -> &Path {
        &self.provenance.source_path
    }

    /// The raw JSON body (always an object).
    pub fn body(&self) -> &Value {
        &self.body
    }

    /// A top-level field. JSON `null` counts as absent.
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.body.get(key).filter(|v| !v.is_null())
    }

    /// Whether the key is present at all, even with a `null` value.
    pub fn has_key(&self, key: &str) -> bool {
        self.body.get(key).is_some()
    }

    /// Attribution for issues raised against this document.
    pub fn subject(&self) -> IssueSubject {
        IssueSubject {
            asset_id: Some(self.id.clone()),
            asset_name: self.name.clone(),
            category: self.entity_type.clone(),
        }
    }
}

fn non_empty(value: Option<&Value>) -> Option<&str> {
    value.and_then(Value::as_str).filter(|s| !s.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn provenance() -> Provenance {
        Provenance {
            source_path: PathBuf::from("corpus/deities/greek/zeus.json"),
            category: "deities".to_string(),
            tradition_dir: Some("greek".to_string()),
        }
    }

    #[test]
    fn lifts_indexed_attributes() {
        let doc = EntityDocument::from_value(
            json!({"id": "zeus", "name": "Zeus", "type": "deity", "mythology": "greek"}),
            provenance(),
        )
        .unwrap();
        assert_eq!(doc.id(), "zeus");
        assert_eq!(doc.name(), Some("Zeus"));
        assert_eq!(doc.entity_type(), "deity");
        assert_eq!(doc.mythology(), Some("greek"));
    }

    #[test]
    fn type_defaults_to_directory_category() {
        let doc = EntityDocument::from_value(json!({"id": "zeus"}), provenance()).unwrap();
        assert_eq!(doc.entity_type(), "deities");
        assert_eq!(doc.mythology(), Some("greek"));
        assert_eq!(doc.name(), None);
    }

    #[test]
    fn category_and_tradition_fields_are_fallbacks() {
        let doc = EntityDocument::from_value(
            json!({"id": "bifrost", "category": "place", "tradition": "norse", "title": "Bifröst"}),
            provenance(),
        )
        .unwrap();
        assert_eq!(doc.entity_type(), "place");
        assert_eq!(doc.mythology(), Some("norse"));
        assert_eq!(doc.name(), Some("Bifröst"));
    }

    #[test]
    fn documents_without_usable_id_are_skipped() {
        assert!(EntityDocument::from_value(json!({"name": "Zeus"}), provenance()).is_none());
        assert!(EntityDocument::from_value(json!({"id": ""}), provenance()).is_none());
        assert!(EntityDocument::from_value(json!({"id": 12}), provenance()).is_none());
        assert!(EntityDocument::from_value(json!([{"id": "zeus"}]), provenance()).is_none());
    }

    #[test]
    fn null_fields_are_absent_but_keys_are_present() {
        let doc = EntityDocument::from_value(json!({"id": "zeus", "family": null}), provenance())
            .unwrap();
        assert!(doc.field("family").is_none());
        assert!(doc.has_key("family"));
    }

    #[test]
    fn subject_uses_entity_type_as_category() {
        let doc = EntityDocument::from_value(json!({"id": "zeus", "type": "deity"}), provenance())
            .unwrap();
        let subject = doc.subject();
        assert_eq!(subject.asset_id.as_deref(), Some("zeus"));
        assert_eq!(subject.category, "deity");
    }
}
