//! # Entity References
//!
//! A connection-bearing field holds references to other documents in one of
//! two shapes: a bare string (legacy) or a structured object. The shape is
//! decided once, when the JSON value is lifted into [`EntityReference`];
//! everything downstream matches on the enum.

use serde::Serialize;
use serde_json::Value;

use crate::identity::{id_from_link, normalize_id};

/// A reference from one document to another.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum EntityReference {
    /// A bare identifier or display name.
    Raw(String),
    /// A structured reference object.
    Structured(StructuredReference),
}

/// The structured reference shape:
/// `{ id, name, link, relationshipType, _unverified }`.
///
/// Empty strings and non-string values are treated as absent, except for
/// `id` and `relationshipType`: a present but unusable value there is kept
/// in the matching `malformed_*` field so it can be reported.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuredReference {
    /// Target identifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Display name of the target.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Legacy path-style pointer to the target.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    /// Declared relationship toward the target, unvalidated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relationship_type: Option<String>,
    /// `id` present but not a non-empty string.
    #[serde(skip)]
    pub malformed_id: Option<Value>,
    /// `relationshipType` present but not a non-empty string.
    #[serde(skip)]
    pub malformed_relationship_type: Option<Value>,
    /// Author marked the target as intentionally not (yet) in the corpus.
    #[serde(rename = "_unverified", skip_serializing_if = "std::ops::Not::not")]
    pub unverified: bool,
}

impl EntityReference {
    /// Lift a JSON value into a reference.
    ///
    /// Returns `None` for values that are neither a string nor an object
    /// (numbers, booleans, null, nested arrays).
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(Self::Raw(s.clone())),
            Value::Object(map) => {
                let text = |key: &str| {
                    map.get(key)
                        .and_then(Value::as_str)
                        .filter(|s| !s.is_empty())
                        .map(str::to_string)
                };
                let (id, malformed_id) = split_text(map.get("id"));
                let (relationship_type, malformed_relationship_type) =
                    split_text(map.get("relationshipType"));
                Some(Self::Structured(StructuredReference {
                    id,
                    name: text("name"),
                    link: text("link"),
                    relationship_type,
                    malformed_id,
                    malformed_relationship_type,
                    unverified: map.get("_unverified").and_then(Value::as_bool) == Some(true),
                }))
            }
            _ => None,
        }
    }

    /// A short human-readable label for issue messages.
    pub fn label(&self) -> String {
        match self {
            Self::Raw(s) => s.clone(),
            Self::Structured(r) => r
                .id
                .as_deref()
                .or(r.name.as_deref())
                .or(r.link.as_deref())
                .unwrap_or("<empty reference>")
                .to_string(),
        }
    }
}

/// Usable text, or the offending value when present but unusable.
/// `null` counts as absent.
fn split_text(value: Option<&Value>) -> (Option<String>, Option<Value>) {
    match value {
        None | Some(Value::Null) => (None, None),
        Some(Value::String(s)) if !s.is_empty() => (Some(s.clone()), None),
        Some(other) => (None, Some(other.clone())),
    }
}

impl StructuredReference {
    /// Whether the reference carries none of `id`, `name`, `link`.
    ///
    /// A malformed `id` still counts as present.
    pub fn is_empty(&self) -> bool {
        !self.has_id() && self.name.is_none() && self.link.is_none()
    }

    /// Whether an `id` key was given at all, usable or not.
    pub fn has_id(&self) -> bool {
        self.id.is_some() || self.malformed_id.is_some()
    }

    /// Identifier that could be filled in for a reference lacking `id`.
    ///
    /// Prefers the final segment of `link`, then the normalized `name`.
    pub fn suggested_id(&self) -> Option<String> {
        self.link
            .as_deref()
            .and_then(id_from_link)
            .or_else(|| {
                self.name
                    .as_deref()
                    .map(normalize_id)
                    .filter(|id| !id.is_empty())
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn string_becomes_raw() {
        let r = EntityReference::from_value(&json!("hercules")).unwrap();
        assert_eq!(r, EntityReference::Raw("hercules".to_string()));
    }

    #[test]
    fn object_becomes_structured() {
        let r = EntityReference::from_value(&json!({
            "id": "hera",
            "name": "Hera",
            "relationshipType": "spouse",
            "_unverified": true
        }))
        .unwrap();
        let EntityReference::Structured(s) = r else {
            panic!("expected structured reference");
        };
        assert_eq!(s.id.as_deref(), Some("hera"));
        assert_eq!(s.name.as_deref(), Some("Hera"));
        assert_eq!(s.relationship_type.as_deref(), Some("spouse"));
        assert!(s.unverified);
    }

    #[test]
    fn empty_and_non_string_fields_are_absent() {
        let r = EntityReference::from_value(&json!({"id": null, "name": 7, "link": "", "_unverified": "yes"}))
            .unwrap();
        let EntityReference::Structured(s) = r else {
            panic!("expected structured reference");
        };
        assert!(s.is_empty());
        assert!(s.malformed_id.is_none());
        assert!(!s.unverified);
    }

    #[test]
    fn unusable_id_and_relationship_type_are_kept() {
        let r = EntityReference::from_value(&json!({"id": 7, "name": "Ares", "relationshipType": 5}))
            .unwrap();
        let EntityReference::Structured(s) = r else {
            panic!("expected structured reference");
        };
        assert_eq!(s.id, None);
        assert_eq!(s.malformed_id, Some(json!(7)));
        assert_eq!(s.malformed_relationship_type, Some(json!(5)));
        assert!(s.has_id());
        assert!(!s.is_empty());

        let r = EntityReference::from_value(&json!({"id": ""})).unwrap();
        let EntityReference::Structured(s) = r else {
            panic!("expected structured reference");
        };
        assert_eq!(s.malformed_id, Some(json!("")));
        assert!(!s.is_empty());
    }

    #[test]
    fn scalars_and_arrays_are_rejected() {
        assert!(EntityReference::from_value(&json!(42)).is_none());
        assert!(EntityReference::from_value(&json!(null)).is_none());
        assert!(EntityReference::from_value(&json!(["zeus"])).is_none());
    }

    #[test]
    fn suggested_id_prefers_link() {
        let s = StructuredReference {
            name: Some("Zeus Olympios".to_string()),
            link: Some("../deities/zeus.html".to_string()),
            ..Default::default()
        };
        assert_eq!(s.suggested_id().as_deref(), Some("zeus"));
    }

    #[test]
    fn suggested_id_falls_back_to_name() {
        let s = StructuredReference {
            name: Some("Mount Olympus".to_string()),
            ..Default::default()
        };
        assert_eq!(s.suggested_id().as_deref(), Some("mount-olympus"));
    }

    #[test]
    fn label_prefers_id() {
        let r = EntityReference::from_value(&json!({"id": "odin", "name": "Odin"})).unwrap();
        assert_eq!(r.label(), "odin");
        let r = EntityReference::from_value(&json!({})).unwrap();
        assert_eq!(r.label(), "<empty reference>");
    }

    #[test]
    fn serializes_structured_without_absent_fields() {
        let r = EntityReference::from_value(&json!({"id": "odin"})).unwrap();
        assert_eq!(serde_json::to_value(&r).unwrap(), json!({"id": "odin"}));
    }
}
