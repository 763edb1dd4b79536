//! # Entity Identifiers
//!
//! The identifier grammar is lowercase ASCII letters, digits, `-` and `_`.
//! Documents authored by the enrichment pipeline always satisfy it; legacy
//! documents may not, which is why [`crate::Issue`]s rather than construction
//! failures are used when validating identifiers found inside a corpus.
//!
//! [`normalize_id`] is the single identifier-normalization function. It is
//! used to resolve bare-string references and to suggest an `id` for
//! structured references that only carry a `name` or a `link`.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// A syntactically valid entity identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    /// Create an identifier, validating the grammar.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyId`] for an empty string and
    /// [`ValidationError::InvalidId`] when any character falls outside
    /// `[a-z0-9_-]`.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let s = value.into();
        if s.is_empty() {
            return Err(ValidationError::EmptyId);
        }
        if !is_valid_id(&s) {
            return Err(ValidationError::InvalidId(s));
        }
        Ok(Self(s))
    }

    /// Normalize free text into an identifier.
    ///
    /// Returns `None` when nothing identifier-like survives normalization
    /// (for example, a name made only of punctuation).
    pub fn normalized(raw: &str) -> Option<Self> {
        let id = normalize_id(raw);
        if id.is_empty() {
            None
        } else {
            Some(Self(id))
        }
    }

    /// Access the identifier string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the identifier and return the inner string.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl<'de> Deserialize<'de> for EntityId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Self::new(raw).map_err(serde::de::Error::custom)
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for EntityId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Whether `s` matches the identifier grammar `[a-z0-9_-]+`.
pub fn is_valid_id(s: &str) -> bool {
    !s.is_empty()
        && s
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_')
}

/// Normalize free text into the identifier grammar.
///
/// Lower-cases, turns every whitespace run into a single `-`, drops any
/// remaining character outside `[a-z0-9_-]`, collapses repeated hyphens and
/// trims hyphens from both ends. The result is either empty or satisfies
/// [`is_valid_id`].
pub fn normalize_id(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut pending_hyphen = false;

    for c in raw.trim().chars().flat_map(char::to_lowercase) {
        let c = if c.is_whitespace() { '-' } else { c };
        if c == '-' {
            pending_hyphen = true;
            continue;
        }
        if !(c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_') {
            continue;
        }
        if pending_hyphen && !out.is_empty() {
            out.push('-');
        }
        pending_hyphen = false;
        out.push(c);
    }

    out
}

/// Derive an identifier from a legacy path-style link.
///
/// Takes the final non-empty path segment (ignoring any query string or
/// fragment), strips a file extension, and normalizes it:
/// `"../deities/zeus.html"` → `zeus`, `"/entity/greek/hera/"` → `hera`.
pub fn id_from_link(link: &str) -> Option<String> {
    let path = link.split(['?', '#']).next().unwrap_or_default();
    let segment = path.split('/').rev().find(|s| !s.is_empty())?;
    let stem = match segment.rsplit_once('.') {
        Some((stem, _ext)) if !stem.is_empty() => stem,
        _ => segment,
    };
    let id = normalize_id(stem);
    if id.is_empty() {
        None
    } else {
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_ids_accepted() {
        for id in ["zeus", "hercules-12", "norse_odin", "a", "3-fates"] {
            assert!(EntityId::new(id).is_ok(), "{id} should be valid");
        }
    }

    #[test]
    fn invalid_ids_rejected() {
        assert_eq!(EntityId::new(""), Err(ValidationError::EmptyId));
        for id in ["Zeus", "zeus olympios", "zeus/hera", "ζεύς", "odin!"] {
            assert!(
                matches!(EntityId::new(id), Err(ValidationError::InvalidId(_))),
                "{id} should be rejected"
            );
        }
    }

    #[test]
    fn deserialize_rejects_invalid_ids() {
        let ok: EntityId = serde_json::from_str("\"athena\"").unwrap();
        assert_eq!(ok.as_str(), "athena");
        assert!(serde_json::from_str::<EntityId>("\"Athena\"").is_err());
    }

    #[test]
    fn normalize_collapses_whitespace_to_hyphens() {
        assert_eq!(normalize_id("Zeus"), "zeus");
        assert_eq!(normalize_id("  Mount   Olympus "), "mount-olympus");
        assert_eq!(normalize_id("Tyr\tthe\nOne-Handed"), "tyr-the-one-handed");
    }

    #[test]
    fn normalize_drops_punctuation() {
        assert_eq!(normalize_id("Odin (All-Father)"), "odin-all-father");
        assert_eq!(normalize_id("Ra's Barque"), "ras-barque");
        assert_eq!(normalize_id("--Loki--"), "loki");
        assert_eq!(normalize_id("???"), "");
    }

    #[test]
    fn normalized_returns_none_for_empty_result() {
        assert!(EntityId::normalized("!!!").is_none());
        assert_eq!(EntityId::normalized("Hel").unwrap().as_str(), "hel");
    }

    #[test]
    fn id_from_link_takes_last_segment() {
        assert_eq!(id_from_link("../deities/zeus.html").as_deref(), Some("zeus"));
        assert_eq!(id_from_link("/entity/greek/hera/").as_deref(), Some("hera"));
        assert_eq!(
            id_from_link("mythos/greek/heroes/Perseus.html#birth").as_deref(),
            Some("perseus")
        );
        assert_eq!(id_from_link("deities/odin?tab=family").as_deref(), Some("odin"));
        assert_eq!(id_from_link("/").as_deref(), None);
        assert_eq!(id_from_link("").as_deref(), None);
    }

    #[test]
    fn id_from_link_keeps_dotfile_style_segment() {
        assert_eq!(id_from_link("places/.olympus").as_deref(), Some("olympus"));
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Normalization output is always empty or a valid identifier.
        #[test]
        fn normalize_output_is_valid_or_empty(raw in "\\PC{0,40}") {
            let id = normalize_id(&raw);
            prop_assert!(id.is_empty() || is_valid_id(&id), "bad output {id:?}");
        }

        /// Normalization is idempotent.
        #[test]
        fn normalize_is_idempotent(raw in "\\PC{0,40}") {
            let once = normalize_id(&raw);
            prop_assert_eq!(normalize_id(&once), once.clone());
        }

        /// Already-valid identifiers without hyphen edge cases survive unchanged.
        #[test]
        fn normalize_preserves_valid_ids(raw in "[a-z0-9_]{1,8}(-[a-z0-9_]{1,8}){0,3}") {
            prop_assert_eq!(normalize_id(&raw), raw);
        }

        /// Case and surrounding whitespace never change the normalized form.
        #[test]
        fn normalize_ignores_case_and_padding(raw in "[a-zA-Z ]{1,30}") {
            let padded = format!("  {}  ", raw.to_uppercase());
            prop_assert_eq!(normalize_id(&padded), normalize_id(&raw));
        }
    }
}
