//! # Legacy Field Map
//!
//! Older documents carry flat, pre-migration fields (for example a plain
//! `relatedHeroes` array of names). Each one has a canonical home in the
//! nested schema. The map is pure data; detection and counting live in the
//! field validators.

/// A deprecated top-level field and the schema path that replaces it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LegacyField {
    /// The deprecated field name as it appears on a document.
    pub name: &'static str,
    /// Dotted path of the canonical replacement.
    pub canonical_path: &'static str,
}

const fn legacy(name: &'static str, canonical_path: &'static str) -> LegacyField {
    LegacyField {
        name,
        canonical_path,
    }
}

/// Every recognized legacy field, in reporting order.
pub const LEGACY_FIELD_MAP: &[LegacyField] = &[
    legacy("relatedDeities", "relatedEntities.deities"),
    legacy("relatedHeroes", "relatedEntities.heroes"),
    legacy("relatedCreatures", "relatedEntities.creatures"),
    legacy("relatedPlaces", "relatedEntities.places"),
    legacy("relatedItems", "relatedEntities.items"),
    legacy("relatedTexts", "relatedEntities.texts"),
    legacy("relatedConcepts", "relatedEntities.concepts"),
    legacy("relatedRituals", "relatedEntities.rituals"),
    legacy("relatedSymbols", "relatedEntities.symbols"),
    legacy("relatedHerbs", "relatedEntities.herbs"),
    legacy("relatedEvents", "relatedEntities.events"),
    legacy("relatedMythologies", "relatedEntities.mythologies"),
    legacy("relatedFigures", "relatedEntities"),
    legacy("connections", "relatedEntities"),
    legacy("parents", "family.parents"),
    legacy("children", "family.children"),
    legacy("siblings", "family.siblings"),
    legacy("spouses", "family.consorts"),
    legacy("consorts", "family.consorts"),
];

/// Canonical replacement path for a legacy field name, if it is one.
pub fn canonical_path_for(field: &str) -> Option<&'static str> {
    LEGACY_FIELD_MAP
        .iter()
        .find(|l| l.name == field)
        .map(|l| l.canonical_path)
}
