//! # Closed Vocabularies — Single Source of Truth
//!
//! The relationship-type, entity-category and corpus-search facet
//! vocabularies are defined exactly once, here. Validators, the report
//! layer, and serde all go through these enums, so a term can never be
//! accepted in one place and rejected in another.
//!
//! Every vocabulary is generated by [`closed_vocabulary!`], which keeps the
//! variant list, the wire spelling, `FromStr`, `Display` and serde in one
//! table per enum.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Define a closed, string-backed vocabulary enum.
///
/// Each entry maps a variant to its exact wire spelling. The generated type
/// serializes as that string and rejects anything else on parse.
macro_rules! closed_vocabulary {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident ($label:literal) {
            $( $variant:ident => $text:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        $vis enum $name {
            $(
                #[doc = concat!("`", $text, "`")]
                $variant,
            )+
        }

        impl $name {
            /// Every term in declaration order.
            pub fn all() -> &'static [$name] {
                &[$( Self::$variant ),+]
            }

            /// The exact wire spelling of this term.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $( Self::$variant => $text, )+
                }
            }

            /// Look up a term by its exact wire spelling.
            pub fn parse_term(s: &str) -> Option<Self> {
                match s {
                    $( $text => Some(Self::$variant), )+
                    _ => None,
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = ValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse_term(s).ok_or_else(|| ValidationError::UnknownTerm {
                    vocabulary: $label,
                    term: s.to_string(),
                })
            }
        }

        impl Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: serde::Serializer,
            {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let raw = String::deserialize(deserializer)?;
                raw.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

closed_vocabulary! {
    /// The relationship a structured reference declares toward its target.
    ///
    /// Grouped as family, social, narrative and structural terms, with
    /// `other` as the explicit catch-all.
    pub enum RelationshipType ("relationship type") {
        // family
        Parent => "parent",
        Father => "father",
        Mother => "mother",
        Child => "child",
        Son => "son",
        Daughter => "daughter",
        Sibling => "sibling",
        Brother => "brother",
        Sister => "sister",
        Spouse => "spouse",
        Consort => "consort",
        Lover => "lover",
        Offspring => "offspring",
        Ancestor => "ancestor",
        Descendant => "descendant",
        // social
        Ally => "ally",
        Enemy => "enemy",
        Rival => "rival",
        Companion => "companion",
        Friend => "friend",
        Servant => "servant",
        Master => "master",
        Worshipper => "worshipper",
        Devotee => "devotee",
        // narrative
        Mentor => "mentor",
        Student => "student",
        Teacher => "teacher",
        Creator => "creator",
        Creation => "creation",
        CreatedBy => "created_by",
        Slayer => "slayer",
        Victim => "victim",
        SlainBy => "slain_by",
        Aspect => "aspect",
        Avatar => "avatar",
        Incarnation => "incarnation",
        Syncretism => "syncretism",
        Equivalent => "equivalent",
        // structural
        Parallel => "parallel",
        Derived => "derived",
        Influenced => "influenced",
        Contrasts => "contrasts",
        Similar => "similar",
        Related => "related",
        Historical => "historical",
        Thematic => "thematic",
        Symbolic => "symbolic",
        Wielder => "wielder",
        WieldedBy => "wielded_by",
        Ruler => "ruler",
        RuledBy => "ruled_by",
        Guardian => "guardian",
        GuardedBy => "guarded_by",
        Associated => "associated",
        Linked => "linked",
        Connected => "connected",
        Origin => "origin",
        Destination => "destination",
        Contains => "contains",
        ContainedIn => "contained_in",
        Member => "member",
        Group => "group",
        // catch-all
        Other => "other",
    }
}

closed_vocabulary! {
    /// The kind of an entity in the corpus.
    pub enum EntityType ("entity type") {
        Deity => "deity",
        Hero => "hero",
        Creature => "creature",
        Item => "item",
        Place => "place",
        Text => "text",
        Ritual => "ritual",
        Symbol => "symbol",
        Herb => "herb",
        Cosmology => "cosmology",
        Concept => "concept",
        Event => "event",
        Archetype => "archetype",
        Magic => "magic",
        Mythology => "mythology",
    }
}

impl EntityType {
    /// The plural bucket name used as a key in `relatedEntities` maps and as
    /// a corpus directory name.
    pub fn plural(&self) -> &'static str {
        match self {
            Self::Deity => "deities",
            Self::Hero => "heroes",
            Self::Creature => "creatures",
            Self::Item => "items",
            Self::Place => "places",
            Self::Text => "texts",
            Self::Ritual => "rituals",
            Self::Symbol => "symbols",
            Self::Herb => "herbs",
            Self::Cosmology => "cosmologies",
            Self::Concept => "concepts",
            Self::Event => "events",
            Self::Archetype => "archetypes",
            Self::Magic => "magic",
            Self::Mythology => "mythologies",
        }
    }

    /// Resolve a category key in either singular or plural spelling.
    ///
    /// Matching is exact (case-sensitive); `"Deities"` is not a category key.
    pub fn from_category_key(key: &str) -> Option<Self> {
        Self::parse_term(key).or_else(|| Self::all().iter().copied().find(|t| t.plural() == key))
    }
}

closed_vocabulary! {
    /// A recognized `corpusSearch` facet name.
    ///
    /// The facet vocabulary is intentionally extensible: an unknown facet is
    /// an informational finding, not a violation.
    pub enum CorpusFacet ("corpus search facet") {
        Primary => "primary",
        Secondary => "secondary",
        Domains => "domains",
        Epithets => "epithets",
        Symbols => "symbols",
        AlternateNames => "alternateNames",
        Aliases => "aliases",
        Keywords => "keywords",
        Themes => "themes",
        Places => "places",
        Cultures => "cultures",
        RelatedTerms => "relatedTerms",
        Canonical => "canonical",
        Variants => "variants",
        Tags => "tags",
        Attributes => "attributes",
        SearchTerms => "searchTerms",
    }
}
