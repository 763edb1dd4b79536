#![deny(missing_docs)]

//! # mythos-core — Foundational Types for the Knowledge-Base Integrity Validator
//!
//! This crate defines the types every other crate in the workspace depends on.
//! It has no internal crate dependencies — only `serde`, `serde_json`, and
//! `thiserror` from the external ecosystem.
//!
//! ## Design Principles
//!
//! 1. **One definition per vocabulary.** [`RelationshipType`], [`EntityType`]
//!    and [`CorpusFacet`] are closed enums shared by the validators and the
//!    report layer. No string literal lists that can drift apart.
//!
//! 2. **References are a sum type.** [`EntityReference`] is either a bare
//!    legacy string or a structured object. The resolver matches on it
//!    exhaustively instead of inspecting JSON shapes at every call site.
//!
//! 3. **Findings are data, not errors.** Per-document problems are [`Issue`]
//!    values. [`MythosError`] is reserved for operational failures (missing
//!    corpus root, unreadable config, unwritable reports directory).

pub mod error;
pub mod identity;
pub mod issue;
pub mod legacy;
pub mod reference;
pub mod vocabulary;

// Re-export primary types at crate root for ergonomic imports.
pub use error::{ConfigError, MythosError, ValidationError};
pub use identity::{id_from_link, is_valid_id, normalize_id, EntityId};
pub use issue::{Issue, IssueClass, IssueKind, IssueSubject, Severity};
pub use legacy::{canonical_path_for, LegacyField, LEGACY_FIELD_MAP};
pub use reference::{EntityReference, StructuredReference};
pub use vocabulary::{CorpusFacet, EntityType, RelationshipType};
