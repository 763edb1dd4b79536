//! # Validation Issues
//!
//! The unit of validator output. An [`Issue`] is built once by a field
//! validator or the loader, never mutated afterwards, and accumulated by the
//! aggregator.
//!
//! Severity and report class are functions of [`IssueKind`], so two issues
//! of the same kind can never disagree about how serious they are.

use serde::{Deserialize, Serialize};

/// How actionable a finding is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Structural violation or broken relational integrity.
    Error,
    /// Legacy convention or inferable omission; should be migrated.
    Warning,
    /// Purely advisory.
    Info,
}

impl Severity {
    /// Lowercase label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The report section an issue is listed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum IssueClass {
    /// Structured references whose `id` is not in the corpus.
    BrokenLinks,
    /// URL-bearing fields that are neither absolute nor a recognized relative path.
    InvalidUrls,
    /// Malformed `corpusSearch` metadata.
    InvalidCorpusSearch,
    /// Reference-shape and migration problems.
    FormatIssues,
    /// Structural violations of the document schema.
    SchemaViolations,
    /// Everything else that is worth a look.
    Warnings,
}

impl IssueClass {
    /// Every class in report order.
    pub fn all() -> &'static [IssueClass] {
        &[
            Self::BrokenLinks,
            Self::InvalidUrls,
            Self::InvalidCorpusSearch,
            Self::FormatIssues,
            Self::SchemaViolations,
            Self::Warnings,
        ]
    }

    /// Key used in the JSON report.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BrokenLinks => "brokenLinks",
            Self::InvalidUrls => "invalidUrls",
            Self::InvalidCorpusSearch => "invalidCorpusSearch",
            Self::FormatIssues => "formatIssues",
            Self::SchemaViolations => "schemaViolations",
            Self::Warnings => "warnings",
        }
    }
}

/// The fixed vocabulary of findings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueKind {
    /// A corpus file could not be read or parsed.
    FileLoadError,
    /// The document envelope failed the embedded JSON Schema.
    SchemaViolation,
    /// Another document with the same `id` was overwritten in the index.
    DuplicateId,
    /// A deprecated field name is present.
    LegacyField,
    /// A family sub-field is free text instead of a reference array.
    FamilyStringFormat,
    /// `family` or one of its sub-fields has the wrong JSON type.
    InvalidFamilyFormat,
    /// `relatedEntities` (or a bucket of it) has the wrong JSON type.
    InvalidRelatedEntities,
    /// A `relatedEntities` bucket key is not a known entity category.
    UnknownEntityCategory,
    /// A reference list (`allies`, `enemies`, legacy array) is not an array.
    InvalidReferenceList,
    /// A reference list element is neither a string nor an object.
    InvalidReference,
    /// A reference is a bare string instead of a structured object.
    StringReference,
    /// A bare string reference matches no document by id or name.
    UnresolvedStringReference,
    /// A structured reference has none of `id`, `name`, `link`.
    MissingReferenceFields,
    /// A structured reference has no `id`.
    MissingReferenceId,
    /// A structured reference has an `id` but no `name`.
    MissingReferenceName,
    /// A structured reference carries a `link` but no `id`.
    LinkWithoutId,
    /// A structured reference `id` breaks the identifier grammar.
    InvalidReferenceId,
    /// A `relationshipType` outside the registry vocabulary.
    InvalidRelationshipType,
    /// A structured reference `id` that is not in the corpus.
    BrokenLink,
    /// `corpusSearch` is not an object.
    InvalidCorpusSearch,
    /// A `corpusSearch` facet value is not an array.
    InvalidCorpusFacet,
    /// A `corpusSearch` facet name outside the known vocabulary.
    UnknownCorpusFacet,
    /// A `corpusSearch` term is not a string.
    InvalidCorpusTerm,
    /// A `corpusSearch` term is an empty string.
    EmptyCorpusTerm,
    /// `sources`/`primarySources` is not an array.
    InvalidSources,
    /// A source entry is not an object.
    InvalidSourceEntry,
    /// A source entry carries no title, text or source identifier.
    MissingSourceTitle,
    /// A source entry `url` is not a valid URL.
    InvalidSourceUrl,
    /// A URL-bearing field is neither absolute nor a recognized relative path.
    InvalidUrl,
    /// An `images` element is not an object with a string `url`.
    InvalidImageEntry,
}

impl IssueKind {
    /// Every kind, in declaration order.
    pub fn all() -> &'static [IssueKind] {
        &[
            Self::FileLoadError,
            Self::SchemaViolation,
            Self::DuplicateId,
            Self::LegacyField,
            Self::FamilyStringFormat,
            Self::InvalidFamilyFormat,
            Self::InvalidRelatedEntities,
            Self::UnknownEntityCategory,
            Self::InvalidReferenceList,
            Self::InvalidReference,
            Self::StringReference,
            Self::UnresolvedStringReference,
            Self::MissingReferenceFields,
            Self::MissingReferenceId,
            Self::MissingReferenceName,
            Self::LinkWithoutId,
            Self::InvalidReferenceId,
            Self::InvalidRelationshipType,
            Self::BrokenLink,
            Self::InvalidCorpusSearch,
            Self::InvalidCorpusFacet,
            Self::UnknownCorpusFacet,
            Self::InvalidCorpusTerm,
            Self::EmptyCorpusTerm,
            Self::InvalidSources,
            Self::InvalidSourceEntry,
            Self::MissingSourceTitle,
            Self::InvalidSourceUrl,
            Self::InvalidUrl,
            Self::InvalidImageEntry,
        ]
    }

    /// Wire spelling, e.g. `BROKEN_LINK`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FileLoadError => "FILE_LOAD_ERROR",
            Self::SchemaViolation => "SCHEMA_VIOLATION",
            Self::DuplicateId => "DUPLICATE_ID",
            Self::LegacyField => "LEGACY_FIELD",
            Self::FamilyStringFormat => "FAMILY_STRING_FORMAT",
            Self::InvalidFamilyFormat => "INVALID_FAMILY_FORMAT",
            Self::InvalidRelatedEntities => "INVALID_RELATED_ENTITIES",
            Self::UnknownEntityCategory => "UNKNOWN_ENTITY_CATEGORY",
            Self::InvalidReferenceList => "INVALID_REFERENCE_LIST",
            Self::InvalidReference => "INVALID_REFERENCE",
            Self::StringReference => "STRING_REFERENCE",
            Self::UnresolvedStringReference => "UNRESOLVED_STRING_REFERENCE",
            Self::MissingReferenceFields => "MISSING_REFERENCE_FIELDS",
            Self::MissingReferenceId => "MISSING_REFERENCE_ID",
            Self::MissingReferenceName => "MISSING_REFERENCE_NAME",
            Self::LinkWithoutId => "LINK_WITHOUT_ID",
            Self::InvalidReferenceId => "INVALID_REFERENCE_ID",
            Self::InvalidRelationshipType => "INVALID_RELATIONSHIP_TYPE",
            Self::BrokenLink => "BROKEN_LINK",
            Self::InvalidCorpusSearch => "INVALID_CORPUS_SEARCH",
            Self::InvalidCorpusFacet => "INVALID_CORPUS_FACET",
            Self::UnknownCorpusFacet => "UNKNOWN_CORPUS_FACET",
            Self::InvalidCorpusTerm => "INVALID_CORPUS_TERM",
            Self::EmptyCorpusTerm => "EMPTY_CORPUS_TERM",
            Self::InvalidSources => "INVALID_SOURCES",
            Self::InvalidSourceEntry => "INVALID_SOURCE_ENTRY",
            Self::MissingSourceTitle => "MISSING_SOURCE_TITLE",
            Self::InvalidSourceUrl => "INVALID_SOURCE_URL",
            Self::InvalidUrl => "INVALID_URL",
            Self::InvalidImageEntry => "INVALID_IMAGE_ENTRY",
        }
    }

    /// Severity of every issue of this kind.
    pub fn severity(&self) -> Severity {
        match self {
            Self::FileLoadError
            | Self::SchemaViolation
            | Self::FamilyStringFormat
            | Self::InvalidFamilyFormat
            | Self::InvalidRelatedEntities
            | Self::InvalidReferenceList
            | Self::InvalidReference
            | Self::MissingReferenceFields
            | Self::InvalidReferenceId
            | Self::BrokenLink
            | Self::InvalidCorpusSearch
            | Self::InvalidCorpusFacet
            | Self::InvalidSources
            | Self::InvalidSourceEntry
            | Self::InvalidSourceUrl => Severity::Error,
            Self::DuplicateId
            | Self::LegacyField
            | Self::UnknownEntityCategory
            | Self::StringReference
            | Self::UnresolvedStringReference
            | Self::MissingReferenceId
            | Self::MissingReferenceName
            | Self::LinkWithoutId
            | Self::InvalidRelationshipType
            | Self::InvalidCorpusTerm
            | Self::EmptyCorpusTerm
            | Self::MissingSourceTitle
            | Self::InvalidUrl
            | Self::InvalidImageEntry => Severity::Warning,
            Self::UnknownCorpusFacet => Severity::Info,
        }
    }

    /// Report section for issues of this kind.
    pub fn class(&self) -> IssueClass {
        match self {
            Self::BrokenLink => IssueClass::BrokenLinks,
            Self::InvalidSourceUrl | Self::InvalidUrl | Self::InvalidImageEntry => {
                IssueClass::InvalidUrls
            }
            Self::InvalidCorpusSearch
            | Self::InvalidCorpusFacet
            | Self::UnknownCorpusFacet
            | Self::InvalidCorpusTerm
            | Self::EmptyCorpusTerm => IssueClass::InvalidCorpusSearch,
            Self::FamilyStringFormat
            | Self::StringReference
            | Self::UnresolvedStringReference
            | Self::MissingReferenceId
            | Self::MissingReferenceName
            | Self::LinkWithoutId => IssueClass::FormatIssues,
            Self::FileLoadError
            | Self::SchemaViolation
            | Self::InvalidFamilyFormat
            | Self::InvalidRelatedEntities
            | Self::InvalidReferenceList
            | Self::InvalidReference
            | Self::MissingReferenceFields
            | Self::InvalidReferenceId
            | Self::InvalidSources
            | Self::InvalidSourceEntry => IssueClass::SchemaViolations,
            Self::DuplicateId
            | Self::LegacyField
            | Self::UnknownEntityCategory
            | Self::InvalidRelationshipType
            | Self::MissingSourceTitle => IssueClass::Warnings,
        }
    }
}

impl std::fmt::Display for IssueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The document an issue is attributed to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueSubject {
    /// Document identifier; `None` for file-level failures.
    pub asset_id: Option<String>,
    /// Document display name, when it has one.
    pub asset_name: Option<String>,
    /// Entity category used for per-category tallies.
    pub category: String,
}

/// A single validation finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    /// What was found.
    #[serde(rename = "type")]
    pub kind: IssueKind,
    /// Derived from `kind`.
    pub severity: Severity,
    /// Offending document identifier.
    pub asset_id: Option<String>,
    /// Offending document display name.
    pub asset_name: Option<String>,
    /// Entity category of the offending document.
    pub category: String,
    /// Dotted field path, e.g. `family.children[2]`.
    pub field: String,
    /// Human-readable explanation.
    pub message: String,
    /// Label of the reference involved.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    /// Identifier the resolver tried for a bare string reference.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attempted_id: Option<String>,
    /// Identifier that could be filled in.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_id: Option<String>,
    /// Canonical replacement for a legacy field.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replacement: Option<String>,
    /// The offending value, rendered as a string.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    /// Source file path for load-time issues.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl Issue {
    /// Create an issue; severity follows from `kind`.
    pub fn new(
        kind: IssueKind,
        subject: &IssueSubject,
        field: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            severity: kind.severity(),
            asset_id: subject.asset_id.clone(),
            asset_name: subject.asset_name.clone(),
            category: subject.category.clone(),
            field: field.into(),
            message: message.into(),
            reference: None,
            attempted_id: None,
            suggested_id: None,
            replacement: None,
            value: None,
            path: None,
        }
    }

    /// Attach the label of the reference involved.
    #[must_use]
    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }

    /// Attach the identifier the resolver attempted.
    #[must_use]
    pub fn with_attempted_id(mut self, id: impl Into<String>) -> Self {
        self.attempted_id = Some(id.into());
        self
    }

    /// Attach a suggested identifier, if any.
    #[must_use]
    pub fn with_suggested_id(mut self, id: Option<String>) -> Self {
        self.suggested_id = id;
        self
    }

    /// Attach the canonical replacement path.
    #[must_use]
    pub fn with_replacement(mut self, replacement: impl Into<String>) -> Self {
        self.replacement = Some(replacement.into());
        self
    }

    /// Attach the offending value.
    #[must_use]
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Attach the source file path.
    #[must_use]
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Report class of this issue.
    pub fn class(&self) -> IssueClass {
        self.kind.class()
    }
}
