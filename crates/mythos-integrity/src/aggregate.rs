//! # Aggregator
//!
//! Folds per-document findings into corpus-wide statistics. Documents are
//! recorded one at a time, in load order, by the single thread that owns the
//! aggregator; parallel validation hands its results over after collection.
//!
//! Every tally is derived from the issues themselves. In particular the
//! legacy-field usage table counts `LEGACY_FIELD` issues per field name, so
//! the table and the warnings can never disagree.

use std::collections::BTreeMap;

use mythos_core::{Issue, IssueClass, IssueKind, Severity};
use serde::Serialize;

use crate::document::EntityDocument;
use crate::index::CorpusIndex;

/// Headline counts of one run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationSummary {
    /// Files matching the extension and prefix rules.
    pub files_discovered: usize,
    /// Parsed files without a usable `id`.
    pub files_skipped: usize,
    /// Files that failed to read or parse.
    pub load_errors: usize,
    /// Documents validated (survivors of identifier collisions).
    pub total_documents: usize,
    /// Documents with no issue of any severity.
    pub compliant_documents: usize,
    /// Documents with at least one issue.
    pub documents_with_issues: usize,
    /// `compliant_documents / total_documents`, as a percentage.
    pub compliance_rate: f64,
    /// All issues, load errors included.
    pub total_issues: usize,
    /// Issues of severity `error`.
    pub errors: usize,
    /// Issues of severity `warning`.
    pub warnings: usize,
    /// Issues of severity `info`.
    pub info: usize,
    /// `BROKEN_LINK` issues.
    pub broken_links: usize,
    /// Issues in the invalid-URL class.
    pub invalid_urls: usize,
    /// Issues in the corpus-search class.
    pub invalid_corpus_search: usize,
    /// Issues in the format class.
    pub format_issues: usize,
    /// Issues in the schema-violation class.
    pub schema_violations: usize,
    /// Issues in the general warning class.
    pub general_warnings: usize,
    /// `LEGACY_FIELD` issues.
    pub legacy_fields: usize,
    /// `STRING_REFERENCE` issues.
    pub string_references: usize,
    /// `UNRESOLVED_STRING_REFERENCE` issues.
    pub unresolved_references: usize,
    /// `DUPLICATE_ID` issues.
    pub duplicate_ids: usize,
}

impl ValidationSummary {
    /// Count for one report class.
    pub fn class_count(&self, class: IssueClass) -> usize {
        match class {
            IssueClass::BrokenLinks => self.broken_links,
            IssueClass::InvalidUrls => self.invalid_urls,
            IssueClass::InvalidCorpusSearch => self.invalid_corpus_search,
            IssueClass::FormatIssues => self.format_issues,
            IssueClass::SchemaViolations => self.schema_violations,
            IssueClass::Warnings => self.general_warnings,
        }
    }

    fn count(&mut self, issue: &Issue) {
        self.total_issues += 1;
        match issue.severity {
            Severity::Error => self.errors += 1,
            Severity::Warning => self.warnings += 1,
            Severity::Info => self.info += 1,
        }
        let slot = match issue.class() {
            IssueClass::BrokenLinks => &mut self.broken_links,
            IssueClass::InvalidUrls => &mut self.invalid_urls,
            IssueClass::InvalidCorpusSearch => &mut self.invalid_corpus_search,
            IssueClass::FormatIssues => &mut self.format_issues,
            IssueClass::SchemaViolations => &mut self.schema_violations,
            IssueClass::Warnings => &mut self.general_warnings,
        };
        *slot += 1;
        match issue.kind {
            IssueKind::FileLoadError => self.load_errors += 1,
            IssueKind::LegacyField => self.legacy_fields += 1,
            IssueKind::StringReference => self.string_references += 1,
            IssueKind::UnresolvedStringReference => self.unresolved_references += 1,
            IssueKind::DuplicateId => self.duplicate_ids += 1,
            _ => {}
        }
    }
}

/// Everything a run found.
#[derive(Debug, Clone, Default)]
pub struct ValidationResults {
    /// Headline counts.
    pub summary: ValidationSummary,
    /// Every issue: load errors first, then per document in load order.
    pub issues: Vec<Issue>,
    /// Legacy field name to number of documents carrying it.
    pub legacy_field_usage: BTreeMap<String, usize>,
    /// Entity category to number of issues attributed to it.
    pub issues_by_type: BTreeMap<String, usize>,
    /// Issue kind to number of occurrences.
    pub issues_by_kind: BTreeMap<IssueKind, usize>,
    /// Entity type to number of indexed documents.
    pub documents_by_type: BTreeMap<String, usize>,
    /// Mythology to number of indexed documents. Untagged documents are absent.
    pub documents_by_mythology: BTreeMap<String, usize>,
}

impl ValidationResults {
    /// Whether any `error`-severity issue was found.
    pub fn has_errors(&self) -> bool {
        self.summary.errors > 0
    }

    /// Issues of one report class, in recording order.
    pub fn issues_in(&self, class: IssueClass) -> impl Iterator<Item = &Issue> {
        self.issues.iter().filter(move |i| i.class() == class)
    }
}

/// Accumulates findings.
#[derive(Debug, Default)]
pub struct Aggregator {
    results: ValidationResults,
}

impl Aggregator {
    /// Create an empty aggregator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record file-discovery counts from stage 1.
    pub fn record_files(&mut self, discovered: usize, skipped: usize) {
        self.results.summary.files_discovered = discovered;
        self.results.summary.files_skipped = skipped;
    }

    /// Record the shape of the frozen index: documents per type and per
    /// mythology.
    pub fn record_index(&mut self, index: &CorpusIndex) {
        self.results.documents_by_type =
            index.type_counts().map(|(k, n)| (k.to_string(), n)).collect();
        self.results.documents_by_mythology =
            index.mythology_counts().map(|(k, n)| (k.to_string(), n)).collect();
    }

    /// Record load-time issues. They are not attributed to any document.
    pub fn record_load_issues(&mut self, issues: impl IntoIterator<Item = Issue>) {
        for issue in issues {
            self.push(issue);
        }
    }

    /// Record the findings for one validated document.
    pub fn record_document(&mut self, doc: &EntityDocument, issues: Vec<Issue>) {
        let summary = &mut self.results.summary;
        summary.total_documents += 1;
        if issues.is_empty() {
            summary.compliant_documents += 1;
        } else {
            summary.documents_with_issues += 1;
            tracing::debug!(id = doc.id(), issues = issues.len(), "document has issues");
        }
        for issue in issues {
            self.push(issue);
        }
    }

    /// Finish the run and compute derived rates.
    pub fn finish(mut self) -> ValidationResults {
        let summary = &mut self.results.summary;
        summary.compliance_rate = compliance_rate(summary.compliant_documents, summary.total_documents);
        tracing::info!(
            documents = summary.total_documents,
            compliant = summary.compliant_documents,
            errors = summary.errors,
            warnings = summary.warnings,
            "validation finished"
        );
        self.results
    }

    fn push(&mut self, issue: Issue) {
        let results = &mut self.results;
        results.summary.count(&issue);
        *results.issues_by_type.entry(issue.category.clone()).or_default() += 1;
        *results.issues_by_kind.entry(issue.kind).or_default() += 1;
        if issue.kind == IssueKind::LegacyField {
            *results.legacy_field_usage.entry(issue.field.clone()).or_default() += 1;
        }
        results.issues.push(issue);
    }
}

/// Percentage rounded to two decimals. An empty corpus is fully compliant.
fn compliance_rate(compliant: usize, total: usize) -> f64 {
    if total == 0 {
        return 100.0;
    }
    (compliant as f64 * 10_000.0 / total as f64).round() / 100.0
}
