//! # Integrity Report
//!
//! Renders [`ValidationResults`] into the two report artifacts:
//!
//! - `integrity-report.json`: counts, tally tables, capped example lists per
//!   issue class, and recommendations.
//! - `integrity-summary.txt`: an aligned text table for human review. The
//!   CLI also prints it to stdout.
//!
//! The text summary carries no timestamp, so two runs over an unchanged
//! corpus render it byte-for-byte identical.

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, Utc};
use mythos_core::{Issue, IssueClass, MythosError};
use serde::Serialize;

use crate::aggregate::{ValidationResults, ValidationSummary};
use crate::config::ValidatorConfig;

/// File name of the JSON report.
pub const REPORT_FILE: &str = "integrity-report.json";
/// File name of the text summary.
pub const SUMMARY_FILE: &str = "integrity-summary.txt";

/// Urgency of a recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Priority {
    /// Relational integrity or structure is broken.
    High,
    /// Migration work.
    Medium,
    /// Cosmetic or advisory.
    Low,
}

impl Priority {
    /// Upper-case label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "HIGH",
            Self::Medium => "MEDIUM",
            Self::Low => "LOW",
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One suggested follow-up.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    /// Urgency.
    pub priority: Priority,
    /// Number of issues the recommendation addresses.
    pub count: usize,
    /// What to do.
    pub action: String,
}

impl Recommendation {
    /// Recommendations in priority order. Zero counts are left out.
    pub fn from_summary(summary: &ValidationSummary) -> Vec<Self> {
        let candidates = [
            (
                Priority::High,
                summary.broken_links,
                "Fix broken links: point references at existing ids or mark them _unverified",
            ),
            (
                Priority::High,
                summary.schema_violations,
                "Fix schema violations: correct field types and malformed reference objects",
            ),
            (
                Priority::Medium,
                summary.legacy_fields,
                "Migrate legacy fields to their canonical schema paths",
            ),
            (
                Priority::Medium,
                summary.string_references + summary.unresolved_references,
                "Standardize bare string references to structured {id, name} objects",
            ),
            (
                Priority::Low,
                summary.invalid_urls,
                "Fix invalid URLs: use absolute URLs or recognized relative paths",
            ),
            (
                Priority::Low,
                summary.invalid_corpus_search,
                "Review corpusSearch metadata: facets must be arrays of non-empty strings",
            ),
        ];
        candidates
            .into_iter()
            .filter(|(_, count, _)| *count > 0)
            .map(|(priority, count, action)| Self {
                priority,
                count,
                action: action.to_string(),
            })
            .collect()
    }
}

/// Where the report artifacts were written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportPaths {
    /// The JSON report.
    pub json: PathBuf,
    /// The text summary.
    pub summary: PathBuf,
}

/// The machine-readable report.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IntegrityReport {
    /// RFC 3339 timestamp of the run.
    pub generated_at: String,
    /// Corpus root that was validated.
    pub corpus_root: String,
    /// Headline counts.
    pub summary: ValidationSummary,
    /// Legacy field name to occurrence count.
    pub legacy_field_usage: BTreeMap<String, usize>,
    /// Entity category to issue count.
    pub issues_by_type: BTreeMap<String, usize>,
    /// Issue kind to issue count.
    pub issues_by_kind: BTreeMap<String, usize>,
    /// Entity type to indexed document count.
    pub documents_by_type: BTreeMap<String, usize>,
    /// Mythology to indexed document count.
    pub documents_by_mythology: BTreeMap<String, usize>,
    /// First `exampleLimit` broken links.
    pub broken_links: Vec<Issue>,
    /// First `secondaryExampleLimit` invalid URLs.
    pub invalid_urls: Vec<Issue>,
    /// First `secondaryExampleLimit` corpus-search findings.
    pub invalid_corpus_search: Vec<Issue>,
    /// First `exampleLimit` format issues.
    pub format_issues: Vec<Issue>,
    /// First `exampleLimit` schema violations.
    pub schema_violations: Vec<Issue>,
    /// First `exampleLimit` general warnings.
    pub warnings: Vec<Issue>,
    /// Follow-ups in priority order.
    pub recommendations: Vec<Recommendation>,
}

impl IntegrityReport {
    /// Build the report from a finished run.
    pub fn from_results(
        results: &ValidationResults,
        config: &ValidatorConfig,
        generated_at: DateTime<Utc>,
    ) -> Self {
        let take = |class: IssueClass| {
            let limit = match class {
                IssueClass::InvalidUrls | IssueClass::InvalidCorpusSearch => {
                    config.secondary_example_limit
                }
                _ => config.example_limit,
            };
            results.issues_in(class).take(limit).cloned().collect::<Vec<_>>()
        };

        Self {
            generated_at: generated_at.to_rfc3339_opts(SecondsFormat::Secs, true),
            corpus_root: config.corpus_root.display().to_string(),
            summary: results.summary.clone(),
            legacy_field_usage: results.legacy_field_usage.clone(),
            issues_by_type: results.issues_by_type.clone(),
            issues_by_kind: results
                .issues_by_kind
                .iter()
                .map(|(kind, n)| (kind.as_str().to_string(), *n))
                .collect(),
            documents_by_type: results.documents_by_type.clone(),
            documents_by_mythology: results.documents_by_mythology.clone(),
            broken_links: take(IssueClass::BrokenLinks),
            invalid_urls: take(IssueClass::InvalidUrls),
            invalid_corpus_search: take(IssueClass::InvalidCorpusSearch),
            format_issues: take(IssueClass::FormatIssues),
            schema_violations: take(IssueClass::SchemaViolations),
            warnings: take(IssueClass::Warnings),
            recommendations: Recommendation::from_summary(&results.summary),
        }
    }

    /// Render the human-readable summary table.
    pub fn render_summary(&self) -> String {
        let s = &self.summary;
        let mut out = String::new();
        let _ = writeln!(out, "Corpus integrity summary");
        let _ = writeln!(out, "Corpus root: {}", self.corpus_root);
        let _ = writeln!(out);

        let headline: Vec<(&str, String)> = vec![
            ("Files discovered", s.files_discovered.to_string()),
            ("Files skipped (no id)", s.files_skipped.to_string()),
            ("Load errors", s.load_errors.to_string()),
            ("Documents validated", s.total_documents.to_string()),
            ("Compliant documents", s.compliant_documents.to_string()),
            ("Documents with issues", s.documents_with_issues.to_string()),
            ("Compliance rate", format!("{:.2}%", s.compliance_rate)),
            ("Errors", s.errors.to_string()),
            ("Warnings", s.warnings.to_string()),
            ("Info", s.info.to_string()),
            ("Broken links", s.broken_links.to_string()),
            ("Schema violations", s.schema_violations.to_string()),
            ("Legacy fields", s.legacy_fields.to_string()),
            (
                "String references",
                (s.string_references + s.unresolved_references).to_string(),
            ),
            ("Format issues", s.format_issues.to_string()),
            ("Invalid URLs", s.invalid_urls.to_string()),
            ("Invalid corpusSearch", s.invalid_corpus_search.to_string()),
            ("Duplicate ids", s.duplicate_ids.to_string()),
        ];
        write_table(&mut out, headline.iter().map(|(k, v)| (*k, v.as_str())));

        if !self.legacy_field_usage.is_empty() {
            let _ = writeln!(out);
            let _ = writeln!(out, "Legacy field usage");
            let mut usage: Vec<_> = self.legacy_field_usage.iter().collect();
            usage.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
            let rows: Vec<_> = usage.iter().map(|(k, v)| (format!("  {k}"), v.to_string())).collect();
            write_table(&mut out, rows.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        }

        write_section(&mut out, "Documents by type", &self.documents_by_type);
        write_section(&mut out, "Documents by mythology", &self.documents_by_mythology);
        write_section(&mut out, "Issues by category", &self.issues_by_type);

        let _ = writeln!(out);
        let _ = writeln!(out, "Recommendations");
        if self.recommendations.is_empty() {
            let _ = writeln!(out, "  none, the corpus is clean");
        }
        for (i, rec) in self.recommendations.iter().enumerate() {
            let _ = writeln!(
                out,
                "  {}. [{}] {} ({})",
                i + 1,
                rec.priority,
                rec.action,
                rec.count
            );
        }
        out
    }

    /// Write both artifacts into `dir`, creating it if needed.
    pub fn write(&self, dir: &Path) -> Result<ReportPaths, MythosError> {
        std::fs::create_dir_all(dir).map_err(|e| {
            MythosError::Report(format!("cannot create reports directory {}: {e}", dir.display()))
        })?;

        let paths = ReportPaths {
            json: dir.join(REPORT_FILE),
            summary: dir.join(SUMMARY_FILE),
        };
        let json = serde_json::to_string_pretty(self)?;
        write_file(&paths.json, &json)?;
        write_file(&paths.summary, &self.render_summary())?;

        tracing::info!(
            json = %paths.json.display(),
            summary = %paths.summary.display(),
            "reports written"
        );
        Ok(paths)
    }
}

fn write_file(path: &Path, content: &str) -> Result<(), MythosError> {
    std::fs::write(path, content)
        .map_err(|e| MythosError::Report(format!("cannot write {}: {e}", path.display())))
}

fn write_section(out: &mut String, title: &str, counts: &BTreeMap<String, usize>) {
    if counts.is_empty() {
        return;
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "{title}");
    let rows: Vec<_> = counts.iter().map(|(k, v)| (format!("  {k}"), v.to_string())).collect();
    write_table(out, rows.iter().map(|(k, v)| (k.as_str(), v.as_str())));
}

fn write_table<'a>(out: &mut String, rows: impl Iterator<Item = (&'a str, &'a str)>) {
    let rows: Vec<_> = rows.collect();
    let key_width = rows.iter().map(|(k, _)| k.len()).max().unwrap_or(0);
    let value_width = rows.iter().map(|(_, v)| v.len()).max().unwrap_or(0);
    for (key, value) in rows {
        let _ = writeln!(out, "{key:<key_width$}  {value:>value_width$}");
    }
}
