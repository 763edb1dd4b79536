//! # Document Loader
//!
//! Walks the corpus root, parses every structured-data file and builds the
//! [`CorpusIndex`].
//!
//! Layout: `<root>/<category>/<id>.json`, optionally with one level of
//! tradition directories, `<root>/<category>/<tradition>/<id>.json`. Deeper
//! nesting is walked too; only the first two levels carry meaning.
//!
//! A file that cannot be read or parsed becomes one `FILE_LOAD_ERROR` issue
//! and loading continues. Paths are sorted before parsing and documents are
//! indexed in that order, so identifier collisions always resolve the same
//! way.

use std::path::Path;

use mythos_core::{Issue, IssueKind, IssueSubject, MythosError};
use rayon::prelude::*;
use serde_json::Value;
use walkdir::WalkDir;

use crate::config::ValidatorConfig;
use crate::document::{EntityDocument, Provenance, UNCATEGORIZED};
use crate::index::{CorpusIndex, CorpusIndexBuilder};

/// Result of stage 1.
#[derive(Debug)]
pub struct LoadedCorpus {
    /// The frozen index.
    pub index: CorpusIndex,
    /// One `FILE_LOAD_ERROR` per unreadable or unparsable file.
    pub load_issues: Vec<Issue>,
    /// Files that matched the extension and prefix rules.
    pub files_discovered: usize,
    /// Parsed files skipped for lacking a usable `id`.
    pub files_skipped: usize,
}

enum ParseOutcome {
    Document(Box<EntityDocument>),
    Skipped,
    Failed(Issue),
}

/// Loads a corpus according to a [`ValidatorConfig`].
#[derive(Debug)]
pub struct CorpusLoader<'a> {
    config: &'a ValidatorConfig,
}

impl<'a> CorpusLoader<'a> {
    /// Create a loader.
    pub fn new(config: &'a ValidatorConfig) -> Self {
        Self { config }
    }

    /// Enumerate qualifying files, sorted by path.
    ///
    /// # Errors
    ///
    /// Returns [`MythosError::CorpusRootMissing`] if the root is not a directory.
    pub fn discover(&self) -> Result<Vec<Provenance>, MythosError> {
        let root = &self.config.corpus_root;
        if !root.is_dir() {
            return Err(MythosError::CorpusRootMissing(root.clone()));
        }

        let mut files = Vec::new();
        let walker = WalkDir::new(root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| entry.depth() == 0 || !is_hidden(entry.file_name()));

        for entry in walker {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    tracing::warn!(error = %e, "failed to read corpus entry");
                    continue;
                }
            };
            if !entry.file_type().is_file() || !self.qualifies(entry.path()) {
                continue;
            }
            files.push(provenance_for(root, entry.path()));
        }

        files.sort_by(|a, b| a.source_path.cmp(&b.source_path));
        Ok(files)
    }

    /// Run stage 1: discover, parse and index every document.
    pub fn load(&self) -> Result<LoadedCorpus, MythosError> {
        let files = self.discover()?;
        tracing::info!(
            root = %self.config.corpus_root.display(),
            files = files.len(),
            "discovered corpus files"
        );

        let outcomes: Vec<ParseOutcome> = if self.config.parallel {
            files.par_iter().map(parse_file).collect()
        } else {
            files.iter().map(parse_file).collect()
        };

        let files_discovered = files.len();
        let mut builder = CorpusIndexBuilder::new();
        let mut load_issues = Vec::new();
        let mut files_skipped = 0usize;

        for outcome in outcomes {
            match outcome {
                ParseOutcome::Document(doc) => builder.insert(*doc),
                ParseOutcome::Skipped => files_skipped += 1,
                ParseOutcome::Failed(issue) => load_issues.push(issue),
            }
        }

        let index = builder.build();
        tracing::info!(
            documents = index.len(),
            skipped = files_skipped,
            failed = load_issues.len(),
            duplicates = index.duplicates().len(),
            "corpus indexed"
        );

        Ok(LoadedCorpus {
            index,
            load_issues,
            files_discovered,
            files_skipped,
        })
    }

    fn qualifies(&self, path: &Path) -> bool {
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            return false;
        };
        if name.starts_with('.') {
            return false;
        }
        if !self.config.excluded_prefix.is_empty() && name.starts_with(&self.config.excluded_prefix) {
            return false;
        }
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case(&self.config.extension))
    }
}

fn is_hidden(name: &std::ffi::OsStr) -> bool {
    name.to_str().is_some_and(|n| n.starts_with('.'))
}

fn provenance_for(root: &Path, path: &Path) -> Provenance {
    let relative = path.strip_prefix(root).unwrap_or(path);
    let mut dirs = relative
        .parent()
        .into_iter()
        .flat_map(Path::components)
        .filter_map(|c| c.as_os_str().to_str().map(str::to_string));

    let category = dirs.next().unwrap_or_else(|| UNCATEGORIZED.to_string());
    let tradition_dir = dirs.next();

    Provenance {
        source_path: path.to_path_buf(),
        category,
        tradition_dir,
    }
}

fn parse_file(provenance: &Provenance) -> ParseOutcome {
    let path = &provenance.source_path;
    let subject = IssueSubject {
        asset_id: None,
        asset_name: None,
        category: provenance.category.clone(),
    };

    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            return ParseOutcome::Failed(load_error(&subject, path, format!("cannot read file: {e}")));
        }
    };

    let value: Value = match serde_json::from_str(&content) {
        Ok(v) => v,
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "failed to parse corpus file");
            return ParseOutcome::Failed(load_error(&subject, path, format!("invalid JSON: {e}")));
        }
    };

    match EntityDocument::from_value(value, provenance.clone()) {
        Some(doc) => ParseOutcome::Document(Box::new(doc)),
        None => {
            tracing::debug!(path = %path.display(), "skipping document without id");
            ParseOutcome::Skipped
        }
    }
}

fn load_error(subject: &IssueSubject, path: &Path, message: String) -> Issue {
    Issue::new(IssueKind::FileLoadError, subject, "<file>", message).with_path(path.display().to_string())
}
