//! # mythos-integrity — Corpus Relational Integrity Validation
//!
//! Loads every entity document of the knowledge-base corpus, rebuilds the
//! reference graph, and checks every cross-document reference and every
//! structured field against the current schema.
//!
//! ## Pipeline
//!
//! The run has two strictly ordered stages:
//!
//! 1. **Load and index.** [`CorpusLoader`] walks the corpus, parses files
//!    (optionally in parallel), and feeds documents into a
//!    [`CorpusIndexBuilder`]. [`CorpusIndexBuilder::build`] consumes the
//!    builder and returns a frozen [`CorpusIndex`].
//! 2. **Validate.** [`DocumentValidator`] runs every [`FieldValidator`] over
//!    every indexed document. Validators only ever see `&CorpusIndex`, so a
//!    broken-link check cannot run against a partially built index: the type
//!    that allows lookups does not exist until stage 1 is finished.
//!
//! [`Aggregator`] folds per-document findings into [`ValidationResults`],
//! and [`IntegrityReport`] renders the JSON report and the text summary.
//!
//! ## Crate Policy
//!
//! - Read-only over the corpus. The only files written are reports.
//! - A malformed file or reference is a finding, never an abort.
//! - Deterministic: traversal order is sorted, so two runs over an unchanged
//!   corpus produce identical summary counts.

pub mod aggregate;
pub mod config;
pub mod document;
pub mod envelope;
pub mod index;
pub mod loader;
pub mod pipeline;
pub mod report;
pub mod resolver;
pub mod validators;

pub use aggregate::{Aggregator, ValidationResults, ValidationSummary};
pub use config::{ValidatorConfig, ENV_CORPUS_ROOT, ENV_REPORTS_DIR};
pub use document::{EntityDocument, Provenance};
pub use envelope::EnvelopeSchema;
pub use index::{CorpusIndex, CorpusIndexBuilder, DuplicateId, StringResolution};
pub use loader::{CorpusLoader, LoadedCorpus};
pub use pipeline::{run, validate_corpus};
pub use report::{IntegrityReport, Priority, Recommendation, ReportPaths};
pub use resolver::ReferenceResolver;
pub use validators::{DocumentValidator, FieldValidator};
