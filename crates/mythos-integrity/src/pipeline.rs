//! Stage orchestration.
//!
//! [`run`] loads and indexes the whole corpus, then validates it. Stage 2
//! borrows the frozen index, so it cannot start before stage 1 returns.

use mythos_core::{Issue, MythosError};
use rayon::prelude::*;

use crate::aggregate::{Aggregator, ValidationResults};
use crate::config::ValidatorConfig;
use crate::document::EntityDocument;
use crate::index::CorpusIndex;
use crate::loader::CorpusLoader;
use crate::validators::DocumentValidator;

/// Validate every indexed document.
///
/// Results come back in load order whether or not the work ran in parallel.
pub fn validate_corpus<'a>(
    index: &'a CorpusIndex,
    validator: &DocumentValidator,
    parallel: bool,
) -> Vec<(&'a EntityDocument, Vec<Issue>)> {
    let docs = index.documents();
    if parallel {
        docs.par_iter()
            .map(|doc| (doc, validator.validate(doc, index)))
            .collect()
    } else {
        docs.iter()
            .map(|doc| (doc, validator.validate(doc, index)))
            .collect()
    }
}

/// Run both stages with the standard validator set.
///
/// # Errors
///
/// Only operational failures: a missing corpus root or an envelope schema
/// that does not compile. Per-document problems are findings in the result.
pub fn run(config: &ValidatorConfig) -> Result<ValidationResults, MythosError> {
    let loaded = CorpusLoader::new(config).load()?;
    let validator = DocumentValidator::standard()?;

    tracing::info!(
        documents = loaded.index.len(),
        parallel = config.parallel,
        "validating corpus"
    );

    let mut aggregator = Aggregator::new();
    aggregator.record_files(loaded.files_discovered, loaded.files_skipped);
    aggregator.record_load_issues(loaded.load_issues);
    aggregator.record_index(&loaded.index);
    for (doc, issues) in validate_corpus(&loaded.index, &validator, config.parallel) {
        aggregator.record_document(doc, issues);
    }
    Ok(aggregator.finish())
}
