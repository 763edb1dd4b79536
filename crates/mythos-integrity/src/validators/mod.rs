//! # Field Validators
//!
//! One validator per structural concern. Each is a pure function of a
//! document and the frozen index: it reads, it never writes, and it returns
//! its findings. Every validator runs on every document and returns nothing
//! when its field is absent.
//!
//! [`DocumentValidator`] owns the standard set and runs them in a fixed
//! order so issue lists are stable across runs.

mod duplicate;
mod family;
mod legacy;
mod related;
mod search;
mod sources;
mod urls;

pub use duplicate::DuplicateIdValidator;
pub use family::{FamilyValidator, FAMILY_FIELDS};
pub use legacy::{LegacyArrayValidator, LegacyFieldDetector};
pub use related::{AllyEnemyValidator, RelatedEntitiesValidator};
pub use search::CorpusSearchValidator;
pub use sources::{SourcesValidator, SOURCE_TITLE_KEYS};
pub use urls::{is_valid_url, UrlValidator, URL_FIELDS};

use mythos_core::{Issue, MythosError};

use crate::document::EntityDocument;
use crate::envelope::EnvelopeSchema;
use crate::index::CorpusIndex;
use crate::resolver::ReferenceResolver;

/// A single structural check over one document.
pub trait FieldValidator: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Check `doc`. References are resolved through `resolver`.
    fn validate(&self, doc: &EntityDocument, resolver: &ReferenceResolver<'_>) -> Vec<Issue>;
}

/// Runs a fixed sequence of [`FieldValidator`]s over a document.
pub struct DocumentValidator {
    validators: Vec<Box<dyn FieldValidator>>,
}

impl std::fmt::Debug for DocumentValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.validators.iter().map(|v| v.name()))
            .finish()
    }
}

impl DocumentValidator {
    /// The full validator set, in reporting order.
    ///
    /// # Errors
    ///
    /// Fails only if the embedded envelope schema does not compile.
    pub fn standard() -> Result<Self, MythosError> {
        Ok(Self::new(vec![
            Box::new(EnvelopeSchema::new()?),
            Box::new(DuplicateIdValidator),
            Box::new(LegacyFieldDetector),
            Box::new(LegacyArrayValidator),
            Box::new(FamilyValidator),
            Box::new(RelatedEntitiesValidator),
            Box::new(AllyEnemyValidator),
            Box::new(CorpusSearchValidator),
            Box::new(SourcesValidator),
            Box::new(UrlValidator),
        ]))
    }

    /// A custom validator set.
    pub fn new(validators: Vec<Box<dyn FieldValidator>>) -> Self {
        Self { validators }
    }

    /// Names of the configured validators, in order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.validators.iter().map(|v| v.name())
    }

    /// Run every validator over one document.
    pub fn validate(&self, doc: &EntityDocument, index: &CorpusIndex) -> Vec<Issue> {
        let resolver = ReferenceResolver::new(index);
        let mut issues = Vec::new();
        for validator in &self.validators {
            let found = validator.validate(doc, &resolver);
            if !found.is_empty() {
                tracing::trace!(
                    id = doc.id(),
                    validator = validator.name(),
                    issues = found.len(),
                    "validator findings"
                );
            }
            issues.extend(found);
        }
        issues
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::path::PathBuf;

    use serde_json::Value;

    use crate::document::{EntityDocument, Provenance};
    use crate::index::{CorpusIndex, CorpusIndexBuilder};

    pub fn doc(value: Value) -> EntityDocument {
        EntityDocument::from_value(
            value,
            Provenance {
                source_path: PathBuf::from("corpus/deities/subject.json"),
                category: "deities".to_string(),
                tradition_dir: None,
            },
        )
        .unwrap()
    }

    pub fn index(docs: &[Value]) -> CorpusIndex {
        let mut builder = CorpusIndexBuilder::new();
        for d in docs {
            builder.insert(doc(d.clone()));
        }
        builder.build()
    }
}
