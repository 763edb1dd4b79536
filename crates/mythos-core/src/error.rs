//! # Error Hierarchy
//!
//! Structured error types for the validator, built with `thiserror`.
//! No `Box<dyn Error>`, no `.unwrap()` outside tests.
//!
//! These errors cover operational failures only. A malformed document or a
//! dangling reference is a finding ([`crate::Issue`]), never an `Err`.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for the validator.
#[derive(Error, Debug)]
pub enum MythosError {
    /// The corpus root directory does not exist or is not a directory.
    #[error("corpus root not found: {}", .0.display())]
    CorpusRootMissing(PathBuf),

    /// Configuration could not be loaded or is inconsistent.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Domain primitive validation failure.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// The envelope schema could not be compiled.
    #[error("schema error: {0}")]
    Schema(String),

    /// The report could not be rendered or written.
    #[error("report error: {0}")]
    Report(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors raised while loading validator configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("cannot read config file {}: {reason}", path.display())]
    Read {
        /// Path of the configuration file.
        path: PathBuf,
        /// Underlying I/O failure.
        reason: String,
    },

    /// The configuration file is not valid YAML for the expected shape.
    #[error("cannot parse config file {}: {reason}", path.display())]
    Parse {
        /// Path of the configuration file.
        path: PathBuf,
        /// Parser message.
        reason: String,
    },

    /// A configuration value is out of range or contradictory.
    #[error("invalid configuration value for {key}: {reason}")]
    Invalid {
        /// The offending key.
        key: String,
        /// Why it was rejected.
        reason: String,
    },
}

/// Validation errors for domain primitive newtypes.
///
/// Carries the rejected input so operators can see exactly what was wrong.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Identifier is empty.
    #[error("invalid entity id: must be non-empty")]
    EmptyId,

    /// Identifier contains characters outside `[a-z0-9_-]`.
    #[error("invalid entity id: \"{0}\" (expected lowercase letters, digits, '-' or '_')")]
    InvalidId(String),

    /// A term is not part of a closed vocabulary.
    #[error("unknown {vocabulary}: \"{term}\"")]
    UnknownTerm {
        /// Name of the vocabulary that was consulted.
        vocabulary: &'static str,
        /// The rejected term.
        term: String,
    },
}
