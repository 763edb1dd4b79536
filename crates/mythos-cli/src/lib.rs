//! # mythos-cli — Corpus Integrity Command-Line Interface
//!
//! The `mythos` binary. Argument parsing lives in `main.rs`; the handlers
//! here resolve configuration, call into `mythos-integrity`, write the
//! reports and map the outcome to an exit code.
//!
//! ## Exit codes
//!
//! - `0`: no error-severity findings (warnings and info are advisory).
//! - `1`: at least one error-severity finding, e.g. a broken link.
//! - `2`: the run itself failed (missing corpus, bad config, unwritable
//!   reports directory).

pub mod validate;
