//! # Validate Subcommand
//!
//! Runs the two-stage integrity check over a corpus and writes
//! `integrity-report.json` and `integrity-summary.txt`.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Args;

use mythos_core::MythosError;
use mythos_integrity::{run, IntegrityReport, ValidatorConfig, ENV_CORPUS_ROOT};

/// Arguments for the `mythos validate` subcommand.
#[derive(Args, Debug, Clone, Default)]
pub struct ValidateArgs {
    /// Corpus root directory. Overrides the config file and MYTHOS_CORPUS_ROOT.
    #[arg(value_name = "CORPUS_ROOT")]
    pub corpus_root: Option<PathBuf>,

    /// Directory for the report files. Overrides MYTHOS_REPORTS_DIR.
    #[arg(long, value_name = "DIR")]
    pub reports_dir: Option<PathBuf>,

    /// Parse and validate on a single thread.
    #[arg(long)]
    pub no_parallel: bool,

    /// Do not print the summary table to stdout.
    #[arg(short, long)]
    pub quiet: bool,
}

/// Resolve the effective configuration.
///
/// Layers, later wins: defaults, the `--config` YAML file, environment
/// (through `lookup`), then command-line flags.
pub fn resolve_config(
    args: &ValidateArgs,
    config_path: Option<&Path>,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<ValidatorConfig> {
    let mut config = match config_path {
        Some(path) => ValidatorConfig::from_file(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => ValidatorConfig::default(),
    };
    config.apply_overrides(lookup);

    if let Some(root) = &args.corpus_root {
        config.corpus_root = root.clone();
    }
    if let Some(dir) = &args.reports_dir {
        config.reports_dir = dir.clone();
    }
    if args.no_parallel {
        config.parallel = false;
    }
    Ok(config)
}

/// Execute the validate subcommand.
///
/// Returns exit code: 0 when clean or advisory-only, 1 when any error-severity
/// issue was found. Operational failures are returned as `Err`.
pub fn run_validate(args: &ValidateArgs, config_path: Option<&Path>) -> Result<u8> {
    let config = resolve_config(args, config_path, |key| std::env::var(key).ok())?;
    execute(args, &config)
}

/// Validate with an already resolved configuration and write the reports.
pub fn execute(args: &ValidateArgs, config: &ValidatorConfig) -> Result<u8> {
    tracing::debug!(
        corpus_root = %config.corpus_root.display(),
        reports_dir = %config.reports_dir.display(),
        parallel = config.parallel,
        "resolved configuration"
    );

    let results = match run(config) {
        Ok(results) => results,
        Err(MythosError::CorpusRootMissing(root)) => bail!(
            "corpus root not found: {} (pass CORPUS_ROOT, set {ENV_CORPUS_ROOT}, or set corpusRoot in --config)",
            root.display()
        ),
        Err(e) => {
            return Err(e).with_context(|| {
                format!("failed to validate corpus at {}", config.corpus_root.display())
            })
        }
    };

    let report = IntegrityReport::from_results(&results, config, chrono::Utc::now());
    let paths = report
        .write(&config.reports_dir)
        .context("failed to write integrity reports")?;

    if !args.quiet {
        print!("{}", report.render_summary());
        println!();
        println!("Report:  {}", paths.json.display());
        println!("Summary: {}", paths.summary.display());
    }

    if results.has_errors() {
        tracing::warn!(
            errors = results.summary.errors,
            broken_links = results.summary.broken_links,
            "corpus has integrity errors"
        );
        Ok(1)
    } else {
        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn defaults_without_file_or_flags() {
        let config = resolve_config(&ValidateArgs::default(), None, no_env).unwrap();
        assert_eq!(config, ValidatorConfig::default());
    }

    #[test]
    fn flags_override_environment() {
        let args = ValidateArgs {
            corpus_root: Some(PathBuf::from("/flag/corpus")),
            no_parallel: true,
            ..Default::default()
        };
        let config = resolve_config(&args, None, |key| match key {
            "MYTHOS_CORPUS_ROOT" => Some("/env/corpus".to_string()),
            "MYTHOS_REPORTS_DIR" => Some("/env/reports".to_string()),
            _ => None,
        })
        .unwrap();
        assert_eq!(config.corpus_root, PathBuf::from("/flag/corpus"));
        assert_eq!(config.reports_dir, PathBuf::from("/env/reports"));
        assert!(!config.parallel);
    }

    #[test]
    fn environment_overrides_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mythos.yaml");
        std::fs::write(&path, "corpusRoot: /file/corpus\nreportsDir: /file/reports\n").unwrap();

        let config = resolve_config(&ValidateArgs::default(), Some(&path), |key| {
            (key == "MYTHOS_REPORTS_DIR").then(|| "/env/reports".to_string())
        })
        .unwrap();
        assert_eq!(config.corpus_root, PathBuf::from("/file/corpus"));
        assert_eq!(config.reports_dir, PathBuf::from("/env/reports"));
    }

    #[test]
    fn unreadable_config_is_an_error() {
        let err = resolve_config(
            &ValidateArgs::default(),
            Some(Path::new("/nonexistent/mythos.yaml")),
            no_env,
        )
        .unwrap_err();
        assert!(format!("{err:#}").contains("failed to load config"));
    }
}
