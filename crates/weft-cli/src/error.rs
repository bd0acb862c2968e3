//! Error handling for the CLI.
//!
//! Commands return [`CliError`]; `main` converts it into a miette report with
//! [`cli_error_to_miette`].

use std::path::PathBuf;

use miette::Report;
use thiserror::Error;
use weft_config::ConfigError;
use weft_pipeline::BuildError;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Build error: {0}")]
    Build(#[from] BuildError),

    /// `check --strict` found rule lints
    #[error("{count} rule lint(s) reported")]
    Lints { count: usize },

    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to configure worker threads: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Convert a [`CliError`] into a miette report with a hint where one helps.
pub fn cli_error_to_miette(err: CliError) -> Report {
    match err {
        CliError::Config(ConfigError::NotFound) => miette::miette!(
            help = "Create a weft.toml in the project root, add a `weft` field to package.json, or pass --config <FILE>",
            "No configuration found"
        ),
        CliError::Config(e) => miette::miette!("Configuration error: {}", e),
        CliError::Build(BuildError::Transform(failure)) => miette::miette!(
            help = format!("Rule {} ({}) failed in '{}'", failure.rule_index, failure.rule, failure.transform),
            "Transform failed for {}: {}",
            failure.path.display(),
            failure.message
        ),
        CliError::Build(BuildError::BudgetExceeded { advisories }) => {
            let lines: Vec<String> = advisories.iter().map(|a| format!("  - {a}")).collect();
            miette::miette!(
                help = "Raise performance.max_entrypoint_size / max_asset_size or set performance.hints = \"warning\"",
                "Performance budget exceeded:\n{}",
                lines.join("\n")
            )
        }
        CliError::Lints { count } => miette::miette!(
            help = "Reorder the rules so specific ones come first, or remove the duplicates",
            "{} rule lint(s) reported",
            count
        ),
        _ => miette::miette!("{}", err),
    }
}
