//! Error types for configuration loading and validation.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    // Filesystem validation errors (for CLI use)
    #[error("entry '{name}' not found: {}", path.display())]
    EntryNotFound { name: String, path: PathBuf },

    #[error("html template not found: {}", path.display())]
    TemplateNotFound { path: PathBuf },

    #[error("favicon not found: {}", path.display())]
    FaviconNotFound { path: PathBuf },

    #[error("static copy source not found: {}", path.display())]
    CopySourceNotFound { path: PathBuf },

    // Config parsing/loading errors
    #[error("config not found")]
    NotFound,

    #[error("unsupported configuration format: {0}")]
    UnsupportedFormat(String),

    #[error("invalid config value for '{field}'{}", hint.as_ref().map(|h| format!(": {h}")).unwrap_or_default())]
    InvalidValue { field: String, hint: Option<String> },

    #[error("invalid profile override: {message}")]
    InvalidProfileOverride { message: String },

    // Schema validation errors (no filesystem checks)
    #[error("no entries specified")]
    NoEntries,

    #[error("schema validation failed: {message}")]
    SchemaValidation {
        message: String,
        hint: Option<String>,
    },

    #[error("invalid pattern in {location}: {pattern}")]
    InvalidPattern {
        location: String,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error(
        "ambiguous transform options in rule {rule}: option '{option}' is set by both '{first}' and '{second}' with different values"
    )]
    AmbiguousTransformOptions {
        rule: usize,
        option: String,
        first: String,
        second: String,
    },

    #[error("invalid filename template '{template}': {reason}")]
    InvalidTemplate { template: String, reason: String },

    #[error("filename template '{template}' references [{placeholder}] but no value was supplied")]
    MissingInterpolation {
        template: String,
        placeholder: String,
    },

    #[error("output file '{filename}' resolves outside the destination directory")]
    OutputOutsideDestination { filename: String },

    // I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ConfigError {
    /// Actionable hint for the user, when one is known.
    pub fn hint(&self) -> Option<&str> {
        match self {
            ConfigError::InvalidValue { hint, .. } | ConfigError::SchemaValidation { hint, .. } => {
                hint.as_deref()
            }
            ConfigError::NoEntries => Some("Add at least one entry under [build.entries]"),
            ConfigError::NotFound => Some("Create a weft.toml or add a 'weft' field to package.json"),
            ConfigError::AmbiguousTransformOptions { .. } => {
                Some("Give each transform in the chain its own value or remove the duplicate option")
            }
            _ => None,
        }
    }
}
