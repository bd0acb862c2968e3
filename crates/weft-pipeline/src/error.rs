use std::path::PathBuf;

use weft_config::ConfigError;

use crate::budget::Advisory;

/// Error types for pipeline operations.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// Malformed or ambiguous configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A module's transform chain failed.
    #[error(transparent)]
    Transform(#[from] TransformFailure),

    /// Module graph could not be parsed.
    #[error("Invalid module graph: {0}")]
    InvalidGraph(String),

    /// A chunk lists a module the graph does not declare.
    #[error("chunk '{chunk}' references unknown module {}", module.display())]
    UnknownModule { chunk: String, module: PathBuf },

    /// The same module path is declared twice.
    #[error("module {} is declared more than once", .0.display())]
    DuplicateModule(PathBuf),

    /// An entry has no initial chunk of the same name.
    #[error("entry '{0}' has no initial chunk in the module graph")]
    MissingEntryChunk(String),

    /// Two different sources resolve to the same output file.
    #[error("output collision: {} is produced by both {first} and {second}", path.display())]
    OutputCollision {
        path: PathBuf,
        first: String,
        second: String,
    },

    /// Performance budget exceeded with `hints = "error"`.
    #[error("{} file(s) exceed the performance budget", advisories.len())]
    BudgetExceeded { advisories: Vec<Advisory> },

    /// I/O error with the path that caused it.
    #[error("I/O error at {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, BuildError>;

/// A transform in a module's chain returned an error.
///
/// The collaborator's error chain is flattened into `message`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("transform '{transform}' failed for {} ({rule}, rule {rule_index}): {message}", path.display())]
pub struct TransformFailure {
    pub path: PathBuf,
    pub rule_index: usize,
    pub rule: String,
    pub transform: String,
    pub message: String,
}

impl BuildError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        BuildError::Io {
            path: path.into(),
            source,
        }
    }
}
