//! Global settings shared across profiles.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GlobalSettings {
    /// Default log level when neither flags nor RUST_LOG say otherwise
    #[serde(default)]
    pub log_level: Option<String>,

    /// Worker threads for the module-parallel transform phase
    #[serde(default)]
    pub parallel_jobs: Option<usize>,
}
