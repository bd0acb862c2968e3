use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::descriptor::helpers::{default_minimize, default_size_limit};
use crate::mode::ByMode;

/// Directory copied verbatim into the output directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CopyPattern {
    /// Source directory (or file), relative to the project root
    pub from: PathBuf,

    /// Destination relative to the output directory (default: output root)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<PathBuf>,
}

/// How budget advisories are surfaced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PerformanceHints {
    /// Record advisories without reporting them
    #[default]
    Off,
    /// Report advisories as warnings
    Warning,
    /// Fail the build when any budget is exceeded
    Error,
}

/// Size budget for emitted files
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceOptions {
    #[serde(default)]
    pub hints: PerformanceHints,

    /// Ceiling for the combined size of an entry point's initial files
    #[serde(default = "default_size_limit")]
    pub max_entrypoint_size: u64,

    /// Ceiling for any single emitted file
    #[serde(default = "default_size_limit")]
    pub max_asset_size: u64,
}

impl Default for PerformanceOptions {
    fn default() -> Self {
        Self {
            hints: PerformanceHints::default(),
            max_entrypoint_size: default_size_limit(),
            max_asset_size: default_size_limit(),
        }
    }
}

/// Mode-conditional optimization switches
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationOptions {
    #[serde(default = "default_minimize")]
    pub minimize: ByMode<bool>,
}

impl Default for OptimizationOptions {
    fn default() -> Self {
        Self {
            minimize: default_minimize(),
        }
    }
}
