use serde::{Deserialize, Serialize};

use crate::descriptor::helpers::{default_min_chunks, default_min_size, default_true};

/// Which chunks count towards `min_chunks`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChunkSelection {
    /// Entry and async chunks alike
    All,
    /// Only chunks reached through deferred loading
    #[default]
    Async,
    /// Only entry chunks
    Initial,
}

/// Shared-code extraction policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplitOptions {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default)]
    pub chunks: ChunkSelection,

    /// Minimum number of distinct chunks a module must appear in
    #[serde(default = "default_min_chunks")]
    pub min_chunks: usize,

    /// Minimum total size (bytes) of a group before it is extracted
    #[serde(default = "default_min_size")]
    pub min_size: u64,

    /// Name of the implicit group for eligible modules no rule claims
    #[serde(default = "default_group_name")]
    pub default_group: String,

    /// Group rules, checked by ascending priority then declaration order
    #[serde(default)]
    pub groups: Vec<GroupRule>,
}

impl Default for SplitOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            chunks: ChunkSelection::default(),
            min_chunks: default_min_chunks(),
            min_size: default_min_size(),
            default_group: default_group_name(),
            groups: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupRule {
    /// Group (and extracted chunk) name
    pub name: String,

    #[serde(default)]
    pub priority: i32,

    /// Regex over the module path; absent means "every module"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test: Option<String>,
}

fn default_group_name() -> String {
    "default".to_string()
}
