use serde::{Deserialize, Serialize};

use crate::descriptor::helpers::{default_css_chunk_filename, default_css_filename};
use crate::template::FilenameTemplate;

/// Stylesheet extraction naming
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CssOptions {
    /// Template for stylesheets extracted from entry chunks
    #[serde(default = "default_css_filename")]
    pub filename: FilenameTemplate,

    /// Template for stylesheets extracted from non-entry chunks
    #[serde(default = "default_css_chunk_filename")]
    pub chunk_filename: FilenameTemplate,

    /// Suppress warnings about conflicting stylesheet order across chunks
    #[serde(default)]
    pub ignore_order: bool,
}

impl Default for CssOptions {
    fn default() -> Self {
        Self {
            filename: default_css_filename(),
            chunk_filename: default_css_chunk_filename(),
            ignore_order: false,
        }
    }
}
