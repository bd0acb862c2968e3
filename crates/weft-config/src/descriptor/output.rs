use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::descriptor::helpers::{
    default_chunk_filename, default_filename, default_output_path, default_public_path,
};
use crate::mode::{ByMode, Mode};
use crate::template::FilenameTemplate;

/// Output layout: naming templates, destination and public base path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputOptions {
    /// Template for entry bundles
    #[serde(default = "default_filename")]
    pub filename: FilenameTemplate,

    /// Template for non-entry chunks (async and extracted shared chunks)
    #[serde(default = "default_chunk_filename")]
    pub chunk_filename: FilenameTemplate,

    /// Destination directory, relative to the project root
    #[serde(default = "default_output_path")]
    pub path: PathBuf,

    /// Prefix embedded in generated HTML/CSS references
    #[serde(default = "default_public_path")]
    pub public_path: ByMode<String>,
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            filename: default_filename(),
            chunk_filename: default_chunk_filename(),
            path: default_output_path(),
            public_path: default_public_path(),
        }
    }
}

impl OutputOptions {
    pub fn resolve(&self, mode: Mode) -> ResolvedOutputOptions {
        ResolvedOutputOptions {
            filename: self.filename.clone(),
            chunk_filename: self.chunk_filename.clone(),
            path: self.path.clone(),
            public_path: self.public_path.resolve(mode).clone(),
        }
    }
}

/// Output layout with the public path bound to a mode.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedOutputOptions {
    pub filename: FilenameTemplate,
    pub chunk_filename: FilenameTemplate,
    pub path: PathBuf,
    pub public_path: String,
}
