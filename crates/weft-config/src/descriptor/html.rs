use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::descriptor::helpers::{default_html_filename, default_true};
use crate::template::FilenameTemplate;

/// HTML page generation options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HtmlOptions {
    /// Path to the HTML template, relative to the project root.
    /// If not provided, a built-in template is used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<PathBuf>,

    /// Output filename for the generated page (default: "index.html")
    #[serde(default = "default_html_filename")]
    pub filename: FilenameTemplate,

    /// Inject script and stylesheet tags into the template
    #[serde(default = "default_true")]
    pub inject: bool,

    /// Entry chunks referenced by the page; empty means every entry
    #[serde(default)]
    pub chunks: Vec<String>,

    /// Favicon copied next to the page and linked from `<head>`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub favicon: Option<PathBuf>,

    #[serde(default)]
    pub minify: HtmlMinifyOptions,
}

impl Default for HtmlOptions {
    fn default() -> Self {
        Self {
            template: None,
            filename: default_html_filename(),
            inject: true,
            chunks: Vec::new(),
            favicon: None,
            minify: HtmlMinifyOptions::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HtmlMinifyOptions {
    #[serde(default)]
    pub remove_comments: bool,

    #[serde(default)]
    pub collapse_whitespace: bool,
}
