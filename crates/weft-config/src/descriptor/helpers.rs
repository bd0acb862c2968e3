use std::path::PathBuf;

use crate::mode::ByMode;
use crate::template::FilenameTemplate;

// Helper defaults
pub(crate) fn default_true() -> bool {
    true
}

pub(crate) fn default_output_path() -> PathBuf {
    PathBuf::from("build")
}

pub(crate) fn default_public_path() -> ByMode<String> {
    ByMode::fixed("/".to_string())
}

pub(crate) fn template(source: &str) -> FilenameTemplate {
    match FilenameTemplate::parse(source) {
        Ok(template) => template,
        Err(err) => unreachable!("built-in template {source:?} is invalid: {err}"),
    }
}

pub(crate) fn default_filename() -> FilenameTemplate {
    template("[name].bundle.js")
}

pub(crate) fn default_chunk_filename() -> FilenameTemplate {
    template("[name].[contenthash:8].chunk.js")
}

pub(crate) fn default_css_filename() -> FilenameTemplate {
    template("[name].css")
}

pub(crate) fn default_css_chunk_filename() -> FilenameTemplate {
    template("[id].css")
}

pub(crate) fn default_html_filename() -> FilenameTemplate {
    template("index.html")
}

pub(crate) fn default_min_chunks() -> usize {
    1
}

pub(crate) fn default_min_size() -> u64 {
    30_000
}

pub(crate) fn default_size_limit() -> u64 {
    512_000
}

pub(crate) fn default_minimize() -> ByMode<bool> {
    ByMode::per_mode(false, true)
}
