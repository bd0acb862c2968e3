//! The build configuration descriptor and its mode-bound form.

mod assets;
mod css;
mod helpers;
mod html;
mod output;
mod rule;
mod split;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::PathBuf;

pub use assets::{CopyPattern, OptimizationOptions, PerformanceHints, PerformanceOptions};
pub use css::CssOptions;
pub use html::{HtmlMinifyOptions, HtmlOptions};
pub use output::{OutputOptions, ResolvedOutputOptions};
pub use rule::{Matcher, RuleConfig, Scope, TransformConfig, well_known};
pub use split::{ChunkSelection, GroupRule, SplitOptions};

use crate::error::ConfigError;
use crate::mode::{ByMode, Mode};

/// Static description of a build, before the mode is bound.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Descriptor {
    /// Entry name → module path. Names are unique by construction.
    #[serde(default)]
    pub entries: IndexMap<String, PathBuf>,

    /// Ordered rule table; the first matching rule wins
    #[serde(default)]
    pub rules: Vec<RuleConfig>,

    #[serde(default)]
    pub output: OutputOptions,

    #[serde(default)]
    pub split: SplitOptions,

    #[serde(default)]
    pub css: CssOptions,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html: Option<HtmlOptions>,

    /// Compile-time replacements (identifier → JSON value)
    #[serde(default)]
    pub define: IndexMap<String, ByMode<Value>>,

    /// Static assets copied verbatim into the output directory
    #[serde(default)]
    pub copy: Vec<CopyPattern>,

    #[serde(default)]
    pub performance: PerformanceOptions,

    #[serde(default)]
    pub optimization: OptimizationOptions,
}

/// A named root module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entry {
    pub name: String,
    pub module: PathBuf,
}

/// The descriptor with every mode-conditional value bound.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedDescriptor {
    pub mode: Mode,
    pub entries: Vec<Entry>,
    pub rules: Vec<RuleConfig>,
    pub output: ResolvedOutputOptions,
    pub split: SplitOptions,
    pub css: CssOptions,
    pub html: Option<HtmlOptions>,
    /// Identifier → JSON-encoded replacement text
    pub define: IndexMap<String, String>,
    pub copy: Vec<CopyPattern>,
    pub performance: PerformanceOptions,
    pub minimize: bool,
}

impl Descriptor {
    /// Create from serde_json::Value (for programmatic configuration)
    ///
    /// # Example
    ///
    /// ```
    /// use weft_config::Descriptor;
    /// use serde_json::json;
    ///
    /// let descriptor = Descriptor::from_value(json!({
    ///     "entries": { "vanilla": "src/main.js" },
    ///     "output": { "public_path": { "development": "/", "production": "./" } }
    /// }))
    /// .unwrap();
    /// assert_eq!(descriptor.entries.len(), 1);
    /// ```
    pub fn from_value(value: Value) -> Result<Self, ConfigError> {
        serde_json::from_value(value).map_err(|e| ConfigError::InvalidValue {
            field: "build".to_string(),
            hint: Some(e.to_string()),
        })
    }

    /// Convert to serde_json::Value
    pub fn to_value(&self) -> Result<Value, ConfigError> {
        serde_json::to_value(self).map_err(|e| ConfigError::InvalidValue {
            field: "build".to_string(),
            hint: Some(e.to_string()),
        })
    }

    pub fn with_entry(mut self, name: impl Into<String>, module: impl Into<PathBuf>) -> Self {
        self.entries.insert(name.into(), module.into());
        self
    }

    pub fn with_rule(mut self, rule: RuleConfig) -> Self {
        self.rules.push(rule);
        self
    }

    /// Bind `mode`, producing the concrete configuration handed to the engine.
    ///
    /// This is a pure function: the same descriptor and mode always produce an
    /// identical result.
    pub fn resolve(&self, mode: Mode) -> ResolvedDescriptor {
        let entries = self
            .entries
            .iter()
            .map(|(name, module)| Entry {
                name: name.clone(),
                module: module.clone(),
            })
            .collect();

        let define = self
            .define
            .iter()
            .map(|(key, value)| (key.clone(), value.resolve(mode).to_string()))
            .collect();

        ResolvedDescriptor {
            mode,
            entries,
            rules: self.rules.clone(),
            output: self.output.resolve(mode),
            split: self.split.clone(),
            css: self.css.clone(),
            html: self.html.clone(),
            define,
            copy: self.copy.clone(),
            performance: self.performance.clone(),
            minimize: *self.optimization.minimize.resolve(mode),
        }
    }
}

impl ResolvedDescriptor {
    pub fn entry(&self, name: &str) -> Option<&Entry> {
        self.entries.iter().find(|entry| entry.name == name)
    }

    pub fn is_entry(&self, name: &str) -> bool {
        self.entry(name).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn defaults_follow_bundle_conventions() {
        let descriptor = Descriptor::default();
        assert_eq!(descriptor.output.filename.as_str(), "[name].bundle.js");
        assert_eq!(descriptor.output.path, PathBuf::from("build"));
        assert_eq!(descriptor.css.chunk_filename.as_str(), "[id].css");
        assert_eq!(descriptor.performance.max_asset_size, 512_000);
        assert_eq!(descriptor.split.chunks, ChunkSelection::Async);
    }

    #[test]
    fn resolve_binds_public_path_and_minimize() {
        let descriptor = Descriptor::from_value(json!({
            "entries": {"vanilla": "src/main.js"},
            "output": {"public_path": {"development": "/", "production": "./"}}
        }))
        .unwrap();

        let dev = descriptor.resolve(Mode::Development);
        let prod = descriptor.resolve(Mode::Production);
        assert_eq!(dev.output.public_path, "/");
        assert_eq!(prod.output.public_path, "./");
        assert!(!dev.minimize);
        assert!(prod.minimize);
        assert_eq!(dev.output.filename, prod.output.filename);
    }

    #[test]
    fn resolve_json_encodes_define_values() {
        let descriptor = Descriptor::from_value(json!({
            "define": {
                "process.env.NODE_ENV": {"development": "development", "production": "production"},
                "process.env.SKIP_PREFLIGHT_CHECK": true
            }
        }))
        .unwrap();

        let resolved = descriptor.resolve(Mode::Production);
        assert_eq!(resolved.define["process.env.NODE_ENV"], "\"production\"");
        assert_eq!(resolved.define["process.env.SKIP_PREFLIGHT_CHECK"], "true");
    }

    #[test]
    fn entries_keep_declaration_order() {
        let descriptor = Descriptor::default()
            .with_entry("vanilla", "src/main.js")
            .with_entry("react", "src/index.js");
        let names: Vec<_> = descriptor
            .resolve(Mode::Production)
            .entries
            .into_iter()
            .map(|entry| entry.name)
            .collect();
        assert_eq!(names, ["vanilla", "react"]);
    }

    #[test]
    fn invalid_template_is_rejected_on_load() {
        let result = Descriptor::from_value(json!({"output": {"filename": "[name].[nope].js"}}));
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
    }
}
