use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::PathBuf;

/// Transform identifiers the pipeline gives special meaning to.
pub mod well_known {
    /// Emit the module as a standalone file; option `name` is its filename template
    pub const EMIT_FILE: &str = "emit-file";
    /// Inline the module into its chunk as a data URL
    pub const INLINE_URL: &str = "inline-url";
    /// Move the stylesheet into the chunk's extracted `.css` file
    pub const CSS_EXTRACT: &str = "css-extract";
    /// Default filename template for emitted files without a `name` option
    pub const DEFAULT_ASSET_NAME: &str = "[contenthash].[ext]";
}

/// One row of the rule table.
///
/// Rules are evaluated in declaration order and the first match wins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleConfig {
    /// Optional label used in diagnostics (defaults to `rule #<index>`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Predicate over the module path
    pub test: Matcher,

    /// Restrict the rule to paths inside these scopes
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub include: Vec<Scope>,

    /// Never apply the rule to paths inside these scopes
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exclude: Vec<Scope>,

    /// Transform chain, applied in order
    #[serde(rename = "use")]
    pub chain: Vec<TransformConfig>,
}

impl RuleConfig {
    pub fn new(test: Matcher, chain: Vec<TransformConfig>) -> Self {
        Self {
            name: None,
            test,
            include: Vec::new(),
            exclude: Vec::new(),
            chain,
        }
    }

    pub fn label(&self, index: usize) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| format!("rule #{index}"))
    }

    pub fn is_scoped(&self) -> bool {
        !self.include.is_empty() || !self.exclude.is_empty()
    }
}

/// Path predicate of a rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Matcher {
    /// `test = "\\.scss$"`
    Pattern(String),

    /// `test = { regex = "\\.(gif|jpe?g)$", case_insensitive = true }`
    Regex {
        regex: String,
        #[serde(default)]
        case_insensitive: bool,
    },

    /// `test = { extensions = ["woff", "ttf"], allow_query = true }`
    Extensions {
        extensions: Vec<String>,
        #[serde(default)]
        case_insensitive: bool,
        /// Also match when the extension is followed by a `?query` suffix
        #[serde(default)]
        allow_query: bool,
    },
}

impl Matcher {
    pub fn pattern(pattern: impl Into<String>) -> Self {
        Matcher::Pattern(pattern.into())
    }

    pub fn extensions<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Matcher::Extensions {
            extensions: extensions.into_iter().map(Into::into).collect(),
            case_insensitive: false,
            allow_query: false,
        }
    }

    /// Regex source, for the two regex forms.
    pub fn regex_source(&self) -> Option<(&str, bool)> {
        match self {
            Matcher::Pattern(pattern) => Some((pattern, false)),
            Matcher::Regex {
                regex,
                case_insensitive,
            } => Some((regex, *case_insensitive)),
            Matcher::Extensions { .. } => None,
        }
    }
}

/// Path scope used by `include` / `exclude`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scope {
    /// Directory prefix, relative to the project root
    Dir(PathBuf),
    /// Regex matched anywhere in the path
    Pattern(String),
}

/// A named, parameterized external transform.
///
/// Accepts either a bare identifier (`"svg"`), an identifier with query-style
/// options (`"emit-file?name=[name].[ext]"`), or a table:
///
/// ```toml
/// [[build.rules.use]]
/// transform = "sass"
/// options = { source_map = true }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "TransformRepr", into = "TransformRepr")]
pub struct TransformConfig {
    pub transform: String,
    pub options: IndexMap<String, Value>,
}

impl TransformConfig {
    pub fn new(transform: impl Into<String>) -> Self {
        Self {
            transform: transform.into(),
            options: IndexMap::new(),
        }
    }

    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    pub fn option_str(&self, key: &str) -> Option<&str> {
        self.options.get(key).and_then(Value::as_str)
    }

    /// Parse `identifier?key=value&flag` shorthand.
    pub fn parse_shorthand(raw: &str) -> Self {
        let Some((transform, query)) = raw.split_once('?') else {
            return Self::new(raw);
        };

        let mut options = IndexMap::new();
        for pair in query.split('&').filter(|pair| !pair.is_empty()) {
            match pair.split_once('=') {
                Some((key, value)) => {
                    options.insert(key.to_string(), Value::String(value.to_string()));
                }
                None => {
                    options.insert(pair.to_string(), Value::Bool(true));
                }
            }
        }

        Self {
            transform: transform.to_string(),
            options,
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum TransformRepr {
    Shorthand(String),
    Full {
        transform: String,
        #[serde(default)]
        options: IndexMap<String, Value>,
    },
}

impl From<TransformRepr> for TransformConfig {
    fn from(repr: TransformRepr) -> Self {
        match repr {
            TransformRepr::Shorthand(raw) => TransformConfig::parse_shorthand(&raw),
            TransformRepr::Full { transform, options } => Self { transform, options },
        }
    }
}

impl From<TransformConfig> for TransformRepr {
    fn from(config: TransformConfig) -> Self {
        if config.options.is_empty() {
            TransformRepr::Shorthand(config.transform)
        } else {
            TransformRepr::Full {
                transform: config.transform,
                options: config.options,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn shorthand_parses_query_options() {
        let transform = TransformConfig::parse_shorthand("emit-file?name=[name].[ext]&esModule");
        assert_eq!(transform.transform, "emit-file");
        assert_eq!(transform.option_str("name"), Some("[name].[ext]"));
        assert_eq!(transform.options["esModule"], json!(true));
    }

    #[test]
    fn transform_deserializes_all_forms() {
        let chain: Vec<TransformConfig> = serde_json::from_value(json!([
            "svg",
            "emit-file?name=[name].[ext]",
            {"transform": "sass", "options": {"source_map": true}}
        ]))
        .unwrap();

        assert_eq!(chain[0], TransformConfig::new("svg"));
        assert_eq!(chain[1].option_str("name"), Some("[name].[ext]"));
        assert_eq!(chain[2].options["source_map"], json!(true));
    }

    #[test]
    fn matcher_deserializes_all_forms() {
        let matchers: Vec<Matcher> = serde_json::from_value(json!([
            "\\.scss$",
            {"regex": "\\.css$", "case_insensitive": true},
            {"extensions": ["woff"], "allow_query": true}
        ]))
        .unwrap();

        assert_eq!(matchers[0], Matcher::pattern("\\.scss$"));
        assert_eq!(matchers[1].regex_source(), Some(("\\.css$", true)));
        assert!(matches!(
            matchers[2],
            Matcher::Extensions {
                allow_query: true,
                ..
            }
        ));
    }

    #[test]
    fn scope_uses_tagged_tables() {
        let scopes: Vec<Scope> =
            serde_json::from_value(json!([{"dir": "src"}, {"pattern": "node_modules"}])).unwrap();
        assert_eq!(scopes[0], Scope::Dir(PathBuf::from("src")));
        assert_eq!(scopes[1], Scope::Pattern("node_modules".into()));
    }
}
