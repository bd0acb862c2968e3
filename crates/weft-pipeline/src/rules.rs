//! Rule table evaluation.
//!
//! Rules are tried in declaration order and the first one whose matcher,
//! include scopes and exclude scopes all agree wins. There is no fallthrough
//! and no merging: a module either gets exactly one transform chain or is
//! passed through unmodified.

use std::path::{Path, PathBuf};

use path_clean::PathClean;
use regex::{Regex, RegexBuilder};
use weft_config::{ConfigError, Matcher, RuleConfig, Scope, TransformConfig};

/// A rule table with every pattern compiled.
#[derive(Debug, Clone)]
pub struct RuleTable {
    root: PathBuf,
    rules: Vec<CompiledRule>,
}

#[derive(Debug, Clone)]
pub struct CompiledRule {
    index: usize,
    label: String,
    matcher: CompiledMatcher,
    include: Vec<CompiledScope>,
    exclude: Vec<CompiledScope>,
    config: RuleConfig,
}

#[derive(Debug, Clone)]
pub(crate) enum CompiledMatcher {
    Regex(Regex),
    Extensions {
        extensions: Vec<String>,
        case_insensitive: bool,
        allow_query: bool,
    },
}

#[derive(Debug, Clone)]
enum CompiledScope {
    Dir(PathBuf),
    Pattern(Regex),
}

/// Outcome of evaluating the table for one module path.
#[derive(Debug, Clone, Copy)]
pub enum Route<'a> {
    Matched(&'a CompiledRule),
    PassThrough,
}

impl RuleTable {
    /// Compile `rules`; `root` anchors `dir` scopes. A relative root is taken
    /// against the current directory.
    pub fn compile(rules: &[RuleConfig], root: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let root = root.into();
        let root = std::path::absolute(&root).unwrap_or(root).clean();

        let rules = rules
            .iter()
            .enumerate()
            .map(|(index, rule)| CompiledRule::compile(index, rule))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { root, rules })
    }

    /// Return the first rule that applies to `path`, or pass-through.
    pub fn resolve(&self, path: &Path) -> Route<'_> {
        let relative = self.relative(path);
        let text = relative.to_string_lossy();

        self.rules
            .iter()
            .find(|rule| rule.applies(&relative, &text))
            .map_or(Route::PassThrough, Route::Matched)
    }

    pub fn rules(&self) -> &[CompiledRule] {
        &self.rules
    }

    pub fn get(&self, index: usize) -> Option<&CompiledRule> {
        self.rules.get(index)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    fn relative(&self, path: &Path) -> PathBuf {
        let path = path.clean();
        match path.strip_prefix(&self.root) {
            Ok(stripped) if path.is_absolute() => stripped.to_path_buf(),
            _ => path,
        }
    }
}

impl CompiledRule {
    fn compile(index: usize, rule: &RuleConfig) -> Result<Self, ConfigError> {
        let label = rule.label(index);

        let matcher = match &rule.test {
            Matcher::Extensions {
                extensions,
                case_insensitive,
                allow_query,
            } => CompiledMatcher::Extensions {
                extensions: extensions.clone(),
                case_insensitive: *case_insensitive,
                allow_query: *allow_query,
            },
            Matcher::Pattern(pattern) => CompiledMatcher::Regex(compile_regex(&label, pattern, false)?),
            Matcher::Regex {
                regex,
                case_insensitive,
            } => CompiledMatcher::Regex(compile_regex(&label, regex, *case_insensitive)?),
        };

        let scopes = |scopes: &[Scope]| {
            scopes
                .iter()
                .map(|scope| match scope {
                    Scope::Dir(dir) => Ok(CompiledScope::Dir(dir.clean())),
                    Scope::Pattern(pattern) => {
                        compile_regex(&label, pattern, false).map(CompiledScope::Pattern)
                    }
                })
                .collect::<Result<Vec<_>, ConfigError>>()
        };

        Ok(Self {
            index,
            matcher,
            include: scopes(&rule.include)?,
            exclude: scopes(&rule.exclude)?,
            config: rule.clone(),
            label,
        })
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn config(&self) -> &RuleConfig {
        &self.config
    }

    pub fn chain(&self) -> &[TransformConfig] {
        &self.config.chain
    }

    pub(crate) fn matcher(&self) -> &CompiledMatcher {
        &self.matcher
    }

    fn applies(&self, relative: &Path, text: &str) -> bool {
        self.matcher.matches(text)
            && (self.include.is_empty() || self.include.iter().any(|s| s.contains(relative, text)))
            && !self.exclude.iter().any(|s| s.contains(relative, text))
    }
}

impl CompiledMatcher {
    /// Test the matcher alone, ignoring scopes.
    pub(crate) fn matches(&self, path: &str) -> bool {
        match self {
            CompiledMatcher::Regex(regex) => regex.is_match(path),
            CompiledMatcher::Extensions {
                extensions,
                case_insensitive,
                allow_query,
            } => {
                let (base, query) = split_query(path);
                if query.is_some() && !allow_query {
                    return false;
                }
                extension_of(base).is_some_and(|ext| {
                    extensions.iter().any(|candidate| {
                        if *case_insensitive {
                            candidate.eq_ignore_ascii_case(ext)
                        } else {
                            candidate == ext
                        }
                    })
                })
            }
        }
    }
}

impl CompiledScope {
    fn contains(&self, relative: &Path, text: &str) -> bool {
        match self {
            CompiledScope::Dir(dir) => relative.starts_with(dir),
            CompiledScope::Pattern(regex) => regex.is_match(text),
        }
    }
}

impl<'a> Route<'a> {
    pub fn rule(&self) -> Option<&'a CompiledRule> {
        match *self {
            Route::Matched(rule) => Some(rule),
            Route::PassThrough => None,
        }
    }

    pub fn rule_index(&self) -> Option<usize> {
        self.rule().map(CompiledRule::index)
    }

    /// Transform chain to apply; empty for pass-through.
    pub fn chain(&self) -> &'a [TransformConfig] {
        self.rule().map(CompiledRule::chain).unwrap_or_default()
    }

    pub fn is_pass_through(&self) -> bool {
        matches!(self, Route::PassThrough)
    }

    /// Whether the chain contains the transform `id`.
    pub fn uses(&self, id: &str) -> bool {
        self.chain().iter().any(|t| t.transform == id)
    }
}

/// Split `a.woff?v=1` into `("a.woff", Some("?v=1"))`.
pub(crate) fn split_query(path: &str) -> (&str, Option<&str>) {
    match path.find('?') {
        Some(at) => (&path[..at], Some(&path[at..])),
        None => (path, None),
    }
}

/// Extension of the last path segment, without the dot.
pub(crate) fn extension_of(path: &str) -> Option<&str> {
    let file = path.rsplit(['/', '\\']).next()?;
    match file.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => Some(ext),
        _ => None,
    }
}

fn compile_regex(location: &str, pattern: &str, case_insensitive: bool) -> Result<Regex, ConfigError> {
    RegexBuilder::new(pattern)
        .case_insensitive(case_insensitive)
        .build()
        .map_err(|source| ConfigError::InvalidPattern {
            location: location.to_string(),
            pattern: pattern.to_string(),
            source,
        })
}
