//! Pluggable config validation strategies
//!
//! Separates filesystem validation (for CLI use) from schema validation (for
//! library use). Both run once at load time, never per module.

use std::collections::HashSet;
use std::path::Path;

use regex::RegexBuilder;

use crate::descriptor::{Descriptor, Matcher, RuleConfig, Scope, well_known};
use crate::error::{ConfigError, Result};
use crate::template::{FilenameTemplate, Placeholder};

/// Option key of `emit-file` transforms that holds the asset filename template
pub const EMIT_FILE_NAME_OPTION: &str = "name";

/// Trait for pluggable config validation strategies
pub trait ConfigValidator {
    fn validate(&self, config: &Descriptor) -> Result<()>;
}

/// Schema-only validation (no filesystem checks)
///
/// # Example
///
/// ```
/// use weft_config::{Descriptor, SchemaValidator, ConfigValidator};
///
/// let descriptor = Descriptor::default().with_entry("vanilla", "src/main.js");
/// SchemaValidator.validate(&descriptor).unwrap();
/// ```
pub struct SchemaValidator;

impl ConfigValidator for SchemaValidator {
    fn validate(&self, config: &Descriptor) -> Result<()> {
        if config.entries.is_empty() {
            return Err(ConfigError::NoEntries);
        }

        for (name, module) in &config.entries {
            if name.trim().is_empty() || module.as_os_str().is_empty() {
                return Err(ConfigError::SchemaValidation {
                    message: "entry names and module paths cannot be empty".to_string(),
                    hint: Some("Use `name = \"src/file.js\"` under [build.entries]".to_string()),
                });
            }
        }

        for (index, rule) in config.rules.iter().enumerate() {
            validate_rule(index, rule)?;
        }

        validate_templates(config)?;
        validate_split(config)?;

        if let Some(html) = &config.html {
            for chunk in &html.chunks {
                if !config.entries.contains_key(chunk) {
                    return Err(ConfigError::SchemaValidation {
                        message: format!("html page references unknown entry '{chunk}'"),
                        hint: Some("List entry names from [build.entries] in html.chunks".into()),
                    });
                }
            }
        }

        Ok(())
    }
}

fn validate_rule(index: usize, rule: &RuleConfig) -> Result<()> {
    let location = rule.label(index);

    if rule.chain.is_empty() {
        return Err(ConfigError::SchemaValidation {
            message: format!("{location} has an empty transform chain"),
            hint: Some("Remove the rule or add at least one transform to `use`".to_string()),
        });
    }

    match &rule.test {
        Matcher::Pattern(_) | Matcher::Regex { .. } => {
            if let Some((pattern, case_insensitive)) = rule.test.regex_source() {
                compile(&location, pattern, case_insensitive)?;
            }
        }
        Matcher::Extensions { extensions, .. } => {
            if extensions.is_empty() {
                return Err(ConfigError::SchemaValidation {
                    message: format!("{location} matches no extensions"),
                    hint: None,
                });
            }
            if let Some(bad) = extensions
                .iter()
                .find(|ext| ext.is_empty() || ext.contains(['.', '/', '\\', '?']))
            {
                return Err(ConfigError::SchemaValidation {
                    message: format!("{location} has an invalid extension '{bad}'"),
                    hint: Some("List extensions without the leading dot".to_string()),
                });
            }
        }
    }

    for scope in rule.include.iter().chain(&rule.exclude) {
        if let Scope::Pattern(pattern) = scope {
            compile(&location, pattern, false)?;
        }
    }

    for transform in &rule.chain {
        if transform.transform.trim().is_empty() {
            return Err(ConfigError::SchemaValidation {
                message: format!("{location} contains a transform without an identifier"),
                hint: None,
            });
        }
        if transform.transform == well_known::EMIT_FILE {
            if let Some(name) = transform.option_str(EMIT_FILE_NAME_OPTION) {
                FilenameTemplate::parse(name)?;
            }
        }
    }

    validate_chain_options(index, rule)
}

/// Reject chains where two transforms set the same option to different values.
pub fn validate_chain_options(index: usize, rule: &RuleConfig) -> Result<()> {
    for (i, first) in rule.chain.iter().enumerate() {
        for second in &rule.chain[i + 1..] {
            for (key, value) in &first.options {
                if second.options.get(key).is_some_and(|other| other != value) {
                    return Err(ConfigError::AmbiguousTransformOptions {
                        rule: index,
                        option: key.clone(),
                        first: first.transform.clone(),
                        second: second.transform.clone(),
                    });
                }
            }
        }
    }
    Ok(())
}

fn validate_templates(config: &Descriptor) -> Result<()> {
    let distinguishing = [Placeholder::Name, Placeholder::Id];
    let distinguishes = |template: &FilenameTemplate| {
        template.is_content_addressed() || distinguishing.iter().any(|p| template.uses(*p))
    };

    let templates = [
        ("output.filename", &config.output.filename, config.entries.len() > 1),
        ("output.chunk_filename", &config.output.chunk_filename, true),
        ("css.filename", &config.css.filename, config.entries.len() > 1),
        ("css.chunk_filename", &config.css.chunk_filename, true),
    ];

    for (field, template, needs_distinction) in templates {
        if needs_distinction && !distinguishes(template) {
            return Err(ConfigError::SchemaValidation {
                message: format!("{field} '{template}' would give every chunk the same filename"),
                hint: Some("Include [name], [id] or a hash placeholder".to_string()),
            });
        }
    }

    Ok(())
}

fn validate_split(config: &Descriptor) -> Result<()> {
    let split = &config.split;

    if split.min_chunks < 1 {
        return Err(ConfigError::SchemaValidation {
            message: "split.min_chunks must be at least 1".to_string(),
            hint: None,
        });
    }

    let mut names = HashSet::new();
    for group in &split.groups {
        if group.name.trim().is_empty() {
            return Err(ConfigError::SchemaValidation {
                message: "split group names cannot be empty".to_string(),
                hint: None,
            });
        }
        if !names.insert(group.name.as_str()) || group.name == split.default_group {
            return Err(ConfigError::SchemaValidation {
                message: format!("split group '{}' is declared more than once", group.name),
                hint: Some("Group names must be unique, including the default group".into()),
            });
        }
        if config.entries.contains_key(&group.name) {
            return Err(ConfigError::SchemaValidation {
                message: format!("split group '{}' collides with an entry name", group.name),
                hint: None,
            });
        }
        if let Some(test) = &group.test {
            compile(&format!("split group '{}'", group.name), test, false)?;
        }
    }

    Ok(())
}

fn compile(location: &str, pattern: &str, case_insensitive: bool) -> Result<()> {
    RegexBuilder::new(pattern)
        .case_insensitive(case_insensitive)
        .build()
        .map(|_| ())
        .map_err(|source| ConfigError::InvalidPattern {
            location: location.to_string(),
            pattern: pattern.to_string(),
            source,
        })
}

/// Filesystem validator (for CLI use)
///
/// Validates that entry modules, the HTML template, the favicon and static copy
/// sources exist on disk.
pub struct FsValidator {
    root: std::path::PathBuf,
}

impl FsValidator {
    /// Create a new filesystem validator with a root directory
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }
}

impl ConfigValidator for FsValidator {
    fn validate(&self, config: &Descriptor) -> Result<()> {
        SchemaValidator.validate(config)?;

        for (name, module) in &config.entries {
            let path = self.root.join(module);
            if !path.exists() {
                return Err(ConfigError::EntryNotFound {
                    name: name.clone(),
                    path,
                });
            }
        }

        if let Some(html) = &config.html {
            if let Some(template) = &html.template {
                let path = self.root.join(template);
                if !path.is_file() {
                    return Err(ConfigError::TemplateNotFound { path });
                }
            }
            if let Some(favicon) = &html.favicon {
                let path = self.root.join(favicon);
                if !path.is_file() {
                    return Err(ConfigError::FaviconNotFound { path });
                }
            }
        }

        for pattern in &config.copy {
            let path = self.root.join(&pattern.from);
            if !path.exists() {
                return Err(ConfigError::CopySourceNotFound { path });
            }
        }

        Ok(())
    }
}

/// Convenience function for schema-only validation
pub fn validate_schema(config: &Descriptor) -> Result<()> {
    SchemaValidator.validate(config)
}

/// Convenience function for filesystem validation
pub fn validate_fs(config: &Descriptor, root: impl AsRef<Path>) -> Result<()> {
    FsValidator::new(root).validate(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::TransformConfig;

    fn descriptor() -> Descriptor {
        Descriptor::default().with_entry("vanilla", "src/main.js")
    }

    #[test]
    fn schema_validator_rejects_empty_entries() {
        let result = SchemaValidator.validate(&Descriptor::default());
        assert!(matches!(result, Err(ConfigError::NoEntries)));
    }

    #[test]
    fn schema_validator_accepts_valid_config() {
        assert!(SchemaValidator.validate(&descriptor()).is_ok());
    }

    #[test]
    fn rejects_conflicting_option_values_in_one_chain() {
        let rule = RuleConfig::new(
            Matcher::extensions(["scss"]),
            vec![
                TransformConfig::new("css").with_option("source_map", true),
                TransformConfig::new("sass").with_option("source_map", false),
            ],
        );
        let result = SchemaValidator.validate(&descriptor().with_rule(rule));
        assert!(matches!(
            result,
            Err(ConfigError::AmbiguousTransformOptions { rule: 0, ref option, .. }) if option == "source_map"
        ));
    }

    #[test]
    fn identical_option_values_are_not_ambiguous() {
        let rule = RuleConfig::new(
            Matcher::extensions(["scss"]),
            vec![
                TransformConfig::new("css").with_option("source_map", true),
                TransformConfig::new("sass").with_option("source_map", true),
            ],
        );
        assert!(SchemaValidator.validate(&descriptor().with_rule(rule)).is_ok());
    }

    #[test]
    fn rejects_invalid_regex() {
        let rule = RuleConfig::new(Matcher::pattern("(unclosed"), vec![TransformConfig::new("x")]);
        let result = SchemaValidator.validate(&descriptor().with_rule(rule));
        assert!(matches!(result, Err(ConfigError::InvalidPattern { .. })));
    }

    #[test]
    fn rejects_dotted_extension() {
        let rule = RuleConfig::new(Matcher::extensions([".css"]), vec![TransformConfig::new("css")]);
        let result = SchemaValidator.validate(&descriptor().with_rule(rule));
        assert!(matches!(result, Err(ConfigError::SchemaValidation { .. })));
    }

    #[test]
    fn rejects_empty_chain() {
        let rule = RuleConfig::new(Matcher::extensions(["css"]), vec![]);
        let result = SchemaValidator.validate(&descriptor().with_rule(rule));
        assert!(matches!(result, Err(ConfigError::SchemaValidation { .. })));
    }

    #[test]
    fn rejects_zero_min_chunks() {
        let mut config = descriptor();
        config.split.min_chunks = 0;
        assert!(SchemaValidator.validate(&config).is_err());
    }

    #[test]
    fn rejects_entry_filename_without_name_for_many_entries() {
        let mut config = descriptor().with_entry("react", "src/index.js");
        config.output.filename = FilenameTemplate::parse("bundle.js").unwrap();
        assert!(matches!(
            SchemaValidator.validate(&config),
            Err(ConfigError::SchemaValidation { .. })
        ));
    }

    #[test]
    fn rejects_html_chunk_that_is_not_an_entry() {
        let mut config = descriptor();
        config.html = Some(crate::descriptor::HtmlOptions {
            chunks: vec!["admin".to_string()],
            ..Default::default()
        });
        assert!(SchemaValidator.validate(&config).is_err());
    }

    #[test]
    fn preset_passes_schema_validation() {
        let config = crate::presets::vanilla_react().unwrap();
        assert!(validate_schema(&config.build).is_ok());
    }
}
