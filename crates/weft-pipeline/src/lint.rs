//! Rule ordering lints.
//!
//! First-match-wins makes later rules silently unreachable when an earlier
//! rule claims the same paths. Lints report those rules without changing how
//! anything routes.

use std::fmt;

use serde::Serialize;
use weft_config::Matcher;

use crate::rules::{CompiledRule, RuleTable};

/// A rule whose paths are (partly) claimed by earlier rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleLint {
    pub rule: usize,
    pub label: String,
    #[serde(flatten)]
    pub kind: LintKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LintKind {
    /// Every path the rule matches is claimed by the listed earlier rules.
    Shadowed { by: Vec<usize> },
    /// Some extensions are claimed by earlier rules (extension → rule index).
    Overlapping { extensions: Vec<(String, usize)> },
}

impl RuleTable {
    /// Report rules that can never win, or only win for part of their matcher.
    pub fn lint(&self) -> Vec<RuleLint> {
        let rules = self.rules();
        rules
            .iter()
            .enumerate()
            .filter_map(|(position, rule)| {
                let kind = lint_rule(rule, &rules[..position])?;
                Some(RuleLint {
                    rule: rule.index(),
                    label: rule.label().to_string(),
                    kind,
                })
            })
            .collect()
    }
}

fn lint_rule(rule: &CompiledRule, earlier: &[CompiledRule]) -> Option<LintKind> {
    // Only rules that apply at least as broadly can shadow this one.
    let shadowers: Vec<&CompiledRule> = earlier
        .iter()
        .filter(|other| {
            !other.config().is_scoped()
                || (other.config().include == rule.config().include
                    && other.config().exclude == rule.config().exclude)
        })
        .collect();

    match &rule.config().test {
        Matcher::Extensions {
            extensions,
            case_insensitive,
            allow_query,
        } => {
            let mut fully_claimed = true;
            let mut by = Vec::new();
            let mut overlapping = Vec::new();

            for ext in extensions {
                let mut probes = vec![format!("probe.{ext}")];
                if *allow_query {
                    probes.push(format!("probe.{ext}?query"));
                }
                if *case_insensitive {
                    probes.push(format!("probe.{}", ext.to_ascii_uppercase()));
                }

                for (i, probe) in probes.iter().enumerate() {
                    match first_claim(&shadowers, probe) {
                        Some(index) => {
                            if !by.contains(&index) {
                                by.push(index);
                            }
                            if i == 0 {
                                overlapping.push((ext.clone(), index));
                            }
                        }
                        None => fully_claimed = false,
                    }
                }
            }

            if fully_claimed && !by.is_empty() {
                by.sort_unstable();
                Some(LintKind::Shadowed { by })
            } else if !overlapping.is_empty() {
                Some(LintKind::Overlapping {
                    extensions: overlapping,
                })
            } else {
                None
            }
        }
        Matcher::Pattern(_) | Matcher::Regex { .. } => shadowers
            .iter()
            .find(|other| other.config().test == rule.config().test)
            .map(|other| LintKind::Shadowed {
                by: vec![other.index()],
            }),
    }
}

fn first_claim(shadowers: &[&CompiledRule], probe: &str) -> Option<usize> {
    shadowers
        .iter()
        .find(|other| other.matcher().matches(probe))
        .map(|other| other.index())
}

impl fmt::Display for RuleLint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            LintKind::Shadowed { by } => write!(
                f,
                "{} (rule {}) is shadowed by rule {} and never matches",
                self.label,
                self.rule,
                join(by.iter().map(ToString::to_string))
            ),
            LintKind::Overlapping { extensions } => write!(
                f,
                "{} (rule {}) overlaps earlier rules: {}",
                self.label,
                self.rule,
                join(extensions.iter().map(|(ext, by)| format!(".{ext} -> rule {by}")))
            ),
        }
    }
}

fn join(items: impl Iterator<Item = String>) -> String {
    items.collect::<Vec<_>>().join(", ")
}
