//! Shared-code extraction.
//!
//! A module is a candidate when it appears in at least `min_chunks` distinct
//! chunks of the selected kind. Candidates are assigned to the first group
//! rule that claims them (ascending priority, then declaration order) or to the
//! default group. A group is extracted into its own chunk only when its total
//! size reaches `min_size`; otherwise its modules stay inlined in their chunks.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use regex::Regex;
use rustc_hash::FxHashMap;
use serde::Serialize;
use weft_config::{ChunkSelection, ConfigError, GroupRule, SplitOptions};

use crate::graph::{ChunkKind, ModuleGraph};

pub struct SplitEvaluator<'a> {
    options: &'a SplitOptions,
    groups: Vec<CompiledGroup<'a>>,
}

struct CompiledGroup<'a> {
    rule: &'a GroupRule,
    test: Option<Regex>,
}

/// Result of evaluating the split policy against a graph.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SplitPlan {
    /// Groups extracted into their own chunk
    pub groups: Vec<SplitGroup>,
    /// Candidate groups below `min_size`; their modules stay inlined
    pub skipped: Vec<SplitGroup>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SplitGroup {
    pub name: String,
    /// Member modules in graph order
    pub modules: Vec<PathBuf>,
    /// Total size of the members, in bytes
    pub size: u64,
    /// Chunks the members were extracted from, in graph order
    pub source_chunks: Vec<String>,
}

impl<'a> SplitEvaluator<'a> {
    pub fn new(options: &'a SplitOptions) -> Result<Self, ConfigError> {
        let mut groups = options
            .groups
            .iter()
            .map(|rule| {
                let test = rule
                    .test
                    .as_deref()
                    .map(|pattern| {
                        Regex::new(pattern).map_err(|source| ConfigError::InvalidPattern {
                            location: format!("split group '{}'", rule.name),
                            pattern: pattern.to_string(),
                            source,
                        })
                    })
                    .transpose()?;
                Ok(CompiledGroup { rule, test })
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;

        // Stable sort keeps declaration order among equal priorities.
        groups.sort_by_key(|group| group.rule.priority);

        Ok(Self { options, groups })
    }

    pub fn evaluate(&self, graph: &ModuleGraph) -> SplitPlan {
        if !self.options.enabled {
            return SplitPlan::default();
        }

        let counted: Vec<_> = graph
            .chunks
            .iter()
            .filter(|chunk| selects(self.options.chunks, chunk.kind))
            .collect();

        let mut occurrences: FxHashMap<&Path, Vec<&str>> = FxHashMap::default();
        for chunk in &counted {
            for module in &chunk.modules {
                let chunks = occurrences.entry(module.as_path()).or_default();
                if !chunks.contains(&chunk.name.as_str()) {
                    chunks.push(chunk.name.as_str());
                }
            }
        }

        // Group name → candidate members, in rule order with the default last.
        let mut candidates: IndexMap<&str, Vec<(&Path, u64)>> = self
            .groups
            .iter()
            .map(|group| (group.rule.name.as_str(), Vec::new()))
            .collect();
        candidates.insert(self.options.default_group.as_str(), Vec::new());

        for module in &graph.modules {
            let count = occurrences.get(module.path.as_path()).map_or(0, Vec::len);
            if count < self.options.min_chunks {
                continue;
            }
            let group = self.group_for(&module.path);
            if let Some(members) = candidates.get_mut(group) {
                members.push((module.path.as_path(), module.size));
            }
        }

        let mut plan = SplitPlan::default();
        for (name, members) in candidates {
            if members.is_empty() {
                continue;
            }

            let size: u64 = members.iter().map(|(_, size)| size).sum();
            let source_chunks = counted
                .iter()
                .filter(|chunk| {
                    members
                        .iter()
                        .any(|(path, _)| chunk.modules.iter().any(|m| m == path))
                })
                .map(|chunk| chunk.name.clone())
                .collect();

            let group = SplitGroup {
                name: name.to_string(),
                modules: members.iter().map(|(path, _)| path.to_path_buf()).collect(),
                size,
                source_chunks,
            };

            if size >= self.options.min_size {
                tracing::debug!(group = %group.name, modules = group.modules.len(), size, "extracting shared chunk");
                plan.groups.push(group);
            } else {
                tracing::debug!(group = %group.name, size, min_size = self.options.min_size, "group below min_size, keeping modules inline");
                plan.skipped.push(group);
            }
        }

        plan
    }

    fn group_for(&self, path: &Path) -> &str {
        let text = path.to_string_lossy();
        self.groups
            .iter()
            .find(|group| group.test.as_ref().is_none_or(|re| re.is_match(&text)))
            .map_or(self.options.default_group.as_str(), |group| group.rule.name.as_str())
    }
}

fn selects(selection: ChunkSelection, kind: ChunkKind) -> bool {
    match selection {
        ChunkSelection::All => true,
        ChunkSelection::Async => kind == ChunkKind::Async,
        ChunkSelection::Initial => kind == ChunkKind::Initial,
    }
}

impl SplitPlan {
    /// The extracted group containing `module`, if any.
    pub fn group_of(&self, module: &Path) -> Option<&SplitGroup> {
        self.groups
            .iter()
            .find(|group| group.modules.iter().any(|m| m == module))
    }

    pub fn is_extracted(&self, module: &Path) -> bool {
        self.group_of(module).is_some()
    }

    /// Whether `module` moves out of `chunk`. Chunks the selection skipped
    /// keep their copy inline.
    pub fn extracted_from(&self, chunk: &str, module: &Path) -> bool {
        self.group_of(module)
            .is_some_and(|group| group.source_chunks.iter().any(|source| source == chunk))
    }

    pub fn group(&self, name: &str) -> Option<&SplitGroup> {
        self.groups.iter().find(|group| group.name == name)
    }
}
