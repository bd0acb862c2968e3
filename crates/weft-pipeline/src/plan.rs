//! Full resolution of a build against a module graph.
//!
//! [`BuildPlan::resolve`] routes every module, evaluates the split policy,
//! names every emitted file and assembles the HTML page. It reads nothing from
//! disk; [`BuildPlan::with_static_copies`] adds the static copy step, which
//! walks the source directories.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use rayon::prelude::*;
use rustc_hash::FxHashMap;
use serde::Serialize;
use weft_config::validation::EMIT_FILE_NAME_OPTION;
use weft_config::{FilenameTemplate, Interpolation, Mode, ResolvedDescriptor, well_known};

use crate::budget::{Advisory, check_budget};
use crate::copy::expand_copies;
use crate::error::{BuildError, Result};
use crate::graph::{ChunkKind, ModuleGraph, ModuleInfo};
use crate::hash::{chunk_digest, module_digest};
use crate::html::HtmlPage;
use crate::lint::RuleLint;
use crate::output::{OutputKind, OutputResolver, ResolvedFile};
use crate::rules::{Route, RuleTable};
use crate::split::{SplitEvaluator, SplitPlan};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BuildPlan {
    pub mode: Mode,
    pub minimize: bool,
    pub routes: Vec<ModuleRoute>,
    pub split: SplitPlan,
    pub chunks: Vec<PlannedChunk>,
    pub files: Vec<EmittedFile>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html: Option<HtmlPage>,
    pub define: IndexMap<String, String>,
    pub advisories: Vec<Advisory>,
    pub lints: Vec<RuleLint>,
}

/// The rule a module routes to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleRoute {
    pub path: PathBuf,
    /// Rule index; `None` for pass-through
    pub rule: Option<usize>,
    /// Transform identifiers, in chain order
    pub transforms: Vec<String>,
}

impl ModuleRoute {
    pub fn new(path: PathBuf, route: &Route<'_>) -> Self {
        Self {
            path,
            rule: route.rule_index(),
            transforms: route.chain().iter().map(|t| t.transform.clone()).collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChunkRole {
    Entry,
    Async,
    /// Extracted by the split policy
    Shared,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedChunk {
    pub name: String,
    pub role: ChunkRole,
    /// Modules bundled into this chunk, after extraction
    pub modules: Vec<PathBuf>,
    pub js_size: u64,
    pub css_size: u64,
    pub hash: String,
    pub script_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stylesheet_url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FileKind {
    EntryBundle,
    Chunk,
    SharedChunk,
    Stylesheet,
    Asset,
    Html,
    Favicon,
    Static,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmittedFile {
    pub kind: FileKind,
    /// Owning chunk, for bundles and stylesheets
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chunk: Option<String>,
    /// Source file, for assets, the favicon and static copies
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<PathBuf>,
    /// Planned size in bytes (0 when only known after rendering)
    pub size: u64,
    #[serde(flatten)]
    pub location: ResolvedFile,
}

/// How a module contributes to its chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Contribution {
    Script,
    Inlined,
    Stylesheet,
    Emitted,
}

impl Contribution {
    fn of(transforms: &[String]) -> Self {
        let uses = |id: &str| transforms.iter().any(|t| t == id);
        if uses(well_known::EMIT_FILE) {
            Contribution::Emitted
        } else if uses(well_known::INLINE_URL) {
            Contribution::Inlined
        } else if uses(well_known::CSS_EXTRACT) {
            Contribution::Stylesheet
        } else {
            Contribution::Script
        }
    }
}

struct Lookup<'g> {
    modules: FxHashMap<&'g Path, &'g ModuleInfo>,
    routes: FxHashMap<&'g Path, &'g ModuleRoute>,
}

impl Lookup<'_> {
    fn contribution(&self, path: &Path) -> Contribution {
        self.routes
            .get(path)
            .map_or(Contribution::Script, |route| Contribution::of(&route.transforms))
    }
}

impl BuildPlan {
    /// Resolve `descriptor` against `graph`.
    ///
    /// `root` anchors `dir` scopes in the rule table. Calling this twice with
    /// the same inputs yields identical plans.
    pub fn resolve(descriptor: &ResolvedDescriptor, root: &Path, graph: &ModuleGraph) -> Result<Self> {
        graph.validate()?;
        for entry in &descriptor.entries {
            if !graph
                .chunk(&entry.name)
                .is_some_and(|chunk| chunk.kind == ChunkKind::Initial)
            {
                return Err(BuildError::MissingEntryChunk(entry.name.clone()));
            }
        }

        let table = RuleTable::compile(&descriptor.rules, root)?;
        let lints = table.lint();
        for lint in &lints {
            tracing::warn!("{lint}");
        }

        let routes: Vec<ModuleRoute> = graph
            .modules
            .par_iter()
            .map(|module| ModuleRoute::new(module.path.clone(), &table.resolve(&module.path)))
            .collect();

        let split = SplitEvaluator::new(&descriptor.split)?.evaluate(graph);

        let lookup = Lookup {
            modules: graph.index(),
            routes: routes.iter().map(|route| (route.path.as_path(), route)).collect(),
        };
        let resolver = OutputResolver::from_descriptor(descriptor);

        let mut chunks = Vec::with_capacity(graph.chunks.len() + split.groups.len());
        for chunk in &graph.chunks {
            let role = if chunk.kind == ChunkKind::Initial && descriptor.is_entry(&chunk.name) {
                ChunkRole::Entry
            } else {
                ChunkRole::Async
            };
            let members = chunk
                .modules
                .iter()
                .filter(|module| !split.extracted_from(&chunk.name, module))
                .cloned()
                .collect();
            chunks.push(plan_chunk(&chunk.name, role, members, &lookup, &resolver)?);
        }
        for group in &split.groups {
            chunks.push(plan_chunk(
                &group.name,
                ChunkRole::Shared,
                group.modules.clone(),
                &lookup,
                &resolver,
            )?);
        }

        if !descriptor.css.ignore_order {
            for (first, second) in stylesheet_order_conflicts(&chunks, &lookup) {
                tracing::warn!(
                    first = %first.display(),
                    second = %second.display(),
                    "conflicting stylesheet order between chunks"
                );
            }
        }

        let mut files = Vec::new();
        for chunk in &chunks {
            let (kind, output) = match chunk.role {
                ChunkRole::Entry => (FileKind::EntryBundle, OutputKind::Entry),
                ChunkRole::Async => (FileKind::Chunk, OutputKind::Chunk),
                ChunkRole::Shared => (FileKind::SharedChunk, OutputKind::Chunk),
            };
            files.push(EmittedFile {
                kind,
                chunk: Some(chunk.name.clone()),
                source: None,
                size: chunk.js_size,
                location: resolver.chunk(&chunk.name, output, Some(&chunk.hash))?,
            });
            if chunk.css_size > 0 {
                files.push(EmittedFile {
                    kind: FileKind::Stylesheet,
                    chunk: Some(chunk.name.clone()),
                    source: None,
                    size: chunk.css_size,
                    location: resolver.stylesheet(&chunk.name, output, Some(&chunk.hash))?,
                });
            }
        }

        for module in &graph.modules {
            if lookup.contribution(&module.path) != Contribution::Emitted {
                continue;
            }
            let name = lookup
                .routes
                .get(module.path.as_path())
                .and_then(|route| route.rule)
                .and_then(|index| table.get(index))
                .and_then(|rule| {
                    rule.chain()
                        .iter()
                        .find(|t| t.transform == well_known::EMIT_FILE)
                        .and_then(|t| t.option_str(EMIT_FILE_NAME_OPTION))
                })
                .unwrap_or(well_known::DEFAULT_ASSET_NAME);
            let template = FilenameTemplate::parse(name)?;
            let digest = module_digest(module);

            files.push(EmittedFile {
                kind: FileKind::Asset,
                chunk: None,
                source: Some(module.path.clone()),
                size: module.size,
                location: resolver.asset(&template, &module.path, Some(&digest))?,
            });
        }

        let mut html = None;
        if let Some(options) = &descriptor.html {
            let allowed: Vec<&str> = descriptor
                .entries
                .iter()
                .map(|entry| entry.name.as_str())
                .filter(|name| options.chunks.is_empty() || options.chunks.iter().any(|c| c == *name))
                .collect();

            let on_page: Vec<&PlannedChunk> = chunks
                .iter()
                .filter(|chunk| {
                    chunk.role == ChunkRole::Shared
                        && split.group(&chunk.name).is_some_and(|group| {
                            group.source_chunks.iter().any(|c| allowed.contains(&c.as_str()))
                        })
                })
                .chain(allowed.iter().filter_map(|name| {
                    chunks
                        .iter()
                        .find(|chunk| chunk.role == ChunkRole::Entry && chunk.name == *name)
                }))
                .collect();

            let favicon = match &options.favicon {
                Some(source) => {
                    let filename = source
                        .file_name()
                        .map(|name| name.to_string_lossy().into_owned())
                        .unwrap_or_default();
                    let location = resolver.place(filename)?;
                    let url = location.public_url.clone();
                    files.push(EmittedFile {
                        kind: FileKind::Favicon,
                        chunk: None,
                        source: Some(source.clone()),
                        size: 0,
                        location,
                    });
                    Some(url)
                }
                None => None,
            };

            files.push(EmittedFile {
                kind: FileKind::Html,
                chunk: None,
                source: options.template.clone(),
                size: 0,
                location: resolver.resolve(&options.filename, &Interpolation::default())?,
            });

            html = Some(HtmlPage {
                template: options.template.clone(),
                scripts: on_page.iter().map(|chunk| chunk.script_url.clone()).collect(),
                stylesheets: on_page
                    .iter()
                    .filter_map(|chunk| chunk.stylesheet_url.clone())
                    .collect(),
                favicon,
                inject: options.inject,
                minify: options.minify,
            });
        }

        check_collisions(&files)?;

        let entrypoints: Vec<(&str, u64)> = descriptor
            .entries
            .iter()
            .map(|entry| {
                let size = chunks
                    .iter()
                    .filter(|chunk| {
                        (chunk.role == ChunkRole::Entry && chunk.name == entry.name)
                            || (chunk.role == ChunkRole::Shared
                                && split
                                    .group(&chunk.name)
                                    .is_some_and(|g| g.source_chunks.contains(&entry.name)))
                    })
                    .map(|chunk| chunk.js_size + chunk.css_size)
                    .sum();
                (entry.name.as_str(), size)
            })
            .collect();
        let assets = files
            .iter()
            .filter(|file| !matches!(file.kind, FileKind::Html | FileKind::Favicon | FileKind::Static))
            .map(|file| (file.location.filename.as_str(), file.size));
        let advisories = check_budget(&descriptor.performance, entrypoints, assets)?;

        tracing::info!(
            mode = %descriptor.mode,
            modules = graph.modules.len(),
            chunks = chunks.len(),
            files = files.len(),
            "resolved build plan"
        );

        Ok(Self {
            mode: descriptor.mode,
            minimize: descriptor.minimize,
            routes,
            split,
            chunks,
            files,
            html,
            define: descriptor.define.clone(),
            advisories,
            lints,
        })
    }

    /// Add static copies, walking each source below `root`.
    pub fn with_static_copies(mut self, descriptor: &ResolvedDescriptor, root: &Path) -> Result<Self> {
        let resolver = OutputResolver::from_descriptor(descriptor);
        for copy in expand_copies(&descriptor.copy, root)? {
            let filename = copy.filename.to_string_lossy().replace('\\', "/");
            self.files.push(EmittedFile {
                kind: FileKind::Static,
                chunk: None,
                source: Some(copy.source),
                size: copy.size,
                location: resolver.place(filename)?,
            });
        }
        check_collisions(&self.files)?;
        Ok(self)
    }

    /// Every write path, sorted.
    pub fn output_paths(&self) -> BTreeSet<PathBuf> {
        self.files
            .iter()
            .map(|file| file.location.write_path.clone())
            .collect()
    }

    pub fn files_of(&self, kind: FileKind) -> impl Iterator<Item = &EmittedFile> {
        self.files.iter().filter(move |file| file.kind == kind)
    }

    pub fn chunk(&self, name: &str) -> Option<&PlannedChunk> {
        self.chunks.iter().find(|chunk| chunk.name == name)
    }

    pub fn route(&self, path: &Path) -> Option<&ModuleRoute> {
        self.routes.iter().find(|route| route.path == path)
    }
}

fn plan_chunk(
    name: &str,
    role: ChunkRole,
    modules: Vec<PathBuf>,
    lookup: &Lookup<'_>,
    resolver: &OutputResolver<'_>,
) -> Result<PlannedChunk> {
    let mut js_size = 0;
    let mut css_size = 0;
    for path in &modules {
        let Some(module) = lookup.modules.get(path.as_path()) else {
            continue;
        };
        match lookup.contribution(path) {
            Contribution::Script => js_size += module.size,
            Contribution::Inlined => js_size += module.size.div_ceil(3) * 4,
            Contribution::Stylesheet => css_size += module.size,
            Contribution::Emitted => {}
        }
    }

    let hash = chunk_digest(
        modules
            .iter()
            .filter_map(|path| lookup.modules.get(path.as_path()).copied()),
    );

    let output = match role {
        ChunkRole::Entry => OutputKind::Entry,
        ChunkRole::Async | ChunkRole::Shared => OutputKind::Chunk,
    };
    let script_url = resolver.chunk(name, output, Some(&hash))?.public_url;
    let stylesheet_url = if css_size > 0 {
        Some(resolver.stylesheet(name, output, Some(&hash))?.public_url)
    } else {
        None
    };

    Ok(PlannedChunk {
        name: name.to_string(),
        role,
        modules,
        js_size,
        css_size,
        hash,
        script_url,
        stylesheet_url,
    })
}

/// Pairs of extracted stylesheets that appear in opposite orders in two chunks.
fn stylesheet_order_conflicts(chunks: &[PlannedChunk], lookup: &Lookup<'_>) -> Vec<(PathBuf, PathBuf)> {
    let orders: Vec<Vec<&Path>> = chunks
        .iter()
        .map(|chunk| {
            chunk
                .modules
                .iter()
                .map(PathBuf::as_path)
                .filter(|path| lookup.contribution(path) == Contribution::Stylesheet)
                .collect()
        })
        .collect();

    let position = |order: &[&Path], path: &Path| order.iter().position(|p| *p == path);

    let mut conflicts = Vec::new();
    for (i, first) in orders.iter().enumerate() {
        for second in &orders[i + 1..] {
            for (a_index, a) in first.iter().enumerate() {
                for b in &first[a_index + 1..] {
                    if let (Some(pa), Some(pb)) = (position(second, a), position(second, b)) {
                        let pair = (a.to_path_buf(), b.to_path_buf());
                        if pb < pa && !conflicts.contains(&pair) {
                            conflicts.push(pair);
                        }
                    }
                }
            }
        }
    }
    conflicts
}

fn check_collisions(files: &[EmittedFile]) -> Result<()> {
    let mut seen: FxHashMap<&Path, &EmittedFile> = FxHashMap::default();
    for file in files {
        if let Some(previous) = seen.insert(file.location.write_path.as_path(), file) {
            return Err(BuildError::OutputCollision {
                path: file.location.write_path.clone(),
                first: describe(previous),
                second: describe(file),
            });
        }
    }
    Ok(())
}

fn describe(file: &EmittedFile) -> String {
    match (&file.chunk, &file.source) {
        (Some(chunk), _) => format!("chunk '{chunk}'"),
        (None, Some(source)) => source.display().to_string(),
        (None, None) => format!("{:?}", file.kind),
    }
}
