//! Module graph handed to the pipeline by the engine.
//!
//! The graph is plain data: every module with its size, and every chunk with
//! its kind and member modules. The CLI reads it from a JSON file.

use std::fs;
use std::path::{Path, PathBuf};

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

use crate::error::{BuildError, Result};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModuleGraph {
    #[serde(default)]
    pub modules: Vec<ModuleInfo>,

    #[serde(default)]
    pub chunks: Vec<ChunkInfo>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleInfo {
    /// Path relative to the project root, possibly with a `?query` suffix
    pub path: PathBuf,

    /// Size in bytes
    pub size: u64,

    /// Content hash supplied by the engine, if it has one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
}

/// How a chunk is loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChunkKind {
    /// Loaded with the page (entry chunks)
    #[default]
    Initial,
    /// Loaded on demand through a dynamic import
    Async,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkInfo {
    pub name: String,

    #[serde(default)]
    pub kind: ChunkKind,

    pub modules: Vec<PathBuf>,
}

impl ModuleGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a graph from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| BuildError::io(path, e))?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        serde_json::from_str(content).map_err(|e| BuildError::InvalidGraph(e.to_string()))
    }

    pub fn with_module(mut self, path: impl Into<PathBuf>, size: u64) -> Self {
        self.modules.push(ModuleInfo {
            path: path.into(),
            size,
            hash: None,
        });
        self
    }

    pub fn with_chunk<I, P>(mut self, name: impl Into<String>, kind: ChunkKind, modules: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.chunks.push(ChunkInfo {
            name: name.into(),
            kind,
            modules: modules.into_iter().map(Into::into).collect(),
        });
        self
    }

    pub fn chunk(&self, name: &str) -> Option<&ChunkInfo> {
        self.chunks.iter().find(|chunk| chunk.name == name)
    }

    /// Index modules by path.
    pub fn index(&self) -> FxHashMap<&Path, &ModuleInfo> {
        self.modules
            .iter()
            .map(|module| (module.path.as_path(), module))
            .collect()
    }

    /// Reject duplicate modules and chunks that reference undeclared modules.
    pub fn validate(&self) -> Result<()> {
        let mut seen = FxHashSet::default();
        for module in &self.modules {
            if !seen.insert(module.path.as_path()) {
                return Err(BuildError::DuplicateModule(module.path.clone()));
            }
        }

        for chunk in &self.chunks {
            if let Some(missing) = chunk.modules.iter().find(|m| !seen.contains(m.as_path())) {
                return Err(BuildError::UnknownModule {
                    chunk: chunk.name.clone(),
                    module: missing.clone(),
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_json_with_defaults() {
        let graph = ModuleGraph::from_json(
            r#"{
                "modules": [{ "path": "src/main.js", "size": 120 }],
                "chunks": [{ "name": "vanilla", "modules": ["src/main.js"] }]
            }"#,
        )
        .unwrap();

        assert_eq!(graph.chunks[0].kind, ChunkKind::Initial);
        assert_eq!(graph.modules[0].hash, None);
        graph.validate().unwrap();
    }

    #[test]
    fn rejects_unknown_module_in_chunk() {
        let graph = ModuleGraph::new()
            .with_module("src/main.js", 1)
            .with_chunk("vanilla", ChunkKind::Initial, ["src/missing.js"]);

        assert!(matches!(
            graph.validate(),
            Err(BuildError::UnknownModule { chunk, .. }) if chunk == "vanilla"
        ));
    }

    #[test]
    fn rejects_duplicate_module() {
        let graph = ModuleGraph::new()
            .with_module("src/main.js", 1)
            .with_module("src/main.js", 2);

        assert!(matches!(graph.validate(), Err(BuildError::DuplicateModule(_))));
    }

    #[test]
    fn invalid_json_is_reported() {
        assert!(matches!(
            ModuleGraph::from_json("{ modules: "),
            Err(BuildError::InvalidGraph(_))
        ));
    }
}
