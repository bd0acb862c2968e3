#![cfg_attr(docsrs, feature(doc_cfg))]

//! # weft-pipeline
//!
//! Evaluates a [`ResolvedDescriptor`](weft_config::ResolvedDescriptor) against
//! a module graph: which rule transforms each module, what every output file
//! is called and where it lands, and which shared modules move into their own
//! chunks.
//!
//! ## Quick Start
//!
//! ```
//! use std::path::Path;
//! use weft_config::{Mode, presets};
//! use weft_pipeline::{ChunkKind, ModuleGraph, RuleTable};
//!
//! let descriptor = presets::vanilla_react()?.resolve(Mode::Production)?;
//!
//! let rules = RuleTable::compile(&descriptor.rules, "/project")?;
//! let route = rules.resolve(Path::new("src/logo.svg"));
//! assert_eq!(route.rule_index(), Some(1));
//!
//! let graph = ModuleGraph::new()
//!     .with_module("src/main.js", 1_200)
//!     .with_module("src/App.jsx", 800)
//!     .with_chunk("vanilla", ChunkKind::Initial, ["src/main.js"])
//!     .with_chunk("react", ChunkKind::Initial, ["src/App.jsx"]);
//!
//! let plan = weft_pipeline::BuildPlan::resolve(&descriptor, Path::new("/project"), &graph)?;
//! assert_eq!(plan.html.unwrap().scripts, ["./vanilla.bundle.js"]);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod budget;
pub mod copy;
pub mod error;
pub mod graph;
pub mod hash;
pub mod html;
pub mod lint;
pub mod output;
pub mod plan;
pub mod rules;
pub mod split;
pub mod transform;

// Logging utilities (optional, enabled with "logging" feature)
#[cfg(feature = "logging")]
#[cfg_attr(docsrs, doc(cfg(feature = "logging")))]
pub mod logging;

#[cfg(feature = "logging")]
#[cfg_attr(docsrs, doc(cfg(feature = "logging")))]
pub use logging::{LogLevel, init_logging};

pub use budget::{Advisory, AdvisoryKind, check_budget};
pub use copy::{StaticCopy, expand_copies};
pub use error::{BuildError, Result, TransformFailure};
pub use graph::{ChunkInfo, ChunkKind, ModuleGraph, ModuleInfo};
pub use hash::{chunk_digest, content_hash, module_digest};
pub use html::{DEFAULT_TEMPLATE, HtmlPage};
pub use lint::{LintKind, RuleLint};
pub use output::{OutputKind, OutputResolver, ResolvedFile, join_public_path, resolve_output};
pub use plan::{BuildPlan, ChunkRole, EmittedFile, FileKind, ModuleRoute, PlannedChunk};
pub use rules::{CompiledRule, Route, RuleTable};
pub use split::{SplitEvaluator, SplitGroup, SplitPlan};
pub use transform::{ModuleSource, TransformExecutor, TransformedModule, run_chain, transform_all};
