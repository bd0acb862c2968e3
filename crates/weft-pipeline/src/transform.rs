//! Transform execution.
//!
//! Transforms are external collaborators identified by name. The pipeline
//! only decides which chain applies to a module and runs it in order; an
//! engine supplies a [`TransformExecutor`] that does the actual work.

use std::path::{Path, PathBuf};

use rayon::prelude::*;
use serde::Serialize;
use weft_config::TransformConfig;

use crate::error::{Result, TransformFailure};
use crate::hash::content_hash;
use crate::rules::{CompiledRule, RuleTable};

/// Runs a single named transform over a module's source.
///
/// Implementations must be `Sync`: modules are transformed in parallel.
pub trait TransformExecutor: Sync {
    fn execute(
        &self,
        transform: &TransformConfig,
        path: &Path,
        source: String,
    ) -> anyhow::Result<String>;
}

impl<F> TransformExecutor for F
where
    F: Fn(&TransformConfig, &Path, String) -> anyhow::Result<String> + Sync,
{
    fn execute(
        &self,
        transform: &TransformConfig,
        path: &Path,
        source: String,
    ) -> anyhow::Result<String> {
        self(transform, path, source)
    }
}

/// A module's path and source text, before transformation.
#[derive(Debug, Clone)]
pub struct ModuleSource {
    pub path: PathBuf,
    pub source: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransformedModule {
    pub path: PathBuf,
    /// Index of the rule that applied; `None` for pass-through
    pub rule: Option<usize>,
    pub output: String,
    /// Hex SHA-256 of `output`
    pub hash: String,
}

/// Apply `rule`'s chain to `source`, stopping at the first failure.
pub fn run_chain<E: TransformExecutor + ?Sized>(
    executor: &E,
    rule: &CompiledRule,
    path: &Path,
    source: String,
) -> std::result::Result<String, TransformFailure> {
    rule.chain().iter().try_fold(source, |source, transform| {
        executor
            .execute(transform, path, source)
            .map_err(|err| TransformFailure {
                path: path.to_path_buf(),
                rule_index: rule.index(),
                rule: rule.label().to_string(),
                transform: transform.transform.clone(),
                message: format!("{err:#}"),
            })
    })
}

/// Route and transform every module in parallel.
///
/// Output order matches input order. The first failure aborts the whole
/// batch and is returned as [`BuildError::Transform`](crate::BuildError::Transform).
pub fn transform_all<E: TransformExecutor + ?Sized>(
    table: &RuleTable,
    executor: &E,
    modules: Vec<ModuleSource>,
) -> Result<Vec<TransformedModule>> {
    let transformed = modules
        .into_par_iter()
        .map(|module| -> Result<TransformedModule> {
            let route = table.resolve(&module.path);
            let output = match route.rule() {
                Some(rule) => run_chain(executor, rule, &module.path, module.source)?,
                None => module.source,
            };
            Ok(TransformedModule {
                hash: content_hash(output.as_bytes()),
                rule: route.rule_index(),
                path: module.path,
                output,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    tracing::debug!(modules = transformed.len(), "transformed modules");
    Ok(transformed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BuildError;
    use weft_config::presets;

    fn table() -> RuleTable {
        let config = presets::vanilla_react().unwrap();
        RuleTable::compile(&config.build.rules, ".").unwrap()
    }

    fn tagging(transform: &TransformConfig, _path: &Path, source: String) -> anyhow::Result<String> {
        Ok(format!("{}({source})", transform.transform))
    }

    #[test]
    fn chain_runs_in_declaration_order() {
        let table = table();
        let modules = vec![ModuleSource {
            path: PathBuf::from("src/main.js"),
            source: "x".to_string(),
        }];

        let out = transform_all(&table, &tagging, modules).unwrap();
        assert_eq!(out[0].output, "jsx(syntax-downlevel(x))");
        assert_eq!(out[0].rule, Some(0));
        assert_eq!(out[0].hash, content_hash(out[0].output.as_bytes()));
    }

    #[test]
    fn unmatched_modules_pass_through_unchanged() {
        let table = table();
        let modules = vec![ModuleSource {
            path: PathBuf::from("node_modules/react/index.js"),
            source: "react".to_string(),
        }];

        let out = transform_all(&table, &tagging, modules).unwrap();
        assert_eq!(out[0].output, "react");
        assert_eq!(out[0].rule, None);
    }

    #[test]
    fn failure_reports_path_rule_and_transform() {
        let table = table();
        let failing = |transform: &TransformConfig, _: &Path, source: String| {
            if transform.transform == "sass" {
                anyhow::bail!("undefined variable $brand");
            }
            Ok(source)
        };
        let modules = (0..16)
            .map(|i| ModuleSource {
                path: PathBuf::from(format!("src/file{i}.js")),
                source: String::new(),
            })
            .chain([ModuleSource {
                path: PathBuf::from("src/theme.scss"),
                source: "$brand".to_string(),
            }])
            .collect();

        let err = transform_all(&table, &failing, modules).unwrap_err();
        let BuildError::Transform(failure) = &err else {
            panic!("expected transform failure, got {err:?}");
        };
        assert_eq!(failure.path, PathBuf::from("src/theme.scss"));
        assert_eq!(failure.rule_index, 3);
        assert_eq!(failure.transform, "sass");
        assert!(failure.message.contains("undefined variable"));
    }
}
