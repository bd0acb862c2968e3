//! `weft check`: validate the configuration without a module graph.

use weft_config::{validate_fs, validate_schema};
use weft_pipeline::{RuleTable, SplitEvaluator};

use crate::cli::CheckArgs;
use crate::commands::Project;
use crate::error::{CliError, Result};
use crate::ui;

/// 1. Schema checks (and filesystem checks unless `--no-fs`)
/// 2. Compile the rule table and split groups for the mode
/// 3. Report rule lints; `--strict` turns them into an error
pub fn execute(project: &Project, args: CheckArgs) -> Result<()> {
    ui::info(&format!(
        "Checking {} ({} mode)...",
        project.config_path.display(),
        project.mode
    ));

    let build = project.build()?;
    if args.no_fs {
        validate_schema(&build)?;
    } else {
        validate_fs(&build, &project.root)?;
    }

    let descriptor = build.resolve(project.mode);
    let table = RuleTable::compile(&descriptor.rules, &project.root)?;
    SplitEvaluator::new(&descriptor.split)?;

    let lints = table.lint();
    for lint in &lints {
        ui::warning(&lint.to_string());
    }
    if args.strict && !lints.is_empty() {
        return Err(CliError::Lints { count: lints.len() });
    }

    ui::success(&format!(
        "Configuration is valid: {} entries, {} rules, {} lint(s)",
        descriptor.entries.len(),
        table.len(),
        lints.len()
    ));
    Ok(())
}
