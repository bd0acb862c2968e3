//! Command implementations.

mod check;
mod plan;
mod route;

use std::path::{Path, PathBuf};

use weft_config::{
    ConfigDiscovery, ConfigError, Descriptor, Mode, ResolvedDescriptor, WeftConfig, validate_schema,
};
use weft_pipeline::LogLevel;

use crate::cli::{Cli, Command};
use crate::error::{CliError, Result};
use crate::{logger, ui};

pub use check::execute as check_execute;
pub use plan::execute as plan_execute;
pub use route::execute as route_execute;

/// A loaded configuration together with the root and mode it applies to.
#[derive(Debug, Clone)]
pub struct Project {
    pub root: PathBuf,
    pub config_path: PathBuf,
    pub config: WeftConfig,
    pub mode: Mode,
}

impl Project {
    /// Load the configuration from `config` (relative to `root`) or discover it.
    pub fn load(root: Option<&Path>, config: Option<&Path>, mode: Mode) -> Result<Self> {
        let root = match root {
            Some(root) => std::path::absolute(root)?,
            None => std::env::current_dir()?,
        };
        let discovery = ConfigDiscovery::new(&root);

        let config_path = match config {
            Some(path) => {
                let path = root.join(path);
                if !path.is_file() {
                    return Err(CliError::FileNotFound(path));
                }
                path
            }
            None => discovery.find().ok_or(ConfigError::NotFound)?,
        };
        let config = discovery.load_from(&config_path)?;

        Ok(Self {
            root,
            config_path,
            config,
            mode,
        })
    }

    /// The build section with the mode's profile applied, schema-checked.
    pub fn build(&self) -> Result<Descriptor> {
        let config = self
            .config
            .clone()
            .materialize_profile(Some(self.mode.as_str()))?;
        validate_schema(&config.build)?;
        Ok(config.build)
    }

    pub fn descriptor(&self) -> Result<ResolvedDescriptor> {
        Ok(self.build()?.resolve(self.mode))
    }

    /// `settings.log_level`, if set and recognised.
    pub fn log_level(&self) -> Option<LogLevel> {
        self.config.settings.log_level.as_deref()?.parse().ok()
    }
}

/// Load the project, set up logging and the worker pool, and dispatch.
pub fn run(cli: Cli) -> Result<()> {
    let project = Project::load(cli.root.as_deref(), cli.config.as_deref(), cli.mode.into())?;

    logger::init_logger(cli.verbose, cli.quiet, cli.no_color, project.log_level());
    if let Some(level) = &project.config.settings.log_level {
        if level.parse::<LogLevel>().is_err() {
            ui::warning(&format!("Ignoring unknown settings.log_level '{level}'"));
        }
    }

    if let Some(jobs) = project.config.settings.parallel_jobs {
        rayon::ThreadPoolBuilder::new()
            .num_threads(jobs)
            .build_global()?;
        tracing::debug!(jobs, "configured worker threads");
    }

    tracing::debug!(
        config = %project.config_path.display(),
        mode = %project.mode,
        "loaded configuration"
    );

    match cli.command {
        Command::Check(args) => check_execute(&project, args),
        Command::Route(args) => route_execute(&project, args),
        Command::Plan(args) => plan_execute(&project, args),
    }
}
