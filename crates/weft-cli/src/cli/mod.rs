//! Command-line interface definition.
//!
//! - `weft check` - validate `weft.toml` and report rule lints
//! - `weft route` - show which rule handles each path
//! - `weft plan` - resolve a full build plan against a module graph

mod commands;
pub mod enums;

use std::path::PathBuf;

use clap::Parser;

pub use commands::{CheckArgs, Command, PlanArgs, RouteArgs};
pub use enums::ModeArg;

/// Weft - build-pipeline configuration for multi-entry web applications
#[derive(Parser, Debug)]
#[command(
    name = "weft",
    version,
    about = "Validate, route and plan builds described by weft.toml",
    long_about = "Weft reads a build descriptor (weft.toml or the `weft` field of package.json),\n\
                  binds it to a mode and answers questions about the build: which rule\n\
                  transforms a module, what each output file is called and where it lands,\n\
                  and which shared modules move into their own chunks."
)]
pub struct Cli {
    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Build mode
    #[arg(short, long, global = true, value_enum, env = "WEFT_MODE", default_value = "development")]
    pub mode: ModeArg,

    /// Project root (default: current directory)
    #[arg(long, global = true, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Configuration file (default: weft.toml or package.json in the root)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

#[cfg(test)]
mod tests {
    use super::*;
    use weft_config::Mode;

    #[test]
    fn parses_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["weft", "check", "--mode", "production", "--no-color"]).unwrap();
        assert_eq!(Mode::from(cli.mode), Mode::Production);
        assert!(cli.no_color);
        assert!(matches!(cli.command, Command::Check(_)));
    }

    #[test]
    fn route_requires_paths() {
        assert!(Cli::try_parse_from(["weft", "route"]).is_err());
    }

    #[test]
    fn verbose_conflicts_with_quiet() {
        assert!(Cli::try_parse_from(["weft", "-v", "-q", "check"]).is_err());
    }

    #[test]
    fn plan_takes_graph_and_json() {
        let cli = Cli::try_parse_from(["weft", "plan", "--graph", "graph.json", "--json"]).unwrap();
        let Command::Plan(args) = cli.command else {
            panic!("expected plan");
        };
        assert_eq!(args.graph, PathBuf::from("graph.json"));
        assert!(args.json);
    }
}
