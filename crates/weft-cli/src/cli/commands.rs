use clap::{Args, Subcommand};
use std::path::PathBuf;

/// Available Weft subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Validate the configuration
    ///
    /// Runs schema checks, checks that entries, the HTML template, the
    /// favicon and static copy sources exist, compiles the rule table and
    /// reports shadowed or overlapping rules.
    Check(CheckArgs),

    /// Show which rule transforms each path
    ///
    /// Examples:
    ///   weft route src/logo.svg
    ///   weft route 'src/fonts/icons.woff?v=4.7.0' src/App.jsx
    Route(RouteArgs),

    /// Resolve a build plan against a module graph
    ///
    /// The graph is a JSON file listing modules (path, size) and chunks
    /// (name, kind, modules).
    Plan(PlanArgs),
}

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Skip filesystem checks (entries, template, favicon, copy sources)
    #[arg(long)]
    pub no_fs: bool,

    /// Treat rule lints as errors
    #[arg(long)]
    pub strict: bool,
}

#[derive(Args, Debug)]
pub struct RouteArgs {
    /// Module paths, relative to the project root
    #[arg(required = true, value_name = "PATH")]
    pub paths: Vec<PathBuf>,

    /// Print routes as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct PlanArgs {
    /// Module graph JSON file
    #[arg(short, long, value_name = "FILE")]
    pub graph: PathBuf,

    /// Print the full plan as JSON
    #[arg(long)]
    pub json: bool,

    /// Skip static copies (no directory walk)
    #[arg(long)]
    pub no_copy: bool,

    /// Render the HTML page to stdout instead of the summary
    #[arg(long, conflicts_with = "json")]
    pub html: bool,
}
