//! Weft CLI entry point.

use clap::Parser;
use miette::Result;
use weft_cli::{cli, commands, error, ui};

fn main() -> Result<()> {
    let args = cli::Cli::parse();
    ui::init_colors(args.no_color);

    commands::run(args).map_err(error::cli_error_to_miette)
}
