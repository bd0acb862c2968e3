//! Weft CLI.
//!
//! - [`cli`] - clap definitions
//! - [`commands`] - `check`, `route` and `plan`
//! - [`error`] - [`CliError`] and miette conversion
//! - [`logger`] - tracing subscriber setup
//! - [`ui`] - terminal output helpers

pub mod cli;
pub mod commands;
pub mod error;
pub mod logger;
pub mod ui;

pub use error::{CliError, Result};
