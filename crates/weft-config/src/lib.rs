//! Build-pipeline configuration descriptor.
//!
//! A [`WeftConfig`] is loaded once (see [`discovery`]), validated once (see
//! [`validation`]) and bound to a [`Mode`] with [`WeftConfig::resolve`]. The
//! resulting [`ResolvedDescriptor`] is immutable data handed to the pipeline.

pub mod config;
pub mod descriptor;
pub mod discovery;
pub mod error;
pub mod mode;
pub mod presets;
pub mod settings;
pub mod template;
pub mod validation;

// Re-export main types
pub use config::*;
pub use descriptor::*;
pub use error::*;
pub use mode::{ByMode, Mode, PerMode};
pub use settings::*;
pub use template::{FilenameTemplate, Interpolation, Placeholder};

// Re-export discovery and validation
pub use discovery::{ConfigDiscovery, discover, parse_toml};
pub use validation::{
    ConfigValidator, FsValidator, SchemaValidator, validate_chain_options, validate_fs,
    validate_schema,
};
