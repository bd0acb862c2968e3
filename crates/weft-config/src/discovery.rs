//! File-based config discovery for CLI use
//!
//! Handles finding and loading weft configuration files from the filesystem.
//! Values are layered with figment: file contents first, then `WEFT_`
//! environment variables (`WEFT_BUILD__OUTPUT__PATH=dist`).

use std::fs;
use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Serialized};
use serde_json::Value;

use crate::config::WeftConfig;
use crate::error::{ConfigError, Result};

pub const CONFIG_FILE: &str = "weft.toml";
pub const ENV_PREFIX: &str = "WEFT_";

/// File-based configuration discovery
///
/// # Example
///
/// ```no_run
/// use weft_config::ConfigDiscovery;
///
/// let discovery = ConfigDiscovery::new(".");
/// let config = discovery.load().unwrap();
/// ```
pub struct ConfigDiscovery {
    root: PathBuf,
    use_env: bool,
}

impl ConfigDiscovery {
    /// Create a new config discovery with a root directory
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            use_env: true,
        }
    }

    /// Skip the environment layer (useful for tests and reproducible checks)
    pub fn without_env(mut self) -> Self {
        self.use_env = false;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Find a config file in the root directory
    ///
    /// Searches in this order:
    /// 1. TOML config: weft.toml
    /// 2. package.json (weft field)
    pub fn find(&self) -> Option<PathBuf> {
        let toml_path = self.root.join(CONFIG_FILE);
        if toml_path.exists() {
            return Some(toml_path);
        }

        let pkg_path = self.root.join("package.json");
        if pkg_path.exists() {
            if let Ok(content) = fs::read_to_string(&pkg_path) {
                if let Ok(parsed) = serde_json::from_str::<Value>(&content) {
                    if parsed.get("weft").is_some_and(|field| !field.is_null()) {
                        return Some(pkg_path);
                    }
                }
            }
        }

        None
    }

    /// Load config from discovered file
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotFound` if no config file is found.
    pub fn load(&self) -> Result<WeftConfig> {
        let path = self.find().ok_or(ConfigError::NotFound)?;
        self.load_from(&path)
    }

    /// Load config from a specific file path
    pub fn load_from(&self, path: &Path) -> Result<WeftConfig> {
        tracing::debug!(path = %path.display(), "loading configuration");

        let value = if path.file_name() == Some(std::ffi::OsStr::new("package.json")) {
            read_package_json(path)?
        } else {
            match path.extension().and_then(|ext| ext.to_str()) {
                Some("toml") => toml_to_value(&fs::read_to_string(path)?)?,
                Some("json") => read_json(path)?,
                other => {
                    return Err(ConfigError::UnsupportedFormat(
                        other.unwrap_or("<none>").to_string(),
                    ));
                }
            }
        };

        let mut figment = Figment::from(Serialized::defaults(value));
        if self.use_env {
            figment = figment.merge(Env::prefixed(ENV_PREFIX).ignore(&["mode"]).split("__"));
        }

        let layered: Value = figment.extract().map_err(|e| ConfigError::InvalidValue {
            field: "configuration".to_string(),
            hint: Some(e.to_string()),
        })?;

        WeftConfig::from_value(layered)
    }
}

/// Parse a TOML document into a [`WeftConfig`].
pub fn parse_toml(content: &str) -> Result<WeftConfig> {
    WeftConfig::from_value(toml_to_value(content)?)
}

fn toml_to_value(content: &str) -> Result<Value> {
    let toml_val: toml::Value = toml::from_str(content).map_err(|e| ConfigError::InvalidValue {
        field: "toml".to_string(),
        hint: Some(format!("Invalid TOML syntax: {e}")),
    })?;

    serde_json::to_value(toml_val).map_err(|e| ConfigError::InvalidValue {
        field: "toml".to_string(),
        hint: Some(format!("TOML to JSON conversion failed: {e}")),
    })
}

fn read_json(path: &Path) -> Result<Value> {
    let content = fs::read_to_string(path)?;
    serde_json::from_str(&content).map_err(|e| ConfigError::InvalidValue {
        field: path.display().to_string(),
        hint: Some(format!("Invalid JSON: {e}")),
    })
}

fn read_package_json(path: &Path) -> Result<Value> {
    let parsed = read_json(path)?;

    match parsed.get("weft") {
        Some(Value::Null) => Err(ConfigError::InvalidValue {
            field: "weft".to_string(),
            hint: Some("The 'weft' field cannot be null".to_string()),
        }),
        Some(value) => Ok(value.clone()),
        None => Err(ConfigError::InvalidValue {
            field: "weft".to_string(),
            hint: Some("Add a 'weft' field to your package.json".to_string()),
        }),
    }
}

/// Discover and load config from the current directory (convenience function)
pub fn discover() -> Result<WeftConfig> {
    let root = std::env::current_dir()?;
    ConfigDiscovery::new(&root).load()
}
