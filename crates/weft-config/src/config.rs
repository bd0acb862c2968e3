//! Top-level configuration file structure and profile merging.
//!
//! For file discovery, see the `discovery` module.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::descriptor::{Descriptor, ResolvedDescriptor};
use crate::error::{ConfigError, Result as ConfigResult};
use crate::mode::Mode;
use crate::settings::GlobalSettings;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeftConfig {
    #[serde(default)]
    pub build: Descriptor,

    /// Per-mode overrides, deep-merged over the base configuration
    #[serde(default)]
    pub profiles: HashMap<String, ProfileConfig>,

    #[serde(default)]
    pub settings: GlobalSettings,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileConfig {
    #[serde(default)]
    pub build: Value,

    #[serde(default)]
    pub settings: Value,
}

impl WeftConfig {
    /// Create from serde_json::Value (for programmatic config)
    ///
    /// # Example
    ///
    /// ```
    /// use weft_config::WeftConfig;
    /// use serde_json::json;
    /// use std::path::PathBuf;
    ///
    /// let value = json!({
    ///     "build": {
    ///         "entries": { "vanilla": "src/main.js" }
    ///     }
    /// });
    ///
    /// let config = WeftConfig::from_value(value).unwrap();
    /// assert_eq!(config.build.entries["vanilla"], PathBuf::from("src/main.js"));
    /// ```
    pub fn from_value(value: Value) -> ConfigResult<Self> {
        serde_json::from_value(value).map_err(|e| ConfigError::InvalidValue {
            field: "config".to_string(),
            hint: Some(e.to_string()),
        })
    }

    /// Convert to serde_json::Value
    pub fn to_value(&self) -> ConfigResult<Value> {
        serde_json::to_value(self).map_err(|e| ConfigError::InvalidValue {
            field: "config".to_string(),
            hint: Some(e.to_string()),
        })
    }

    /// Apply the overrides of the named profile, if it exists.
    pub fn materialize_profile(mut self, profile: Option<&str>) -> ConfigResult<Self> {
        let Some(profile_cfg) = profile.and_then(|name| self.profiles.get(name)).cloned() else {
            return Ok(self);
        };

        if !profile_cfg.build.is_null() {
            self.build = merge_into(&self.build, &profile_cfg.build)?;
        }

        if !profile_cfg.settings.is_null() {
            self.settings = merge_into(&self.settings, &profile_cfg.settings)?;
        }

        Ok(self)
    }

    /// Apply the profile named after `mode` and bind every mode-conditional value.
    pub fn resolve(self, mode: Mode) -> ConfigResult<ResolvedDescriptor> {
        let config = self.materialize_profile(Some(mode.as_str()))?;
        tracing::debug!(%mode, "resolved build descriptor");
        Ok(config.build.resolve(mode))
    }
}

fn merge_into<T>(base: &T, overrides: &Value) -> ConfigResult<T>
where
    T: Serialize + serde::de::DeserializeOwned,
{
    let mut merged = serde_json::to_value(base).map_err(|err| {
        ConfigError::InvalidProfileOverride {
            message: err.to_string(),
        }
    })?;
    merge_values(&mut merged, overrides);
    serde_json::from_value(merged).map_err(|err| ConfigError::InvalidProfileOverride {
        message: err.to_string(),
    })
}

fn merge_values(target: &mut Value, update: &Value) {
    match (target, update) {
        (Value::Object(target_map), Value::Object(update_map)) => {
            for (key, value) in update_map {
                merge_values(target_map.entry(key.clone()).or_insert(Value::Null), value);
            }
        }
        (target_slot, _) => {
            *target_slot = update.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::path::PathBuf;

    #[test]
    fn from_value_creates_config() {
        let value = json!({
            "build": {
                "entries": {"react": "src/index.js"},
                "output": {"path": "dist"}
            }
        });

        let config = WeftConfig::from_value(value).unwrap();
        assert_eq!(config.build.entries["react"], PathBuf::from("src/index.js"));
        assert_eq!(config.build.output.path, PathBuf::from("dist"));
    }

    #[test]
    fn to_value_serializes_config() {
        let config = WeftConfig::default();
        let value = config.to_value().unwrap();
        assert_eq!(value["build"]["output"]["filename"], json!("[name].bundle.js"));
    }

    #[test]
    fn profile_merging_works() {
        let value = json!({
            "build": {
                "entries": {"vanilla": "src/main.js"},
                "split": {"min_chunks": 2, "min_size": 10}
            },
            "profiles": {
                "production": {
                    "build": {"split": {"min_size": 30000}}
                }
            }
        });

        let config = WeftConfig::from_value(value)
            .unwrap()
            .materialize_profile(Some("production"))
            .unwrap();

        assert_eq!(config.build.split.min_chunks, 2);
        assert_eq!(config.build.split.min_size, 30_000);
    }

    #[test]
    fn resolve_applies_profile_named_after_mode() {
        let value = json!({
            "build": {"performance": {"hints": "off"}},
            "profiles": {"production": {"build": {"performance": {"hints": "error"}}}}
        });
        let config = WeftConfig::from_value(value).unwrap();

        let dev = config.clone().resolve(Mode::Development).unwrap();
        let prod = config.resolve(Mode::Production).unwrap();
        assert_eq!(dev.performance.hints, crate::PerformanceHints::Off);
        assert_eq!(prod.performance.hints, crate::PerformanceHints::Error);
    }

    #[test]
    fn invalid_profile_override_is_reported() {
        let value = json!({
            "profiles": {"production": {"build": {"split": {"min_chunks": "three"}}}}
        });
        let result = WeftConfig::from_value(value)
            .unwrap()
            .materialize_profile(Some("production"));
        assert!(matches!(
            result,
            Err(ConfigError::InvalidProfileOverride { .. })
        ));
    }
}
