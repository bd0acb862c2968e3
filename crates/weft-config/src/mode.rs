//! Build mode and mode-conditional values.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The single runtime input of a build invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Development,
    Production,
}

impl Mode {
    pub const ALL: [Mode; 2] = [Mode::Development, Mode::Production];

    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Development => "development",
            Mode::Production => "production",
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Mode::Production)
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Ok(Mode::Development),
            "production" | "prod" => Ok(Mode::Production),
            other => Err(format!("Invalid mode: {other}")),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A value that is either fixed or chosen per [`Mode`].
///
/// In TOML either form is accepted:
///
/// ```toml
/// public_path = "/"
/// public_path = { development = "/", production = "./" }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ByMode<T> {
    PerMode(PerMode<T>),
    Fixed(T),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PerMode<T> {
    pub development: T,
    pub production: T,
}

impl<T> ByMode<T> {
    pub fn fixed(value: T) -> Self {
        ByMode::Fixed(value)
    }

    pub fn per_mode(development: T, production: T) -> Self {
        ByMode::PerMode(PerMode {
            development,
            production,
        })
    }

    /// Bind the mode, yielding exactly one concrete value.
    pub fn resolve(&self, mode: Mode) -> &T {
        match self {
            ByMode::Fixed(value) => value,
            ByMode::PerMode(values) => match mode {
                Mode::Development => &values.development,
                Mode::Production => &values.production,
            },
        }
    }

    pub fn is_mode_dependent(&self) -> bool {
        matches!(self, ByMode::PerMode(_))
    }
}

impl<T: Default> Default for ByMode<T> {
    fn default() -> Self {
        ByMode::Fixed(T::default())
    }
}

impl<T> From<T> for ByMode<T> {
    fn from(value: T) -> Self {
        ByMode::Fixed(value)
    }
}
