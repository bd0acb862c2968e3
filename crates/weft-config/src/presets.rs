//! Built-in configurations.

use crate::config::WeftConfig;
use crate::discovery::parse_toml;
use crate::error::Result;

/// Source of the two-entry (`vanilla` + `react`) web application preset.
pub const VANILLA_REACT_TOML: &str = include_str!("presets/vanilla_react.toml");

/// The two-entry web application preset.
///
/// # Example
///
/// ```
/// use weft_config::{presets, Mode};
///
/// let resolved = presets::vanilla_react().unwrap().resolve(Mode::Production).unwrap();
/// assert_eq!(resolved.output.public_path, "./");
/// assert_eq!(resolved.rules.len(), 7);
/// ```
pub fn vanilla_react() -> Result<WeftConfig> {
    parse_toml(VANILLA_REACT_TOML)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Mode;

    #[test]
    fn preset_parses() {
        let config = vanilla_react().unwrap();
        let names: Vec<_> = config.build.entries.keys().cloned().collect();
        assert_eq!(names, ["vanilla", "react"]);
        assert_eq!(config.build.split.min_chunks, 3);
        assert_eq!(config.build.split.groups[0].name, "vendors");
        assert_eq!(
            config.build.split.groups[0].test.as_deref(),
            Some("(^|[\\\\/])node_modules[\\\\/]")
        );
    }

    #[test]
    fn preset_public_path_depends_on_mode() {
        let config = vanilla_react().unwrap();
        let dev = config.clone().resolve(Mode::Development).unwrap();
        let prod = config.resolve(Mode::Production).unwrap();
        assert_eq!(dev.output.public_path, "/");
        assert_eq!(prod.output.public_path, "./");
        assert_eq!(prod.define["process.env.NODE_ENV"], "\"production\"");
        assert_eq!(prod.define["process.env.PUBLIC_URL"], "\"/build/\"");
    }

    #[test]
    fn font_rule_shorthand_carries_name_option() {
        let config = vanilla_react().unwrap();
        let fonts = &config.build.rules[5];
        assert_eq!(fonts.chain[0].transform, "emit-file");
        assert_eq!(fonts.chain[0].option_str("name"), Some("[name].[ext]"));
    }
}
