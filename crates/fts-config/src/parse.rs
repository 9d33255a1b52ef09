//! Configuration file parsing.
//!
//! Parses individual `.fts.toml` files into intermediate `RawConfig` structures
//! that keep every field optional until merging.

use std::{fs, path::Path};

use fts_query::Mode;
use serde::Deserialize;
#[cfg(test)]
use toml::de::Error as TomlError;

use crate::ConfigError;

/// Raw configuration as parsed directly from a TOML file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawConfig {
    /// When true, stop discovery here - ignore parent and global configs.
    pub root: Option<bool>,
    /// Parser settings section.
    pub parser: Option<RawParserSettings>,
}

/// Raw `[parser]` section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawParserSettings {
    /// Query dialect.
    pub mode: Option<Mode>,
    /// Implicit connective inside field groups.
    pub default_field_conjunction: Option<bool>,
}

/// Parses a configuration file from disk.
pub fn parse_config_file(path: &Path) -> Result<RawConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;

    parse_config_str(&contents, path)
}

/// Parses configuration from a TOML string.
///
/// The `path` parameter is used for error reporting.
pub fn parse_config_str(contents: &str, path: &Path) -> Result<RawConfig, ConfigError> {
    toml::from_str(contents).map_err(|source| ConfigError::ParseToml {
        path: path.to_path_buf(),
        source,
    })
}

/// Parses configuration from a TOML string without path context.
#[cfg(test)]
pub fn parse_config(contents: &str) -> Result<RawConfig, TomlError> {
    toml::from_str(contents)
}

/// Checks if a config file has `root = true` set.
///
/// Returns false if the file cannot be read or parsed.
pub fn is_root_config(path: &Path) -> bool {
    let Ok(contents) = fs::read_to_string(path) else {
        return false;
    };
    let Ok(config) = toml::from_str::<RawConfig>(&contents) else {
        return false;
    };
    config.root == Some(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty_config() {
        let config = parse_config_str("", Path::new("test.toml")).unwrap();
        assert!(config.root.is_none());
        assert!(config.parser.is_none());
    }

    #[test]
    fn test_parse_parser_section() {
        let toml = r#"
root = true

[parser]
mode = "default-disjunction"
default_field_conjunction = false
"#;
        let config = parse_config_str(toml, Path::new("test.toml")).unwrap();
        assert_eq!(config.root, Some(true));
        let parser = config.parser.unwrap();
        assert_eq!(parser.mode, Some(Mode::DefaultDisjunction));
        assert_eq!(parser.default_field_conjunction, Some(false));
    }

    #[test]
    fn test_parse_partial_parser_section() {
        let config = parse_config("[parser]\nmode = \"cmis\"\n").unwrap();
        let parser = config.parser.unwrap();
        assert_eq!(parser.mode, Some(Mode::Cmis));
        assert!(parser.default_field_conjunction.is_none());
    }

    #[test]
    fn test_parse_unknown_mode() {
        let err = parse_config_str("[parser]\nmode = \"fuzzy\"\n", Path::new("bad.toml"))
            .unwrap_err();
        assert!(matches!(err, ConfigError::ParseToml { .. }));
        assert!(err.to_string().contains("bad.toml"));
    }

    #[test]
    fn test_parse_wrong_type() {
        let result = parse_config("[parser]\ndefault_field_conjunction = \"yes\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_read_missing_file() {
        let err = parse_config_file(Path::new("/nonexistent/.fts.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::ReadFile { .. }));
    }
}
