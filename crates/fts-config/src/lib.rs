//! Configuration system for fts.
//!
//! fts uses TOML configuration files named `.fts.toml`. Configuration is resolved by walking up
//! the directory tree from the current working directory, collecting any `.fts.toml` files found,
//! then loading `~/.fts.toml` as the global config with lowest precedence. A file that sets
//! `root = true` ends the walk and suppresses the global config.

#![warn(missing_docs)]

mod discovery;
mod error;
mod merge;
mod parse;
mod templates;
#[cfg(test)]
mod test_support;

use std::path::{Path, PathBuf};

pub use discovery::{
    CONFIG_FILENAME, discover_config_files, global_config_path, is_global_config,
    require_global_config_path,
};
pub use error::ConfigError;
use fts_query::ParserConfig;
pub use merge::{ParsedConfig, merge_configs};
pub use parse::{RawConfig, RawParserSettings, parse_config_file, parse_config_str};
use serde::Serialize;
pub use templates::{global_template, local_template};

/// Top-level merged configuration for fts.
///
/// This represents the fully resolved configuration after merging all discovered `.fts.toml`
/// files according to precedence rules.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Parser settings handed to `fts_query::parse`.
    pub parser: ParserConfig,
    /// Directory containing the most specific config file.
    pub config_root: Option<PathBuf>,
    /// Files that contributed to this configuration, highest precedence first.
    pub sources: Vec<PathBuf>,
}

impl Config {
    /// Loads configuration by discovering and merging all relevant `.fts.toml` files.
    ///
    /// Returns `Ok(Config::default())` if no configuration files are found.
    pub fn load(cwd: &Path) -> Result<Self, ConfigError> {
        let config_files = discover_config_files(cwd);
        Self::load_from_files(&config_files)
    }

    /// Loads configuration from a specific list of config file paths.
    ///
    /// Files should be provided in precedence order: highest precedence first.
    pub fn load_from_files(files: &[PathBuf]) -> Result<Self, ConfigError> {
        if files.is_empty() {
            return Ok(Self::default());
        }

        let parsed: Vec<ParsedConfig> = files
            .iter()
            .map(|path| {
                let config = parse_config_file(path)?;
                Ok(ParsedConfig {
                    path: path.clone(),
                    config,
                })
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;

        Ok(merge_configs(&parsed))
    }

    /// Serializes the effective settings to TOML format.
    ///
    /// The output has the same shape as a `.fts.toml` file.
    pub fn settings_to_toml(&self) -> Result<String, ConfigError> {
        let serializable = SerializableSettings {
            parser: self.parser,
        };
        toml::to_string_pretty(&serializable)
            .map_err(|source| ConfigError::SerializeToml { source })
    }
}

/// Internal struct for TOML serialization of settings.
#[derive(Serialize)]
struct SerializableSettings {
    /// Parser settings.
    parser: ParserConfig,
}

#[cfg(test)]
mod tests {
    use fts_query::Mode;

    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.parser.mode, Mode::DefaultConjunction);
        assert!(config.parser.default_field_conjunction);
        assert!(config.config_root.is_none());
        assert!(config.sources.is_empty());
    }

    #[test]
    fn test_settings_to_toml() {
        let config = Config::default();
        let toml = config.settings_to_toml().unwrap();

        assert!(toml.contains("[parser]"));
        assert!(toml.contains("mode = \"default-conjunction\""));
        assert!(toml.contains("default_field_conjunction = true"));

        // Round-trips through the raw parser
        let raw = parse_config_str(&toml, Path::new("effective.toml")).unwrap();
        let parser = raw.parser.unwrap();
        assert_eq!(parser.mode, Some(Mode::DefaultConjunction));
        assert_eq!(parser.default_field_conjunction, Some(true));
    }

    #[test]
    fn test_load_from_empty_list() {
        let config = Config::load_from_files(&[]).unwrap();
        assert_eq!(config.parser, ParserConfig::default());
    }
}
