//! Configuration merging.
//!
//! Merges multiple `RawConfig` files into a single resolved `Config`.

use std::path::{Path, PathBuf};

use fts_query::ParserConfig;

use crate::{
    Config,
    parse::{RawConfig, RawParserSettings},
};

/// A parsed config file with its source path.
pub struct ParsedConfig {
    /// Path to the config file.
    pub path: PathBuf,
    /// Parsed raw configuration.
    pub config: RawConfig,
}

/// Merges multiple configuration files into a single resolved `Config`.
///
/// Configs should be provided in precedence order: highest precedence first
/// (closest to the working directory), global config last. Each field takes
/// the first defined value.
pub fn merge_configs(configs: &[ParsedConfig]) -> Config {
    let mut parser = ParserConfig::default();

    // Iterate in reverse (lowest precedence first) so higher precedence overwrites
    for parsed in configs.iter().rev() {
        if let Some(ref raw) = parsed.config.parser {
            apply_raw_parser(&mut parser, raw);
        }
    }

    Config {
        parser,
        config_root: configs
            .first()
            .and_then(|c| c.path.parent())
            .map(Path::to_path_buf),
        sources: configs.iter().map(|c| c.path.clone()).collect(),
    }
}

/// Applies raw parser settings to result, overwriting any present values.
fn apply_raw_parser(result: &mut ParserConfig, raw: &RawParserSettings) {
    if let Some(mode) = raw.mode {
        result.mode = mode;
    }
    if let Some(v) = raw.default_field_conjunction {
        result.default_field_conjunction = v;
    }
}

#[cfg(test)]
mod tests {
    use fts_query::Mode;

    use super::*;
    use crate::parse::parse_config;

    fn parsed(path: &str, toml: &str) -> ParsedConfig {
        ParsedConfig {
            path: PathBuf::from(path),
            config: parse_config(toml).unwrap(),
        }
    }

    #[test]
    fn test_merge_empty() {
        let config = merge_configs(&[]);
        assert_eq!(config.parser, ParserConfig::default());
        assert!(config.config_root.is_none());
        assert!(config.sources.is_empty());
    }

    #[test]
    fn test_closest_value_wins() {
        let configs = [
            parsed("/a/b/.fts.toml", "[parser]\nmode = \"cmis\"\n"),
            parsed("/a/.fts.toml", "[parser]\nmode = \"default-disjunction\"\n"),
        ];
        let config = merge_configs(&configs);
        assert_eq!(config.parser.mode, Mode::Cmis);
        assert_eq!(config.config_root, Some(PathBuf::from("/a/b")));
    }

    #[test]
    fn test_fields_merge_independently() {
        let configs = [
            parsed("/a/b/.fts.toml", "[parser]\ndefault_field_conjunction = false\n"),
            parsed("/home/.fts.toml", "[parser]\nmode = \"default-disjunction\"\n"),
        ];
        let config = merge_configs(&configs);
        assert_eq!(
            config.parser,
            ParserConfig::new(Mode::DefaultDisjunction, false)
        );
        assert_eq!(config.sources.len(), 2);
    }

    #[test]
    fn test_missing_section_keeps_defaults() {
        let configs = [parsed("/a/.fts.toml", "root = true\n")];
        let config = merge_configs(&configs);
        assert_eq!(config.parser, ParserConfig::default());
    }
}
