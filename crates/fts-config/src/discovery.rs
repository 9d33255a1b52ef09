//! Configuration file discovery.
//!
//! Walks up from the working directory collecting `.fts.toml` files until one
//! declares `root = true`, then falls back to `~/.fts.toml`.

use std::path::{Path, PathBuf};

use directories::BaseDirs;

use crate::{ConfigError, parse::is_root_config};

/// The configuration filename.
pub const CONFIG_FILENAME: &str = ".fts.toml";

/// Discovers all configuration files relevant to the given directory.
///
/// Returns paths in precedence order: closest to `cwd` first, global
/// (`~/.fts.toml`) last. The global file is skipped when a `root = true` file
/// was found on the way up.
pub fn discover_config_files(cwd: &Path) -> Vec<PathBuf> {
    let mut configs = Vec::new();

    for dir in cwd.ancestors() {
        let config_path = dir.join(CONFIG_FILENAME);
        if !config_path.is_file() {
            continue;
        }
        let is_root = is_root_config(&config_path);
        configs.push(config_path);
        if is_root {
            return configs;
        }
    }

    if let Some(global_path) = global_config_path()
        && global_path.is_file()
        && !configs.contains(&global_path)
    {
        configs.push(global_path);
    }

    configs
}

/// Returns the path to the global configuration file (`~/.fts.toml`).
///
/// Returns `None` if the home directory cannot be determined.
pub fn global_config_path() -> Option<PathBuf> {
    BaseDirs::new().map(|dirs| dirs.home_dir().join(CONFIG_FILENAME))
}

/// Like [`global_config_path`], but fails when there is no home directory.
pub fn require_global_config_path() -> Result<PathBuf, ConfigError> {
    global_config_path().ok_or(ConfigError::NoHomeDirectory)
}

/// Checks if a path is the global configuration file.
pub fn is_global_config(path: &Path) -> bool {
    global_config_path().is_some_and(|global| path == global)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::test_support::TestDir;

    fn local(configs: &[PathBuf]) -> Vec<&PathBuf> {
        configs.iter().filter(|p| !is_global_config(p)).collect()
    }

    #[test]
    fn test_discover_no_configs() {
        let test_dir = TestDir::new();
        let subdir = test_dir.create_dir("a/b/c");

        let configs = discover_config_files(&subdir);

        assert!(local(&configs).is_empty());
    }

    #[test]
    fn test_discover_precedence_order() {
        let test_dir = TestDir::new();
        let top = test_dir.create_config_at_root();
        let mid = test_dir.create_config("a/b");
        let leaf = test_dir.create_config("a/b/c/d");
        let working_dir = test_dir.create_dir("a/b/c/d/e");

        let configs = discover_config_files(&working_dir);

        assert_eq!(local(&configs), vec![&leaf, &mid, &top]);
    }

    #[test]
    fn test_discover_from_directory_with_config() {
        let test_dir = TestDir::new();
        let config = test_dir.create_config_at_root();

        let configs = discover_config_files(test_dir.path());

        assert_eq!(local(&configs), vec![&config]);
    }

    #[test]
    fn test_global_config_path() {
        let path = require_global_config_path().unwrap();
        assert!(path.ends_with(CONFIG_FILENAME));
        assert!(is_global_config(&path));
        assert!(!is_global_config(Path::new("/some/other/path/.fts.toml")));
    }

    #[test]
    fn test_discover_skips_non_file_config() {
        let test_dir = TestDir::new();
        fs::create_dir_all(test_dir.path().join(CONFIG_FILENAME)).unwrap();
        let subdir = test_dir.create_dir("subdir");

        let configs = discover_config_files(&subdir);

        assert!(local(&configs).is_empty());
    }

    #[test]
    fn test_root_config_stops_discovery() {
        let test_dir = TestDir::new();
        let _parent_config = test_dir.create_config_at_root();
        let root_config = test_dir.create_root_config("project");
        let child_config = test_dir.create_config("project/sub");
        let working_dir = test_dir.create_dir("project/sub/deep");

        let configs = discover_config_files(&working_dir);

        // Parent and global configs are both excluded
        assert_eq!(configs, vec![child_config, root_config]);
    }

    #[test]
    fn test_root_false_does_not_stop_discovery() {
        let test_dir = TestDir::new();
        let parent_config = test_dir.create_config_at_root();
        let mid_config = test_dir.create_config_with_content(
            "project",
            "root = false\n[parser]\nmode = \"cmis\"\n",
        );
        let working_dir = test_dir.create_dir("project/src");

        let configs = discover_config_files(&working_dir);

        assert_eq!(local(&configs), vec![&mid_config, &parent_config]);
    }

    #[test]
    fn test_unparseable_config_is_not_root() {
        let test_dir = TestDir::new();
        let parent_config = test_dir.create_config_at_root();
        let broken = test_dir.create_config_with_content("project", "root = [\n");
        let working_dir = test_dir.create_dir("project");

        let configs = discover_config_files(&working_dir);

        assert_eq!(local(&configs), vec![&broken, &parent_config]);
    }
}
