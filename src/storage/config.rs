//! Configuration handling for thmgraph
//!
//! Configuration is read from `thmgraph.toml` (project, found in the
//! current directory or a parent) and `~/.config/thmgraph/config.toml`
//! (global). Project values override global ones; command-line flags
//! override both.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::layout::LayoutKind;

/// Name of the project configuration file
pub const PROJECT_CONFIG_FILE: &str = "thmgraph.toml";

/// Saved course directory when none is configured
pub const DEFAULT_SAVED_DIR: &str = "saved_course_jsons";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse configuration: {0}")]
    Parse(String),
}

/// Contents of one configuration file
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct ConfigFile {
    /// Directory holding saved statement lists
    pub saved_dir: Option<PathBuf>,

    /// Layout used by `thmgraph graph`
    pub layout: Option<LayoutKind>,

    /// Seed for the breadth-first layout jitter
    pub seed: Option<u64>,
}

impl ConfigFile {
    fn read(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;

        toml::from_str(&content)
            .map_err(|e| ConfigError::Parse(e.to_string()))
            .with_context(|| format!("Failed to parse config: {}", path.display()))
    }

    /// Relative saved directories are taken relative to `base`
    fn anchored_at(mut self, base: &Path) -> Self {
        if let Some(dir) = &self.saved_dir {
            if dir.is_relative() {
                self.saved_dir = Some(base.join(dir));
            }
        }
        self
    }

    /// Fills unset values from `fallback`
    fn or(self, fallback: ConfigFile) -> Self {
        Self {
            saved_dir: self.saved_dir.or(fallback.saved_dir),
            layout: self.layout.or(fallback.layout),
            seed: self.seed.or(fallback.seed),
        }
    }
}

/// Effective configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub saved_dir: PathBuf,
    pub layout: LayoutKind,
    pub seed: Option<u64>,
    /// Project configuration file in effect, if any
    pub project_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            saved_dir: PathBuf::from(DEFAULT_SAVED_DIR),
            layout: LayoutKind::default(),
            seed: None,
            project_file: None,
        }
    }
}

impl Config {
    /// Loads configuration from default locations
    pub fn load() -> Result<Self> {
        let global = match Self::global_config_path() {
            Some(path) if path.is_file() => ConfigFile::read(&path)?,
            _ => ConfigFile::default(),
        };

        let project_file = std::env::current_dir()
            .ok()
            .and_then(|dir| Self::find_project_file(&dir));

        Self::resolve(global, project_file)
    }

    /// Combines a global config with an optional project file
    pub fn resolve(global: ConfigFile, project_file: Option<PathBuf>) -> Result<Self> {
        let project = match &project_file {
            Some(path) => {
                let base = path.parent().unwrap_or_else(|| Path::new("."));
                ConfigFile::read(path)?.anchored_at(base)
            }
            None => ConfigFile::default(),
        };

        let merged = project.or(global);
        let defaults = Self::default();

        Ok(Self {
            saved_dir: merged.saved_dir.unwrap_or(defaults.saved_dir),
            layout: merged.layout.unwrap_or(defaults.layout),
            seed: merged.seed,
            project_file,
        })
    }

    /// Returns the global config file path
    pub fn global_config_path() -> Option<PathBuf> {
        ProjectDirs::from("dev", "thmgraph", "thmgraph")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Finds `thmgraph.toml` in `start` or the nearest parent holding one
    pub fn find_project_file(start: &Path) -> Option<PathBuf> {
        let mut current = start.to_path_buf();

        loop {
            let candidate = current.join(PROJECT_CONFIG_FILE);
            if candidate.is_file() {
                return Some(candidate);
            }

            if !current.pop() {
                return None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config() {
        let config = Config::resolve(ConfigFile::default(), None).unwrap();

        assert_eq!(config.saved_dir, PathBuf::from("saved_course_jsons"));
        assert_eq!(config.layout, LayoutKind::Bfs);
        assert_eq!(config.seed, None);
    }

    #[test]
    fn parse_config_file() {
        let toml = r#"
saved_dir = "courses"
layout = "components"
seed = 11
"#;

        let config: ConfigFile = toml::from_str(toml).unwrap();
        assert_eq!(config.saved_dir, Some(PathBuf::from("courses")));
        assert_eq!(config.layout, Some(LayoutKind::Components));
        assert_eq!(config.seed, Some(11));
    }

    #[test]
    fn unknown_layout_fails_to_parse() {
        let result: Result<ConfigFile, _> = toml::from_str("layout = \"radial\"");
        assert!(result.is_err());
    }

    #[test]
    fn project_overrides_global_and_anchors_paths() {
        let dir = TempDir::new().unwrap();
        let project_path = dir.path().join(PROJECT_CONFIG_FILE);
        fs::write(&project_path, "saved_dir = \"notes\"\n").unwrap();

        let global = ConfigFile {
            saved_dir: Some(PathBuf::from("/srv/global")),
            layout: Some(LayoutKind::Components),
            seed: Some(5),
        };

        let config = Config::resolve(global, Some(project_path.clone())).unwrap();

        assert_eq!(config.saved_dir, dir.path().join("notes"));
        assert_eq!(config.layout, LayoutKind::Components);
        assert_eq!(config.seed, Some(5));
        assert_eq!(config.project_file, Some(project_path));
    }

    #[test]
    fn invalid_project_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let project_path = dir.path().join(PROJECT_CONFIG_FILE);
        fs::write(&project_path, "seed = \"many\"\n").unwrap();

        let result = Config::resolve(ConfigFile::default(), Some(project_path));
        assert!(result.is_err());
    }

    #[test]
    fn find_project_file_walks_up() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(PROJECT_CONFIG_FILE), "").unwrap();

        let sub_dir = dir.path().join("sub").join("dir");
        fs::create_dir_all(&sub_dir).unwrap();

        let found = Config::find_project_file(&sub_dir);
        assert_eq!(found, Some(dir.path().join(PROJECT_CONFIG_FILE)));
    }
}
