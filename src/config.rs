//! Configuration file support for dtvis
//!
//! Reads from .dtvis/config.toml

use crate::error::{DtvisError, Result};
use crate::importance::BarOrder;
use crate::paths::TableLayout;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Configuration structure
#[derive(Debug, Deserialize, Serialize, Default, Clone, PartialEq)]
pub struct Config {
    /// Decision-path table settings
    #[serde(default)]
    pub table: TableConfig,

    /// Importance bar chart settings
    #[serde(default)]
    pub bars: BarsConfig,
}

/// Decision-path table configuration
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct TableConfig {
    /// Column naming and the optional rank column
    #[serde(flatten)]
    pub layout: TableLayout,

    /// Sort applied when a table is first shown: "default" (leaf number),
    /// a class index or a class label
    /// Default: "default"
    #[serde(default = "default_sort")]
    pub default_sort: String,
}

fn default_sort() -> String {
    "default".to_string()
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            layout: TableLayout::default(),
            default_sort: default_sort(),
        }
    }
}

/// Bar chart configuration
#[derive(Debug, Deserialize, Serialize, Default, Clone, PartialEq)]
pub struct BarsConfig {
    /// Initial bar order: "rank" or "alphabetical"
    /// Default: "rank"
    #[serde(default)]
    pub default_order: BarOrder,
}

impl Config {
    /// Load config from .dtvis/config.toml
    /// Returns default config if the file doesn't exist or can't be used
    pub fn load() -> Self {
        let Some(path) = Self::find_config_path() else {
            return Self::default();
        };
        match Self::from_path(&path) {
            Ok(config) => config,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "ignoring unusable config");
                Self::default()
            }
        }
    }

    /// Read a specific config file, reporting read and parse failures
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| DtvisError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        let config = toml::from_str(&contents).map_err(|source| DtvisError::ParseConfig {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "config loaded");
        Ok(config)
    }

    /// Find config.toml by walking up directory tree
    fn find_config_path() -> Option<PathBuf> {
        let current_dir = std::env::current_dir().ok()?;
        let mut dir = current_dir.as_path();

        loop {
            let config_path = dir.join(".dtvis").join("config.toml");
            if config_path.exists() {
                return Some(config_path);
            }

            match dir.parent() {
                Some(parent) => dir = parent,
                None => break,
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.table.layout.rank_column);
        assert_eq!(config.table.layout.class_header, "class");
        assert_eq!(config.table.default_sort, "default");
        assert_eq!(config.bars.default_order, BarOrder::Rank);
    }

    #[test]
    fn test_parse_config() {
        let toml = r#"
[table]
rank_column = false
step_header = "node"
class_header = "terminal_node"
default_sort = "virginica"

[bars]
default_order = "alphabetical"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert!(!config.table.layout.rank_column);
        assert_eq!(config.table.layout.rank_header, "rank");
        assert_eq!(config.table.layout.columns(3), ["node 1", "node 2", "terminal_node"]);
        assert_eq!(config.table.default_sort, "virginica");
        assert_eq!(config.bars.default_order, BarOrder::Alphabetical);
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config: Config = toml::from_str("[bars]\n").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_from_path_reports_bad_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[bars]\ndefault_order = \"sideways\"\n").unwrap();
        let err = Config::from_path(&path).unwrap_err();
        assert!(matches!(err, DtvisError::ParseConfig { .. }));
    }
}
