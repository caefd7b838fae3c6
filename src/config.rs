// Runtime configuration. Defaults reproduce the classic behaviour: CSV
// files and `plot.png` in the working directory. A JSON file and a few
// environment variables can move them.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::debug;
use serde::{Deserialize, Serialize};

pub const CONFIG_ENV: &str = "GROWTH_CONFIG";
pub const DATA_DIR_ENV: &str = "GROWTH_DATA_DIR";
pub const PLOT_PATH_ENV: &str = "GROWTH_PLOT_PATH";
pub const OVERWRITE_ENV: &str = "GROWTH_OVERWRITE_TABLES";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where the reference CSV files live.
    pub data_dir: PathBuf,
    /// Chart output; `.svg` selects vector output, anything else PNG.
    pub plot_path: PathBuf,
    /// Rewrite the reference tables from the built-in data at startup.
    pub overwrite_tables: bool,
    pub chart_width: u32,
    pub chart_height: u32,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            data_dir: PathBuf::from("."),
            plot_path: PathBuf::from("plot.png"),
            overwrite_tables: false,
            chart_width: 1000,
            chart_height: 600,
        }
    }
}

impl Config {
    /// Load from the process environment: `GROWTH_CONFIG` or the user
    /// config directory for the file, then the `GROWTH_*` overrides.
    pub fn from_env() -> Result<Self> {
        Self::from_sources(|key| std::env::var(key).ok())
    }

    /// Same as `from_env` with a custom variable lookup.
    pub fn from_sources(env: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let explicit = env(CONFIG_ENV).map(PathBuf::from);
        let mut config = match explicit {
            // A file named explicitly has to exist.
            Some(path) => Self::from_file(&path)?,
            None => match default_file() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                _ => Config::default(),
            },
        };

        if let Some(dir) = env(DATA_DIR_ENV) {
            config.data_dir = PathBuf::from(dir);
        }
        if let Some(path) = env(PLOT_PATH_ENV) {
            config.plot_path = PathBuf::from(path);
        }
        if let Some(flag) = env(OVERWRITE_ENV) {
            config.overwrite_tables = matches!(flag.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes");
        }
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = serde_json::from_str(&data)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        debug!("loaded config from {}", path.display());
        Ok(config)
    }
}

/// `<config dir>/growth-standards/config.json`, if the platform has one.
fn default_file() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("growth-standards").join("config.json"))
}
