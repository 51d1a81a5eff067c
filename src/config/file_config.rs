//! Parameter values from TOML config files
//!
//! Supports loading config from:
//! - `./backfill.toml` (or an explicit `--config` path)
//! - `~/.config/backfill/config.toml`
//!
//! Keys are the parameter names at top level, e.g.
//!
//! ```toml
//! from_date = 2023-01-01
//! to_date = "2023-12-31"
//! min_per_day = 1
//! include_weekends = false
//! ```

use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Project config file name, looked up in the working directory.
pub const PROJECT_CONFIG_FILE: &str = "backfill.toml";

/// Failures reading a config file that was found or explicitly requested.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("config file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid TOML in {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Raw parameter values merged from every config file found.
#[derive(Debug, Clone, Default)]
pub struct FileConfig {
    values: toml::Table,
    sources: Vec<PathBuf>,
}

impl FileConfig {
    /// Load config from all sources, with priority:
    /// 1. Project config (`explicit` path, else `./backfill.toml`) (highest)
    /// 2. User config (`~/.config/backfill/config.toml`)
    ///
    /// An explicit path must exist; the default locations are optional.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = FileConfig::default();

        if let Some(user_path) = Self::user_config_path().filter(|p| p.exists()) {
            config.merge(Self::load_file(&user_path)?);
        }

        match explicit {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigError::NotFound(path.to_path_buf()));
                }
                config.merge(Self::load_file(path)?);
            }
            None => {
                let project_path = PathBuf::from(PROJECT_CONFIG_FILE);
                if project_path.exists() {
                    config.merge(Self::load_file(&project_path)?);
                }
            }
        }

        Ok(config)
    }

    /// Parse a single config file.
    pub fn load_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let values = toml::from_str::<toml::Table>(&content).map_err(|source| {
            ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            }
        })?;
        debug!("Loaded config from {}", path.display());
        Ok(Self {
            values,
            sources: vec![path.to_path_buf()],
        })
    }

    /// Get the user config file path
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("backfill").join("config.toml"))
    }

    /// Merge another config into this one (other takes priority)
    pub fn merge(&mut self, other: FileConfig) {
        self.values.extend(other.values);
        self.sources.extend(other.sources);
    }

    /// Files the values came from, lowest priority first.
    pub fn sources(&self) -> &[PathBuf] {
        &self.sources
    }

    /// The value for `key` as the text a user would type on the command line.
    pub fn get_raw(&self, key: &str) -> Option<String> {
        self.values.get(key).map(|value| match value {
            toml::Value::String(s) => s.clone(),
            toml::Value::Integer(i) => i.to_string(),
            toml::Value::Boolean(b) => b.to_string(),
            toml::Value::Datetime(dt) => dt.to_string(),
            other => other.to_string(),
        })
    }

    /// Keys present in the files that are not in `known`.
    pub fn unknown_keys<'a>(&'a self, known: &[&str]) -> Vec<&'a str> {
        self.values
            .keys()
            .map(String::as_str)
            .filter(|key| !known.contains(key))
            .collect()
    }
}

impl std::str::FromStr for FileConfig {
    type Err = toml::de::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self {
            values: toml::from_str(s)?,
            sources: Vec::new(),
        })
    }
}

/// Example project config written by `backfill init`.
pub const EXAMPLE_CONFIG: &str = r#"# backfill configuration
#
# Every key can also be passed on the command line (e.g. --from-date).
# Keys missing here are prompted for interactively.

# Repository to create
name = "bathroom_tiles"
directory = "./bathroom_tiles"

# Commit identity (defaults to user.name / user.email from git config)
# username = "Ada Lovelace"
# email = "ada@example.com"

# Date range, ISO-8601, inclusive
from_date = 2024-01-01
to_date = 2024-06-30

# Active days per week
min_days_per_week = 2
max_days_per_week = 5
include_weekends = false

# Commits per active day
min_per_day = 1
max_per_day = 6
include_out_of_hours = false
"#;

/// Write [`EXAMPLE_CONFIG`] into `dir` unless a config file already exists.
///
/// Returns the path and whether it was newly created.
pub fn init_project_config(dir: &Path) -> std::io::Result<(PathBuf, bool)> {
    let path = dir.join(PROJECT_CONFIG_FILE);
    if path.exists() {
        return Ok((path, false));
    }
    std::fs::write(&path, EXAMPLE_CONFIG)?;
    Ok((path, true))
}
