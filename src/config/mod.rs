//! Configuration module for backfill
//!
//! This module handles:
//! - Project-level configuration (backfill.toml)
//! - User-level configuration (~/.config/backfill/config.toml)
//! - The example config written by `backfill init`

mod file_config;

pub use file_config::{
    init_project_config,
    ConfigError,
    FileConfig,
    EXAMPLE_CONFIG,
    PROJECT_CONFIG_FILE,
};
