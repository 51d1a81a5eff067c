//! Init command - write an example backfill.toml

use crate::config::init_project_config;
use anyhow::{Context, Result};
use console::style;
use std::path::Path;

/// Run the init command
pub fn run(path: &Path) -> Result<()> {
    if !path.is_dir() {
        anyhow::bail!("Path is not a directory: {}", path.display());
    }

    println!("\n{} Initializing backfill\n", style("🧱").bold());

    let (config_path, created) = init_project_config(path)
        .with_context(|| format!("Failed to write config file in {}", path.display()))?;
    if created {
        println!(
            "{} Created {}",
            style("✓").green(),
            style(config_path.display()).cyan()
        );
    } else {
        println!(
            "{} Already exists: {}",
            style("✓").green(),
            style(config_path.display()).cyan()
        );
    }

    println!("\n{}", style("Next steps:").bold());
    println!("  1. Edit {} to taste", style("backfill.toml").cyan());
    println!("  2. Preview with {}", style("backfill plan").cyan());
    println!("  3. Generate with {}", style("backfill").cyan());

    Ok(())
}
