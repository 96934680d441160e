use std::env;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Overrides the `~/.claude` location when set
pub const CLAUDE_CONFIG_DIR_ENV: &str = "CLAUDE_CONFIG_DIR";

/// Get the Claude directory path (`$CLAUDE_CONFIG_DIR`, else `~/.claude`)
pub fn get_claude_dir() -> Result<PathBuf> {
    resolve_claude_dir(env::var_os(CLAUDE_CONFIG_DIR_ENV).map(PathBuf::from), dirs::home_dir())
}

/// Get the directory holding one subdirectory per project
pub fn get_projects_dir() -> Result<PathBuf> {
    Ok(projects_dir_in(&get_claude_dir()?))
}

pub fn projects_dir_in(claude_dir: &Path) -> PathBuf {
    claude_dir.join("projects")
}

fn resolve_claude_dir(override_dir: Option<PathBuf>, home: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(dir) = override_dir.filter(|d| !d.as_os_str().is_empty()) {
        return Ok(dir);
    }
    let home = home.context("Home directory could not be determined")?;
    Ok(home.join(".claude"))
}
