//! Config directory resolution.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// File name of the TUI session log.
const LOG_FILE_NAME: &str = "cineview.log";

/// Resolves the config file path.
///
/// - If `dir` is `Some`, returns `{dir}/config.toml`.
/// - Otherwise returns `~/.config/cineview/config.toml`.
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined (when `dir` is `None`).
pub fn resolve_config_path(dir: Option<&PathBuf>) -> Result<PathBuf> {
    if let Some(d) = dir {
        return Ok(d.join("config.toml"));
    }

    let home = std::env::var("HOME").context("HOME environment variable is not set")?;
    Ok(PathBuf::from(home)
        .join(".config")
        .join("cineview")
        .join("config.toml"))
}

/// Log file written while the TUI owns the terminal, next to `config_path`.
#[must_use]
pub fn log_path_for(config_path: &Path) -> PathBuf {
    config_path
        .parent()
        .map_or_else(|| PathBuf::from(LOG_FILE_NAME), |dir| dir.join(LOG_FILE_NAME))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_resolve_with_dir() {
        // Arrange
        let dir = PathBuf::from("/tmp/cineview-test");

        // Act
        let path = resolve_config_path(Some(&dir)).unwrap();

        // Assert
        assert_eq!(path, PathBuf::from("/tmp/cineview-test/config.toml"));
    }

    #[test]
    fn test_resolve_default() {
        // Arrange & Act
        let path = resolve_config_path(None).unwrap();

        // Assert
        assert!(path.ends_with(".config/cineview/config.toml"));
    }

    #[test]
    fn test_log_path_sits_next_to_config() {
        // Arrange
        let config = PathBuf::from("/tmp/cineview-test/config.toml");

        // Act
        let log = log_path_for(&config);

        // Assert
        assert_eq!(log, PathBuf::from("/tmp/cineview-test/cineview.log"));
    }
}
