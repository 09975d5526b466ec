//! Configuration module for marquee
//!
//! Handles loading and validating settings from YAML files and environment variables.

mod settings;

pub use settings::*;

use anyhow::Result;
use std::path::{Path, PathBuf};

/// Environment variable naming an explicit settings file
pub const SETTINGS_PATH_VAR: &str = "MARQUEE_SETTINGS_PATH";

/// Default locations searched for a settings file, in order
pub fn default_paths() -> Vec<PathBuf> {
    let mut paths = vec![
        PathBuf::from("marquee.yml"),
        PathBuf::from("config/marquee.yml"),
    ];
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("marquee/marquee.yml"));
    }
    paths
}

/// Load settings from an explicit path, the settings env variable, the
/// default locations, or defaults; then apply env overrides and validate.
/// Also returns the file the settings came from, if any.
pub fn load(explicit: Option<&Path>) -> Result<(Settings, Option<PathBuf>)> {
    if let Some(path) = explicit {
        if !path.exists() {
            anyhow::bail!("settings file not found: {}", path.display());
        }
    }

    let env_path = std::env::var(SETTINGS_PATH_VAR)
        .ok()
        .map(PathBuf::from)
        .filter(|p| p.exists());

    let candidate = explicit
        .map(Path::to_path_buf)
        .or(env_path)
        .or_else(|| default_paths().into_iter().find(|p| p.exists()));

    let mut settings = match candidate {
        Some(ref path) => Settings::from_file(path)?,
        None => Settings::default(),
    };

    settings.merge_env();
    settings.validate()?;
    Ok((settings, candidate))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_explicit_path_is_an_error() {
        let err = load(Some(Path::new("/nonexistent/marquee.yml"))).unwrap_err();
        assert!(err.to_string().contains("settings file not found"));
    }

    #[test]
    fn test_default_paths_start_with_working_dir() {
        let paths = default_paths();
        assert_eq!(paths[0], PathBuf::from("marquee.yml"));
        assert!(paths.len() >= 2);
    }
}
