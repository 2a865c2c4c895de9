//! Configuration loading and discovery for `pixeldiff.toml`
//!
//! Provides functions to find, load, and merge configuration.

use super::schema::PixeldiffConfig;
use crate::tile::TileSize;
use image::Rgba;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name looked up during discovery
pub const CONFIG_FILE_NAME: &str = "pixeldiff.toml";

/// Configuration loading error
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// File I/O error
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error
    #[error("Failed to parse pixeldiff.toml: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error
    #[error("Config validation failed:\n{}", .0.iter().map(|e| format!("  - {}", e)).collect::<Vec<_>>().join("\n"))]
    Validation(Vec<String>),
}

/// CLI arguments that can override config values
#[derive(Debug, Default, Clone, PartialEq)]
pub struct CliOverrides {
    pub threshold: Option<f64>,
    pub alpha: Option<f64>,
    pub include_aa: Option<bool>,
    pub diff_mask: Option<bool>,
    pub aa_color: Option<Rgba<u8>>,
    pub diff_color: Option<Rgba<u8>>,
    pub tile_size: Option<TileSize>,
    /// Number of worker threads
    pub jobs: Option<usize>,
}

/// Find pixeldiff.toml by walking up from the current working directory.
///
/// Search order:
/// 1. Walk up from current directory looking for pixeldiff.toml
/// 2. Check XDG_CONFIG_HOME/pixeldiff/pixeldiff.toml (or ~/.config/pixeldiff/pixeldiff.toml)
pub fn find_config() -> Option<PathBuf> {
    if let Ok(cwd) = env::current_dir() {
        if let Some(path) = find_config_from(cwd) {
            return Some(path);
        }
    }

    find_xdg_config()
}

/// Find pixeldiff.toml in the XDG config directory.
pub fn find_xdg_config() -> Option<PathBuf> {
    let xdg_config = env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|_| env::var("HOME").map(|h| PathBuf::from(h).join(".config")))
        .ok()?;

    let config_path = xdg_config.join("pixeldiff").join(CONFIG_FILE_NAME);
    config_path.exists().then_some(config_path)
}

/// Find pixeldiff.toml by walking up from a specific directory.
pub fn find_config_from(start: PathBuf) -> Option<PathBuf> {
    let mut current = start;

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            return None;
        }
    }
}

/// Load configuration from a pixeldiff.toml file.
///
/// If a path is provided, loads from that file. Otherwise, uses
/// [`find_config`] to locate one. If no config file is found, returns the
/// default configuration.
///
/// # Example
/// ```ignore
/// let config = load_config(None)?;
/// let options = config.to_options()?;
/// ```
pub fn load_config(path: Option<&Path>) -> Result<PixeldiffConfig, ConfigError> {
    let config_path = match path {
        Some(p) => Some(p.to_path_buf()),
        None => find_config(),
    };

    match config_path {
        Some(p) => {
            tracing::debug!(path = %p.display(), "loading config");
            load_config_file(&p)
        }
        None => Ok(default_config()),
    }
}

fn load_config_file(path: &Path) -> Result<PixeldiffConfig, ConfigError> {
    let contents = fs::read_to_string(path)?;
    let config: PixeldiffConfig = toml::from_str(&contents)?;

    let errors = config.validate();
    if !errors.is_empty() {
        return Err(ConfigError::Validation(errors.into_iter().map(|e| e.to_string()).collect()));
    }

    Ok(config)
}

/// Configuration used when no pixeldiff.toml is found.
pub fn default_config() -> PixeldiffConfig {
    PixeldiffConfig::default()
}

/// Merge CLI overrides into a configuration.
///
/// CLI arguments take precedence over config file values.
///
/// # Example
/// ```ignore
/// let mut config = load_config(None)?;
/// let overrides = CliOverrides { threshold: Some(0.05), ..Default::default() };
/// merge_cli_overrides(&mut config, &overrides);
/// ```
pub fn merge_cli_overrides(config: &mut PixeldiffConfig, overrides: &CliOverrides) {
    let diff = &mut config.diff;

    if let Some(threshold) = overrides.threshold {
        diff.threshold = threshold;
    }
    if let Some(alpha) = overrides.alpha {
        diff.alpha = alpha;
    }
    if let Some(include_aa) = overrides.include_aa {
        diff.include_aa = include_aa;
    }
    if let Some(diff_mask) = overrides.diff_mask {
        diff.diff_mask = diff_mask;
    }
    if let Some(color) = overrides.aa_color {
        diff.aa_color = crate::color::format_color(color);
    }
    if let Some(color) = overrides.diff_color {
        diff.diff_color = crate::color::format_color(color);
    }
    if let Some(size) = overrides.tile_size {
        diff.tile_size = [size.width, size.height];
    }
    if let Some(jobs) = overrides.jobs {
        config.run.jobs = Some(jobs);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_config(dir: &Path, content: &str) -> PathBuf {
        let config_path = dir.join(CONFIG_FILE_NAME);
        File::create(&config_path)
            .expect("should create config file")
            .write_all(content.as_bytes())
            .expect("should write config content");
        config_path
    }

    #[test]
    fn test_find_config_from_current_dir() {
        let temp = TempDir::new().expect("should create temp dir");
        let config_path = write_config(temp.path(), "");

        let found = find_config_from(temp.path().to_path_buf());
        assert_eq!(found, Some(config_path));
    }

    #[test]
    fn test_find_config_from_nested_dir() {
        let temp = TempDir::new().expect("should create temp dir");
        let config_path = write_config(temp.path(), "");
        let nested = temp.path().join("a").join("b");
        fs::create_dir_all(&nested).expect("should create nested dirs");

        let found = find_config_from(nested);
        assert_eq!(found, Some(config_path));
    }

    #[test]
    fn test_find_config_from_none() {
        let temp = TempDir::new().expect("should create temp dir");
        assert!(find_config_from(temp.path().to_path_buf()).is_none());
    }

    #[test]
    fn test_load_config_valid() {
        let temp = TempDir::new().expect("should create temp dir");
        let config_path = write_config(
            temp.path(),
            r#"
[diff]
threshold = 0.2
diff_mask = true

[run]
jobs = 3
"#,
        );

        let config = load_config(Some(&config_path)).expect("should load valid config");
        assert_eq!(config.diff.threshold, 0.2);
        assert!(config.diff.diff_mask);
        assert_eq!(config.run.jobs, Some(3));
        assert_eq!(config.diff.alpha, 0.1);
    }

    #[test]
    fn test_load_config_missing_file() {
        let temp = TempDir::new().expect("should create temp dir");
        let result = load_config(Some(&temp.path().join("nonexistent.toml")));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_load_config_invalid_toml() {
        let temp = TempDir::new().expect("should create temp dir");
        let config_path = write_config(temp.path(), "this is not valid toml {{{");

        let result = load_config(Some(&config_path));
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_config_validation_error() {
        let temp = TempDir::new().expect("should create temp dir");
        let config_path = write_config(temp.path(), "[diff]\nthreshold = 2.0\n");

        match load_config(Some(&config_path)) {
            Err(ConfigError::Validation(errors)) => {
                assert_eq!(errors, vec!["pixeldiff.toml: 'diff.threshold' must be between 0 and 1"]);
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_merge_cli_overrides() {
        let mut config = default_config();
        let overrides = CliOverrides {
            threshold: Some(0.3),
            include_aa: Some(true),
            diff_color: Some(Rgba([0, 0, 255, 255])),
            tile_size: Some(TileSize::new(64, 32)),
            jobs: Some(8),
            ..Default::default()
        };
        merge_cli_overrides(&mut config, &overrides);

        assert_eq!(config.diff.threshold, 0.3);
        assert!(config.diff.include_aa);
        assert_eq!(config.diff.diff_color, "#0000FF");
        assert_eq!(config.diff.tile_size, [64, 32]);
        assert_eq!(config.run.jobs, Some(8));
        // untouched fields keep file values
        assert_eq!(config.diff.alpha, 0.1);
        assert_eq!(config.diff.aa_color, "#FFFF00");
    }

    #[test]
    fn test_merge_empty_overrides_is_noop() {
        let mut config = default_config();
        merge_cli_overrides(&mut config, &CliOverrides::default());
        assert_eq!(config, default_config());
    }
}
