//! Configuration module for csql.
//!
//! Handles loading configuration from:
//! - Default values
//! - Config file (~/.config/csql/config.toml)
//! - Command-line arguments

mod schema;

pub use schema::{Config, DisplayConfig};

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use csql_syntax::{themes, Theme};

/// Returns the config directory path.
///
/// Checks `CSQL_CONFIG_DIR` environment variable first, then falls back
/// to the system default (~/.config/csql on Linux/macOS).
pub fn config_dir() -> Option<PathBuf> {
    if let Ok(dir) = std::env::var("CSQL_CONFIG_DIR") {
        return Some(PathBuf::from(dir));
    }
    dirs::config_dir().map(|p| p.join("csql"))
}

/// Returns the default config file path (~/.config/csql/config.toml)
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|p| p.join("config.toml"))
}

/// Load configuration from the default path or return defaults
pub fn load_config() -> Result<Config> {
    match config_path() {
        Some(path) if path.exists() => load_config_from(&path),
        _ => Ok(Config::default()),
    }
}

/// Load configuration from a specific path
pub fn load_config_from(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
    config
        .classifier
        .validate()
        .with_context(|| format!("Invalid [classifier] section in {}", path.display()))?;
    Ok(config)
}

/// Resolves the theme named by the display settings.
///
/// A theme file wins over the theme name. An unknown name falls back to the
/// default theme with a warning.
pub fn resolve_theme(display: &DisplayConfig) -> Result<Theme> {
    if let Some(path) = &display.theme_file {
        return Theme::from_file(path)
            .with_context(|| format!("Failed to load theme file: {}", path.display()));
    }
    let name = display.theme.as_str();
    Ok(themes::by_name(name).unwrap_or_else(|| {
        tracing::warn!(theme = name, "unknown theme, using default");
        themes::visual_studio()
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.display.theme, "default");
        assert_eq!(config.classifier.filler, '_');
    }

    #[test]
    fn test_config_paths() {
        if let (Some(dir), Some(cfg)) = (config_dir(), config_path()) {
            assert!(cfg.starts_with(&dir));
            assert!(cfg.ends_with("config.toml"));
        }
    }

    #[test]
    fn test_parse_empty_config() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_parse_partial_config() {
        let toml = r#"
[display]
theme = "one_dark"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.display.theme, "one_dark");
        assert!(config.display.color);
        assert_eq!(config.classifier, Default::default());
    }

    #[test]
    fn test_load_config_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[classifier]\nemit_plain = true\n").unwrap();

        let config = load_config_from(&path).unwrap();
        assert!(config.classifier.emit_plain);
    }

    #[test]
    fn test_load_config_rejects_invalid_classifier() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[classifier]\nstart_keywords = []\n").unwrap();

        let err = load_config_from(&path).unwrap_err();
        assert!(err.to_string().contains("Invalid [classifier]"));
    }

    #[test]
    fn test_resolve_theme() {
        let mut display = DisplayConfig::default();
        assert_eq!(resolve_theme(&display).unwrap().name, "visual_studio");

        display.theme = "no_such_theme".to_string();
        assert_eq!(resolve_theme(&display).unwrap().name, "visual_studio");

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("midnight.toml");
        std::fs::write(&path, "keyword = \"#112233\"").unwrap();
        display.theme_file = Some(path);
        assert_eq!(resolve_theme(&display).unwrap().name, "midnight");
    }
}
