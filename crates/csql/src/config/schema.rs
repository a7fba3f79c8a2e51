//! Configuration schema definitions.

use std::path::PathBuf;

use csql_syntax::ClassifierConfig;
use serde::{Deserialize, Serialize};

/// Root configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// How literals are recognized and parsed
    pub classifier: ClassifierConfig,
    /// Output settings
    pub display: DisplayConfig,
}

/// Display-related settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Built-in theme name
    pub theme: String,
    /// Theme file to load instead of the built-in theme
    pub theme_file: Option<PathBuf>,
    /// Emit ANSI colors
    pub color: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            theme: "default".to_string(),
            theme_file: None,
            color: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use csql_syntax::ParserBackend;

    #[test]
    fn test_full_config_parse() {
        let toml = r#"
[classifier]
start_keywords = ["SELECT", "EXEC"]
filler = "x"
backend = "tree-sitter"
emit_plain = true

[display]
theme = "one_dark"
theme_file = "/tmp/midnight.toml"
color = false
"#;

        let config: Config = toml::from_str(toml).unwrap();

        assert_eq!(config.classifier.start_keywords, vec!["SELECT", "EXEC"]);
        assert_eq!(config.classifier.filler, 'x');
        assert_eq!(config.classifier.backend, ParserBackend::TreeSitter);
        assert!(config.classifier.emit_plain);

        assert_eq!(config.display.theme, "one_dark");
        assert_eq!(
            config.display.theme_file,
            Some(PathBuf::from("/tmp/midnight.toml"))
        );
        assert!(!config.display.color);
    }

    #[test]
    fn test_serialize_config() {
        let config = Config::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("[classifier]"));
        assert!(toml_str.contains("[display]"));
    }
}
