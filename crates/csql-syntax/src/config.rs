//! Classifier configuration.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::splice::DEFAULT_START_KEYWORDS;

/// Error in a classifier configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("filler must be a single ASCII character, got {0:?}")]
    InvalidFiller(char),
    #[error("start keyword list is empty")]
    NoStartKeywords,
    #[error("invalid start keyword {0:?}")]
    InvalidStartKeyword(String),
    #[error("parse error: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Which SQL parser backend classifies literal contents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ParserBackend {
    /// Native T-SQL tokenizer and parser
    #[default]
    Tsql,
    /// tree-sitter-sequel grammar
    TreeSitter,
}

/// Settings for [`SqlClassifier`](crate::SqlClassifier).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Words a literal must start with to be treated as SQL (case-sensitive)
    pub start_keywords: Vec<String>,
    /// Character written over interpolation holes before parsing
    pub filler: char,
    /// Parser backend
    pub backend: ParserBackend,
    /// Also emit spans for uncategorized text
    pub emit_plain: bool,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            start_keywords: DEFAULT_START_KEYWORDS
                .iter()
                .map(|k| k.to_string())
                .collect(),
            filler: '_',
            backend: ParserBackend::default(),
            emit_plain: false,
        }
    }
}

impl ClassifierConfig {
    /// Parses and validates a configuration from TOML.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the invariants the classifier relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.filler.is_ascii() || self.filler.is_ascii_control() {
            return Err(ConfigError::InvalidFiller(self.filler));
        }
        if self.start_keywords.is_empty() {
            return Err(ConfigError::NoStartKeywords);
        }
        if let Some(bad) = self
            .start_keywords
            .iter()
            .find(|k| k.is_empty() || k.chars().any(char::is_whitespace))
        {
            return Err(ConfigError::InvalidStartKeyword(bad.clone()));
        }
        Ok(())
    }

    /// The filler as a byte. Only meaningful after [`validate`](Self::validate).
    pub fn filler_byte(&self) -> u8 {
        if self.filler.is_ascii() {
            self.filler as u8
        } else {
            b'_'
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ClassifierConfig::default();
        assert_eq!(config.filler, '_');
        assert_eq!(config.backend, ParserBackend::Tsql);
        assert!(!config.emit_plain);
        assert!(config.start_keywords.iter().any(|k| k == "SELECT"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_empty_config() {
        let config = ClassifierConfig::from_toml("").unwrap();
        assert_eq!(config, ClassifierConfig::default());
    }

    #[test]
    fn test_parse_partial_config() {
        let config = ClassifierConfig::from_toml(
            r#"
backend = "tree-sitter"
start_keywords = ["SELECT", "WITH"]
"#,
        )
        .unwrap();
        assert_eq!(config.backend, ParserBackend::TreeSitter);
        assert_eq!(config.start_keywords, vec!["SELECT", "WITH"]);
        assert_eq!(config.filler, '_');
    }

    #[test]
    fn test_rejects_bad_filler() {
        let err = ClassifierConfig::from_toml("filler = \"\u{e9}\"").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidFiller('\u{e9}')));
    }

    #[test]
    fn test_rejects_empty_keywords() {
        let err = ClassifierConfig::from_toml("start_keywords = []").unwrap_err();
        assert!(matches!(err, ConfigError::NoStartKeywords));

        let err = ClassifierConfig::from_toml("start_keywords = [\"SELECT \"]").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidStartKeyword(_)));
    }

    #[test]
    fn test_unknown_backend_is_parse_error() {
        let err = ClassifierConfig::from_toml("backend = \"oracle\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
