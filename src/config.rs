use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{I18nError, I18nResult};
use crate::fallbacks::DEFAULT_FALLBACK_KEY;

/// Settings for an [`I18n`](crate::I18n) instance.
///
/// Every field has a default, so a configuration file only needs the keys it
/// changes:
///
/// ```json
/// {
///     "language": "en",
///     "supported_languages": ["en", "zh-CN", "zh-TW"],
///     "fallback_languages": {
///         "zh": ["zh-CN", "en"],
///         "default": ["en"]
///     },
///     "default_variables": { "APP_NAME": "Trellis" }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct I18nConfig {
    /// Active language before any change is requested.
    pub language: String,
    /// Locales offered to the resolver, in priority order. When empty, the
    /// locales of the registered bundles are used in registration order.
    pub supported_languages: Vec<String>,
    /// Fallback chains per locale, plus the `default` chain.
    pub fallback_languages: HashMap<String, Vec<String>>,
    /// Scalars available to every message.
    pub default_variables: HashMap<String, String>,
}

impl Default for I18nConfig {
    fn default() -> Self {
        let chain = |locales: &[&str]| locales.iter().map(|l| l.to_string()).collect::<Vec<_>>();
        I18nConfig {
            language: "en".to_string(),
            supported_languages: Vec::new(),
            fallback_languages: HashMap::from([
                ("zh".to_string(), chain(&["zh-CN", "en"])),
                ("zh-SG".to_string(), chain(&["zh-CN", "en"])),
                (DEFAULT_FALLBACK_KEY.to_string(), chain(&["en"])),
            ]),
            default_variables: HashMap::new(),
        }
    }
}

impl I18nConfig {
    pub fn from_json(json: &str) -> I18nResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| I18nError::Config(format!("Failed to parse configuration: {}", e)))
    }

    pub fn from_file(path: &Path) -> I18nResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            I18nError::Config(format!("Failed to read file '{}': {}", path.display(), e))
        })?;
        serde_json::from_str(&content).map_err(|e| {
            I18nError::Config(format!(
                "Failed to parse configuration from '{}': {}",
                path.display(),
                e
            ))
        })
    }

    /// The language used when a requested locale cannot be served: the head
    /// of the `default` chain, or the initial language.
    pub fn fallback_language(&self) -> &str {
        self.fallback_languages
            .get(DEFAULT_FALLBACK_KEY)
            .and_then(|chain| chain.first())
            .unwrap_or(&self.language)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = I18nConfig::default();
        assert_eq!(config.language, "en");
        assert!(config.supported_languages.is_empty());
        assert_eq!(config.fallback_language(), "en");
        assert_eq!(
            config.fallback_languages.get("zh-SG"),
            Some(&vec!["zh-CN".to_string(), "en".to_string()])
        );
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = I18nConfig::from_json(
            r#"{ "language": "fr", "default_variables": { "APP_NAME": "Trellis" } }"#,
        )
        .unwrap();
        assert_eq!(config.language, "fr");
        assert_eq!(config.default_variables.get("APP_NAME").map(String::as_str), Some("Trellis"));
        assert_eq!(config.fallback_language(), "en");
    }

    #[test]
    fn test_fallback_language_without_default_chain() {
        let config = I18nConfig::from_json(
            r#"{ "language": "de", "fallback_languages": { "fr": ["en"] } }"#,
        )
        .unwrap();
        assert_eq!(config.fallback_language(), "de");
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            I18nConfig::from_json("{ language: en }"),
            Err(I18nError::Config(_))
        ));
        assert!(matches!(
            I18nConfig::from_file(Path::new("/nonexistent/trellis.json")),
            Err(I18nError::Config(_))
        ));
    }
}
