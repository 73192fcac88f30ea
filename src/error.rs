/// Error types for the i18n library
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum I18nError {
    /// A locale tag could not be parsed or maximized
    LocaleExpansion(String),
    /// A message bundle could not be read or decoded
    Load(String),
    /// The configuration file is missing or malformed
    Config(String),
    /// A formatting helper received input it cannot interpret
    Format(String),
}

impl std::fmt::Display for I18nError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            I18nError::LocaleExpansion(msg) => write!(f, "Locale expansion error: {}", msg),
            I18nError::Load(msg) => write!(f, "Load error: {}", msg),
            I18nError::Config(msg) => write!(f, "Configuration error: {}", msg),
            I18nError::Format(msg) => write!(f, "Format error: {}", msg),
        }
    }
}

impl std::error::Error for I18nError {}

/// Result type for i18n operations
pub type I18nResult<T> = Result<T, I18nError>;
