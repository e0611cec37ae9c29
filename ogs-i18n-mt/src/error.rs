use ogs_i18n::I18nError;

/// Error types for the machine translation phase and the audit pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MtError {
    /// Missing or rejected credentials, bad configuration
    ConfigError(String),
    /// Transport failure talking to a provider
    NetworkError(String),
    /// Provider answered with an error or an unusable response
    TranslationError(String),
    /// Provider does not translate into this language
    UnsupportedLanguage(String),
    /// Catalog, cache or marker file problem
    Catalog(I18nError),
    /// Languages whose catalogs contain vandalized strings, with counts
    Vandalized(Vec<(String, usize)>),
}

impl std::fmt::Display for MtError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MtError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            MtError::NetworkError(msg) => write!(f, "Network error: {}", msg),
            MtError::TranslationError(msg) => write!(f, "Translation error: {}", msg),
            MtError::UnsupportedLanguage(lang) => write!(f, "Unsupported language: {}", lang),
            MtError::Catalog(err) => write!(f, "{}", err),
            MtError::Vandalized(languages) => write!(
                f,
                "Critical error: {} languages have been vandalized",
                languages.len()
            ),
        }
    }
}

impl std::error::Error for MtError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MtError::Catalog(err) => Some(err),
            _ => None,
        }
    }
}

impl From<I18nError> for MtError {
    fn from(err: I18nError) -> Self {
        MtError::Catalog(err)
    }
}

/// Request URLs are stripped: they may carry credentials
impl From<reqwest::Error> for MtError {
    fn from(err: reqwest::Error) -> Self {
        MtError::NetworkError(err.without_url().to_string())
    }
}

/// Result type for MT operations
pub type MtResult<T> = Result<T, MtError>;
