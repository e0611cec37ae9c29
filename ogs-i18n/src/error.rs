use std::path::Path;

/// Error types for catalog loading, validation and persistence
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum I18nError {
    /// File could not be read or written
    Io { path: String, message: String },
    /// A gettext catalog is malformed
    CatalogSyntax {
        path: String,
        line: usize,
        message: String,
    },
    /// A JSON document (registry, cache, policy) is malformed or has the wrong shape
    Json { path: String, message: String },
    /// A language code contains characters outside the locale-tag alphabet
    InvalidLocale(String),
    /// Invalid configuration data
    Config(String),
}

impl I18nError {
    pub(crate) fn io(path: &Path, err: std::io::Error) -> Self {
        I18nError::Io {
            path: path.display().to_string(),
            message: err.to_string(),
        }
    }

    pub(crate) fn json(path: &Path, message: impl Into<String>) -> Self {
        I18nError::Json {
            path: path.display().to_string(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for I18nError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            I18nError::Io { path, message } => write!(f, "I/O error on '{}': {}", path, message),
            I18nError::CatalogSyntax {
                path,
                line,
                message,
            } => write!(f, "{}:{}: {}", path, line, message),
            I18nError::Json { path, message } => {
                write!(f, "Invalid JSON in '{}': {}", path, message)
            }
            I18nError::InvalidLocale(msg) => write!(f, "Invalid locale: {}", msg),
            I18nError::Config(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for I18nError {}

/// Result type for catalog operations
pub type I18nResult<T> = Result<T, I18nError>;
