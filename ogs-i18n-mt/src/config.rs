//! Run configuration: provider credentials and result policy
//!
//! Credentials are read from `keys.json`:
//!
//! ```json
//! {
//!     "deepl_api_key": "xxxxxxxx-xxxx-xxxx-xxxx-xxxxxxxxxxxx:fx",
//!     "google_api_key": "AIza..."
//! }
//! ```
//!
//! `DEEPL_API_KEY` and `GOOGLE_TRANSLATE_API_KEY` override the file. The
//! translation phase needs both providers; with either key missing it is
//! skipped and the audit still runs.

use crate::deepl::DEEPL_API_KEY_ENV;
use crate::error::{MtError, MtResult};
use crate::google_translate::GOOGLE_API_KEY_ENV;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Which provider's output is kept when more than one translates a string
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum ProviderPreference {
    /// Later providers overwrite earlier results (Google over DeepL)
    #[default]
    #[value(name = "last")]
    PreferLast,
    /// The first provider that supports a language wins; later ones are not asked
    #[value(name = "first")]
    PreferFirst,
}

#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ProviderKeys {
    #[serde(default)]
    pub deepl_api_key: Option<String>,
    #[serde(default)]
    pub google_api_key: Option<String>,
}

impl ProviderKeys {
    pub fn from_json_str(content: &str) -> MtResult<Self> {
        serde_json::from_str(content)
            .map_err(|e| MtError::ConfigError(format!("Invalid keys file: {}", e)))
    }

    /// Read `path` if it exists, then apply environment overrides
    pub fn load(path: &Path) -> MtResult<Self> {
        let mut keys = if path.exists() {
            let content = fs::read_to_string(path).map_err(|e| {
                MtError::ConfigError(format!("Failed to read '{}': {}", path.display(), e))
            })?;
            Self::from_json_str(&content)?
        } else {
            Self::default()
        };
        keys.apply_overrides(
            std::env::var(DEEPL_API_KEY_ENV).ok(),
            std::env::var(GOOGLE_API_KEY_ENV).ok(),
        );
        Ok(keys)
    }

    fn apply_overrides(&mut self, deepl: Option<String>, google: Option<String>) {
        if let Some(key) = deepl.filter(|k| !k.trim().is_empty()) {
            self.deepl_api_key = Some(key);
        }
        if let Some(key) = google.filter(|k| !k.trim().is_empty()) {
            self.google_api_key = Some(key);
        }
    }

    fn present(key: &Option<String>) -> Option<&str> {
        key.as_deref().filter(|k| !k.trim().is_empty())
    }

    /// Both keys, when both are configured
    pub fn complete(&self) -> Option<(&str, &str)> {
        Some((
            Self::present(&self.deepl_api_key)?,
            Self::present(&self.google_api_key)?,
        ))
    }
}

impl std::fmt::Debug for ProviderKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mask = |key: &Option<String>| key.as_ref().map(|_| "***");
        f.debug_struct("ProviderKeys")
            .field("deepl_api_key", &mask(&self.deepl_api_key))
            .field("google_api_key", &mask(&self.google_api_key))
            .finish()
    }
}
