//! Persistent cache of machine translations
//!
//! Shape on disk (`autotranslations.json`):
//!
//! ```json
//! {
//!     "pt-BR": {
//!         "You have {{num}} new messages": "Você tem {{num}} novas mensagens"
//!     }
//! }
//! ```
//!
//! Every value was produced by a successful provider call. The cache is what
//! lets a re-run with an unchanged catalog issue no provider calls at all.

use crate::error::{I18nError, I18nResult};
use crate::locale::LanguageCode;
use crate::persist::{write_atomic, write_json_pretty};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TranslationCache {
    languages: BTreeMap<String, BTreeMap<String, String>>,
}

impl TranslationCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json_str(content: &str, origin: &Path) -> I18nResult<Self> {
        serde_json::from_str(content).map_err(|e| I18nError::json(origin, e.to_string()))
    }

    /// Load the cache, creating an empty `{}` file first if none exists
    pub fn load_or_init(path: &Path) -> I18nResult<Self> {
        if !path.exists() {
            write_atomic(path, b"{}")?;
            return Ok(Self::new());
        }
        let content = fs::read_to_string(path).map_err(|e| I18nError::io(path, e))?;
        Self::from_json_str(&content, path)
    }

    /// Rewrite the whole cache file
    pub fn save(&self, path: &Path) -> I18nResult<()> {
        write_json_pretty(path, self)
    }

    pub fn get(&self, language: &LanguageCode, source: &str) -> Option<&str> {
        self.languages
            .get(language.as_str())
            .and_then(|m| m.get(source))
            .map(String::as_str)
    }

    pub fn contains(&self, language: &LanguageCode, source: &str) -> bool {
        self.get(language, source).is_some()
    }

    /// Record a provider result. Returns the previous value, if any.
    pub fn insert(
        &mut self,
        language: &LanguageCode,
        source: &str,
        translation: String,
    ) -> Option<String> {
        self.languages
            .entry(language.as_str().to_string())
            .or_default()
            .insert(source.to_string(), translation)
    }

    /// Number of cached strings for `language`
    pub fn language_len(&self, language: &LanguageCode) -> usize {
        self.languages
            .get(language.as_str())
            .map_or(0, BTreeMap::len)
    }

    /// Total number of cached strings
    pub fn len(&self) -> usize {
        self.languages.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
