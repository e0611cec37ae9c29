//! Language codes and the language registry
//!
//! The registry (`languages.json`) maps each supported language code to
//! display metadata. Only the key set and its order are consumed here: the
//! audit walks languages strictly in registry order.
//!
//! Registry keys use hyphenated BCP-47 tags (`pt-BR`, `zh-hant`) while the
//! gettext catalogs on disk use the underscore-region form (`pt_BR.po`,
//! `zh_HANT.po`). [`LanguageCode::catalog_tag`] converts between the two.

use crate::error::{I18nError, I18nResult};
use regex::Regex;
use serde_json::Value;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

static TAG_WITH_REGION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([a-z]+)-([a-zA-Z]+)").expect("locale tag pattern is valid")
});

/// Identifier for a target locale, exactly as spelled in the registry
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LanguageCode(String);

impl LanguageCode {
    /// Create a language code after checking it only uses locale-tag characters
    pub fn new(code: &str) -> I18nResult<Self> {
        validate_locale(code)?;
        Ok(LanguageCode(code.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// On-disk catalog tag: `pt-BR` → `pt_BR`, `zh-hant` → `zh_HANT`, `de` → `de`
    pub fn catalog_tag(&self) -> String {
        TAG_WITH_REGION
            .replace(&self.0, |caps: &regex::Captures| {
                format!("{}_{}", &caps[1], caps[2].to_uppercase())
            })
            .into_owned()
    }
}

impl std::fmt::Display for LanguageCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for LanguageCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Validate that a locale code is in acceptable format
///
/// Accepts ASCII alphanumerics, hyphens and underscores only. Since codes are
/// spliced into file paths this also rules out path separators.
pub fn validate_locale(locale: &str) -> I18nResult<()> {
    if locale.is_empty() {
        return Err(I18nError::InvalidLocale(
            "Locale code is empty".to_string(),
        ));
    }

    if !locale
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(I18nError::InvalidLocale(format!(
            "Invalid characters in locale code: {}",
            locale
        )));
    }

    Ok(())
}

/// Ordered set of languages the audit covers
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LanguageRegistry {
    languages: Vec<LanguageCode>,
}

impl LanguageRegistry {
    pub fn new(languages: Vec<LanguageCode>) -> Self {
        LanguageRegistry { languages }
    }

    /// Parse a registry document. The root must be an object; values are ignored.
    pub fn from_json_str(content: &str, origin: &Path) -> I18nResult<Self> {
        let json: Value =
            serde_json::from_str(content).map_err(|e| I18nError::json(origin, e.to_string()))?;
        let obj = json
            .as_object()
            .ok_or_else(|| I18nError::json(origin, "root must be an object"))?;

        let languages = obj
            .keys()
            .map(|key| LanguageCode::new(key))
            .collect::<I18nResult<Vec<_>>>()?;

        Ok(LanguageRegistry { languages })
    }

    /// Load `languages.json` from disk
    pub fn load(path: &Path) -> I18nResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| I18nError::io(path, e))?;
        Self::from_json_str(&content, path)
    }

    pub fn languages(&self) -> &[LanguageCode] {
        &self.languages
    }

    pub fn len(&self) -> usize {
        self.languages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.languages.is_empty()
    }
}
