//! Machine Translation trait and utilities
//!
//! `MachineTranslator` abstracts the translation backends (DeepL, Google
//! Translate, the mock used in tests) so the engine never depends on a
//! specific provider.

use crate::error::{MtError, MtResult};
use async_trait::async_trait;
use std::collections::HashSet;

/// How a provider's target-language codes are compared with catalog codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LanguageMatch {
    /// `pt-BR` only matches `pt-BR`
    Exact,
    /// `pt-BR` matches `PT-BR` and `pt-br`
    CaseInsensitive,
}

/// Target languages a provider accepts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupportedLanguages {
    codes: HashSet<String>,
    matching: LanguageMatch,
}

impl SupportedLanguages {
    pub fn new<I, S>(codes: I, matching: LanguageMatch) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let codes = codes
            .into_iter()
            .map(Into::into)
            .map(|c: String| match matching {
                LanguageMatch::Exact => c,
                LanguageMatch::CaseInsensitive => c.to_lowercase(),
            })
            .collect();
        SupportedLanguages { codes, matching }
    }

    pub fn supports(&self, language: &str) -> bool {
        match self.matching {
            LanguageMatch::Exact => self.codes.contains(language),
            LanguageMatch::CaseInsensitive => self.codes.contains(&language.to_lowercase()),
        }
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

/// Generic trait for machine translation providers
///
/// All methods are async to support I/O-bound operations like network requests.
#[async_trait]
pub trait MachineTranslator: Send + Sync {
    /// Translate multiple strings, preserving order and length
    ///
    /// Implementations chunk the input to respect their per-request limits.
    async fn translate_batch(
        &self,
        texts: &[String],
        source_locale: &str,
        target_locale: &str,
    ) -> MtResult<Vec<String>>;

    /// Target languages this provider can translate into
    async fn supported_languages(&self) -> MtResult<SupportedLanguages>;

    /// Name used in log messages (e.g. "DeepL", "Google Translate")
    fn provider_name(&self) -> &str;
}

/// Validate that a locale code is in acceptable format
///
/// Checks that the locale code contains only alphanumeric characters,
/// hyphens, and underscores.
pub fn validate_locale(locale: &str) -> MtResult<()> {
    ogs_i18n::validate_locale(locale).map_err(MtError::from)
}

/// Fail unless a provider returned exactly one result per input
pub fn check_batch_len(provider: &str, expected: usize, got: usize) -> MtResult<()> {
    if expected != got {
        return Err(MtError::TranslationError(format!(
            "{} returned {} translations for {} strings",
            provider, got, expected
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_matching() {
        let langs = SupportedLanguages::new(["pt", "zh-CN"], LanguageMatch::Exact);
        assert!(langs.supports("zh-CN"));
        assert!(!langs.supports("zh-cn"));
        assert!(!langs.supports("pt-BR"));
    }

    #[test]
    fn test_case_insensitive_matching() {
        let langs = SupportedLanguages::new(["PT-BR", "DE"], LanguageMatch::CaseInsensitive);
        assert!(langs.supports("pt-br"));
        assert!(langs.supports("pt-BR"));
        assert!(langs.supports("de"));
        assert!(!langs.supports("fr"));
        assert_eq!(langs.len(), 2);
    }

    #[test]
    fn test_validate_locale() {
        assert!(validate_locale("en-US").is_ok());
        assert!(matches!(
            validate_locale("en@US"),
            Err(MtError::Catalog(ogs_i18n::I18nError::InvalidLocale(_)))
        ));
    }

    #[test]
    fn test_check_batch_len() {
        assert!(check_batch_len("X", 2, 2).is_ok());
        match check_batch_len("X", 3, 2) {
            Err(MtError::TranslationError(msg)) => assert!(msg.contains("2 translations for 3")),
            _ => panic!("Expected TranslationError"),
        }
    }
}
