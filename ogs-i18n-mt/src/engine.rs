//! Placeholder-safe translation of missing catalog strings
//!
//! 1. Collect each language's missing source strings that the cache does not
//!    already cover.
//! 2. Build one [`PlaceholderMap`] over every pending string of every
//!    language before the first provider call, so a label maps to the same
//!    surrogate everywhere and the table is never mutated mid-run.
//! 3. For each language, ask every provider that supports it, in order,
//!    to translate the protected strings.
//! 4. Restore placeholders and merge into the cache under the original
//!    (unprotected) source string.
//!
//! Languages no provider supports are logged and skipped, as are source
//! strings that already contain a surrogate. Provider errors, including a
//! batch answered with the wrong number of strings, abort the run.

use crate::config::ProviderPreference;
use crate::error::MtResult;
use crate::translator::{MachineTranslator, SupportedLanguages, check_batch_len};
use ogs_i18n::{LanguageCode, LanguageReport, PlaceholderMap, TranslationCache};
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Source strings awaiting machine translation, per language
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkList {
    languages: Vec<(LanguageCode, Vec<String>)>,
}

impl WorkList {
    /// Missing strings of every report, minus cache hits
    ///
    /// Languages left with nothing to do are dropped.
    pub fn collect(reports: &[LanguageReport], cache: &TranslationCache) -> Self {
        let languages = reports
            .iter()
            .filter_map(|report| {
                let pending: Vec<String> = report
                    .missing_sources
                    .iter()
                    .filter(|source| !cache.contains(&report.language, source))
                    .cloned()
                    .collect();
                (!pending.is_empty()).then(|| (report.language.clone(), pending))
            })
            .collect();
        WorkList { languages }
    }

    pub fn languages(&self) -> &[(LanguageCode, Vec<String>)] {
        &self.languages
    }

    pub fn is_empty(&self) -> bool {
        self.languages.is_empty()
    }

    /// Total number of (language, source) pairs
    pub fn len(&self) -> usize {
        self.languages.iter().map(|(_, s)| s.len()).sum()
    }

    /// Surrogate table covering every pending string
    pub fn placeholder_map(&self) -> PlaceholderMap {
        PlaceholderMap::for_sources(
            self.languages
                .iter()
                .flat_map(|(_, sources)| sources.iter().map(String::as_str)),
        )
    }
}

/// Counters for one engine run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineStats {
    /// `translate_batch` calls issued
    pub provider_calls: usize,
    /// Strings written to the cache
    pub strings_translated: usize,
    /// Languages no provider could translate into
    pub unsupported_languages: Vec<LanguageCode>,
    /// Strings left untranslated because their text contains a surrogate
    pub skipped_strings: usize,
}

pub struct TranslationEngine {
    providers: Vec<Arc<dyn MachineTranslator>>,
    source_locale: String,
    preference: ProviderPreference,
}

impl TranslationEngine {
    /// `providers` are consulted in order for every language
    pub fn new(
        providers: Vec<Arc<dyn MachineTranslator>>,
        source_locale: &str,
        preference: ProviderPreference,
    ) -> Self {
        TranslationEngine {
            providers,
            source_locale: source_locale.to_string(),
            preference,
        }
    }

    pub fn provider_names(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.provider_name()).collect()
    }

    /// Translate everything in `work` into `cache`
    ///
    /// With `persist_to` set, the cache file is rewritten after each language
    /// so a later provider failure keeps the work already done.
    pub async fn run(
        &self,
        work: &WorkList,
        cache: &mut TranslationCache,
        persist_to: Option<&Path>,
    ) -> MtResult<EngineStats> {
        let mut stats = EngineStats::default();
        if work.is_empty() {
            return Ok(stats);
        }

        let map = work.placeholder_map();
        debug!("Placeholder table has {} entries", map.len());

        let mut support = Vec::with_capacity(self.providers.len());
        for provider in &self.providers {
            support.push(provider.supported_languages().await?);
        }

        for (language, sources) in work.languages() {
            let eligible = self.eligible_providers(language, &support);
            if eligible.is_empty() {
                error!("Failed to find a translator for {}", language);
                stats.unsupported_languages.push(language.clone());
                continue;
            }

            let (sources, colliding): (Vec<&String>, Vec<&String>) =
                sources.iter().partition(|s| !map.collides(s));
            for source in colliding {
                warn!(
                    "Not autotranslating {:?} for {}: it contains a placeholder surrogate",
                    source, language
                );
                stats.skipped_strings += 1;
            }
            if sources.is_empty() {
                continue;
            }

            info!("Missing translations for {}: {}", language, sources.len());
            let protected: Vec<String> = sources.iter().map(|s| map.protect(s)).collect();

            let mut results: Option<Vec<String>> = None;
            for provider in eligible {
                if results.is_some() && self.preference == ProviderPreference::PreferFirst {
                    break;
                }
                let translated = provider
                    .translate_batch(&protected, &self.source_locale, language.as_str())
                    .await?;
                stats.provider_calls += 1;
                check_batch_len(provider.provider_name(), protected.len(), translated.len())?;
                results = Some(translated);
            }

            for (source, translated) in sources.iter().zip(results.unwrap_or_default()) {
                let restored = map.restore(&translated);
                if let Some(previous) = cache.insert(language, source, restored) {
                    debug!("Replaced cached translation for {}: {}", language, previous);
                }
                stats.strings_translated += 1;
            }

            if let Some(path) = persist_to {
                cache.save(path)?;
            }
        }

        Ok(stats)
    }

    fn eligible_providers(
        &self,
        language: &LanguageCode,
        support: &[SupportedLanguages],
    ) -> Vec<&Arc<dyn MachineTranslator>> {
        self.providers
            .iter()
            .zip(support)
            .filter(|(_, langs)| langs.supports(language.as_str()))
            .map(|(provider, _)| provider)
            .collect()
    }
}

/// Languages among `reports` whose missing strings all hit the cache
pub fn fully_cached(reports: &[LanguageReport], work: &WorkList) -> Vec<LanguageCode> {
    let pending: HashSet<&LanguageCode> = work.languages().iter().map(|(l, _)| l).collect();
    reports
        .iter()
        .filter(|r| !r.missing_sources.is_empty() && !pending.contains(&r.language))
        .map(|r| r.language.clone())
        .collect()
}
