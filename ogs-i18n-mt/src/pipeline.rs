//! The translation audit pipeline
//!
//! ```text
//! registry ─▶ load catalog ─▶ validate ─▶ status line + marker file   (per language)
//!                                            │
//!                                            ▼
//!                                      summary file
//!                                            │
//!                                            ▼  (providers configured)
//!                                      vandalism gate
//!                                            │
//!                                            ▼
//!                     work list ─▶ translation engine ─▶ cache file
//! ```
//!
//! Languages are processed sequentially in registry order. Marker files of
//! languages already processed stay on disk if a later catalog fails to load.

use crate::config::{ProviderKeys, ProviderPreference};
use crate::deepl::DeeplProvider;
use crate::engine::{EngineStats, TranslationEngine, WorkList, fully_cached};
use crate::error::{MtError, MtResult};
use crate::google_translate::GoogleTranslateProvider;
use crate::translator::MachineTranslator;
use ogs_i18n::{
    ContentPolicy, LanguageRegistry, LanguageReport, LanguageStatus, MissingCountMarker,
    StatusReport, TranslationCache, Validator, load_catalog, marker_path, status_line,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info, warn};

/// File locations and translation options for one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Relative paths below are resolved against this directory
    pub root: PathBuf,
    pub languages_file: PathBuf,
    pub locale_dir: PathBuf,
    pub cache_file: PathBuf,
    pub summary_file: PathBuf,
    pub source_locale: String,
    pub preference: ProviderPreference,
}

impl PipelineConfig {
    /// Standard layout below `root`
    pub fn new(root: &Path) -> Self {
        PipelineConfig {
            root: root.to_path_buf(),
            languages_file: PathBuf::from("languages.json"),
            locale_dir: PathBuf::from("locale"),
            cache_file: PathBuf::from("autotranslations.json"),
            summary_file: PathBuf::from("locale/translations_missing.json"),
            source_locale: "en".to_string(),
            preference: ProviderPreference::default(),
        }
    }

    pub fn resolve(&self, path: &Path) -> PathBuf {
        self.root.join(path)
    }
}

/// Everything a run produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub status: StatusReport,
    pub languages: Vec<LanguageReport>,
    /// `None` when the translation phase was skipped
    pub translation: Option<EngineStats>,
}

/// DeepL first, then Google, when both keys are configured
pub fn build_providers(keys: &ProviderKeys) -> MtResult<Option<Vec<Arc<dyn MachineTranslator>>>> {
    let Some((deepl_key, google_key)) = keys.complete() else {
        return Ok(None);
    };
    let deepl: Arc<dyn MachineTranslator> = Arc::new(DeeplProvider::new(deepl_key.to_string())?);
    let google: Arc<dyn MachineTranslator> =
        Arc::new(GoogleTranslateProvider::new(google_key.to_string())?);
    Ok(Some(vec![deepl, google]))
}

pub struct AuditPipeline<'a> {
    config: &'a PipelineConfig,
    policy: &'a ContentPolicy,
    marker: &'a MissingCountMarker,
    providers: Option<Vec<Arc<dyn MachineTranslator>>>,
}

impl<'a> AuditPipeline<'a> {
    pub fn new(
        config: &'a PipelineConfig,
        policy: &'a ContentPolicy,
        marker: &'a MissingCountMarker,
    ) -> Self {
        AuditPipeline {
            config,
            policy,
            marker,
            providers: None,
        }
    }

    /// Enable the translation phase with these providers, consulted in order
    pub fn with_providers(mut self, providers: Option<Vec<Arc<dyn MachineTranslator>>>) -> Self {
        self.providers = providers;
        self
    }

    /// Run the audit and, when configured, the translation phase
    ///
    /// # Errors
    /// - Missing or malformed registry, catalog or cache
    /// - `MtError::Vandalized` when providers are configured and any catalog
    ///   contains vandalized strings
    /// - Provider failures
    pub async fn run(&self) -> MtResult<RunReport> {
        let cache_path = self.config.resolve(&self.config.cache_file);
        let mut cache = TranslationCache::load_or_init(&cache_path)?;
        let registry =
            LanguageRegistry::load(&self.config.resolve(&self.config.languages_file))?;

        let (status, languages) = self.audit(&registry, &cache)?;
        status.write_summary(&self.config.resolve(&self.config.summary_file))?;

        let Some(providers) = &self.providers else {
            info!("No autotranslation support on this system, skipping autotranslations");
            return Ok(RunReport {
                status,
                languages,
                translation: None,
            });
        };

        // Vandalized catalogs block publishing machine translations
        let vandalized = status.vandalized();
        if !vandalized.is_empty() {
            error!(
                "Critical error: {} languages have been vandalized",
                vandalized.len()
            );
            return Err(MtError::Vandalized(
                vandalized
                    .into_iter()
                    .map(|(l, n)| (l.as_str().to_string(), n))
                    .collect(),
            ));
        }

        let work = WorkList::collect(&languages, &cache);
        for language in fully_cached(&languages, &work) {
            info!("All missing strings for {} are already autotranslated", language);
        }

        let engine = TranslationEngine::new(
            providers.clone(),
            &self.config.source_locale,
            self.config.preference,
        );
        let stats = engine.run(&work, &mut cache, Some(&cache_path)).await?;
        cache.save(&cache_path)?;

        Ok(RunReport {
            status,
            languages,
            translation: Some(stats),
        })
    }

    /// Validate every language and rewrite marker files
    fn audit(
        &self,
        registry: &LanguageRegistry,
        cache: &TranslationCache,
    ) -> MtResult<(StatusReport, Vec<LanguageReport>)> {
        let locale_dir = self.config.resolve(&self.config.locale_dir);
        let validator = Validator::new(self.policy, cache);
        let mut status = StatusReport::new();
        let mut reports = Vec::with_capacity(registry.len());

        for language in registry.languages() {
            let catalog = load_catalog(&locale_dir, language)?;
            let report = validator.validate(&catalog);
            let summary = report.summary;

            let line = status_line(language, &summary);
            match summary.status() {
                LanguageStatus::Vandalized => error!("{}", line),
                LanguageStatus::Bad => warn!("{}", line),
                LanguageStatus::Missing | LanguageStatus::Good => info!("{}", line),
            }

            if !report.is_vandalized() {
                self.marker
                    .update_file(&marker_path(&locale_dir, language), summary.missing_count)?;
            }

            status.record(language.clone(), summary);
            reports.push(report);
        }

        Ok((status, reports))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_layout() {
        let config = PipelineConfig::new(Path::new("/srv/i18n"));
        assert_eq!(
            config.resolve(&config.summary_file),
            Path::new("/srv/i18n/locale/translations_missing.json")
        );
        assert_eq!(config.source_locale, "en");
        assert_eq!(config.preference, ProviderPreference::PreferLast);
    }

    #[test]
    fn test_build_providers_requires_both_keys() {
        let keys = ProviderKeys {
            deepl_api_key: Some("d:fx".to_string()),
            google_api_key: None,
        };
        assert!(build_providers(&keys).unwrap().is_none());

        let keys = ProviderKeys {
            deepl_api_key: Some("d:fx".to_string()),
            google_api_key: Some("g".to_string()),
        };
        let providers = build_providers(&keys).unwrap().unwrap();
        let names: Vec<&str> = providers.iter().map(|p| p.provider_name()).collect();
        assert_eq!(names, vec!["DeepL", "Google Translate"]);
    }
}
